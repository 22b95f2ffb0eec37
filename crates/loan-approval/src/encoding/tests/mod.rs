mod common;
mod encoding;
mod schema;
