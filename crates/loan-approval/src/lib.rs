//! Loan approval scoring: applicant encoding against versioned feature schemas,
//! a pre-trained classifier behind a narrow trait, and the explanation shown
//! next to each decision.

pub mod batch;
pub mod bootstrap;
pub mod config;
pub mod encoding;
pub mod error;
pub mod model;
pub mod prediction;
pub mod telemetry;
pub mod wizard;

pub use bootstrap::load_predictor;
