use loan_approval_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("application error: {err}");
        let code = if err.is_user_error() { 2 } else { 1 };
        std::process::exit(code);
    }
}
