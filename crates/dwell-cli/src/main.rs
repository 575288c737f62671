//! `dwell` binary entrypoint.

#[tokio::main]
async fn main() {
    let code = dwell_cli::run().await;
    if code != 0 {
        std::process::exit(code);
    }
}
