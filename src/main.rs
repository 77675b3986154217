use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Startup failures are already logged by the server bootstrap.
    match care_relay::run_with_config().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
