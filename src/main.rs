use std::process::ExitCode;

use twitter_run::cli;

#[tokio::main]
async fn main() -> ExitCode {
    cli::run().await
}
