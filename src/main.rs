mod cli;
mod console;

use clap::Parser;
use cli::Cli;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    mediafetch::observability::init_tracing();

    let cli = Cli::parse();

    match console::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "mediafetch failed");
            ExitCode::FAILURE
        }
    }
}
