use std::process::ExitCode;

use clap::Parser;
use epu_csv::app;
use epu_csv::interfaces::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    app::init_tracing();

    let cli = Cli::parse();
    match app::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "epu-csv failed");
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
