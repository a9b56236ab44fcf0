use tracing_subscriber::EnvFilter;

use crate::domain::error::Result;
use crate::interfaces::cli::Cli;

/// `RUST_LOG` wins; `info` otherwise. Logs go to stderr so stdout stays clean for output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub async fn run(cli: Cli) -> Result<()> {
    let output = cli.execute().await?;
    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
    Ok(())
}
