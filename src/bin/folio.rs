//! folio - portfolio viewer and admin console
//!
//! ```bash
//! folio portfolio
//! folio sign-in --email me@example.com --password secret
//! folio projects create --name "Folio" --description "This site" --image ./shot.png
//! folio projects delete <id>
//! ```

use std::process::ExitCode;

use clap::Parser;
use folio::cli::{run, Cli, StdinConfirm};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout();

    match run(cli, &mut stdout, &mut StdinConfirm).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
