//! RAX FTP Client - Entry Point
//!
//! A Rust-based FTP client for listing, copying, moving and deleting
//! remote files and directories.

use clap::Parser;
use log::info;

use rax_ftp_client::cli::runner::RunContext;
use rax_ftp_client::cli::{self, Cli};
use rax_ftp_client::config::ClientConfig;
use rax_ftp_client::error::handlers::handle_error;
use rax_ftp_client::utils::setup_logging;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // RUST_LOG selects the log level, --verbose only controls the protocol echo
    setup_logging();

    let config = match ClientConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: failed to load configuration: {e}");
            std::process::exit(2);
        }
    };

    let ctx = RunContext::from_config(&config, args.verbose);
    info!("Running {:?}", args.operation);

    let mut stdout = tokio::io::stdout();
    if let Err(e) = cli::run(args.operation, &ctx, &mut stdout).await {
        handle_error(&e);
        std::process::exit(1);
    }
}
