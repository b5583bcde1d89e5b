use clap::Parser;
use std::process::ExitCode;

use git_subtree_remote::cli::Cli;
use git_subtree_remote::{commands, logging};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init(cli.global.log_level) {
        eprintln!("Warning: could not initialize logging: {}", e);
    }

    match commands::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
