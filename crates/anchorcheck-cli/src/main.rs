use anchorcheck_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; fall back to stderr if the
    // state dir is not writable.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::debug!(error = %err, "log file unavailable, logging to stderr");
    }

    // Parse CLI and dispatch. Exit 2 when a verification found a difference.
    match CliCommand::run_from_args().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(err) => {
            eprintln!("anchorcheck error: {:#}", err);
            std::process::exit(1);
        }
    }
}
