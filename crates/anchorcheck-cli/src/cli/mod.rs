//! CLI for verifying local files against on-chain anchors.

mod commands;

use anyhow::Result;
use anchorcheck_core::config;
use anchorcheck_core::source::HttpAnchorSource;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use commands::{
    run_chunks, run_compare, run_completions, run_digest, run_man, run_record, run_surveys,
    run_verify,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "anchorcheck")]
#[command(about = "Verify local survey files against checksums and chunks anchored on-chain", long_about = None)]
pub struct Cli {
    /// Base URL of the ESIMS REST API (overrides config.toml).
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,

    /// Bearer token for the API (overrides config.toml and ANCHORCHECK_TOKEN).
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Compute SHA-256 of a local file.
    Digest {
        /// Path to the file.
        path: PathBuf,
    },

    /// Show the on-chain record of a survey.
    Record {
        /// Survey identifier.
        survey_id: u64,
    },

    /// Compare a file's SHA-256 with the on-chain checksum.
    Compare {
        /// Survey identifier.
        survey_id: u64,
        /// Path to the file.
        path: PathBuf,
    },

    /// Compare a file byte-for-byte with the raw on-chain chunks.
    Chunks {
        /// Survey identifier.
        survey_id: u64,
        /// Path to the file.
        path: PathBuf,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Run both methods and report whether the file is the original.
    Verify {
        /// Survey identifier.
        survey_id: u64,
        /// Path to the file.
        path: PathBuf,
    },

    /// List surveys that have an on-chain record or anchored file.
    Surveys {
        /// Include surveys with nothing anchored.
        #[arg(long)]
        all: bool,
    },

    /// Print shell completions.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print a roff man page.
    Man,
}

impl CliCommand {
    /// Parse arguments and run the command. Returns `Ok(false)` when a
    /// verification completed but found a difference.
    pub async fn run_from_args() -> Result<bool> {
        let Cli {
            api_base,
            token,
            command,
        } = Cli::parse();

        // Config is only loaded for commands that talk to the backend.
        let connect = || -> Result<HttpAnchorSource> {
            let cfg = config::load_or_init()?.with_overrides(api_base.clone(), token.clone());
            tracing::debug!(api_base = %cfg.api_base, has_token = cfg.token.is_some(), "loaded config");
            Ok(HttpAnchorSource::from_config(&cfg)?)
        };

        match command {
            CliCommand::Digest { path } => run_digest(&path).await,
            CliCommand::Record { survey_id } => run_record(connect()?, survey_id).await,
            CliCommand::Compare { survey_id, path } => {
                run_compare(connect()?, survey_id, path).await
            }
            CliCommand::Chunks {
                survey_id,
                path,
                json,
            } => run_chunks(connect()?, survey_id, path, json).await,
            CliCommand::Verify { survey_id, path } => run_verify(connect()?, survey_id, path).await,
            CliCommand::Surveys { all } => run_surveys(connect()?, all).await,
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man(),
        }
    }
}

#[cfg(test)]
mod tests;
