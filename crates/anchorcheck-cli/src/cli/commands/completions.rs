//! `anchorcheck completions` and `anchorcheck man`.

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;

pub fn run_completions(shell: Shell) -> Result<bool> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "anchorcheck", &mut std::io::stdout());
    Ok(true)
}

pub fn run_man() -> Result<bool> {
    let man = clap_mangen::Man::new(Cli::command());
    man.render(&mut std::io::stdout())?;
    Ok(true)
}
