use clap::CommandFactory;
use clap_complete::Shell;

use crate::error::Result;

pub fn run(shell: Shell) -> Result<()> {
    let mut cmd = super::Cli::command();
    clap_complete::generate(shell, &mut cmd, "posso", &mut std::io::stdout());
    Ok(())
}
