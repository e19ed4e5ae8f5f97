//! Shell completions generation command.
//!
//! Generates shell completion scripts for bash, zsh, fish, `PowerShell`,
//! and elvish.
//!
//! ```bash
//! sd completions bash > ~/.local/share/bash-completion/completions/sd
//! sd completions zsh -o ~/.zsh/completions/_sd
//! ```

use crate::cli::{Cli, CompletionsArgs, ShellType};
use crate::error::Result;
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io;
use tracing::info;

/// Execute the completions command.
///
/// # Errors
///
/// Returns an error if file I/O fails.
pub fn execute(args: &CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let shell = convert_shell_type(args.shell);

    if let Some(output_path) = &args.output {
        let mut file = std::fs::File::create(output_path)?;
        generate(shell, &mut cmd, "sd", &mut file);
        info!(path = %output_path.display(), "Wrote completion script");
    } else {
        generate(shell, &mut cmd, "sd", &mut io::stdout());
    }

    Ok(())
}

/// Convert our `ShellType` enum to `clap_complete`'s Shell enum.
const fn convert_shell_type(shell: ShellType) -> Shell {
    match shell {
        ShellType::Bash => Shell::Bash,
        ShellType::Zsh => Shell::Zsh,
        ShellType::Fish => Shell::Fish,
        ShellType::PowerShell => Shell::PowerShell,
        ShellType::Elvish => Shell::Elvish,
    }
}
