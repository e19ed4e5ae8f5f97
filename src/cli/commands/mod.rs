//! Command implementations for the `sd` CLI.

pub mod client;
pub mod completions;
pub mod config;
pub mod critical;
pub mod due;
pub mod export;
pub mod import;
pub mod init;
pub mod job;
pub mod matrix;
pub mod mine;
pub mod status;
pub mod task;
pub mod template;
pub mod toggle;

use crate::catalogue;
use crate::config::{CliOverrides, Config};
use crate::engine::Engine;
use crate::error::Result;
use std::io::{self, BufRead, IsTerminal, Write};
use unicode_width::UnicodeWidthStr;

/// Resolve config and load the engine projection for a command.
pub(crate) fn load_engine(overrides: &CliOverrides) -> Result<(Config, Engine)> {
    let config = Config::resolve(overrides)?;
    let store = config.open_store()?;
    let engine = Engine::load(store, catalogue::thirty_day_sprint())?;
    Ok((config, engine))
}

/// Ask a yes/no question on stderr. Non-interactive stdin answers no.
pub(crate) fn confirm(question: &str) -> Result<bool> {
    if !io::stdin().is_terminal() {
        return Ok(false);
    }
    eprint!("{question} [y/N] ");
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Pad a cell to a display width, unicode-aware.
pub(crate) fn pad(text: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(text);
    if current >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - current))
    }
}

/// Render a fixed-width text progress bar for a percentage.
pub(crate) fn render_bar(percent: u32) -> String {
    const WIDTH: u32 = 20;
    let filled = (percent.min(100) * WIDTH).div_ceil(100).min(WIDTH);
    let mut bar = String::with_capacity(WIDTH as usize);
    for i in 0..WIDTH {
        bar.push(if i < filled { '█' } else { '░' });
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_is_width_aware() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcd", 2), "abcd");
    }

    #[test]
    fn bar_endpoints() {
        assert_eq!(render_bar(0), "░".repeat(20));
        assert_eq!(render_bar(100), "█".repeat(20));
        assert!(render_bar(50).starts_with('█'));
    }
}
