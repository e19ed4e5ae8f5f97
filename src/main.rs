use clap::Parser;
use sprintdeck::SprintError;
use sprintdeck::cli::commands;
use sprintdeck::cli::{Cli, Commands};
use sprintdeck::config::CliOverrides;
use sprintdeck::logging::init_logging;
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet) {
        eprintln!("Failed to initialize logging: {e}");
        // Continue without logging rather than refusing to run.
    }

    let overrides = CliOverrides {
        dir: cli.dir.clone(),
        actor: cli.actor.clone(),
        json: Some(cli.json),
    };

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(&args.backend, args.force, None),
        Commands::Client { command } => commands::client::execute(&command, cli.json, &overrides),
        Commands::Toggle(args) => commands::toggle::execute(&args, cli.json, &overrides),
        Commands::Status(args) => commands::status::execute(&args, cli.json, &overrides),
        Commands::Critical(args) => commands::critical::execute(&args, cli.json, &overrides),
        Commands::Matrix => commands::matrix::execute(cli.json, &overrides),
        Commands::Job { command } => commands::job::execute(&command, cli.json, &overrides),
        Commands::Template { command } => {
            commands::template::execute(&command, cli.json, &overrides)
        }
        Commands::Task { command } => commands::task::execute(&command, cli.json, &overrides),
        Commands::Due(args) => commands::due::execute(&args, cli.json, &overrides),
        Commands::Mine => commands::mine::execute(cli.json, &overrides),
        Commands::Export(args) => commands::export::execute(&args, cli.json, &overrides),
        Commands::Import(args) => commands::import::execute(&args, cli.json, &overrides),
        Commands::Config(args) => commands::config::execute(&args, cli.json, &overrides),
        Commands::Completions(args) => commands::completions::execute(&args),
    };

    if let Err(e) = result {
        handle_error(&e, cli.json);
    }
}

/// Print an error and exit.
///
/// With --json (or a non-terminal stdout) the error goes to stderr as a
/// structured object; otherwise it is human-readable with the recovery
/// suggestion when one exists.
fn handle_error(err: &SprintError, json_mode: bool) -> ! {
    let use_json = json_mode || !io::stdout().is_terminal();

    if use_json {
        let payload = serde_json::json!({
            "error": err.to_string(),
            "recoverable": err.is_user_recoverable(),
            "retryable": err.is_retryable(),
            "suggestion": err.suggestion(),
        });
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
        );
    } else {
        eprintln!("Error: {err}");
        if let Some(suggestion) = err.suggestion() {
            eprintln!("  {suggestion}");
        }
    }

    std::process::exit(err.exit_code());
}
