//! Todos CLI - flux-dispatch demo
//!
//! Runs a script of commands against a store and prints the result.
//!
//! # Usage
//!
//! ```sh
//! # Commands as arguments
//! cargo run -p todos-demo -- "add Learn Redux" "add Use Redux" "toggle 0" inc
//!
//! # Commands from a file (one per line, `#` comments allowed)
//! cargo run -p todos-demo -- --file script.txt --json
//!
//! # Show the action log, without the counter actions
//! cargo run -p todos-demo -- --debug --log-exclude "INCREMENT,DECREMENT" "add a" inc
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use flux_dispatch::logger::{ActionLogConfig, ActionLoggerConfig, ActionLoggerMiddleware};
use tracing_subscriber::EnvFilter;

use todos_demo::{
    app_state, create_app_store, parse_script, render, run_commands, Command, DemoError,
    TodoCommands, TodoStore,
};

/// Todo list and counter driven by a flux-dispatch store
#[derive(Parser, Debug)]
#[command(name = "todos")]
#[command(about = "Run todo/counter commands through a flux-dispatch store")]
struct Args {
    /// Commands to run: `add <text>`, `toggle <id>`,
    /// `filter <all|active|completed>`, `inc`, `dec`
    commands: Vec<String>,

    /// Read commands from a file (`-` for stdin)
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Print the whole state tree as JSON instead of the todo list
    #[arg(long)]
    json: bool,

    /// Enable the action logger and print its log to stderr
    #[arg(long)]
    debug: bool,

    /// Comma-separated glob patterns of actions to log (default: all)
    #[arg(long, value_name = "PATTERNS")]
    log_include: Option<String>,

    /// Comma-separated glob patterns of actions not to log (default: `@@*`)
    #[arg(long, value_name = "PATTERNS")]
    log_exclude: Option<String>,

    /// Number of actions the log keeps
    #[arg(long, default_value = "100")]
    log_capacity: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.debug);

    match run(&args) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run(args: &Args) -> Result<String, DemoError> {
    let commands = load_commands(args)?;

    let filter = ActionLoggerConfig::new(
        args.log_include.as_deref(),
        args.log_exclude.as_deref(),
    );
    let logger =
        ActionLoggerMiddleware::with_log(ActionLogConfig::new(args.log_capacity, filter))
            .active(args.debug);

    let store = create_app_store(None, logger)?;
    let mut creators = TodoCommands::new();
    let result = run_commands(&store, &mut creators, &commands);

    // printed even when a command failed
    if args.debug {
        print_action_log(&store);
    }
    result?;

    if args.json {
        let mut output = serde_json::to_string_pretty(store.get_state().as_ref())?;
        output.push('\n');
        Ok(output)
    } else {
        Ok(render(&app_state(&store)?))
    }
}

fn load_commands(args: &Args) -> Result<Vec<Command>, DemoError> {
    let mut commands = Vec::new();

    if let Some(path) = &args.file {
        let script = if path.as_os_str() == "-" {
            let mut script = String::new();
            io::stdin().read_to_string(&mut script)?;
            script
        } else {
            std::fs::read_to_string(path)?
        };
        commands.extend(parse_script(&script)?);
    }

    for (index, line) in args.commands.iter().enumerate() {
        let command = line.parse::<Command>().map_err(|source| DemoError::Script {
            line: index + 1,
            source,
        })?;
        commands.push(command);
    }

    tracing::debug!(count = commands.len(), "loaded commands");
    Ok(commands)
}

fn print_action_log(store: &TodoStore) {
    store.middleware(|logger| {
        let Some(log) = logger.log() else { return };
        eprintln!("action log ({} entries):", log.len());
        for entry in log.entries() {
            let changed = match entry.state_changed {
                Some(true) => "changed",
                Some(false) => "unchanged",
                None => "failed",
            };
            eprintln!(
                "  #{:<3} {:<24} {:<9} {}",
                entry.sequence, entry.name, changed, entry.summary
            );
        }
    });
}
