pub mod cli;
pub mod commands;
pub mod error;
pub mod render;

use std::process::ExitCode;

use serde::Serialize;

use ebp_core::Config;

use cli::{Cli, Command};
use error::{CommandError, CommandResult};

/// Install the tracing subscriber. `RUST_LOG` directives are extended with
/// `directives`; logs go to stderr so stdout stays machine-readable.
pub fn init_logging(directives: &[&str]) {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in directives {
        match directive.parse::<tracing_subscriber::filter::Directive>() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("Ignoring log directive '{}': {}", directive, e),
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(&["ebp=info", "ebp_lib=info", "ebp_core=info"]);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    rt.block_on(dispatch(cli))
}

async fn dispatch(cli: Cli) -> ExitCode {
    let config = Config::load_or_default();

    match cli.command {
        Command::Score(args) => {
            let outcome = commands::score(&args, &config).await;
            finish(outcome, args.json, render::score_report, |o| {
                o.state.results.is_empty()
            })
        }
        Command::Hints { file, json } => {
            finish(commands::hints(&file).await, json, render::hints_report, |_| false)
        }
        Command::Settings { init, json } => finish(
            commands::settings(&config, init),
            json,
            render::settings_report,
            |_| false,
        ),
        Command::Inspect { csv, json } => finish(
            commands::inspect(&csv),
            json,
            |rows| render::inspect_report(rows),
            |_| false,
        ),
    }
}

/// Print an outcome or error. The exit status fails on error or when
/// `failed` says the outcome is unsuccessful.
fn finish<T: Serialize>(
    outcome: CommandResult<T>,
    json: bool,
    render: impl Fn(&T) -> String,
    failed: impl Fn(&T) -> bool,
) -> ExitCode {
    match outcome {
        Ok(value) => {
            if json {
                if let Err(e) = print_json(&value) {
                    return print_error(e, json);
                }
            } else {
                print!("{}", render(&value));
            }
            if failed(&value) {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => print_error(e, json),
    }
}

fn print_json<T: Serialize>(value: &T) -> CommandResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CommandError::internal(format!("Failed to serialize output: {}", e)))?;
    println!("{}", text);
    Ok(())
}

fn print_error(error: CommandError, json: bool) -> ExitCode {
    tracing::debug!(error = %error, "Command failed");
    if json {
        match serde_json::to_string_pretty(&error) {
            Ok(text) => println!("{}", text),
            Err(_) => eprintln!("error: {}", error),
        }
    } else {
        eprintln!("error: {}", error);
    }
    ExitCode::FAILURE
}
