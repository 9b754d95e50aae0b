//! # mopro CLI entry point
//!
//! Parses arguments, layers configuration, installs logging, builds the
//! runtime, and dispatches to the handlers in [`mopro_cli::invoke`].

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;

use mopro_bridge::{BridgeModule, Dispatcher};
use mopro_cli::invoke::{self, Outcome};
use mopro_cli::{BridgeConfig, LogFormat};
use mopro_engine::Engines;

/// Exit code for usage, configuration and setup failures.
const EXIT_SETUP: u8 = 2;

/// mopro — zero-knowledge proof bridge.
///
/// Generates and verifies Circom, Halo2 and Noir proofs through the same
/// command table a mobile host binding uses.
#[derive(Parser, Debug)]
#[command(name = "mopro", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format. Overrides the config file and MOPRO_LOG_FORMAT.
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Invoke a module function by name, e.g. `generateCircomProof`.
    Call {
        /// Function name.
        name: String,
        /// JSON array of positional arguments, or `-` to read it from stdin.
        args: Option<String>,
    },

    /// List the module's functions and events.
    List,

    /// Print the module's constants.
    Constants,

    /// Print the greeting.
    Hello,

    /// Set a value and print the `onChange` event it produces.
    Watch {
        value: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match BridgeConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("mopro: {e}");
            return ExitCode::from(EXIT_SETUP);
        }
    };
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    let filter = match config.env_filter(cli.verbose) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("mopro: {e}");
            return ExitCode::from(EXIT_SETUP);
        }
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match config.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    tracing::debug!(?config, "mopro CLI starting");

    let runtime = match config.build_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(EXIT_SETUP);
        }
    };

    let module = BridgeModule::new(Dispatcher::new(Engines::mock()));

    match runtime.block_on(run(cli.command, &module)) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_SETUP)
        }
    }
}

async fn run(command: Commands, module: &BridgeModule) -> anyhow::Result<u8> {
    match command {
        Commands::Call { name, args } => {
            let args = invoke::parse_args(args.as_deref())?;
            let outcome = invoke::run_call(module, &name, args).await;
            match &outcome {
                Outcome::Resolved(value) => print_json(value)?,
                Outcome::Rejected(rejection) => {
                    eprintln!("{}", serde_json::to_string_pretty(rejection)?);
                }
            }
            Ok(outcome.exit_code())
        }
        Commands::List => {
            print_json(&invoke::listing(module))?;
            Ok(0)
        }
        Commands::Constants => {
            print_json(&invoke::constants(module))?;
            Ok(0)
        }
        Commands::Hello => {
            println!("{}", module.hello());
            Ok(0)
        }
        Commands::Watch { value } => {
            let event = invoke::run_watch(module, value).await?;
            print_json(&serde_json::to_value(event)?)?;
            Ok(0)
        }
    }
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_call_with_args() {
        let cli = Cli::try_parse_from([
            "mopro",
            "call",
            "verifyHalo2Proof",
            r#"["/srs", "/vk", [1], [2]]"#,
        ])
        .unwrap();
        match cli.command {
            Commands::Call { name, args } => {
                assert_eq!(name, "verifyHalo2Proof");
                assert!(args.unwrap().starts_with('['));
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_call_without_args() {
        let cli = Cli::try_parse_from(["mopro", "call", "hello"]).unwrap();
        assert!(matches!(cli.command, Commands::Call { args: None, .. }));
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "mopro",
            "list",
            "-vv",
            "--log-format",
            "json",
            "--config",
            "mopro.json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        assert_eq!(cli.config, Some(PathBuf::from("mopro.json")));
    }

    #[test]
    fn cli_parse_rejects_unknown_log_format() {
        assert!(Cli::try_parse_from(["mopro", "--log-format", "xml", "hello"]).is_err());
    }

    #[test]
    fn cli_parse_watch() {
        let cli = Cli::try_parse_from(["mopro", "watch", "ready"]).unwrap();
        assert!(matches!(cli.command, Commands::Watch { value } if value == "ready"));
    }

    #[test]
    fn cli_requires_a_subcommand() {
        assert!(Cli::try_parse_from(["mopro"]).is_err());
    }
}
