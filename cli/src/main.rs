//! # arouter-cli
//!
//! Command-line driver for the ARouter metadata compiler. It feeds
//! declaration snapshots from the host build through the route,
//! interceptor and autowired processors, one round per snapshot, and
//! writes the generated sources to disk.
//!
//! ## Commands
//!
//! - `arouter-gen generate --symbols round1.json` - Run the processors
//! - `arouter-gen inspect <snapshot>` - Summarize a snapshot
//! - `arouter-gen search <snapshot> <query>` - Find annotated declarations
//! - `arouter-gen config init|validate` - Manage `arouter.toml`
//!
//! See `arouter-gen --help` for the full command reference.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use std::process;

mod commands;
mod config;
mod logging;
mod ui;

#[derive(Parser)]
#[command(name = "arouter-gen")]
#[command(about = "ARouter metadata compiler - generate routing tables and injectors", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to arouter.toml configuration file
    #[arg(short, long, global = true, default_value = "arouter.toml")]
    config: String,

    /// Enable verbose output
    #[arg(long, global = true)]
    verbose: bool,

    /// Emit processor logs as JSON lines on stderr
    #[arg(long, global = true, env = "AROUTER_JSON_LOGS")]
    json_logs: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the processors over one or more snapshots (one round each)
    Generate {
        /// Declaration snapshot; repeat for additional rounds
        #[arg(short, long = "symbols", value_name = "FILE", required = true)]
        symbols: Vec<PathBuf>,

        /// Output directory for generated sources
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Module name (overrides AROUTER_MODULE_NAME in the config)
        #[arg(short, long)]
        module: Option<String>,

        /// Target language: kotlin or java
        #[arg(short, long)]
        backend: Option<String>,

        /// Also write the route document
        #[arg(long)]
        docs: bool,

        /// Directory for the route document
        #[arg(long, value_name = "DIR")]
        docs_dir: Option<PathBuf>,
    },

    /// Summarize a snapshot, or show one declaration
    Inspect {
        /// Declaration snapshot
        symbols: PathBuf,

        /// Qualified or simple class name to show in detail
        #[arg(short, long)]
        name: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search annotated declarations by name
    Search {
        /// Declaration snapshot
        symbols: PathBuf,

        /// Case-insensitive substring of the qualified name
        query: String,
    },

    /// Manage arouter.toml
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a starter arouter.toml
    Init {
        /// Module name to record under [args]
        #[arg(short, long)]
        module: Option<String>,

        /// Enable route document generation
        #[arg(long)]
        docs: bool,
    },
    /// Validate the configuration file
    Validate,
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "arouter-gen", &mut io::stdout());
        return;
    }

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    logging::init(logging::LogConfig::new(cli.verbose).with_json_logs(cli.json_logs))?;

    match command {
        Commands::Generate {
            symbols,
            output,
            module,
            backend,
            docs,
            docs_dir,
        } => {
            let summary = commands::generate::run(
                &cli.config,
                commands::generate::GenerateArgs {
                    symbols,
                    output,
                    module,
                    backend,
                    docs,
                    docs_dir,
                },
            )?;
            commands::generate::check(&summary)
        }
        Commands::Inspect {
            symbols,
            name,
            json,
        } => commands::inspect::inspect(&symbols, name.as_deref(), json),
        Commands::Search { symbols, query } => commands::inspect::search(&symbols, &query),
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init { module, docs } => {
                commands::config::init(&cli.config, module.as_deref(), docs)
            }
            ConfigCommands::Validate => commands::config::validate(&cli.config),
        },
    }
}
