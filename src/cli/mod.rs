//! CLI tools for scanstage
//!
//! Provides the build-step side of the tool:
//! - `stage`: Copy the scanner wrapper onto a node under a stable name
//! - `props`: Write, read or delete the build properties handoff
//! - `clean`: Remove a staged directory
//! - `completions`: Generate shell completions

pub mod completions;
pub mod props;
pub mod stage;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use scanstage::{Config, init_logging};
use std::path::PathBuf;

/// CLI arguments for scanstage
#[derive(Parser, Debug)]
#[command(name = "scanstage")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy the scanner wrapper to a node and add a stable-name copy
    Stage {
        /// Destination directory on the node
        #[arg(short, long)]
        dest: PathBuf,
        /// Directory holding the wrapper (defaults to the configured wrapper dir)
        #[arg(short, long)]
        source: Option<PathBuf>,
        /// Node name used in logs
        #[arg(long, default_value = "built-in")]
        node: String,
        /// Fail if more than one wrapper artifact is found
        #[arg(long)]
        exactly_one: bool,
        /// Print failures to the build console
        #[arg(long)]
        fail_build: bool,
    },

    /// Build properties handoff file
    #[command(subcommand)]
    Props(PropsCommand),

    /// Delete a staged directory
    Clean {
        /// Directory to delete
        dir: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: ShellArg,
        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum PropsCommand {
    /// Write properties, replacing any existing file
    Write {
        /// Storage directory of the build
        #[arg(long)]
        build_dir: PathBuf,
        /// Entries as KEY=VALUE
        #[arg(required = true, value_parser = props::parse_entry)]
        entries: Vec<(String, String)>,
    },
    /// Print and consume the properties
    Read {
        /// Storage directory of the build
        #[arg(long)]
        build_dir: PathBuf,
        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<ReadFormatArg>,
    },
    /// Delete the properties file
    Delete {
        /// Storage directory of the build
        #[arg(long)]
        build_dir: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ReadFormatArg {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ShellArg {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Build the CLI command for completion generation
pub fn build_cli() -> clap::Command {
    Args::command()
}

/// Parse and execute CLI arguments
pub fn run() -> Result<()> {
    let args = Args::parse();

    let config = Config::resolve(args.config.as_deref())?;
    init_logging(args.log_level.as_deref().unwrap_or(&config.log_level));

    match args.command {
        Command::Stage {
            dest,
            source,
            node,
            exactly_one,
            fail_build,
        } => {
            let request = stage::StageRequest {
                source,
                dest,
                node,
                exactly_one,
                fail_build,
            };
            let staged = stage::stage_wrapper(&config, request)?;
            println!("{}", staged.stable.display());
        }
        Command::Props(PropsCommand::Write { build_dir, entries }) => {
            props::write(&config, &build_dir, entries)?;
        }
        Command::Props(PropsCommand::Read { build_dir, format }) => {
            let format = match format {
                Some(ReadFormatArg::Json) => props::ReadFormat::Json,
                Some(ReadFormatArg::Text) | None => props::ReadFormat::Text,
            };
            props::read(&config, &build_dir, format, &mut std::io::stdout())?;
        }
        Command::Props(PropsCommand::Delete { build_dir }) => {
            props::delete(&config, &build_dir)?;
        }
        Command::Clean { dir } => {
            if stage::clean(&dir)? {
                println!("Removed {}", dir.display());
            } else {
                println!("Nothing to remove at {}", dir.display());
            }
        }
        Command::Completions { shell, output } => {
            use clap_complete::Shell;

            let shell_enum = match shell {
                ShellArg::Bash => Shell::Bash,
                ShellArg::Zsh => Shell::Zsh,
                ShellArg::Fish => Shell::Fish,
                ShellArg::PowerShell => Shell::PowerShell,
            };

            let completions = completions::generate_completions(shell_enum)?;

            if let Some(output_path) = output {
                completions::save_completions(&completions, &output_path)?;
            } else {
                println!("{}", completions);
            }
        }
    }

    Ok(())
}
