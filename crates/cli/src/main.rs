//! Modular C Gen CLI - hide a C module's functions behind an operations table

mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::{GenerateConfig, DEFAULT_OUTPUT_DIR};
use logging::LogFormat;
use modular_core::get_std_lib_utils;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "modular-c-gen")]
#[command(about = "Automatically generate modularization boilerplate code for C", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(
        long,
        global = true,
        value_enum,
        env = "MODULAR_C_GEN_LOG_FORMAT",
        default_value = "pretty"
    )]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the header and source for a module
    Generate {
        /// Path to the source C file
        #[arg(short, long)]
        input: PathBuf,

        /// Directory where the boilerplate code will be saved
        #[arg(short, long, env = "MODULAR_C_GEN_OUTPUT", default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Module name (default: input file stem)
        #[arg(short, long)]
        module: Option<String>,

        /// Print the generated files instead of writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// List the functions found in a C file
    Inspect {
        /// Path to the source C file
        #[arg(short, long)]
        input: PathBuf,

        /// Print the full parsed model as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.log_format)?;

    debug!(version = modular_core::VERSION, "modular-c-gen starting");

    match cli.command {
        Commands::Generate {
            input,
            output,
            module,
            dry_run,
        } => {
            let config = GenerateConfig::resolve(input, output, module, dry_run)?;
            debug!(
                input = %config.input.display(),
                output = %config.output_dir.display(),
                module = %config.module,
                dry_run = config.dry_run,
                "Configuration resolved"
            );
            commands::generate(&config, get_std_lib_utils())?;
        }

        Commands::Inspect { input, json } => {
            config::validate_input(&input)?;
            commands::inspect(&input, json)?;
        }
    }

    Ok(())
}
