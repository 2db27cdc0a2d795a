use clap::{Parser, Subcommand};
use miette::{miette, Result};
use std::path::PathBuf;

use trycatch_regions::cli;
use trycatch_regions::cli::process::{OutputFormat, ProcessArgs};
use trycatch_regions::structuring::{ProcessOptions, DEFAULT_WRAP_PASS_LIMIT};

#[derive(Parser)]
#[command(name = "trycatch-regions")]
#[command(about = "Reconstruct try/catch regions in decompiler region trees")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run try/catch region reconstruction on methods described in JSON
    Process {
        /// Input JSON file
        input: PathBuf,

        /// Only process the method with this name
        #[arg(short, long)]
        method: Option<String>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Full region traversals allowed per method
        #[arg(long, default_value_t = DEFAULT_WRAP_PASS_LIMIT)]
        wrap_pass_limit: usize,

        /// Check region tree invariants before and after the pass
        #[arg(long)]
        validate: bool,
    },

    /// Export a method's control flow graph to DOT
    Dot {
        /// Input JSON file
        input: PathBuf,

        /// Method to export
        #[arg(short, long)]
        method: String,

        /// Output DOT file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            method,
            output,
            format,
            wrap_pass_limit,
            validate,
        } => {
            let args = ProcessArgs {
                input_path: input,
                method,
                output_path: output,
                format,
                options: ProcessOptions {
                    wrap_pass_limit,
                    validate_tree: validate,
                },
            };
            cli::process::process(&args).map_err(|e| miette!("{}", e))
        }
        Commands::Dot {
            input,
            method,
            output,
        } => cli::dot::dot(&input, &method, output.as_deref()).map_err(|e| miette!("{}", e)),
    }
}
