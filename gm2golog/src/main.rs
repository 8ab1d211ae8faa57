//! Goal model to DT-Golog translator CLI.
//!
//! Reads a JSON goal model, links it, and writes the generated situation
//! calculus program. Degraded renderings are printed as warnings.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use gm2golog::exit_codes;
use gm2golog::io::config::{CONFIG_FILE, TranslatorConfig, load_config};
use gm2golog::io::model_store::MODEL_SCHEMA;
use gm2golog::logging;
use gm2golog::translate::{translate_file, validate_file};

#[derive(Parser)]
#[command(
    name = "gm2golog",
    version,
    about = "Translate goal models into DT-Golog programs"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translate a model file and write the generated program.
    Translate {
        /// Model document (JSON).
        model: PathBuf,
        /// Output path. Defaults to the model path with the configured extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Config file. Defaults to `gm2golog.toml` in the working directory.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Check a model against the schema, the linker and the model invariants.
    Validate {
        /// Model document (JSON).
        model: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the embedded model JSON schema.
    Schema,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Translate {
            model,
            output,
            config,
        } => cmd_translate(&model, output.as_deref(), config.as_deref()),
        Command::Validate { model, config } => cmd_validate(&model, config.as_deref()),
        Command::Schema => {
            print!("{MODEL_SCHEMA}");
            Ok(exit_codes::OK)
        }
    }
}

fn cmd_translate(model: &Path, output: Option<&Path>, config: Option<&Path>) -> Result<i32> {
    let config = config_for(config)?;
    let outcome = translate_file(model, output, &config)?;
    for diagnostic in &outcome.diagnostics {
        eprintln!("warning: {diagnostic}");
    }
    println!("{}", outcome.output.display());
    Ok(outcome.exit_code())
}

fn cmd_validate(model: &Path, config: Option<&Path>) -> Result<i32> {
    let config = config_for(config)?;
    let outcome = validate_file(model, &config)?;
    println!("ok: {} ({} elements)", outcome.model, outcome.elements);
    Ok(exit_codes::OK)
}

fn config_for(path: Option<&Path>) -> Result<TranslatorConfig> {
    load_config(path.unwrap_or(Path::new(CONFIG_FILE)))
}
