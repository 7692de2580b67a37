mod config;

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use sqlgen_codegen::{generate, write_json};
use sqlgen_extract::{Strategy, extract};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::FileConfig;

/// Output produced from the extracted schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Emit {
    /// Rust data-access module.
    Rust,
    /// JSON document with the schema script and its tables.
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "sqlgen", version)]
#[command(about = "Generate typed Rust data-access code from a SQL schema script")]
struct Cli {
    /// SQL schema script to read.
    input: PathBuf,
    /// File to write. Replaced atomically; left untouched on failure.
    output: PathBuf,
    /// Schema extraction strategy [default: live].
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,
    /// What to write to OUTPUT.
    #[arg(long, value_enum, default_value = "rust")]
    emit: Emit,
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log more (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn run(cli: Cli) -> Result<(), String> {
    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let strategy = cli.strategy.or(file_config.strategy).unwrap_or_default();

    let sql = fs::read_to_string(&cli.input)
        .map_err(|err| format!("cannot read {}: {err}", cli.input.display()))?;
    let tables =
        extract(&sql, strategy).map_err(|err| format!("{}: {err}", cli.input.display()))?;

    match cli.emit {
        Emit::Rust => {
            let module = generate(&tables, &sql, &file_config.generator_options())
                .map_err(|err| err.to_string())?;
            module.write_to(&cli.output).map_err(|err| err.to_string())?;
        }
        Emit::Json => write_json(&tables, &sql, &cli.output).map_err(|err| err.to_string())?,
    }

    info!(
        input = %cli.input.display(),
        output = %cli.output.display(),
        tables = tables.len(),
        "wrote {:?} output",
        cli.emit
    );
    Ok(())
}
