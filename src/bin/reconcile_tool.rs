use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use equivalency::json::{JsonRecordAdapter, RecordOptions};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reconcile-tool")]
#[command(about = "Reconcile JSON record files by key")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the reconciled target records
    Apply {
        #[command(flatten)]
        input: InputArgs,
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print what a reconciliation would do, without writing records
    Plan {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// JSON array holding the desired records
    #[arg(long)]
    source: PathBuf,
    /// JSON array holding the existing records
    #[arg(long)]
    target: PathBuf,
    /// Field used to pair records
    #[arg(long, default_value = "id")]
    key: String,
    /// Flag orphaned records with this field instead of dropping them
    #[arg(long)]
    soft_delete_field: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("equivalency=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Apply { input, out } => {
            let (records, outcome) = run(&input)?;
            let rendered = serde_json::to_string_pretty(&Value::Array(records))?;
            match out {
                Some(path) => write_output(&path, &rendered)?,
                None => println!("{}", rendered),
            }
            info!(%outcome, "records reconciled");
            Ok(())
        }
        Command::Plan { input } => {
            let (_, outcome) = run(&input)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
    }
}

fn run(input: &InputArgs) -> Result<(Vec<Value>, equivalency::ReconcileOutcome)> {
    let mut options = RecordOptions::new(&input.key);
    if let Some(field) = &input.soft_delete_field {
        options = options.soft_delete_field(field);
    }
    let adapter = JsonRecordAdapter::new(options)?;

    let source = read_input(&input.source)?;
    let target = read_input(&input.target)?;

    adapter
        .reconcile_str(&source, &target)
        .with_context(|| {
            format!(
                "Failed to reconcile '{}' against '{}'",
                input.target.display(),
                input.source.display()
            )
        })
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create parent directory '{}'", parent.display())
            })?;
        }
    }
    fs::write(path, content).with_context(|| format!("Failed to write '{}'", path.display()))
}
