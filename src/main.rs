//! Command-line interface for noise-mask
//!
//! # Usage Examples
//!
//! ```bash
//! # Random noise, not reproducible across runs
//! noise-mask mask --config mask.yaml --input rows.jsonl --output masked.jsonl
//!
//! # Reproducible noise for columns using `engine: hash`
//! noise-mask mask --config mask.yaml --salt "$(noise-mask generate-salt)" < rows.jsonl
//!
//! # Drop rows whose dynamic limits are invalid instead of aborting
//! noise-mask mask --config mask.yaml --input rows.jsonl --skip-failed-rows
//! ```
//!
//! Logging is controlled with `RUST_LOG` and written to stderr.

use anyhow::Context;
use clap::{Parser, Subcommand};
use mask_generator::Salt;
use mask_transformers::TransformerRegistry;
use noise_mask::{mask_path, MaskConfig, MaskOptions, MaskPipeline};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "noise-mask")]
#[command(about = "Mask integer columns with bounded statistical noise")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mask a JSONL stream
    Mask {
        /// Mask configuration (YAML)
        #[arg(long, value_name = "PATH")]
        config: PathBuf,

        /// Input JSONL file (default: stdin)
        #[arg(long, value_name = "PATH")]
        input: Option<PathBuf>,

        /// Output JSONL file (default: stdout)
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Base64 salt for the hash engine
        #[arg(long, env = "NOISE_MASK_SALT", hide_env_values = true)]
        salt: Option<String>,

        /// Drop rows that fail instead of aborting the run
        #[arg(long)]
        skip_failed_rows: bool,
    },

    /// List available transformers and their parameters
    Transformers,

    /// Print a new random salt (base64)
    GenerateSalt,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing; stdout may carry masked rows
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = TransformerRegistry::with_defaults();

    match cli.command {
        Commands::Mask {
            config,
            input,
            output,
            salt,
            skip_failed_rows,
        } => {
            let salt = salt
                .map(|encoded| Salt::from_base64(&encoded))
                .transpose()
                .context("Invalid salt, expected base64")?;
            run_mask(
                &registry,
                config,
                input,
                output,
                salt,
                MaskOptions { skip_failed_rows },
            )
            .await?;
        }
        Commands::Transformers => print_transformers(&registry),
        Commands::GenerateSalt => {
            let salt = Salt::generate().context("Failed to generate salt")?;
            println!("{}", salt.to_base64());
        }
    }

    Ok(())
}

async fn run_mask(
    registry: &TransformerRegistry,
    config_path: PathBuf,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    salt: Option<Salt>,
    options: MaskOptions,
) -> anyhow::Result<()> {
    let config = MaskConfig::from_file(&config_path)?;
    let pipeline = MaskPipeline::build(registry, &config, salt.as_ref())?;

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current row");
            signal_token.cancel();
        }
    });

    let stats = mask_path(pipeline, input, output, options, cancel).await?;
    tracing::info!(
        "Masking complete: {} rows read, {} written, {} skipped",
        stats.rows_read,
        stats.rows_written,
        stats.rows_skipped
    );
    Ok(())
}

fn print_transformers(registry: &TransformerRegistry) {
    for definition in registry.definitions() {
        println!("{} - {}", definition.name, definition.description);
        for parameter in &definition.parameters {
            let mut notes = Vec::new();
            if parameter.required {
                notes.push("required".to_string());
            }
            if let Some(default) = &parameter.default {
                let rendered = serde_yaml::to_string(default).unwrap_or_default();
                notes.push(format!("default: {}", rendered.trim()));
            }
            if parameter.dynamic_mode.is_some() {
                notes.push("dynamic".to_string());
            }
            let notes = if notes.is_empty() {
                String::new()
            } else {
                format!(" ({})", notes.join(", "))
            };
            println!("  {:<10} {}{}", parameter.name, parameter.description, notes);
        }
    }
}
