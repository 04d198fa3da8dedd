//! Extract command - pull contact fields from a single document.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use cardex_core::{Document, ExtractionClient, ExtractionMode};

use super::output::{format_record, OutputFormat};
use super::{load_config, ClientArgs};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// File path, http(s) URL, data URL, or base64 payload
    #[arg(required = true)]
    input: String,

    /// Submit as a job and poll for the result
    #[arg(long = "async")]
    use_async: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Include the provider response in JSON output
    #[arg(long)]
    raw: bool,

    /// Show extraction confidence
    #[arg(long)]
    show_confidence: bool,

    #[command(flatten)]
    client: ClientArgs,
}

/// Treat the input as a file when one exists at that path.
pub fn resolve_document(input: &str) -> anyhow::Result<Document> {
    let path = Path::new(input);
    if path.is_file() {
        debug!("Reading document from {}", path.display());
        Ok(Document::from_path(path)?)
    } else {
        Ok(Document::classify(input))
    }
}

pub fn spinner(message: &str) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(message.to_string());
    Ok(pb)
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = args.client.apply(load_config(config_path)?);
    let client = ExtractionClient::new(config)?;

    let document = resolve_document(&args.input)?;
    let mode = ExtractionMode::from(args.use_async);
    info!("Extracting {} ({:?})", document.kind(), mode);

    let pb = spinner(match mode {
        ExtractionMode::Sync => "Extracting...",
        ExtractionMode::Async => "Waiting for job...",
    })?;
    let result = client.extract(&document, mode).await;
    pb.finish_and_clear();
    let record = result?;

    if let Some(error) = &record.error {
        eprintln!("{} Provider response was malformed: {}", style("!").yellow(), error);
    }

    let output = format_record(&record, args.format, args.raw)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        println!();
        println!(
            "{} Extraction confidence: {:.1}% ({})",
            style("ℹ").blue(),
            record.confidence * 100.0,
            record.level()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
