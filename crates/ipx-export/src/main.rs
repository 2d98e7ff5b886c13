//! IPX Export - publishes interaction evidence as UniProtKB DR, CC and GO lines

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use ipx_common::logging::{init_logging, LogConfig, LogLevel};
use ipx_export::config::ExportConfig;
use ipx_export::context::ClusterContext;
use ipx_export::filter::JsonLinesSource;
use ipx_export::pipeline::{ExportEvent, ExportPipeline, ExportSinks};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ipx-export")]
#[command(author, version, about = "Export interaction evidence as UniProtKB lines")]
struct Cli {
    /// Cluster context (JSON)
    #[arg(short, long)]
    context: PathBuf,

    /// Scored clusters (JSON lines)
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for the DR, CC and GO files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Configuration file (TOML)
    #[arg(long, env = "IPX_CONFIG")]
    config: Option<PathBuf>,

    /// Convert entries in parallel, overriding the configuration
    #[arg(long)]
    parallel: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Environment variables take precedence
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("ipx-export")
        .build()
        .merge_env()?;

    let _guard = init_logging(&log_config)?;

    let mut config = ExportConfig::load(cli.config.as_deref())?;
    if cli.parallel {
        config.parallel = true;
    }

    let context_file = File::open(&cli.context)
        .with_context(|| format!("Failed to open context {}", cli.context.display()))?;
    let context = ClusterContext::from_reader(BufReader::new(context_file))?;

    let mut source = JsonLinesSource::open(&cli.input)?;

    std::fs::create_dir_all(&cli.output_dir).with_context(|| {
        format!("Failed to create output directory {}", cli.output_dir.display())
    })?;
    let create = |path: PathBuf| -> Result<BufWriter<File>> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(BufWriter::new(file))
    };
    let mut sinks = ExportSinks::new(
        create(config.output.dr_path(&cli.output_dir))?,
        create(config.output.cc_path(&cli.output_dir))?,
        create(config.output.go_path(&cli.output_dir))?,
    );

    info!(
        input = %cli.input.display(),
        output_dir = %cli.output_dir.display(),
        strategy = ?config.strategy,
        "Starting export"
    );

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} entries {msg}")?,
    );
    progress.enable_steady_tick(Duration::from_millis(120));

    let pipeline = ExportPipeline::new(&context, &config.policy, config.strategy.build())
        .parallel(config.parallel);
    let stats = pipeline.run(&mut source, &mut sinks, |event| match event {
        ExportEvent::DrLine { .. } => progress.inc(1),
        ExportEvent::RecordRejected { .. } => progress.set_message("(with rejected records)"),
        _ => {},
    })?;
    sinks.close()?;

    progress.finish_with_message("done");

    info!(
        clusters_read = stats.filter.clusters_read,
        entries = stats.entries,
        dr_lines = stats.dr_lines,
        cc_lines = stats.cc_lines,
        go_lines = stats.go_lines,
        rejected = stats.rejected_records,
        duration_ms = stats.duration_ms(),
        "Export complete"
    );
    Ok(())
}
