//! Classify command - sort a directory of CFDI XML files.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::{debug, warn};

use cfdi_core::batch::{BatchDriver, BatchState, CancelToken, ProgressObserver};
use cfdi_core::models::report::{BatchResult, FileReport, Outcome};

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Directory containing the XML files
    #[arg(required = true)]
    source: PathBuf,

    /// Directory the classified tree is written into
    #[arg(required = true)]
    dest: PathBuf,

    /// Write a per-file summary CSV
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Print the batch result as JSON instead of a report
    #[arg(long)]
    json: bool,
}

/// Drives an indicatif progress bar from batch events.
struct ProgressBarObserver {
    pb: ProgressBar,
}

impl ProgressBarObserver {
    fn new(visible: bool) -> anyhow::Result<Self> {
        let pb = ProgressBar::hidden();
        if visible {
            pb.set_draw_target(ProgressDrawTarget::stderr());
        }
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?
                .progress_chars("=>-"),
        );
        Ok(Self { pb })
    }
}

impl ProgressObserver for ProgressBarObserver {
    fn on_state(&mut self, state: BatchState) {
        match state {
            BatchState::Scanning => self.pb.set_message("scanning"),
            BatchState::Processing { current: 1, total } => {
                self.pb.set_length(total as u64);
                self.pb.set_message("");
            }
            _ => {}
        }
    }

    fn on_file(&mut self, processed: usize, _total: usize, report: &FileReport) {
        self.pb.set_position(processed as u64);
        self.pb.set_message(report.file_name.clone());
    }

    fn on_finish(&mut self, result: &BatchResult) {
        if result.cancelled {
            self.pb.abandon_with_message("Cancelled");
        } else {
            self.pb.finish_with_message("Complete");
        }
    }
}

pub async fn run(args: ClassifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::config::load(config_path)?;

    // Ctrl-C stops the batch at the next file boundary
    let token = CancelToken::new();
    let interrupt = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, stopping after the current file");
                token.cancel();
            }
        })
    };

    let source = args.source.clone();
    let dest = args.dest.clone();
    let mut observer = ProgressBarObserver::new(!args.json)?;

    let result = tokio::task::spawn_blocking(move || {
        let mut driver = BatchDriver::new(config).with_cancel_token(token);
        driver.run(&source, &dest, &mut observer)
    })
    .await??;

    interrupt.abort();

    if let Some(ref summary_path) = args.summary {
        write_summary(summary_path, &result)?;
        debug!("Summary written to {}", summary_path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.is_empty() {
        println!(
            "{} No XML files found in {}",
            style("ℹ").blue(),
            args.source.display()
        );
        return Ok(());
    }

    // Print summary
    println!();
    println!(
        "{} Processed {} of {} files in {:?}",
        style("✓").green(),
        result.processed(),
        result.total,
        start.elapsed()
    );
    println!(
        "   {} classified, {} sent to errors",
        style(result.classified).green(),
        style(result.errored).red()
    );

    if result.cancelled {
        println!(
            "{} Cancelled before all files were processed",
            style("⚠").yellow()
        );
    }

    if let Some(ref summary_path) = args.summary {
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    if !result.failures.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for failure in &result.failures {
            println!("  - {}: {}", failure.file_name, failure.reason);
        }
    }

    Ok(())
}

fn write_summary(path: &Path, result: &BatchResult) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "date_folder",
        "series",
        "code",
        "destination",
        "error",
    ])?;

    for report in &result.files {
        let destination = report
            .outcome
            .destination()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        match &report.outcome {
            Outcome::Classified { key, .. } => {
                wtr.write_record([
                    report.file_name.as_str(),
                    "classified",
                    &key.date_folder,
                    &key.series,
                    &key.code,
                    &destination,
                    "",
                ])?;
            }
            Outcome::Routed { reason, .. } => {
                wtr.write_record([
                    report.file_name.as_str(),
                    "error",
                    "",
                    "",
                    "",
                    &destination,
                    reason,
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
