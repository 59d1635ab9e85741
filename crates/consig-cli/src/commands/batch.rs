//! Batch command - convert every guide PDF matching a glob pattern.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use consig_core::ConsigConfig;

use super::config::load_config;
use super::convert::{Conversion, Outcome, OutputFormat, convert_pdf, writer_for};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input PDFs (e.g. "guias/*.pdf")
    #[arg(required = true)]
    input: String,

    /// Output directory (default: current directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "xlsx")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    conversion: Option<Conversion>,
    error: Option<String>,
    processing_time_ms: u64,
}

impl FileResult {
    fn status(&self) -> &'static str {
        match (&self.conversion, &self.error) {
            (_, Some(_)) => "error",
            (Some(_), None) => "success",
            (None, None) => "empty",
        }
    }
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let output_dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    let multi_progress = MultiProgress::new();
    let overall_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );
    let page_pb = multi_progress.add(ProgressBar::new(100));
    page_pb.set_style(ProgressStyle::default_bar().template("  {bar:40.green/white} {msg}")?);

    let mut results = Vec::with_capacity(files.len());
    let mut used_stems = HashSet::new();

    for path in files {
        let file_start = Instant::now();
        page_pb.reset();
        let mut observer = |fraction: f32, status: &str| {
            page_pb.set_position((fraction * 100.0).round() as u64);
            page_pb.set_message(status.to_string());
        };

        let result = fs::read(&path)
            .map_err(anyhow::Error::from)
            .and_then(|data| convert_pdf(&data, &config, Some(&mut observer)))
            .and_then(|outcome| {
                if let Outcome::Converted(conversion) = &outcome {
                    let stem = output_stem(&path, &config.export.file_prefix, &mut used_stems);
                    write_output(&stem, conversion, &output_dir, args.format, &config)?;
                }
                Ok(outcome)
            });
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(Outcome::Converted(conversion)) => {
                results.push(FileResult {
                    path,
                    conversion: Some(conversion),
                    error: None,
                    processing_time_ms,
                });
            }
            Ok(Outcome::NoRecords) => {
                warn!("No workers found in {}", path.display());
                results.push(FileResult {
                    path,
                    conversion: None,
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = format!("{:#}", e);
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        conversion: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Error processing PDF {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    page_pb.finish_and_clear();
    overall_pb.finish_with_message("Complete");

    if args.summary {
        let summary_path = output_dir.join("summary.csv");
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let count = |status: &str| results.iter().filter(|r| r.status() == status).count();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} without workers, {} failed",
        style(count("success")).green(),
        style(count("empty")).yellow(),
        style(count("error")).red()
    );

    let failed: Vec<&FileResult> = results.iter().filter(|r| r.error.is_some()).collect();
    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Output file stem for `path`, suffixed `_2`, `_3`, ... when an earlier
/// input in the batch already claimed the same stem.
fn output_stem(path: &Path, fallback: &str, used: &mut HashSet<String>) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(fallback);

    let mut candidate = stem.to_string();
    let mut n = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{}_{}", stem, n);
        n += 1;
    }
    candidate
}

fn write_output(
    stem: &str,
    conversion: &Conversion,
    output_dir: &Path,
    format: OutputFormat,
    config: &ConsigConfig,
) -> anyhow::Result<()> {
    let writer = writer_for(format, config, &conversion.statistics);
    let output_path = output_dir.join(format!("{}.{}", stem, writer.extension()));
    fs::write(&output_path, writer.write(&conversion.table)?)?;
    debug!("Wrote output to {}", output_path.display());

    Ok(())
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "workers",
        "loans",
        "institutions",
        "total_value",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let (workers, loans, institutions, total) = match &result.conversion {
            Some(conversion) => {
                let stats = &conversion.statistics;
                (
                    stats.unique_workers.to_string(),
                    stats.total_records.to_string(),
                    stats.unique_institutions.to_string(),
                    stats.total_value.to_string(),
                )
            }
            None => Default::default(),
        };

        wtr.write_record([
            filename,
            result.status(),
            &workers,
            &loans,
            &institutions,
            &total,
            &result.processing_time_ms.to_string(),
            result.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
