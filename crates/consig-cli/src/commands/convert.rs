//! Convert command - extract loan deductions from a single guide PDF.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use chrono::Local;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use consig_core::guide::rules::format_brl_amount;
use consig_core::{
    ConsigConfig, CsvWriter, Extraction, HEADERS, JsonWriter, NormalizedTable, PageDriver,
    ProgressObserver, SummaryStatistics, TableWriter, XlsxWriter, aggregate, normalize,
};

use super::config::load_config;

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Input guide PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: <prefix>_<timestamp>.<ext> in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "xlsx")]
    format: OutputFormat,

    /// Number of rows to preview (default from config)
    #[arg(long)]
    preview: Option<usize>,

    /// Hide progress and preview
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Excel workbook
    Xlsx,
    /// CSV output
    Csv,
    /// JSON output
    Json,
}

/// Table and statistics for one converted guide.
pub struct Conversion {
    pub table: NormalizedTable,
    pub statistics: SummaryStatistics,
}

/// What a structurally successful conversion produced.
pub enum Outcome {
    Converted(Conversion),
    NoRecords,
}

pub fn run(args: ConvertArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());
    let data = fs::read(&args.input)?;

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(100)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );
    let mut observer = |fraction: f32, status: &str| {
        pb.set_position((fraction * 100.0).round() as u64);
        pb.set_message(status.to_string());
    };

    let outcome = convert_pdf(&data, &config, Some(&mut observer))
        .with_context(|| format!("Error processing PDF {}", args.input.display()));
    pb.finish_and_clear();

    let conversion = match outcome? {
        Outcome::Converted(conversion) => conversion,
        Outcome::NoRecords => {
            eprintln!(
                "{} No workers found in the PDF. Check the file format.",
                style("⚠").yellow()
            );
            return Ok(());
        }
    };

    let writer = writer_for(args.format, &config, &conversion.statistics);
    let output = writer.write(&conversion.table)?;
    let output_path = args.output.clone().unwrap_or_else(|| {
        PathBuf::from(default_file_name(&config.export.file_prefix, writer.extension()))
    });
    fs::write(&output_path, &output)?;

    print_summary(&conversion.statistics);

    if !args.quiet {
        let rows = args.preview.unwrap_or(config.export.preview_rows);
        if rows > 0 {
            println!();
            println!(
                "{}",
                style(format!("Preview (first {} records)", rows.min(conversion.table.len())))
                    .bold()
            );
            print!("{}", format_preview(&conversion.table, rows));
        }
    }

    println!();
    println!(
        "{} Output written to {}",
        style("✓").green(),
        output_path.display()
    );

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Extract, normalize, and aggregate one guide.
pub fn convert_pdf(
    data: &[u8],
    config: &ConsigConfig,
    observer: Option<&mut dyn ProgressObserver>,
) -> anyhow::Result<Outcome> {
    let driver = PageDriver::new().with_max_pages(config.pdf.max_pages);

    let records = match driver.run_pdf(data, &config.pdf, observer)? {
        Extraction::Records(records) => records,
        Extraction::Empty { pages } => {
            debug!("No records found in {} pages", pages);
            return Ok(Outcome::NoRecords);
        }
    };

    let table = normalize(&records);
    let statistics = aggregate(&table, config.extraction.amount_format)?;

    Ok(Outcome::Converted(Conversion { table, statistics }))
}

/// Writer for the requested format.
pub fn writer_for(
    format: OutputFormat,
    config: &ConsigConfig,
    statistics: &SummaryStatistics,
) -> Box<dyn TableWriter> {
    match format {
        OutputFormat::Xlsx => {
            Box::new(XlsxWriter::new().with_sheet_name(config.export.sheet_name.clone()))
        }
        OutputFormat::Csv => Box::new(CsvWriter::new()),
        OutputFormat::Json => Box::new(
            JsonWriter::new()
                .with_statistics(statistics.clone())
                .pretty(true),
        ),
    }
}

/// Timestamped output name, e.g. `FGTS_Trabalhadores_2024-10-15_143000.xlsx`.
pub fn default_file_name(prefix: &str, extension: &str) -> String {
    format!(
        "{}_{}.{}",
        prefix,
        Local::now().format("%Y-%m-%d_%H%M%S"),
        extension
    )
}

fn print_summary(stats: &SummaryStatistics) {
    println!(
        "{} Conversion complete: {} workers with {} loans extracted",
        style("✓").green(),
        style(stats.unique_workers).bold(),
        style(stats.total_records).bold()
    );
    println!();
    println!("  Workers:      {}", stats.unique_workers);
    println!("  Loans:        {}", stats.total_records);
    println!("  Institutions: {}", stats.unique_institutions);
    println!(
        "  Total value:  {}",
        style(format_brl_amount(stats.total_value)).cyan()
    );
}

/// Fixed-width text rendering of the first `rows` records.
fn format_preview(table: &NormalizedTable, rows: usize) -> String {
    let head = table.head(rows);
    let cells: Vec<[String; 9]> = head.iter().map(|row| row.cells()).collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let header: Vec<String> = HEADERS
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w))
        .collect();
    output.push_str(header.join("  ").trim_end());
    output.push('\n');

    for row in &cells {
        let line: Vec<String> = row.iter().zip(&widths).map(|(c, w)| pad(c, *w)).collect();
        output.push_str(line.join("  ").trim_end());
        output.push('\n');
    }

    output
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}
