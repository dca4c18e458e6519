use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use fitcompare::config::AppConfig;
use fitcompare::export::{self, text, ExportFormat};
use fitcompare::import::{collect_activity_files, ActivityDecoder};
use fitcompare::logging::{init_logging, LogFormat, RunReport};
use fitcompare::{
    compare_documents, BatchConfig, BatchDecoder, CompareOptions, ComparisonRun, CoordinateMode,
    FitDecoder, Locale, OverlayAlignment, TimestampZone,
};

/// fitcompare - side-by-side comparison of FIT activity files
///
/// Decodes several activities, prints a summary table per file and builds
/// heart rate, speed, cadence and altitude overlays on a shared time or
/// distance axis.
#[derive(Parser)]
#[command(name = "fitcompare")]
#[command(version)]
#[command(about = "Compare FIT activity files", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log line format (pretty, json, compact)
    #[arg(long, value_name = "FORMAT", global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare activities: summary table, overlays and optional charts
    Compare {
        /// FIT files or directories containing them
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// X-axis basis (time, distance)
        #[arg(short, long)]
        axis: Option<CoordinateMode>,

        /// Language of headers and chart titles (en, zh)
        #[arg(short, long)]
        locale: Option<Locale>,

        /// Show timestamps in UTC instead of local time
        #[arg(long)]
        utc: bool,

        /// Output format (table, json, csv)
        #[arg(short = 'f', long, default_value = "table")]
        format: ExportFormat,

        /// Directory for exported files and charts
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Render SVG charts
        #[arg(long)]
        charts: bool,

        /// Decoder threads (default: one per CPU)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Pad shorter series with gaps to the longest file's axis
        #[arg(long)]
        pad: bool,

        /// Save a JSON run report to this file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Print the summary table only
    Summary {
        /// FIT files or directories containing them
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Language of headers (en, zh)
        #[arg(short, long)]
        locale: Option<Locale>,

        /// Show timestamps in UTC instead of local time
        #[arg(long)]
        utc: bool,
    },

    /// Show the message structure of one file
    Inspect {
        file: PathBuf,
    },

    /// Configure application settings
    Config {
        /// List all configuration options
        #[arg(short, long)]
        list: bool,

        /// Set a configuration value (KEY=VALUE)
        #[arg(short, long)]
        set: Option<String>,

        /// Get a configuration value
        #[arg(short, long)]
        get: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(cli.config.as_deref())?;

    let mut log_config = config.logging.clone();
    log_config.level = log_config.level.raised_by(cli.verbose);
    if let Some(format) = cli.log_format {
        log_config.format = format;
    }
    init_logging(&log_config)?;

    match cli.command {
        Commands::Compare {
            files,
            axis,
            locale,
            utc,
            format,
            output,
            charts,
            threads,
            pad,
            report,
        } => {
            let options = CompareOptions {
                mode: axis.unwrap_or(config.display.coordinate_mode),
                zone: zone_for(utc, &config),
                alignment: if pad {
                    OverlayAlignment::PadWithGaps
                } else {
                    config.display.alignment
                },
            };
            let locale = locale.unwrap_or(config.display.locale);
            let show_progress = config.import.show_progress && format == ExportFormat::Table;

            let start = Instant::now();
            let paths = collect_inputs(&files, &config)?;
            let run = decode_and_compare(&paths, &options, &config, threads, show_progress, report.as_deref());
            let run = match run {
                Ok(run) => run,
                Err(e) => {
                    eprintln!("{} {}", "✗".red().bold(), e);
                    std::process::exit(1);
                }
            };

            match (format, &output) {
                (ExportFormat::Table, _) => print_run(&run, locale),
                (ExportFormat::Json, None) => {
                    println!("{}", serde_json::to_string_pretty(&run)?);
                }
                (ExportFormat::Csv, None) => {
                    let written = export::export_run(&run, format, Path::new("."), locale)?;
                    print_written(&written);
                }
                _ => {}
            }

            if let Some(dir) = &output {
                let written = export::export_run(&run, format, dir, locale)
                    .with_context(|| format!("Failed to export to {}", dir.display()))?;
                print_written(&written);
            }

            if charts {
                render_charts(&run, &config, output.as_deref(), locale)?;
            }

            if format == ExportFormat::Table {
                println!(
                    "{} {:.3}s",
                    text::processing_time_label(locale).dimmed(),
                    start.elapsed().as_secs_f64()
                );
            }
        }

        Commands::Summary { files, locale, utc } => {
            let options = CompareOptions {
                zone: zone_for(utc, &config),
                ..CompareOptions::default()
            };
            let locale = locale.unwrap_or(config.display.locale);

            let paths = collect_inputs(&files, &config)?;
            match decode_and_compare(&paths, &options, &config, None, false, None) {
                Ok(run) => print_run(&run, locale),
                Err(e) => {
                    eprintln!("{} {}", "✗".red().bold(), e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Inspect { file } => {
            let decoder = FitDecoder {
                lenient: config.import.lenient,
            };
            let document = decoder
                .decode_file(&file)
                .map_err(fitcompare::FitCompareError::from)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;

            println!("{}", file.display().to_string().bold());
            println!("  Sport:    {}", document.sport());
            println!("  Sessions: {}", document.sessions.len());
            for (i, session) in document.sessions.iter().enumerate() {
                let records: usize = session.laps.iter().map(|l| l.records.len()).sum();
                println!(
                    "    #{}: {} laps, {} records",
                    i + 1,
                    session.laps.len(),
                    records
                );
            }
            println!("  Records:  {}", document.record_count());
            println!("  Events:   {}", document.events.len());
            for device in &document.device_infos {
                if let Some(product) = &device.product_name {
                    println!("  Device:   {}", product);
                }
            }
        }

        Commands::Config { list, set, get } => {
            let config_path = cli
                .config
                .clone()
                .unwrap_or_else(AppConfig::default_config_path);
            let mut config = config;

            if let Some(assignment) = set {
                let (key, value) = assignment
                    .split_once('=')
                    .context("Expected KEY=VALUE")?;
                config.set_value(key.trim(), value.trim())?;
                config.save_to_file(&config_path)?;
                println!("{} {} = {}", "✓".green(), key.trim(), value.trim());
            }

            if let Some(key) = get {
                println!("{}", config.get_value(&key)?);
            }

            if list {
                println!("{}", config_path.display().to_string().dimmed());
                for (key, value) in config.list_values() {
                    println!("  {} = {}", key.cyan(), value);
                }
            }
        }
    }

    Ok(())
}

fn zone_for(utc: bool, config: &AppConfig) -> TimestampZone {
    if utc {
        TimestampZone::Utc
    } else {
        config.display.timestamp_zone
    }
}

fn collect_inputs(files: &[PathBuf], config: &AppConfig) -> Result<Vec<PathBuf>> {
    let decoder = FitDecoder {
        lenient: config.import.lenient,
    };
    let paths = collect_activity_files(files, &decoder)?;
    if paths.is_empty() {
        anyhow::bail!("No FIT files found in the given inputs");
    }
    Ok(paths)
}

/// Decode every input and run the comparison. Run-level failures come back
/// as their user-facing message.
fn decode_and_compare(
    paths: &[PathBuf],
    options: &CompareOptions,
    config: &AppConfig,
    threads: Option<usize>,
    show_progress: bool,
    report_path: Option<&Path>,
) -> Result<ComparisonRun> {
    let batch = BatchDecoder::with_decoder(
        BatchConfig {
            num_threads: threads.or(config.import.threads),
            show_progress,
        },
        Box::new(FitDecoder {
            lenient: config.import.lenient,
        }),
    );
    let (decoded, _summary) = batch.decode_files(paths)?;

    let result = compare_documents(&decoded, options);

    if let Some(path) = report_path {
        let mut report = match &result {
            Ok(run) => RunReport::from_run("compare", run, paths.len()),
            Err(e) => {
                let mut report = RunReport::new("compare");
                report.files_total = paths.len();
                report.set_error(e);
                report
            }
        };
        report.add_context("axis", options.mode.to_string());
        report.add_context("alignment", options.alignment.to_string());
        report.save_to_file(path)?;
    }

    result.map_err(|e| {
        tracing::event!(tracing::Level::ERROR, severity = ?e.severity(), "{}", e);
        anyhow::anyhow!(e.user_message())
    })
}

fn print_run(run: &ComparisonRun, locale: Locale) {
    println!("{}", text::render_summary_table(&run.summaries, locale));

    if !run.diagnostics.is_empty() {
        println!();
        println!("{}", text::SKIPPED_HEADING.bold());
    }
    for diagnostic in &run.diagnostics {
        let line = text::diagnostic_line(diagnostic);
        if diagnostic.issue.keeps_summary() {
            println!("{}", line.yellow());
        } else {
            println!("{}", line.red());
        }
    }

    if !run.has_charts() {
        println!("{}", "No file has records to chart".yellow());
    }
}

fn print_written(paths: &[PathBuf]) {
    for path in paths {
        println!("{} {}", "✓ Wrote".green(), path.display());
    }
}

#[cfg(feature = "charts")]
fn render_charts(
    run: &ComparisonRun,
    config: &AppConfig,
    output: Option<&Path>,
    locale: Locale,
) -> Result<()> {
    use fitcompare::chart::svg::SvgRenderer;

    if !run.has_charts() {
        return Ok(());
    }

    let mut renderer = SvgRenderer::new(&config.chart, locale);
    if let Some(dir) = output {
        renderer.output_dir = dir.to_path_buf();
    }

    let registry = renderer.render_run(run)?;
    for chart in registry.iter() {
        println!("{} {} ({})", "✓ Chart".green(), chart.title, chart.path.display());
    }
    Ok(())
}

#[cfg(not(feature = "charts"))]
fn render_charts(
    _run: &ComparisonRun,
    _config: &AppConfig,
    _output: Option<&Path>,
    _locale: Locale,
) -> Result<()> {
    eprintln!(
        "{}",
        "Chart rendering is not available: rebuild with --features charts".yellow()
    );
    Ok(())
}
