use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use power_quality_service::analyzer::{AnalyzerProfile, Vendor};
use power_quality_service::catalog::AnalyzerCatalog;
use power_quality_service::config::Config;
use power_quality_service::persistence::JsonLinesSummaryRepository;
use power_quality_service::services::{AnalysisService, BatchJob, BatchService};
use power_quality_service::utils::file_label;

#[derive(Parser)]
#[command(name = "power-quality")]
#[command(about = "Compute power-quality compliance summaries from analyzer exports", long_about = None)]
struct Cli {
    /// Analyzer catalog (JSON array of profiles)
    #[arg(long, env = "PQ_CATALOG_PATH", global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one export against an analyzer profile
    Analyze {
        /// Analyzer format: SONEL, AEMC or METREL
        #[arg(long)]
        vendor: String,

        /// Profile name in the catalog
        #[arg(long)]
        profile: String,

        /// Spreadsheet export (.xlsx or .xls)
        #[arg(long)]
        file: PathBuf,

        /// Also screen every column against this threshold
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Count values above a threshold in every column (harmonic tables)
    Screen {
        /// Analyzer format of the export
        #[arg(long, required_unless_present = "harmonic")]
        vendor: Option<String>,

        /// Harmonic-order table: title row, time column, one column per order
        #[arg(long, conflicts_with = "vendor")]
        harmonic: bool,

        #[arg(long)]
        file: PathBuf,

        /// Defaults to PQ_SCREENING_THRESHOLD (5)
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Analyze many exports and append each summary to the output file
    Batch {
        #[arg(long)]
        vendor: String,

        #[arg(long)]
        profile: String,

        #[arg(long)]
        threshold: Option<f64>,

        /// JSON-lines output, defaults to PQ_OUTPUT_PATH
        #[arg(long)]
        output: Option<PathBuf>,

        /// Number of files analyzed in parallel, defaults to PQ_BATCH_CONCURRENCY
        #[arg(long)]
        parallel: Option<usize>,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List supported analyzer formats
    Vendors,
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if it exists (ignore errors if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,power_quality_service=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(catalog) = cli.catalog {
        config.catalog_path = catalog;
    }
    info!("Starting power-quality with config: {:?}", config);

    let service = AnalysisService::new();

    match cli.command {
        Command::Analyze {
            vendor,
            profile,
            file,
            threshold,
        } => {
            let catalog = AnalyzerCatalog::from_path(&config.catalog_path)?;
            let profile = catalog.get(&profile)?;
            let record = service.analyze(&vendor, &file, profile, threshold)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Screen {
            vendor,
            harmonic,
            file,
            threshold,
        } => {
            let threshold = threshold.unwrap_or(config.screening_threshold);
            let record = match vendor {
                Some(vendor) if !harmonic => service.screen(&vendor, &file, threshold)?,
                _ => service.screen_harmonic_table(&file, threshold)?,
            };
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Batch {
            vendor,
            profile,
            threshold,
            output,
            parallel,
            files,
        } => {
            // Reject bad tags before touching any file
            vendor.parse::<Vendor>()?;
            let catalog = AnalyzerCatalog::from_path(&config.catalog_path)?;
            let profile = Arc::new(catalog.get(&profile)?.clone());
            let output = output.unwrap_or(config.output_path);
            let parallel = parallel.unwrap_or(config.batch_concurrency);

            run_batch(service, &vendor, profile, threshold, output, parallel, files).await?;
        }
        Command::Vendors => {
            for tag in AnalysisService::supported_vendors() {
                println!("{tag}");
            }
        }
    }

    Ok(())
}

async fn run_batch(
    service: AnalysisService,
    vendor: &str,
    profile: Arc<AnalyzerProfile>,
    threshold: Option<f64>,
    output: PathBuf,
    parallel: usize,
    files: Vec<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository = Arc::new(JsonLinesSummaryRepository::open(&output)?);
    let batch = BatchService::new(service, repository, parallel);

    let jobs: Vec<BatchJob> = files
        .into_iter()
        .map(|path| BatchJob {
            path,
            vendor_tag: vendor.to_string(),
            profile: Arc::clone(&profile),
            threshold,
        })
        .collect();

    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files ({msg})")?
            .progress_chars("##-"),
    );

    let mut succeeded = 0;
    let mut failed = 0;
    let report = batch
        .run_with(jobs, |outcome| {
            if outcome.is_success() {
                succeeded += 1;
            } else {
                failed += 1;
            }
            pb.set_message(format!("{succeeded} successful, {failed} failed"));
            pb.inc(1);
        })
        .await;

    pb.finish_with_message(format!(
        "Complete: {} successful, {} failed",
        report.success_count(),
        report.failure_count()
    ));

    println!("\n============================================================");
    println!("Batch Analysis Summary");
    println!("============================================================");
    println!("Total Files:        {}", report.outcomes.len());
    println!("Successful:         {}", report.success_count());
    println!("Failed:             {}", report.failure_count());
    println!("Output:             {}", output.display());
    println!("Total Time:         {:.2}s", report.duration_secs);
    println!("============================================================");

    if report.failure_count() > 0 {
        println!("\nFailed Files:");
        for outcome in report.failures() {
            if let Err(e) = &outcome.result {
                println!("  {} [{}]: {e}", file_label(&outcome.path), e.stage());
            }
        }
        return Err(format!("{} files failed to analyze", report.failure_count()).into());
    }

    Ok(())
}
