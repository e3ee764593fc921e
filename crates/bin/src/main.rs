//! Inquiry CLI binary.
//!
//! Builds per-entity inquiry feature tables from onboarding event files.

mod logging;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use inquiry::OnboardingPipeline;
use inquiry_data::{FileLister, LocalFileLister, LocalTableLoader};
use inquiry_features::{FeatureSet, InquiryConfig};
use inquiry_output::{
    CoverageReport, ExportFormat, Exporter, TableFormat, catalog_records, export_feature_table,
    write_feature_table,
};
use logging::{LogFormat, init_logging, logging_config_from_env};
use polars::prelude::*;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "inquiry")]
#[command(about = "Inquiry: per-entity credit inquiry features", long_about = None)]
#[command(version)]
struct Cli {
    /// Log output format (overrides INQUIRY_LOG_FORMAT)
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the feature table from inquiry event files
    Build {
        /// Input files (Parquet or CSV), stacked in the given order
        inputs: Vec<PathBuf>,

        /// Directory holding the buckets
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Bucket to list when no input files are given
        #[arg(long)]
        bucket: Option<String>,

        /// Key prefix within the bucket
        #[arg(long, default_value = "")]
        prefix: String,

        /// Load only the listed file at this position
        #[arg(long)]
        index: Option<usize>,

        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Output format (csv, json or ndjson)
        #[arg(long, default_value = "csv")]
        format: TableFormat,

        /// Write a slice coverage report (CSV or JSON by extension)
        #[arg(long)]
        coverage: Option<PathBuf>,
    },

    /// List the files a build would read
    List {
        /// Directory holding the buckets
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Bucket to list
        #[arg(long)]
        bucket: String,

        /// Key prefix within the bucket
        #[arg(long, default_value = "")]
        prefix: String,
    },

    /// Print the feature columns a configuration produces
    Columns {
        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&logging_config_from_env(cli.log_format))?;

    match cli.command {
        Commands::Build {
            inputs,
            root,
            bucket,
            prefix,
            index,
            config,
            output,
            format,
            coverage,
        } => {
            let config = load_config(config.as_deref())?;
            let pipeline =
                OnboardingPipeline::new(LocalFileLister::new(root), LocalTableLoader::default(), config)?;

            let data = if !inputs.is_empty() {
                let locations: Vec<String> = inputs
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned())
                    .collect();
                load_with_progress(&pipeline, &locations)?
            } else if let Some(bucket) = bucket {
                match index {
                    Some(_) => pipeline.load(&bucket, &prefix, index)?,
                    None => load_with_progress(&pipeline, &pipeline.list(&bucket, &prefix)?)?,
                }
            } else {
                return Err("either input files or --bucket is required".into());
            };

            let set = pipeline.build(data)?;
            write_features(set.features.clone(), output.as_deref(), format)?;
            if let Some(path) = coverage {
                write_coverage(&set, &pipeline.config().entity_column, &path)?;
            }
        }
        Commands::List {
            root,
            bucket,
            prefix,
        } => {
            let locations = LocalFileLister::new(root).list(&bucket, &prefix)?;
            if locations.is_empty() {
                eprintln!("No files found under {}/{}", bucket, prefix);
            }
            for (i, location) in locations.iter().enumerate() {
                println!("{:4}  {}", i, location);
            }
        }
        Commands::Columns { config, json } => {
            let records = catalog_records(&load_config(config.as_deref())?);
            if json {
                println!("{}", records.export_to_string(ExportFormat::PrettyJson)?);
            } else {
                for record in &records {
                    println!("{:40} {}", record.name, record.description);
                }
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<InquiryConfig, Box<dyn Error>> {
    let config: InquiryConfig = match path {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => InquiryConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn load_with_progress(
    pipeline: &OnboardingPipeline<LocalFileLister, LocalTableLoader>,
    locations: &[String],
) -> Result<DataFrame, Box<dyn Error>> {
    let pb = ProgressBar::new(locations.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Loading inquiry files...");

    match pipeline.load_locations(locations, |_| pb.inc(1)) {
        Ok(data) => {
            pb.finish_with_message(format!("Loaded {} rows", data.height()));
            Ok(data)
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            Err(e.into())
        }
    }
}

fn write_features(
    mut features: DataFrame,
    output: Option<&Path>,
    format: TableFormat,
) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => {
            export_feature_table(&mut features, path, format)?;
            info!(path = %path.display(), entities = features.height(), "wrote feature table");
        }
        None => write_feature_table(&mut features, format, std::io::stdout().lock())?,
    }
    Ok(())
}

fn write_coverage(set: &FeatureSet, entity_column: &str, path: &Path) -> Result<(), Box<dyn Error>> {
    let report = CoverageReport::from_feature_set(set, entity_column);
    report.export_to_file(path, ExportFormat::from_path(path))?;
    eprint!("{}", report);
    Ok(())
}
