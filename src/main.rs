use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use career_relative::calculate::analyze;
use career_relative::config::{AppConfig, DEFAULT_CONFIG_PATH};
use career_relative::models::{AnalysisRole, Metric};
use career_relative::storage::{corpus_source, write_json, JsonlWriter};

#[derive(Parser)]
#[command(name = "career-relative")]
#[command(about = "Pairwise career relative-performance comparisons from scenario scoreboards")]
#[command(version)]
struct Cli {
    /// Path to configuration file (defaults to ./career-relative.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare careers pairwise over a scenario corpus
    Compare {
        /// Corpus JSON file, or a glob pattern matching several
        #[arg(long)]
        corpus: String,

        /// Analysis role: "offense" or "support"
        #[arg(long)]
        role: Option<AnalysisRole>,

        /// Metric to analyse; repeat or comma-separate for several
        #[arg(long = "metric", value_delimiter = ',')]
        metrics: Vec<Metric>,

        /// Fraction of the faction's top performer below which entries are skipped
        #[arg(long)]
        late_join_threshold: Option<f64>,

        /// Fraction of each pair's worst samples to drop
        #[arg(long)]
        trim_worst: Option<f64>,

        /// Scale values by 80 / renown rank
        #[arg(long)]
        normalize: bool,

        /// Shard the corpus across threads
        #[arg(long)]
        parallel: bool,

        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also export one JSONL line per career pair
        #[arg(long)]
        cells: Option<PathBuf>,

        /// Emit the plain faction/metric/career/career map instead of matrices
        #[arg(long)]
        nested: bool,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).with_context(|| {
        format!(
            "Failed to load config from {:?}",
            cli.config.as_deref().unwrap_or(Path::new(DEFAULT_CONFIG_PATH))
        )
    })?;

    // Initialize tracing
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!("Starting career-relative v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Compare {
            corpus,
            role,
            metrics,
            late_join_threshold,
            trim_worst,
            normalize,
            parallel,
            output,
            cells,
            nested,
        } => {
            let analysis = &mut config.analysis;
            if let Some(role) = role {
                analysis.role = role;
            }
            if !metrics.is_empty() {
                analysis.metrics = metrics;
            }
            if let Some(threshold) = late_join_threshold {
                analysis.late_join_threshold = threshold;
            }
            if let Some(fraction) = trim_worst {
                analysis.trim_worst_fraction = fraction;
            }
            analysis.normalize_by_progression |= normalize;
            analysis.parallel |= parallel;
            config.validate().context("Invalid analysis settings")?;

            let source = corpus_source(&corpus);
            tracing::info!("Loading corpus from {}", source.describe());
            let corpus = source
                .load()
                .with_context(|| format!("Failed to load corpus from {}", source.describe()))?;
            tracing::info!(
                "Loaded {} matches with {} scoreboard entries",
                corpus.len(),
                corpus.participant_count()
            );

            let rosters = config.roster.rosters();
            let report = analyze(&corpus, &rosters, &config.analysis)?;

            if let Some(path) = cells {
                let count = JsonlWriter::new(path.clone())
                    .write_all(&report.flat_cells())
                    .with_context(|| format!("Failed to write cells to {:?}", path))?;
                tracing::info!("Exported {} cells", count);
            }

            let filled: usize = report.matrices.iter().map(|m| m.filled_cells()).sum();
            let rendered = if nested {
                serde_json::to_value(report.nested())?
            } else {
                serde_json::to_value(&report)?
            };

            match output {
                Some(path) => {
                    write_json(&path, &rendered)
                        .with_context(|| format!("Failed to write report to {:?}", path))?;
                    println!("\n=== Comparison Results ===");
                    println!("Role:             {}", report.role);
                    println!("Matches:          {}", report.matches);
                    println!("Matrices:         {}", report.matrices.len());
                    println!("Cells with data:  {}", filled);
                    println!("Report:           {}", path.display());
                }
                None => {
                    println!("{}", serde_json::to_string_pretty(&rendered)?);
                }
            }
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
