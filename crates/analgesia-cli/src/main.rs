use std::path::PathBuf;

use analgesia_cli::config::{self, AnalgesiaConfig};
use analgesia_cli::input;
use analgesia_core::models::patient::PatientContext;
use analgesia_dosing::conversion::{MmeSummary, TargetDoseReport};
use analgesia_dosing::methadone::{ConversionMethod, MethadoneRequest};
use analgesia_engine::ClinicalEngine;
use clap::{Parser, Subcommand};
use eyre::Result;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "analgesia")]
#[command(version)]
#[command(about = "Inpatient opioid decision support", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    /// Drug reference table to use instead of the bundled one
    #[arg(long, global = true)]
    knowledge_base: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommendations, gate failures, risk score and monitoring plan for a patient
    Assess {
        /// PatientContext JSON file, or '-' for stdin
        file: Option<PathBuf>,
    },

    /// Total MME of a regimen and equianalgesic target doses
    Mme {
        /// {"entries": [...], "context": {...}} JSON file, or '-' for stdin
        file: Option<PathBuf>,

        /// Cross-tolerance reduction in percent (defaults to the config value)
        #[arg(long)]
        reduction: Option<f64>,
    },

    /// Methadone starting dose for a total MME
    Methadone {
        /// Total daily MME being converted
        #[arg(long)]
        total_mme: f64,

        /// Optional PatientContext JSON file supplying age and organ status
        #[arg(long)]
        context: Option<PathBuf>,

        /// Three-step cross-titration instead of rapid conversion
        #[arg(long)]
        stepwise: bool,

        /// Manual cross-tolerance reduction in percent
        #[arg(long)]
        reduction: Option<f64>,

        /// Patient is in opioid use disorder treatment
        #[arg(long)]
        oud: bool,
    },

    /// PCA hourly and four-hour limits
    Pca {
        /// {"settings": {...}, "context": {...}} JSON file, or '-' for stdin
        file: Option<PathBuf>,
    },

    /// Continuous infusion totals and MME
    Drip {
        /// {"settings": {...}, "context": {...}} JSON file, or '-' for stdin
        file: Option<PathBuf>,
    },

    /// Show or initialise the user config
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective config and its location
    Show,
    /// Write a default config if none exists
    Init,
}

#[derive(Serialize)]
struct MmeOutput<'a> {
    summary: &'a MmeSummary,
    targets: &'a TargetDoseReport,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = config::load_config()?;
    init_tracing(cli.json_logs || config.json_logs);

    match cli.command {
        Commands::Config { action } => run_config(action, config),
        command => {
            let kb_path = cli.knowledge_base.or_else(|| config.knowledge_base_path.clone());
            let engine = match kb_path {
                Some(path) => ClinicalEngine::from_path(&path)?,
                None => ClinicalEngine::bundled()?,
            };
            run(command, &engine, &config)
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(command: Commands, engine: &ClinicalEngine, config: &AnalgesiaConfig) -> Result<()> {
    match command {
        Commands::Assess { file } => {
            let json = input::read_document(file.as_deref())?;
            print_json(&engine.assess_json(&json)?)
        }
        Commands::Mme { file, reduction } => {
            let json = input::read_document(file.as_deref())?;
            let request = input::parse_mme(&json)?;
            let summary = engine.total_mme(&request.entries, &request.context);
            let reduction = reduction
                .or(request.reduction_percent)
                .unwrap_or(config.default_cross_tolerance_reduction);
            let targets = engine.target_doses(summary.total_mme, reduction, &request.context)?;
            print_json(&MmeOutput {
                summary: &summary,
                targets: &targets,
            })
        }
        Commands::Methadone {
            total_mme,
            context,
            stepwise,
            reduction,
            oud,
        } => {
            let ctx = match context {
                Some(path) => PatientContext::from_json(&input::read_document(Some(path.as_path()))?)?,
                None => PatientContext::default(),
            };
            let method = if stepwise {
                ConversionMethod::Stepwise
            } else {
                ConversionMethod::Rapid
            };
            let mut request = MethadoneRequest::from_context(&ctx, total_mme, method);
            request.oud_context |= oud;
            request.manual_reduction_percent = reduction;
            print_json(&engine.methadone(&request))
        }
        Commands::Pca { file } => {
            let request = input::parse_pca(&input::read_document(file.as_deref())?)?;
            print_json(&engine.pca(&request.settings, &request.context)?)
        }
        Commands::Drip { file } => {
            let request = input::parse_drip(&input::read_document(file.as_deref())?)?;
            print_json(&engine.drip(&request.settings, &request.context)?)
        }
        Commands::Config { action } => run_config(action, config.clone()),
    }
}

fn run_config(action: ConfigAction, current: AnalgesiaConfig) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let path = config::config_path()?;
            tracing::info!(path = %path.display(), "config location");
            print_json(&current)
        }
        ConfigAction::Init => {
            let path = config::config_path()?;
            if path.exists() {
                tracing::info!(path = %path.display(), "config already exists");
                return Ok(());
            }
            config::save_config(&AnalgesiaConfig::default())?;
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
