//! Binary entry point for symptom-advisor.
//!
//! This binary provides the command-line interface to the advisor.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow unnecessary_wraps for consistent command function signatures
#![allow(clippy::unnecessary_wraps)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use symptom_advisor::config::CONFIG_PATH_ENV;
use symptom_advisor::models::normalize_token;
use symptom_advisor::observability;
use symptom_advisor::rendering::{format_history, format_stats, format_tips};
use symptom_advisor::{
    AdvisorConfig, AdvisorService, HealthStore, HistoryService, SqliteHealthStore, TipCategory,
    TipPersonalizer, Vocabulary,
};

/// Symptom Advisor - a local symptom-to-diagnosis assistant.
///
/// Not a medical device. Always consult a healthcare professional.
#[derive(Parser)]
#[command(name = "symptom-advisor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List recognized symptoms.
    Symptoms,

    /// Analyze symptoms and record the top diagnosis.
    Diagnose {
        /// Symptoms, e.g. `fever "chest pain" shortness_of_breath`.
        #[arg(required = true)]
        symptoms: Vec<String>,
    },

    /// Show recent diagnoses.
    History {
        /// Maximum number of records.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show health tips, personalized from history unless a category is given.
    Tips {
        /// Category: general, nutrition or `mental_health`.
        #[arg(long)]
        category: Option<String>,
    },

    /// Show database statistics.
    Stats,

    /// Manage configuration.
    Config {
        /// Show current configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, config: AdvisorConfig) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Symptoms => cmd_symptoms(),
        Commands::Diagnose { symptoms } => cmd_diagnose(&config, symptoms),
        Commands::History { limit } => cmd_history(&config, limit),
        Commands::Tips { category } => cmd_tips(&config, category),
        Commands::Stats => cmd_stats(&config),
        Commands::Config { show } => cmd_config(config, show),
    }
}

/// Loads configuration.
fn load_config(path: Option<&str>) -> Result<AdvisorConfig, Box<dyn std::error::Error>> {
    if let Some(config_path) = path {
        return AdvisorConfig::load_from_file(Path::new(config_path)).map_err(Into::into);
    }

    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        if !config_path.trim().is_empty() {
            return AdvisorConfig::load_from_file(Path::new(&config_path)).map_err(Into::into);
        }
    }

    Ok(AdvisorConfig::load_default())
}

/// Opens the configured store.
fn open_store(config: &AdvisorConfig) -> Result<Arc<dyn HealthStore>, Box<dyn std::error::Error>> {
    let store = SqliteHealthStore::new(config.database_path())?;
    Ok(Arc::new(store))
}

/// Symptoms command.
fn cmd_symptoms() -> Result<(), Box<dyn std::error::Error>> {
    let vocabulary = Vocabulary::builtin();
    println!("AVAILABLE SYMPTOMS ({})", vocabulary.len());
    println!();
    for symptom in vocabulary.symptoms() {
        println!("  {:<24} {}", symptom.display_name(), symptom.as_str());
    }
    Ok(())
}

/// Diagnose command.
fn cmd_diagnose(
    config: &AdvisorConfig,
    symptoms: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let advisor = AdvisorService::new(&config.engine, config.tips, store)?;

    let vocabulary = advisor.engine().vocabulary();
    let ignored: Vec<&str> = symptoms
        .iter()
        .map(String::as_str)
        .filter(|raw| !vocabulary.contains(&normalize_token(raw)))
        .collect();
    if !ignored.is_empty() {
        eprintln!("Ignoring unrecognized symptoms: {}", ignored.join(", "));
    }

    let outcome = advisor.diagnose(symptoms.as_slice());
    if outcome.results.is_empty() {
        println!("No diagnosis found. Please consult a doctor.");
        return Ok(());
    }

    println!("{}", outcome.report);
    if outcome.saved {
        println!();
        println!("Saved to database!");
    }
    Ok(())
}

/// History command.
fn cmd_history(
    config: &AdvisorConfig,
    limit: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let history = HistoryService::new(open_store(config)?);
    let records = history.recent(limit.unwrap_or(config.history_limit));
    println!("{}", format_history(&records));
    Ok(())
}

/// Tips command.
fn cmd_tips(
    config: &AdvisorConfig,
    category: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    config.tips.validate()?;
    let personalizer = TipPersonalizer::new(open_store(config)?, config.tips);

    let (tips, title) = match category {
        Some(name) => {
            let category = TipCategory::parse(&name)
                .ok_or_else(|| format!("unknown tip category: {name}"))?;
            let title = format!("{} Tips", symptom_advisor::models::display_name(category.as_str()));
            (personalizer.category_tips(category), title)
        },
        None => personalizer.smart_tips(),
    };

    println!("{}", format_tips(&title, &tips));
    Ok(())
}

/// Stats command.
fn cmd_stats(config: &AdvisorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let path = config.database_path();
    let history = HistoryService::new(open_store(config)?);
    println!("{}", format_stats(&history.stats(), &path));
    Ok(())
}

/// Config command.
fn cmd_config(config: AdvisorConfig, show: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !show {
        println!("Use --show to display configuration");
        return Ok(());
    }

    println!("Current Configuration");
    println!("=====================");
    println!();
    println!("Data Directory: {}", config.data_dir.display());
    println!("Database: {}", config.database_path().display());
    println!("History Limit: {}", config.history_limit);
    println!();
    println!("Engine:");
    println!("  Model: {}", config.engine.model.as_str());
    println!("  Samples Per Condition: {}", config.engine.samples_per_condition);
    println!("  Noise Probability: {}", config.engine.noise_probability);
    println!("  Confidence Threshold: {}", config.engine.confidence_threshold);
    println!("  Max Results: {}", config.engine.max_results);
    println!(
        "  Max Depth: {}",
        config
            .engine
            .max_depth
            .map_or_else(|| "(unlimited)".to_string(), |d| d.to_string())
    );
    println!(
        "  Seed: {}",
        config
            .engine
            .seed
            .map_or_else(|| "(entropy)".to_string(), |s| s.to_string())
    );
    println!();
    println!("Tips:");
    println!("  Max Tips: {}", config.tips.max_tips);
    println!("  Specific Floor: {}", config.tips.specific_floor);
    println!("  Padding Floor: {}", config.tips.padding_floor);
    println!("  Tips Per Condition: {}", config.tips.tips_per_condition);
    println!("  Recent Conditions: {}", config.tips.recent_conditions);
    println!();
    println!("Logging:");
    println!(
        "  Format: {}",
        config.logging.format.as_deref().unwrap_or("(default)")
    );
    println!(
        "  Filter: {}",
        config.logging.filter.as_deref().unwrap_or("(default)")
    );
    println!(
        "  File: {}",
        config
            .logging
            .file
            .as_ref()
            .map_or_else(|| "(stderr)".to_string(), |f| f.display().to_string())
    );
    Ok(())
}
