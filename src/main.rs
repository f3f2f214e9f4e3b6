// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{Config, GenderLabelMode};
use app_controller::{Controller, ExtractionMode};

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod ordinal_utils;
mod speech_extractor;
mod wikidata;
mod works_stats;

/// CLI Wrapper for GenderLabelMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliGenderLabels {
    Full,
    Abbreviated,
}

impl From<CliGenderLabels> for GenderLabelMode {
    fn from(cli_mode: CliGenderLabels) -> Self {
        match cli_mode {
            CliGenderLabels::Full => GenderLabelMode::Full,
            CliGenderLabels::Abbreviated => GenderLabelMode::Abbreviated,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract per-character speech from TEI documents (default command)
    Extract(ExtractArgs),

    /// Aggregate works metadata tables into chart-data series
    Stats(StatsArgs),

    /// Enrich a works table with Wikidata person identifiers
    Enrich(EnrichArgs),

    /// Generate shell completions for dramatis
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ExtractArgs {
    /// Input directory with TEI XML documents
    #[arg(value_name = "INPUT_DIR")]
    input_directory: Option<PathBuf>,

    /// Output directory for the speech artifacts
    #[arg(short, long)]
    output_directory: Option<PathBuf>,

    /// Group speech by act (or scene of a single-act play)
    #[arg(short, long)]
    segmented: bool,

    /// Gender prefix style for artifact names
    #[arg(short, long, value_enum)]
    gender_labels: Option<CliGenderLabels>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct StatsArgs {
    /// Works table for works outside the reference corpus
    #[arg(value_name = "OUTSIDE_CSV")]
    outside_corpus: PathBuf,

    /// Works table for works in the reference corpus
    #[arg(value_name = "CORPUS_CSV")]
    in_corpus: PathBuf,

    /// Output directory for the chart-data artifacts
    #[arg(short, long)]
    output_directory: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct EnrichArgs {
    /// Works table with a wikidataId column
    #[arg(value_name = "WORKS_CSV")]
    input_table: PathBuf,

    /// Output table path (defaults to the input name plus _enriched)
    #[arg(short, long)]
    output_table: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// dramatis - drama corpus tooling
///
/// Extracts per-character speech from TEI play transcripts and aggregates
/// works metadata for a drama corpus of works by female authors.
#[derive(Parser, Debug)]
#[command(name = "dramatis")]
#[command(author = "dramatis contributors")]
#[command(version = "0.3.0")]
#[command(about = "TEI speech extraction and works-metadata tooling")]
#[command(long_about = "dramatis extracts per-character speech text from TEI play transcripts and
aggregates works metadata into chart-data series.

EXAMPLES:
    dramatis plays/                             # Extract speech using default config
    dramatis -s plays/                          # Group speech by act or scene
    dramatis -g full plays/                     # Male_/Female_ artifact prefixes
    dramatis -o out/ plays/                     # Write artifacts to out/
    dramatis stats outside.csv corpus.csv       # Aggregate works metadata
    dramatis enrich works.csv                   # Add Wikidata person ids
    dramatis --log-level debug plays/           # Process a directory with debug logging
    dramatis completions bash > dramatis.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

OUTPUT NAMING:
    Whole-play extraction writes {Gender}_{Title}_{Speaker}.txt; segmented
    extraction writes {Gender}_{Speaker}_{ActOrScene}.txt. The gender prefix
    is abbreviated (M/F/U) or full (Male/Female/Unknown) per --gender-labels.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input directory with TEI XML documents
    #[arg(value_name = "INPUT_DIR")]
    input_directory: Option<PathBuf>,

    /// Output directory for the speech artifacts
    #[arg(short, long)]
    output_directory: Option<PathBuf>,

    /// Group speech by act (or scene of a single-act play)
    #[arg(short, long)]
    segmented: bool,

    /// Gender prefix style for artifact names
    #[arg(short, long, value_enum)]
    gender_labels: Option<CliGenderLabels>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\u{274c} ",
            Level::Warn => "\u{1f6a7} ",
            Level::Info => " ",
            Level::Debug => "\u{1f50d} ",
            Level::Trace => "\u{1f4cb} ",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");

            let mut stderr = std::io::stderr();
            let emoji = Self::get_emoji_for_level(record.level());
            let color = match record.level() {
                Level::Error => "\x1B[1;31m",
                Level::Warn => "\x1B[1;33m",
                Level::Info => "\x1B[1;32m",
                Level::Debug => "\x1B[1;36m",
                Level::Trace => "\x1B[1;35m",
            };
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "dramatis", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Extract(args)) => run_extract(args),
        Some(Commands::Stats(args)) => run_stats(args),
        Some(Commands::Enrich(args)) => run_enrich(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let extract_args = ExtractArgs {
                input_directory: cli.input_directory,
                output_directory: cli.output_directory,
                segmented: cli.segmented,
                gender_labels: cli.gender_labels,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_extract(extract_args)
        }
    }
}

/// Load the configuration, creating a default file when none exists, and
/// apply the command-line log level.
fn load_config(config_path: &str, cli_log_level: Option<&CliLogLevel>) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = cli_log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    let config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        // Update log level in config if specified via command line
        if let Some(log_level) = cli_log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();

        // Apply command line log level to default config if specified
        if let Some(log_level) = cli_log_level {
            config.log_level = log_level.clone().into();
        }

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // If log level was not set via command line, update it from config now
    if cli_log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    Ok(config)
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

fn run_extract(options: ExtractArgs) -> Result<()> {
    let mut config = load_config(&options.config_path, options.log_level.as_ref())?;

    // Override config with CLI options if provided
    if let Some(input) = &options.input_directory {
        config.input_directory = input.to_string_lossy().to_string();
    }

    if let Some(output) = &options.output_directory {
        config.output_directory = output.to_string_lossy().to_string();
    }

    if let Some(mode) = &options.gender_labels {
        config.extraction.gender_labels = mode.clone().into();
    }

    if options.segmented {
        config.extraction.segmented = true;
    }

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    let mode = if config.extraction.segmented {
        ExtractionMode::Segmented
    } else {
        ExtractionMode::FullPlay
    };

    let controller = Controller::with_config(config)?;
    controller.run_extraction(mode)?;

    Ok(())
}

fn run_stats(options: StatsArgs) -> Result<()> {
    let mut config = load_config(&options.config_path, options.log_level.as_ref())?;

    if let Some(output) = &options.output_directory {
        config.output_directory = output.to_string_lossy().to_string();
    }

    config.validate()
        .context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;
    controller.run_stats(&options.outside_corpus, &options.in_corpus)
}

async fn run_enrich(options: EnrichArgs) -> Result<()> {
    let config = load_config(&options.config_path, options.log_level.as_ref())?;

    config.validate()
        .context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;
    controller.run_enrichment(&options.input_table, options.output_table).await
}
