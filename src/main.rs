// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{Config, MergeMode};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod archive;
mod config_rewriter;
mod errors;
mod file_utils;
mod language_utils;
mod pipeline;
mod providers;
mod segmenter;
mod translation_service;

/// CLI Wrapper for MergeMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliMergeMode {
    Add,
    Replace,
}

impl From<CliMergeMode> for MergeMode {
    fn from(cli_mode: CliMergeMode) -> Self {
        match cli_mode {
            CliMergeMode::Add => MergeMode::Add,
            CliMergeMode::Replace => MergeMode::Replace,
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
    /// Translate the text fields of a mod archive (default command)
    #[command(alias = "translate")]
    Translate(TranslateArgs),

    /// Generate shell completions for rwmodtrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input mod archive to translate
    #[arg(value_name = "INPUT_ARCHIVE")]
    input_path: PathBuf,

    /// Output archive path (default: <input>.<target>.<ext>)
    #[arg(short, long)]
    output_path: Option<PathBuf>,

    /// Force overwrite of an existing output archive
    #[arg(short, long)]
    force_overwrite: bool,

    /// Merge mode for translated values
    #[arg(short, long, value_enum)]
    merge_mode: Option<CliMergeMode>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// rwmodtrans - Rusted Warfare Mod Translator
///
/// Batch-translates the human-readable text fields inside a game-mod
/// archive while preserving structure, assets and formatting placeholders.
#[derive(Parser, Debug)]
#[command(name = "rwmodtrans")]
#[command(version = "1.0.0")]
#[command(about = "Batch translation of mod archive text fields")]
#[command(long_about = "rwmodtrans extracts a mod archive, translates the whitelisted text fields
of its config files, and repacks everything else unchanged.

EXAMPLES:
    rwmodtrans mymod.zip                        # Translate using default config
    rwmodtrans -s en -t fr mymod.zip            # English to French
    rwmodtrans -m replace mymod.zip             # Replace values instead of appending
    rwmodtrans -o out.zip -f mymod.zip          # Explicit output, overwrite allowed
    rwmodtrans completions bash                 # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

MERGE MODES:
    add     - keep the original value, append a '<key>_<target>' line
    replace - put the translation in the original slot, keep a '<key>_<source>' line")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input mod archive to translate
    #[arg(value_name = "INPUT_ARCHIVE")]
    input_path: Option<PathBuf>,

    /// Output archive path (default: <input>.<target>.<ext>)
    #[arg(short, long)]
    output_path: Option<PathBuf>,

    /// Force overwrite of an existing output archive
    #[arg(short, long)]
    force_overwrite: bool,

    /// Merge mode for translated values
    #[arg(short, long, value_enum)]
    merge_mode: Option<CliMergeMode>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

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

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
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
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
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
            generate(shell, &mut cmd, "rwmodtrans", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_ARCHIVE is required when no subcommand is specified")
            })?;

            let translate_args = TranslateArgs {
                input_path,
                output_path: cli.output_path,
                force_overwrite: cli.force_overwrite,
                merge_mode: cli.merge_mode,
                source_language: cli.source_language,
                target_language: cli.target_language,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_translate(translate_args).await
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        // Override config with CLI options if provided
        if let Some(mode) = &options.merge_mode {
            config.merge_mode = mode.clone().into();
        }

        if let Some(source_lang) = &options.source_language {
            config.source_language = source_lang.clone();
        }

        if let Some(target_lang) = &options.target_language {
            config.target_language = target_lang.clone();
        }

        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();

        if let Some(mode) = &options.merge_mode {
            config.merge_mode = mode.clone().into();
        }

        if let Some(source_lang) = &options.source_language {
            config.source_language = source_lang.clone();
        }

        if let Some(target_lang) = &options.target_language {
            config.target_language = target_lang.clone();
        }

        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    let output_path = options
        .output_path
        .clone()
        .unwrap_or_else(|| default_output_path(&options.input_path, &config.target_language));

    // Create controller and run the translation
    let controller = Controller::with_config(config)?;
    controller
        .run(options.input_path, output_path, options.force_overwrite)
        .await
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

/// Build the default output path `<stem>.<target>.<ext>` next to the input
fn default_output_path(input: &Path, target_language: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    let ext = input
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "zip".to_string());

    let filename = format!("{}.{}.{}", stem, target_language, ext);
    match input.parent() {
        Some(parent) => parent.join(filename),
        None => PathBuf::from(filename),
    }
}
