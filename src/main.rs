// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use crate::app_controller::Controller;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod subtitle_processor;
mod time_resolver;
mod ttml_document;

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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a TTML document to SubRip (default command)
    Convert(ConvertArgs),

    /// Generate shell completions for ttml2srt
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// TTML subtitle file or directory to process
    #[arg(value_name = "TTML_PATH")]
    input_path: PathBuf,

    /// File to write the resulting SRT to (stdout when omitted; ignored for directories)
    #[arg(value_name = "OUTPUT_FILE")]
    output_file: Option<PathBuf>,

    /// Shift all timestamps by this many milliseconds (may be negative)
    #[arg(short, long, value_name = "ms", allow_negative_numbers = true)]
    shift: Option<i64>,

    /// Frames per second assumed when the document declares none (default: 23.976)
    #[arg(short, long, value_name = "fps")]
    fps: Option<f64>,

    /// Source duration in seconds, for retiming
    #[arg(long = "s-dur", value_name = "sec")]
    source_duration: Option<u64>,

    /// Target duration in seconds, for retiming
    #[arg(long = "t-dur", value_name = "sec")]
    target_duration: Option<u64>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Force overwrite of existing output files
    #[arg(short = 'F', long)]
    force_overwrite: bool,

    /// Abort on the first cue whose timing cannot be resolved instead of skipping it
    #[arg(long)]
    strict: bool,
}

/// ttml2srt - Convert subtitles from TTML documents to SubRip (SRT)
#[derive(Parser, Debug)]
#[command(name = "ttml2srt")]
#[command(version = "1.0.0")]
#[command(about = "Convert subtitles from TTML documents to SubRip (SRT)")]
#[command(long_about = "ttml2srt resolves every TTML time notation (clock+frame, clock+fraction,
tick/second/minute/hour/millisecond/frame offsets) against the document's
declared frame rate and tick rate, merges overlapping cues, and writes
standard SubRip output.

EXAMPLES:
    ttml2srt subs.ttml                       # Convert to stdout
    ttml2srt subs.ttml subs.srt              # Convert to a file
    ttml2srt -s 2000 subs.ttml subs.srt      # Shift all cues 2 seconds later
    ttml2srt -f 25 subs.ttml                 # Assume 25 fps when undeclared
    ttml2srt --s-dur 1435 --t-dur 1492 subs.ttml   # Retime to a longer cut
    ttml2srt /subtitles/                     # Convert a whole directory
    ttml2srt completions bash > ttml2srt.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// TTML subtitle file or directory to process
    #[arg(value_name = "TTML_PATH")]
    input_path: Option<PathBuf>,

    /// File to write the resulting SRT to (stdout when omitted; ignored for directories)
    #[arg(value_name = "OUTPUT_FILE")]
    output_file: Option<PathBuf>,

    /// Shift all timestamps by this many milliseconds (may be negative)
    #[arg(short, long, value_name = "ms", allow_negative_numbers = true)]
    shift: Option<i64>,

    /// Frames per second assumed when the document declares none (default: 23.976)
    #[arg(short, long, value_name = "fps")]
    fps: Option<f64>,

    /// Source duration in seconds, for retiming
    #[arg(long = "s-dur", value_name = "sec")]
    source_duration: Option<u64>,

    /// Target duration in seconds, for retiming
    #[arg(long = "t-dur", value_name = "sec")]
    target_duration: Option<u64>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Force overwrite of existing output files
    #[arg(short = 'F', long)]
    force_overwrite: bool,

    /// Abort on the first cue whose timing cannot be resolved instead of skipping it
    #[arg(long)]
    strict: bool,
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
    fn color_for_level(level: Level) -> &'static str {
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
            let color = Self::color_for_level(record.level());

            // Logs go to stderr; stdout is reserved for SubRip output
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

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "ttml2srt", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Convert(args)) => run_convert(args),
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("TTML_PATH is required when no subcommand is specified")
            })?;

            let convert_args = ConvertArgs {
                input_path,
                output_file: cli.output_file,
                shift: cli.shift,
                fps: cli.fps,
                source_duration: cli.source_duration,
                target_duration: cli.target_duration,
                config_path: cli.config_path,
                log_level: cli.log_level,
                force_overwrite: cli.force_overwrite,
                strict: cli.strict,
            };
            run_convert(convert_args)
        }
    }
}

fn run_convert(options: ConvertArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;
        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(shift) = options.shift {
        config.timing.shift_ms = shift;
    }
    if let Some(fps) = options.fps {
        config.timing.frame_rate = fps;
    }
    if let Some(sdur) = options.source_duration {
        config.timing.source_duration_secs = Some(sdur);
    }
    if let Some(tdur) = options.target_duration {
        config.timing.target_duration_secs = Some(tdur);
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    // Create controller
    let controller = Controller::with_config(config)?;

    // Run the controller with the input file or directory
    if options.input_path.is_file() {
        controller.run(
            options.input_path,
            options.output_file,
            options.force_overwrite,
            options.strict,
        )
    } else if options.input_path.is_dir() {
        controller.run_folder(options.input_path, options.force_overwrite, options.strict)
    } else {
        Err(anyhow!("Input path does not exist: {:?}", options.input_path))
    }
}
