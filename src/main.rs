// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::Write;
use std::path::PathBuf;

use shortcap::app_config::{self, Config, TranscriptionProvider};
use shortcap::app_controller::{Controller, PipelineResponse, load_transcript};
use shortcap::captions::build_subtitles;
use shortcap::file_utils::FileManager;

/// CLI Wrapper for TranscriptionProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranscriptionProvider {
    Whisper,
    #[value(name = "assemblyai")]
    AssemblyAI,
}

impl From<CliTranscriptionProvider> for TranscriptionProvider {
    fn from(cli_provider: CliTranscriptionProvider) -> Self {
        match cli_provider {
            CliTranscriptionProvider::Whisper => TranscriptionProvider::Whisper,
            CliTranscriptionProvider::AssemblyAI => TranscriptionProvider::AssemblyAI,
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

/// Options that override conf.json
#[derive(Args, Debug, Clone)]
struct ConfigArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Transcription provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranscriptionProvider>,

    /// Spoken language code (e.g., 'en', 'es', 'fra')
    #[arg(long)]
    language: Option<String>,

    /// Maximum characters per caption line
    #[arg(long)]
    max_line_len: Option<usize>,

    /// Pin captions to the top of the frame
    #[arg(long)]
    force_top: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clip, transcribe and caption a video section (default command)
    Process(ProcessArgs),

    /// Build a subtitle document from a transcript file
    Captions(CaptionsArgs),

    /// Generate shell completions for shortcap
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ProcessArgs {
    /// Source video URL
    #[arg(value_name = "URL")]
    url: String,

    /// Clip start (ss, mm:ss or hh:mm:ss)
    #[arg(short, long)]
    start: String,

    /// Clip end (ss, mm:ss or hh:mm:ss)
    #[arg(short, long)]
    end: String,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Parser, Debug)]
struct CaptionsArgs {
    /// Plain-text transcript, or a JSON transcript with word timings
    #[arg(value_name = "TRANSCRIPT_FILE")]
    transcript_file: PathBuf,

    /// Output subtitle file (defaults to <subs_dir>/<name>.ass)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    config: ConfigArgs,
}

/// shortcap - short clips with burned-in captions
///
/// Downloads a section of a video, transcribes it and burns captions into it.
#[derive(Parser, Debug)]
#[command(name = "shortcap")]
#[command(version = "0.1.0")]
#[command(about = "Clip a video section and burn auto-generated captions into it")]
#[command(long_about = "shortcap downloads a section of a video, transcribes its audio and burns the captions back in.

EXAMPLES:
    shortcap https://youtu.be/xyz -s 1:00 -e 1:30          # Clip, transcribe and caption
    shortcap process https://youtu.be/xyz -s 90 -e 120     # Same, explicit subcommand
    shortcap -p assemblyai --force-top URL -s 0 -e 45      # Remote engine, captions on top
    shortcap captions transcript.txt -o subs/test.ass      # Only build the subtitle document
    shortcap completions bash > shortcap.bash              # Generate bash completions

OUTPUT:
    The result is printed on stdout as JSON: {\"transcript\": ..., \"videoPath\": ...}
    or {\"error\": ...}. The exit status is 1 when the run failed.

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Source video URL
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Clip start (ss, mm:ss or hh:mm:ss)
    #[arg(short, long)]
    start: Option<String>,

    /// Clip end (ss, mm:ss or hh:mm:ss)
    #[arg(short, long)]
    end: Option<String>,

    #[command(flatten)]
    config: ConfigArgs,
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
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", colour, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config or the command line says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "shortcap", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Process(args)) => run_process(args).await,
        Some(Commands::Captions(args)) => run_captions(args),
        None => {
            let url = cli
                .url
                .ok_or_else(|| anyhow!("URL is required when no subcommand is specified"))?;
            let start = cli.start.ok_or_else(|| anyhow!("--start is required"))?;
            let end = cli.end.ok_or_else(|| anyhow!("--end is required"))?;

            run_process(ProcessArgs {
                url,
                start,
                end,
                config: cli.config,
            })
            .await
        }
    }
}

// @loads: Config file with command-line overrides applied and validated
fn load_config(options: &ConfigArgs) -> Result<Config> {
    // Apply a command-line level right away so config loading is logged at that level
    if let Some(cli_level) = &options.log_level {
        let level: app_config::LogLevel = cli_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let (mut config, created) = Config::load_or_create(&options.config_path)?;
    if created {
        warn!(
            "Config file not found at '{}', created default config.",
            options.config_path.display()
        );
    }

    if let Some(provider) = &options.provider {
        config.transcription.provider = provider.clone().into();
    }

    if let Some(language) = &options.language {
        config.transcription.language = Some(language.clone());
    }

    if let Some(max_line_len) = options.max_line_len {
        config.captions.max_line_len = max_line_len;
    }

    if options.force_top {
        config.style.force_top = true;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    Ok(config)
}

/// Config and workspace setup for a pipeline run
fn prepare_controller(options: &ConfigArgs) -> Result<Controller> {
    let config = load_config(options)?;

    FileManager::ensure_workspace(&config.workspace).context("Failed to prepare workspace directories")?;

    info!(
        "shortcap: {} ({})",
        config.transcription.provider.display_name(),
        config.transcription.get_model()
    );

    Ok(Controller::with_config(config))
}

async fn run_process(args: ProcessArgs) -> Result<()> {
    let response = match prepare_controller(&args.config) {
        Ok(controller) => controller.respond(&args.url, &args.start, &args.end).await,
        Err(e) => {
            error!("Setup failed: {:#}", e);
            PipelineResponse::from(e)
        }
    };

    let payload = serde_json::to_string_pretty(&response).context("Failed to serialize response")?;
    println!("{}", payload);

    if let PipelineResponse::Failure { .. } = response {
        std::process::exit(1);
    }
    Ok(())
}

fn run_captions(args: CaptionsArgs) -> Result<()> {
    let config = load_config(&args.config)?;

    let transcript = load_transcript(&args.transcript_file)
        .with_context(|| format!("Failed to load transcript: {}", args.transcript_file.display()))?;

    let output = args.output.unwrap_or_else(|| {
        let stem = args.transcript_file.file_stem().unwrap_or_default();
        config.workspace.subs_dir.join(stem).with_extension("ass")
    });

    let document = build_subtitles(&transcript, &config.captions, &config.style);
    let path = document
        .write_to_file(&output)
        .with_context(|| format!("Failed to write subtitles: {}", output.display()))?;

    info!("Wrote {} caption(s) to {}", document.cues().len(), path.display());
    println!("{}", path.display());
    Ok(())
}
