use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Where run artifacts are written
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// External binaries
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Clip download settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Speech-to-text settings
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Line wrapping and timing
    #[serde(default)]
    pub captions: CaptionConfig,

    /// Subtitle document style
    #[serde(default)]
    pub style: StyleConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Directories holding intermediate and final files
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WorkspaceConfig {
    // @field: Trimmed clips and extracted audio
    #[serde(default = "default_downloads_dir")]
    pub downloads_dir: PathBuf,

    // @field: Generated subtitle documents
    #[serde(default = "default_subs_dir")]
    pub subs_dir: PathBuf,

    // @field: Captioned videos
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            downloads_dir: default_downloads_dir(),
            subs_dir: default_subs_dir(),
            output_dir: default_output_dir(),
        }
    }
}

/// Paths of the external binaries the pipeline shells out to
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolsConfig {
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: PathBuf,

    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    #[serde(default = "default_whisper_path")]
    pub whisper_path: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: default_ytdlp_path(),
            ffmpeg_path: default_ffmpeg_path(),
            whisper_path: default_whisper_path(),
        }
    }
}

/// How the clip is obtained from the source
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FetchStrategy {
    // @strategy: Let the downloader cut the requested section
    #[default]
    Sections,
    // @strategy: Resolve the media URL, then cut it with the transcoder
    Stream,
}

/// Clip download configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FetchConfig {
    #[serde(default)]
    pub strategy: FetchStrategy,

    /// Downloader format selector
    #[serde(default = "default_fetch_format")]
    pub format: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            strategy: FetchStrategy::default(),
            format: default_fetch_format(),
        }
    }
}

/// Transcription engine type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProvider {
    // @provider: Local whisper command-line tool
    #[default]
    Whisper,
    // @provider: AssemblyAI HTTP API
    AssemblyAI,
}

impl TranscriptionProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Whisper => "Whisper",
            Self::AssemblyAI => "AssemblyAI",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Whisper => "whisper".to_string(),
            Self::AssemblyAI => "assemblyai".to_string(),
        }
    }

    /// Whether the engine is reached over the network
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::AssemblyAI)
    }
}

impl std::fmt::Display for TranscriptionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranscriptionProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "whisper" => Ok(Self::Whisper),
            "assemblyai" => Ok(Self::AssemblyAI),
            _ => Err(anyhow!("Invalid transcription provider: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds for one transcription
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Delay between job status checks
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranscriptionProvider) -> Self {
        match provider_type {
            TranscriptionProvider::Whisper => Self {
                provider_type: "whisper".to_string(),
                model: default_whisper_model(),
                api_key: String::new(),
                endpoint: String::new(),
                timeout_secs: default_timeout_secs(),
                poll_interval_ms: default_poll_interval_ms(),
            },
            TranscriptionProvider::AssemblyAI => Self {
                provider_type: "assemblyai".to_string(),
                model: String::new(),
                api_key: String::new(),
                endpoint: default_assemblyai_endpoint(),
                timeout_secs: default_timeout_secs(),
                poll_interval_ms: default_poll_interval_ms(),
            },
        }
    }
}

/// Transcription service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionConfig {
    /// Transcription provider to use
    #[serde(default)]
    pub provider: TranscriptionProvider,

    /// Spoken language (ISO 639), detected by the engine when unset
    #[serde(default)]
    pub language: Option<String>,

    /// Available transcription providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            provider: TranscriptionProvider::default(),
            language: None,
            available_providers: vec![
                ProviderConfig::new(TranscriptionProvider::Whisper),
                ProviderConfig::new(TranscriptionProvider::AssemblyAI),
            ],
        }
    }
}

impl TranscriptionConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranscriptionProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        match self.provider {
            TranscriptionProvider::Whisper => default_whisper_model(),
            TranscriptionProvider::AssemblyAI => String::new(),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        // The local tool doesn't use API keys
        String::new()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranscriptionProvider::Whisper => String::new(),
            TranscriptionProvider::AssemblyAI => default_assemblyai_endpoint(),
        }
    }

    /// Get the timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .filter(|t| *t > 0)
            .unwrap_or_else(default_timeout_secs)
    }

    /// Get the job polling interval for the active provider
    pub fn get_poll_interval_ms(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.poll_interval_ms)
            .filter(|t| *t > 0)
            .unwrap_or_else(default_poll_interval_ms)
    }
}

/// How cue windows are computed
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimingStrategy {
    /// Same duration for every line
    #[default]
    Fixed,
    /// Follow the engine's word timestamps
    WordAligned,
}

/// Caption line and timing settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CaptionConfig {
    /// Maximum characters per caption line
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,

    /// Duration of each cue for fixed timing
    #[serde(default = "default_seconds_per_line")]
    pub seconds_per_line: u64,

    #[serde(default)]
    pub timing: TimingStrategy,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            max_line_len: default_max_line_len(),
            seconds_per_line: default_seconds_per_line(),
            timing: TimingStrategy::default(),
        }
    }
}

/// Header and style record of the subtitle document
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StyleConfig {
    pub title: String,
    pub play_res_x: u32,
    pub play_res_y: u32,

    /// Style name referenced by every event
    pub name: String,
    pub font_name: String,
    pub font_size: u32,

    /// `&HAABBGGRR`
    pub primary_colour: String,
    pub back_colour: String,

    pub bold: bool,
    pub italic: bool,
    pub border_style: u8,
    pub outline: u32,
    pub shadow: u32,

    /// Numpad layout: 1-3 bottom, 4-6 middle, 7-9 top
    pub alignment: u8,
    pub margin_l: u32,
    pub margin_r: u32,
    pub margin_v: u32,
    pub encoding: u32,

    /// Prefix every event with the top-alignment override tag
    pub force_top: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            title: "Captions".to_string(),
            play_res_x: 1280,
            play_res_y: 720,
            name: "Default".to_string(),
            font_name: "Arial".to_string(),
            font_size: 36,
            primary_colour: "&H00FFFFFF".to_string(),
            back_colour: "&H00000000".to_string(),
            bold: true,
            italic: false,
            border_style: 1,
            outline: 2,
            shadow: 1,
            alignment: 2,
            margin_l: 20,
            margin_r: 20,
            margin_v: 30,
            encoding: 1,
            force_top: false,
        }
    }
}

impl StyleConfig {
    /// Large bold captions pinned to the top of the frame
    pub fn bold_top() -> Self {
        Self {
            title: "Styled Captions".to_string(),
            name: "BoldColor".to_string(),
            font_size: 48,
            primary_colour: "&H00FFFF00".to_string(),
            outline: 3,
            margin_l: 30,
            margin_r: 30,
            force_top: true,
            ..Self::default()
        }
    }

    /// Fields that end up inside comma-separated records
    fn record_fields(&self) -> [(&'static str, &str); 5] {
        [
            ("title", self.title.as_str()),
            ("name", self.name.as_str()),
            ("font_name", self.font_name.as_str()),
            ("primary_colour", self.primary_colour.as_str()),
            ("back_colour", self.back_colour.as_str()),
        ]
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_downloads_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_subs_dir() -> PathBuf {
    PathBuf::from("subs")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_ytdlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_whisper_path() -> PathBuf {
    PathBuf::from("whisper")
}

fn default_fetch_format() -> String {
    "bestvideo+bestaudio/best".to_string()
}

fn default_timeout_secs() -> u64 {
    600 // transcription of a long clip can take minutes
}

fn default_poll_interval_ms() -> u64 {
    3000
}

fn default_whisper_model() -> String {
    "base".to_string()
}

fn default_assemblyai_endpoint() -> String {
    "https://api.assemblyai.com".to_string()
}

fn default_max_line_len() -> usize {
    40
}

fn default_seconds_per_line() -> u64 {
    2
}

impl Config {
    /// Load a config file, or write and return the defaults when it does not exist.
    ///
    /// The flag is `true` when the defaults were written.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok((config, false));
        }

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok((config, true))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.captions.max_line_len == 0 {
            return Err(anyhow!("captions.max_line_len must be at least 1"));
        }

        if self.captions.seconds_per_line == 0 {
            return Err(anyhow!("captions.seconds_per_line must be at least 1"));
        }

        if self.style.play_res_x == 0 || self.style.play_res_y == 0 {
            return Err(anyhow!(
                "Invalid style resolution {}x{}",
                self.style.play_res_x, self.style.play_res_y
            ));
        }

        for (field, value) in self.style.record_fields() {
            if value.contains(',') || value.contains('\n') || value.contains('\r') {
                return Err(anyhow!("style.{} must not contain commas or line breaks: {:?}", field, value));
            }
        }

        if let Some(language) = &self.transcription.language {
            crate::language_utils::validate_language_code(language)?;
        }

        if self.transcription.provider.is_remote() {
            if self.transcription.get_api_key().is_empty() {
                return Err(anyhow!(
                    "Transcription API key is required for {} provider",
                    self.transcription.provider.display_name()
                ));
            }

            let endpoint = self.transcription.get_endpoint();
            url::Url::parse(&endpoint)
                .with_context(|| format!("Invalid transcription endpoint: {}", endpoint))?;
        }

        Ok(())
    }
}
