use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::app_config::Config;
use crate::captions::build_subtitles;
use crate::errors::PipelineError;
use crate::file_utils::RunPaths;
use crate::media::{AudioExtractor, CaptionBurner, ClipFetcher, FfmpegTranscoder, YtDlpFetcher};
use crate::providers::{Transcriber, create_transcriber};
use crate::timestamp::ClipRange;
use crate::transcript::Transcript;

// @module: Pipeline controller: fetch, extract, transcribe, caption, burn

/// The external tools a pipeline run calls into
#[derive(Clone)]
pub struct Collaborators {
    pub fetcher: Arc<dyn ClipFetcher>,
    pub extractor: Arc<dyn AudioExtractor>,
    pub transcriber: Arc<dyn Transcriber>,
    pub burner: Arc<dyn CaptionBurner>,
}

impl Collaborators {
    /// yt-dlp, ffmpeg and the configured transcription engine
    pub fn from_config(config: &Config) -> Self {
        let transcoder = Arc::new(FfmpegTranscoder::new(&config.tools));
        Self {
            fetcher: Arc::new(YtDlpFetcher::new(&config.tools, &config.fetch)),
            extractor: transcoder.clone(),
            transcriber: create_transcriber(config),
            burner: transcoder,
        }
    }
}

/// Everything a successful run produced
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub run_id: String,
    pub transcript: Transcript,
    pub clip: PathBuf,
    pub audio: PathBuf,
    pub subtitles: PathBuf,
    pub video_path: PathBuf,
}

/// Response payload: `{transcript, videoPath}` or `{error}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PipelineResponse {
    Success {
        transcript: String,
        #[serde(rename = "videoPath")]
        video_path: String,
    },
    Failure {
        error: String,
    },
}

impl PipelineResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<Result<PipelineOutput, PipelineError>> for PipelineResponse {
    fn from(result: Result<PipelineOutput, PipelineError>) -> Self {
        match result {
            Ok(output) => Self::Success {
                transcript: output.transcript.text,
                video_path: output.video_path.to_string_lossy().into_owned(),
            },
            Err(e) => Self::Failure { error: e.to_string() },
        }
    }
}

/// Setup failures (config, workspace) carry their whole context chain
impl From<anyhow::Error> for PipelineResponse {
    fn from(error: anyhow::Error) -> Self {
        Self::Failure {
            error: format!("{:#}", error),
        }
    }
}

/// Main application controller for clip captioning
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: External tools
    collaborators: Collaborators,

    // @field: Show stage spinners on stderr
    show_progress: bool,
}

impl Controller {
    // @method: Create a new controller with the real tools for the given configuration
    pub fn with_config(config: Config) -> Self {
        let collaborators = Collaborators::from_config(&config);
        Self::with_collaborators(config, collaborators)
    }

    /// Create a controller around explicit collaborators
    pub fn with_collaborators(config: Config, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
            show_progress: true,
        }
    }

    /// Disable the stage spinners
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the pipeline and fold the outcome into the response payload
    pub async fn respond(&self, url: &str, start: &str, end: &str) -> PipelineResponse {
        let result = self.run(url, start, end).await;
        if let Err(e) = &result {
            error!("Pipeline aborted: {}", e);
        }
        PipelineResponse::from(result)
    }

    /// Clip `url` between `start` and `end`, transcribe it and burn captions into it.
    ///
    /// The URL and timestamps are checked before any tool is called. The first failing
    /// stage aborts the run; files written by earlier stages are left in place.
    pub async fn run(&self, url: &str, start: &str, end: &str) -> Result<PipelineOutput, PipelineError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(PipelineError::FetchFault("no video URL given".to_string()));
        }
        let range = ClipRange::parse(start, end)?;
        let paths = RunPaths::allocate(&self.config.workspace);
        let started = std::time::Instant::now();

        info!("Run {}: {} [{}]", paths.run_id, url, range);

        let spinner = self.stage_spinner("Fetching clip");
        let clip = self.collaborators.fetcher.fetch(url, &range, &paths.clip).await;
        spinner.finish_and_clear();
        let clip = clip?;
        debug!("Clip saved to {}", clip.display());

        let spinner = self.stage_spinner("Extracting audio");
        let audio = self.collaborators.extractor.extract_audio(&clip, &paths.audio).await;
        spinner.finish_and_clear();
        let audio = audio?;

        let spinner = self.stage_spinner("Transcribing");
        let transcript = self.collaborators.transcriber.transcribe(&audio).await;
        spinner.finish_and_clear();
        let transcript = transcript?;
        info!(
            "Transcribed {} word(s) with {}",
            transcript.word_count(),
            self.collaborators.transcriber.name()
        );

        let subtitles = self.write_captions(&transcript, &paths.subtitles)?;

        let spinner = self.stage_spinner("Burning captions");
        let video_path = self
            .collaborators
            .burner
            .burn_captions(&clip, &subtitles, &paths.final_video)
            .await;
        spinner.finish_and_clear();
        let video_path = video_path?;

        info!(
            "Run {} finished in {:.1}s: {}",
            paths.run_id,
            started.elapsed().as_secs_f64(),
            video_path.display()
        );

        Ok(PipelineOutput {
            run_id: paths.run_id,
            transcript,
            clip,
            audio,
            subtitles,
            video_path,
        })
    }

    /// Segment, time and write the subtitle document for a transcript
    pub fn write_captions(&self, transcript: &Transcript, destination: &Path) -> Result<PathBuf, PipelineError> {
        let document = build_subtitles(transcript, &self.config.captions, &self.config.style);
        let path = document.write_to_file(destination)?;
        info!("Wrote {} caption(s) to {}", document.cues().len(), path.display());
        Ok(path)
    }

    fn stage_spinner(&self, message: &'static str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }
}

/// Load a transcript file: JSON `{text, words}` for `.json`, plain text otherwise
pub fn load_transcript(path: &Path) -> Result<Transcript, PipelineError> {
    let content = std::fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        serde_json::from_str(&content).map_err(|e| {
            PipelineError::IoFault(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{}: {}", path.display(), e),
            ))
        })
    } else {
        Ok(Transcript::from_text(content.trim()))
    }
}
