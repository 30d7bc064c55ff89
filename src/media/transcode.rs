use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{error, info};

use crate::app_config::ToolsConfig;
use crate::errors::PipelineError;
use crate::media::{ToolFailure, escape_filter_path, filter_ffmpeg_stderr, run_tool};

// @module: ffmpeg audio extraction and caption burn

/// Produces the mono 16 kHz audio track the transcription engines expect
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    async fn extract_audio(&self, clip: &Path, destination: &Path) -> Result<PathBuf, PipelineError>;
}

/// Renders a subtitle document onto the clip's video stream
#[async_trait]
pub trait CaptionBurner: Send + Sync {
    async fn burn_captions(&self, clip: &Path, subtitles: &Path, destination: &Path) -> Result<PathBuf, PipelineError>;
}

/// ffmpeg implementation of both transcode collaborators
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    ffmpeg_path: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(tools: &ToolsConfig) -> Self {
        Self {
            ffmpeg_path: tools.ffmpeg_path.clone(),
        }
    }

    pub fn extract_args(clip: &Path, destination: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            clip.to_string_lossy().into_owned(),
            "-vn".to_string(),
            "-acodec".to_string(),
            "pcm_s16le".to_string(),
            "-ac".to_string(),
            "1".to_string(),
            "-ar".to_string(),
            "16000".to_string(),
            "-f".to_string(),
            "wav".to_string(),
            destination.to_string_lossy().into_owned(),
        ]
    }

    pub fn burn_args(clip: &Path, subtitles: &Path, destination: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            clip.to_string_lossy().into_owned(),
            "-vf".to_string(),
            format!("subtitles={}", escape_filter_path(subtitles)),
            "-c:v".to_string(),
            "libx264".to_string(),
            "-c:a".to_string(),
            "aac".to_string(),
            destination.to_string_lossy().into_owned(),
        ]
    }

    async fn run(&self, stage: &str, args: Vec<String>, destination: &Path) -> Result<PathBuf, PipelineError> {
        run_tool(&self.ffmpeg_path, &args).await.map_err(|failure| {
            let message = match &failure {
                ToolFailure::Spawn { .. } => failure.to_string(),
                ToolFailure::Exit { stderr, .. } => filter_ffmpeg_stderr(stderr),
            };
            error!("{} failed: {}", stage, message);
            PipelineError::TranscodeFault(format!("{}: {}", stage, message))
        })?;

        if !destination.exists() {
            return Err(PipelineError::TranscodeFault(format!(
                "{}: ffmpeg did not create {}",
                stage,
                destination.display()
            )));
        }

        Ok(destination.to_path_buf())
    }
}

#[async_trait]
impl AudioExtractor for FfmpegTranscoder {
    async fn extract_audio(&self, clip: &Path, destination: &Path) -> Result<PathBuf, PipelineError> {
        info!("Extracting audio from {}", clip.display());
        self.run("audio extraction", Self::extract_args(clip, destination), destination)
            .await
    }
}

#[async_trait]
impl CaptionBurner for FfmpegTranscoder {
    async fn burn_captions(&self, clip: &Path, subtitles: &Path, destination: &Path) -> Result<PathBuf, PipelineError> {
        info!("Burning {} into {}", subtitles.display(), clip.display());
        self.run("caption burn", Self::burn_args(clip, subtitles, destination), destination)
            .await
    }
}
