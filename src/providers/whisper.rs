use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, error, info};
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::media::{ToolFailure, run_tool};
use crate::providers::Transcriber;
use crate::transcript::{TimedWord, Transcript};

/// Local whisper command-line transcriber
#[derive(Debug, Clone)]
pub struct WhisperCli {
    /// Path of the whisper executable
    binary: PathBuf,
    /// Model name passed to `--model`
    model: String,
    /// Spoken language, auto-detected when `None`
    language: Option<String>,
}

/// JSON document written by `--output_format json`
#[derive(Debug, Deserialize)]
pub struct WhisperOutput {
    pub text: String,
    #[serde(default)]
    pub segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
pub struct WhisperSegment {
    #[serde(default)]
    pub words: Vec<WhisperWord>,
}

/// Word timing in seconds
#[derive(Debug, Deserialize)]
pub struct WhisperWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

impl WhisperCli {
    pub fn new(binary: impl Into<PathBuf>, model: impl Into<String>, language: Option<String>) -> Self {
        Self {
            binary: binary.into(),
            model: model.into(),
            language,
        }
    }

    /// Command-line arguments for one transcription
    pub fn build_args(&self, audio: &Path, output_dir: &Path) -> Vec<String> {
        let mut args = vec![
            audio.to_string_lossy().into_owned(),
            "--model".to_string(),
            self.model.clone(),
            "--output_format".to_string(),
            "json".to_string(),
            "--output_dir".to_string(),
            output_dir.to_string_lossy().into_owned(),
            "--word_timestamps".to_string(),
            "True".to_string(),
        ];

        if let Some(language) = &self.language {
            args.push("--language".to_string());
            args.push(language.clone());
        }

        args
    }

    /// Location of the JSON file whisper writes for `audio`
    pub fn output_path(audio: &Path, output_dir: &Path) -> PathBuf {
        let stem = audio.file_stem().unwrap_or_default().to_string_lossy();
        output_dir.join(format!("{}.json", stem))
    }

    /// Convert the whisper JSON document into a transcript
    pub fn parse_output(json: &str) -> Result<Transcript, ProviderError> {
        let output: WhisperOutput = serde_json::from_str(json)
            .map_err(|e| ProviderError::ParseError(format!("whisper JSON: {}", e)))?;

        let words = output
            .segments
            .into_iter()
            .flat_map(|segment| segment.words)
            .filter(|w| !w.word.trim().is_empty())
            .map(|w| TimedWord {
                text: w.word.trim().to_string(),
                start_ms: seconds_to_ms(w.start),
                end_ms: seconds_to_ms(w.end),
            })
            .collect();

        Ok(Transcript::from_text(output.text.trim()).with_words(words))
    }
}

fn seconds_to_ms(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    }
}

#[async_trait]
impl Transcriber for WhisperCli {
    async fn transcribe(&self, audio: &Path) -> Result<Transcript, ProviderError> {
        let output_dir = audio
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        info!("Transcribing {} with whisper model '{}'", audio.display(), self.model);

        let args = self.build_args(audio, output_dir);
        run_tool(&self.binary, &args).await.map_err(|failure| {
            let message = match &failure {
                ToolFailure::Spawn { .. } => failure.to_string(),
                ToolFailure::Exit { stderr, .. } => {
                    let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
                    tail.into_iter().rev().collect::<Vec<_>>().join("\n")
                }
            };
            error!("whisper failed: {}", message);
            ProviderError::ToolFailed(message)
        })?;

        let json_path = Self::output_path(audio, output_dir);
        let json = tokio::fs::read_to_string(&json_path).await.map_err(|e| {
            ProviderError::ToolFailed(format!("whisper output {} unreadable: {}", json_path.display(), e))
        })?;

        let transcript = Self::parse_output(&json)?;
        debug!(
            "whisper returned {} words ({} timed)",
            transcript.word_count(),
            transcript.words.len()
        );
        Ok(transcript)
    }

    fn name(&self) -> &str {
        "whisper"
    }
}
