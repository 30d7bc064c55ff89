/*!
 * Transcription engine implementations.
 *
 * This module contains client implementations for the speech-to-text engines:
 * - Whisper: local command-line tool
 * - AssemblyAI: remote HTTP API
 * - Mock: scripted engine for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

use log::{info, warn};

use crate::app_config::{Config, TranscriptionProvider};
use crate::errors::ProviderError;
use crate::language_utils;
use crate::transcript::Transcript;

/// Common trait for all transcription engines
///
/// Implementations turn a local audio file into a `Transcript`, allowing them
/// to be used interchangeably by the pipeline controller.
#[async_trait]
pub trait Transcriber: Send + Sync + Debug {
    /// Transcribe the audio file at `audio`
    ///
    /// # Returns
    /// * `Result<Transcript, ProviderError>` - The transcript, with word timings when available
    async fn transcribe(&self, audio: &Path) -> Result<Transcript, ProviderError>;

    /// Engine name for logs
    fn name(&self) -> &str;
}

/// Create the transcriber selected in the configuration
pub fn create_transcriber(config: &Config) -> Arc<dyn Transcriber> {
    let transcription = &config.transcription;

    // Validation already rejected bad codes, so this only drops whitespace and case
    let language = transcription.language.as_deref().and_then(|code| {
        match language_utils::normalize_to_part1_or_part2t(code) {
            Ok(normalized) => Some(normalized),
            Err(e) => {
                warn!("Ignoring transcription language: {}", e);
                None
            }
        }
    });

    match language.as_deref().map(language_utils::get_language_name) {
        Some(Ok(name)) => info!("Transcription language: {}", name),
        Some(Err(e)) => warn!("{}", e),
        None => info!("Transcription language: auto-detect"),
    }

    match transcription.provider {
        TranscriptionProvider::Whisper => Arc::new(whisper::WhisperCli::new(
            config.tools.whisper_path.clone(),
            transcription.get_model(),
            language,
        )),
        TranscriptionProvider::AssemblyAI => Arc::new(assemblyai::AssemblyAI::new(
            transcription.get_api_key(),
            transcription.get_endpoint(),
            language,
            transcription.get_timeout_secs(),
            transcription.get_poll_interval_ms(),
        )),
    }
}

pub mod assemblyai;
pub mod mock;
pub mod whisper;
