/*!
 * Mock transcriber for testing.
 *
 * This module provides a scripted engine that simulates different behaviors:
 * - `MockTranscriber::working(text)` - Always succeeds with the given transcript
 * - `MockTranscriber::failing()` - Always fails with an error
 * - `MockTranscriber::empty()` - Succeeds with an empty transcript
 */

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::Transcriber;
use crate::transcript::Transcript;

/// Behavior mode for the mock transcriber
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always returns the configured transcript
    Working(Transcript),
    /// Always fails with an error
    Failing,
    /// Returns an empty transcript
    Empty,
    /// Succeeds after a delay
    Slow { delay_ms: u64 },
}

/// Mock transcriber that records the audio paths it was asked for
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter
    request_count: Arc<AtomicUsize>,
    /// Audio paths received, in order
    received: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockTranscriber {
    /// Create a new mock transcriber with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock that returns `text` without word timings
    pub fn working(text: &str) -> Self {
        Self::new(MockBehavior::Working(Transcript::from_text(text)))
    }

    /// Create a working mock that returns a full transcript
    pub fn with_transcript(transcript: Transcript) -> Self {
        Self::new(MockBehavior::Working(transcript))
    }

    /// Create a failing mock transcriber that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns an empty transcript
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Number of transcription requests so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Audio paths passed to `transcribe`
    pub fn received(&self) -> Vec<PathBuf> {
        self.received.lock().map(|paths| paths.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, audio: &Path) -> Result<Transcript, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut received) = self.received.lock() {
            received.push(audio.to_path_buf());
        }

        match &self.behavior {
            MockBehavior::Working(transcript) => Ok(transcript.clone()),

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: format!("Simulated engine failure (request #{})", count + 1),
                status_code: 500,
            }),

            MockBehavior::Empty => Ok(Transcript::default()),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(*delay_ms)).await;
                Ok(Transcript::from_text("slow transcript"))
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
