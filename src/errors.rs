/*!
 * Error types for the shortcap application.
 *
 * `PipelineError` is the taxonomy every pipeline stage reports through;
 * `ProviderError` covers the transcription engines and is folded into
 * `PipelineError::TranscriptionFault` by the controller.
 */

use thiserror::Error;

/// Errors that can occur when talking to a transcription engine
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an engine response fails
    #[error("Failed to parse transcription response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The remote job finished with an error status
    #[error("Transcription job failed: {0}")]
    JobFailed(String),

    /// The job did not complete in the configured time
    #[error("Transcription timed out after {0}s")]
    Timeout(u64),

    /// A local transcription binary exited unsuccessfully or could not be started
    #[error("Transcription tool failed: {0}")]
    ToolFailed(String),
}

/// Errors that abort a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A timestamp string could not be turned into seconds
    #[error("Malformed timestamp '{input}': {reason}")]
    MalformedTimestamp {
        /// The offending input
        input: String,
        /// What was wrong with it
        reason: String,
    },

    /// The downloader failed to produce a clip
    #[error("Clip fetch failed: {0}")]
    FetchFault(String),

    /// The media transcoder failed (audio extraction or caption burn)
    #[error("Transcode failed: {0}")]
    TranscodeFault(String),

    /// Speech-to-text failed
    #[error("Transcription failed: {0}")]
    TranscriptionFault(String),

    /// A file could not be read or written
    #[error("I/O error: {0}")]
    IoFault(#[from] std::io::Error),
}

impl PipelineError {
    /// Shorthand for a malformed timestamp error
    pub fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedTimestamp {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<ProviderError> for PipelineError {
    fn from(error: ProviderError) -> Self {
        Self::TranscriptionFault(error.to_string())
    }
}
