use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::errors::ProviderError;
use crate::providers::Transcriber;
use crate::transcript::{TimedWord, Transcript};

/// AssemblyAI client: upload, create a job, poll until it settles
#[derive(Debug)]
pub struct AssemblyAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Base URL, without the `/v2` suffix
    endpoint: String,
    language: Option<String>,
    timeout_secs: u64,
    poll_interval: Duration,
}

/// Upload endpoint reply
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub upload_url: String,
}

/// Job creation request
#[derive(Debug, Serialize)]
pub struct TranscriptRequest {
    pub audio_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

/// Job state as returned by create and poll calls
#[derive(Debug, Deserialize)]
pub struct TranscriptJob {
    pub id: String,
    pub status: String,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub words: Option<Vec<AssemblyWord>>,

    #[serde(default)]
    pub error: Option<String>,
}

/// Word timing in milliseconds
#[derive(Debug, Deserialize)]
pub struct AssemblyWord {
    pub text: String,
    pub start: u64,
    pub end: u64,
}

/// Outcome of inspecting one job state
#[derive(Debug)]
pub enum JobState {
    Pending,
    Completed(Transcript),
}

impl TranscriptJob {
    /// Interpret the job status
    pub fn state(self) -> Result<JobState, ProviderError> {
        match self.status.as_str() {
            "completed" => {
                let words = self
                    .words
                    .unwrap_or_default()
                    .into_iter()
                    .map(|w| TimedWord {
                        text: w.text,
                        start_ms: w.start,
                        end_ms: w.end,
                    })
                    .collect();
                let text = self.text.unwrap_or_default();
                Ok(JobState::Completed(Transcript::from_text(text.trim()).with_words(words)))
            }
            "error" => Err(ProviderError::JobFailed(
                self.error.unwrap_or_else(|| format!("job {} reported an error", self.id)),
            )),
            _ => Ok(JobState::Pending),
        }
    }
}

impl AssemblyAI {
    /// Create a new AssemblyAI client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        language: Option<String>,
        timeout_secs: u64,
        poll_interval_ms: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            language,
            timeout_secs,
            poll_interval: Duration::from_millis(poll_interval_ms),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v2/{}", self.endpoint, path)
    }

    async fn check_status(response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        error!("AssemblyAI API error ({}): {}", status, error_text);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProviderError::AuthenticationError(error_text));
        }
        Err(ProviderError::ApiError {
            status_code: status.as_u16(),
            message: error_text,
        })
    }

    /// Upload the audio bytes and return the hosted URL
    pub async fn upload(&self, audio: &Path) -> Result<String, ProviderError> {
        let bytes = tokio::fs::read(audio)
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("cannot read {}: {}", audio.display(), e)))?;
        debug!("Uploading {} bytes to AssemblyAI", bytes.len());

        let response = self
            .client
            .post(self.url("upload"))
            .header("authorization", &self.api_key)
            .body(bytes)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("upload: {}", e)))?;

        let upload: UploadResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("upload response: {}", e)))?;
        Ok(upload.upload_url)
    }

    /// Create a transcription job for an uploaded file
    pub async fn create_job(&self, audio_url: String) -> Result<TranscriptJob, ProviderError> {
        let request = TranscriptRequest {
            audio_url,
            language_code: self.language.clone(),
        };

        let response = self
            .client
            .post(self.url("transcript"))
            .header("authorization", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("create job: {}", e)))?;

        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("job response: {}", e)))
    }

    /// Fetch the current state of a job
    pub async fn get_job(&self, id: &str) -> Result<TranscriptJob, ProviderError> {
        let response = self
            .client
            .get(self.url(&format!("transcript/{}", id)))
            .header("authorization", &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("poll job: {}", e)))?;

        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("job response: {}", e)))
    }
}

#[async_trait]
impl Transcriber for AssemblyAI {
    async fn transcribe(&self, audio: &Path) -> Result<Transcript, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::AuthenticationError("AssemblyAI API key is not set".to_string()));
        }

        info!("Transcribing {} with AssemblyAI", audio.display());
        let deadline = Instant::now() + Duration::from_secs(self.timeout_secs);

        let audio_url = self.upload(audio).await?;
        let job = self.create_job(audio_url).await?;
        let id = job.id.clone();
        debug!("AssemblyAI job {} is {}", id, job.status);

        let mut state = job.state()?;
        loop {
            if let JobState::Completed(transcript) = state {
                return Ok(transcript);
            }
            if Instant::now() + self.poll_interval > deadline {
                return Err(ProviderError::Timeout(self.timeout_secs));
            }
            tokio::time::sleep(self.poll_interval).await;

            let job = self.get_job(&id).await?;
            debug!("AssemblyAI job {} is {}", id, job.status);
            state = job.state()?;
        }
    }

    fn name(&self) -> &str {
        "assemblyai"
    }
}
