use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, error, info};

use crate::app_config::{FetchConfig, FetchStrategy, ToolsConfig};
use crate::errors::PipelineError;
use crate::file_utils::FileManager;
use crate::media::{ToolFailure, filter_ffmpeg_stderr, run_tool, summarize_ytdlp_stderr};
use crate::timestamp::ClipRange;

// @module: Clip acquisition

/// Downloads the requested section of a remote video to a local file
#[async_trait]
pub trait ClipFetcher: Send + Sync {
    /// Fetch `range` of `url` into `destination` and return the clip path
    async fn fetch(&self, url: &str, range: &ClipRange, destination: &Path) -> Result<PathBuf, PipelineError>;
}

/// yt-dlp backed fetcher
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    ytdlp_path: PathBuf,
    ffmpeg_path: PathBuf,
    strategy: FetchStrategy,
    format: String,
}

impl YtDlpFetcher {
    pub fn new(tools: &ToolsConfig, fetch: &FetchConfig) -> Self {
        Self {
            ytdlp_path: tools.ytdlp_path.clone(),
            ffmpeg_path: tools.ffmpeg_path.clone(),
            strategy: fetch.strategy,
            format: fetch.format.clone(),
        }
    }

    /// Arguments for letting yt-dlp cut the section itself
    pub fn section_args(&self, url: &str, range: &ClipRange, destination: &Path) -> Vec<String> {
        vec![
            "--download-sections".to_string(),
            format!("*{}-{}", range.start_secs, range.end_secs),
            "-f".to_string(),
            self.format.clone(),
            "--merge-output-format".to_string(),
            "mp4".to_string(),
            "-o".to_string(),
            destination.to_string_lossy().into_owned(),
            url.to_string(),
        ]
    }

    /// Arguments for resolving the direct media URLs of `url` in the configured format
    pub fn resolve_args(&self, url: &str) -> Vec<String> {
        vec!["-f".to_string(), self.format.clone(), "-g".to_string(), url.to_string()]
    }

    /// Arguments for cutting resolved media URLs with ffmpeg.
    ///
    /// A single URL is stream-copied as is. Two URLs are a video-only and an audio-only
    /// stream, in that order, and are muxed into one clip.
    pub fn stream_copy_args(media_urls: &[String], range: &ClipRange, destination: &Path) -> Vec<String> {
        let mut args = Vec::new();
        for media_url in media_urls {
            args.extend([
                "-ss".to_string(),
                range.start_secs.to_string(),
                "-i".to_string(),
                media_url.clone(),
            ]);
        }

        if media_urls.len() > 1 {
            args.extend(["-map", "0:v:0", "-map", "1:a:0"].map(String::from));
        }

        args.extend([
            "-t".to_string(),
            range.duration_secs().to_string(),
            "-c".to_string(),
            "copy".to_string(),
            destination.to_string_lossy().into_owned(),
            "-y".to_string(),
        ]);
        args
    }

    async fn fetch_sections(&self, url: &str, range: &ClipRange, destination: &Path) -> Result<(), PipelineError> {
        let args = self.section_args(url, range, destination);
        run_tool(&self.ytdlp_path, &args)
            .await
            .map_err(|e| Self::ytdlp_fault(&e))?;
        Ok(())
    }

    async fn fetch_stream(&self, url: &str, range: &ClipRange, destination: &Path) -> Result<(), PipelineError> {
        let resolved = run_tool(&self.ytdlp_path, &self.resolve_args(url))
            .await
            .map_err(|e| Self::ytdlp_fault(&e))?;

        let media_urls: Vec<String> = resolved
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(2)
            .map(str::to_string)
            .collect();
        if media_urls.is_empty() {
            return Err(PipelineError::FetchFault(format!("yt-dlp returned no media URL for {}", url)));
        }
        debug!("Resolved {} media URL(s) for {}", media_urls.len(), url);

        let args = Self::stream_copy_args(&media_urls, range, destination);
        run_tool(&self.ffmpeg_path, &args).await.map_err(|e| match e {
            ToolFailure::Exit { stderr, .. } => PipelineError::FetchFault(filter_ffmpeg_stderr(&stderr)),
            other => PipelineError::FetchFault(other.to_string()),
        })?;
        Ok(())
    }

    fn ytdlp_fault(failure: &ToolFailure) -> PipelineError {
        let message = match failure {
            ToolFailure::Spawn { .. } => failure.to_string(),
            ToolFailure::Exit { stderr, .. } => summarize_ytdlp_stderr(stderr),
        };
        error!("yt-dlp failed: {}", message);
        PipelineError::FetchFault(message)
    }
}

#[async_trait]
impl ClipFetcher for YtDlpFetcher {
    async fn fetch(&self, url: &str, range: &ClipRange, destination: &Path) -> Result<PathBuf, PipelineError> {
        info!("Fetching {} of {} ({:?})", range, url, self.strategy);

        match self.strategy {
            FetchStrategy::Sections => self.fetch_sections(url, range, destination).await?,
            FetchStrategy::Stream => self.fetch_stream(url, range, destination).await?,
        }

        if !FileManager::file_exists(destination) {
            return Err(PipelineError::FetchFault(format!(
                "downloader reported success but {} was not created",
                destination.display()
            )));
        }

        Ok(destination.to_path_buf())
    }
}
