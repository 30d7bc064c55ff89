/*!
 * # shortcap - short clips with burned-in captions
 *
 * Cuts a section out of a remote video, transcribes it and burns
 * time-synchronized captions back into the clip.
 *
 * ## Pipeline
 *
 * fetch clip (yt-dlp) → extract audio (ffmpeg) → transcribe (whisper or AssemblyAI)
 * → segment + time + build subtitles → burn captions (ffmpeg)
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `timestamp`: `hh:mm:ss` parsing and subtitle time formatting
 * - `transcript`: Speech-to-text output shared by every engine
 * - `captions`: Caption core:
 *   - `captions::segmenter`: Greedy line wrapping
 *   - `captions::timing`: Pluggable cue timing strategies
 *   - `captions::document`: Subtitle document rendering
 * - `media`: yt-dlp and ffmpeg collaborators
 * - `providers`: Transcription engines:
 *   - `providers::whisper`: Local whisper CLI
 *   - `providers::assemblyai`: AssemblyAI API client
 *   - `providers::mock`: Scripted engine for tests
 * - `file_utils`: Workspace directories and per-run artifact paths
 * - `app_controller`: Pipeline controller and response payload
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod captions;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod media;
pub mod providers;
pub mod timestamp;
pub mod transcript;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Collaborators, Controller, PipelineOutput, PipelineResponse};
pub use captions::{SubtitleDocument, build_subtitles, segment};
pub use errors::{PipelineError, ProviderError};
pub use timestamp::{ClipRange, format_ass_timestamp, parse_timestamp};
pub use transcript::{TimedWord, Transcript};
