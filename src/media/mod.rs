/*!
 * External media tooling.
 *
 * - `fetch`: clip download through yt-dlp (`ClipFetcher`)
 * - `transcode`: audio extraction and caption burn through ffmpeg (`AudioExtractor`, `CaptionBurner`)
 *
 * Both shell out via `run_tool`, which captures output and reports non-zero exits as `ToolFailure`.
 */

pub mod fetch;
pub mod transcode;

pub use fetch::{ClipFetcher, YtDlpFetcher};
pub use transcode::{AudioExtractor, CaptionBurner, FfmpegTranscoder};

use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tokio::process::Command;

/// Captured output of a successful tool invocation
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Why an external tool did not succeed
#[derive(Error, Debug)]
pub enum ToolFailure {
    #[error("could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Exit {
        program: String,
        status: String,
        stderr: String,
    },
}

impl ToolFailure {
    /// Captured stderr, empty when the tool never ran
    pub fn stderr(&self) -> &str {
        match self {
            Self::Spawn { .. } => "",
            Self::Exit { stderr, .. } => stderr,
        }
    }
}

/// Run a tool to completion and capture its output
pub async fn run_tool<I, S>(program: &Path, args: I) -> Result<ToolOutput, ToolFailure>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program_name = program.display().to_string();
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    trace!("Running {:?}", command.as_std());

    let output = command.output().await.map_err(|source| ToolFailure::Spawn {
        program: program_name.clone(),
        source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(ToolFailure::Exit {
            program: program_name,
            status: output.status.to_string(),
            stderr,
        });
    }

    Ok(ToolOutput { stdout, stderr })
}

static YTDLP_ERROR_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^ERROR:\s*(.+?)\s*$").expect("static regex"));

/// Pull the `ERROR:` lines out of yt-dlp stderr, falling back to its last non-empty line
pub fn summarize_ytdlp_stderr(stderr: &str) -> String {
    let errors: Vec<&str> = YTDLP_ERROR_LINE
        .captures_iter(stderr)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();

    if !errors.is_empty() {
        return errors.join("; ");
    }

    stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .map(str::to_string)
        .unwrap_or_else(|| "yt-dlp produced no error output".to_string())
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    const NOISE_PREFIXES: [&str; 14] = [
        "ffmpeg version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Stream #",
        "Output #",
        "Stream mapping:",
        "Press [q]",
        "encoder",
        "handler_name",
        "major_brand",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !NOISE_PREFIXES.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}

/// Quote a path for use as a filter argument inside an ffmpeg filtergraph
pub fn escape_filter_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut escaped = String::with_capacity(raw.len() + 8);
    for c in raw.chars() {
        match c {
            '\\' => escaped.push_str(r"\\"),
            '\'' => escaped.push_str(r"'\''"),
            ':' => escaped.push_str(r"\:"),
            _ => escaped.push(c),
        }
    }
    format!("'{}'", escaped)
}
