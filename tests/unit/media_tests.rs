/*!
 * Tests for the yt-dlp and ffmpeg collaborators
 */

use std::path::{Path, PathBuf};

use anyhow::Result;

use shortcap::app_config::{FetchConfig, FetchStrategy, ToolsConfig};
use shortcap::errors::PipelineError;
use shortcap::media::transcode::FfmpegTranscoder;
use shortcap::media::{ClipFetcher, ToolFailure, YtDlpFetcher, escape_filter_path, filter_ffmpeg_stderr, run_tool, summarize_ytdlp_stderr};
use shortcap::timestamp::ClipRange;

use crate::common;

/// Write an executable shell script standing in for an external tool
#[cfg(unix)]
fn fake_tool(dir: &Path, name: &str, body: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let path = common::create_test_file(dir, name, &format!("#!/bin/sh\n{}\n", body))?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

fn missing_tools() -> ToolsConfig {
    ToolsConfig {
        ytdlp_path: PathBuf::from("/nonexistent/yt-dlp-binary"),
        ffmpeg_path: PathBuf::from("/nonexistent/ffmpeg-binary"),
        whisper_path: PathBuf::from("/nonexistent/whisper-binary"),
    }
}

#[test]
fn test_sectionArgs_customFormat_shouldBePassedThrough() {
    let fetch = FetchConfig {
        strategy: FetchStrategy::Sections,
        format: "best[height<=720]".to_string(),
    };
    let fetcher = YtDlpFetcher::new(&ToolsConfig::default(), &fetch);
    let range = ClipRange::parse("5", "25").unwrap();
    let args = fetcher.section_args("u", &range, Path::new("clip.mp4"));

    assert_eq!(args[1], "*5-25");
    assert_eq!(args[3], "best[height<=720]");
}

#[tokio::test]
async fn test_fetch_missingDownloader_shouldBeFetchFault() {
    for strategy in [FetchStrategy::Sections, FetchStrategy::Stream] {
        let fetch = FetchConfig {
            strategy,
            ..FetchConfig::default()
        };
        let fetcher = YtDlpFetcher::new(&missing_tools(), &fetch);
        let range = ClipRange::parse("0", "10").unwrap();
        let result = fetcher.fetch("https://v.example/x", &range, Path::new("clip.mp4")).await;
        assert!(matches!(result, Err(PipelineError::FetchFault(_))), "{:?}", strategy);
    }
}

#[tokio::test]
async fn test_runTool_missingProgram_shouldBeSpawnFailure() {
    let result = run_tool(Path::new("/nonexistent/tool"), ["--version"]).await;
    match result {
        Err(failure @ ToolFailure::Spawn { .. }) => assert_eq!(failure.stderr(), ""),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_burnArgs_pathWithColon_shouldEscapeForFilter() {
    let args = FfmpegTranscoder::burn_args(Path::new("c.mp4"), Path::new("subs/a:b.ass"), Path::new("o.mp4"));
    assert_eq!(args[4], r"subtitles='subs/a\:b.ass'");
}

#[test]
fn test_escapeFilterPath_plainPath_shouldOnlyQuote() {
    assert_eq!(escape_filter_path(Path::new("/tmp/x.ass")), "'/tmp/x.ass'");
}

#[test]
fn test_summarizeYtdlpStderr_multipleErrors_shouldJoin() {
    let stderr = "ERROR: first\nwarning\nERROR: second\n";
    assert_eq!(summarize_ytdlp_stderr(stderr), "first; second");
}

#[test]
fn test_filterFfmpegStderr_onlyNoise_shouldReportUnknown() {
    let stderr = "ffmpeg version n6\n  configuration: --enable-gpl\n";
    assert_eq!(
        filter_ffmpeg_stderr(stderr),
        "unknown ffmpeg error (stderr was empty after filtering)"
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_fetchStream_separateVideoAndAudioUrls_shouldMuxBoth() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let ytdlp_log = temp_dir.path().join("ytdlp_args.txt");
    let ffmpeg_log = temp_dir.path().join("ffmpeg_args.txt");

    let ytdlp = fake_tool(
        temp_dir.path(),
        "yt-dlp",
        &format!(
            "printf '%s\\n' \"$@\" > '{}'\nprintf 'https://cdn.example/video-only.mp4\\nhttps://cdn.example/audio-only.m4a\\n'",
            ytdlp_log.display()
        ),
    )?;
    // The clip path is the argument before the trailing -y
    let ffmpeg = fake_tool(
        temp_dir.path(),
        "ffmpeg",
        &format!(
            "printf '%s\\n' \"$@\" > '{}'\nlast=\"\"; dest=\"\"\nfor a in \"$@\"; do dest=\"$last\"; last=\"$a\"; done\n: > \"$dest\"",
            ffmpeg_log.display()
        ),
    )?;

    let tools = ToolsConfig {
        ytdlp_path: ytdlp,
        ffmpeg_path: ffmpeg,
        ..missing_tools()
    };
    let fetch = FetchConfig {
        strategy: FetchStrategy::Stream,
        ..FetchConfig::default()
    };
    let fetcher = YtDlpFetcher::new(&tools, &fetch);
    let range = ClipRange::parse("0", "10")?;
    let destination = temp_dir.path().join("run_clip.mp4");

    let clip = fetcher.fetch("https://v.example/x", &range, &destination).await?;
    assert_eq!(clip, destination);

    let ytdlp_args: Vec<String> = std::fs::read_to_string(&ytdlp_log)?.lines().map(String::from).collect();
    assert_eq!(ytdlp_args, vec!["-f", "bestvideo+bestaudio/best", "-g", "https://v.example/x"]);

    let ffmpeg_args: Vec<String> = std::fs::read_to_string(&ffmpeg_log)?.lines().map(String::from).collect();
    let inputs: Vec<&str> = ffmpeg_args
        .windows(2)
        .filter(|w| w[0] == "-i")
        .map(|w| w[1].as_str())
        .collect();
    assert_eq!(inputs, vec!["https://cdn.example/video-only.mp4", "https://cdn.example/audio-only.m4a"]);
    assert!(ffmpeg_args.windows(2).any(|w| w[0] == "-map" && w[1] == "1:a:0"));
    assert!(ffmpeg_args.windows(2).any(|w| w[0] == "-t" && w[1] == "10"));
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_fetchSections_noFileWritten_shouldBeFetchFault() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let ytdlp = fake_tool(temp_dir.path(), "yt-dlp", "exit 0")?;
    let tools = ToolsConfig {
        ytdlp_path: ytdlp,
        ..missing_tools()
    };
    let fetcher = YtDlpFetcher::new(&tools, &FetchConfig::default());
    let range = ClipRange::parse("0", "10")?;

    let result = fetcher
        .fetch("https://v.example/x", &range, &temp_dir.path().join("missing_clip.mp4"))
        .await;
    match result {
        Err(PipelineError::FetchFault(message)) => assert!(message.contains("was not created")),
        other => panic!("unexpected {:?}", other),
    }
    Ok(())
}
