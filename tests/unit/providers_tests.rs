/*!
 * Tests for transcription engine selection and parsing
 */

use std::path::Path;

use shortcap::app_config::{Config, TranscriptionProvider};
use shortcap::errors::ProviderError;
use shortcap::providers::assemblyai::{JobState, TranscriptJob};
use shortcap::providers::create_transcriber;
use shortcap::providers::mock::{MockBehavior, MockTranscriber};
use shortcap::providers::whisper::WhisperCli;
use shortcap::providers::Transcriber;
use shortcap::transcript::Transcript;

#[test]
fn test_createTranscriber_defaultConfig_shouldBeWhisper() {
    let transcriber = create_transcriber(&Config::default());
    assert_eq!(transcriber.name(), "whisper");
}

#[test]
fn test_createTranscriber_remoteProvider_shouldBeAssemblyAI() {
    let mut config = Config::default();
    config.transcription.provider = TranscriptionProvider::AssemblyAI;
    assert_eq!(create_transcriber(&config).name(), "assemblyai");
}

#[tokio::test]
async fn test_whisper_missingBinary_shouldBeToolFailed() {
    let cli = WhisperCli::new("/nonexistent/whisper-binary", "base", None);
    let result = cli.transcribe(Path::new("/tmp/none.wav")).await;
    assert!(matches!(result, Err(ProviderError::ToolFailed(_))));
}

#[test]
fn test_whisperOutput_wordCountMatchesText_shouldBeAlignable() {
    let json = r#"{"text": " one two three", "segments": [
        {"words": [{"word": " one", "start": 0.1, "end": 0.3}, {"word": " two", "start": 1.2, "end": 1.4}]},
        {"words": [{"word": " three", "start": 2.5, "end": 2.9}]}
    ]}"#;
    let transcript = WhisperCli::parse_output(json).unwrap();
    assert_eq!(transcript.word_count(), transcript.words.len());
    assert_eq!(transcript.words[1].start_ms, 1200);
}

#[test]
fn test_assemblyJob_processing_shouldStayPending() {
    let job: TranscriptJob = serde_json::from_str(r#"{"id":"x","status":"processing"}"#).unwrap();
    assert!(matches!(job.state(), Ok(JobState::Pending)));
}

#[test]
fn test_assemblyJob_errorWithoutMessage_shouldNameJob() {
    let job: TranscriptJob = serde_json::from_str(r#"{"id":"x9","status":"error"}"#).unwrap();
    match job.state() {
        Err(ProviderError::JobFailed(message)) => assert!(message.contains("x9")),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_mockTranscriber_slow_shouldStillSucceed() {
    let transcriber = MockTranscriber::new(MockBehavior::Slow { delay_ms: 5 });
    let transcript = transcriber.transcribe(Path::new("a.wav")).await.unwrap();
    assert_eq!(transcript, Transcript::from_text("slow transcript"));
}
