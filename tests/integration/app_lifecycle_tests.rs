/*!
 * Application lifecycle tests: config file, workspace setup, controller wiring
 */

use anyhow::{Context, Result};

use shortcap::app_config::{Config, TranscriptionProvider};
use shortcap::app_controller::{Controller, PipelineResponse};
use shortcap::file_utils::FileManager;

use crate::common;

#[tokio::test]
async fn test_appLifecycle_freshDirectory_shouldBootstrapConfigAndWorkspace() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("conf.json");

    let (mut config, created) = Config::load_or_create(&config_path)?;
    assert!(created);

    config.workspace = common::workspace_in(temp_dir.path());
    config.validate()?;
    FileManager::ensure_workspace(&config.workspace)?;

    let controller = Controller::with_config(config).without_progress();
    assert_eq!(controller.config().transcription.provider, TranscriptionProvider::Whisper);

    // Bad input is rejected before yt-dlp would be started
    let response = controller.respond("https://v.example/x", "1:xx", "2:00").await;
    match response {
        PipelineResponse::Failure { error } => assert!(error.starts_with("Malformed timestamp '1:xx'")),
        other => panic!("unexpected {:?}", other),
    }
    Ok(())
}

#[test]
fn test_appLifecycle_remoteProviderMisconfigured_shouldFailBeforeNetwork() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config(temp_dir.path());
    config.transcription.provider = TranscriptionProvider::AssemblyAI;
    let controller = Controller::with_config(config).without_progress();

    let audio = common::create_test_file(temp_dir.path(), "a.wav", "RIFF")?;
    let transcriber = shortcap::providers::create_transcriber(controller.config());
    assert_eq!(transcriber.name(), "assemblyai");
    let result = tokio_test::block_on(transcriber.transcribe(&audio));

    assert!(matches!(result, Err(shortcap::errors::ProviderError::AuthenticationError(_))));
    Ok(())
}

#[test]
fn test_appLifecycle_savedConfig_shouldRoundTripEdits() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("conf.json");
    let (mut config, _) = Config::load_or_create(&config_path)?;

    config.captions.max_line_len = 32;
    config.style.force_top = true;
    FileManager::write_to_file(&config_path, &serde_json::to_string_pretty(&config)?)?;

    let (reloaded, created) = Config::load_or_create(&config_path)?;
    assert!(!created);
    assert_eq!(reloaded.captions.max_line_len, 32);
    assert!(reloaded.style.force_top);
    Ok(())
}

#[test]
fn test_appLifecycle_invalidConfig_shouldProduceErrorPayload() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config(temp_dir.path());
    config.transcription.language = Some("zz".to_string());

    let error = config.validate().context("Configuration validation failed").unwrap_err();
    let response = PipelineResponse::from(error);

    assert!(!response.is_success());
    let json: serde_json::Value = serde_json::to_value(&response)?;
    let object = json.as_object().expect("payload is an object");
    assert_eq!(object.len(), 1);
    assert_eq!(
        object["error"],
        "Configuration validation failed: Invalid language code: zz"
    );
    Ok(())
}

#[test]
fn test_appLifecycle_unreadableConfig_shouldProduceErrorPayload() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    let error = Config::load_or_create(&path).unwrap_err();
    match PipelineResponse::from(error) {
        PipelineResponse::Failure { error } => assert!(error.contains("Failed to parse config file")),
        other => panic!("unexpected {:?}", other),
    }
    Ok(())
}
