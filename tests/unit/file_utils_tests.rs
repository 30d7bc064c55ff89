/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::collections::HashSet;
use std::path::PathBuf;
use shortcap::file_utils::{FileManager, RunPaths};

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_fileExists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_fileExists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

#[test]
fn test_ensureWorkspace_calledTwice_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let workspace = common::workspace_in(temp_dir.path());

    FileManager::ensure_workspace(&workspace)?;
    let marker = common::create_test_file(&workspace.subs_dir, "keep.ass", "x")?;
    FileManager::ensure_workspace(&workspace)?;

    assert!(FileManager::dir_exists(&workspace.downloads_dir));
    assert!(FileManager::dir_exists(&workspace.subs_dir));
    assert!(FileManager::dir_exists(&workspace.output_dir));
    assert!(FileManager::file_exists(marker));
    Ok(())
}

#[test]
fn test_writeToFile_nestedPath_shouldCreateParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("a").join("b").join("c.txt");

    FileManager::write_to_file(&path, "content")?;
    assert_eq!(std::fs::read_to_string(&path)?, "content");
    Ok(())
}

#[test]
fn test_ensureDir_pathIsFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let occupied = common::create_test_file(temp_dir.path(), "subs", "not a directory")?;

    let error = FileManager::ensure_dir(&occupied).unwrap_err();
    assert!(error.to_string().contains("Failed to create directory"));
    assert!(FileManager::file_exists(&occupied));
    Ok(())
}

#[test]
fn test_runPaths_knownId_shouldDeriveEveryArtifact() {
    let workspace = common::workspace_in(&PathBuf::from("/ws"));
    let paths = RunPaths::for_run(&workspace, "abc");

    assert_eq!(paths.run_id, "abc");
    assert_eq!(paths.clip, PathBuf::from("/ws/downloads/abc_clip.mp4"));
    assert_eq!(paths.audio, PathBuf::from("/ws/downloads/abc_clip.wav"));
    assert_eq!(paths.subtitles, PathBuf::from("/ws/subs/abc.ass"));
    assert_eq!(paths.final_video, PathBuf::from("/ws/output/abc_final.mp4"));
}

#[test]
fn test_runPaths_allocate_shouldNeverRepeat() {
    let workspace = common::workspace_in(&PathBuf::from("ws"));
    let outputs: HashSet<PathBuf> = (0..50)
        .map(|_| RunPaths::allocate(&workspace).final_video)
        .collect();
    assert_eq!(outputs.len(), 50);
}
