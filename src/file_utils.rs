use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::app_config::WorkspaceConfig;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !Self::dir_exists(path) {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Create the downloads, subs and output directories. Safe to call repeatedly.
    pub fn ensure_workspace(workspace: &WorkspaceConfig) -> Result<()> {
        for dir in [&workspace.downloads_dir, &workspace.subs_dir, &workspace.output_dir] {
            Self::ensure_dir(dir)?;
        }
        Ok(())
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}

/// Artifact locations for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    /// Unique run identifier, embedded in every artifact name
    pub run_id: String,

    pub clip: PathBuf,
    pub audio: PathBuf,
    pub subtitles: PathBuf,
    pub final_video: PathBuf,
}

impl RunPaths {
    /// Allocate paths for a fresh run
    pub fn allocate(workspace: &WorkspaceConfig) -> Self {
        Self::for_run(workspace, Uuid::new_v4().to_string())
    }

    /// Paths for a known run identifier
    pub fn for_run(workspace: &WorkspaceConfig, run_id: impl Into<String>) -> Self {
        let run_id = run_id.into();
        Self {
            clip: workspace.downloads_dir.join(format!("{}_clip.mp4", run_id)),
            audio: workspace.downloads_dir.join(format!("{}_clip.wav", run_id)),
            subtitles: workspace.subs_dir.join(format!("{}.ass", run_id)),
            final_video: workspace.output_dir.join(format!("{}_final.mp4", run_id)),
            run_id,
        }
    }
}
