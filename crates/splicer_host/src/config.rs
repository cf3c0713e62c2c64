// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host configuration and schedule files.

use serde::{Deserialize, Serialize};
use splicer_playlist::{ContentClipParams, PlaylistConfig, ScheduleClipParams, Scheduler, SeekToStartParams};
use std::path::{Path, PathBuf};

/// Log directive used when none is configured
pub const DEFAULT_LOG_FILTER: &str = "splicer_host=info";

/// Settings read at start-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// `tracing` directive added on top of `RUST_LOG`
    pub log_filter: String,
    /// Playlist tolerances
    pub playlist: PlaylistConfig,
    /// Schedule to replay, relative to the config file's directory
    pub schedule: Option<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            playlist: PlaylistConfig::default(),
            schedule: None,
        }
    }
}

impl HostConfig {
    /// Load from a RON file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        ron::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save to a RON file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        write_ron(self, path)
    }

    /// Schedule path resolved against `base_dir`
    pub fn schedule_path(&self, base_dir: &Path) -> Option<PathBuf> {
        self.schedule.as_ref().map(|schedule| base_dir.join(schedule))
    }
}

/// Content and ads to schedule into a fresh session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleFile {
    /// Content clips, appended in order
    pub content: Vec<ContentClipParams>,
    /// Advertisements, scheduled in order after all content
    pub ads: Vec<ScheduleClipParams>,
    /// Optional seek-to-start marker, placed last
    pub seek_to_start: Option<SeekToStartParams>,
}

impl ScheduleFile {
    /// Load from a RON file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        ron::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save to a RON file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        write_ron(self, path)
    }

    /// Replay every request into `scheduler`, stopping at the first rejection
    pub fn apply(&self, scheduler: &mut Scheduler<'_>) -> splicer_playlist::Result<()> {
        for clip in &self.content {
            scheduler.append_content_clip(clip)?;
        }
        for ad in &self.ads {
            scheduler.schedule_clip(ad)?;
        }
        if let Some(params) = &self.seek_to_start {
            scheduler.set_seek_to_start(params)?;
        }
        tracing::info!(
            content = self.content.len(),
            ads = self.ads.len(),
            "schedule replayed"
        );
        Ok(())
    }
}

fn write_ron<T: Serialize>(value: &T, path: &Path) -> std::io::Result<()> {
    let config = ron::ser::PrettyConfig::default()
        .struct_names(true)
        .enumerate_arrays(false);

    let content = ron::ser::to_string_pretty(value, config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;

    std::fs::write(path, content)
}
