// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scheduler: builds the playlist from content clips and ad requests.
//!
//! The scheduler owns the domain rules (minimum clip length, no overlay ads,
//! roll-type placement) and translates each request into one of the
//! [`SequentialPlaylist`] primitives.

use crate::entry::{ClipType, EntryId, PlaybackPolicy, PlaylistEntry, UNBOUNDED_RENDERING_TIME};
use crate::error::{Result, SchedulerError};
use crate::playlist::SequentialPlaylist;
use serde::{Deserialize, Serialize};

/// Where an advertisement attaches to the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollType {
    /// Before the beginning of the timeline
    Pre,
    /// After the end of the timeline
    Post,
    /// At a linear time inside the content
    Mid,
    /// Directly after another entry of an ad pod
    Pod,
}

/// Parameters for appending a content clip
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentClipParams {
    /// Media location
    #[serde(rename = "clipURI")]
    pub clip_uri: Option<String>,
    /// First manifest time to play
    pub min_manifest_position: f64,
    /// Last manifest time to play; `max - min` must reach the minimum clip duration
    pub max_manifest_position: f64,
}

/// Parameters for scheduling an advertisement clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleClipParams {
    /// Clip location
    #[serde(rename = "clipURI", default)]
    pub clip_uri: Option<String>,
    /// Clip kind
    #[serde(default)]
    pub clip_type: ClipType,
    /// First manifest time to play
    #[serde(default)]
    pub min_manifest_position: Option<f64>,
    /// Manifest time the clip plays to; derived from the linear duration when absent
    #[serde(default)]
    pub max_manifest_position: Option<f64>,
    /// Linear start time, used by [`RollType::Mid`]
    #[serde(default)]
    pub start_time: f64,
    /// Linear duration; only zero (pause-timeline) ads are supported
    #[serde(default)]
    pub linear_duration: f64,
    /// Opaque playback policy
    #[serde(default)]
    pub playback_policy: PlaybackPolicy,
    /// Remove the ad once it has been played
    #[serde(default)]
    pub delete_after_play: bool,
    /// Placement
    pub roll_type: RollType,
    /// Entry to follow, used by [`RollType::Pod`]
    #[serde(default)]
    pub append_to: Option<EntryId>,
}

impl ScheduleClipParams {
    /// Parameters for a zero-duration ad with the given placement and manifest interval
    pub fn new(roll_type: RollType, min_manifest_position: f64, max_manifest_position: f64) -> Self {
        Self {
            clip_uri: None,
            clip_type: ClipType::Media,
            min_manifest_position: Some(min_manifest_position),
            max_manifest_position: Some(max_manifest_position),
            start_time: 0.0,
            linear_duration: 0.0,
            playback_policy: PlaybackPolicy::default(),
            delete_after_play: false,
            roll_type,
            append_to: None,
        }
    }
}

/// Parameters for the seek-to-start marker
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeekToStartParams {
    /// Live content location, if any
    #[serde(rename = "clipURI")]
    pub clip_uri: Option<String>,
}

/// Parameters for removing a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveClipParams {
    /// Entry to remove
    pub playlist_entry_id: EntryId,
}

fn finite(value: f64, what: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SchedulerError::InvalidInput(format!("{what} not a number")))
    }
}

/// Scheduler over a borrowed playlist
#[derive(Debug)]
pub struct Scheduler<'a> {
    playlist: &'a mut SequentialPlaylist,
}

impl<'a> Scheduler<'a> {
    /// Wrap a playlist
    pub fn new(playlist: &'a mut SequentialPlaylist) -> Self {
        Self { playlist }
    }

    fn min_clip_duration(&self) -> f64 {
        self.playlist.config().min_clip_duration
    }

    /// Empty the schedule
    pub fn reset(&mut self) {
        tracing::debug!("resetting schedule");
        self.playlist.remove_all_entries();
    }

    /// Remove a scheduled advertisement
    pub fn remove_clip(&mut self, id: EntryId) -> Result<PlaylistEntry> {
        self.playlist.remove(id)
    }

    /// Append a main-content clip to the end of the timeline
    pub fn append_content_clip(&mut self, params: &ContentClipParams) -> Result<PlaylistEntry> {
        let min = finite(params.min_manifest_position, "appendContentClip minManifestPosition")?;
        let max = finite(params.max_manifest_position, "appendContentClip maxManifestPosition")?;
        let duration = max - min;
        if duration < self.min_clip_duration() {
            return Err(SchedulerError::DurationTooSmall {
                operation: "appendContentClip",
                duration,
            });
        }

        let mut entry = self.playlist.create_entry();
        entry.clip_uri = params.clip_uri.clone();
        entry.clip_type = ClipType::ProgramContent;
        entry.min_rendering_time = min;
        entry.max_rendering_time = max;
        entry.linear_duration = duration;
        entry.is_advertisement = false;

        let id = entry.id();
        self.playlist.insert_entry_after_end(entry)?;
        Ok(self.playlist.entry(id)?.clone())
    }

    /// Schedule an advertisement according to its roll type
    pub fn schedule_clip(&mut self, params: &ScheduleClipParams) -> Result<PlaylistEntry> {
        let linear_duration = finite(params.linear_duration, "scheduleClip linearDuration")?;
        let min = finite(params.min_manifest_position.unwrap_or(0.0), "scheduleClip minManifestPosition")?;

        let max = match params.max_manifest_position {
            Some(max) => {
                let max = finite(max, "scheduleClip maxManifestPosition")?;
                let rendering = max - min;
                if rendering < self.min_clip_duration() {
                    return Err(SchedulerError::DurationTooSmall {
                        operation: "scheduleClip maxManifestPosition",
                        duration: rendering,
                    });
                }
                max
            }
            None if linear_duration == 0.0 => {
                return Err(SchedulerError::InvalidInput(
                    "scheduleClip cannot determine maxRenderingTime given missing \
                     maxManifestPosition and zero linearDuration"
                        .to_string(),
                ));
            }
            None => min + linear_duration,
        };

        if linear_duration != 0.0 {
            return Err(SchedulerError::OverlayUnsupported("scheduleClip"));
        }
        let start_time = match params.roll_type {
            RollType::Mid => finite(params.start_time, "scheduleClip startTime")?,
            _ => 0.0,
        };

        let mut entry = self.playlist.create_entry();
        entry.clip_uri = params.clip_uri.clone();
        entry.clip_type = params.clip_type;
        entry.linear_duration = linear_duration;
        entry.min_rendering_time = min;
        entry.max_rendering_time = max;
        entry.is_advertisement = true;
        entry.playback_policy = params.playback_policy;
        entry.delete_after_play = params.delete_after_play;
        entry.linear_start_time = start_time;

        let id = entry.id();
        match params.roll_type {
            RollType::Pre => self.playlist.insert_entry_before_beginning(entry)?,
            RollType::Post => self.playlist.insert_entry_after_end(entry)?,
            RollType::Mid => self.playlist.insert_entry(entry)?,
            RollType::Pod => {
                let after = params.append_to.ok_or_else(|| {
                    SchedulerError::InvalidInput("scheduleClip Pod requires appendTo".to_string())
                })?;
                self.playlist.insert_entry_after_id(after, entry)?;
            }
        }
        tracing::debug!(%id, roll = ?params.roll_type, "scheduled ad clip");
        Ok(self.playlist.entry(id)?.clone())
    }

    /// Place the seek-to-start marker; `None` if one is already scheduled
    pub fn set_seek_to_start(&mut self, params: &SeekToStartParams) -> Result<Option<PlaylistEntry>> {
        let mut entry = self.playlist.create_entry();
        entry.clip_uri = params.clip_uri.clone();
        entry.clip_type = ClipType::SeekToStart;
        entry.max_rendering_time = UNBOUNDED_RENDERING_TIME;
        entry.delete_after_play = true;
        entry.is_advertisement = true;

        Ok(self.playlist.insert_seek_to_start(entry)?.cloned())
    }
}
