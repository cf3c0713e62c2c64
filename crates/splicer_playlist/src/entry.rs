// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playlist entry: one interval on the timeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// `max_rendering_time` sentinel meaning the clip has no upper bound
pub const UNBOUNDED_RENDERING_TIME: f64 = -1.0;

/// Unique identifier for a playlist entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of clip an entry plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClipType {
    /// Media clip
    #[default]
    Media,
    /// Static image
    Static,
    /// VAST ad document
    #[serde(rename = "VAST", alias = "Vast")]
    Vast,
    /// Marker played before the first content clip
    SeekToStart,
    /// Main program content
    ProgramContent,
}

impl ClipType {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Media => "Media",
            Self::Static => "Static",
            Self::Vast => "VAST",
            Self::SeekToStart => "SeekToStart",
            Self::ProgramContent => "ProgramContent",
        }
    }
}

/// Playback restrictions attached to a clip.
///
/// The playlist never interprets these; they are handed back to the player
/// while the clip is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaybackPolicy {
    /// Seeking is allowed
    pub allow_seek: bool,
    /// Rewind is allowed
    pub allow_rewind: bool,
    /// Fast forward is allowed
    pub allow_fast_forward: bool,
    /// Skipping back is allowed
    pub allow_skip_back: bool,
    /// Skipping forward is allowed
    pub allow_skip_forward: bool,
    /// Pausing is allowed
    pub allow_pause: bool,
}

impl PlaybackPolicy {
    /// Policy that forbids every trick-play action
    pub fn locked() -> Self {
        Self {
            allow_seek: false,
            allow_rewind: false,
            allow_fast_forward: false,
            allow_skip_back: false,
            allow_skip_forward: false,
            allow_pause: false,
        }
    }
}

impl Default for PlaybackPolicy {
    fn default() -> Self {
        Self {
            allow_seek: true,
            allow_rewind: true,
            allow_fast_forward: true,
            allow_skip_back: true,
            allow_skip_forward: true,
            allow_pause: true,
        }
    }
}

/// One interval on the timeline.
///
/// `id`, `id_split_from` and `split_count` are owned by the playlist; the
/// remaining fields are filled in by the caller between
/// [`SequentialPlaylist::create_entry`](crate::SequentialPlaylist::create_entry)
/// and insertion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistEntry {
    id: EntryId,
    id_split_from: EntryId,
    split_count: u32,
    /// Clip location
    #[serde(rename = "clipURI")]
    pub clip_uri: Option<String>,
    /// Clip kind
    pub clip_type: ClipType,
    /// Whether this entry is an advertisement
    pub is_advertisement: bool,
    /// Opaque playback policy
    pub playback_policy: PlaybackPolicy,
    /// Remove the entry once it has been played
    pub delete_after_play: bool,
    /// Start on the linear timeline
    pub linear_start_time: f64,
    /// Length on the linear timeline (zero for pause-timeline ads)
    pub linear_duration: f64,
    /// Clip begin in manifest time
    pub min_rendering_time: f64,
    /// Clip end in manifest time, or [`UNBOUNDED_RENDERING_TIME`]
    pub max_rendering_time: f64,
}

impl PlaylistEntry {
    /// Create a blank advertisement entry that is its own lineage root
    pub(crate) fn new(id: EntryId) -> Self {
        Self {
            id,
            id_split_from: id,
            split_count: 0,
            clip_uri: None,
            clip_type: ClipType::Media,
            is_advertisement: true,
            playback_policy: PlaybackPolicy::default(),
            delete_after_play: false,
            linear_start_time: 0.0,
            linear_duration: 0.0,
            min_rendering_time: 0.0,
            max_rendering_time: 0.0,
        }
    }

    /// Create the tail piece of `source` split at `offset`
    pub(crate) fn split_tail(id: EntryId, source: &PlaylistEntry, offset: f64) -> Self {
        Self {
            id,
            id_split_from: source.id_split_from,
            split_count: 0,
            clip_uri: source.clip_uri.clone(),
            clip_type: source.clip_type,
            is_advertisement: source.is_advertisement,
            playback_policy: source.playback_policy,
            delete_after_play: source.delete_after_play,
            linear_start_time: source.linear_start_time + offset,
            linear_duration: source.linear_duration - offset,
            min_rendering_time: source.min_rendering_time + offset,
            max_rendering_time: source.max_rendering_time,
        }
    }

    /// Unique id
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Id of the lineage root this entry was split from (its own id if never split)
    pub fn id_split_from(&self) -> EntryId {
        self.id_split_from
    }

    /// Change counter bumped whenever a split or weld moves this entry's bounds
    pub fn split_count(&self) -> u32 {
        self.split_count
    }

    pub(crate) fn bump_split_count(&mut self) {
        self.split_count += 1;
    }

    /// End on the linear timeline
    pub fn linear_end_time(&self) -> f64 {
        self.linear_start_time + self.linear_duration
    }

    /// Length of the clip's own manifest interval
    pub fn rendering_duration(&self) -> f64 {
        self.max_rendering_time - self.min_rendering_time
    }

    /// Whether the entry does not advance the linear timeline
    pub fn is_zero_duration(&self) -> bool {
        self.linear_duration == 0.0
    }

    /// Whether this is the seek-to-start marker
    pub fn is_seek_to_start(&self) -> bool {
        self.clip_type == ClipType::SeekToStart
    }

    /// Whether both entries descend from the same original interval
    pub fn shares_lineage(&self, other: &PlaylistEntry) -> bool {
        self.id_split_from == other.id_split_from
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tail_shifts_bounds() {
        let mut source = PlaylistEntry::new(EntryId(1));
        source.is_advertisement = false;
        source.clip_type = ClipType::ProgramContent;
        source.linear_start_time = 10.0;
        source.linear_duration = 100.0;
        source.min_rendering_time = 5.0;
        source.max_rendering_time = 105.0;

        let tail = PlaylistEntry::split_tail(EntryId(7), &source, 30.0);
        assert_eq!(tail.id(), EntryId(7));
        assert_eq!(tail.id_split_from(), EntryId(1));
        assert_eq!(tail.linear_start_time, 40.0);
        assert_eq!(tail.linear_duration, 70.0);
        assert_eq!(tail.min_rendering_time, 35.0);
        assert_eq!(tail.max_rendering_time, 105.0);
        assert!(tail.shares_lineage(&source));
        assert!(!tail.is_advertisement);
    }

    #[test]
    fn test_clip_type_wire_names() {
        assert_eq!(serde_json::to_string(&ClipType::Vast).unwrap(), "\"VAST\"");
        let parsed: ClipType = serde_json::from_str("\"ProgramContent\"").unwrap();
        assert_eq!(parsed, ClipType::ProgramContent);
    }

    #[test]
    fn test_policy_defaults_to_permissive() {
        let policy: PlaybackPolicy = serde_json::from_str(r#"{"allowSeek": false}"#).unwrap();
        assert!(!policy.allow_seek);
        assert!(policy.allow_pause);
    }
}
