// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback segments and their id registry.

use crate::error::{Result, SequencerError};
use serde::{Deserialize, Serialize};
use splicer_playlist::{IdPool, PlaylistEntry, SequentialPlaylist};
use std::fmt;

/// Unique identifier for a playback segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub u64);

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The clip currently playing or buffering.
///
/// Holds a copy of the playlist entry taken when the segment was created or
/// last refreshed, plus that entry's `split_count` at the time. Comparing the
/// copy against the live playlist tells whether a split or weld has moved the
/// entry's bounds since.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSegment {
    segment_id: SegmentId,
    clip: PlaylistEntry,
    initial_playback_start_time: f64,
    initial_playback_rate: f64,
    split_count: u32,
}

impl PlaybackSegment {
    fn new(segment_id: SegmentId, clip: &PlaylistEntry, start_time: f64, rate: f64) -> Self {
        Self {
            segment_id,
            clip: clip.clone(),
            initial_playback_start_time: start_time,
            initial_playback_rate: rate,
            split_count: clip.split_count(),
        }
    }

    /// Segment id
    pub fn segment_id(&self) -> SegmentId {
        self.segment_id
    }

    /// Copy of the referenced playlist entry
    pub fn clip(&self) -> &PlaylistEntry {
        &self.clip
    }

    /// Manifest time playback starts at
    pub fn initial_playback_start_time(&self) -> f64 {
        self.initial_playback_start_time
    }

    /// Playback rate the segment was started with
    pub fn initial_playback_rate(&self) -> f64 {
        self.initial_playback_rate
    }

    /// Point the segment at a refreshed entry and capture its change counter
    pub fn set_clip(&mut self, clip: PlaylistEntry) {
        self.split_count = clip.split_count();
        self.clip = clip;
    }

    /// Whether the referenced entry was split, welded or removed since capture
    pub fn is_clip_changed(&self, playlist: &SequentialPlaylist) -> bool {
        match playlist.entry(self.clip.id()) {
            Ok(live) => live.split_count() != self.split_count,
            Err(_) => true,
        }
    }
}

/// Id-indexed store of live playback segments
#[derive(Debug, Default)]
pub struct PlaybackSegmentRegistry {
    pool: IdPool<PlaybackSegment>,
}

impl PlaybackSegmentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a segment playing `clip` from manifest time `start_time`
    pub fn create(&mut self, clip: &PlaylistEntry, start_time: f64, rate: f64) -> SegmentId {
        let id = self
            .pool
            .insert_with(|id| PlaybackSegment::new(SegmentId(id), clip, start_time, rate));
        tracing::debug!(segment = id, clip = %clip.id(), start_time, rate, "created playback segment");
        SegmentId(id)
    }

    /// Look up a live segment
    pub fn get(&self, id: SegmentId) -> Result<&PlaybackSegment> {
        self.pool.get(id.0).map_err(|_| SequencerError::SegmentNotFound(id))
    }

    /// Look up a live segment mutably
    pub fn get_mut(&mut self, id: SegmentId) -> Result<&mut PlaybackSegment> {
        self.pool.get_mut(id.0).map_err(|_| SequencerError::SegmentNotFound(id))
    }

    /// Release a segment so its id becomes invalid
    pub fn release(&mut self, id: SegmentId) -> Result<PlaybackSegment> {
        let segment = self
            .pool
            .release(id.0)
            .map_err(|_| SequencerError::SegmentNotFound(id))?;
        tracing::debug!(segment = %id, "released playback segment");
        Ok(segment)
    }

    /// See [`PlaybackSegment::is_clip_changed`]
    pub fn is_clip_changed(&self, id: SegmentId, playlist: &SequentialPlaylist) -> Result<bool> {
        Ok(self.get(id)?.is_clip_changed(playlist))
    }

    /// Number of live segments
    pub fn live_count(&self) -> usize {
        self.pool.live_count()
    }

    /// Number of pool slots currently backed
    pub fn backing_len(&self) -> usize {
        self.pool.backing_len()
    }

    /// Drop every segment
    pub fn reset(&mut self) {
        self.pool.reset();
    }

    /// Dump the pool as a JSON value
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.pool.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splicer_playlist::{ContentClipParams, RollType, ScheduleClipParams, Scheduler};

    fn playlist_with_content() -> (SequentialPlaylist, PlaylistEntry) {
        let mut playlist = SequentialPlaylist::new();
        let entry = Scheduler::new(&mut playlist)
            .append_content_clip(&ContentClipParams {
                clip_uri: None,
                min_manifest_position: 0.0,
                max_manifest_position: 100.0,
            })
            .unwrap();
        (playlist, entry)
    }

    #[test]
    fn test_segment_ids_are_unique_and_released() {
        let (_, entry) = playlist_with_content();
        let mut registry = PlaybackSegmentRegistry::new();
        let a = registry.create(&entry, 0.0, 1.0);
        let b = registry.create(&entry, 5.0, 1.0);
        assert!(b > a);
        assert_eq!(registry.get(b).unwrap().initial_playback_start_time(), 5.0);

        registry.release(a).unwrap();
        assert!(matches!(registry.get(a), Err(SequencerError::SegmentNotFound(id)) if id == a));
        assert!(registry.release(a).is_err());
        assert!(registry.get(SegmentId(99)).is_err());
    }

    #[test]
    fn test_clip_changed_after_split() {
        let (mut playlist, entry) = playlist_with_content();
        let mut registry = PlaybackSegmentRegistry::new();
        let segment = registry.create(&entry, 0.0, 1.0);
        assert!(!registry.is_clip_changed(segment, &playlist).unwrap());

        let mut ad = ScheduleClipParams::new(RollType::Mid, 0.0, 10.0);
        ad.start_time = 30.0;
        Scheduler::new(&mut playlist).schedule_clip(&ad).unwrap();
        assert!(registry.is_clip_changed(segment, &playlist).unwrap());

        let refreshed = playlist.entry(entry.id()).unwrap().clone();
        registry.get_mut(segment).unwrap().set_clip(refreshed);
        assert!(!registry.is_clip_changed(segment, &playlist).unwrap());
    }

    #[test]
    fn test_clip_changed_when_entry_removed() {
        let (mut playlist, _) = playlist_with_content();
        let ad = Scheduler::new(&mut playlist)
            .schedule_clip(&ScheduleClipParams::new(RollType::Pre, 0.0, 10.0))
            .unwrap();
        let mut registry = PlaybackSegmentRegistry::new();
        let segment = registry.create(&ad, 0.0, 1.0);

        playlist.remove(ad.id()).unwrap();
        assert!(registry.is_clip_changed(segment, &playlist).unwrap());
    }

    #[test]
    fn test_registry_stays_compact_over_long_session() {
        let (_, entry) = playlist_with_content();
        let mut registry = PlaybackSegmentRegistry::new();
        let mut current = registry.create(&entry, 0.0, 1.0);
        for _ in 0..500 {
            let next = registry.create(&entry, 0.0, 1.0);
            registry.release(current).unwrap();
            current = next;
        }
        assert_eq!(registry.live_count(), 1);
        assert_eq!(registry.backing_len(), 1);
        assert_eq!(current, SegmentId(501));
    }
}
