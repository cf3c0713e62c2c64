// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sequential playlist holding the timeline in linear-time order.

use crate::config::PlaylistConfig;
use crate::entry::{ClipType, EntryId, PlaylistEntry};
use crate::error::{Result, SchedulerError};
use indexmap::IndexMap;

/// Ordered list of timeline intervals.
///
/// Entries are kept sorted by `linear_start_time`. Content entries tile the
/// timeline without gaps; advertisements are zero-duration entries that sit
/// between (or before/after) content pieces.
#[derive(Debug, Clone)]
pub struct SequentialPlaylist {
    entries: IndexMap<EntryId, PlaylistEntry>,
    next_id: u64,
    linear_duration: f64,
    config: PlaylistConfig,
}

impl SequentialPlaylist {
    /// Create an empty playlist with default tuning
    pub fn new() -> Self {
        Self::with_config(PlaylistConfig::default())
    }

    /// Create an empty playlist with custom tuning
    pub fn with_config(config: PlaylistConfig) -> Self {
        Self {
            entries: IndexMap::new(),
            // Start at 1 so an id is never zero
            next_id: 1,
            linear_duration: 0.0,
            config,
        }
    }

    /// Tuning in use
    pub fn config(&self) -> &PlaylistConfig {
        &self.config
    }

    fn allocate_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }

    fn index_of(&self, id: EntryId, operation: &'static str) -> Result<usize> {
        self.entries
            .get_index_of(&id)
            .ok_or(SchedulerError::EntryNotFound { operation, id })
    }

    /// Index of the first entry starting at `time` (within tolerance) or containing it
    fn index_at_time(&self, time: f64) -> Option<usize> {
        self.entries.values().position(|e| {
            self.config.is_near_zero(e.linear_start_time - time)
                || (e.linear_start_time <= time && time < e.linear_end_time())
        })
    }

    fn entry_at_index(&self, index: usize) -> Option<&PlaylistEntry> {
        self.entries.get_index(index).map(|(_, e)| e)
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Create a blank entry with a fresh id, to be filled in and inserted
    pub fn create_entry(&mut self) -> PlaylistEntry {
        let id = self.allocate_id();
        PlaylistEntry::new(id)
    }

    /// Create the tail piece of entry `split_from` cut `offset` seconds after its start.
    ///
    /// The new entry inherits the source's clip, type, policy and lineage. The
    /// source itself is left untouched.
    pub fn create_split_entry(&mut self, split_from: EntryId, offset: f64) -> Result<PlaylistEntry> {
        let index = self.index_of(split_from, "createEntry")?;
        let source = &self.entries[index];
        if source.is_zero_duration() {
            return Err(SchedulerError::ZeroDurationSplit(split_from));
        }
        let source = source.clone();
        let id = self.allocate_id();
        Ok(PlaylistEntry::split_tail(id, &source, offset))
    }

    /// Insert a zero-duration advertisement at its `linear_start_time` (mid-roll).
    ///
    /// If the time falls on the start of an existing entry the ad goes directly
    /// before it; otherwise the containing content entry is split in two and
    /// the ad is placed between the pieces.
    pub fn insert_entry(&mut self, mut entry: PlaylistEntry) -> Result<()> {
        if !entry.is_advertisement {
            return Err(SchedulerError::NotAdvertisement("insertEntry"));
        }
        if !entry.is_zero_duration() {
            return Err(SchedulerError::OverlayUnsupported("insertEntry"));
        }

        let index = self
            .index_at_time(entry.linear_start_time)
            .ok_or(SchedulerError::OutsidePlaylistRange(entry.linear_start_time))?;
        let found = &self.entries[index];
        let split_offset = entry.linear_start_time - found.linear_start_time;

        if self.config.is_near_zero(split_offset) {
            // Keep the list sorted when the ad lands slightly after the start
            if entry.linear_start_time > found.linear_start_time {
                entry.linear_start_time = found.linear_start_time;
            }
            tracing::debug!(id = %entry.id(), before = %found.id(), "inserting ad before entry");
            self.entries.shift_insert(index, entry.id(), entry);
            return Ok(());
        }

        if found.is_advertisement {
            return Err(SchedulerError::SplitAdvertisement(found.id()));
        }
        let found_id = found.id();
        let tail = self.create_split_entry(found_id, split_offset)?;

        let head = &mut self.entries[index];
        head.bump_split_count();
        head.max_rendering_time = tail.min_rendering_time;
        head.linear_duration = split_offset;
        entry.linear_start_time = head.linear_end_time();

        tracing::debug!(
            id = %entry.id(),
            split = %found_id,
            tail = %tail.id(),
            at = entry.linear_start_time,
            "splitting entry for mid-roll"
        );
        self.entries.shift_insert(index + 1, entry.id(), entry);
        self.entries.shift_insert(index + 2, tail.id(), tail);
        Ok(())
    }

    /// Append an entry after the current end of the timeline
    pub fn insert_entry_after_end(&mut self, mut entry: PlaylistEntry) -> Result<()> {
        if entry.is_advertisement && !entry.is_zero_duration() {
            return Err(SchedulerError::OverlayUnsupported("insertEntryAfterEnd"));
        }
        if let Some((_, last)) = self.entries.last() {
            entry.linear_start_time = last.linear_end_time();
        }
        self.linear_duration += entry.linear_duration;
        tracing::debug!(id = %entry.id(), start = entry.linear_start_time, "appending entry");
        self.entries.insert(entry.id(), entry);
        Ok(())
    }

    /// Prepend a zero-duration entry before the beginning of the timeline
    pub fn insert_entry_before_beginning(&mut self, entry: PlaylistEntry) -> Result<()> {
        if !entry.is_zero_duration() {
            return Err(SchedulerError::OverlayUnsupported("insertEntryBeforeBeginning"));
        }
        tracing::debug!(id = %entry.id(), "prepending entry");
        self.entries.shift_insert(0, entry.id(), entry);
        Ok(())
    }

    /// Insert a zero-duration entry directly after entry `after` (ad pod)
    pub fn insert_entry_after_id(&mut self, after: EntryId, mut entry: PlaylistEntry) -> Result<()> {
        let index = self.index_of(after, "insertEntryAfterId")?;
        let target = &self.entries[index];
        if target.is_seek_to_start() {
            return Err(SchedulerError::InsertAfterSeekToStart(after));
        }
        if !entry.is_zero_duration() {
            return Err(SchedulerError::OverlayUnsupported("insertEntryAfterId"));
        }
        entry.linear_start_time = target.linear_end_time();
        tracing::debug!(id = %entry.id(), %after, "inserting pod entry");
        self.entries.shift_insert(index + 1, entry.id(), entry);
        Ok(())
    }

    /// Insert the seek-to-start marker before the first entry with linear duration.
    ///
    /// Returns `Ok(None)` without inserting if a marker is already present.
    pub fn insert_seek_to_start(&mut self, mut entry: PlaylistEntry) -> Result<Option<&PlaylistEntry>> {
        let mut target = None;
        for (index, existing) in self.entries.values().enumerate() {
            if existing.is_seek_to_start() {
                return Ok(None);
            }
            if existing.linear_duration > 0.0 {
                target = Some((index, existing.linear_start_time));
                break;
            }
        }
        let Some((index, start)) = target else {
            return Err(SchedulerError::NoContent);
        };

        entry.clip_type = ClipType::SeekToStart;
        entry.linear_start_time = start;
        let id = entry.id();
        tracing::debug!(%id, "inserting seek-to-start marker");
        self.entries.shift_insert(index, id, entry);
        Ok(self.entries.get(&id))
    }

    /// Remove an advertisement, welding the pieces around it if they share lineage.
    ///
    /// The removed entry is returned with its `delete_after_play` flag cleared.
    pub fn remove(&mut self, id: EntryId) -> Result<PlaylistEntry> {
        let index = self.index_of(id, "remove")?;
        if !self.entries[index].is_advertisement {
            return Err(SchedulerError::RemoveContent(id));
        }
        let Some((_, mut removed)) = self.entries.shift_remove_index(index) else {
            return Err(SchedulerError::EntryNotFound { operation: "remove", id });
        };
        self.linear_duration -= removed.linear_duration;
        removed.bump_split_count();
        removed.delete_after_play = false;
        tracing::debug!(%id, "removed entry");

        let weldable = index > 0
            && match (self.entry_at_index(index - 1), self.entry_at_index(index)) {
                (Some(prev), Some(next)) => prev.shares_lineage(next),
                _ => false,
            };
        if weldable {
            if let Some((_, mut next)) = self.entries.shift_remove_index(index) {
                // Bumped only so stale holders of the absorbed piece notice
                next.bump_split_count();
                let prev = &mut self.entries[index - 1];
                prev.linear_duration += next.linear_duration + removed.linear_duration;
                prev.max_rendering_time = next.max_rendering_time;
                prev.bump_split_count();
                tracing::debug!(into = %prev.id(), absorbed = %next.id(), "welded split entries");
            }
        }
        Ok(removed)
    }

    /// Remove every entry
    pub fn remove_all_entries(&mut self) {
        self.entries.clear();
        self.linear_duration = 0.0;
    }

    /// Notify that an entry finished playing; removes it if flagged `delete_after_play`
    pub fn on_played_entry(&mut self, id: EntryId) -> Result<Option<PlaylistEntry>> {
        match self.entries.get(&id) {
            Some(entry) if entry.delete_after_play => self.remove(id).map(Some),
            _ => Ok(None),
        }
    }

    // ---------------------------------------------------------------
    // Access
    // ---------------------------------------------------------------

    /// Look up a live entry by id
    pub fn entry(&self, id: EntryId) -> Result<&PlaylistEntry> {
        self.entries
            .get(&id)
            .ok_or(SchedulerError::EntryNotFound { operation: "entry", id })
    }

    /// First entry starting at `time` (within tolerance) or whose interval contains it
    pub fn entry_at_time(&self, time: f64) -> Option<&PlaylistEntry> {
        self.index_at_time(time).and_then(|i| self.entry_at_index(i))
    }

    /// Entry of lineage `lineage` covering `time`, tolerating drift at both ends
    pub fn entry_in_lineage_at(&self, lineage: EntryId, time: f64) -> Option<&PlaylistEntry> {
        let tolerance = self.config.time_tolerance;
        self.entries.values().find(|e| {
            e.id_split_from() == lineage
                && e.linear_start_time - tolerance <= time
                && time <= e.linear_end_time() + tolerance
        })
    }

    /// Entry following `id`, `None` at the end of the list
    pub fn entry_after_id(&self, id: EntryId) -> Result<Option<&PlaylistEntry>> {
        let index = self.index_of(id, "entryAfterId")?;
        Ok(self.entry_at_index(index + 1))
    }

    /// Entry preceding `id`, `None` at the start of the list
    pub fn entry_before_id(&self, id: EntryId) -> Result<Option<&PlaylistEntry>> {
        let index = self.index_of(id, "entryBeforeId")?;
        Ok(index.checked_sub(1).and_then(|i| self.entry_at_index(i)))
    }

    /// Total linear duration of the timeline
    pub fn linear_duration(&self) -> f64 {
        self.linear_duration
    }

    /// All entries in timeline order
    pub fn entries(&self) -> impl Iterator<Item = &PlaylistEntry> {
        self.entries.values()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the playlist is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dump the entries as a JSON value
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.entries.values().collect::<Vec<_>>())
    }
}

impl Default for SequentialPlaylist {
    fn default() -> Self {
        Self::new()
    }
}

/// Playlist capability handed to sequencer code.
///
/// Allows every read plus the played-entry notification, but none of the
/// insert/split/remove operations reserved for the scheduler.
#[derive(Debug)]
pub struct PlaylistAccess<'a> {
    playlist: &'a mut SequentialPlaylist,
}

impl<'a> PlaylistAccess<'a> {
    /// Wrap a playlist
    pub fn new(playlist: &'a mut SequentialPlaylist) -> Self {
        Self { playlist }
    }

    /// Reborrow for a shorter scope
    pub fn reborrow(&mut self) -> PlaylistAccess<'_> {
        PlaylistAccess { playlist: self.playlist }
    }

    /// Read-only view of the playlist
    pub fn playlist(&self) -> &SequentialPlaylist {
        self.playlist
    }

    /// See [`SequentialPlaylist::entry`]
    pub fn entry(&self, id: EntryId) -> Result<&PlaylistEntry> {
        self.playlist.entry(id)
    }

    /// See [`SequentialPlaylist::entry_at_time`]
    pub fn entry_at_time(&self, time: f64) -> Option<&PlaylistEntry> {
        self.playlist.entry_at_time(time)
    }

    /// See [`SequentialPlaylist::entry_in_lineage_at`]
    pub fn entry_in_lineage_at(&self, lineage: EntryId, time: f64) -> Option<&PlaylistEntry> {
        self.playlist.entry_in_lineage_at(lineage, time)
    }

    /// See [`SequentialPlaylist::entry_after_id`]
    pub fn entry_after_id(&self, id: EntryId) -> Result<Option<&PlaylistEntry>> {
        self.playlist.entry_after_id(id)
    }

    /// See [`SequentialPlaylist::entry_before_id`]
    pub fn entry_before_id(&self, id: EntryId) -> Result<Option<&PlaylistEntry>> {
        self.playlist.entry_before_id(id)
    }

    /// See [`SequentialPlaylist::linear_duration`]
    pub fn linear_duration(&self) -> f64 {
        self.playlist.linear_duration()
    }

    /// See [`SequentialPlaylist::on_played_entry`]
    pub fn on_played_entry(&mut self, id: EntryId) -> Result<Option<PlaylistEntry>> {
        self.playlist.on_played_entry(id)
    }
}
