// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error type shared by the playlist and the scheduler.

use crate::entry::EntryId;

/// Result type for playlist and scheduler operations
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Error raised by the sequential playlist or the scheduler.
///
/// Every failure is reported before the playlist is touched, so an `Err`
/// always means nothing was applied.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchedulerError {
    /// No entry with this id is in the playlist
    #[error("{operation} called with invalid entry id {id}")]
    EntryNotFound {
        /// Operation that performed the lookup
        operation: &'static str,
        /// Id that was looked up
        id: EntryId,
    },

    /// The entry to split from has no linear duration
    #[error("entry {0} has zero linear duration and cannot be split")]
    ZeroDurationSplit(EntryId),

    /// Only advertisements can be inserted into the timeline
    #[error("{0} of non-advertisement entry")]
    NotAdvertisement(&'static str),

    /// Split target is an advertisement; zero-duration ads never reach this
    #[error("insertEntry would split advertisement {0}")]
    SplitAdvertisement(EntryId),

    /// The requested linear time is not covered by any entry
    #[error("linear start time {0} outside playlist range")]
    OutsidePlaylistRange(f64),

    /// Main content clips cannot be removed
    #[error("remove of main content entry {0} is not allowed")]
    RemoveContent(EntryId),

    /// Entries cannot be attached after the seek-to-start marker
    #[error("insertEntryAfterId {0}: cannot insert after SeekToStart")]
    InsertAfterSeekToStart(EntryId),

    /// Overlay (non-zero linear duration) advertisements are not supported
    #[error("{0}: overlay advertisements are not supported")]
    OverlayUnsupported(&'static str),

    /// The seek-to-start marker needs main content to attach to
    #[error("insertSeekToStart cannot be inserted inside playlist with no content")]
    NoContent,

    /// A manifest interval is shorter than the configured minimum
    #[error("{operation} duration too small: {duration}")]
    DurationTooSmall {
        /// Operation that checked the interval
        operation: &'static str,
        /// Offending duration
        duration: f64,
    },

    /// Caller supplied a malformed or missing value
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
