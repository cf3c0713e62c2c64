// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sequencer error type.

use crate::segment::SegmentId;
use splicer_playlist::SchedulerError;

/// Result type for sequencer operations
pub type Result<T> = std::result::Result<T, SequencerError>;

/// Error raised by a sequencer chain operation
#[derive(Debug, thiserror::Error)]
pub enum SequencerError {
    /// No live playback segment with this id
    #[error("invalid playback segment id: {0}")]
    SegmentNotFound(SegmentId),

    /// The playlist rejected a lookup or notification
    #[error(transparent)]
    Playlist(#[from] SchedulerError),

    /// Seek target is not covered by the playlist
    #[error("{operation} outside playlist range: {position}")]
    OutsidePlaylistRange {
        /// Operation that was seeking
        operation: &'static str,
        /// Requested position
        position: f64,
    },

    /// Seek inside a zero-duration clip went past the clip's own end
    #[error("seekFromSeekbarPosition outside segment range: {0}")]
    OutsideSegmentRange(f64),

    /// A welded or split entry could not be found again; the playlist is inconsistent
    #[error("{operation} failed to find welded playlist entry at time {time}")]
    WeldedEntryNotFound {
        /// Operation that was re-resolving its clip
        operation: &'static str,
        /// Linear time that was searched
        time: f64,
    },

    /// Failure reported by a sequencer plugin
    #[error("{plugin}: {message}")]
    Plugin {
        /// Name of the failing plugin
        plugin: String,
        /// What went wrong
        message: String,
    },

    /// Diagnostic dump could not be serialized
    #[error("probe serialization failed: {0}")]
    Probe(#[from] serde_json::Error),
}
