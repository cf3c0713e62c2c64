// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback sequencing for Splicer.
//!
//! Turns a [`splicer_playlist::SequentialPlaylist`] into the stream of
//! [`PlaybackSegment`]s a player renders, one clip at a time.
//!
//! ## Architecture
//!
//! Every operation runs through a [`SequencerPluginChain`]: installed
//! [`SequencerPlugin`]s first, newest in front, then the
//! [`DefaultSequencer`]. A [`SequencingSession`] owns the playlist, the
//! segment registry and the chain for one player.

pub mod default_sequencer;
pub mod error;
pub mod params;
pub mod plugin;
pub mod segment;
pub mod session;

pub use default_sequencer::{DefaultSequencer, DEFAULT_SEQUENCER_NAME};
pub use error::{Result, SequencerError};
pub use params::{
    EndOfBufferingParams, EndOfMediaParams, LinearPosition, ManifestToLinearParams,
    ManifestToSeekbarParams, PlaybackErrorParams, SeekFromLinearParams, SeekFromSeekbarParams,
    SeekbarTime,
};
pub use plugin::{Next, SequencerContext, SequencerPlugin, SequencerPluginChain};
pub use segment::{PlaybackSegment, PlaybackSegmentRegistry, SegmentId};
pub use session::{Sequencer, SequencingSession};
