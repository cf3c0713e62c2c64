// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline playlist for Splicer.
//!
//! This crate owns the ordered interval list a video player walks through:
//! - Main content clips tiling the linear timeline
//! - Zero-duration advertisements attached as pre-, mid-, post-roll or pods
//! - Splitting content around mid-rolls and welding it back on removal
//! - The seek-to-start marker
//!
//! ## Architecture
//!
//! [`SequentialPlaylist`] provides the primitive insert/split/weld/remove
//! operations. [`Scheduler`] sits on top and enforces the scheduling rules.
//! Sequencer code only ever sees a [`PlaylistAccess`], which cannot mutate
//! the timeline beyond the played-entry notification.

pub mod config;
pub mod entry;
pub mod error;
pub mod playlist;
pub mod pool;
pub mod scheduler;

pub use config::PlaylistConfig;
pub use entry::{ClipType, EntryId, PlaybackPolicy, PlaylistEntry, UNBOUNDED_RENDERING_TIME};
pub use error::{Result, SchedulerError};
pub use playlist::{PlaylistAccess, SequentialPlaylist};
pub use pool::{IdPool, PoolError, PoolSnapshot};
pub use scheduler::{
    ContentClipParams, RemoveClipParams, RollType, ScheduleClipParams, Scheduler, SeekToStartParams,
};
