// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playlist tuning values.

use serde::{Deserialize, Serialize};

/// Default start-time matching tolerance in seconds (1 ms)
pub const DEFAULT_TIME_TOLERANCE: f64 = 0.001;

/// Default shortest manifest interval accepted for a clip, in seconds
pub const DEFAULT_MIN_CLIP_DURATION: f64 = 1.0;

/// Tuning shared by the sequential playlist and the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistConfig {
    /// Two start times closer than this are considered equal
    pub time_tolerance: f64,
    /// Shortest manifest interval a content or ad clip may cover
    pub min_clip_duration: f64,
}

impl PlaylistConfig {
    /// Whether `value` is within the time tolerance of zero
    pub fn is_near_zero(&self, value: f64) -> bool {
        value.abs() < self.time_tolerance
    }
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            time_tolerance: DEFAULT_TIME_TOLERANCE,
            min_clip_duration: DEFAULT_MIN_CLIP_DURATION,
        }
    }
}
