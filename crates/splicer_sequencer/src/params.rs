// SPDX-License-Identifier: MIT OR Apache-2.0
//! Parameter and result records for sequencer operations.

use crate::segment::SegmentId;
use serde::{Deserialize, Serialize};
use splicer_playlist::PlaybackPolicy;

/// Input of `manifest_to_seekbar_time`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestToSeekbarParams {
    /// Segment being rendered
    pub current_segment_id: SegmentId,
    /// Signed playback rate; negative means rewinding
    #[serde(default = "default_rate")]
    pub playback_rate: f64,
    /// Position in the segment's manifest time
    pub current_playback_position: f64,
}

/// Seekbar mapping of a manifest position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeekbarTime {
    /// Position to draw on the seekbar
    pub current_seekbar_position: f64,
    /// Lower seekbar bound
    pub min_seekbar_position: f64,
    /// Upper seekbar bound
    pub max_seekbar_position: f64,
    /// Policy of the playing advertisement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playback_policy: Option<PlaybackPolicy>,
    /// Playback has run past the segment's range in its direction
    pub playback_range_exceeded: bool,
}

/// Input of `manifest_to_linear_time`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestToLinearParams {
    /// Segment being rendered
    pub current_segment_id: SegmentId,
    /// Position in the segment's manifest time
    pub current_playback_position: f64,
}

/// Linear-timeline mapping of a manifest position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearPosition {
    /// Position on the linear timeline
    pub linear_position: f64,
    /// The segment's clip occupies linear time
    pub is_on_linear_timeline: bool,
}

/// Input of `seek_from_linear_position`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeekFromLinearParams {
    /// Segment to replace, if any is playing
    #[serde(default)]
    pub current_segment_id: Option<SegmentId>,
    /// Target linear position
    pub linear_seek_position: f64,
}

/// Input of `seek_from_seekbar_position`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeekFromSeekbarParams {
    /// Segment to replace
    pub current_segment_id: SegmentId,
    /// Target seekbar position; negative values clamp to zero
    pub seekbar_seek_position: f64,
}

/// Input of `on_end_of_media`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndOfMediaParams {
    /// Segment that finished
    pub current_segment_id: SegmentId,
    /// Position where rendering stopped
    #[serde(default)]
    pub current_playback_position: f64,
    /// Signed playback rate
    #[serde(default = "default_rate")]
    pub current_playback_rate: f64,
    /// Skip the played-entry notification
    #[serde(default)]
    pub is_not_played: bool,
    /// No further segment is wanted
    #[serde(default)]
    pub is_end_of_sequence: bool,
}

impl EndOfMediaParams {
    /// Params for a segment that played through at `rate`
    pub fn new(current_segment_id: SegmentId, rate: f64) -> Self {
        Self {
            current_segment_id,
            current_playback_position: 0.0,
            current_playback_rate: rate,
            is_not_played: false,
            is_end_of_sequence: false,
        }
    }
}

/// Input of `on_end_of_buffering`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndOfBufferingParams {
    /// Segment that finished buffering
    pub current_segment_id: SegmentId,
    /// Position where buffering stopped
    #[serde(default)]
    pub current_playback_position: f64,
    /// Signed playback rate
    #[serde(default = "default_rate")]
    pub current_playback_rate: f64,
}

/// Input of `on_error`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackErrorParams {
    /// Segment that failed
    pub current_segment_id: SegmentId,
    /// Position where playback failed
    #[serde(default)]
    pub current_playback_position: f64,
    /// Signed playback rate
    #[serde(default = "default_rate")]
    pub current_playback_rate: f64,
    /// Skip the played-entry notification
    #[serde(default)]
    pub is_not_played: bool,
    /// No further segment is wanted
    #[serde(default)]
    pub is_end_of_sequence: bool,
    /// Player-supplied description of the failure
    #[serde(default)]
    pub error_description: String,
}

impl PlaybackErrorParams {
    /// The same event seen as an end of media
    pub fn as_end_of_media(&self) -> EndOfMediaParams {
        EndOfMediaParams {
            current_segment_id: self.current_segment_id,
            current_playback_position: self.current_playback_position,
            current_playback_rate: self.current_playback_rate,
            is_not_played: self.is_not_played,
            is_end_of_sequence: self.is_end_of_sequence,
        }
    }
}

fn default_rate() -> f64 {
    1.0
}
