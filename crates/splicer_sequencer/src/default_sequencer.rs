// SPDX-License-Identifier: MIT OR Apache-2.0
//! Terminal link of every sequencer chain.

use crate::error::{Result, SequencerError};
use crate::params::{
    EndOfBufferingParams, EndOfMediaParams, LinearPosition, ManifestToLinearParams,
    ManifestToSeekbarParams, PlaybackErrorParams, SeekFromLinearParams, SeekFromSeekbarParams,
    SeekbarTime,
};
use crate::plugin::SequencerContext;
use crate::segment::{PlaybackSegment, SegmentId};
use splicer_playlist::{PlaylistEntry, UNBOUNDED_RENDERING_TIME};

/// Name reported by the default sequencer
pub const DEFAULT_SEQUENCER_NAME: &str = "default sequencer";

/// How a segment stopped
#[derive(Debug, Clone, Copy)]
struct EndEvent {
    segment: SegmentId,
    rate: f64,
    is_not_played: bool,
    is_end_of_sequence: bool,
    is_end_of_media: bool,
}

/// Sequencer without plugins: walks the playlist in rate direction and maps
/// positions between manifest, seekbar and linear time.
#[derive(Debug, Default)]
pub struct DefaultSequencer;

impl DefaultSequencer {
    /// Diagnostic name
    pub fn name(&self) -> &str {
        DEFAULT_SEQUENCER_NAME
    }

    /// Map a manifest position to seekbar space.
    ///
    /// Advertisements get their own seekbar clamped to the clip and report
    /// their playback policy. Content maps onto the whole linear timeline;
    /// if the content entry was split or welded since the segment was
    /// created, the segment is re-pointed at the piece of the same content
    /// now covering the position, or flagged as out of range when that
    /// position belongs to other content.
    pub fn manifest_to_seekbar_time(
        &mut self,
        ctx: &mut SequencerContext<'_>,
        params: &ManifestToSeekbarParams,
    ) -> Result<SeekbarTime> {
        let segment = ctx.segments.get(params.current_segment_id)?;
        let clip = segment.clip().clone();
        let is_changed = segment.is_clip_changed(ctx.playlist.playlist());

        let position = params.current_playback_position;
        let bounded = clip.max_rendering_time != UNBOUNDED_RENDERING_TIME;
        let mut seekbar = position - clip.min_rendering_time;
        let max_seekbar;
        let mut playback_policy = None;
        let mut playback_range_exceeded = false;
        let mut reresolved = false;

        if clip.is_advertisement {
            seekbar = seekbar.max(0.0);
            // an unbounded clip's seekbar grows with the position
            max_seekbar = if bounded { clip.rendering_duration() } else { seekbar };
            seekbar = seekbar.min(max_seekbar);
            playback_policy = Some(clip.playback_policy);
        } else {
            max_seekbar = ctx.playlist.linear_duration();
            seekbar += clip.linear_start_time;

            if is_changed {
                let current = ctx.playlist.entry_at_time(seekbar).cloned().ok_or(
                    SequencerError::WeldedEntryNotFound {
                        operation: "manifestToSeekbarTime",
                        time: seekbar,
                    },
                )?;
                reresolved = true;
                if current.shares_lineage(&clip) {
                    tracing::debug!(from = %clip.id(), to = %current.id(), "segment clip re-resolved");
                    ctx.segments.get_mut(params.current_segment_id)?.set_clip(current);
                } else {
                    playback_range_exceeded = true;
                }
            }
        }

        if !reresolved {
            let rewinding = params.playback_rate < 0.0;
            if (rewinding && position < clip.min_rendering_time)
                || (!rewinding && bounded && clip.max_rendering_time < position)
            {
                playback_range_exceeded = true;
            }
        }

        Ok(SeekbarTime {
            current_seekbar_position: seekbar,
            min_seekbar_position: 0.0,
            max_seekbar_position: max_seekbar,
            playback_policy,
            playback_range_exceeded,
        })
    }

    /// Map a manifest position to the linear timeline
    pub fn manifest_to_linear_time(
        &mut self,
        ctx: &mut SequencerContext<'_>,
        params: &ManifestToLinearParams,
    ) -> Result<LinearPosition> {
        let clip = ctx.segments.get(params.current_segment_id)?.clip();
        let offset = params.current_playback_position - clip.min_rendering_time;
        let is_on_linear_timeline = clip.linear_duration > 0.0;

        let mut linear_position = clip.linear_start_time;
        if is_on_linear_timeline && offset > 0.0 {
            linear_position += offset;
        }
        Ok(LinearPosition {
            linear_position,
            is_on_linear_timeline,
        })
    }

    /// Start a segment at a linear position, replacing the current one
    pub fn seek_from_linear_position(
        &mut self,
        ctx: &mut SequencerContext<'_>,
        params: &SeekFromLinearParams,
    ) -> Result<PlaybackSegment> {
        let rate = match params.current_segment_id {
            Some(id) => ctx.segments.get(id)?.initial_playback_rate(),
            None => 1.0,
        };
        let position = params.linear_seek_position;
        let entry = ctx.playlist.entry_at_time(position).cloned().ok_or(
            SequencerError::OutsidePlaylistRange {
                operation: "seekFromLinearPosition",
                position,
            },
        )?;

        let start = entry.min_rendering_time + (position - entry.linear_start_time);
        let created = ctx.segments.create(&entry, start, rate);
        if let Some(old) = params.current_segment_id {
            ctx.segments.release(old)?;
        }
        Ok(ctx.segments.get(created)?.clone())
    }

    /// Start a segment at a seekbar position, replacing the current one.
    ///
    /// While content is playing the seekbar spans the linear timeline; inside
    /// a zero-duration clip it spans only that clip.
    pub fn seek_from_seekbar_position(
        &mut self,
        ctx: &mut SequencerContext<'_>,
        params: &SeekFromSeekbarParams,
    ) -> Result<PlaybackSegment> {
        let current = ctx.segments.get(params.current_segment_id)?;
        let rate = current.initial_playback_rate();
        let clip = current.clip().clone();
        let position = params.seekbar_seek_position.max(0.0);

        let (entry, start) = if clip.linear_duration > 0.0 {
            let entry = ctx.playlist.entry_at_time(position).cloned().ok_or(
                SequencerError::OutsidePlaylistRange {
                    operation: "seekFromSeekbarPosition",
                    position,
                },
            )?;
            let mut start = entry.min_rendering_time;
            if entry.linear_duration > 0.0 {
                start += position - entry.linear_start_time;
            }
            (entry, start)
        } else {
            let bounded = clip.max_rendering_time != UNBOUNDED_RENDERING_TIME;
            if bounded && clip.rendering_duration() < position {
                return Err(SequencerError::OutsideSegmentRange(position));
            }
            let start = clip.min_rendering_time + position;
            (clip, start)
        };

        let created = ctx.segments.create(&entry, start, rate);
        ctx.segments.release(params.current_segment_id)?;
        Ok(ctx.segments.get(created)?.clone())
    }

    /// Advance past a segment that finished rendering
    pub fn on_end_of_media(
        &mut self,
        ctx: &mut SequencerContext<'_>,
        params: &EndOfMediaParams,
    ) -> Result<Option<PlaybackSegment>> {
        self.on_end(
            ctx,
            EndEvent {
                segment: params.current_segment_id,
                rate: params.current_playback_rate,
                is_not_played: params.is_not_played,
                is_end_of_sequence: params.is_end_of_sequence,
                is_end_of_media: true,
            },
        )
    }

    /// Hand out the next segment to buffer; the current one stays live
    pub fn on_end_of_buffering(
        &mut self,
        ctx: &mut SequencerContext<'_>,
        params: &EndOfBufferingParams,
    ) -> Result<Option<PlaybackSegment>> {
        self.on_end(
            ctx,
            EndEvent {
                segment: params.current_segment_id,
                rate: params.current_playback_rate,
                is_not_played: true,
                is_end_of_sequence: false,
                is_end_of_media: false,
            },
        )
    }

    /// Treat a playback failure as the end of the media
    pub fn on_error(
        &mut self,
        ctx: &mut SequencerContext<'_>,
        params: &PlaybackErrorParams,
    ) -> Result<Option<PlaybackSegment>> {
        tracing::warn!(
            segment = %params.current_segment_id,
            error = %params.error_description,
            "playback error, skipping to next entry"
        );
        self.on_end_of_media(ctx, &params.as_end_of_media())
    }

    /// Diagnostic hook
    pub fn test_probe(
        &mut self,
        ctx: &mut SequencerContext<'_>,
        params: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let probe = params.get("probe").and_then(serde_json::Value::as_str);
        Ok(match probe {
            Some("playlist") => ctx.playlist.playlist().to_json()?,
            Some("segments") => ctx.segments.to_json()?,
            _ => serde_json::Value::from(self.name()),
        })
    }

    fn on_end(&mut self, ctx: &mut SequencerContext<'_>, event: EndEvent) -> Result<Option<PlaybackSegment>> {
        let entry = ctx.segments.get(event.segment)?.clip().clone();
        let forward = event.rate >= 0.0;

        let next_entry = if event.is_end_of_media && event.is_end_of_sequence {
            None
        } else if forward {
            ctx.playlist.entry_after_id(entry.id())?.cloned()
        } else {
            ctx.playlist.entry_before_id(entry.id())?.cloned()
        };
        let created = next_entry.as_ref().map(|next| {
            let start = if forward {
                next.min_rendering_time
            } else {
                next.max_rendering_time
            };
            ctx.segments.create(next, start, event.rate)
        });

        if event.is_end_of_media {
            if !event.is_not_played {
                ctx.playlist.on_played_entry(entry.id())?;
            }
            ctx.segments.release(event.segment)?;

            if let (Some(created), Some(next)) = (created, &next_entry) {
                self.refresh_after_weld(ctx, created, next)?;
            }
        }

        match created {
            Some(id) => Ok(Some(ctx.segments.get(id)?.clone())),
            None => Ok(None),
        }
    }

    /// The played notification may have welded the next entry into its
    /// neighbour; point the new segment at whatever now holds its content.
    fn refresh_after_weld(
        &mut self,
        ctx: &mut SequencerContext<'_>,
        segment: SegmentId,
        next: &PlaylistEntry,
    ) -> Result<()> {
        if !ctx.segments.is_clip_changed(segment, ctx.playlist.playlist())? {
            return Ok(());
        }
        let time = next.linear_start_time;
        let Some(welded) = ctx.playlist.entry_in_lineage_at(next.id_split_from(), time).cloned() else {
            tracing::error!(segment = %segment, lineage = %next.id_split_from(), time, "welded entry missing");
            return Err(SequencerError::WeldedEntryNotFound {
                operation: "onEndOfMedia",
                time,
            });
        };
        tracing::debug!(segment = %segment, from = %next.id(), to = %welded.id(), "segment clip re-resolved after weld");
        ctx.segments.get_mut(segment)?.set_clip(welded);
        Ok(())
    }
}
