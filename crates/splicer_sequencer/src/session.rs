// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sequencing session: one playlist, its segments and its sequencer chain.

use crate::error::Result;
use crate::params::{
    EndOfBufferingParams, EndOfMediaParams, LinearPosition, ManifestToLinearParams,
    ManifestToSeekbarParams, PlaybackErrorParams, SeekFromLinearParams, SeekFromSeekbarParams,
    SeekbarTime,
};
use crate::plugin::{SequencerContext, SequencerPlugin, SequencerPluginChain};
use crate::segment::{PlaybackSegment, PlaybackSegmentRegistry};
use splicer_playlist::{PlaylistAccess, PlaylistConfig, Scheduler, SequentialPlaylist};

/// Owns every piece of state a player session needs
#[derive(Debug, Default)]
pub struct SequencingSession {
    playlist: SequentialPlaylist,
    segments: PlaybackSegmentRegistry,
    chain: SequencerPluginChain,
}

impl SequencingSession {
    /// Empty session with default tolerances
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty session with the given playlist configuration
    pub fn with_config(config: PlaylistConfig) -> Self {
        Self {
            playlist: SequentialPlaylist::with_config(config),
            ..Self::default()
        }
    }

    /// Playlist configuration
    pub fn config(&self) -> &PlaylistConfig {
        self.playlist.config()
    }

    /// Scheduling interface over the playlist
    pub fn scheduler(&mut self) -> Scheduler<'_> {
        Scheduler::new(&mut self.playlist)
    }

    /// Sequencer chain bound to this session's state
    pub fn sequencer(&mut self) -> Sequencer<'_> {
        Sequencer {
            chain: &mut self.chain,
            ctx: SequencerContext {
                playlist: PlaylistAccess::new(&mut self.playlist),
                segments: &mut self.segments,
            },
        }
    }

    /// Install a plugin in front of the chain
    pub fn install_plugin(&mut self, plugin: impl SequencerPlugin + 'static) {
        self.chain.install(plugin);
    }

    /// Names of the chain links, first link first
    pub fn plugin_names(&self) -> Vec<&str> {
        self.chain.plugin_names()
    }

    /// The playlist
    pub fn playlist(&self) -> &SequentialPlaylist {
        &self.playlist
    }

    /// Live playback segments
    pub fn segments(&self) -> &PlaybackSegmentRegistry {
        &self.segments
    }

    /// Clear the playlist and every playback segment
    pub fn reset(&mut self) {
        self.scheduler().reset();
        self.segments.reset();
        tracing::info!("sequencing session reset");
    }
}

/// Chain operations against a borrowed session
#[derive(Debug)]
pub struct Sequencer<'a> {
    chain: &'a mut SequencerPluginChain,
    ctx: SequencerContext<'a>,
}

impl Sequencer<'_> {
    /// See [`SequencerPlugin::manifest_to_seekbar_time`]
    pub fn manifest_to_seekbar_time(&mut self, params: &ManifestToSeekbarParams) -> Result<SeekbarTime> {
        self.chain.first().manifest_to_seekbar_time(&mut self.ctx, params)
    }

    /// See [`SequencerPlugin::manifest_to_linear_time`]
    pub fn manifest_to_linear_time(&mut self, params: &ManifestToLinearParams) -> Result<LinearPosition> {
        self.chain.first().manifest_to_linear_time(&mut self.ctx, params)
    }

    /// See [`SequencerPlugin::seek_from_linear_position`]
    pub fn seek_from_linear_position(&mut self, params: &SeekFromLinearParams) -> Result<PlaybackSegment> {
        self.chain.first().seek_from_linear_position(&mut self.ctx, params)
    }

    /// See [`SequencerPlugin::seek_from_seekbar_position`]
    pub fn seek_from_seekbar_position(&mut self, params: &SeekFromSeekbarParams) -> Result<PlaybackSegment> {
        self.chain.first().seek_from_seekbar_position(&mut self.ctx, params)
    }

    /// See [`SequencerPlugin::on_end_of_media`]
    pub fn on_end_of_media(&mut self, params: &EndOfMediaParams) -> Result<Option<PlaybackSegment>> {
        self.chain.first().on_end_of_media(&mut self.ctx, params)
    }

    /// See [`SequencerPlugin::on_end_of_buffering`]
    pub fn on_end_of_buffering(&mut self, params: &EndOfBufferingParams) -> Result<Option<PlaybackSegment>> {
        self.chain.first().on_end_of_buffering(&mut self.ctx, params)
    }

    /// See [`SequencerPlugin::on_error`]
    pub fn on_error(&mut self, params: &PlaybackErrorParams) -> Result<Option<PlaybackSegment>> {
        self.chain.first().on_error(&mut self.ctx, params)
    }

    /// See [`SequencerPlugin::test_probe`]
    pub fn test_probe(&mut self, params: &serde_json::Value) -> Result<serde_json::Value> {
        self.chain.first().test_probe(&mut self.ctx, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::Next;
    use splicer_playlist::{ContentClipParams, RollType, ScheduleClipParams};

    /// Never reports the seekbar as exceeded
    struct Lenient;

    impl SequencerPlugin for Lenient {
        fn name(&self) -> &str {
            "lenient"
        }

        fn manifest_to_seekbar_time(
            &mut self,
            next: Next<'_>,
            ctx: &mut SequencerContext<'_>,
            params: &ManifestToSeekbarParams,
        ) -> Result<SeekbarTime> {
            let time = next.manifest_to_seekbar_time(ctx, params)?;
            Ok(SeekbarTime {
                playback_range_exceeded: false,
                ..time
            })
        }
    }

    fn session_with_pre_roll() -> SequencingSession {
        let mut session = SequencingSession::new();
        let mut scheduler = session.scheduler();
        scheduler
            .append_content_clip(&ContentClipParams {
                clip_uri: Some("movie.m3u8".to_string()),
                min_manifest_position: 0.0,
                max_manifest_position: 60.0,
            })
            .unwrap();
        let mut pre_roll = ScheduleClipParams::new(RollType::Pre, 0.0, 15.0);
        pre_roll.delete_after_play = true;
        scheduler.schedule_clip(&pre_roll).unwrap();
        session
    }

    #[test]
    fn test_session_plays_pre_roll_then_content() {
        let mut session = session_with_pre_roll();
        let mut sequencer = session.sequencer();
        let ad = sequencer
            .seek_from_linear_position(&SeekFromLinearParams {
                current_segment_id: None,
                linear_seek_position: 0.0,
            })
            .unwrap();
        assert!(ad.clip().is_advertisement);

        let content = sequencer
            .on_end_of_media(&EndOfMediaParams::new(ad.segment_id(), 1.0))
            .unwrap()
            .unwrap();
        assert!(!content.clip().is_advertisement);
        assert_eq!(content.clip().clip_uri.as_deref(), Some("movie.m3u8"));

        assert_eq!(session.playlist().len(), 1);
        assert_eq!(session.segments().live_count(), 1);
    }

    #[test]
    fn test_installed_plugin_applies_to_session() {
        let mut session = session_with_pre_roll();
        session.install_plugin(Lenient);
        assert_eq!(session.plugin_names(), vec!["lenient", "default sequencer"]);

        let mut sequencer = session.sequencer();
        let ad = sequencer
            .seek_from_linear_position(&SeekFromLinearParams {
                current_segment_id: None,
                linear_seek_position: 0.0,
            })
            .unwrap();
        let time = sequencer
            .manifest_to_seekbar_time(&ManifestToSeekbarParams {
                current_segment_id: ad.segment_id(),
                playback_rate: 1.0,
                current_playback_position: 20.0,
            })
            .unwrap();
        assert_eq!(time.current_seekbar_position, 15.0);
        assert!(!time.playback_range_exceeded);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut session = session_with_pre_roll();
        session
            .sequencer()
            .seek_from_linear_position(&SeekFromLinearParams {
                current_segment_id: None,
                linear_seek_position: 10.0,
            })
            .unwrap();
        session.reset();
        assert!(session.playlist().is_empty());
        assert_eq!(session.segments().live_count(), 0);
        assert_eq!(session.config().time_tolerance, splicer_playlist::config::DEFAULT_TIME_TOLERANCE);
    }
}
