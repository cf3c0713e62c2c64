// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sequencer plugin chain.
//!
//! Each link receives a [`Next`] handle for the remainder of the chain and
//! decides whether to forward, to rewrite the request or result, or to
//! answer on its own. The [`DefaultSequencer`] terminates every chain.

use crate::default_sequencer::DefaultSequencer;
use crate::error::Result;
use crate::params::{
    EndOfBufferingParams, EndOfMediaParams, LinearPosition, ManifestToLinearParams,
    ManifestToSeekbarParams, PlaybackErrorParams, SeekFromLinearParams, SeekFromSeekbarParams,
    SeekbarTime,
};
use crate::segment::{PlaybackSegment, PlaybackSegmentRegistry};
use splicer_playlist::PlaylistAccess;

/// State every chain operation may read or update
#[derive(Debug)]
pub struct SequencerContext<'a> {
    /// Read access to the playlist plus the played-entry notification
    pub playlist: PlaylistAccess<'a>,
    /// Live playback segments
    pub segments: &'a mut PlaybackSegmentRegistry,
}

/// One link of the sequencer chain.
///
/// Every operation forwards to `next` unless overridden.
pub trait SequencerPlugin {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Map a manifest position to seekbar space
    fn manifest_to_seekbar_time(
        &mut self,
        next: Next<'_>,
        ctx: &mut SequencerContext<'_>,
        params: &ManifestToSeekbarParams,
    ) -> Result<SeekbarTime> {
        next.manifest_to_seekbar_time(ctx, params)
    }

    /// Map a manifest position to the linear timeline
    fn manifest_to_linear_time(
        &mut self,
        next: Next<'_>,
        ctx: &mut SequencerContext<'_>,
        params: &ManifestToLinearParams,
    ) -> Result<LinearPosition> {
        next.manifest_to_linear_time(ctx, params)
    }

    /// Seek to a linear position
    fn seek_from_linear_position(
        &mut self,
        next: Next<'_>,
        ctx: &mut SequencerContext<'_>,
        params: &SeekFromLinearParams,
    ) -> Result<PlaybackSegment> {
        next.seek_from_linear_position(ctx, params)
    }

    /// Seek to a seekbar position
    fn seek_from_seekbar_position(
        &mut self,
        next: Next<'_>,
        ctx: &mut SequencerContext<'_>,
        params: &SeekFromSeekbarParams,
    ) -> Result<PlaybackSegment> {
        next.seek_from_seekbar_position(ctx, params)
    }

    /// The current segment finished rendering
    fn on_end_of_media(
        &mut self,
        next: Next<'_>,
        ctx: &mut SequencerContext<'_>,
        params: &EndOfMediaParams,
    ) -> Result<Option<PlaybackSegment>> {
        next.on_end_of_media(ctx, params)
    }

    /// The current segment finished buffering
    fn on_end_of_buffering(
        &mut self,
        next: Next<'_>,
        ctx: &mut SequencerContext<'_>,
        params: &EndOfBufferingParams,
    ) -> Result<Option<PlaybackSegment>> {
        next.on_end_of_buffering(ctx, params)
    }

    /// The current segment failed to play
    fn on_error(
        &mut self,
        next: Next<'_>,
        ctx: &mut SequencerContext<'_>,
        params: &PlaybackErrorParams,
    ) -> Result<Option<PlaybackSegment>> {
        next.on_error(ctx, params)
    }

    /// Diagnostic hook
    fn test_probe(
        &mut self,
        next: Next<'_>,
        ctx: &mut SequencerContext<'_>,
        params: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        next.test_probe(ctx, params)
    }
}

/// The remainder of the chain after the current link
pub struct Next<'a> {
    rest: &'a mut [Box<dyn SequencerPlugin>],
    last: &'a mut DefaultSequencer,
}

impl Next<'_> {
    /// Forward `manifest_to_seekbar_time`
    pub fn manifest_to_seekbar_time(
        self,
        ctx: &mut SequencerContext<'_>,
        params: &ManifestToSeekbarParams,
    ) -> Result<SeekbarTime> {
        match self.rest.split_first_mut() {
            Some((link, rest)) => {
                link.manifest_to_seekbar_time(Next { rest, last: self.last }, ctx, params)
            }
            None => self.last.manifest_to_seekbar_time(ctx, params),
        }
    }

    /// Forward `manifest_to_linear_time`
    pub fn manifest_to_linear_time(
        self,
        ctx: &mut SequencerContext<'_>,
        params: &ManifestToLinearParams,
    ) -> Result<LinearPosition> {
        match self.rest.split_first_mut() {
            Some((link, rest)) => {
                link.manifest_to_linear_time(Next { rest, last: self.last }, ctx, params)
            }
            None => self.last.manifest_to_linear_time(ctx, params),
        }
    }

    /// Forward `seek_from_linear_position`
    pub fn seek_from_linear_position(
        self,
        ctx: &mut SequencerContext<'_>,
        params: &SeekFromLinearParams,
    ) -> Result<PlaybackSegment> {
        match self.rest.split_first_mut() {
            Some((link, rest)) => {
                link.seek_from_linear_position(Next { rest, last: self.last }, ctx, params)
            }
            None => self.last.seek_from_linear_position(ctx, params),
        }
    }

    /// Forward `seek_from_seekbar_position`
    pub fn seek_from_seekbar_position(
        self,
        ctx: &mut SequencerContext<'_>,
        params: &SeekFromSeekbarParams,
    ) -> Result<PlaybackSegment> {
        match self.rest.split_first_mut() {
            Some((link, rest)) => {
                link.seek_from_seekbar_position(Next { rest, last: self.last }, ctx, params)
            }
            None => self.last.seek_from_seekbar_position(ctx, params),
        }
    }

    /// Forward `on_end_of_media`
    pub fn on_end_of_media(
        self,
        ctx: &mut SequencerContext<'_>,
        params: &EndOfMediaParams,
    ) -> Result<Option<PlaybackSegment>> {
        match self.rest.split_first_mut() {
            Some((link, rest)) => link.on_end_of_media(Next { rest, last: self.last }, ctx, params),
            None => self.last.on_end_of_media(ctx, params),
        }
    }

    /// Forward `on_end_of_buffering`
    pub fn on_end_of_buffering(
        self,
        ctx: &mut SequencerContext<'_>,
        params: &EndOfBufferingParams,
    ) -> Result<Option<PlaybackSegment>> {
        match self.rest.split_first_mut() {
            Some((link, rest)) => {
                link.on_end_of_buffering(Next { rest, last: self.last }, ctx, params)
            }
            None => self.last.on_end_of_buffering(ctx, params),
        }
    }

    /// Forward `on_error`
    pub fn on_error(
        self,
        ctx: &mut SequencerContext<'_>,
        params: &PlaybackErrorParams,
    ) -> Result<Option<PlaybackSegment>> {
        match self.rest.split_first_mut() {
            Some((link, rest)) => link.on_error(Next { rest, last: self.last }, ctx, params),
            None => self.last.on_error(ctx, params),
        }
    }

    /// Forward `test_probe`
    pub fn test_probe(
        self,
        ctx: &mut SequencerContext<'_>,
        params: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        match self.rest.split_first_mut() {
            Some((link, rest)) => link.test_probe(Next { rest, last: self.last }, ctx, params),
            None => self.last.test_probe(ctx, params),
        }
    }
}

/// Ordered plugin links ending in the [`DefaultSequencer`]
#[derive(Default)]
pub struct SequencerPluginChain {
    /// Most recently installed first
    links: Vec<Box<dyn SequencerPlugin>>,
    default: DefaultSequencer,
}

impl SequencerPluginChain {
    /// Chain consisting of the default sequencer only
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a plugin as the new first link
    pub fn install(&mut self, plugin: impl SequencerPlugin + 'static) {
        tracing::info!(plugin = plugin.name(), "installed sequencer plugin");
        self.links.insert(0, Box::new(plugin));
    }

    /// Handle on the whole chain, starting at the first link
    pub fn first(&mut self) -> Next<'_> {
        Next {
            rest: &mut self.links,
            last: &mut self.default,
        }
    }

    /// Link names, first link first
    pub fn plugin_names(&self) -> Vec<&str> {
        self.links
            .iter()
            .map(|link| link.name())
            .chain(std::iter::once(self.default.name()))
            .collect()
    }
}

impl std::fmt::Debug for SequencerPluginChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequencerPluginChain")
            .field("links", &self.plugin_names())
            .finish()
    }
}
