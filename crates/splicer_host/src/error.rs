// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host error types.

use splicer_playlist::SchedulerError;
use splicer_sequencer::SequencerError;

/// Failure of a single JSON command
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Command or params could not be decoded, or the result encoded
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// `func` names no known operation
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Scheduler rejected the request
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    /// Sequencer chain rejected the request
    #[error(transparent)]
    Sequencer(#[from] SequencerError),
}

impl DispatchError {
    /// Exception name reported to the caller
    pub fn exception_name(&self) -> &'static str {
        match self {
            Self::Scheduler(_) => "SchedulerError",
            Self::Sequencer(_) => "SequencerError",
            Self::Json(_) | Self::UnknownFunction(_) => "DispatchError",
        }
    }
}

/// Failure while building the initial session
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Config or schedule file unreadable
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schedule file contents rejected by the scheduler
    #[error("Schedule rejected: {0}")]
    Schedule(#[from] SchedulerError),
}
