// SPDX-License-Identifier: MIT OR Apache-2.0
//! Splicer host: runs a sequencing session behind a line-oriented JSON
//! command interface.
//!
//! The `splicer` binary loads a [`HostConfig`], replays its
//! [`ScheduleFile`] into a fresh session and then answers one command per
//! input line through a [`Dispatcher`].

pub mod config;
pub mod dispatch;
pub mod error;

pub use config::{HostConfig, ScheduleFile, DEFAULT_LOG_FILTER};
pub use dispatch::{Dispatcher, Exception};
pub use error::{DispatchError, StartupError};

use splicer_sequencer::SequencingSession;
use std::io::{BufRead, Write};
use std::path::Path;

/// Build a session from `config`, replaying its schedule if one is set.
///
/// A relative schedule path is resolved against `base_dir`.
pub fn start_session(config: &HostConfig, base_dir: &Path) -> Result<SequencingSession, StartupError> {
    let mut session = SequencingSession::with_config(config.playlist);
    if let Some(path) = config.schedule_path(base_dir) {
        tracing::info!(path = %path.display(), "loading schedule");
        let schedule = ScheduleFile::load(&path)?;
        schedule.apply(&mut session.scheduler())?;
    }
    Ok(session)
}

/// Answer every non-blank line of `input` with one line on `output`.
///
/// Returns the number of commands handled.
pub fn serve(dispatcher: &mut Dispatcher, input: impl BufRead, mut output: impl Write) -> std::io::Result<usize> {
    let mut handled = 0;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = dispatcher.run_json(&line);
        writeln!(output, "{reply}")?;
        output.flush()?;
        handled += 1;
    }
    tracing::debug!(handled, "input closed");
    Ok(handled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use splicer_playlist::{ContentClipParams, RollType, ScheduleClipParams};
    use std::path::PathBuf;

    #[test]
    fn test_start_session_replays_relative_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let schedule = ScheduleFile {
            content: vec![ContentClipParams {
                clip_uri: Some("movie.m3u8".to_string()),
                min_manifest_position: 0.0,
                max_manifest_position: 120.0,
            }],
            ads: vec![ScheduleClipParams::new(RollType::Post, 0.0, 30.0)],
            seek_to_start: None,
        };
        schedule.save(&dir.path().join("schedule.ron")).unwrap();

        let config = HostConfig {
            schedule: Some(PathBuf::from("schedule.ron")),
            ..HostConfig::default()
        };
        let session = start_session(&config, dir.path()).unwrap();
        assert_eq!(session.playlist().len(), 2);
        assert_eq!(session.playlist().linear_duration(), 120.0);
    }

    #[test]
    fn test_start_session_reports_missing_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let config = HostConfig {
            schedule: Some(PathBuf::from("absent.ron")),
            ..HostConfig::default()
        };
        let err = start_session(&config, dir.path()).unwrap_err();
        assert!(matches!(err, StartupError::Io(_)));
    }

    #[test]
    fn test_serve_answers_each_line() {
        let mut dispatcher = Dispatcher::default();
        let input = concat!(
            r#"{"func": "appendContentClip", "maxManifestPosition": 30}"#,
            "\n\n",
            r#"{"func": "sequencer.seekFromLinearPosition", "params": {"linearSeekPosition": 99}}"#,
            "\n",
        );
        let mut output = Vec::new();
        let handled = serve(&mut dispatcher, input.as_bytes(), &mut output).unwrap();
        assert_eq!(handled, 2);

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        let entry: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(entry["linearDuration"], 30.0);
        let failure: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(failure["EXCEPTION"]["name"], "SequencerError");
    }
}
