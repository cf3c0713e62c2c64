// SPDX-License-Identifier: MIT OR Apache-2.0
//! JSON command dispatch.
//!
//! Each command is an object naming a function and its parameters:
//!
//! ```json
//! {"func": "scheduler.appendContentClip", "params": {"minManifestPosition": 0, "maxManifestPosition": 60}}
//! ```
//!
//! Parameters may also sit next to `func`. A bare function name is looked up
//! on the scheduler first, then on the sequencer. `session.reset` clears the
//! playlist together with every live playback segment.

use crate::error::DispatchError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use splicer_playlist::RemoveClipParams;
use splicer_sequencer::SequencingSession;
use std::error::Error as _;

/// Result type for dispatch
pub type Result<T> = std::result::Result<T, DispatchError>;

#[derive(Debug, Deserialize)]
struct Command {
    func: String,
    #[serde(default)]
    params: Option<Value>,
    #[serde(flatten)]
    inline: Map<String, Value>,
}

/// Error record returned in place of a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exception {
    /// Error family
    pub name: String,
    /// Display form of the error
    pub message: String,
    /// Source chain, outermost first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stack: Vec<String>,
}

impl Exception {
    /// Build the record for a failed command
    pub fn from_error(err: &DispatchError) -> Self {
        let mut stack = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push(cause.to_string());
            source = cause.source();
        }
        Self {
            name: err.exception_name().to_string(),
            message: err.to_string(),
            stack,
        }
    }
}

#[derive(Debug, Serialize)]
struct ExceptionRecord<'a> {
    #[serde(rename = "EXCEPTION")]
    exception: &'a Exception,
}

/// Routes JSON commands to one session's scheduler and sequencer
#[derive(Debug, Default)]
pub struct Dispatcher {
    session: SequencingSession,
}

impl Dispatcher {
    /// Dispatch into `session`
    pub fn new(session: SequencingSession) -> Self {
        Self { session }
    }

    /// The session commands run against
    pub fn session(&self) -> &SequencingSession {
        &self.session
    }

    /// Mutable access, e.g. to install plugins
    pub fn session_mut(&mut self) -> &mut SequencingSession {
        &mut self.session
    }

    /// Run one command and encode its result or exception
    pub fn run_json(&mut self, command: &str) -> String {
        let encoded = self
            .dispatch(command)
            .and_then(|value| serde_json::to_string(&value).map_err(DispatchError::from));
        match encoded {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "command rejected");
                let exception = Exception::from_error(&err);
                serde_json::to_string(&ExceptionRecord {
                    exception: &exception,
                })
                .unwrap_or_else(|_| String::from(r#"{"EXCEPTION":{"name":"DispatchError","message":"unencodable error"}}"#))
            }
        }
    }

    /// Decode and run one command
    pub fn dispatch(&mut self, command: &str) -> Result<Value> {
        let command: Command = serde_json::from_str(command)?;
        let params = command.params.unwrap_or(Value::Object(command.inline));
        tracing::debug!(func = %command.func, "dispatching");
        self.call(&command.func, &params)
    }

    /// Run `func` with already decoded params
    pub fn call(&mut self, func: &str, params: &Value) -> Result<Value> {
        let found = match func.split_once('.') {
            Some(("scheduler", name)) => self.call_scheduler(name, params)?,
            Some(("sequencer", name)) => self.call_sequencer(name, params)?,
            Some(("session", name)) => self.call_session(name),
            Some(_) => None,
            None => match self.call_scheduler(func, params)? {
                Some(value) => Some(value),
                None => self.call_sequencer(func, params)?,
            },
        };
        found.ok_or_else(|| DispatchError::UnknownFunction(func.to_string()))
    }

    fn call_session(&mut self, name: &str) -> Option<Value> {
        match name {
            "reset" => {
                self.session.reset();
                Some(Value::Null)
            }
            _ => None,
        }
    }

    fn call_scheduler(&mut self, name: &str, params: &Value) -> Result<Option<Value>> {
        let mut scheduler = self.session.scheduler();
        let value = match name {
            "appendContentClip" => encode(scheduler.append_content_clip(&decode(params)?)?)?,
            "scheduleClip" => encode(scheduler.schedule_clip(&decode(params)?)?)?,
            "setSeekToStart" => encode(scheduler.set_seek_to_start(&decode(params)?)?)?,
            "removeClip" => {
                let params: RemoveClipParams = decode(params)?;
                encode(scheduler.remove_clip(params.playlist_entry_id)?)?
            }
            "reset" => {
                scheduler.reset();
                Value::Null
            }
            _ => return Ok(None),
        };
        Ok(Some(value))
    }

    fn call_sequencer(&mut self, name: &str, params: &Value) -> Result<Option<Value>> {
        let mut sequencer = self.session.sequencer();
        let value = match name {
            "manifestToSeekbarTime" => encode(sequencer.manifest_to_seekbar_time(&decode(params)?)?)?,
            "manifestToLinearTime" => encode(sequencer.manifest_to_linear_time(&decode(params)?)?)?,
            "seekFromLinearPosition" => encode(sequencer.seek_from_linear_position(&decode(params)?)?)?,
            "seekFromSeekbarPosition" => {
                encode(sequencer.seek_from_seekbar_position(&decode(params)?)?)?
            }
            "onEndOfMedia" => encode(sequencer.on_end_of_media(&decode(params)?)?)?,
            "onEndOfBuffering" => encode(sequencer.on_end_of_buffering(&decode(params)?)?)?,
            "onError" => encode(sequencer.on_error(&decode(params)?)?)?,
            "testProbe" => sequencer.test_probe(params)?,
            _ => return Ok(None),
        };
        Ok(Some(value))
    }
}

fn decode<T: DeserializeOwned>(params: &Value) -> Result<T> {
    Ok(T::deserialize(params)?)
}

fn encode<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
