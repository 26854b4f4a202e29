//! Outbound collaborators: telemetry and audio.
//!
//! Both are fire-and-forget. A failing sink is logged and otherwise ignored;
//! the simulation never waits on or reacts to its collaborators.

use std::io::Write;

use serde_json::{Map, Value};
use thiserror::Error;

use glitchrun_core::enums::{AudioProfile, TelemetryKind};

/// Loosely-typed telemetry payload.
pub type TelemetryPayload = Map<String, Value>;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("telemetry write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("telemetry encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait TelemetrySink {
    fn emit(&mut self, kind: TelemetryKind, payload: &TelemetryPayload) -> Result<(), TelemetryError>;
}

pub trait AudioSink {
    fn set_profile(&mut self, profile: AudioProfile);
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullTelemetry;

impl TelemetrySink for NullTelemetry {
    fn emit(&mut self, _kind: TelemetryKind, _payload: &TelemetryPayload) -> Result<(), TelemetryError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn set_profile(&mut self, _profile: AudioProfile) {}
}

/// Writes one JSON object per event, one event per line.
#[derive(Debug)]
pub struct JsonLinesTelemetry<W> {
    out: W,
}

impl<W: Write> JsonLinesTelemetry<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TelemetrySink for JsonLinesTelemetry<W> {
    fn emit(&mut self, kind: TelemetryKind, payload: &TelemetryPayload) -> Result<(), TelemetryError> {
        let line = serde_json::json!({ "kind": kind, "payload": payload });
        serde_json::to_writer(&mut self.out, &line)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

/// The engine's handle on its collaborators.
pub struct Collaborators {
    telemetry: Box<dyn TelemetrySink>,
    audio: Box<dyn AudioSink>,
    profile: Option<AudioProfile>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::new(Box::new(NullTelemetry), Box::new(NullAudio))
    }
}

impl Collaborators {
    pub fn new(telemetry: Box<dyn TelemetrySink>, audio: Box<dyn AudioSink>) -> Self {
        Self {
            telemetry,
            audio,
            profile: None,
        }
    }

    pub fn emit(&mut self, kind: TelemetryKind, payload: TelemetryPayload) {
        if let Err(e) = self.telemetry.emit(kind, &payload) {
            tracing::warn!(?kind, error = %e, "dropping telemetry event");
        }
    }

    /// Forward an audio profile, skipping repeats of the current one.
    pub fn notify_audio(&mut self, profile: AudioProfile) {
        if self.profile != Some(profile) {
            self.profile = Some(profile);
            self.audio.set_profile(profile);
        }
    }
}

/// Build a payload from key/value pairs.
pub fn payload<const N: usize>(fields: [(&str, Value); N]) -> TelemetryPayload {
    fields
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FailingTelemetry;

    impl TelemetrySink for FailingTelemetry {
        fn emit(&mut self, _kind: TelemetryKind, _payload: &TelemetryPayload) -> Result<(), TelemetryError> {
            Err(TelemetryError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "offline",
            )))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingAudio(Rc<RefCell<Vec<AudioProfile>>>);

    impl AudioSink for RecordingAudio {
        fn set_profile(&mut self, profile: AudioProfile) {
            self.0.borrow_mut().push(profile);
        }
    }

    #[test]
    fn telemetry_failures_are_swallowed() {
        let mut collab = Collaborators::new(Box::new(FailingTelemetry), Box::new(NullAudio));
        collab.emit(TelemetryKind::Death, payload([("wave", Value::from(3))]));
    }

    #[test]
    fn audio_profile_sent_only_on_change() {
        let audio = RecordingAudio::default();
        let mut collab = Collaborators::new(Box::new(NullTelemetry), Box::new(audio.clone()));
        collab.notify_audio(AudioProfile::Playing);
        collab.notify_audio(AudioProfile::Playing);
        collab.notify_audio(AudioProfile::Paused);
        assert_eq!(
            *audio.0.borrow(),
            vec![AudioProfile::Playing, AudioProfile::Paused]
        );
    }

    #[test]
    fn json_lines_writes_one_object_per_event() {
        let mut sink = JsonLinesTelemetry::new(Vec::new());
        sink.emit(TelemetryKind::RunStart, &payload([("seed", Value::from(7))]))
            .unwrap();
        sink.emit(TelemetryKind::WaveComplete, &payload([("wave", Value::from(1))]))
            .unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["kind"], "RunStart");
        assert_eq!(first["payload"]["seed"], 7);
    }
}
