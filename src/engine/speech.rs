// CarePlus Engine — Speech Capture Seam
// The voice button delegates to whatever recognition surface the host
// environment offers (a browser speech API, an OS dictation service, a test
// double). The engine never touches audio itself; it only starts and stops
// capture and reads the recognized text back. Environments without support
// say so up front, so the UI can disable the control instead of failing
// mid-capture.

use log::warn;

use crate::atoms::error::{EngineError, EngineResult};

/// Message surfaced when voice input is requested without a capable
/// recognition surface behind it.
pub const SPEECH_UNSUPPORTED_MESSAGE: &str = "Your browser does not support speech recognition.";

/// Options for one capture run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenOptions {
    /// Keep capturing across pauses until explicitly stopped, rather than
    /// ending after the first utterance.
    pub continuous: bool,
}

/// Environment-provided speech recognition capability.
///
/// The contract mirrors the recognition surface chat widgets are written
/// against: explicit start/stop, a readable capture buffer that survives
/// `stop`, and an up-front support flag. Implementations are expected to
/// append recognized text to the buffer while capture runs.
pub trait SpeechCapture: Send + Sync {
    /// Whether this environment can capture speech at all.
    fn is_supported(&self) -> bool;

    /// Begin capturing into a fresh or existing buffer.
    fn start(&self, options: ListenOptions) -> EngineResult<()>;

    /// Stop capturing. The buffer keeps its contents until `reset`.
    fn stop(&self) -> EngineResult<()>;

    /// Snapshot of the text recognized so far.
    fn transcript(&self) -> String;

    /// Clear the capture buffer.
    fn reset(&self);

    /// Whether capture is currently running.
    fn is_listening(&self) -> bool;
}

/// The capability reported by environments with no recognition surface.
/// `start` fails with [`SPEECH_UNSUPPORTED_MESSAGE`]; everything else is
/// inert. This is the default capture a session is built with.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl SpeechCapture for Unsupported {
    fn is_supported(&self) -> bool {
        false
    }

    fn start(&self, _options: ListenOptions) -> EngineResult<()> {
        warn!("[speech] Capture requested but no recognition surface is available");
        Err(EngineError::Speech(SPEECH_UNSUPPORTED_MESSAGE.to_string()))
    }

    fn stop(&self) -> EngineResult<()> {
        Ok(())
    }

    fn transcript(&self) -> String {
        String::new()
    }

    fn reset(&self) {}

    fn is_listening(&self) -> bool {
        false
    }
}
