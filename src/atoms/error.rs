// ── CarePlus Atoms: Error Types ────────────────────────────────────────────
// Single canonical error enum for the engine, built with `thiserror`.
//
// Design rules:
//   • Variants are coarse-grained by domain (Validation, Auth, Speech…).
//   • The `#[from]` attribute wires std/external error conversions automatically.
//   • `EngineError` → `String` conversion is provided via `Display` so that
//     UI-facing boundaries (`Result<T, String>`) can call `.map_err(|e|
//     e.to_string())` without boilerplate.
//   • No variant carries secret material (passwords) in its message.

use thiserror::Error;

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EngineError {
    /// A registration draft failed a validation rule. The payload is the
    /// user-visible message of the first rule that failed.
    #[error("{0}")]
    Validation(String),

    /// Authentication / authorization failure (the external register call).
    #[error("Auth error: {0}")]
    Auth(String),

    /// Speech capture is unavailable or failed to start/stop.
    #[error("Speech error: {0}")]
    Speech(String),

    /// A chat session operation was rejected (e.g. the session is closed).
    #[error("Session error: {0}")]
    Session(String),

    /// Engine configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization / deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Catch-all for errors that do not yet have a dedicated variant.
    /// Prefer adding a specific variant over using this in new code.
    #[error("{0}")]
    Other(String),
}

// ── Convenience constructors ───────────────────────────────────────────────

impl EngineError {
    /// Create a validation error carrying a user-visible message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a session error with a short reason.
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session(message.into())
    }
}

// ── Migration bridge: String → EngineError ─────────────────────────────────
// Allows `?` on functions still returning `Result<T, String>` inside functions
// that return `EngineResult<T>`.

impl From<String> for EngineError {
    fn from(s: String) -> Self {
        EngineError::Other(s)
    }
}

impl From<&str> for EngineError {
    fn from(s: &str) -> Self {
        EngineError::Other(s.to_string())
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

/// All engine operations should return this type.
/// At UI boundaries, convert with `.map_err(|e| e.to_string())`.
pub type EngineResult<T> = Result<T, EngineError>;

// ── Conversion: EngineError → String ──────────────────────────────────────
// Lets UI boundary functions call `.map_err(EngineError::into)` directly.

impl From<EngineError> for String {
    fn from(e: EngineError) -> Self {
        e.to_string()
    }
}
