// CarePlus Core — headless engine for the CarePlus care portal.
//
// Two subsystems, both plain in-process state machines:
//   - engine/registration — the patient / doctor registration flow
//   - engine/chat + engine/replies — the canned-response chat widgets
//
// The crate renders nothing and talks to no network. Transport, routing,
// and speech recognition are supplied by the embedding front-end through
// the collaborator traits in engine/auth and engine/speech; everything the
// engine decides (validation messages, reply text, phase changes) is
// observable through return values and the session event stream.

pub mod atoms;
pub mod engine;

pub use atoms::constants::{PASSWORD_MIN_CHARS, SPECIALTIES};
pub use atoms::error::{EngineError, EngineResult};
pub use atoms::types::{
    ChatConfig, ChatEvent, ChatMessage, ChatPhase, DoctorDraft, PatientDraft, RegistrationDraft,
    ReplyStrategy, Role, Sender, SubmitOutcome, UserData,
};
pub use engine::auth::{Authenticator, Navigator};
pub use engine::chat::ChatSession;
pub use engine::registration::{
    build_user_data, validate, RegistrationFlow, REGISTRATION_FAILED_MESSAGE,
};
pub use engine::replies::ReplyResolver;
pub use engine::speech::{ListenOptions, SpeechCapture, SPEECH_UNSUPPORTED_MESSAGE};
