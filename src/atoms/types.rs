// ── CarePlus Atoms: Pure Data Types ────────────────────────────────────────
// All plain struct/enum definitions with no logic beyond small constructors
// and accessors. Atoms layer rule: no I/O, no side effects, no imports
// from engine/.

use serde::{Deserialize, Serialize};

use crate::atoms::constants::{
    ASSISTANT_REPLY_DELAY_MS, DOCTOR_DASHBOARD_PATH, HELPDESK_REPLY_DELAY_MS,
    PATIENT_DASHBOARD_PATH,
};

// ── Chat transcript ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        ChatMessage { sender: Sender::User, text: text.into() }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        ChatMessage { sender: Sender::Bot, text: text.into() }
    }
}

// ── Chat session phase ─────────────────────────────────────────────────────

/// Where a chat session currently is. `Listening` wins over `AwaitingReply`
/// while voice capture is running; the session returns to `Idle` only once
/// no bot reply is pending.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatPhase {
    Idle,
    #[serde(rename = "awaiting_reply")]
    AwaitingReply,
    Listening,
}

// ── Chat events ────────────────────────────────────────────────────────────
// Broadcast to subscribers so a front-end can mirror transcript and phase
// without polling.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ChatEvent {
    #[serde(rename = "message")]
    MessageAppended { session_id: String, message: ChatMessage },
    #[serde(rename = "phase")]
    PhaseChanged { session_id: String, phase: ChatPhase },
    #[serde(rename = "closed")]
    Closed { session_id: String },
}

// ── Chat configuration ─────────────────────────────────────────────────────

/// Which reply-resolution strategy a session runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReplyStrategy {
    /// Whole-input lookup against the assistant script.
    #[serde(rename = "exact")]
    ExactMatch,
    /// First-match substring rules, as used by the dashboard helpdesk.
    #[serde(rename = "keyword")]
    KeywordHeuristic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatConfig {
    /// Pause before the bot reply is appended, in milliseconds.
    pub reply_delay_ms: u64,
    /// Reply-resolution strategy for the session.
    pub strategy: ReplyStrategy,
}

impl Default for ChatConfig {
    /// Profile of the floating assistant widget.
    fn default() -> Self {
        ChatConfig {
            reply_delay_ms: ASSISTANT_REPLY_DELAY_MS,
            strategy: ReplyStrategy::ExactMatch,
        }
    }
}

impl ChatConfig {
    /// Profile of the dashboard helpdesk widget: keyword matching with a
    /// shorter reply delay.
    pub fn helpdesk() -> Self {
        ChatConfig {
            reply_delay_ms: HELPDESK_REPLY_DELAY_MS,
            strategy: ReplyStrategy::KeywordHeuristic,
        }
    }
}

// ── Registration ───────────────────────────────────────────────────────────

/// Account role selected on the registration page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
}

impl Role {
    /// Dashboard route the front-end is sent to after registration.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Patient => PATIENT_DASHBOARD_PATH,
            Role::Doctor => DOCTOR_DASHBOARD_PATH,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
        }
    }
}

/// Patient-tab form state, one field per input. Mutated per keystroke by
/// the embedding UI; only `validate()` decides whether it is submittable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PatientDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub gender: String,
    pub address: String,
    pub password: String,
    pub confirm_password: String,
}

/// Doctor-tab form state. The doctor tab collects contact and credential
/// fields; the patient demographics (birth date, gender, address) are not
/// part of this form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    pub specialty: String,
    pub experience: String,
    pub clinic: String,
    pub password: String,
    pub confirm_password: String,
}

/// A draft tagged with its role, as handed to `validate()` and the payload
/// builder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RegistrationDraft {
    Patient(PatientDraft),
    Doctor(DoctorDraft),
}

impl RegistrationDraft {
    pub fn role(&self) -> Role {
        match self {
            RegistrationDraft::Patient(_) => Role::Patient,
            RegistrationDraft::Doctor(_) => Role::Doctor,
        }
    }
}

/// The payload sent to the external register call. Field names follow the
/// auth service's JSON contract; the password confirmation never leaves the
/// draft, and blank optional fields are omitted entirely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic: Option<String>,
    pub password: String,
    pub role: Role,
}

/// What a call to `RegistrationFlow::submit()` ended in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// The account was created and the navigator was pointed at the role
    /// dashboard.
    Registered { destination: String },
    /// A validation rule failed or the register call declined. The message
    /// is what the form should display.
    Rejected { message: String },
    /// Another submission was already in flight; this one was ignored.
    InProgress,
}
