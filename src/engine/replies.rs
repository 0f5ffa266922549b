// ── Reply Resolver: Canned Bot Responses ─────────────────────────────────────
//
// The "bot" behind every chat widget is a static mapping from normalized
// user input to a fixed response. No ML model required, fast & deterministic.
// Two strategies share the one resolver:
//   "hello"                → ExactMatch       → greeting from the script
//   "Book an appointment"  → KeywordHeuristic → first substring rule that hits
//
// This module:
//   - Holds the assistant script (whole-input lookup table)
//   - Holds the helpdesk keyword rules (ordered substring checks)
//   - Exposes `ReplyResolver` so sessions pick a strategy via `ChatConfig`
//     instead of hard-coding one matcher per widget

use crate::atoms::types::ReplyStrategy;

// ═══════════════════════════════════════════════════════════════════════════
// Assistant script (exact match)
// ═══════════════════════════════════════════════════════════════════════════

/// Whole-input lookup table for the floating assistant widget. Keys are
/// stored pre-normalized: lowercase, no surrounding whitespace.
const ASSISTANT_SCRIPT: &[(&str, &str)] = &[
    ("hello", "Hi there! How can I assist you today?"),
    (
        "book appointment",
        "Sure, please provide the doctor's name and your preferred time.",
    ),
    (
        "give me his appointment details",
        "Dr. Priya Narayan\nSpecialty: Orthopedic & Trauma Specialist\nExperience: 8 years\nClinic: HealthPlus Ortho Center, Bangalore\nExpertise: Musculoskeletal Pain, Bone Fracture, Posture Therapy\nAvailable: Mon–Fri, 11 AM–6 PM",
    ),
    ("confirm booking", "Your booking has been confirmed. Thank you!"),
];

const ASSISTANT_FALLBACK: &str = "I'm sorry, I didn't understand that. Can you rephrase?";

// ═══════════════════════════════════════════════════════════════════════════
// Helpdesk rules (keyword heuristic)
// ═══════════════════════════════════════════════════════════════════════════

const APPOINTMENT_REPLY: &str = "You can book appointments from the Appointments section.";
const PRESCRIPTION_REPLY: &str = "Your prescriptions are available in the Prescriptions tab.";
const SPECIALIST_REPLY: &str = "Please consult with a specialist. Would you like help booking?";
const HELPDESK_FALLBACK: &str =
    "I'm here to assist with medical queries, appointments, and records.";

// ═══════════════════════════════════════════════════════════════════════════
// Resolver
// ═══════════════════════════════════════════════════════════════════════════

/// Maps one user message to its canned reply under a configured strategy.
///
/// Both strategies are total: unknown input lands on the strategy's
/// fallback line, so the result is never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyResolver {
    strategy: ReplyStrategy,
}

impl ReplyResolver {
    pub fn new(strategy: ReplyStrategy) -> Self {
        ReplyResolver { strategy }
    }

    pub fn strategy(&self) -> ReplyStrategy {
        self.strategy
    }

    /// Resolve one user message. Input is trimmed and lower-cased first so
    /// "  HELLO " and "hello" land on the same reply.
    pub fn resolve(&self, input: &str) -> &'static str {
        let normalized = input.trim().to_lowercase();
        match self.strategy {
            ReplyStrategy::ExactMatch => resolve_exact(&normalized),
            ReplyStrategy::KeywordHeuristic => resolve_keywords(&normalized),
        }
    }
}

fn resolve_exact(input: &str) -> &'static str {
    ASSISTANT_SCRIPT
        .iter()
        .find(|(key, _)| *key == input)
        .map(|(_, reply)| *reply)
        .unwrap_or(ASSISTANT_FALLBACK)
}

/// Rules are checked in order and the first hit wins, so input mentioning
/// both an appointment and a prescription gets the appointment line.
fn resolve_keywords(input: &str) -> &'static str {
    if input.contains("appointment") {
        APPOINTMENT_REPLY
    } else if input.contains("prescription") {
        PRESCRIPTION_REPLY
    } else if contains_any(input, &["pain", "doctor"]) {
        SPECIALIST_REPLY
    } else {
        HELPDESK_FALLBACK
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════

fn contains_any(s: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| s.contains(t))
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
