// ── CarePlus Atoms: Constants ──────────────────────────────────────────────
// All named constants for the crate live here.
// Rationale: collecting constants in one place eliminates magic strings,
// makes auditing easier, and keeps every layer's code self-documenting.

// ── Registration rules ─────────────────────────────────────────────────────
// Used by `validate()` in engine/registration.rs. Counted in characters,
// not bytes, so multi-byte input is not over-counted.
pub const PASSWORD_MIN_CHARS: usize = 6;

// ── Post-registration destinations ─────────────────────────────────────────
// Route paths the embedding front-end is asked to navigate to after a
// successful registration. Keyed by role; see `Role::dashboard_path()`.
pub(crate) const PATIENT_DASHBOARD_PATH: &str = "/dashboard/patient";
pub(crate) const DOCTOR_DASHBOARD_PATH: &str = "/dashboard/doctor";

// ── Bot reply pacing ───────────────────────────────────────────────────────
// Artificial delay between a user message landing in the transcript and the
// bot reply being appended. The pause is cosmetic; replies are resolved
// instantly. Two profiles exist: the floating assistant widget and the
// shorter-fuse dashboard helpdesk.
pub const ASSISTANT_REPLY_DELAY_MS: u64 = 800;
pub const HELPDESK_REPLY_DELAY_MS: u64 = 500;

// ── Doctor specialty catalog ───────────────────────────────────────────
// The fixed set of specialties the registration form offers. Front-ends
// render these as-is; `validate()` does not restrict input to the catalog.
pub const SPECIALTIES: &[&str] = &[
    "cardiology",
    "dermatology",
    "endocrinology",
    "family-medicine",
    "neurology",
    "orthopedics",
    "pediatrics",
    "psychiatry",
    "ayurveda",
];
