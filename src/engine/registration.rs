// CarePlus Engine — Registration Flow
// Form state for the two-tab (patient / doctor) registration page:
// per-keystroke draft mutation, short-circuit validation on submit, then
// delegation to the external Authenticator and role-based routing. The
// in-flight flag swallows duplicate submits so a double-click can never
// create two accounts.

use std::sync::Arc;

use log::{info, warn};
use parking_lot::Mutex;

use crate::atoms::constants::PASSWORD_MIN_CHARS;
use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::types::{
    DoctorDraft, PatientDraft, RegistrationDraft, Role, SubmitOutcome, UserData,
};
use crate::engine::auth::{Authenticator, Navigator};

/// Generic message shown when the register call declines or fails. Service
/// error detail never reaches the form.
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed. Please try again.";

// ── Validation ─────────────────────────────────────────────────────────────

/// Check a draft against the submission rules, in order, stopping at the
/// first failure:
///   1. first name, last name, email and password must be present
///   2. password and confirmation must match
///   3. password must be at least `PASSWORD_MIN_CHARS` characters
///   4. doctors must carry a license number and a specialty
///
/// `Ok(())` means the draft is submittable. Whitespace-only input counts
/// as missing.
pub fn validate(draft: &RegistrationDraft) -> EngineResult<()> {
    let (first, last, email, password, confirm) = match draft {
        RegistrationDraft::Patient(d) => {
            (&d.first_name, &d.last_name, &d.email, &d.password, &d.confirm_password)
        }
        RegistrationDraft::Doctor(d) => {
            (&d.first_name, &d.last_name, &d.email, &d.password, &d.confirm_password)
        }
    };

    if is_blank(first) || is_blank(last) || is_blank(email) || is_blank(password) {
        return Err(EngineError::validation("Please fill in all required fields"));
    }
    if password != confirm {
        return Err(EngineError::validation("Passwords do not match"));
    }
    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(EngineError::validation("Password must be at least 6 characters long"));
    }
    if let RegistrationDraft::Doctor(d) = draft {
        if is_blank(&d.license_number) || is_blank(&d.specialty) {
            return Err(EngineError::validation(
                "License number and specialty are required for doctors",
            ));
        }
    }
    Ok(())
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn optional(s: &str) -> Option<String> {
    if is_blank(s) {
        None
    } else {
        Some(s.to_string())
    }
}

/// Build the register payload from a validated draft: the confirmation
/// field is stripped, the role tag is attached, and blank optional fields
/// are omitted.
pub fn build_user_data(draft: &RegistrationDraft) -> UserData {
    match draft {
        RegistrationDraft::Patient(d) => UserData {
            first_name: d.first_name.clone(),
            last_name: d.last_name.clone(),
            email: d.email.clone(),
            phone: optional(&d.phone),
            date_of_birth: optional(&d.date_of_birth),
            gender: optional(&d.gender),
            address: optional(&d.address),
            license_number: None,
            specialty: None,
            experience: None,
            clinic: None,
            password: d.password.clone(),
            role: Role::Patient,
        },
        RegistrationDraft::Doctor(d) => UserData {
            first_name: d.first_name.clone(),
            last_name: d.last_name.clone(),
            email: d.email.clone(),
            phone: optional(&d.phone),
            date_of_birth: None,
            gender: None,
            address: None,
            license_number: optional(&d.license_number),
            specialty: optional(&d.specialty),
            experience: optional(&d.experience),
            clinic: optional(&d.clinic),
            password: d.password.clone(),
            role: Role::Doctor,
        },
    }
}

// ── Flow controller ────────────────────────────────────────────────────────

struct FlowState {
    patient: PatientDraft,
    doctor: DoctorDraft,
    active_role: Role,
    loading: bool,
    error: Option<String>,
}

/// Controller for the registration page.
///
/// Holds both role drafts (tab switches never lose input), the in-flight
/// flag, and the last rejection message. All methods take `&self`; state
/// lives behind a mutex so the flow can be shared with UI callbacks, and
/// the lock is never held across the register await.
pub struct RegistrationFlow {
    state: Mutex<FlowState>,
    authenticator: Arc<dyn Authenticator>,
    navigator: Arc<dyn Navigator>,
}

impl RegistrationFlow {
    pub fn new(authenticator: Arc<dyn Authenticator>, navigator: Arc<dyn Navigator>) -> Self {
        RegistrationFlow {
            state: Mutex::new(FlowState {
                patient: PatientDraft::default(),
                doctor: DoctorDraft::default(),
                active_role: Role::Patient,
                loading: false,
                error: None,
            }),
            authenticator,
            navigator,
        }
    }

    // ── Draft access ───────────────────────────────────────────────────────

    /// Mutate the patient draft in place (one call per edited field).
    pub fn update_patient(&self, f: impl FnOnce(&mut PatientDraft)) {
        f(&mut self.state.lock().patient);
    }

    /// Mutate the doctor draft in place.
    pub fn update_doctor(&self, f: impl FnOnce(&mut DoctorDraft)) {
        f(&mut self.state.lock().doctor);
    }

    pub fn patient(&self) -> PatientDraft {
        self.state.lock().patient.clone()
    }

    pub fn doctor(&self) -> DoctorDraft {
        self.state.lock().doctor.clone()
    }

    pub fn active_role(&self) -> Role {
        self.state.lock().active_role
    }

    /// Switch the visible tab. Drafts are untouched.
    pub fn set_active_role(&self, role: Role) {
        self.state.lock().active_role = role;
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    /// The message the form is currently showing, if any.
    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    // ── Submission ─────────────────────────────────────────────────────────

    /// Submit the draft for `role`.
    ///
    /// Returns `InProgress` untouched while another submission holds the
    /// in-flight flag. Otherwise the draft is validated and handed to the
    /// register call; failure of either step ends in `Rejected` carrying
    /// the message the form should show. Success points the navigator at
    /// the role dashboard exactly once and resets that role's draft.
    pub async fn submit(&self, role: Role) -> SubmitOutcome {
        let draft = {
            let mut st = self.state.lock();
            if st.loading {
                warn!("[registration] Duplicate submit ignored, one is already in flight");
                return SubmitOutcome::InProgress;
            }
            st.loading = true;
            st.error = None;
            match role {
                Role::Patient => RegistrationDraft::Patient(st.patient.clone()),
                Role::Doctor => RegistrationDraft::Doctor(st.doctor.clone()),
            }
        };

        let outcome = self.run_submission(role, draft).await;

        let mut st = self.state.lock();
        st.loading = false;
        match &outcome {
            SubmitOutcome::Rejected { message } => st.error = Some(message.clone()),
            SubmitOutcome::Registered { .. } => match role {
                Role::Patient => st.patient = PatientDraft::default(),
                Role::Doctor => st.doctor = DoctorDraft::default(),
            },
            SubmitOutcome::InProgress => {}
        }
        outcome
    }

    async fn run_submission(&self, role: Role, draft: RegistrationDraft) -> SubmitOutcome {
        if let Err(e) = validate(&draft) {
            info!("[registration] {} draft rejected: {}", role.as_str(), e);
            return SubmitOutcome::Rejected { message: e.to_string() };
        }

        let registered = match self.authenticator.register(build_user_data(&draft)).await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("[registration] Register call failed: {}", e);
                false
            }
        };
        if !registered {
            return SubmitOutcome::Rejected { message: REGISTRATION_FAILED_MESSAGE.to_string() };
        }

        let destination = role.dashboard_path().to_string();
        info!("[registration] Registered {} account, routing to {}", role.as_str(), destination);
        self.navigator.navigate(&destination);
        SubmitOutcome::Registered { destination }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
