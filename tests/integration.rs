// CarePlus Core — integration suite (single binary).
// End-to-end journeys over the public API: a visitor registers and lands on
// their dashboard, then works the chat widgets the way the UI drives them.
// Collaborators are in-memory fakes; no network, no real clock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use careplus_core::{
    Authenticator, ChatConfig, ChatEvent, ChatMessage, ChatPhase, ChatSession, DoctorDraft,
    EngineResult, ListenOptions, Navigator, PatientDraft, RegistrationFlow, Role, Sender,
    SpeechCapture, SubmitOutcome, UserData, REGISTRATION_FAILED_MESSAGE, SPECIALTIES,
};

// ═══════════════════════════════════════════════════════════════════════════
// Fakes
// ═══════════════════════════════════════════════════════════════════════════

/// Records every register call; accepts or declines per construction.
struct FakeAuthService {
    accept: bool,
    seen: Mutex<Vec<UserData>>,
}

impl FakeAuthService {
    fn accepting() -> Arc<Self> {
        Arc::new(FakeAuthService { accept: true, seen: Mutex::new(Vec::new()) })
    }

    fn declining() -> Arc<Self> {
        Arc::new(FakeAuthService { accept: false, seen: Mutex::new(Vec::new()) })
    }
}

#[async_trait]
impl Authenticator for FakeAuthService {
    async fn register(&self, user: UserData) -> EngineResult<bool> {
        self.seen.lock().push(user);
        Ok(self.accept)
    }
}

#[derive(Default)]
struct FakeRouter {
    visited: Mutex<Vec<String>>,
}

impl Navigator for FakeRouter {
    fn navigate(&self, path: &str) {
        self.visited.lock().push(path.to_string());
    }
}

/// Scripted recognition surface: tests push text in while "listening".
struct FakeMicrophone {
    listening: AtomicBool,
    buffer: Mutex<String>,
}

impl FakeMicrophone {
    fn new() -> Arc<Self> {
        Arc::new(FakeMicrophone { listening: AtomicBool::new(false), buffer: Mutex::new(String::new()) })
    }

    fn hear(&self, text: &str) {
        self.buffer.lock().push_str(text);
    }
}

impl SpeechCapture for FakeMicrophone {
    fn is_supported(&self) -> bool {
        true
    }

    fn start(&self, _options: ListenOptions) -> EngineResult<()> {
        self.listening.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> EngineResult<()> {
        self.listening.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn transcript(&self) -> String {
        self.buffer.lock().clone()
    }

    fn reset(&self) {
        self.buffer.lock().clear();
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }
}

fn filled_patient() -> PatientDraft {
    PatientDraft {
        first_name: "Asha".into(),
        last_name: "Rao".into(),
        email: "asha@example.com".into(),
        phone: "98860 11223".into(),
        date_of_birth: "1991-02-14".into(),
        gender: "female".into(),
        address: "14 MG Road, Bangalore".into(),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
    }
}

fn filled_doctor() -> DoctorDraft {
    DoctorDraft {
        first_name: "Priya".into(),
        last_name: "Narayan".into(),
        email: "priya@example.com".into(),
        license_number: "KA-4417".into(),
        specialty: "orthopedics".into(),
        experience: "8".into(),
        clinic: "HealthPlus Ortho Center".into(),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
        ..DoctorDraft::default()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Registration journeys
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_patient_registers_and_lands_on_dashboard() {
    let auth = FakeAuthService::accepting();
    let router = Arc::new(FakeRouter::default());
    let flow = RegistrationFlow::new(auth.clone(), router.clone());

    // The UI mutates the draft field by field as the visitor types.
    flow.update_patient(|d| d.first_name = "Asha".into());
    flow.update_patient(|d| d.last_name = "Rao".into());
    flow.update_patient(|d| d.email = "asha@example.com".into());
    flow.update_patient(|d| d.password = "secret1".into());
    flow.update_patient(|d| d.confirm_password = "secret1".into());

    let outcome = flow.submit(Role::Patient).await;
    assert_eq!(outcome, SubmitOutcome::Registered { destination: "/dashboard/patient".into() });
    assert_eq!(*router.visited.lock(), vec!["/dashboard/patient".to_string()]);

    // The service saw the payload without the confirmation field.
    let seen = auth.seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].email, "asha@example.com");
    assert_eq!(seen[0].role, Role::Patient);
    let json = serde_json::to_value(&seen[0]).unwrap();
    assert!(json.get("confirmPassword").is_none());

    // Success clears the form for the next visitor.
    assert_eq!(flow.patient(), PatientDraft::default());
    assert_eq!(flow.error(), None);
}

#[tokio::test]
async fn test_doctor_registration_payload_and_route() {
    let auth = FakeAuthService::accepting();
    let router = Arc::new(FakeRouter::default());
    let flow = RegistrationFlow::new(auth.clone(), router.clone());
    flow.update_doctor(|d| *d = filled_doctor());

    let outcome = flow.submit(Role::Doctor).await;
    assert_eq!(outcome, SubmitOutcome::Registered { destination: "/dashboard/doctor".into() });
    assert_eq!(*router.visited.lock(), vec!["/dashboard/doctor".to_string()]);

    let seen = auth.seen.lock();
    let json = serde_json::to_value(&seen[0]).unwrap();
    assert_eq!(json["role"], "doctor");
    assert_eq!(json["licenseNumber"], "KA-4417");
    assert_eq!(json["specialty"], "orthopedics");
    assert!(SPECIALTIES.contains(&"orthopedics"));
}

#[tokio::test]
async fn test_rejected_draft_stays_on_the_form() {
    let auth = FakeAuthService::accepting();
    let router = Arc::new(FakeRouter::default());
    let flow = RegistrationFlow::new(auth.clone(), router.clone());

    flow.update_patient(|d| *d = filled_patient());
    flow.update_patient(|d| d.confirm_password = "something-else".into());

    let outcome = flow.submit(Role::Patient).await;
    assert_eq!(outcome, SubmitOutcome::Rejected { message: "Passwords do not match".into() });
    assert_eq!(flow.error().as_deref(), Some("Passwords do not match"));
    assert!(auth.seen.lock().is_empty(), "invalid drafts never reach the service");
    assert!(router.visited.lock().is_empty());

    // The visitor fixes the field and resubmits on the same flow.
    flow.update_patient(|d| d.confirm_password = "secret1".into());
    let outcome = flow.submit(Role::Patient).await;
    assert!(matches!(outcome, SubmitOutcome::Registered { .. }));
    assert_eq!(flow.error(), None);
}

#[tokio::test]
async fn test_declined_service_shows_generic_message() {
    let auth = FakeAuthService::declining();
    let router = Arc::new(FakeRouter::default());
    let flow = RegistrationFlow::new(auth, router.clone());
    flow.update_patient(|d| *d = filled_patient());

    let outcome = flow.submit(Role::Patient).await;
    assert_eq!(outcome, SubmitOutcome::Rejected { message: REGISTRATION_FAILED_MESSAGE.into() });
    assert!(router.visited.lock().is_empty(), "no navigation on failure");
    // The typed draft is preserved for a retry.
    assert_eq!(flow.patient(), filled_patient());
}

// ═══════════════════════════════════════════════════════════════════════════
// Chat journeys
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn test_assistant_widget_booking_conversation() {
    let session = ChatSession::new(ChatConfig::default());

    for line in ["hello", "book appointment", "give me his appointment details", "confirm booking"] {
        assert!(session.send(line).unwrap());
        tokio::time::sleep(Duration::from_millis(850)).await;
    }

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 8, "four exchanges, strictly alternating");
    for (i, message) in transcript.iter().enumerate() {
        let expected = if i % 2 == 0 { Sender::User } else { Sender::Bot };
        assert_eq!(message.sender, expected, "position {i}");
    }
    assert_eq!(transcript[1].text, "Hi there! How can I assist you today?");
    assert!(transcript[5].text.contains("HealthPlus Ortho Center"));
    assert_eq!(transcript[7].text, "Your booking has been confirmed. Thank you!");
}

#[tokio::test(start_paused = true)]
async fn test_helpdesk_widget_guides_and_acknowledges_files() {
    let session = ChatSession::new(ChatConfig::helpdesk());
    let mut events = session.subscribe();

    session.send("Where do I see my prescription history?").unwrap();
    tokio::time::sleep(Duration::from_millis(550)).await;
    session.attach_file("blood-report.pdf").unwrap();

    let transcript = session.transcript();
    assert_eq!(transcript[1].text, "Your prescriptions are available in the Prescriptions tab.");
    assert_eq!(transcript[2].text, "Uploaded file: blood-report.pdf");
    assert_eq!(transcript[3].text, "File \"blood-report.pdf\" received. We'll review it shortly.");

    // The event stream mirrors the transcript in order.
    let mut appended = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let ChatEvent::MessageAppended { message, .. } = event {
            appended.push(message);
        }
    }
    assert_eq!(appended, transcript);
}

#[tokio::test(start_paused = true)]
async fn test_voice_round_trip_through_the_widget() {
    let microphone = FakeMicrophone::new();
    let session = ChatSession::with_speech(ChatConfig::default(), microphone.clone());

    session.start_voice().unwrap();
    assert_eq!(session.phase(), ChatPhase::Listening);
    microphone.hear("confirm booking");
    assert!(session.stop_voice().unwrap());

    tokio::time::sleep(Duration::from_millis(850)).await;
    let transcript = session.transcript();
    assert_eq!(
        transcript,
        vec![
            ChatMessage::user("confirm booking"),
            ChatMessage::bot("Your booking has been confirmed. Thank you!"),
        ]
    );
    assert_eq!(session.phase(), ChatPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_closing_the_widget_cancels_the_pending_reply() {
    let session = ChatSession::new(ChatConfig::default());
    session.send("hello").unwrap();
    assert_eq!(session.phase(), ChatPhase::AwaitingReply);

    // The visitor closes the widget before the bot gets to answer.
    session.close();
    tokio::time::sleep(Duration::from_millis(2000)).await;

    assert_eq!(session.transcript(), vec![ChatMessage::user("hello")]);
    assert!(session.send("hello again").is_err());
}

#[tokio::test(start_paused = true)]
async fn test_two_widgets_do_not_share_state() {
    let assistant = ChatSession::new(ChatConfig::default());
    let helpdesk = ChatSession::new(ChatConfig::helpdesk());
    assert_ne!(assistant.id(), helpdesk.id());

    assistant.send("hello").unwrap();
    helpdesk.send("hello").unwrap();
    tokio::time::sleep(Duration::from_millis(850)).await;

    // Same input, different strategy, different reply.
    assert_eq!(assistant.transcript()[1].text, "Hi there! How can I assist you today?");
    assert_eq!(
        helpdesk.transcript()[1].text,
        "I'm here to assist with medical queries, appointments, and records."
    );
}
