// CarePlus Engine — Chat Session Controller
// One chat widget instance: an append-only transcript plus the
// Idle / AwaitingReply / Listening phase machine, with replies resolved
// by the configured strategy.
// Bot replies are scheduled on the runtime after the configured delay and
// every scheduled reply is registered as an abortable task, so closing the
// session can never leave a reply landing in a dead transcript.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::AbortHandle;
use uuid::Uuid;

use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::types::{ChatConfig, ChatEvent, ChatMessage, ChatPhase};
use crate::engine::replies::ReplyResolver;
use crate::engine::speech::{ListenOptions, SpeechCapture, Unsupported, SPEECH_UNSUPPORTED_MESSAGE};

// ── Session state (behind the mutex) ───────────────────────────────────────

struct SessionState {
    transcript: Vec<ChatMessage>,
    phase: ChatPhase,
    /// Controller's view of voice capture. Set on start/stop so the phase
    /// machine does not depend on polling the capture backend.
    listening: bool,
    /// Replies scheduled but not yet appended.
    pending: usize,
    next_reply_id: u64,
    /// Abort handles for scheduled replies, keyed by reply id.
    /// Used by `close()` to cancel in-flight timers.
    scheduled: HashMap<u64, AbortHandle>,
    subscribers: Vec<UnboundedSender<ChatEvent>>,
    closed: bool,
}

impl SessionState {
    fn new() -> Self {
        SessionState {
            transcript: Vec::new(),
            phase: ChatPhase::Idle,
            listening: false,
            pending: 0,
            next_reply_id: 0,
            scheduled: HashMap::new(),
            subscribers: Vec::new(),
            closed: false,
        }
    }

    fn emit(&mut self, event: ChatEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn push_message(&mut self, session_id: &str, message: ChatMessage) {
        self.transcript.push(message.clone());
        self.emit(ChatEvent::MessageAppended { session_id: session_id.to_string(), message });
    }

    /// Recompute the phase from listening/pending and emit on change.
    /// Listening wins while capture runs; otherwise a pending reply means
    /// AwaitingReply and an empty pipeline means Idle.
    fn sync_phase(&mut self, session_id: &str) {
        let next = if self.listening {
            ChatPhase::Listening
        } else if self.pending > 0 {
            ChatPhase::AwaitingReply
        } else {
            ChatPhase::Idle
        };
        if next != self.phase {
            self.phase = next;
            self.emit(ChatEvent::PhaseChanged { session_id: session_id.to_string(), phase: next });
        }
    }
}

// ── Session handle ─────────────────────────────────────────────────────────

/// A single chat widget session.
///
/// The session is the only writer of its transcript: user messages enter
/// through [`send`](Self::send), voice capture, or file attachments, and
/// every bot reply is appended by a scheduled task after
/// `config.reply_delay_ms`. Dropping or [`close`](Self::close)-ing the
/// session aborts all scheduled replies.
///
/// Sessions schedule replies on the ambient tokio runtime; construct and
/// drive them inside one.
pub struct ChatSession {
    id: String,
    created_at: DateTime<Utc>,
    config: ChatConfig,
    resolver: ReplyResolver,
    speech: Arc<dyn SpeechCapture>,
    state: Arc<Mutex<SessionState>>,
}

impl ChatSession {
    /// Open a session with no speech backend (voice controls disabled).
    pub fn new(config: ChatConfig) -> Self {
        Self::with_speech(config, Arc::new(Unsupported))
    }

    /// Open a session with an environment-provided speech capture.
    pub fn with_speech(config: ChatConfig, speech: Arc<dyn SpeechCapture>) -> Self {
        let id = format!("chat-{}", Uuid::new_v4());
        info!(
            "[chat] Session {} opened ({:?}, {} ms reply delay)",
            id, config.strategy, config.reply_delay_ms
        );
        ChatSession {
            id,
            created_at: Utc::now(),
            resolver: ReplyResolver::new(config.strategy),
            config,
            speech,
            state: Arc::new(Mutex::new(SessionState::new())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn phase(&self) -> ChatPhase {
        self.state.lock().phase
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Snapshot of the transcript in arrival order.
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.state.lock().transcript.clone()
    }

    /// Subscribe to session events. Each subscriber gets every event from
    /// the moment of subscription; nothing is replayed.
    pub fn subscribe(&self) -> UnboundedReceiver<ChatEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state.lock().subscribers.push(tx);
        rx
    }

    // ── Sending ────────────────────────────────────────────────────────────

    /// Submit one user message. Whitespace-only input is a no-op and
    /// returns `Ok(false)`; otherwise the trimmed message is appended, a
    /// reply is scheduled after the configured delay, and `Ok(true)` comes
    /// back immediately.
    pub fn send(&self, text: &str) -> EngineResult<bool> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }
        let reply = self.resolver.resolve(trimmed);

        let reply_id;
        {
            let mut st = self.state.lock();
            if st.closed {
                return Err(EngineError::session("session is closed"));
            }
            st.push_message(&self.id, ChatMessage::user(trimmed));
            st.pending += 1;
            reply_id = st.next_reply_id;
            st.next_reply_id += 1;
            st.sync_phase(&self.id);
        }

        let state = Arc::clone(&self.state);
        let session_id = self.id.clone();
        let delay = Duration::from_millis(self.config.reply_delay_ms);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut st = state.lock();
            st.scheduled.remove(&reply_id);
            st.pending = st.pending.saturating_sub(1);
            if st.closed {
                return;
            }
            st.push_message(&session_id, ChatMessage::bot(reply));
            st.sync_phase(&session_id);
        });

        let mut st = self.state.lock();
        st.scheduled.retain(|_, h| !h.is_finished());
        st.scheduled.insert(reply_id, handle.abort_handle());
        debug!("[chat] {} scheduled reply {} in {} ms", self.id, reply_id, self.config.reply_delay_ms);
        Ok(true)
    }

    /// Attach a file by name. The exchange is synchronous: the upload note
    /// and the acknowledgement land together, with no reply delay and no
    /// resolver involved.
    pub fn attach_file(&self, file_name: &str) -> EngineResult<()> {
        let mut st = self.state.lock();
        if st.closed {
            return Err(EngineError::session("session is closed"));
        }
        st.push_message(&self.id, ChatMessage::user(format!("Uploaded file: {file_name}")));
        st.push_message(
            &self.id,
            ChatMessage::bot(format!("File \"{file_name}\" received. We'll review it shortly.")),
        );
        info!("[chat] {} received attachment {:?}", self.id, file_name);
        Ok(())
    }

    // ── Voice ──────────────────────────────────────────────────────────────

    /// Whether the session's capture backend can do voice input at all.
    pub fn voice_supported(&self) -> bool {
        self.speech.is_supported()
    }

    /// Begin continuous voice capture. Calling while already listening is a
    /// no-op; environments without speech support fail here with the
    /// user-facing message.
    pub fn start_voice(&self) -> EngineResult<()> {
        {
            let st = self.state.lock();
            if st.closed {
                return Err(EngineError::session("session is closed"));
            }
            if st.listening {
                return Ok(());
            }
        }
        if !self.speech.is_supported() {
            warn!("[chat] {} voice requested without speech support", self.id);
            return Err(EngineError::Speech(SPEECH_UNSUPPORTED_MESSAGE.to_string()));
        }
        self.speech.reset();
        self.speech.start(ListenOptions { continuous: true })?;

        let mut st = self.state.lock();
        if st.closed {
            let _ = self.speech.stop();
            return Err(EngineError::session("session is closed"));
        }
        st.listening = true;
        st.sync_phase(&self.id);
        Ok(())
    }

    /// Stop voice capture and submit whatever was recognized as one user
    /// message. Returns `Ok(true)` when a message was sent, `Ok(false)`
    /// when capture was empty or the session was not listening. The capture
    /// buffer is cleared either way.
    pub fn stop_voice(&self) -> EngineResult<bool> {
        {
            let mut st = self.state.lock();
            if !st.listening {
                return Ok(false);
            }
            st.listening = false;
            st.sync_phase(&self.id);
        }
        self.speech.stop()?;
        let captured = self.speech.transcript();
        self.speech.reset();
        self.send(&captured)
    }

    // ── Shutdown ───────────────────────────────────────────────────────────

    /// Close the session: abort every scheduled reply, stop voice capture
    /// if it was running, and emit `Closed`. Idempotent; later sends fail
    /// with a session error while the transcript stays readable.
    pub fn close(&self) {
        let (was_listening, handles) = {
            let mut st = self.state.lock();
            if st.closed {
                return;
            }
            st.closed = true;
            let was_listening = st.listening;
            st.listening = false;
            st.pending = 0;
            st.phase = ChatPhase::Idle;
            let handles: Vec<AbortHandle> = st.scheduled.drain().map(|(_, h)| h).collect();
            st.emit(ChatEvent::Closed { session_id: self.id.clone() });
            (was_listening, handles)
        };
        if was_listening {
            let _ = self.speech.stop();
        }
        let cancelled = handles.len();
        for handle in handles {
            handle.abort();
        }
        info!("[chat] Session {} closed ({} scheduled replies cancelled)", self.id, cancelled);
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.close();
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
