//! Dialog controller — owns at most one conversation session.
//!
//! The controller is the Start/Stop surface behind the user-facing dialog:
//! it builds the tool registry over the vault, starts and ends sessions, and
//! folds [`SessionEvent`]s into a two-line status readout (connection state,
//! speaking/listening state). Closing the dialog drops the controller, which
//! unconditionally ends any live session.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::MurmurConfig;
use crate::error::Result;
use crate::session::{AgentMode, ConversationSession, SessionEvent};
use crate::tools::notes::note_tool_registry;
use crate::tools::ToolRegistry;
use crate::vault::Vault;

/// Connection state shown on the first status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No session, or the last session has ended.
    #[default]
    Disconnected,
    /// Session started, waiting for the server to accept the conversation.
    Connecting,
    /// Conversation accepted and live.
    Connected,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
        }
    }
}

/// Controller behind the conversation dialog.
pub struct DialogController {
    config: MurmurConfig,
    tools: Arc<ToolRegistry>,
    session: Option<ConversationSession>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    connection: ConnectionState,
    mode: Option<AgentMode>,
}

impl DialogController {
    /// Build a controller over the vault named by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault root cannot be opened.
    pub fn new(config: MurmurConfig) -> Result<Self> {
        let vault = Arc::new(Vault::open(&config.vault.root_dir)?);
        let tools = Arc::new(note_tool_registry(vault, &config.agent.new_note_name));
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Ok(Self {
            config,
            tools,
            session: None,
            events_tx,
            events_rx,
            connection: ConnectionState::Disconnected,
            mode: None,
        })
    }

    /// Start a conversation session.
    ///
    /// At most one session is active per controller; a second start while one
    /// is live is logged and ignored. A connect failure is logged and leaves
    /// the controls in their pre-start state.
    pub async fn start(&mut self) {
        if self.session.is_some() {
            tracing::warn!("session already active; ignoring start");
            return;
        }
        match ConversationSession::start(
            &self.config.agent,
            Arc::clone(&self.tools),
            self.events_tx.clone(),
        )
        .await
        {
            Ok(session) => {
                self.session = Some(session);
                self.connection = ConnectionState::Connecting;
            }
            Err(e) => {
                tracing::error!("failed to start conversation session: {e}");
            }
        }
    }

    /// End the active session. A no-op when none is active.
    pub fn stop(&mut self) {
        match self.session.take() {
            Some(mut session) => session.end_session(),
            None => tracing::debug!("stop requested with no active session"),
        }
    }

    /// Whether a session is currently active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Wait for the next session event and fold it into the status.
    ///
    /// Returns `None` when the controller's own sender is the only one left,
    /// which cannot happen while it is alive — in practice this yields every
    /// event of the active session, ending with `Disconnected`.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        let event = self.events_rx.recv().await?;
        self.apply(&event);
        Some(event)
    }

    /// Drain any already-delivered events without waiting.
    pub fn poll_events(&mut self) -> Vec<SessionEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(&event);
            drained.push(event);
        }
        drained
    }

    fn apply(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Connected { conversation_id } => {
                tracing::info!("connected to conversation {conversation_id}");
                self.connection = ConnectionState::Connected;
                self.mode = Some(AgentMode::Listening);
            }
            SessionEvent::Disconnected => {
                self.connection = ConnectionState::Disconnected;
                self.mode = None;
                self.session = None;
            }
            SessionEvent::ModeChanged(mode) => {
                self.mode = Some(*mode);
            }
            SessionEvent::Error(message) => {
                // Log-and-continue: errors do not change the controls.
                tracing::warn!("session error: {message}");
            }
        }
    }

    /// Two-line status readout: connection state, then agent mode.
    #[must_use]
    pub fn status(&self) -> [String; 2] {
        let mode = match self.mode {
            Some(mode) => mode.to_string(),
            None => "-".to_owned(),
        };
        [
            format!("Status: {}", self.connection),
            format!("Agent: {mode}"),
        ]
    }
}

impl Drop for DialogController {
    fn drop(&mut self) {
        // Closing the dialog is the one cancellation point: end the session
        // before discarding UI state.
        if let Some(mut session) = self.session.take() {
            session.end_session();
        }
    }
}
