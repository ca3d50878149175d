//! Conversation session — WebSocket client for the hosted agent service.
//!
//! A [`ConversationSession`] connects to the configured endpoint, announces
//! the agent id, then runs a read/dispatch loop in a background task: client
//! tool calls are answered through the [`ToolRegistry`], server pings are
//! answered with pongs, and the four observable transitions are emitted as
//! [`SessionEvent`]s. There is no retry, no backoff, and no reconnection —
//! a failed session is logged and ends.

pub mod events;
pub mod protocol;

use std::sync::Arc;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::config::AgentConfig;
use crate::error::{MurmurError, Result};
use crate::tools::ToolRegistry;

pub use events::{AgentMode, SessionEvent};
use protocol::{ClientMessage, ServerMessage};

/// Handle to one active conversation.
///
/// The handle owns the session exclusively: ending it (explicitly or by
/// dropping the handle) cancels the background read loop, which closes the
/// connection and emits [`SessionEvent::Disconnected`].
pub struct ConversationSession {
    cancel: CancellationToken,
    ended: bool,
}

impl ConversationSession {
    /// Connect to the agent endpoint and start the session loop.
    ///
    /// The connection and the initiation message are completed before this
    /// returns, so a refused endpoint surfaces here rather than in the
    /// background task.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL is invalid, the connection is
    /// refused, or the initiation message cannot be sent.
    pub async fn start(
        agent: &AgentConfig,
        tools: Arc<ToolRegistry>,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Result<Self> {
        url::Url::parse(&agent.endpoint)
            .map_err(|e| MurmurError::Session(format!("invalid endpoint: {e}")))?;

        let (ws_stream, _) = tokio_tungstenite::connect_async(agent.endpoint.as_str())
            .await
            .map_err(|e| MurmurError::Session(format!("connect: {e}")))?;
        let (mut write, read) = ws_stream.split();

        let initiation = ClientMessage::ConversationInitiation {
            agent_id: agent.agent_id.clone(),
        };
        let json = serde_json::to_string(&initiation)
            .map_err(|e| MurmurError::Protocol(e.to_string()))?;
        write
            .send(Message::Text(json))
            .await
            .map_err(|e| MurmurError::Session(format!("send initiation: {e}")))?;

        tracing::info!("conversation session started for agent {}", agent.agent_id);

        let cancel = CancellationToken::new();
        tokio::spawn(run_loop(write, read, tools, events, cancel.child_token()));

        Ok(Self {
            cancel,
            ended: false,
        })
    }

    /// Signal end-of-session. Idempotent: calling this twice is a no-op.
    pub fn end_session(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;
        tracing::info!("ending conversation session");
        self.cancel.cancel();
    }
}

impl Drop for ConversationSession {
    fn drop(&mut self) {
        // Discarding the handle unconditionally ends the session.
        self.cancel.cancel();
    }
}

/// Read/dispatch loop. Runs until cancellation, server close, or a transport
/// error; always emits `Disconnected` on the way out.
async fn run_loop<W, R>(
    mut write: W,
    mut read: R,
    tools: Arc<ToolRegistry>,
    events: mpsc::UnboundedSender<SessionEvent>,
    cancel: CancellationToken,
) where
    W: Sink<Message> + Unpin,
    W::Error: std::fmt::Display,
    R: Stream<Item = std::result::Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = write.send(Message::Close(None)).await;
                break;
            }
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = handle_frame(&text, &tools, &events) {
                            match serde_json::to_string(&reply) {
                                Ok(json) => {
                                    if let Err(e) = write.send(Message::Text(json)).await {
                                        tracing::warn!("session send failed: {e}");
                                        break;
                                    }
                                }
                                Err(e) => tracing::warn!("failed to serialize reply: {e}"),
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!("conversation closed by server");
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::warn!("session read failed: {e}");
                        let _ = events.send(SessionEvent::Error(e.to_string()));
                        break;
                    }
                    _ => {} // Binary, Ping/Pong frames handled by tungstenite.
                }
            }
        }
    }
    let _ = events.send(SessionEvent::Disconnected);
}

/// Process one server frame. Returns the reply to send, if any.
///
/// Unparseable frames are logged and ignored; the conversation keeps going.
fn handle_frame(
    text: &str,
    tools: &ToolRegistry,
    events: &mpsc::UnboundedSender<SessionEvent>,
) -> Option<ClientMessage> {
    let msg: ServerMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!("ignoring unparseable server frame: {e}");
            return None;
        }
    };

    match msg {
        ServerMessage::ConversationInitiationMetadata { conversation_id } => {
            tracing::info!("conversation accepted: {conversation_id}");
            let _ = events.send(SessionEvent::Connected { conversation_id });
            None
        }
        ServerMessage::ClientToolCall {
            tool_name,
            tool_call_id,
            parameters,
        } => {
            let outcome = tools.dispatch(&tool_name, &parameters);
            Some(ClientMessage::ClientToolResult {
                tool_call_id,
                result: outcome.result,
                is_error: outcome.is_error,
            })
        }
        ServerMessage::ModeChange { mode } => {
            let _ = events.send(SessionEvent::ModeChanged(mode.into()));
            None
        }
        ServerMessage::AgentResponse { text } => {
            tracing::debug!("agent: {text}");
            None
        }
        ServerMessage::UserTranscript { text } => {
            tracing::debug!("user: {text}");
            None
        }
        ServerMessage::Ping { event_id } => Some(ClientMessage::Pong { event_id }),
        ServerMessage::Error { message } => {
            tracing::warn!("agent service error: {message}");
            let _ = events.send(SessionEvent::Error(message));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::tools::notes::note_tool_registry;
    use crate::vault::Vault;
    use std::path::Path;

    fn fixture() -> (
        tempfile::TempDir,
        Arc<Vault>,
        ToolRegistry,
        mpsc::UnboundedSender<SessionEvent>,
        mpsc::UnboundedReceiver<SessionEvent>,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let vault = Arc::new(Vault::open(dir.path()).unwrap());
        let tools = note_tool_registry(Arc::clone(&vault), "New Note.md");
        let (tx, rx) = mpsc::unbounded_channel();
        (dir, vault, tools, tx, rx)
    }

    #[test]
    fn handle_frame_ignores_garbage() {
        let (_dir, _vault, tools, tx, mut rx) = fixture();
        assert!(handle_frame("not json", &tools, &tx).is_none());
        assert!(handle_frame("{}", &tools, &tx).is_none());
        assert!(handle_frame(r#"{"type":"mystery"}"#, &tools, &tx).is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn handle_frame_metadata_emits_connected() {
        let (_dir, _vault, tools, tx, mut rx) = fixture();
        let frame = r#"{"type":"conversation_initiation_metadata","conversation_id":"c-9"}"#;
        assert!(handle_frame(frame, &tools, &tx).is_none());
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::Connected {
                conversation_id: "c-9".into()
            }
        );
    }

    #[test]
    fn handle_frame_mode_change_emits_event() {
        let (_dir, _vault, tools, tx, mut rx) = fixture();
        let frame = r#"{"type":"mode_change","mode":"listening"}"#;
        assert!(handle_frame(frame, &tools, &tx).is_none());
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::ModeChanged(AgentMode::Listening)
        );
    }

    #[test]
    fn handle_frame_error_emits_event_only() {
        let (_dir, _vault, tools, tx, mut rx) = fixture();
        let frame = r#"{"type":"error","message":"boom"}"#;
        assert!(handle_frame(frame, &tools, &tx).is_none());
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Error("boom".into()));
    }

    #[test]
    fn handle_frame_ping_replies_pong() {
        let (_dir, _vault, tools, tx, _rx) = fixture();
        let reply = handle_frame(r#"{"type":"ping","event_id":5}"#, &tools, &tx);
        assert!(matches!(reply, Some(ClientMessage::Pong { event_id: 5 })));
    }

    #[test]
    fn handle_frame_dispatches_get_note() {
        let (_dir, vault, tools, tx, _rx) = fixture();
        vault
            .create_file(Path::new("Grocery List.md"), "milk")
            .unwrap();

        let frame = r#"{
            "type": "client_tool_call",
            "tool_name": "getNote",
            "tool_call_id": "call-1",
            "parameters": {"noteName": "Grocery List"}
        }"#;
        match handle_frame(frame, &tools, &tx) {
            Some(ClientMessage::ClientToolResult {
                tool_call_id,
                result,
                is_error,
            }) => {
                assert_eq!(tool_call_id, "call-1");
                assert_eq!(result, "milk");
                assert!(!is_error);
            }
            other => unreachable!("expected tool result, got {other:?}"),
        }
    }

    #[test]
    fn handle_frame_missing_note_returns_empty_result() {
        let (_dir, _vault, tools, tx, _rx) = fixture();
        let frame = r#"{
            "type": "client_tool_call",
            "tool_name": "getNote",
            "tool_call_id": "call-2",
            "parameters": {"noteName": "Grocery List"}
        }"#;
        match handle_frame(frame, &tools, &tx) {
            Some(ClientMessage::ClientToolResult {
                result, is_error, ..
            }) => {
                assert_eq!(result, "");
                assert!(!is_error);
            }
            other => unreachable!("expected tool result, got {other:?}"),
        }
    }

    #[test]
    fn handle_frame_unknown_tool_reports_error_result() {
        let (_dir, _vault, tools, tx, _rx) = fixture();
        let frame = r#"{
            "type": "client_tool_call",
            "tool_name": "formatDisk",
            "tool_call_id": "call-3"
        }"#;
        match handle_frame(frame, &tools, &tx) {
            Some(ClientMessage::ClientToolResult { is_error, .. }) => assert!(is_error),
            other => unreachable!("expected tool result, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn start_rejects_invalid_endpoint() {
        let (_dir, _vault, tools, tx, _rx) = fixture();
        let agent = AgentConfig {
            agent_id: "a".into(),
            endpoint: "not a url".into(),
            new_note_name: "New Note.md".into(),
        };
        let result = ConversationSession::start(&agent, Arc::new(tools), tx).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn start_surfaces_connect_failure() {
        let (_dir, _vault, tools, tx, _rx) = fixture();
        // Port 9 (discard) is almost certainly not listening.
        let agent = AgentConfig {
            agent_id: "a".into(),
            endpoint: "ws://127.0.0.1:9/ws".into(),
            new_note_name: "New Note.md".into(),
        };
        let result = ConversationSession::start(&agent, Arc::new(tools), tx).await;
        assert!(result.is_err());
    }
}
