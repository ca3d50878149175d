//! Wire protocol for the hosted conversation service.
//!
//! JSON messages over WebSocket, serde-tagged on `type`. The client side is
//! deliberately thin: initiate, answer tool calls, answer pings. Everything
//! that drives the conversation (speech, agent reasoning) lives server-side.

use serde::{Deserialize, Serialize};

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Opens the conversation for the configured agent.
    ConversationInitiation { agent_id: String },
    /// Outcome of a client tool invocation the agent requested.
    ClientToolResult {
        tool_call_id: String,
        result: String,
        is_error: bool,
    },
    /// Answer to a server `ping`.
    Pong { event_id: u64 },
}

/// Messages received from the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Conversation accepted; carries the server-assigned id.
    ConversationInitiationMetadata {
        #[serde(default)]
        conversation_id: String,
    },
    /// The agent requests a client tool invocation.
    ClientToolCall {
        tool_name: String,
        tool_call_id: String,
        #[serde(default)]
        parameters: serde_json::Value,
    },
    /// The agent switched between speaking and listening.
    ModeChange { mode: WireMode },
    /// Agent utterance transcript (logged only).
    AgentResponse {
        #[serde(default)]
        text: String,
    },
    /// User utterance transcript (logged only).
    UserTranscript {
        #[serde(default)]
        text: String,
    },
    /// Keepalive; must be answered with a `pong` carrying the same id.
    Ping {
        #[serde(default)]
        event_id: u64,
    },
    /// Server-side runtime error. Informational; the server decides whether
    /// to keep the conversation open.
    Error {
        #[serde(default)]
        message: String,
    },
}

/// Agent mode as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireMode {
    /// The agent is producing audio.
    Speaking,
    /// The agent is waiting for user speech.
    Listening,
}
