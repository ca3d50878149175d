//! Session transition events delivered to the dialog controller.
//!
//! The session surfaces exactly four observable transitions over a single
//! inbound channel. This is intentionally lightweight so the read loop can
//! emit events without blocking on the consumer.

use super::protocol::WireMode;

/// Whether the agent is currently speaking or listening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentMode {
    /// The agent is producing audio.
    Speaking,
    /// The agent is waiting for user speech.
    Listening,
}

impl From<WireMode> for AgentMode {
    fn from(mode: WireMode) -> Self {
        match mode {
            WireMode::Speaking => Self::Speaking,
            WireMode::Listening => Self::Listening,
        }
    }
}

impl std::fmt::Display for AgentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Speaking => write!(f, "speaking"),
            Self::Listening => write!(f, "listening"),
        }
    }
}

/// Observable session transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The server accepted the conversation.
    Connected {
        /// Server-assigned conversation id.
        conversation_id: String,
    },
    /// The session ended, for any reason.
    Disconnected,
    /// The agent switched between speaking and listening.
    ModeChanged(AgentMode),
    /// A server-reported runtime error. Logged and displayed, never retried.
    Error(String),
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn wire_mode_maps_to_agent_mode() {
        assert_eq!(AgentMode::from(WireMode::Speaking), AgentMode::Speaking);
        assert_eq!(AgentMode::from(WireMode::Listening), AgentMode::Listening);
    }

    #[test]
    fn agent_mode_display() {
        assert_eq!(AgentMode::Speaking.to_string(), "speaking");
        assert_eq!(AgentMode::Listening.to_string(), "listening");
    }
}
