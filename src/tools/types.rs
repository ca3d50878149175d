//! Core client tool types.
//!
//! Defines the [`ClientTool`] trait that all tools implement and
//! [`ToolOutcome`] for the textual result sent back to the agent.

/// Result of one client tool invocation.
///
/// The agent-facing surface is a single string; failures are carried in-band
/// (`is_error`) rather than thrown, so a misbehaving tool never tears down
/// the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    /// Textual result returned to the agent (may be empty).
    pub result: String,
    /// Whether the invocation failed.
    pub is_error: bool,
}

impl ToolOutcome {
    /// Successful outcome with the given result text.
    #[must_use]
    pub fn ok(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            is_error: false,
        }
    }

    /// Failed outcome with an error message as the result text.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            result: message.into(),
            is_error: true,
        }
    }
}

/// A named callback the remote agent can invoke during a live session.
///
/// Tools must be `Send + Sync`: they are shared with the session's read loop
/// task. Each invocation is a single self-contained document-store operation
/// with no cross-invocation state.
pub trait ClientTool: Send + Sync {
    /// The wire name the agent uses, e.g. `"getNote"`.
    fn name(&self) -> &str;

    /// Invoke the tool with the agent-supplied JSON parameters.
    ///
    /// Missing or malformed parameters yield an error outcome, never a panic.
    fn invoke(&self, params: &serde_json::Value) -> ToolOutcome;
}
