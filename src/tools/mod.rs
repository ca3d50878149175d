//! Client tools — named callbacks the remote agent can invoke mid-session.
//!
//! The remote conversational agent requests tool invocations over the wire;
//! the session loop dispatches them through a [`ToolRegistry`] and answers
//! with the textual outcome. All three shipped tools operate on the shared
//! note [`Vault`](crate::vault::Vault).

pub mod notes;
pub mod registry;
pub mod types;

pub use notes::{GetListOfNotesTool, GetNoteTool, SaveNoteTool};
pub use registry::ToolRegistry;
pub use types::{ClientTool, ToolOutcome};
