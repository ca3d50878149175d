//! Murmur: voice conversation companion for a markdown note vault.
//!
//! Connects a directory of markdown notes to a hosted real-time voice
//! conversation agent. During a live session the remote agent can invoke
//! three client tools — save note, get note, list notes — which operate on
//! the vault.
//!
//! # Architecture
//!
//! - **Vault**: the document store, a flattened listing over a note directory
//! - **Note resolver**: title → sanitized filename → path → content
//! - **Session**: JSON-over-WebSocket client for the hosted agent endpoint
//! - **Tools**: the client tool registry the agent dispatches into
//! - **Controller**: Start/Stop surface with a two-line status readout

pub mod config;
pub mod controller;
pub mod error;
pub mod session;
pub mod tools;
pub mod vault;

pub use config::MurmurConfig;
pub use controller::{ConnectionState, DialogController};
pub use error::{MurmurError, Result};
pub use session::{AgentMode, ConversationSession, SessionEvent};
pub use tools::{ClientTool, ToolOutcome, ToolRegistry};
pub use vault::{FileEntry, Vault};
