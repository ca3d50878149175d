//! The three note tools: `saveNote`, `getNote`, `getListOfNotes`.
//!
//! Each tool performs one document-store operation against the shared vault.
//! A missing note is an empty-string result, never an error frame; only a
//! failed write or malformed parameters report `is_error`.

use std::path::Path;
use std::sync::Arc;

use crate::vault::{Vault, resolver};

use super::types::{ClientTool, ToolOutcome};

/// `saveNote { message }` — writes the message into a new note file.
pub struct SaveNoteTool {
    vault: Arc<Vault>,
    /// File name written to, e.g. `New Note.md`.
    note_name: String,
}

impl SaveNoteTool {
    /// Create the tool writing to `note_name` in `vault`.
    #[must_use]
    pub fn new(vault: Arc<Vault>, note_name: impl Into<String>) -> Self {
        Self {
            vault,
            note_name: note_name.into(),
        }
    }
}

impl ClientTool for SaveNoteTool {
    fn name(&self) -> &str {
        "saveNote"
    }

    fn invoke(&self, params: &serde_json::Value) -> ToolOutcome {
        let Some(message) = params.get("message").and_then(|v| v.as_str()) else {
            return ToolOutcome::error("saveNote requires a string `message` parameter");
        };
        tracing::info!("saveNote: writing {}", self.note_name);
        match self.vault.create_file(Path::new(&self.note_name), message) {
            Ok(()) => ToolOutcome::ok(""),
            Err(e) => {
                tracing::warn!("saveNote failed: {e}");
                ToolOutcome::error(e.to_string())
            }
        }
    }
}

/// `getNote { noteName }` — reads a note by title.
pub struct GetNoteTool {
    vault: Arc<Vault>,
}

impl GetNoteTool {
    /// Create the tool reading from `vault`.
    #[must_use]
    pub fn new(vault: Arc<Vault>) -> Self {
        Self { vault }
    }
}

impl ClientTool for GetNoteTool {
    fn name(&self) -> &str {
        "getNote"
    }

    fn invoke(&self, params: &serde_json::Value) -> ToolOutcome {
        let Some(title) = params.get("noteName").and_then(|v| v.as_str()) else {
            return ToolOutcome::error("getNote requires a string `noteName` parameter");
        };
        tracing::info!("getNote: {title}");
        // Not-found is an empty result on the tool surface, not an error.
        ToolOutcome::ok(resolver::read_note(&self.vault, title).unwrap_or_default())
    }
}

/// `getListOfNotes {}` — comma-joined note titles at call time.
pub struct GetListOfNotesTool {
    vault: Arc<Vault>,
}

impl GetListOfNotesTool {
    /// Create the tool listing `vault`.
    #[must_use]
    pub fn new(vault: Arc<Vault>) -> Self {
        Self { vault }
    }
}

impl ClientTool for GetListOfNotesTool {
    fn name(&self) -> &str {
        "getListOfNotes"
    }

    fn invoke(&self, _params: &serde_json::Value) -> ToolOutcome {
        tracing::info!("getListOfNotes");
        ToolOutcome::ok(resolver::list_note_titles(&self.vault))
    }
}

/// Build the standard registry of all three note tools over one vault.
#[must_use]
pub fn note_tool_registry(vault: Arc<Vault>, new_note_name: &str) -> super::ToolRegistry {
    let mut registry = super::ToolRegistry::new();
    registry.register(Arc::new(SaveNoteTool::new(Arc::clone(&vault), new_note_name)));
    registry.register(Arc::new(GetNoteTool::new(Arc::clone(&vault))));
    registry.register(Arc::new(GetListOfNotesTool::new(vault)));
    registry
}
