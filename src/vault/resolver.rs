//! Note resolver — title → filename → path → content.
//!
//! A human-readable title is sanitized into a filename, matched against the
//! vault's flattened listing, and (on request) read. Every lookup hits the
//! filesystem fresh; a [`NoteRef`] lives only for the duration of one call.

use super::Vault;
use std::path::PathBuf;

/// Characters that are unsafe in filenames, each replaced with `-`.
const FORBIDDEN: [char; 10] = ['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'];

/// A resolved (or unresolved) reference to a note. Constructed and discarded
/// within a single lookup; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRef {
    /// The title as given by the caller.
    pub title: String,
    /// Filename derived from the title (see [`derived_filename`]).
    pub derived_filename: String,
    /// Vault-relative path of the matching file, or `None` when no file in
    /// the current listing carries the derived name.
    pub path: Option<PathBuf>,
}

impl NoteRef {
    /// Resolve `title` against the vault's current listing.
    ///
    /// The first file whose base name equals the derived filename wins; with
    /// duplicate base names in different directories, listing order decides
    /// (accepted ambiguity, not an error). A listing failure resolves to
    /// "not found" after a warning, per the log-and-continue error policy.
    #[must_use]
    pub fn resolve(vault: &Vault, title: &str) -> Self {
        let derived = derived_filename(title);
        let path = match vault.list_files() {
            Ok(entries) => entries
                .into_iter()
                .find(|e| e.name == derived)
                .map(|e| e.path),
            Err(e) => {
                tracing::warn!("vault listing failed while resolving note: {e}");
                None
            }
        };
        Self {
            title: title.to_owned(),
            derived_filename: derived,
            path,
        }
    }
}

/// Derive a filename from a note title.
///
/// Each unsafe character is replaced with `-`, surrounding whitespace is
/// trimmed, and `.md` is appended. Pure and deterministic: the same title
/// always yields the same filename. `"My Note?"` becomes `"My Note-.md"`.
#[must_use]
pub fn derived_filename(title: &str) -> String {
    let sanitized: String = title
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '-' } else { c })
        .collect();
    format!("{}.md", sanitized.trim())
}

/// Returns the vault-relative path of the note titled `title`, or `None`.
#[must_use]
pub fn resolve_path(vault: &Vault, title: &str) -> Option<PathBuf> {
    NoteRef::resolve(vault, title).path
}

/// Returns the full text content of the note titled `title`.
///
/// `None` when no file matches the derived filename, when the resolved entry
/// is not a regular file (a directory can share the derived name), or when
/// the read fails (logged, not raised). The content is read fresh every call.
#[must_use]
pub fn read_note(vault: &Vault, title: &str) -> Option<String> {
    let path = resolve_path(vault, title)?;
    let entry = vault.entry_at(&path)?;
    if !entry.is_file {
        return None;
    }
    match vault.read_file(&path) {
        Ok(content) => Some(content),
        Err(e) => {
            tracing::warn!("failed to read note at {}: {e}", path.display());
            None
        }
    }
}

/// Returns every file name in the vault with a literal `.md` suffix stripped,
/// joined with `", "` for consumption by the remote agent.
///
/// No de-duplication, no sorting beyond listing order, no extension filter.
/// Note the suffix strip applies to *any* file name ending in `.md`, not just
/// markdown notes — a known quirk of the original tool surface, kept as-is.
#[must_use]
pub fn list_note_titles(vault: &Vault) -> String {
    let entries = match vault.list_files() {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("vault listing failed while listing notes: {e}");
            return String::new();
        }
    };
    entries
        .iter()
        .map(|e| e.name.strip_suffix(".md").unwrap_or(&e.name).to_owned())
        .collect::<Vec<_>>()
        .join(", ")
}
