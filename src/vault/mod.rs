//! Markdown note vault — the document store backing the client tools.
//!
//! A [`Vault`] wraps a root directory of markdown notes. Files are addressed
//! by vault-relative path and browsable as a single flattened listing, the
//! way the hosting note application exposes its store. Nothing is cached:
//! every listing and read goes to the filesystem.

pub mod resolver;

use crate::error::{MurmurError, Result};
use std::path::{Path, PathBuf};

/// One entry in the vault's flattened file listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Base file name, e.g. `Grocery List.md`.
    pub name: String,
    /// Vault-relative path, e.g. `recipes/Grocery List.md`.
    pub path: PathBuf,
    /// Whether the entry is a regular file (directories never appear in the
    /// listing, but point lookups via [`Vault::entry_at`] can see them).
    pub is_file: bool,
}

/// A directory of markdown notes.
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    /// Open a vault rooted at `root_dir`. The directory is created if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be created.
    pub fn open(root_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(root_dir)?;
        Ok(Self {
            root: root_dir.to_path_buf(),
        })
    }

    /// Returns the vault root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns a flattened listing of every regular file in the vault.
    ///
    /// Subdirectories are descended and their files appended in traversal
    /// order; entries within a directory are visited in name order so the
    /// listing is stable across calls. Dotfiles are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be read.
    pub fn list_files(&self) -> Result<Vec<FileEntry>> {
        let mut entries = Vec::new();
        self.walk(&self.root, &mut entries)?;
        Ok(entries)
    }

    fn walk(&self, dir: &Path, out: &mut Vec<FileEntry>) -> Result<()> {
        let mut children: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .collect();
        children.sort();

        for child in children {
            let name = match child.file_name().and_then(|n| n.to_str()) {
                Some(n) => n.to_owned(),
                None => continue,
            };
            if name.starts_with('.') {
                continue;
            }
            if child.is_dir() {
                self.walk(&child, out)?;
            } else if child.is_file() {
                let rel = child
                    .strip_prefix(&self.root)
                    .map_err(|e| MurmurError::Vault(format!("path outside vault: {e}")))?
                    .to_path_buf();
                out.push(FileEntry {
                    name,
                    path: rel,
                    is_file: true,
                });
            }
        }
        Ok(())
    }

    /// Point lookup of a vault-relative path.
    ///
    /// Returns `None` when nothing exists at the path. Unlike the listing,
    /// this can return a directory entry (`is_file == false`).
    #[must_use]
    pub fn entry_at(&self, rel: &Path) -> Option<FileEntry> {
        let abs = self.root.join(rel);
        let meta = std::fs::metadata(&abs).ok()?;
        let name = rel.file_name()?.to_str()?.to_owned();
        Some(FileEntry {
            name,
            path: rel.to_path_buf(),
            is_file: meta.is_file(),
        })
    }

    /// Read the full text content of a file, fresh on every call.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read_file(&self, rel: &Path) -> Result<String> {
        Ok(std::fs::read_to_string(self.root.join(rel))?)
    }

    /// Create a new file with the given content.
    ///
    /// Parent directories are created as needed. Refuses to overwrite an
    /// existing entry, matching the host store's create semantics.
    ///
    /// # Errors
    ///
    /// Returns an error if the path already exists or the write fails.
    pub fn create_file(&self, rel: &Path, content: &str) -> Result<()> {
        let abs = self.root.join(rel);
        if abs.exists() {
            return Err(MurmurError::Vault(format!(
                "file already exists: {}",
                rel.display()
            )));
        }
        if let Some(parent) = abs.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(abs, content)?;
        Ok(())
    }
}
