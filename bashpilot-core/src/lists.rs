//! Persisted command lists
//!
//! Two independent lists of command names back the classifier: a whitelist of
//! commands that run without review and a blacklist of commands that require
//! it. Each list is one file, one name per line, loaded at startup and
//! rewritten wholesale on edit.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::constants::files;
use crate::config::dot_dir;
use crate::safety::command_name;

/// An ordered, deduplicated list of command names backed by a text file
#[derive(Debug, Clone)]
pub struct CommandList {
    path: PathBuf,
    entries: Vec<String>,
}

impl CommandList {
    /// Load a list from disk. A missing file yields an empty list; the file
    /// is created on first save.
    pub fn load(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read command list {}", path.display()))?;
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            tracing::warn!(path = %path.display(), "command list file is missing; starting empty");
            Vec::new()
        };

        Ok(Self { path, entries })
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Membership is on the bare command name
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry == name)
    }

    /// Insert a command name, reduced to its first token. Returns false for
    /// empty input or an existing entry; in-memory only until saved.
    pub fn insert(&mut self, command: &str) -> bool {
        let Some(name) = command_name(command) else {
            return false;
        };
        if self.contains(name) {
            return false;
        }
        self.entries.push(name.to_string());
        true
    }

    /// Remove an entry by name. Returns false if it was not present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry != name);
        self.entries.len() != before
    }

    /// Rewrite the backing file, one name per line, newline-terminated.
    /// In-memory entries are left untouched if the write fails.
    pub fn save(&self) -> Result<()> {
        let mut content = self.entries.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write command list {}", self.path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The whitelist/blacklist pair used by the classifier
#[derive(Debug, Clone)]
pub struct CommandLists {
    pub whitelist: CommandList,
    pub blacklist: CommandList,
}

impl CommandLists {
    /// Load both lists from the user's dot directory
    pub fn open_default() -> Result<Self> {
        let dir = dot_dir()?;
        Self::open(
            dir.join(files::WHITELIST_FILE),
            dir.join(files::BLACKLIST_FILE),
        )
    }

    /// Load both lists from explicit paths
    pub fn open(whitelist_path: PathBuf, blacklist_path: PathBuf) -> Result<Self> {
        Ok(Self {
            whitelist: CommandList::load(whitelist_path)?,
            blacklist: CommandList::load(blacklist_path)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_empty_list() {
        let dir = tempdir().unwrap();
        let list = CommandList::load(dir.path().join("whitelisted_commands.txt")).unwrap();
        assert!(list.entries().is_empty());
    }

    #[test]
    fn insert_reduces_to_first_token_and_dedups() {
        let dir = tempdir().unwrap();
        let mut list = CommandList::load(dir.path().join("list.txt")).unwrap();

        assert!(list.insert("rm -i file.txt"));
        assert!(!list.insert("rm"));
        assert!(!list.insert("   "));
        assert_eq!(list.entries(), ["rm"]);
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.txt");

        let mut list = CommandList::load(path.clone()).unwrap();
        list.insert("rm");
        list.insert("dd");
        list.save().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "rm\ndd\n");

        let reloaded = CommandList::load(path).unwrap();
        assert_eq!(reloaded.entries(), ["rm", "dd"]);
    }

    #[test]
    fn remove_missing_entry_is_noop() {
        let dir = tempdir().unwrap();
        let mut list = CommandList::load(dir.path().join("list.txt")).unwrap();
        list.insert("rm");

        assert!(!list.remove("dd"));
        assert!(list.remove("rm"));
        assert!(list.entries().is_empty());
    }

    #[test]
    fn blank_lines_are_skipped_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.txt");
        fs::write(&path, "rm\n\n  \ndd\n").unwrap();

        let list = CommandList::load(path).unwrap();
        assert_eq!(list.entries(), ["rm", "dd"]);
    }
}
