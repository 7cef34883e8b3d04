//! Context assembly for outbound agent requests.
//!
//! Combines a snapshot of the working directory with the tail of the memory
//! log into one string. Nothing here fails: an unreadable directory drops its
//! section, an unreadable log shows a diagnostic in place of the tail.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use wr_config::ContextConfig;

use crate::store::{MemoryStore, MemoryTail};

pub const DIRECTORY_TAG: &str = "[SHARED DIRECTORY CONTENT]";
pub const MEMORY_TAG: &str = "[SHARED PROJECT MEMORY (Recent Activity)]";
pub const TRUNCATION_MARKER: &str = "...";

#[derive(Debug)]
pub struct ContextAssembler {
    store: MemoryStore,
    root: PathBuf,
    config: ContextConfig,
}

impl ContextAssembler {
    pub fn new(store: MemoryStore, root: impl Into<PathBuf>, config: ContextConfig) -> Self {
        Self {
            store,
            root: root.into(),
            config,
        }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory section first, memory section second; either may be absent.
    pub fn build_context(&self) -> String {
        let mut context = String::new();
        if let Some(section) = self.directory_section() {
            context.push_str(&section);
        }
        if let Some(section) = self.memory_section() {
            context.push_str(&section);
        }
        context
    }

    pub fn directory_section(&self) -> Option<String> {
        match list_directory(&self.root, self.config.listing_limit) {
            Ok(listing) => Some(format!("\n{DIRECTORY_TAG}: {listing}")),
            Err(error) => {
                debug!(root = %self.root.display(), %error, "omitting directory section");
                None
            }
        }
    }

    /// `None` when the log is missing or empty. A degraded read still renders
    /// its diagnostic.
    pub fn memory_section(&self) -> Option<String> {
        if !self.store.exists() {
            return None;
        }
        match self.store.fetch_context(self.config.memory_char_limit) {
            MemoryTail::Ok(text) if text.is_empty() => None,
            tail => Some(render_memory_section(tail)),
        }
    }
}

fn render_memory_section(tail: MemoryTail) -> String {
    format!("\n\n{MEMORY_TAG}:\n{}\n", tail.into_text())
}

/// Sorted, comma-joined names of `dir`'s entries, capped at `limit`.
pub fn list_directory(dir: &Path, limit: usize) -> io::Result<String> {
    let mut names = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<io::Result<Vec<_>>>()?;
    names.sort();

    let truncated = names.len() > limit;
    names.truncate(limit);
    let mut listing = names.join(", ");
    if truncated {
        listing.push_str(TRUNCATION_MARKER);
    }
    Ok(listing)
}
