//! Shared project memory: an append-only Markdown log every agent writes to,
//! and the context string every agent reads before issuing a request.

pub mod context;
mod entry;
mod store;
pub mod tail;

use std::path::Path;

use tracing::warn;
use wr_config::ProjectConfig;
use wr_core::MemoryError;

pub use context::{ContextAssembler, list_directory};
pub use entry::{Entry, LOG_HEADER, TIMESTAMP_FORMAT, parse_entries};
pub use store::{MemoryStore, MemoryTail};

/// Load the project config rooted at `root`, falling back to defaults when
/// it cannot be read so collaborators are never blocked by a bad config file.
pub fn project_config(root: &Path) -> ProjectConfig {
    match ProjectConfig::load(root) {
        Ok(config) => config,
        Err(error) => {
            warn!(root = %root.display(), error = %format!("{error:#}"), "using default memory config");
            let mut config = ProjectConfig::default();
            config.memory = config.memory.resolve_against(root);
            config
        }
    }
}

/// Store for the current working directory's project.
pub fn default_store() -> MemoryStore {
    MemoryStore::new(project_config(Path::new(".")).memory)
}

/// Append to the current project's memory log.
pub fn append_log(source: &str, content: &str, category: &str) -> Result<Entry, MemoryError> {
    default_store().append_log(source, content, category)
}

/// Tail of the current project's memory log. Never fails.
pub fn fetch_context(char_limit: usize) -> MemoryTail {
    default_store().fetch_context(char_limit)
}

/// Context string for the current working directory. Never fails.
pub fn build_context() -> String {
    let config = project_config(Path::new("."));
    let store = MemoryStore::new(config.memory);
    ContextAssembler::new(store, ".", config.context).build_context()
}
