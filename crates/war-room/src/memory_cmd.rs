use std::path::PathBuf;

use anyhow::Result;
use wr_config::ProjectConfig;
use wr_core::{OutputFormat, normalize_label};
use wr_memory::{ContextAssembler, Entry, MemoryStore, TIMESTAMP_FORMAT};

/// Resolved project root and config shared by every memory command.
pub(crate) struct MemoryEnv {
    pub root: PathBuf,
    pub config: ProjectConfig,
}

impl MemoryEnv {
    fn store(&self) -> MemoryStore {
        MemoryStore::new(self.config.memory.clone())
    }
}

pub(crate) fn handle_log(
    env: &MemoryEnv,
    source: &str,
    content: &[String],
    category: &str,
) -> Result<()> {
    let store = env.store();
    store.append_log(source, &content.join(" "), category)?;
    println!("Memory updated in {}", store.path().display());
    Ok(())
}

pub(crate) fn handle_tail(env: &MemoryEnv, limit: Option<usize>, aligned: bool) -> Result<()> {
    let limit = limit.unwrap_or(env.config.memory.tail_char_limit);
    let store = env.store();
    let tail = if aligned {
        store.fetch_context_aligned(limit)
    } else {
        store.fetch_context(limit)
    };
    if tail.is_degraded() {
        eprintln!("Warning: memory log could not be read; output is a diagnostic.");
    }
    print!("{tail}");
    Ok(())
}

pub(crate) fn handle_context(env: &MemoryEnv) -> Result<()> {
    let assembler = ContextAssembler::new(env.store(), &env.root, env.config.context.clone());
    println!("{}", assembler.build_context());
    Ok(())
}

pub(crate) fn handle_list(
    env: &MemoryEnv,
    source: Option<String>,
    category: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let source = source.as_deref().map(normalize_label);
    let category = category.as_deref().map(normalize_label);
    let entries: Vec<Entry> = env
        .store()
        .entries()?
        .into_iter()
        .filter(|entry| source.as_ref().is_none_or(|s| &entry.source == s))
        .filter(|entry| category.as_ref().is_none_or(|c| &entry.category == c))
        .collect();

    if matches!(format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No memory entries found.");
        return Ok(());
    }

    println!(
        "{:<19}  {:<16}  {:<12}  CONTENT",
        "TIMESTAMP", "SOURCE", "CATEGORY"
    );
    for entry in entries {
        println!(
            "{:<19}  {:<16}  {:<12}  {}",
            entry.timestamp.format(TIMESTAMP_FORMAT),
            truncate_chars(&entry.source, 16),
            truncate_chars(&entry.category, 12),
            truncate_chars(first_line(&entry.body), 60)
        );
    }
    Ok(())
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}
