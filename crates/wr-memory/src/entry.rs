use std::sync::LazyLock;

use chrono::{Local, NaiveDateTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};
use wr_core::{normalize_category, normalize_label};

/// Written exactly once, when the log file is first created.
pub const LOG_HEADER: &str = "# PROJECT MEMORY LOG\n\n";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^## \[(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})\](?: \[(.*?)\] \[(.*)\])?$")
        .expect("heading regex is valid")
});

/// One record of the memory log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub timestamp: NaiveDateTime,
    /// Upper-cased writer label. Empty for legacy headings without labels.
    pub source: String,
    /// Upper-cased tag. Empty for legacy headings without labels.
    pub category: String,
    pub body: String,
}

impl Entry {
    /// New entry stamped with the current local time, truncated to seconds.
    pub fn new(source: &str, body: &str, category: &str) -> Self {
        let now = Local::now().naive_local();
        Self::with_timestamp(now, source, body, category)
    }

    pub fn with_timestamp(
        timestamp: NaiveDateTime,
        source: &str,
        body: &str,
        category: &str,
    ) -> Self {
        let timestamp = timestamp.with_nanosecond(0).unwrap_or(timestamp);
        Self {
            timestamp,
            source: normalize_label(source),
            category: normalize_category(category),
            body: body.to_string(),
        }
    }

    pub fn heading(&self) -> String {
        format!(
            "## [{}] [{}] [{}]",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.source,
            self.category
        )
    }

    /// The exact bytes appended to the log: blank line, heading, body, newline.
    pub fn render(&self) -> String {
        format!("\n{}\n{}\n", self.heading(), self.body)
    }
}

/// Parse log text back into entries.
///
/// Anything before the first heading (the file header) is ignored. A body line
/// that itself looks like a heading starts a new entry.
pub fn parse_entries(text: &str) -> Vec<Entry> {
    let mut entries = Vec::new();
    let mut current: Option<(Entry, Vec<&str>)> = None;

    for line in text.lines() {
        if let Some(entry) = parse_heading(line) {
            if let Some((done, lines)) = current.take() {
                entries.push(finish(done, lines, true));
            }
            current = Some((entry, Vec::new()));
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line);
        }
    }

    if let Some((done, lines)) = current {
        entries.push(finish(done, lines, false));
    }
    entries
}

fn parse_heading(line: &str) -> Option<Entry> {
    let caps = HEADING_RE.captures(line)?;
    let timestamp = NaiveDateTime::parse_from_str(&caps[1], TIMESTAMP_FORMAT).ok()?;
    Some(Entry {
        timestamp,
        source: caps.get(2).map_or(String::new(), |m| m.as_str().to_string()),
        category: caps.get(3).map_or(String::new(), |m| m.as_str().to_string()),
        body: String::new(),
    })
}

fn finish(mut entry: Entry, mut lines: Vec<&str>, followed_by_entry: bool) -> Entry {
    // Drop the blank separator line that precedes the next heading.
    if followed_by_entry && lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    entry.body = lines.join("\n");
    entry
}
