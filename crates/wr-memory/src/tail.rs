//! Bounded tail extraction.
//!
//! Reads at most `4 * char_limit` bytes from the end of a seekable source,
//! since no UTF-8 character is longer than four bytes. Sources that cannot
//! seek are read in full.

use std::io::{self, Read, Seek, SeekFrom};

use tracing::debug;

const MAX_UTF8_CHAR_LEN: u64 = 4;

/// The last characters of a source, and whether anything before them was cut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailWindow {
    pub text: String,
    pub truncated: bool,
}

impl TailWindow {
    /// Drop the partial leading line of a truncated window.
    ///
    /// A window without any newline is returned whole.
    pub fn aligned(self) -> String {
        if !self.truncated {
            return self.text;
        }
        match self.text.find('\n') {
            Some(idx) => self.text[idx + 1..].to_string(),
            None => self.text,
        }
    }
}

/// Return exactly the last `char_limit` characters of `reader`.
pub fn tail_chars<R: Read + Seek>(reader: &mut R, char_limit: usize) -> io::Result<TailWindow> {
    if char_limit == 0 {
        return Ok(TailWindow {
            text: String::new(),
            truncated: false,
        });
    }

    let budget = (char_limit as u64).saturating_mul(MAX_UTF8_CHAR_LEN);
    let (bytes, skipped) = match seek_suffix(reader, budget) {
        Ok((start, len)) => read_suffix(reader, start, len)?,
        Err(error) => {
            debug!(%error, "source not seekable, reading in full");
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes)?;
            (bytes, false)
        }
    };

    let text = String::from_utf8(bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.utf8_error()))?;
    Ok(last_chars(text, char_limit, skipped))
}

/// Position `reader` at `len - budget`, returning `(start, len)`.
fn seek_suffix<R: Seek>(reader: &mut R, budget: u64) -> io::Result<(u64, u64)> {
    let len = reader.seek(SeekFrom::End(0))?;
    let start = len.saturating_sub(budget);
    reader.seek(SeekFrom::Start(start))?;
    Ok((start, len))
}

/// Read from `start` to EOF. Leading UTF-8 continuation bytes left over from
/// a character split by the seek are dropped.
fn read_suffix<R: Read>(reader: &mut R, start: u64, len: u64) -> io::Result<(Vec<u8>, bool)> {
    let mut bytes = Vec::with_capacity(len.saturating_sub(start) as usize);
    reader.read_to_end(&mut bytes)?;

    if start > 0 {
        let lead = bytes
            .iter()
            .take_while(|b| (**b & 0xC0) == 0x80)
            .count();
        bytes.drain(..lead);
    }
    Ok((bytes, start > 0))
}

fn last_chars(text: String, char_limit: usize, skipped: bool) -> TailWindow {
    match text.char_indices().rev().nth(char_limit - 1) {
        Some((idx, _)) => TailWindow {
            truncated: skipped || idx > 0,
            text: text[idx..].to_string(),
        },
        None => TailWindow {
            text,
            truncated: skipped,
        },
    }
}
