//! Splits one generated text blob into file records.
//!
//! Each file in the blob is introduced by a marker line:
//!
//! ```text
//! // File: app/Controllers/Home.php
//! /* File: app/Config/Routes.php */
//! ```
//!
//! The path is one or more of `A-Z a-z 0-9 _ / . -`, and the marker must end
//! with a newline (`\n` or `\r\n`). A file's content runs up to the next
//! `// File:` or `/* File:` occurrence, or to the end of the blob, and is
//! trimmed. Only spaces and tabs are allowed around the marker tokens.

use crate::options::ForgeOptions;
use crate::types::FileRecord;
use regex::Regex;
use std::sync::LazyLock;
#[cfg(feature = "logging")]
use tracing;

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?://|/\*)[ \t]*File:[ \t]*([A-Za-z0-9_/.-]+)[ \t]*(?:\*/)?[ \t]*\r?\n")
        .expect("marker pattern is valid")
});

// Anything that looks like the start of a marker ends the previous file, even
// when the rest of the line is malformed.
static TERMINATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?://|/\*)[ \t]*File:").expect("terminator pattern is valid"));

/// Lazily yields `(path, trimmed content)` for every marker in a blob, in order.
///
/// Entries with empty content are yielded too; [`parse_application_code`]
/// drops them.
#[derive(Debug, Clone)]
pub struct MarkerScanner<'a> {
    blob: &'a str,
    pos: usize,
}

impl<'a> MarkerScanner<'a> {
    pub fn new(blob: &'a str) -> Self {
        Self { blob, pos: 0 }
    }
}

impl<'a> Iterator for MarkerScanner<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.blob.len() {
            return None;
        }
        let caps = MARKER.captures_at(self.blob, self.pos)?;
        let marker = caps.get(0)?;
        let path = caps.get(1)?.as_str();
        let start = marker.end();
        let end = TERMINATOR
            .find_at(self.blob, start)
            .map_or(self.blob.len(), |m| m.start());
        self.pos = end;
        Some((path.trim(), self.blob[start..end].trim()))
    }
}

/// Parses a generated blob into records, using the default fallback path.
///
/// Never fails: when no marker yields a record and the blob is not blank, the
/// whole trimmed blob comes back as a single `application_output.txt` record.
/// A blank blob gives no records.
pub fn parse_application_code(blob: &str) -> Vec<FileRecord> {
    parse_application_code_with(blob, &ForgeOptions::default())
}

/// Like [`parse_application_code`], with the fallback path taken from `options`.
pub fn parse_application_code_with(blob: &str, options: &ForgeOptions) -> Vec<FileRecord> {
    let mut files: Vec<FileRecord> = MarkerScanner::new(blob)
        .filter(|(path, content)| !path.is_empty() && !content.is_empty())
        .map(|(path, content)| FileRecord::new(path, content))
        .collect();

    let trimmed = blob.trim();
    if files.is_empty() && !trimmed.is_empty() {
        #[cfg(feature = "logging")]
        tracing::debug!(
            "No file markers found, emitting {} as a single file",
            options.fallback_path
        );
        files.push(FileRecord::new(&options.fallback_path, trimmed));
    }
    #[cfg(feature = "logging")]
    tracing::debug!("Parsed {} records from {} bytes", files.len(), blob.len());
    files
}

/// Joins records into a marker-delimited blob, the inverse of [`parse_application_code`].
///
/// Each record becomes `// File: <path>`, a newline, the content and a newline.
pub fn format_application_code(files: &[FileRecord]) -> String {
    let capacity = files
        .iter()
        .map(|f| f.path.len() + f.content.len() + 12)
        .sum();
    let mut out = String::with_capacity(capacity);
    for file in files {
        out.push_str("// File: ");
        out.push_str(&file.path);
        out.push('\n');
        out.push_str(&file.content);
        if !file.content.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}
