//! Output formatting for parsed records.
//!
//! Provides functions to format a list of [`FileRecord`]s as JSON, an ASCII
//! tree, bare paths, Markdown, plain text, or a marker-delimited blob.
//! File contents are always emitted unchanged.

use crate::error::ForgeError;
use crate::options::ForgeOptions;
use crate::parser::format_application_code;
use crate::tree::{build_file_tree_with, render_tree};
use crate::types::FileRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Json,
    Tree,
    Paths,
    Markdown,
    Text,
    Blob,
}

impl OutputFormat {
    /// Returns the conventional file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
            OutputFormat::Tree | OutputFormat::Paths | OutputFormat::Text | OutputFormat::Blob => {
                "txt"
            }
        }
    }
}

/// Formats the records into a string. JSON output is the built tree.
pub fn format_records(
    files: &[FileRecord],
    format: OutputFormat,
    options: &ForgeOptions,
    pretty: bool,
) -> Result<String, ForgeError> {
    Ok(match format {
        OutputFormat::Json => {
            let tree = build_file_tree_with(files, options);
            if pretty {
                serde_json::to_string_pretty(&tree)?
            } else {
                serde_json::to_string(&tree)?
            }
        }
        OutputFormat::Tree => {
            let mut out = render_tree(&build_file_tree_with(files, options));
            out.push('\n');
            out
        }
        OutputFormat::Paths => format_paths(files),
        OutputFormat::Markdown => format_markdown(files, options),
        OutputFormat::Text => format_text(files, options),
        OutputFormat::Blob => format_application_code(files),
    })
}

/// Writes the formatted records to a file.
pub fn write_output(
    files: &[FileRecord],
    format: OutputFormat,
    options: &ForgeOptions,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), ForgeError> {
    let content = format_records(files, format, options, pretty)?;
    fs::write(&path, content).map_err(|e| ForgeError::io(path.as_ref(), e))?;
    Ok(())
}

// ----------------------- Internal formatting -----------------------

fn format_paths(files: &[FileRecord]) -> String {
    let mut out = String::new();
    for file in files {
        out.push_str(&file.path);
        out.push('\n');
    }
    out
}

fn format_markdown(files: &[FileRecord], options: &ForgeOptions) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str("```\n");
    out.push_str(&render_tree(&build_file_tree_with(files, options)));
    out.push_str("\n```\n\n");

    for file in files {
        let ext = file.path.rsplit_once('.').map_or("", |(_, ext)| ext);
        let lang = language_from_extension(ext);

        out.push_str(&format!("## {}\n\n```{}\n", file.path, lang));
        out.push_str(&file.content);
        if !file.content.ends_with('\n') { out.push('\n'); }
        out.push_str("```\n\n");
    }
    out
}

fn format_text(files: &[FileRecord], options: &ForgeOptions) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str("Directory Tree:\n");
    out.push_str(&render_tree(&build_file_tree_with(files, options)));
    out.push_str("\n\nFiles:\n");

    for file in files {
        out.push_str(&format!("\n--- {} ---\n", file.path));
        out.push_str(&file.content);
        if !file.content.ends_with('\n') { out.push('\n'); }
    }
    out
}

fn language_from_extension(ext: &str) -> &'static str {
    match ext {
        "php" => "php", "json" => "json", "md" | "markdown" => "markdown",
        "txt" => "text", "html" | "htm" => "html", "css" => "css", "js" => "javascript",
        "ts" => "typescript", "sh" | "bash" => "bash", "yml" | "yaml" => "yaml",
        "xml" => "xml", "sql" => "sql", "env" => "dotenv", "ini" => "ini",
        _ => "",
    }
}
