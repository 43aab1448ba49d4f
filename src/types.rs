use crate::error::ForgeError;
use crate::options::ForgeOptions;
use crate::parser::parse_application_code_with;
use serde::{Deserialize, Serialize};

/// One logical generated file: a forward-slash path and its text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the project root, segments separated by `/`.
    pub path: String,
    /// The file's full text.
    pub content: String,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Node kind. Declaration order is the sibling display order: folders sort before files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    File,
}

/// A folder or file in the synthesized project view.
///
/// `content` is only ever set on files and `children` only on folders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// `root` joined with every path segment, e.g. `root/app/Controllers`.
    pub id: String,
    /// The last path segment.
    pub name: String,
    /// Full path from the root, segments joined by `/`.
    pub path: String,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Children of a folder; empty for files.
    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Converts a file node back into the record it was built from.
    pub fn to_record(&self) -> Option<FileRecord> {
        match (&self.kind, &self.content) {
            (NodeKind::File, Some(content)) => Some(FileRecord::new(&self.path, content)),
            _ => None,
        }
    }
}

/// What a generation request hands back: either one marker-delimited blob,
/// or files that are already structured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationOutput {
    Blob(String),
    Files(Vec<FileRecord>),
}

impl GenerationOutput {
    /// Normalizes either shape into records. Blobs go through the parser; structured
    /// files are kept in order. Records matching `options.ignore_patterns` are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::InvalidPattern`] if an ignore pattern does not compile.
    pub fn into_records(self, options: &ForgeOptions) -> Result<Vec<FileRecord>, ForgeError> {
        let records = match self {
            GenerationOutput::Blob(blob) => parse_application_code_with(&blob, options),
            GenerationOutput::Files(files) => files,
        };
        Ok(match options.ignore_matcher()? {
            Some(matcher) => records
                .into_iter()
                .filter(|record| !matcher.is_match(&record.path))
                .collect(),
            None => records,
        })
    }
}

/// Folder and file counts for a built tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    pub folders: usize,
    pub files: usize,
}
