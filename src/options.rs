use crate::error::ForgeError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Path used when a blob carries no recognizable file markers.
pub const DEFAULT_FALLBACK_PATH: &str = "application_output.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryDetection {
    Simple,
    Accurate,
    None,
}

/// What the tree builder does when two records share a path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Keep the content of the first record seen.
    #[default]
    FirstWins,
    /// Overwrite with the content of the latest record.
    LastWins,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeOptions {
    pub root: PathBuf,
    pub respect_gitignore: bool,
    pub max_depth: Option<usize>,
    pub include_hidden: bool,
    pub follow_links: bool,
    pub ignore_patterns: Vec<String>,
    pub file_size_limit: Option<u64>,
    pub binary_detection: BinaryDetection,
    pub duplicate_policy: DuplicatePolicy,
    pub trim_slashes: bool,
    pub fallback_path: String,
}
impl Default for ForgeOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            respect_gitignore: true,
            max_depth: None,
            include_hidden: false,
            follow_links: false,
            ignore_patterns: Vec::new(),
            file_size_limit: None,
            binary_detection: BinaryDetection::Simple,
            duplicate_policy: DuplicatePolicy::FirstWins,
            trim_slashes: false,
            fallback_path: DEFAULT_FALLBACK_PATH.to_string(),
        }
    }
}
impl ForgeOptions {
    /// Compiles `ignore_patterns` into one matcher, or `None` when there are no patterns.
    pub fn ignore_matcher(&self) -> Result<Option<GlobSet>, ForgeError> {
        if self.ignore_patterns.is_empty() {
            return Ok(None);
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.ignore_patterns {
            let glob = Glob::new(pattern)
                .map_err(|e| ForgeError::InvalidPattern(format!("'{}': {}", pattern, e)))?;
            builder.add(glob);
        }
        builder
            .build()
            .map(Some)
            .map_err(|e| ForgeError::InvalidPattern(format!("failed to build glob set: {}", e)))
    }
}
#[derive(Debug, Default)]
pub struct ForgeBuilder {
    options: ForgeOptions,
}
impl ForgeBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: ForgeOptions {
                root: root.into(),
                ..Default::default()
            },
        }
    }
    /// Starts from an existing set of options, e.g. one loaded from a config file.
    pub fn from_options(options: ForgeOptions) -> Self {
        Self { options }
    }
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.options.root = root.into();
        self
    }
    pub fn respect_gitignore(mut self, yes: bool) -> Self {
        self.options.respect_gitignore = yes;
        self
    }
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = Some(depth);
        self
    }
    pub fn no_limit_depth(mut self) -> Self {
        self.options.max_depth = None;
        self
    }
    pub fn include_hidden(mut self, yes: bool) -> Self {
        self.options.include_hidden = yes;
        self
    }
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.options.follow_links = yes;
        self
    }
    pub fn ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.options.ignore_patterns = patterns;
        self
    }
    pub fn file_size_limit(mut self, limit: Option<u64>) -> Self {
        self.options.file_size_limit = limit;
        self
    }
    pub fn binary_detection(mut self, method: BinaryDetection) -> Self {
        self.options.binary_detection = method;
        self
    }
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.options.duplicate_policy = policy;
        self
    }
    pub fn trim_slashes(mut self, yes: bool) -> Self {
        self.options.trim_slashes = yes;
        self
    }
    pub fn fallback_path(mut self, path: impl Into<String>) -> Self {
        self.options.fallback_path = path.into();
        self
    }
    pub fn build(self) -> ForgeOptions {
        self.options
    }
}
