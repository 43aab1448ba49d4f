//! Undoable generate/configure session.
//!
//! A [`Session`] is a plain value. [`Session::apply`] takes an [`Action`] and
//! returns the next session, leaving the current one untouched, so any
//! earlier value can be kept around and compared. Undo and redo move a cursor
//! over an append-only list of [`Snapshot`]s; recording a new snapshot after an
//! undo discards the redo tail.

use crate::error::{ForgeError, SessionError};
use crate::options::ForgeOptions;
use crate::tree::{build_file_tree_with, default_selection};
use crate::types::{FileRecord, GenerationOutput, TreeNode};
use serde::{Deserialize, Serialize};
#[cfg(feature = "logging")]
use tracing;

/// Path given to the first file when configuring an empty session.
pub const NEW_FILE_PATH: &str = "new_file.php";

/// Code handed to the generator when configuring an empty session.
pub const STARTER_CODE: &str = "<?php\n// Start your CodeIgniter 4 code here\n";

/// One entry of the history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub files: Vec<FileRecord>,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_path: Option<String>,
}

/// A state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Replace every file with a fresh generation result.
    Generate {
        prompt: String,
        output: GenerationOutput,
    },
    /// Replace the selected file's content with re-prompted code.
    Configure {
        prompt: String,
        updated_code: String,
        #[serde(default)]
        next_prompt: Option<String>,
    },
    SelectFile {
        path: String,
    },
    /// Create an empty PHP file and select it.
    AddFile {
        path: String,
    },
    Undo,
    Redo,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Generate { .. } => "generate",
            Action::Configure { .. } => "configure",
            Action::SelectFile { .. } => "select_file",
            Action::AddFile { .. } => "add_file",
            Action::Undo => "undo",
            Action::Redo => "redo",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "SessionState")]
pub struct Session {
    files: Vec<FileRecord>,
    selected_path: Option<String>,
    prompt: String,
    next_suggestion: Option<String>,
    history: Vec<Snapshot>,
    history_index: Option<usize>,
    #[serde(skip)]
    options: ForgeOptions,
}

/// Wire form of a [`Session`], checked before it becomes one.
#[derive(Deserialize)]
struct SessionState {
    #[serde(default)]
    files: Vec<FileRecord>,
    #[serde(default)]
    selected_path: Option<String>,
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    next_suggestion: Option<String>,
    #[serde(default)]
    history: Vec<Snapshot>,
    #[serde(default)]
    history_index: Option<usize>,
}

impl TryFrom<SessionState> for Session {
    type Error = SessionError;

    fn try_from(state: SessionState) -> Result<Self, Self::Error> {
        let cursor_ok = match state.history_index {
            Some(index) => index < state.history.len(),
            None => state.history.is_empty(),
        };
        if !cursor_ok {
            return Err(SessionError::InvalidHistory {
                index: state.history_index,
                len: state.history.len(),
            });
        }
        Ok(Session {
            files: state.files,
            selected_path: state.selected_path,
            prompt: state.prompt,
            next_suggestion: state.next_suggestion,
            history: state.history,
            history_index: state.history_index,
            options: ForgeOptions::default(),
        })
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session whose generation results are parsed and filtered with `options`.
    pub fn with_options(options: ForgeOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Replaces the options of a session, e.g. one restored from JSON, which
    /// always comes back with defaults.
    pub fn set_options(mut self, options: ForgeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn selected_path(&self) -> Option<&str> {
        self.selected_path.as_deref()
    }

    pub fn selected(&self) -> Option<&FileRecord> {
        let path = self.selected_path.as_deref()?;
        self.files.iter().find(|f| f.path == path)
    }

    /// The prompt pending in the input box: the last one used, or the
    /// generator's suggestion for the next step.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn next_suggestion(&self) -> Option<&str> {
        self.next_suggestion.as_deref()
    }

    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    pub fn history_index(&self) -> Option<usize> {
        self.history_index
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.history_index, Some(i) if i > 0)
    }

    pub fn can_redo(&self) -> bool {
        match self.history_index {
            Some(i) => i + 1 < self.history.len(),
            None => false,
        }
    }

    /// Rebuilds the tree for the current files.
    pub fn tree(&self) -> Vec<TreeNode> {
        build_file_tree_with(&self.files, &self.options)
    }

    /// Code to send along with a configure prompt.
    pub fn prior_code(&self) -> &str {
        match self.selected() {
            Some(file) => &file.content,
            None if self.files.is_empty() => STARTER_CODE,
            None => "",
        }
    }

    /// Applies `action` and returns the resulting session.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Session`] when the transition is not allowed, and
    /// [`ForgeError::InvalidPattern`] when a generation result cannot be filtered.
    pub fn apply(&self, action: Action) -> Result<Session, ForgeError> {
        #[cfg(feature = "logging")]
        tracing::debug!("Applying {}", action.name());
        match action {
            Action::Generate { prompt, output } => self.generate(prompt, output),
            Action::Configure {
                prompt,
                updated_code,
                next_prompt,
            } => Ok(self.configure(prompt, updated_code, next_prompt)?),
            Action::SelectFile { path } => Ok(self.select_file(path)?),
            Action::AddFile { path } => Ok(self.add_file(&path)?),
            Action::Undo => {
                let index = self
                    .history_index
                    .filter(|&i| i > 0)
                    .ok_or(SessionError::NothingToUndo)?;
                Ok(self.restore(index - 1))
            }
            Action::Redo => {
                let index = self
                    .history_index
                    .filter(|&i| i + 1 < self.history.len())
                    .ok_or(SessionError::NothingToRedo)?;
                Ok(self.restore(index + 1))
            }
        }
    }

    /// Applies every action in order, stopping at the first error.
    pub fn apply_all<I>(&self, actions: I) -> Result<Session, ForgeError>
    where
        I: IntoIterator<Item = Action>,
    {
        actions
            .into_iter()
            .try_fold(self.clone(), |session, action| session.apply(action))
    }

    fn generate(&self, prompt: String, output: GenerationOutput) -> Result<Session, ForgeError> {
        if prompt.trim().is_empty() {
            return Err(SessionError::EmptyPrompt.into());
        }
        let files = output.into_records(&self.options)?;
        let tree = build_file_tree_with(&files, &self.options);
        let selected = default_selection(&tree).map(|f| f.path);
        Ok(self.record(files, prompt, None, selected))
    }

    fn configure(
        &self,
        prompt: String,
        updated_code: String,
        next_prompt: Option<String>,
    ) -> Result<Session, SessionError> {
        if prompt.trim().is_empty() {
            return Err(SessionError::EmptyPrompt);
        }
        let next_prompt = next_prompt.filter(|p| !p.trim().is_empty());
        match self.selected() {
            Some(selected) => {
                let path = selected.path.clone();
                let files = self
                    .files
                    .iter()
                    .map(|f| {
                        if f.path == path {
                            FileRecord::new(&f.path, updated_code.as_str())
                        } else {
                            f.clone()
                        }
                    })
                    .collect();
                Ok(self.record(files, prompt, next_prompt, Some(path)))
            }
            None if self.files.is_empty() => {
                let files = vec![FileRecord::new(NEW_FILE_PATH, updated_code)];
                Ok(self.record(files, prompt, next_prompt, Some(NEW_FILE_PATH.to_string())))
            }
            None => Err(SessionError::NoSelection),
        }
    }

    fn select_file(&self, path: String) -> Result<Session, SessionError> {
        if !self.files.iter().any(|f| f.path == path) {
            return Err(SessionError::UnknownFile(path));
        }
        Ok(Session {
            selected_path: Some(path),
            prompt: String::new(),
            next_suggestion: None,
            ..self.clone()
        })
    }

    fn add_file(&self, path: &str) -> Result<Session, SessionError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(SessionError::EmptyFileName);
        }
        if self.files.iter().any(|f| f.path == path) {
            return Err(SessionError::FileExists(path.to_string()));
        }
        let mut files = self.files.clone();
        files.push(FileRecord::new(path, format!("<?php\n\n// {}\n", path)));
        Ok(self.record(
            files,
            format!("Added new file: {}", path),
            None,
            Some(path.to_string()),
        ))
    }

    /// Produces the next session from new files and pushes a snapshot of it,
    /// dropping any redo tail.
    fn record(
        &self,
        files: Vec<FileRecord>,
        prompt: String,
        next_suggestion: Option<String>,
        selected_path: Option<String>,
    ) -> Session {
        let selected_path = selected_path.filter(|path| files.iter().any(|f| &f.path == path));
        let keep = self.history_index.map_or(0, |i| i + 1);
        let mut history = self.history[..keep].to_vec();
        history.push(Snapshot {
            files: files.clone(),
            prompt: prompt.clone(),
            next_suggestion: next_suggestion.clone(),
            selected_path: selected_path.clone(),
        });
        let history_index = Some(history.len() - 1);
        Session {
            files,
            selected_path,
            // A suggestion becomes the next pending prompt.
            prompt: next_suggestion.clone().unwrap_or(prompt),
            next_suggestion,
            history,
            history_index,
            options: self.options.clone(),
        }
    }

    fn restore(&self, index: usize) -> Session {
        let snapshot = &self.history[index];
        let selected_path = snapshot
            .selected_path
            .clone()
            .filter(|path| snapshot.files.iter().any(|f| &f.path == path));
        Session {
            files: snapshot.files.clone(),
            selected_path,
            prompt: snapshot
                .next_suggestion
                .clone()
                .unwrap_or_else(|| snapshot.prompt.clone()),
            next_suggestion: snapshot.next_suggestion.clone(),
            history: self.history.clone(),
            history_index: Some(index),
            options: self.options.clone(),
        }
    }
}
