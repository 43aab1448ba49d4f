//! # ci4forge
//!
//! `ci4forge` turns the text a code generator returns for a CodeIgniter 4
//! project into a list of files and a browsable folder/file tree.
//!
//! Generated text is one blob in which every file is introduced by a marker
//! line such as `// File: app/Controllers/Home.php` or
//! `/* File: app/Config/Routes.php */`. [`parse_application_code`] splits the
//! blob into [`FileRecord`]s and [`build_file_tree`] arranges them into
//! [`TreeNode`]s, folders first. A [`Session`] keeps the files of an iterative
//! re-prompting workflow together with an undo/redo history.
//!
//! # Features
//!
//! - `parallel`: Sorts subtrees and reads packed directories in parallel using Rayon.
//! - `logging`: Enables debug logging via the `tracing` crate.
//!
//! # Example
//!
//! ```
//! use ci4forge::{build_file_tree, parse_application_code, render_tree};
//!
//! let blob = "// File: app/Controllers/Home.php\n<?php echo 'hi';\n\
//!             /* File: .env */\nCI_ENVIRONMENT = development\n";
//! let files = parse_application_code(blob);
//! assert_eq!(files.len(), 2);
//!
//! let tree = build_file_tree(&files);
//! println!("{}", render_tree(&tree));
//! ```

mod engine;
mod error;
mod options;
pub mod output;
mod parser;
mod session;
mod tree;
mod types;

pub use engine::{load_blob, pack_directory, read_blob};
pub use error::{ForgeError, SessionError};
pub use options::{
    BinaryDetection, DEFAULT_FALLBACK_PATH, DuplicatePolicy, ForgeBuilder, ForgeOptions,
};
pub use parser::{
    MarkerScanner, format_application_code, parse_application_code, parse_application_code_with,
};
pub use session::{Action, NEW_FILE_PATH, STARTER_CODE, Session, Snapshot};
pub use tree::{
    ROOT_ID, build_file_tree, build_file_tree_with, count_nodes, default_selection, find_node,
    flatten_tree, render_tree,
};
pub use types::{FileRecord, GenerationOutput, NodeKind, TreeNode, TreeStats};
