//! Builds the virtual folder/file tree from a flat list of records, and a few
//! read-only helpers over the result.

use crate::options::{DuplicatePolicy, ForgeOptions};
use crate::types::{FileRecord, NodeKind, TreeNode, TreeStats};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "logging")]
use tracing;

/// Id of the synthetic root folder. Every node id starts with it.
pub const ROOT_ID: &str = "root";

/// Builds the tree for `files` with default options.
///
/// The synthetic root is not returned; callers get its children, sorted with
/// folders before files and then by name, at every level.
pub fn build_file_tree(files: &[FileRecord]) -> Vec<TreeNode> {
    build_file_tree_with(files, &ForgeOptions::default())
}

/// Builds the tree for `files`, honoring `duplicate_policy` and `trim_slashes`.
///
/// Never fails. A record whose path would turn an existing file into a folder
/// (or the reverse) is dropped: the first interpretation seen wins.
pub fn build_file_tree_with(files: &[FileRecord], options: &ForgeOptions) -> Vec<TreeNode> {
    let mut root = Vec::new();
    for file in files {
        insert_record(&mut root, file, options);
    }
    sort_nodes(&mut root);
    #[cfg(feature = "logging")]
    tracing::debug!("Built tree with {} root entries from {} records", root.len(), files.len());
    root
}

fn insert_record(root: &mut Vec<TreeNode>, file: &FileRecord, options: &ForgeOptions) {
    let path = if options.trim_slashes {
        file.path.trim_matches('/')
    } else {
        file.path.as_str()
    };
    let parts: Vec<&str> = path.split('/').collect();
    let last = parts.len() - 1;
    let mut level = root;
    let mut current_path = String::new();
    let mut id = String::from(ROOT_ID);
    for (index, part) in parts.iter().enumerate() {
        if index > 0 {
            current_path.push('/');
        }
        current_path.push_str(part);
        id.push('/');
        id.push_str(part);
        let is_last = index == last;
        let kind = if is_last {
            NodeKind::File
        } else {
            NodeKind::Folder
        };
        let position = match level.iter().position(|node| node.name == *part) {
            Some(pos) if level[pos].kind != kind => {
                #[cfg(feature = "logging")]
                tracing::debug!(
                    "Dropping {}: '{}' already exists as a {:?}",
                    file.path,
                    current_path,
                    level[pos].kind
                );
                return;
            }
            Some(pos) => {
                if is_last && options.duplicate_policy == DuplicatePolicy::LastWins {
                    level[pos].content = Some(file.content.clone());
                }
                pos
            }
            None => {
                level.push(new_node(&id, part, &current_path, kind, &file.content));
                level.len() - 1
            }
        };
        if is_last {
            return;
        }
        level = level[position].children.get_or_insert_with(Vec::new);
    }
}

fn new_node(id: &str, name: &str, path: &str, kind: NodeKind, content: &str) -> TreeNode {
    let (content, children) = match kind {
        NodeKind::File => (Some(content.to_string()), None),
        NodeKind::Folder => (None, Some(Vec::new())),
    };
    TreeNode {
        id: id.to_string(),
        name: name.to_string(),
        path: path.to_string(),
        kind,
        content,
        children,
    }
}

fn sort_nodes(nodes: &mut [TreeNode]) {
    nodes.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));
    #[cfg(feature = "parallel")]
    nodes.par_iter_mut().for_each(|node| {
        if let Some(children) = node.children.as_mut() {
            sort_nodes(children);
        }
    });
    #[cfg(not(feature = "parallel"))]
    for node in nodes.iter_mut() {
        if let Some(children) = node.children.as_mut() {
            sort_nodes(children);
        }
    }
}

/// Collects every file of the tree back into records, in display order.
pub fn flatten_tree(nodes: &[TreeNode]) -> Vec<FileRecord> {
    let mut out = Vec::new();
    collect_files(nodes, &mut out);
    out
}

fn collect_files(nodes: &[TreeNode], out: &mut Vec<FileRecord>) {
    for node in nodes {
        match node.kind {
            NodeKind::Folder => collect_files(node.children(), out),
            NodeKind::File => out.extend(node.to_record()),
        }
    }
}

/// Looks up a node by its full path.
pub fn find_node<'a>(nodes: &'a [TreeNode], path: &str) -> Option<&'a TreeNode> {
    let mut level = nodes;
    let mut found = None;
    for part in path.split('/') {
        let node = level.iter().find(|node| node.name == part)?;
        level = node.children();
        found = Some(node);
    }
    found
}

/// The file a viewer should open right after a tree is built: the first root
/// entry if it is a non-empty file, otherwise the first child of the first
/// root folder if that is a non-empty file.
pub fn default_selection(nodes: &[TreeNode]) -> Option<FileRecord> {
    let first = nodes.first()?;
    let candidate = match first.kind {
        NodeKind::File => first,
        NodeKind::Folder => first.children().first()?,
    };
    match &candidate.content {
        Some(content) if candidate.is_file() && !content.is_empty() => {
            Some(FileRecord::new(&candidate.path, content))
        }
        _ => None,
    }
}

pub fn count_nodes(nodes: &[TreeNode]) -> TreeStats {
    let mut stats = TreeStats::default();
    for node in nodes {
        match node.kind {
            NodeKind::Folder => {
                stats.folders += 1;
                let inner = count_nodes(node.children());
                stats.folders += inner.folders;
                stats.files += inner.files;
            }
            NodeKind::File => stats.files += 1,
        }
    }
    stats
}

/// Renders the tree the way the `tree` command does, starting with a `.` line.
pub fn render_tree(nodes: &[TreeNode]) -> String {
    let mut lines = vec![".".to_string()];
    render_level(nodes, "", &mut lines);
    lines.join("\n")
}

fn render_level(nodes: &[TreeNode], prefix: &str, lines: &mut Vec<String>) {
    for (index, node) in nodes.iter().enumerate() {
        let is_last = index + 1 == nodes.len();
        let (branch, indent) = if is_last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        let suffix = if node.is_folder() { "/" } else { "" };
        lines.push(format!("{}{}{}{}", prefix, branch, node.name, suffix));
        if node.is_folder() {
            render_level(node.children(), &format!("{}{}", prefix, indent), lines);
        }
    }
}
