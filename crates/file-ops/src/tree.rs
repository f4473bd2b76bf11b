//! Capped relative-path listing and the arena tree built from it.

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::path::Path;

use serde::Serialize;

use crate::walk::{WalkOptions, to_slash, walk};

/// Maximum number of entries returned by [`list_tree_paths`].
pub const MAX_TREE_ENTRIES: usize = 800;

/// Lists descendants of `dir` as `/`-separated relative paths.
///
/// Files and directories are both included, dot-prefixed entries are not.
/// Symbolic links are listed but never followed. The walk stops once
/// [`MAX_TREE_ENTRIES`] paths are collected; which entries make the cut is
/// purely traversal order.
pub fn list_tree_paths(dir: &Path) -> Vec<String> {
    let mut paths = Vec::new();

    let errors = walk(dir, WalkOptions { skip_hidden: true }, |rel, _| {
        paths.push(to_slash(rel));
        if paths.len() >= MAX_TREE_ENTRIES {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    if errors > 0 {
        tracing::debug!(dir = %dir.display(), errors, "tree listing skipped entries");
    }

    paths
}

/// Node type in a [`FileTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Dir,
    File,
}

/// A single arena slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub name: String,
    pub kind: NodeKind,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// Directory tree stored as a flat arena; index [`FileTree::ROOT`] is an
/// unnamed root directory.
#[derive(Debug, Clone, Serialize)]
pub struct FileTree {
    nodes: Vec<TreeNode>,
}

impl FileTree {
    pub const ROOT: usize = 0;

    /// Builds the tree in one pass over a flattened path list.
    ///
    /// Both `/` and `\` separate components. A name first seen as a leaf and
    /// later as an intermediate component becomes a directory.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut nodes = vec![TreeNode {
            name: String::new(),
            kind: NodeKind::Dir,
            parent: None,
            children: Vec::new(),
        }];
        let mut lookup: HashMap<(usize, String), usize> = HashMap::new();

        for path in paths {
            let parts: Vec<&str> = path
                .as_ref()
                .split(['/', '\\'])
                .filter(|p| !p.is_empty())
                .collect();

            let mut current = Self::ROOT;
            for (i, part) in parts.iter().enumerate() {
                let is_dir = i + 1 < parts.len();
                let key = (current, (*part).to_string());

                current = match lookup.get(&key) {
                    Some(&idx) => {
                        if is_dir {
                            nodes[idx].kind = NodeKind::Dir;
                        }
                        idx
                    }
                    None => {
                        let idx = nodes.len();
                        nodes.push(TreeNode {
                            name: key.1.clone(),
                            kind: if is_dir { NodeKind::Dir } else { NodeKind::File },
                            parent: Some(current),
                            children: Vec::new(),
                        });
                        nodes[current].children.push(idx);
                        lookup.insert(key, idx);
                        idx
                    }
                };
            }
        }

        Self { nodes }
    }

    /// Builds the tree straight from a directory listing.
    pub fn from_dir(dir: &Path) -> Self {
        Self::from_paths(list_tree_paths(dir))
    }

    pub fn node(&self, idx: usize) -> &TreeNode {
        &self.nodes[idx]
    }

    /// Number of nodes, not counting the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Children of `idx`, directories first, then by name.
    pub fn sorted_children(&self, idx: usize) -> Vec<usize> {
        let mut children = self.nodes[idx].children.clone();
        children.sort_by(|&a, &b| {
            let (a, b) = (&self.nodes[a], &self.nodes[b]);
            a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name))
        });
        children
    }

    /// Renders the tree as indented lines, directories suffixed with `/`.
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.len());
        self.render_into(Self::ROOT, 0, &mut lines);
        lines
    }

    fn render_into(&self, idx: usize, depth: usize, out: &mut Vec<String>) {
        for child in self.sorted_children(idx) {
            let node = &self.nodes[child];
            let suffix = if node.kind == NodeKind::Dir { "/" } else { "" };
            out.push(format!("{}{}{suffix}", "  ".repeat(depth), node.name));
            self.render_into(child, depth + 1, out);
        }
    }
}
