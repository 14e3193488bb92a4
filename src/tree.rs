use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    path::{Component, Path},
};

use crate::utils::display_name;

/// A node of the preview tree. Children are keyed by path segment and kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub children: BTreeMap<String, Node>,
}

impl Node {
    fn insert<'a>(&mut self, segments: impl IntoIterator<Item = &'a str>) {
        let mut node = self;
        for segment in segments {
            node = node.children.entry(segment.to_string()).or_default();
        }
    }

    fn count(&self) -> usize {
        self.children.values().map(|c| 1 + c.count()).sum()
    }
}

/// Display-only tree of a set of directories, anchored at a common parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTree {
    pub label: String,
    pub root: Node,
}

impl PathTree {
    /// Inserts every path below `anchor`. Paths outside of it are skipped.
    pub fn new<'a>(anchor: &Path, paths: impl IntoIterator<Item = &'a Path>) -> Self {
        let mut root = Node::default();
        for path in paths {
            let Ok(relative) = path.strip_prefix(anchor) else {
                continue;
            };
            root.insert(relative.components().filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            }));
        }

        Self {
            label: display_name(anchor),
            root,
        }
    }

    /// Number of nodes below the anchor.
    pub fn len(&self) -> usize {
        self.root.count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }
}

impl Display for PathTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.label)?;
        write_children(f, &self.root, "")
    }
}

fn write_children(f: &mut fmt::Formatter<'_>, node: &Node, prefix: &str) -> fmt::Result {
    let last_idx = node.children.len().saturating_sub(1);
    for (idx, (name, child)) in node.children.iter().enumerate() {
        let (branch, indent) = if idx == last_idx {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        writeln!(f, "{prefix}{branch}{name}")?;
        write_children(f, child, &format!("{prefix}{indent}"))?;
    }
    Ok(())
}
