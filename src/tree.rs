//! Hierarchical view of the registry for tree presentation.
//!
//! [`TreeBuilder::build`] turns the flat `oid -> name` registry into three
//! branches:
//!
//! - `standard management`: everything below `mgmt` (`1.3.6.1.2`)
//! - `vendor/private`: everything below `enterprises` (`1.3.6.1.4.1`)
//! - `custom tables`: locally authored table definitions supplied by the caller
//!
//! The tree is recomputed from scratch on every call and owns its data; it is
//! never kept in sync with the registry. Children at every level are sorted by
//! display name so the result does not depend on registry iteration order.
//!
//! # Example
//!
//! ```rust
//! use snmp_mibmap::{NodeKind, OidRegistry, TreeBuilder};
//!
//! let mut registry = OidRegistry::new();
//! registry.register("1.3.6.1.4.1.9999", "acme");
//!
//! let tree = TreeBuilder::new().build(&registry);
//! let acme = tree.find("acme").unwrap();
//! assert_eq!(acme.kind, NodeKind::Scalar);
//! assert_eq!(acme.oid.as_deref(), Some("1.3.6.1.4.1.9999"));
//! ```

use std::collections::HashMap;

use crate::oid;
use crate::registry::OidRegistry;

/// Display name of the tree root.
pub const ROOT_NAME: &str = "MIB";
/// Branch holding everything below `mgmt`.
pub const MANAGEMENT_BRANCH: &str = "standard management";
/// Branch holding everything below `enterprises`.
pub const PRIVATE_BRANCH: &str = "vendor/private";
/// Branch holding caller-supplied table definitions.
pub const CUSTOM_TABLES_BRANCH: &str = "custom tables";

/// Node kind for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NodeKind {
    /// Grouping node.
    Folder,
    /// Named OID from the registry.
    Scalar,
    /// Conceptual table.
    Table,
    /// Locally authored table definition.
    CustomTable,
}

/// A node in the presentation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TreeNode {
    /// Display name: a registered name, or the raw arc for unnamed nodes.
    pub name: String,
    /// Full dotted OID, if the node corresponds to one.
    pub oid: Option<String>,
    pub kind: NodeKind,
    /// Children, sorted by display name.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn new(name: impl Into<String>, oid: Option<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            oid,
            kind,
            children: Vec::new(),
        }
    }

    /// Create an empty folder.
    pub fn folder(name: impl Into<String>, oid: Option<String>) -> Self {
        Self::new(name, oid, NodeKind::Folder)
    }

    /// Create a scalar leaf.
    pub fn scalar(name: impl Into<String>, oid: impl Into<String>) -> Self {
        Self::new(name, Some(oid.into()), NodeKind::Scalar)
    }

    /// Create a table node.
    pub fn table(name: impl Into<String>, oid: impl Into<String>) -> Self {
        Self::new(name, Some(oid.into()), NodeKind::Table)
    }

    /// Create a custom table node, optionally without an OID.
    pub fn custom_table(name: impl Into<String>, oid: Option<String>) -> Self {
        Self::new(name, oid, NodeKind::CustomTable)
    }

    /// Append a child and return self.
    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Check if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree, including self.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Direct child by display name.
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Depth-first search for a node by display name.
    pub fn find(&self, name: &str) -> Option<&TreeNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    /// Depth-first search for a node by OID.
    pub fn find_oid(&self, oid: &str) -> Option<&TreeNode> {
        if self.oid.as_deref() == Some(oid) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_oid(oid))
    }

    fn sort_recursive(&mut self) {
        self.children.sort_by(|a, b| a.name.cmp(&b.name));
        for child in &mut self.children {
            child.sort_recursive();
        }
    }
}

/// Builds the three-branch presentation tree from a registry.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    custom_tables: Vec<TreeNode>,
}

impl TreeBuilder {
    /// Create a builder with an empty custom tables branch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach nodes under the custom tables branch.
    pub fn with_custom_tables(mut self, tables: impl IntoIterator<Item = TreeNode>) -> Self {
        self.custom_tables.extend(tables);
        self
    }

    /// Build the tree from the registry's current contents.
    pub fn build(&self, registry: &OidRegistry) -> TreeNode {
        let mut arena = Arena::default();
        let management = arena.root(MANAGEMENT_BRANCH, Some(oid::MGMT));
        let private = arena.root(PRIVATE_BRANCH, Some(oid::ENTERPRISES));

        let mut skipped = 0usize;
        for (full_oid, name) in registry.iter() {
            let (root, prefix) = if oid::is_prefix_of(oid::ENTERPRISES, full_oid) {
                (private, oid::ENTERPRISES)
            } else if oid::is_prefix_of(oid::MGMT, full_oid) {
                (management, oid::MGMT)
            } else {
                continue;
            };

            let Some(relative) = oid::relative_to(full_oid, prefix) else {
                continue;
            };
            if oid::parse_arcs(relative).is_err() {
                skipped += 1;
                continue;
            }

            arena.insert_path(root, prefix, relative, name);
        }

        if skipped > 0 {
            tracing::debug!(mib.skipped = skipped, "skipped non-numeric OIDs in tree");
        }

        let mut custom = TreeNode::folder(CUSTOM_TABLES_BRANCH, None);
        custom.children = self.custom_tables.clone();

        let mut root = TreeNode::folder(ROOT_NAME, None)
            .with_child(arena.detach(management))
            .with_child(arena.detach(private))
            .with_child(custom);
        root.sort_recursive();
        root
    }
}

/// Build the presentation tree with an empty custom tables branch.
pub fn build_tree(registry: &OidRegistry) -> TreeNode {
    TreeBuilder::new().build(registry)
}

/// Flat node storage keyed by full OID while the tree is assembled.
#[derive(Default)]
struct Arena {
    nodes: Vec<ArenaNode>,
    by_oid: HashMap<String, usize>,
}

struct ArenaNode {
    node: TreeNode,
    children: Vec<usize>,
}

impl Arena {
    fn push(&mut self, node: TreeNode) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(ArenaNode {
            node,
            children: Vec::new(),
        });
        idx
    }

    fn root(&mut self, name: &str, oid: Option<&str>) -> usize {
        self.push(TreeNode::folder(name, oid.map(str::to_string)))
    }

    /// Walk `relative` arcs below `root`, creating folders as needed, and label
    /// the terminal node with `name`.
    fn insert_path(&mut self, root: usize, prefix: &str, relative: &str, name: &str) {
        let mut current = root;
        let mut path = prefix.to_string();

        for arc in relative.split('.') {
            path.push('.');
            path.push_str(arc);

            current = match self.by_oid.get(&path) {
                Some(&idx) => idx,
                None => {
                    let idx = self.push(TreeNode::folder(arc, Some(path.clone())));
                    self.by_oid.insert(path.clone(), idx);
                    self.nodes[current].children.push(idx);
                    idx
                }
            };
        }

        let terminal = &mut self.nodes[current];
        terminal.node.name = name.to_string();
        terminal.node.kind = NodeKind::Scalar;
    }

    /// Detach the subtree rooted at `idx` into an owned node.
    fn detach(&mut self, idx: usize) -> TreeNode {
        let child_ids = std::mem::take(&mut self.nodes[idx].children);
        let children: Vec<TreeNode> = child_ids.into_iter().map(|c| self.detach(c)).collect();

        let mut node = std::mem::replace(&mut self.nodes[idx].node, TreeNode::folder("", None));
        node.children = children;
        node
    }
}
