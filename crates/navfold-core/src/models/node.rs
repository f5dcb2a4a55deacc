//! Classified navigation tree
//!
//! Allocated fresh on every render cycle. Only path-keyed state survives a
//! rebuild, never the node records themselves.

use std::collections::HashMap;

/// Index of a node inside its [`ClassifiedTree`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// A classified navigation entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavNode {
    /// Stable identifier derived from the link target; `None` when the entry
    /// has no link, which keeps it out of persistence keying
    pub path: Option<String>,

    /// True iff `children` is non-empty
    pub is_folder: bool,

    /// Number of enclosing groups between this node and the root (root children are 0)
    pub depth: u32,

    /// Rendered state; closed baseline until the reconciler applies a resolution
    pub is_open: bool,

    /// Entry for the currently displayed page
    pub is_active: bool,

    pub parent: Option<NodeId>,

    pub children: Vec<NodeId>,
}

/// Arena of classified nodes with the live host handle of each one
#[derive(Debug, Clone)]
pub struct ClassifiedTree<I> {
    nodes: Vec<NavNode>,
    items: Vec<I>,
    roots: Vec<NodeId>,
    by_path: HashMap<String, NodeId>,
    active: Option<NodeId>,
}

impl<I> Default for ClassifiedTree<I> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            items: Vec::new(),
            roots: Vec::new(),
            by_path: HashMap::new(),
            active: None,
        }
    }
}

impl<I> ClassifiedTree<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node, wiring it under `node.parent` when set.
    ///
    /// The first node pushed with a given path owns the path index, and the
    /// first active node becomes the tree's active node.
    pub fn push(&mut self, node: NavNode, item: I) -> NodeId {
        let id = NodeId(self.nodes.len());

        match node.parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        if let Some(path) = &node.path {
            self.by_path.entry(path.clone()).or_insert(id);
        }
        if node.is_active && self.active.is_none() {
            self.active = Some(id);
        }

        self.nodes.push(node);
        self.items.push(item);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &NavNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NavNode {
        &mut self.nodes[id.0]
    }

    /// Live host handle the node was classified from
    pub fn item(&self, id: NodeId) -> &I {
        &self.items[id.0]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    /// O(1) lookup by path
    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    /// All node ids in document (pre-)order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &NavNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn folders(&self) -> impl Iterator<Item = (NodeId, &NavNode)> {
        self.nodes().filter(|(_, n)| n.is_folder)
    }

    /// Strict ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, I> {
        Ancestors {
            tree: self,
            next: self.node(id).parent,
        }
    }
}

/// Iterator returned by [`ClassifiedTree::ancestors`]
pub struct Ancestors<'a, I> {
    tree: &'a ClassifiedTree<I>,
    next: Option<NodeId>,
}

impl<I> Iterator for Ancestors<'_, I> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.node(id).parent;
        Some(id)
    }
}
