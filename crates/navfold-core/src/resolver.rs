//! Expansion resolver
//!
//! Computes which folders render open this cycle. Three independent rules
//! are merged by union, so no rule can close what another opened:
//!
//! 1. persisted: folders whose path was saved as open this session
//! 2. active ancestry: every folder above the active entry
//! 3. depth: folders with `depth < open_level`

use crate::models::{ClassifiedTree, CollapseConfig, NodeId};
use crate::store::LoadedOpenPaths;
use std::collections::BTreeSet;
use tracing::debug;

/// Outcome of one resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Folders that must render open
    pub open: BTreeSet<NodeId>,

    /// Paths of the active entry's ancestor folders, nearest first, to be
    /// written back to the session when persisting
    pub revealed: Vec<String>,
}

impl Resolution {
    pub fn is_open(&self, id: NodeId) -> bool {
        self.open.contains(&id)
    }

    /// Paths of the open folders; folders without a path are left out
    pub fn open_paths<I>(&self, tree: &ClassifiedTree<I>) -> BTreeSet<String> {
        self.open
            .iter()
            .filter_map(|id| tree.node(*id).path.clone())
            .collect()
    }
}

/// Resolve the open set for `tree`
pub fn resolve<I>(
    tree: &ClassifiedTree<I>,
    config: &CollapseConfig,
    loaded: &LoadedOpenPaths,
) -> Resolution {
    let mut resolution = Resolution::default();

    let persisted = open_persisted(tree, loaded, &mut resolution.open);
    let (ancestry, revealed) = open_active_ancestry(tree, &mut resolution.open);
    let by_depth = open_by_depth(tree, config.open_level, &mut resolution.open);

    if config.persist {
        resolution.revealed = revealed;
    }

    debug!(
        persisted,
        ancestry,
        by_depth,
        open = resolution.open.len(),
        "Resolved open folders"
    );
    resolution
}

fn open_persisted<I>(
    tree: &ClassifiedTree<I>,
    loaded: &LoadedOpenPaths,
    open: &mut BTreeSet<NodeId>,
) -> usize {
    if loaded.is_empty() {
        return 0;
    }
    let mut count = 0;
    for (id, node) in tree.folders() {
        let saved_open = node
            .path
            .as_ref()
            .and_then(|p| loaded.get(p))
            .copied()
            .unwrap_or(false);
        if saved_open {
            open.insert(id);
            count += 1;
        }
    }
    count
}

fn open_active_ancestry<I>(
    tree: &ClassifiedTree<I>,
    open: &mut BTreeSet<NodeId>,
) -> (usize, Vec<String>) {
    let Some(active) = tree.active() else {
        return (0, Vec::new());
    };
    let mut count = 0;
    let mut revealed = Vec::new();
    // Every strict ancestor has the active entry below it, so each one is a folder.
    for id in tree.ancestors(active) {
        open.insert(id);
        count += 1;
        if let Some(path) = &tree.node(id).path {
            revealed.push(path.clone());
        }
    }
    (count, revealed)
}

fn open_by_depth<I>(
    tree: &ClassifiedTree<I>,
    open_level: u32,
    open: &mut BTreeSet<NodeId>,
) -> usize {
    if open_level == 0 {
        return 0;
    }
    let mut count = 0;
    for (id, node) in tree.folders() {
        if node.depth < open_level {
            open.insert(id);
            count += 1;
        }
    }
    count
}
