//! Node classifier
//!
//! Walks the live navigation tree once per render and builds the arena the
//! resolver works on. It annotates the document (folder marker, stored path,
//! toggle control) but never opens anything.

use crate::document::{Marker, NavDocument};
use crate::models::{ClassifiedTree, NavNode, NodeId};
use tracing::trace;

/// Classify the document's navigation tree.
///
/// Returns `None` when the navigation root is not rendered. A path already
/// stored on an item is kept as is; otherwise the link target becomes the
/// path and is stored back, so reclassifying never changes a path.
pub fn classify<D: NavDocument>(doc: &mut D) -> Option<ClassifiedTree<D::Item>> {
    let roots = doc.root_items()?;
    let mut tree = ClassifiedTree::new();

    // Pre-order walk so arena order matches document order.
    let mut stack: Vec<(D::Item, Option<NodeId>, u32)> =
        roots.into_iter().rev().map(|item| (item, None, 0)).collect();

    while let Some((item, parent, depth)) = stack.pop() {
        let children = doc.child_items(&item);
        let is_folder = !children.is_empty();
        let path = assign_path(doc, &item);

        doc.set_marker(&item, Marker::Folder, is_folder);
        if is_folder {
            doc.ensure_toggle(&item);
        } else {
            doc.remove_toggle(&item);
        }

        let node = NavNode {
            path,
            is_folder,
            depth,
            is_open: false,
            is_active: doc.is_active(&item),
            parent,
            children: Vec::new(),
        };
        trace!(path = ?node.path, depth, is_folder, "Classified nav item");
        let id = tree.push(node, item);

        stack.extend(children.into_iter().rev().map(|child| (child, Some(id), depth + 1)));
    }

    Some(tree)
}

fn assign_path<D: NavDocument>(doc: &mut D, item: &D::Item) -> Option<String> {
    if let Some(path) = doc.stored_path(item) {
        return Some(path);
    }
    let path = doc.link_target(item)?;
    doc.store_path(item, &path);
    Some(path)
}
