//! Interaction handler
//!
//! Reacts to activations reaching the single delegated listener. Only hits
//! on a folder's control element are handled; everything else falls through
//! to normal navigation.

use crate::document::{Marker, NavDocument};
use crate::storage::SessionStorage;
use crate::store::OpenStateStore;
use tracing::{debug, warn};

/// Result of routing one activation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// A folder flipped; the caller must suppress default navigation
    Toggled { path: Option<String>, open: bool },
    /// Not a folder control; let the host navigate
    Ignored,
}

impl Activation {
    pub fn is_handled(&self) -> bool {
        matches!(self, Activation::Toggled { .. })
    }
}

/// Toggle the folder owning `target`'s control element.
///
/// Only that single folder changes; descendants keep their own state. When
/// persisting, the open set is re-snapshotted from the live document and
/// saved wholesale.
pub fn handle_activation<D, S>(
    doc: &mut D,
    store: &mut OpenStateStore<S>,
    target: &D::Target,
) -> Activation
where
    D: NavDocument,
    S: SessionStorage,
{
    let Some(item) = doc.toggle_owner(target) else {
        return Activation::Ignored;
    };
    if !doc.has_marker(&item, Marker::Folder) {
        return Activation::Ignored;
    }

    let open = !doc.has_marker(&item, Marker::Open);
    doc.set_marker(&item, Marker::Open, open);
    let path = doc.stored_path(&item);
    debug!(?path, open, "Toggled folder");

    if store.persist() {
        let snapshot = snapshot_open_paths(doc);
        if let Err(e) = store.save(snapshot.iter().map(String::as_str)) {
            warn!(error = %e, kind = e.kind(), "Failed to persist open state");
        }
    }

    Activation::Toggled { path, open }
}

/// Paths of every folder currently rendered open, in document order.
///
/// Reads the live markers rather than any classified tree, since the tree
/// may have been rebuilt since the last render. Folders without a stored
/// path cannot be keyed and are skipped.
pub fn snapshot_open_paths<D: NavDocument>(doc: &D) -> Vec<String> {
    let Some(roots) = doc.root_items() else {
        return Vec::new();
    };
    let mut paths = Vec::new();
    let mut stack: Vec<D::Item> = roots.into_iter().rev().collect();
    while let Some(item) = stack.pop() {
        if doc.has_marker(&item, Marker::Folder) && doc.has_marker(&item, Marker::Open) {
            if let Some(path) = doc.stored_path(&item) {
                paths.push(path);
            }
        }
        stack.extend(doc.child_items(&item).into_iter().rev());
    }
    paths
}
