//! Render reconciler
//!
//! Applies a resolution to the live tree. Every classified node is visited
//! exactly once; scrolling happens last so the active entry's ancestors are
//! already expanded.

use crate::document::{Marker, NavDocument};
use crate::models::{ClassifiedTree, CollapseConfig};
use crate::resolver::Resolution;
use tracing::debug;

/// Counts of what one reconcile pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Folders rendered open
    pub opened: usize,
    /// Folders rendered closed
    pub closed: usize,
    /// Whether the active entry was scrolled into view
    pub scrolled: bool,
}

/// Set each folder's open marker to its membership in `resolution`, clear it
/// from leaves, then scroll to the active entry if configured.
pub fn reconcile<D: NavDocument>(
    doc: &mut D,
    tree: &mut ClassifiedTree<D::Item>,
    resolution: &Resolution,
    config: &CollapseConfig,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    let ids: Vec<_> = tree.ids().collect();
    for id in ids {
        let open = tree.node(id).is_folder && resolution.is_open(id);
        doc.set_marker(tree.item(id), Marker::Open, open);
        tree.node_mut(id).is_open = open;

        if tree.node(id).is_folder {
            if open {
                report.opened += 1;
            } else {
                report.closed += 1;
            }
        }
    }

    if config.scroll_into_view {
        if let Some(active) = tree.active() {
            doc.scroll_into_view(tree.item(active));
            report.scrolled = true;
        }
    }

    debug!(
        opened = report.opened,
        closed = report.closed,
        scrolled = report.scrolled,
        "Reconciled sidebar"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use crate::dom::{Document, Outline, OutlineEntry};
    use crate::models::NodeId;
    use std::collections::BTreeSet;

    fn outline() -> Outline {
        Outline {
            items: vec![
                OutlineEntry::folder(
                    "A",
                    "/a",
                    vec![
                        OutlineEntry::leaf("A1", "/a/1"),
                        OutlineEntry::folder("A2", "/a/2", vec![OutlineEntry::leaf("A2a", "/a/2/a")]),
                    ],
                ),
                OutlineEntry::leaf("B", "/b"),
            ],
        }
    }

    fn config(scroll: bool) -> CollapseConfig {
        CollapseConfig {
            open_level: 0,
            persist: false,
            scroll_into_view: scroll,
        }
    }

    #[test]
    fn test_reconcile_applies_membership() {
        let mut doc = Document::new();
        doc.mount_sidebar(&outline(), None);
        let mut tree = classify(&mut doc).unwrap();
        let a = tree.find("/a").unwrap();
        let a2 = tree.find("/a/2").unwrap();

        let resolution = Resolution {
            open: BTreeSet::from([a]),
            revealed: Vec::new(),
        };
        let report = reconcile(&mut doc, &mut tree, &resolution, &config(false));

        assert_eq!(report.opened, 1);
        assert_eq!(report.closed, 1);
        assert!(doc.has_marker(tree.item(a), Marker::Open));
        assert!(!doc.has_marker(tree.item(a2), Marker::Open));
        assert!(tree.node(a).is_open);
        assert!(!tree.node(a2).is_open);
    }

    #[test]
    fn test_leaf_never_gets_open_marker() {
        let mut doc = Document::new();
        doc.mount_sidebar(&outline(), None);
        let mut tree = classify(&mut doc).unwrap();
        let b = tree.find("/b").unwrap();
        doc.set_marker(tree.item(b), Marker::Open, true);

        let everything: BTreeSet<NodeId> = tree.ids().collect();
        let resolution = Resolution {
            open: everything,
            revealed: Vec::new(),
        };
        reconcile(&mut doc, &mut tree, &resolution, &config(false));

        for (id, node) in tree.nodes() {
            if !node.is_folder {
                assert!(!node.is_open);
                assert!(!doc.has_marker(tree.item(id), Marker::Open));
            }
        }
    }

    #[test]
    fn test_previously_open_folder_is_closed() {
        let mut doc = Document::new();
        doc.mount_sidebar(&outline(), None);
        let mut tree = classify(&mut doc).unwrap();
        let a = tree.find("/a").unwrap();
        doc.set_marker(tree.item(a), Marker::Open, true);

        reconcile(&mut doc, &mut tree, &Resolution::default(), &config(false));
        assert!(!doc.has_marker(tree.item(a), Marker::Open));
    }

    #[test]
    fn test_scrolls_active_when_enabled() {
        let mut doc = Document::new();
        doc.mount_sidebar(&outline(), Some("/a/2/a"));
        let mut tree = classify(&mut doc).unwrap();
        let active = tree.active().unwrap();

        let report = reconcile(&mut doc, &mut tree, &Resolution::default(), &config(true));
        assert!(report.scrolled);
        assert_eq!(doc.scrolled(), &[*tree.item(active)]);
    }

    #[test]
    fn test_no_scroll_without_active_or_when_disabled() {
        let mut doc = Document::new();
        doc.mount_sidebar(&outline(), None);
        let mut tree = classify(&mut doc).unwrap();
        assert!(!reconcile(&mut doc, &mut tree, &Resolution::default(), &config(true)).scrolled);

        doc.mount_sidebar(&outline(), Some("/b"));
        let mut tree = classify(&mut doc).unwrap();
        assert!(!reconcile(&mut doc, &mut tree, &Resolution::default(), &config(false)).scrolled);
        assert!(doc.scrolled().is_empty());
    }
}
