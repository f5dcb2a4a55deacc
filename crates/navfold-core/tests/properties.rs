//! Property tests for classification, resolution and the session store

use navfold_core::dom::{Document, Outline, OutlineEntry};
use navfold_core::{
    classify, resolve, CollapseConfig, LoadedOpenPaths, Marker, MemoryStorage, NavDocument,
    OpenStateStore, SidebarCollapse,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn entry() -> impl Strategy<Value = OutlineEntry> {
    let leaf = Just(OutlineEntry {
        title: String::new(),
        href: None,
        children: Vec::new(),
    });
    leaf.prop_recursive(4, 40, 4, |inner| {
        prop::collection::vec(inner, 1..4).prop_map(|children| OutlineEntry {
            title: String::new(),
            href: None,
            children,
        })
    })
}

/// Outline with unique hrefs assigned in document order
fn outline() -> impl Strategy<Value = Outline> {
    prop::collection::vec(entry(), 0..5).prop_map(|mut items| {
        let mut counter = 0;
        number(&mut items, &mut counter);
        Outline { items }
    })
}

fn number(entries: &mut [OutlineEntry], counter: &mut usize) {
    for entry in entries {
        *counter += 1;
        entry.title = format!("Page {counter}");
        entry.href = Some(format!("/p{counter}"));
        number(&mut entry.children, counter);
    }
}

fn config(open_level: u32) -> CollapseConfig {
    CollapseConfig {
        open_level,
        persist: true,
        scroll_into_view: false,
    }
}

proptest! {
    #[test]
    fn prop_classification_is_idempotent(outline in outline()) {
        let mut doc = Document::new();
        doc.mount_sidebar(&outline, None);
        let first = classify(&mut doc).unwrap();
        let second = classify(&mut doc).unwrap();

        let paths = |t: &navfold_core::ClassifiedTree<_>| {
            t.nodes().map(|(_, n)| n.path.clone()).collect::<Vec<_>>()
        };
        prop_assert_eq!(paths(&first), paths(&second));
    }

    #[test]
    fn prop_open_set_grows_with_open_level(
        outline in outline(),
        low in 0u32..4,
        extra in 0u32..4,
    ) {
        let mut doc = Document::new();
        doc.mount_sidebar(&outline, None);
        let tree = classify(&mut doc).unwrap();
        let loaded = LoadedOpenPaths::new();

        let small = resolve(&tree, &config(low), &loaded);
        let large = resolve(&tree, &config(low + extra), &loaded);
        prop_assert!(small.open.is_subset(&large.open));
    }

    #[test]
    fn prop_open_set_grows_with_persisted_paths(
        outline in outline(),
        mask in prop::collection::vec(any::<bool>(), 64),
        level in 0u32..3,
    ) {
        let mut doc = Document::new();
        doc.mount_sidebar(&outline, None);
        let tree = classify(&mut doc).unwrap();

        let all: LoadedOpenPaths = tree
            .nodes()
            .filter_map(|(id, n)| n.path.clone().map(|p| (p, mask[id.0 % mask.len()])))
            .collect();
        let fewer: LoadedOpenPaths = all
            .iter()
            .map(|(p, open)| (p.clone(), *open && p.len() % 2 == 0))
            .collect();

        let small = resolve(&tree, &config(level), &fewer);
        let large = resolve(&tree, &config(level), &all);
        prop_assert!(small.open.is_subset(&large.open));
    }

    #[test]
    fn prop_active_ancestors_always_open(
        outline in outline(),
        pick in any::<prop::sample::Index>(),
        level in 0u32..3,
    ) {
        let mut probe = Document::new();
        probe.mount_sidebar(&outline, None);
        let probe_tree = classify(&mut probe).unwrap();
        prop_assume!(!probe_tree.is_empty());
        let active_id = pick.index(probe_tree.len());
        let active_path = probe_tree.nodes().nth(active_id).and_then(|(_, n)| n.path.clone());

        let mut doc = Document::new();
        doc.mount_sidebar(&outline, active_path.as_deref());
        let tree = classify(&mut doc).unwrap();
        let active = tree.active().unwrap();

        // Persisted state that tries to keep everything closed.
        let loaded: LoadedOpenPaths = tree
            .nodes()
            .filter_map(|(_, n)| n.path.clone().map(|p| (p, false)))
            .collect();
        let resolution = resolve(&tree, &config(level), &loaded);

        for ancestor in tree.ancestors(active) {
            prop_assert!(tree.node(ancestor).is_folder);
            prop_assert!(resolution.is_open(ancestor));
        }
    }

    #[test]
    fn prop_no_leaf_is_ever_open(
        outline in outline(),
        level in 0u32..4,
        mask in prop::collection::vec(any::<bool>(), 64),
    ) {
        let mut doc = Document::new();
        doc.mount_sidebar(&outline, None);
        let tree = classify(&mut doc).unwrap();
        let loaded: LoadedOpenPaths = tree
            .nodes()
            .filter_map(|(id, n)| n.path.clone().map(|p| (p, mask[id.0 % mask.len()])))
            .collect();

        let resolution = resolve(&tree, &config(level), &loaded);
        for id in &resolution.open {
            prop_assert!(tree.node(*id).is_folder);
        }

        let mut storage = MemoryStorage::new();
        let snapshot: Vec<&str> = loaded
            .iter()
            .filter(|(_, open)| **open)
            .map(|(p, _)| p.as_str())
            .collect();
        OpenStateStore::new(&mut storage, true).save(snapshot).unwrap();
        let mut plugin = SidebarCollapse::new(config(level), storage);
        plugin.on_each_render(&mut doc).unwrap();

        let mut stack = doc.root_items().unwrap();
        while let Some(item) = stack.pop() {
            let children = doc.child_items(&item);
            if children.is_empty() {
                prop_assert!(!doc.has_marker(&item, Marker::Open));
            }
            stack.extend(children);
        }
    }

    #[test]
    fn prop_save_then_load_roundtrip(
        paths in prop::collection::vec("/[a-z0-9/]{0,12}", 0..12),
    ) {
        let mut store = OpenStateStore::new(MemoryStorage::new(), true);
        store.save(paths.iter().map(String::as_str)).unwrap();

        let loaded = store.load();
        let open: HashSet<&str> = loaded
            .iter()
            .filter(|(_, open)| **open)
            .map(|(p, _)| p.as_str())
            .collect();
        let expected: HashSet<&str> = paths.iter().map(String::as_str).collect();
        prop_assert_eq!(open, expected);
    }
}
