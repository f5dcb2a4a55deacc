//! Terminal output for the sidebar state

use comfy_table::{Cell, ContentArrangement, Table};
use navfold_core::dom::{Document, ElementId};
use navfold_core::{Marker, NavDocument, RenderReport};
use serde_json::{json, Value};

/// Visible entries as indented lines, the way the stylesheet would show them.
///
/// Children of closed folders are hidden. `▾` open folder, `▸` closed
/// folder, `·` page; the active entry is suffixed with `*`.
pub fn tree_lines(doc: &Document) -> Vec<String> {
    let mut lines = Vec::new();
    let Some(roots) = doc.root_items() else {
        return lines;
    };
    let mut stack: Vec<(ElementId, usize)> = roots.into_iter().rev().map(|i| (i, 0)).collect();

    while let Some((item, indent)) = stack.pop() {
        let folder = doc.has_marker(&item, Marker::Folder);
        let open = doc.has_marker(&item, Marker::Open);
        let glyph = match (folder, open) {
            (true, true) => '▾',
            (true, false) => '▸',
            (false, _) => '·',
        };
        let label = doc.label(item).unwrap_or("(untitled)");
        let path = doc
            .stored_path(&item)
            .map(|p| format!("  {p}"))
            .unwrap_or_default();
        let active = if doc.is_active(&item) { " *" } else { "" };
        lines.push(format!("{}{glyph} {label}{active}{path}", "  ".repeat(indent)));

        if folder && open {
            stack.extend(
                doc.child_items(&item)
                    .into_iter()
                    .rev()
                    .map(|child| (child, indent + 1)),
            );
        }
    }
    lines
}

pub fn report_json(report: &RenderReport) -> Value {
    json!({
        "nodes": report.nodes,
        "folders": report.folders,
        "open": report.open_paths,
        "active": report.active_path,
        "scrolled": report.reconcile.scrolled,
    })
}

/// Table of the paths held in the session
pub fn session_table(paths: &[String]) -> Table {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Open folder"]);
    for (i, path) in paths.iter().enumerate() {
        table.add_row(vec![Cell::new(i + 1), Cell::new(path)]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use navfold_core::dom::{Outline, OutlineEntry};
    use navfold_core::{CollapseConfig, MemoryStorage, SidebarCollapse};

    fn outline() -> Outline {
        Outline {
            items: vec![
                OutlineEntry::folder(
                    "Guide",
                    "/guide",
                    vec![OutlineEntry::folder(
                        "Advanced",
                        "/guide/advanced",
                        vec![OutlineEntry::leaf("Hooks", "/guide/advanced/hooks")],
                    )],
                ),
                OutlineEntry::leaf("FAQ", "/faq"),
            ],
        }
    }

    #[test]
    fn test_tree_lines_hide_closed_children() {
        let mut doc = Document::new();
        doc.mount_sidebar(&outline(), Some("/faq"));
        let mut plugin = SidebarCollapse::new(CollapseConfig::default(), MemoryStorage::new());
        plugin.on_each_render(&mut doc).unwrap();

        assert_eq!(
            tree_lines(&doc),
            vec![
                "▾ Guide  /guide",
                "  ▸ Advanced  /guide/advanced",
                "· FAQ *  /faq",
            ]
        );
    }

    #[test]
    fn test_tree_lines_without_root() {
        assert!(tree_lines(&Document::new()).is_empty());
    }

    #[test]
    fn test_report_json_shape() {
        let mut doc = Document::new();
        doc.mount_sidebar(&outline(), Some("/guide/advanced/hooks"));
        let mut plugin = SidebarCollapse::new(CollapseConfig::default(), MemoryStorage::new());
        let report = plugin.on_each_render(&mut doc).unwrap();

        let value = report_json(&report);
        assert_eq!(value["open"], json!(["/guide", "/guide/advanced"]));
        assert_eq!(value["active"], json!("/guide/advanced/hooks"));
    }

    #[test]
    fn test_session_table_rows() {
        let table = session_table(&["/a".to_string(), "/b".to_string()]);
        let rendered = table.to_string();
        assert!(rendered.contains("/a"));
        assert!(rendered.contains("Open folder"));
    }
}
