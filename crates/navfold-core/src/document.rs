//! Host document contract
//!
//! The core never owns the navigation markup. It reads and annotates it
//! through this trait, which the in-memory [`crate::dom::Document`] and the
//! browser adapter both implement.

/// Class markers the core toggles on navigation items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Item has nested entries
    Folder,
    /// Folder renders expanded
    Open,
}

impl Marker {
    pub fn class_name(self) -> &'static str {
        match self {
            Marker::Folder => "folder",
            Marker::Open => "open",
        }
    }
}

/// Class of the dedicated folder control element
pub const TOGGLE_CLASS: &str = "nav-toggle";

/// DOM-like view of a navigation tree
pub trait NavDocument {
    /// Handle to one navigation entry (an `li` in HTML hosts)
    type Item: Clone;

    /// Handle to the element an activation landed on
    type Target;

    /// Top-level entries, or `None` when the navigation root is not rendered
    fn root_items(&self) -> Option<Vec<Self::Item>>;

    /// Entries of the item's nested group(s), in document order
    fn child_items(&self, item: &Self::Item) -> Vec<Self::Item>;

    /// The item's own link target
    fn link_target(&self, item: &Self::Item) -> Option<String>;

    /// Path previously stored on the item
    fn stored_path(&self, item: &Self::Item) -> Option<String>;

    fn store_path(&mut self, item: &Self::Item, path: &str);

    /// Host-applied active marker on the item or on its own link
    fn is_active(&self, item: &Self::Item) -> bool;

    fn has_marker(&self, item: &Self::Item, marker: Marker) -> bool;

    fn set_marker(&mut self, item: &Self::Item, marker: Marker, on: bool);

    /// Attach the folder control element unless already present
    fn ensure_toggle(&mut self, item: &Self::Item);

    /// Detach the folder control element if present
    fn remove_toggle(&mut self, item: &Self::Item);

    /// Item whose control element contains `target`
    fn toggle_owner(&self, target: &Self::Target) -> Option<Self::Item>;

    fn scroll_into_view(&mut self, item: &Self::Item);

    /// Install a stylesheet fragment keyed by `id`; returns `false` if one
    /// with that id is already present
    fn install_stylesheet(&mut self, id: &str, css: &str) -> bool;

    /// Attach the single delegated activation listener to the navigation
    /// root; returns `false` when the root is not rendered
    fn listen_for_activations(&mut self) -> bool;
}
