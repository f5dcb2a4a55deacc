//! In-memory document
//!
//! A small element arena shaped like the markup docsify renders for its
//! sidebar. Used by the CLI driver and the test suites; the browser adapter
//! implements [`NavDocument`] over the real DOM instead.

use crate::document::{Marker, NavDocument, TOGGLE_CLASS};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Class of the navigation root element
pub const NAV_ROOT_CLASS: &str = "sidebar-nav";

/// Class the host puts on the entry of the current page
pub const ACTIVE_CLASS: &str = "active";

/// Index of an element inside a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(usize);

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    classes: BTreeSet<String>,
    attrs: BTreeMap<String, String>,
    text: Option<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// Element arena with a `head` and a `body`
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
    head: ElementId,
    body: ElementId,
    scrolled: Vec<ElementId>,
    listeners: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            elements: Vec::new(),
            head: ElementId(0),
            body: ElementId(0),
            scrolled: Vec::new(),
            listeners: 0,
        };
        let html = doc.create_element("html");
        doc.head = doc.create_element("head");
        doc.body = doc.create_element("body");
        doc.append_child(html, doc.head);
        doc.append_child(html, doc.body);
        doc
    }

    pub fn head(&self) -> ElementId {
        self.head
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Element {
            tag: tag.to_ascii_lowercase(),
            classes: BTreeSet::new(),
            attrs: BTreeMap::new(),
            text: None,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.detach(child);
        self.elements[child.0].parent = Some(parent);
        self.elements[parent.0].children.push(child);
    }

    pub fn prepend_child(&mut self, parent: ElementId, child: ElementId) {
        self.detach(child);
        self.elements[child.0].parent = Some(parent);
        self.elements[parent.0].children.insert(0, child);
    }

    /// Remove `id` from its parent; the element stays allocated but unreachable
    pub fn detach(&mut self, id: ElementId) {
        if let Some(parent) = self.elements[id.0].parent.take() {
            self.elements[parent.0].children.retain(|c| *c != id);
        }
    }

    pub fn tag(&self, id: ElementId) -> &str {
        &self.elements[id.0].tag
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements[id.0].parent
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        &self.elements[id.0].children
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements[id.0].classes.contains(class)
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        self.elements[id.0].classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        self.elements[id.0].classes.remove(class);
    }

    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.elements[id.0].attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, id: ElementId, name: &str, value: &str) {
        self.elements[id.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.elements[id.0].text.as_deref()
    }

    pub fn set_text(&mut self, id: ElementId, text: &str) {
        self.elements[id.0].text = Some(text.to_string());
    }

    /// Direct children with the given tag
    pub fn children_by_tag<'a>(
        &'a self,
        id: ElementId,
        tag: &'a str,
    ) -> impl Iterator<Item = ElementId> + 'a {
        self.children(id)
            .iter()
            .copied()
            .filter(move |c| self.tag(*c) == tag)
    }

    /// First element carrying `class` below `root`, in document order
    pub fn find_by_class(&self, root: ElementId, class: &str) -> Option<ElementId> {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if self.has_class(id, class) {
                return Some(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        None
    }

    /// Nearest inclusive ancestor matching `pred`
    pub fn closest(
        &self,
        id: ElementId,
        pred: impl Fn(&Self, ElementId) -> bool,
    ) -> Option<ElementId> {
        let mut current = Some(id);
        while let Some(el) = current {
            if pred(self, el) {
                return Some(el);
            }
            current = self.parent(el);
        }
        None
    }

    pub fn nav_root(&self) -> Option<ElementId> {
        self.find_by_class(self.body, NAV_ROOT_CLASS)
    }

    /// The entry's link element
    pub fn link(&self, item: ElementId) -> Option<ElementId> {
        self.children_by_tag(item, "a").next()
    }

    /// Text of the entry's link
    pub fn label(&self, item: ElementId) -> Option<&str> {
        self.link(item).and_then(|a| self.text(a))
    }

    /// Control element of a folder entry
    pub fn toggle(&self, item: ElementId) -> Option<ElementId> {
        self.children(item)
            .iter()
            .copied()
            .find(|c| self.has_class(*c, TOGGLE_CLASS))
    }

    /// Elements passed to `scroll_into_view`, oldest first
    pub fn scrolled(&self) -> &[ElementId] {
        &self.scrolled
    }

    /// Number of delegated listeners attached so far
    pub fn listener_count(&self) -> usize {
        self.listeners
    }

    /// Number of `style` elements in `head`
    pub fn stylesheet_count(&self) -> usize {
        self.children_by_tag(self.head, "style").count()
    }

    /// Rebuild the sidebar from `outline`, dropping the previous markup the
    /// way the host does on every navigation.
    ///
    /// The entry whose `href` equals `active` gets the active class. The old
    /// subtree is detached, not freed: its elements stay in the arena so ids
    /// handed out earlier never alias new markup, and the arena grows by one
    /// sidebar per call. Use a fresh `Document` for long-running replays.
    pub fn mount_sidebar(&mut self, outline: &Outline, active: Option<&str>) -> ElementId {
        if let Some(old) = self.nav_root() {
            self.detach(old);
        }
        let nav = self.create_element("div");
        self.add_class(nav, NAV_ROOT_CLASS);
        self.append_child(self.body, nav);
        if !outline.items.is_empty() {
            self.mount_group(nav, &outline.items, active);
        }
        nav
    }

    fn mount_group(&mut self, parent: ElementId, entries: &[OutlineEntry], active: Option<&str>) {
        let ul = self.create_element("ul");
        self.append_child(parent, ul);
        for entry in entries {
            let li = self.create_element("li");
            self.append_child(ul, li);

            let a = self.create_element("a");
            if let Some(href) = &entry.href {
                self.set_attr(a, "href", href);
            }
            self.set_text(a, &entry.title);
            self.append_child(li, a);

            if active.is_some() && entry.href.as_deref() == active {
                self.add_class(li, ACTIVE_CLASS);
            }
            if !entry.children.is_empty() {
                self.mount_group(li, &entry.children, active);
            }
        }
    }

    fn items_under(&self, id: ElementId) -> Vec<ElementId> {
        self.children_by_tag(id, "ul")
            .flat_map(|ul| self.children_by_tag(ul, "li"))
            .collect()
    }
}

impl NavDocument for Document {
    type Item = ElementId;
    type Target = ElementId;

    fn root_items(&self) -> Option<Vec<ElementId>> {
        self.nav_root().map(|root| self.items_under(root))
    }

    fn child_items(&self, item: &ElementId) -> Vec<ElementId> {
        self.items_under(*item)
    }

    fn link_target(&self, item: &ElementId) -> Option<String> {
        self.link(*item)
            .and_then(|a| self.attr(a, "href"))
            .map(str::to_string)
    }

    fn stored_path(&self, item: &ElementId) -> Option<String> {
        self.attr(*item, "data-path").map(str::to_string)
    }

    fn store_path(&mut self, item: &ElementId, path: &str) {
        self.set_attr(*item, "data-path", path);
    }

    fn is_active(&self, item: &ElementId) -> bool {
        self.has_class(*item, ACTIVE_CLASS)
            || self
                .link(*item)
                .is_some_and(|a| self.has_class(a, ACTIVE_CLASS))
    }

    fn has_marker(&self, item: &ElementId, marker: Marker) -> bool {
        self.has_class(*item, marker.class_name())
    }

    fn set_marker(&mut self, item: &ElementId, marker: Marker, on: bool) {
        if on {
            self.add_class(*item, marker.class_name());
        } else {
            self.remove_class(*item, marker.class_name());
        }
    }

    fn ensure_toggle(&mut self, item: &ElementId) {
        if self.toggle(*item).is_none() {
            let span = self.create_element("span");
            self.add_class(span, TOGGLE_CLASS);
            self.prepend_child(*item, span);
        }
    }

    fn remove_toggle(&mut self, item: &ElementId) {
        if let Some(span) = self.toggle(*item) {
            self.detach(span);
        }
    }

    fn toggle_owner(&self, target: &ElementId) -> Option<ElementId> {
        let root = self.nav_root()?;
        let control = self.closest(*target, |doc, el| {
            el == root || doc.has_class(el, TOGGLE_CLASS)
        })?;
        if control == root {
            return None;
        }
        self.parent(control).filter(|li| self.tag(*li) == "li")
    }

    fn scroll_into_view(&mut self, item: &ElementId) {
        self.scrolled.push(*item);
    }

    fn install_stylesheet(&mut self, id: &str, css: &str) -> bool {
        let exists = self
            .children_by_tag(self.head, "style")
            .any(|s| self.attr(s, "id") == Some(id));
        if exists {
            return false;
        }
        let style = self.create_element("style");
        self.set_attr(style, "id", id);
        self.set_text(style, css);
        self.append_child(self.head, style);
        true
    }

    fn listen_for_activations(&mut self) -> bool {
        if self.nav_root().is_none() {
            return false;
        }
        self.listeners += 1;
        true
    }
}

/// Serializable sidebar description, the input the host would render from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    #[serde(default)]
    pub items: Vec<OutlineEntry>,
}

/// One sidebar entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub title: String,

    #[serde(default)]
    pub href: Option<String>,

    #[serde(default)]
    pub children: Vec<OutlineEntry>,
}

impl OutlineEntry {
    pub fn leaf(title: &str, href: &str) -> Self {
        Self {
            title: title.to_string(),
            href: Some(href.to_string()),
            children: Vec::new(),
        }
    }

    pub fn folder(title: &str, href: &str, children: Vec<OutlineEntry>) -> Self {
        Self {
            title: title.to_string(),
            href: Some(href.to_string()),
            children,
        }
    }
}
