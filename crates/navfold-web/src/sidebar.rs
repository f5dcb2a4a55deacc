//! [`NavDocument`] over the live browser DOM

use js_sys::Function;
use navfold_core::{Marker, NavDocument, TOGGLE_CLASS};
use std::fmt::Debug;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, ScrollIntoViewOptions, ScrollLogicalPosition};

const NAV_ROOT_SELECTOR: &str = ".sidebar-nav";
const TOGGLE_SELECTOR: &str = ".sidebar-nav .nav-toggle";

/// The docsify sidebar as rendered in the page
pub struct WebSidebar {
    document: Document,
    on_activation: Option<Function>,
}

impl WebSidebar {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            on_activation: None,
        }
    }

    /// Callback attached to the navigation root by `listen_for_activations`
    pub fn set_activation_callback(&mut self, callback: Function) {
        self.on_activation = Some(callback);
    }

    fn nav_root(&self) -> Option<Element> {
        self.document.query_selector(NAV_ROOT_SELECTOR).ok().flatten()
    }

    fn link(&self, item: &Element) -> Option<Element> {
        children_by_tag(item, "a").into_iter().next()
    }

    fn toggle(&self, item: &Element) -> Option<Element> {
        let children = item.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .find(|c| c.class_list().contains(TOGGLE_CLASS))
    }
}

fn children_by_tag(el: &Element, tag: &str) -> Vec<Element> {
    let children = el.children();
    (0..children.length())
        .filter_map(|i| children.item(i))
        .filter(|c| c.tag_name().eq_ignore_ascii_case(tag))
        .collect()
}

/// Log a failed DOM call to the console and carry on
fn report<T, E: Debug>(result: Result<T, E>, what: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            web_sys::console::warn_1(&JsValue::from_str(&dom_warning(what, &e)));
            None
        }
    }
}

fn dom_warning<E: Debug>(what: &str, error: &E) -> String {
    format!("navfold: {what} failed: {error:?}")
}

fn items_under(el: &Element) -> Vec<Element> {
    children_by_tag(el, "ul")
        .iter()
        .flat_map(|ul| children_by_tag(ul, "li"))
        .collect()
}

impl NavDocument for WebSidebar {
    type Item = Element;
    type Target = Element;

    fn root_items(&self) -> Option<Vec<Element>> {
        self.nav_root().map(|root| items_under(&root))
    }

    fn child_items(&self, item: &Element) -> Vec<Element> {
        items_under(item)
    }

    fn link_target(&self, item: &Element) -> Option<String> {
        self.link(item)?.get_attribute("href")
    }

    fn stored_path(&self, item: &Element) -> Option<String> {
        item.get_attribute("data-path")
    }

    fn store_path(&mut self, item: &Element, path: &str) {
        report(item.set_attribute("data-path", path), "storing data-path");
    }

    fn is_active(&self, item: &Element) -> bool {
        item.class_list().contains("active")
            || self
                .link(item)
                .is_some_and(|a| a.class_list().contains("active"))
    }

    fn has_marker(&self, item: &Element, marker: Marker) -> bool {
        item.class_list().contains(marker.class_name())
    }

    fn set_marker(&mut self, item: &Element, marker: Marker, on: bool) {
        report(
            item.class_list().toggle_with_force(marker.class_name(), on),
            "setting marker class",
        );
    }

    fn ensure_toggle(&mut self, item: &Element) {
        if self.toggle(item).is_some() {
            return;
        }
        let Some(span) = report(self.document.create_element("span"), "creating toggle") else {
            return;
        };
        span.set_class_name(TOGGLE_CLASS);
        report(span.set_attribute("role", "button"), "labelling toggle");
        report(span.set_attribute("aria-label", "Toggle section"), "labelling toggle");
        report(
            item.insert_before(&span, item.first_child().as_ref()),
            "inserting toggle",
        );
    }

    fn remove_toggle(&mut self, item: &Element) {
        if let Some(toggle) = self.toggle(item) {
            toggle.remove();
        }
    }

    fn toggle_owner(&self, target: &Element) -> Option<Element> {
        let control = target.closest(TOGGLE_SELECTOR).ok().flatten()?;
        control
            .parent_element()
            .filter(|li| li.tag_name().eq_ignore_ascii_case("li"))
    }

    fn scroll_into_view(&mut self, item: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_block(ScrollLogicalPosition::Center);
        item.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn install_stylesheet(&mut self, id: &str, css: &str) -> bool {
        if self.document.get_element_by_id(id).is_some() {
            return false;
        }
        let Some(head) = self.document.head() else {
            return false;
        };
        let Ok(style) = self.document.create_element("style") else {
            return false;
        };
        style.set_id(id);
        style.set_text_content(Some(css));
        head.append_child(&style).is_ok()
    }

    fn listen_for_activations(&mut self) -> bool {
        let (Some(root), Some(callback)) = (self.nav_root(), self.on_activation.as_ref()) else {
            return false;
        };
        root.add_event_listener_with_callback("click", callback)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_passes_success_through() {
        assert_eq!(report::<_, String>(Ok(3), "anything"), Some(3));
    }

    #[test]
    fn test_dom_warning_names_the_call() {
        let message = dom_warning("inserting toggle", &"HierarchyRequestError");
        assert_eq!(
            message,
            "navfold: inserting toggle failed: \"HierarchyRequestError\""
        );
    }
}
