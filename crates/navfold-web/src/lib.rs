//! navfold-web - docsify plugin for collapsible sidebars
//!
//! Call `install()` from the page before docsify boots; it pushes a plugin
//! onto `window.$docsify.plugins` that wires `doneEach` and `ready` into
//! [`SidebarCollapse`].

pub mod sidebar;
pub mod storage;

pub use sidebar::WebSidebar;
pub use storage::BrowserSessionStorage;

use js_sys::{Array, Function, Object, Reflect, JSON};
use navfold_core::models::SETTINGS_KEY;
use navfold_core::{CollapseConfig, SidebarCollapse};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent};

/// Plugin state shared by the hook callbacks and the click listener
struct Shared {
    plugin: SidebarCollapse<BrowserSessionStorage>,
    sidebar: WebSidebar,
}

/// Register the plugin with docsify
#[wasm_bindgen]
pub fn install() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let docsify = ensure_object(&window, "$docsify")?;
    let plugins = ensure_array(&docsify, "plugins")?;

    let plugin = Closure::<dyn FnMut(JsValue, JsValue)>::new(|hook: JsValue, _vm: JsValue| {
        if let Err(e) = enhance(&hook) {
            web_sys::console::warn_2(&JsValue::from_str("navfold: plugin setup failed"), &e);
        }
    });
    plugins.push(plugin.as_ref());
    plugin.forget();
    Ok(())
}

fn enhance(hook: &JsValue) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let settings = Reflect::get(&window, &JsValue::from_str("$docsify"))?;
    let config = config_from_json(user_options_json(&settings).as_deref());

    let shared = Rc::new(RefCell::new(Shared {
        plugin: SidebarCollapse::new(config, BrowserSessionStorage::from_window(&window)),
        sidebar: WebSidebar::new(document),
    }));
    {
        let mut guard = shared.borrow_mut();
        let Shared { plugin, sidebar } = &mut *guard;
        plugin.init(sidebar);
    }

    // One delegated listener on the nav root; items are rebuilt on every page.
    let click_state = Rc::clone(&shared);
    let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
        let Some(target) = ev.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let mut guard = click_state.borrow_mut();
        let Shared { plugin, sidebar } = &mut *guard;
        if plugin.on_activation(sidebar, &target).is_handled() {
            ev.prevent_default();
            ev.stop_propagation();
        }
    });
    shared
        .borrow_mut()
        .sidebar
        .set_activation_callback(on_click.as_ref().unchecked_ref::<Function>().clone());
    on_click.forget();

    let each_state = Rc::clone(&shared);
    let done_each = Closure::<dyn FnMut()>::new(move || {
        let mut guard = each_state.borrow_mut();
        let Shared { plugin, sidebar } = &mut *guard;
        plugin.on_each_render(sidebar);
    });
    register_hook(hook, "doneEach", &done_each)?;
    done_each.forget();

    let ready_state = Rc::clone(&shared);
    let ready = Closure::<dyn FnMut()>::new(move || {
        let mut guard = ready_state.borrow_mut();
        let Shared { plugin, sidebar } = &mut *guard;
        plugin.on_ready(sidebar);
    });
    register_hook(hook, "ready", &ready)?;
    ready.forget();

    Ok(())
}

fn register_hook(hook: &JsValue, name: &str, callback: &Closure<dyn FnMut()>) -> Result<(), JsValue> {
    let register: Function = Reflect::get(hook, &JsValue::from_str(name))?.dyn_into()?;
    register.call1(hook, callback.as_ref())?;
    Ok(())
}

/// `$docsify.sidebarCollapse` as a JSON string, if present and serializable
fn user_options_json(settings: &JsValue) -> Option<String> {
    if !settings.is_object() {
        return None;
    }
    let options = Reflect::get(settings, &JsValue::from_str(SETTINGS_KEY)).ok()?;
    if options.is_undefined() || options.is_null() {
        return None;
    }
    JSON::stringify(&options).ok().map(String::from)
}

/// Build the config from the serialized user options; anything unreadable
/// falls back to the defaults
fn config_from_json(options: Option<&str>) -> CollapseConfig {
    let Some(raw) = options else {
        return CollapseConfig::default();
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
        return CollapseConfig::default();
    };
    let mut settings = serde_json::Map::new();
    settings.insert(SETTINGS_KEY.to_string(), value);
    CollapseConfig::from_settings(&serde_json::Value::Object(settings))
}

fn ensure_object(target: &JsValue, key: &str) -> Result<Object, JsValue> {
    let key = JsValue::from_str(key);
    let value = Reflect::get(target, &key)?;
    if value.is_object() {
        return Ok(value.unchecked_into());
    }
    let object = Object::new();
    Reflect::set(target, &key, &object)?;
    Ok(object)
}

fn ensure_array(target: &JsValue, key: &str) -> Result<Array, JsValue> {
    let key = JsValue::from_str(key);
    let value = Reflect::get(target, &key)?;
    if Array::is_array(&value) {
        return Ok(value.unchecked_into());
    }
    let array = Array::new();
    Reflect::set(target, &key, &array)?;
    Ok(array)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_missing_options() {
        assert_eq!(config_from_json(None), CollapseConfig::default());
    }

    #[test]
    fn test_config_from_user_options() {
        let config = config_from_json(Some(r#"{"openLevel":2,"persist":false}"#));
        assert_eq!(config.open_level, 2);
        assert!(!config.persist);
        assert!(config.scroll_into_view);
    }

    #[test]
    fn test_config_from_garbage() {
        assert_eq!(config_from_json(Some("nope")), CollapseConfig::default());
    }
}
