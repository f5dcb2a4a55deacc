//! Collapse configuration
//!
//! Built once at initialization and passed by reference into every component.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Key of the plugin's options inside the host-wide settings object
pub const SETTINGS_KEY: &str = "sidebarCollapse";

/// Options controlling expansion, persistence and scrolling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollapseConfig {
    /// Folders at `depth < open_level` auto-expand
    pub open_level: u32,

    /// Remember open folders for the browsing session
    pub persist: bool,

    /// Scroll the active entry into view after each render
    pub scroll_into_view: bool,
}

impl Default for CollapseConfig {
    fn default() -> Self {
        Self {
            open_level: 1,
            persist: true,
            scroll_into_view: true,
        }
    }
}

impl CollapseConfig {
    /// Read options from the host settings object (e.g. `window.$docsify`).
    ///
    /// User keys are merged over the defaults field by field. A missing
    /// `sidebarCollapse` object yields the defaults; a wrong-typed field keeps
    /// its default and logs a warning.
    pub fn from_settings(settings: &Value) -> Self {
        let mut config = Self::default();
        config.apply_settings(settings);
        config
    }

    /// Merge the `sidebarCollapse` object of `settings` over `self`.
    ///
    /// Only keys present with the right type replace the current value; a
    /// wrong-typed key keeps what `self` already had.
    pub fn apply_settings(&mut self, settings: &Value) {
        let Some(user) = settings.get(SETTINGS_KEY) else {
            return;
        };
        let Some(user) = user.as_object() else {
            warn!(value = %user, "sidebarCollapse is not an object, ignoring it");
            return;
        };

        if let Some(value) = user.get("openLevel") {
            match as_level(value) {
                Some(level) => self.open_level = level,
                None => warn!(%value, "openLevel must be a non-negative integer"),
            }
        }
        if let Some(value) = user.get("persist") {
            match value.as_bool() {
                Some(flag) => self.persist = flag,
                None => warn!(%value, "persist must be a boolean"),
            }
        }
        if let Some(value) = user.get("scrollIntoView") {
            match value.as_bool() {
                Some(flag) => self.scroll_into_view = flag,
                None => warn!(%value, "scrollIntoView must be a boolean"),
            }
        }
    }

    /// Parse a TOML config file body; omitted keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, CoreError> {
        toml::from_str(content).map_err(|e| CoreError::InvalidConfig {
            message: e.to_string(),
        })
    }
}

/// Accepts `2` and `2.0`, rejects negatives, fractions and anything above `u32::MAX`
fn as_level(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    let f = value.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) {
        Some(f as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_match_documented_table() {
        let config = CollapseConfig::default();
        assert_eq!(config.open_level, 1);
        assert!(config.persist);
        assert!(config.scroll_into_view);
    }

    #[test]
    fn test_from_settings_without_namespace() {
        let config = CollapseConfig::from_settings(&json!({ "name": "docs" }));
        assert_eq!(config, CollapseConfig::default());
    }

    #[test]
    fn test_from_settings_merges_user_keys() {
        let settings = json!({
            "sidebarCollapse": { "openLevel": 3, "persist": false }
        });
        let config = CollapseConfig::from_settings(&settings);
        assert_eq!(config.open_level, 3);
        assert!(!config.persist);
        assert!(config.scroll_into_view);
    }

    #[test]
    fn test_from_settings_rejects_bad_values_per_field() {
        let settings = json!({
            "sidebarCollapse": {
                "openLevel": -2,
                "persist": "yes",
                "scrollIntoView": false
            }
        });
        let config = CollapseConfig::from_settings(&settings);
        assert_eq!(config.open_level, 1);
        assert!(config.persist);
        assert!(!config.scroll_into_view);
    }

    #[test]
    fn test_from_settings_accepts_whole_floats() {
        let settings = json!({ "sidebarCollapse": { "openLevel": 2.0 } });
        assert_eq!(CollapseConfig::from_settings(&settings).open_level, 2);

        let settings = json!({ "sidebarCollapse": { "openLevel": 1.5 } });
        assert_eq!(CollapseConfig::from_settings(&settings).open_level, 1);
    }

    #[test]
    fn test_from_settings_non_object_namespace() {
        let config = CollapseConfig::from_settings(&json!({ "sidebarCollapse": true }));
        assert_eq!(config, CollapseConfig::default());
    }

    #[test]
    fn test_apply_settings_keeps_base_values() {
        let mut config = CollapseConfig {
            open_level: 0,
            persist: true,
            scroll_into_view: false,
        };
        config.apply_settings(&json!({
            "sidebarCollapse": { "persist": false, "openLevel": "deep" }
        }));
        assert_eq!(config.open_level, 0);
        assert!(!config.persist);
        assert!(!config.scroll_into_view);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = CollapseConfig::from_toml_str("openLevel = 0\n").unwrap();
        assert_eq!(config.open_level, 0);
        assert!(config.persist);
    }

    #[test]
    fn test_from_toml_invalid() {
        let err = CollapseConfig::from_toml_str("openLevel = \"deep\"").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig { .. }));
    }
}
