//! Editor settings, read from a JSON file.

use crate::error::Result;
use egui::{Color32, Vec2, vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable naming the settings file.
pub(crate) const CONFIG_ENV: &str = "FORM_DESIGNER_CONFIG";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct EditorConfig {
    /// Period of the dock-state scan.
    pub(crate) scan_interval_ms: u64,
    /// Position of the back panel inside the scroll area.
    pub(crate) back_offset: Vec2,
    /// Extra scrollable room around the back panel.
    pub(crate) virtual_padding: f32,
    pub(crate) canvas_bg: Color32,
    pub(crate) sizer_highlight: Color32,
    pub(crate) item_highlight: Color32,
    pub(crate) title_bar_height: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            scan_interval_ms: 200,
            back_offset: vec2(10.0, 10.0),
            virtual_padding: 20.0,
            canvas_bg: Color32::from_rgb(192, 192, 192),
            sizer_highlight: Color32::BLUE,
            item_highlight: Color32::RED,
            title_bar_height: 22.0,
        }
    }
}

impl EditorConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Settings from the file named by `FORM_DESIGNER_CONFIG`, defaults when
    /// the variable is unset or the file cannot be used.
    pub(crate) fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        let path = Path::new(&path);
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded editor settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring editor settings {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub(crate) fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.scan_interval(), Duration::from_millis(200));
        assert_eq!(config.back_offset, vec2(10.0, 10.0));
        assert_eq!(config.virtual_padding, 20.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{"scan_interval_ms": 50}"#).unwrap();
        assert_eq!(config.scan_interval_ms, 50);
        assert_eq!(config.item_highlight, Color32::RED);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let missing = std::env::temp_dir().join("form-designer-no-such-config.json");
        assert!(EditorConfig::load(&missing).is_err());
    }
}
