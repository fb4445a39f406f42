use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use wavify::wave::{Position, WaveOptions};

use crate::WaveApp;

/// Returns the path to the settings file: `~/.config/wavify/settings.json`
fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("wavify");
    path.push("settings.json");
    path
}

/// Persisted demo settings.
///
/// Serialized as JSON to the platform config directory.
/// Fields use `#[serde(default)]` so that adding new settings
/// won't break existing config files.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub show_settings: bool,
    pub show_points: bool,
    pub curve_samples: usize,
    pub selected_layer: usize,

    // One entry per wave, back to front
    pub layers: Vec<WaveOptions>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            show_settings: true,
            show_points: false,
            curve_samples: 24,
            selected_layer: 0,

            layers: vec![
                WaveOptions {
                    height: 90.0,
                    amplitude: 45.0,
                    speed: 0.2,
                    bones: 3,
                    position: Position::Bottom,
                    color: "rgba(79, 172, 254, 0.35)".to_string(),
                    ..Default::default()
                },
                WaveOptions {
                    height: 70.0,
                    amplitude: 35.0,
                    speed: 0.25,
                    bones: 4,
                    position: Position::Bottom,
                    color: "rgba(0, 242, 254, 0.45)".to_string(),
                    ..Default::default()
                },
                WaveOptions {
                    height: 45.0,
                    amplitude: 25.0,
                    speed: 0.35,
                    bones: 5,
                    position: Position::Bottom,
                    color: "#ffffff40".to_string(),
                    ..Default::default()
                },
            ],
        }
    }
}

impl AppSettings {
    /// Load settings from disk, falling back to defaults on any error.
    pub fn load() -> Self {
        let path = settings_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(mut settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    for layer in &mut settings.layers {
                        layer.validate();
                    }
                    settings
                }
                Err(e) => {
                    log::warn!("Failed to parse settings ({}), using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                log::info!("No settings file found ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk as pretty JSON.
    pub fn save(&self) {
        let path = settings_path();
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!("Failed to create config directory: {}", e);
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    log::warn!("Failed to write settings: {}", e);
                }
            }
            Err(e) => {
                log::warn!("Failed to serialize settings: {}", e);
            }
        }
    }

    /// Extract current settings from the running application.
    pub fn from_app(app: &WaveApp) -> Self {
        Self {
            show_settings: app.show_settings,
            show_points: app.view.show_points,
            curve_samples: app.view.curve_samples,
            selected_layer: app.selected_layer,
            layers: app.layers.iter().map(|w| w.options().clone()).collect(),
        }
    }

    /// Apply view settings to the running application.
    ///
    /// Layers are created by the app itself from `layers`.
    pub fn apply(&self, app: &mut WaveApp) {
        app.show_settings = self.show_settings;
        app.view.show_points = self.show_points;
        app.view.curve_samples = self.curve_samples.max(1);
        app.selected_layer = self.selected_layer.min(app.layers.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_file() {
        let settings: AppSettings = serde_json::from_str(
            r#"{ "show_points": true, "layers": [ { "position": "top", "bones": 0 } ] }"#,
        )
        .unwrap();
        assert!(settings.show_points);
        assert!(settings.show_settings);
        assert_eq!(settings.layers.len(), 1);
        assert_eq!(settings.layers[0].position, Position::Top);
        assert_eq!(settings.layers[0].height, WaveOptions::default().height);
    }
}
