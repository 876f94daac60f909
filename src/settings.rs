use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::exercise::ExerciseKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub exercise: ExerciseKind,
    #[serde(default = "AppSettings::default_asset_root")]
    pub asset_root: String,
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default)]
    pub present_mode: PresentModeSetting,
    #[serde(default = "AppSettings::default_title")]
    pub title: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            exercise: ExerciseKind::default(),
            asset_root: Self::default_asset_root(),
            resolution: Resolution::default(),
            present_mode: PresentModeSetting::default(),
            title: Self::default_title(),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            let mut settings = Self::default();
            let query = web_sys::window()
                .and_then(|window| window.location().search().ok())
                .unwrap_or_default();
            match exercise_from_query(&query) {
                Some(exercise) => {
                    info!("Exercise {:?} selected from the page URL", exercise);
                    settings.exercise = exercise;
                }
                None => info!("Using default app settings for WebAssembly build"),
            }
            return settings;
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::load_from_path("settings.json")
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Self {
        use std::fs;

        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|err| {
                warn!(
                    "Failed to parse {:?} ({}). Falling back to default app settings.",
                    path, err
                );
                AppSettings::default()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("App settings file {:?} not found. Using default settings.", path);
                AppSettings::default()
            }
            Err(err) => {
                warn!(
                    "Failed to read {:?} ({}). Falling back to default app settings.",
                    path, err
                );
                AppSettings::default()
            }
        }
    }

    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        let settings = serde_json::from_str::<AppSettings>(contents)?;
        info!("Loaded app settings (exercise {:?})", settings.exercise);
        Ok(settings.validate())
    }

    fn validate(mut self) -> Self {
        if self.resolution.width == 0 || self.resolution.height == 0 {
            warn!("Resolution must be greater than zero. Using default resolution.");
            self.resolution = Resolution::default();
        }

        if self.asset_root.trim().is_empty() {
            warn!("Asset root must not be empty. Using default asset root.");
            self.asset_root = Self::default_asset_root();
        }

        if self.title.trim().is_empty() {
            self.title = Self::default_title();
        }

        self
    }

    fn default_asset_root() -> String {
        "web/assets".to_string()
    }

    fn default_title() -> String {
        "Scene Episodes".to_string()
    }
}

/// Reads `exercise=<kind>` from a URL query string such as `?exercise=ep2`.
pub fn exercise_from_query(query: &str) -> Option<ExerciseKind> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "exercise")
        .and_then(|(_, value)| value.parse().ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentModeSetting {
    Fifo,
    FifoRelaxed,
    Immediate,
    Mailbox,
    AutoVsync,
    AutoNoVsync,
}

impl PresentModeSetting {
    fn to_wgpu(self) -> wgpu::PresentMode {
        match self {
            PresentModeSetting::Fifo => wgpu::PresentMode::Fifo,
            PresentModeSetting::FifoRelaxed => wgpu::PresentMode::FifoRelaxed,
            PresentModeSetting::Immediate => wgpu::PresentMode::Immediate,
            PresentModeSetting::Mailbox => wgpu::PresentMode::Mailbox,
            PresentModeSetting::AutoVsync => wgpu::PresentMode::AutoVsync,
            PresentModeSetting::AutoNoVsync => wgpu::PresentMode::AutoNoVsync,
        }
    }

    /// Picks the configured mode if the surface supports it, otherwise FIFO,
    /// otherwise whatever the surface offers first.
    pub fn choose(&self, available: &[wgpu::PresentMode]) -> wgpu::PresentMode {
        let desired = self.to_wgpu();
        if available.contains(&desired) {
            return desired;
        }

        warn!(
            "Requested present mode {:?} is not supported. Falling back to FIFO.",
            desired
        );

        if available.contains(&wgpu::PresentMode::Fifo) {
            wgpu::PresentMode::Fifo
        } else {
            available
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo)
        }
    }
}

impl Default for PresentModeSetting {
    fn default() -> Self {
        PresentModeSetting::Fifo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_replaces_invalid_values_with_defaults() {
        let validated = AppSettings {
            exercise: ExerciseKind::Ep2,
            asset_root: "  ".into(),
            resolution: Resolution {
                width: 0,
                height: 0,
            },
            present_mode: PresentModeSetting::Immediate,
            title: String::new(),
        }
        .validate();

        assert_eq!(validated.exercise, ExerciseKind::Ep2);
        assert_eq!(validated.resolution, Resolution::default());
        assert_eq!(validated.asset_root, AppSettings::default().asset_root);
        assert_eq!(validated.title, AppSettings::default().title);
    }

    #[test]
    fn json_fields_are_optional() {
        let settings = AppSettings::from_json(r#"{ "exercise": "ep3" }"#).unwrap();
        assert_eq!(settings.exercise, ExerciseKind::Ep3);
        assert_eq!(settings.present_mode, PresentModeSetting::Fifo);
        assert_eq!(settings.resolution, Resolution::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(AppSettings::from_json("{ exercise: ").is_err());
        assert!(AppSettings::from_json(r#"{ "exercise": "ep9" }"#).is_err());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = AppSettings::load_from_path("does/not/exist/settings.json");
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn exercise_is_read_from_query() {
        assert_eq!(exercise_from_query("?exercise=ep2"), Some(ExerciseKind::Ep2));
        assert_eq!(
            exercise_from_query("?debug=1&exercise=template"),
            Some(ExerciseKind::Template)
        );
        assert_eq!(exercise_from_query("?exercise=nope"), None);
        assert_eq!(exercise_from_query(""), None);
    }

    #[test]
    fn present_mode_returns_desired_when_available() {
        let available = [
            wgpu::PresentMode::Fifo,
            wgpu::PresentMode::Mailbox,
            wgpu::PresentMode::Immediate,
        ];

        assert_eq!(
            PresentModeSetting::Mailbox.choose(&available),
            wgpu::PresentMode::Mailbox
        );
    }

    #[test]
    fn present_mode_falls_back_to_fifo_when_desired_missing() {
        let available = [wgpu::PresentMode::Fifo, wgpu::PresentMode::Immediate];
        assert_eq!(
            PresentModeSetting::Mailbox.choose(&available),
            wgpu::PresentMode::Fifo
        );
    }

    #[test]
    fn present_mode_uses_first_available_when_fifo_missing() {
        let available = [wgpu::PresentMode::Immediate];
        assert_eq!(
            PresentModeSetting::Mailbox.choose(&available),
            wgpu::PresentMode::Immediate
        );
    }
}
