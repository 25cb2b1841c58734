use std::{collections::BTreeMap, fs, path::Path};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraAction {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl CameraAction {
    pub const ALL: [CameraAction; 6] = [
        CameraAction::Forward,
        CameraAction::Backward,
        CameraAction::Left,
        CameraAction::Right,
        CameraAction::Up,
        CameraAction::Down,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CameraAction::Forward => "forward",
            CameraAction::Backward => "backward",
            CameraAction::Left => "left",
            CameraAction::Right => "right",
            CameraAction::Up => "up",
            CameraAction::Down => "down",
        }
    }
}

/// Key name to action. Several keys may drive the same action.
///
/// Key names are physical positions on a US layout, so the defaults sit under
/// the same fingers on every layout (`z q s d` on AZERTY).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings(BTreeMap<String, CameraAction>);

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_pairs([
            ("w", CameraAction::Forward),
            ("s", CameraAction::Backward),
            ("a", CameraAction::Left),
            ("d", CameraAction::Right),
            ("space", CameraAction::Up),
            ("lshift", CameraAction::Down),
        ])
    }
}

impl KeyBindings {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, CameraAction)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(key, action)| (key.to_string(), action))
                .collect(),
        )
    }

    pub fn bind(&mut self, key: &str, action: CameraAction) {
        self.0.insert(key.to_string(), action);
    }

    pub fn unbind(&mut self, key: &str) -> Option<CameraAction> {
        self.0.remove(key)
    }

    pub fn action(&self, key: &str) -> Option<CameraAction> {
        self.0.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, CameraAction)> {
        self.0.iter().map(|(key, action)| (key.as_str(), *action))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default = "default_velocity")]
    pub velocity: f32,
    #[serde(default = "default_mouse_sensitivity")]
    pub mouse_sensitivity: f32,
    #[serde(default)]
    pub keys: KeyBindings,
}

fn default_velocity() -> f32 {
    0.1
}

fn default_mouse_sensitivity() -> f32 {
    0.2
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            velocity: default_velocity(),
            mouse_sensitivity: default_mouse_sensitivity(),
            keys: KeyBindings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_title() -> String {
    "freefly camera".to_string()
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Longest frame delta handed to tasks. Unset means unclamped.
    #[serde(default)]
    pub max_dt_ms: Option<u32>,
    #[serde(default)]
    pub log_fps: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub frame: FrameConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("loading config from {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
