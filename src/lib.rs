//! First-person free-fly camera behaviour and the small engine host it runs in.

pub mod config;
pub mod engine;
pub mod engine_loop;
pub mod error;
pub mod utils;

pub use config::{AppConfig, CameraAction, ControllerConfig, KeyBindings};
pub use engine::cameras::controller::CameraController;
pub use error::{Error, Result};
