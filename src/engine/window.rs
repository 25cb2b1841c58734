use std::sync::Arc;

use glam::{UVec2, Vec2};
use log::{debug, warn};
use winit::{dpi::PhysicalPosition, window::Window};

/// Window changes requested by behaviours. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowProperties {
    pub cursor_hidden: Option<bool>,
    pub title: Option<String>,
}

impl WindowProperties {
    pub fn cursor_hidden(hidden: bool) -> Self {
        Self {
            cursor_hidden: Some(hidden),
            ..Default::default()
        }
    }
}

/// The parts of a window the camera behaviours talk to.
pub trait HostWindow {
    fn request_properties(&mut self, properties: WindowProperties);

    /// Last known pointer position in window pixels, origin top-left.
    fn pointer(&self) -> Option<Vec2>;

    fn size(&self) -> UVec2;

    /// Warps the pointer. Returns false when the platform refuses.
    fn move_pointer(&mut self, position: UVec2) -> bool;
}

#[derive(Debug)]
pub struct WinitWindow {
    pub window: Arc<Window>,
    cursor: Option<Vec2>,
    focused: bool,
    warp_failed: bool,
}

/// Where to warp the pointer, if anywhere. A window in the background never
/// gets to move the OS cursor.
fn warp_target(focused: bool, position: UVec2) -> Option<PhysicalPosition<u32>> {
    focused.then(|| PhysicalPosition::new(position.x, position.y))
}

impl WinitWindow {
    pub fn new(window: Arc<Window>) -> Self {
        let focused = window.has_focus();
        Self {
            window,
            cursor: None,
            focused,
            warp_failed: false,
        }
    }

    /// Positions seen before focus was lost are stale once it returns.
    pub fn set_focused(&mut self, focused: bool) {
        debug!("window focus changed to {focused}");
        self.focused = focused;
        if !focused {
            self.cursor = None;
        }
    }

    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.cursor = Some(Vec2::new(position.x as f32, position.y as f32));
    }
}

impl HostWindow for WinitWindow {
    fn request_properties(&mut self, properties: WindowProperties) {
        if let Some(hidden) = properties.cursor_hidden {
            self.window.set_cursor_visible(!hidden);
        }
        if let Some(title) = properties.title {
            self.window.set_title(&title);
        }
    }

    fn pointer(&self) -> Option<Vec2> {
        self.cursor
    }

    fn size(&self) -> UVec2 {
        let size = self.window.inner_size();
        UVec2::new(size.width, size.height)
    }

    fn move_pointer(&mut self, position: UVec2) -> bool {
        let Some(target) = warp_target(self.focused, position) else {
            return false;
        };
        match self.window.set_cursor_position(target) {
            Ok(()) => {
                self.cursor = Some(position.as_vec2());
                true
            }
            Err(err) => {
                if !self.warp_failed {
                    warn!("failed to move pointer {err}");
                    self.warp_failed = true;
                } else {
                    debug!("failed to move pointer {err}");
                }
                false
            }
        }
    }
}
