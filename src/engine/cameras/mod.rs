pub mod controller;

use encase::ShaderType;
use glam::{Mat4, Vec4};

use crate::engine::scene::Transform;

/// Z-up, Y-forward camera space to the Y-up, -Z-forward space wgpu expects.
const CAMERA_TO_VIEW: Mat4 = Mat4::from_cols(
    Vec4::new(1.0, 0.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, -1.0, 0.0),
    Vec4::new(0.0, 1.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 0.0, 1.0),
);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Lens {
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }
}

pub fn view_matrix(camera: &Transform) -> Mat4 {
    CAMERA_TO_VIEW * camera.matrix().inverse()
}

#[derive(Debug, Copy, Clone, ShaderType)]
pub struct CameraUniform {
    pub view_proj: Mat4,
    pub model: Mat4,
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY,
            model: Mat4::IDENTITY,
        }
    }
}

impl CameraUniform {
    pub fn new(camera: &Transform, lens: &Lens, model: &Transform) -> Self {
        Self {
            view_proj: lens.projection() * view_matrix(camera),
            model: model.matrix(),
        }
    }
}
