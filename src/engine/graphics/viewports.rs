use std::sync::Arc;

use log::{debug, info};
use wgpu::{
    Color, Device, Extent3d, Surface, SurfaceConfiguration, TextureDescriptor, TextureFormat,
    TextureUsages, TextureView,
};
use winit::window::Window;

use crate::engine::graphics::GPUContext;

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

#[derive(Debug)]
pub struct Viewport {
    pub window: Arc<Window>,
    pub background: Color,
    pub surface: Surface<'static>,
    pub config: SurfaceConfiguration,
    pub depth_view: TextureView,
}

impl Viewport {
    pub fn new(
        window: Arc<Window>,
        background: Color,
        surface: Surface<'static>,
        gpu_context: &GPUContext,
    ) -> Self {
        info!("building viewport");
        let size = window.inner_size();
        let format = surface.get_capabilities(&gpu_context.adapter).formats[0];
        let config = SurfaceConfiguration {
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            view_formats: vec![],
            usage: TextureUsages::RENDER_ATTACHMENT,
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu_context.device, &config);
        let depth_view = create_depth_view(&gpu_context.device, &config);

        Self {
            window,
            background,
            surface,
            config,
            depth_view,
        }
    }

    pub fn resize(&mut self, device: &Device, width: u32, height: u32) {
        if width == 0 || height == 0 {
            debug!("window size is zero; skipping surface configuration");
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(device, &self.config);
        self.depth_view = create_depth_view(device, &self.config);
    }

    pub fn reconfigure(&self, device: &Device) {
        self.surface.configure(device, &self.config);
    }
}

fn create_depth_view(device: &Device, config: &SurfaceConfiguration) -> TextureView {
    let texture = device.create_texture(&TextureDescriptor {
        label: Some("depth texture"),
        size: Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}
