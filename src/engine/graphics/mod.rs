use std::borrow::Cow;

use log::info;
use pollster::FutureExt;
use wgpu::{
    Adapter, Buffer, BufferUsages, Device, DeviceDescriptor, Features, Instance, Limits, Queue,
    RequestAdapterOptions, ShaderModule, ShaderModuleDescriptor, ShaderSource, Surface, Trace,
    util::{BufferInitDescriptor, DeviceExt},
};

pub mod renderer;
pub mod viewports;

#[derive(Debug)]
pub struct GPUContext {
    pub adapter: Adapter,
    pub device: Device,
    pub queue: Queue,
}

impl GPUContext {
    pub fn init(instance: &Instance, surface: &Surface) -> Result<Self, String> {
        info!("requesting adapter");
        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                compatible_surface: Some(surface),
                ..Default::default()
            })
            .block_on()
            .map_err(|err| format!("failed to request an adapter {err}"))?;

        info!("requesting device and queue");
        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("freefly device"),
                required_features: Features::empty(),
                required_limits: Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: Trace::Off,
            })
            .block_on()
            .map_err(|err| format!("failed to retrieve device and queue {err}"))?;

        Ok(Self {
            adapter,
            device,
            queue,
        })
    }
}

pub fn create_buffer_with_data(
    device: &Device,
    name: &str,
    data: &[u8],
    buffer_uses: &[BufferUsages],
) -> Buffer {
    let usage = buffer_uses
        .iter()
        .fold(BufferUsages::empty(), |acc, &uses| acc | uses);

    device.create_buffer_init(&BufferInitDescriptor {
        label: Some(name),
        contents: data,
        usage,
    })
}

pub fn load_shader(device: &Device, label: &str, source: &str) -> ShaderModule {
    device.create_shader_module(ShaderModuleDescriptor {
        label: Some(label),
        source: ShaderSource::Wgsl(Cow::Borrowed(source)),
    })
}
