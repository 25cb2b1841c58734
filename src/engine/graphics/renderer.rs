use encase::{ShaderType, UniformBuffer};
use log::{debug, warn};
use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, Buffer, BufferUsages, CompareFunction, DepthBiasState,
    DepthStencilState, FragmentState, IndexFormat, LoadOp, MultisampleState, Operations,
    PipelineLayoutDescriptor, PrimitiveState, RenderPassColorAttachment,
    RenderPassDepthStencilAttachment, RenderPassDescriptor, RenderPipeline,
    RenderPipelineDescriptor, ShaderStages, StencilState, StoreOp, SurfaceError,
    VertexAttribute, VertexBufferLayout, VertexFormat, VertexState,
};

use crate::engine::{
    cameras::CameraUniform,
    graphics::{
        GPUContext, create_buffer_with_data, load_shader,
        viewports::{DEPTH_FORMAT, Viewport},
    },
    mesh::{CUBE_INDICES, cube_positions},
};

/// Draws a single box with the camera uniform.
#[derive(Debug)]
pub struct BoxRenderer {
    pipeline: RenderPipeline,
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    uniform_buffer: Buffer,
    bind_group: BindGroup,
}

impl BoxRenderer {
    pub fn new(gpu_context: &GPUContext, viewport: &Viewport) -> Self {
        let device = &gpu_context.device;
        let shader = load_shader(device, "box shader", include_str!("../../shaders/box.wgsl"));

        let vertex_buffer = create_buffer_with_data(
            device,
            "box vertices",
            bytemuck::cast_slice(&cube_positions()),
            &[BufferUsages::VERTEX],
        );
        let index_buffer = create_buffer_with_data(
            device,
            "box indices",
            bytemuck::cast_slice(&CUBE_INDICES),
            &[BufferUsages::INDEX],
        );
        let uniform_buffer = create_buffer_with_data(
            device,
            "camera uniform",
            &encode_uniform(&CameraUniform::default()),
            &[BufferUsages::UNIFORM, BufferUsages::COPY_DST],
        );

        let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("camera bind group layout"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                count: None,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(CameraUniform::min_size()),
                },
                visibility: ShaderStages::VERTEX,
            }],
        });
        let bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("camera bind group"),
            layout: &bind_group_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("box pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("box pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[VertexBufferLayout {
                    array_stride: size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: VertexFormat::Float32x3,
                    }],
                }],
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(viewport.config.format.into())],
            }),
            primitive: PrimitiveState::default(),
            depth_stencil: Some(DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: CompareFunction::Less,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            uniform_buffer,
            bind_group,
        }
    }

    pub fn render(&self, gpu_context: &GPUContext, viewport: &Viewport, uniform: &CameraUniform) {
        gpu_context
            .queue
            .write_buffer(&self.uniform_buffer, 0, &encode_uniform(uniform));

        let output = match viewport.surface.get_current_texture() {
            Ok(output) => output,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                debug!("surface lost, reconfiguring");
                viewport.reconfigure(&gpu_context.device);
                return;
            }
            Err(err) => {
                warn!("failed to acquire surface texture {err}");
                return;
            }
        };
        let view = output.texture.create_view(&Default::default());
        let mut encoder = gpu_context
            .device
            .create_command_encoder(&Default::default());

        {
            let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("box render pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(viewport.background),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: &viewport.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, Some(&self.bind_group), &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), IndexFormat::Uint32);
            render_pass.draw_indexed(0..CUBE_INDICES.len() as u32, 0, 0..1);
        }

        viewport.window.pre_present_notify();
        gpu_context.queue.submit(Some(encoder.finish()));
        output.present();
    }
}

fn encode_uniform(uniform: &CameraUniform) -> Vec<u8> {
    let mut buffer = UniformBuffer::new(Vec::new());
    if let Err(err) = buffer.write(uniform) {
        warn!("failed to encode camera uniform {err}");
    }
    buffer.into_inner()
}
