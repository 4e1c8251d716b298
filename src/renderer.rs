// --- File: renderer.rs ---
use crate::constants::BACKGROUND_COLOR;
use crate::display::RenderView;
use crate::error::RendererError;
use crate::particle::Particle;
use bytemuck::{Pod, Zeroable};
use std::mem::size_of;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::{dpi::PhysicalSize, window::Window};

// --- GPU Data Structures ---

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct Corner {
    offset: [f32; 2],
}

const CORNER_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

// Unit square around the particle centre; the fragment stage cuts the disc out of it.
const CORNERS: [Corner; 4] = [
    Corner { offset: [-1.0, -1.0] },
    Corner { offset: [1.0, -1.0] },
    Corner { offset: [1.0, 1.0] },
    Corner { offset: [-1.0, 1.0] },
];
const CORNER_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Per-particle instance record, laid out to match `InstanceInput` in the shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct ParticleInstance {
    grid_position: [f32; 2],
    radius: f32,
    color: [f32; 4],
}

const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![1 => Float32x2, 2 => Float32, 3 => Float32x4];

impl From<&Particle> for ParticleInstance {
    fn from(particle: &Particle) -> Self {
        Self {
            grid_position: [particle.x as f32, particle.y as f32],
            radius: particle.radius,
            color: particle.category.color(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct GridUniforms {
    grid_size: [f32; 2],
    _padding: [f32; 2],
}

/// Vertex buffer for instances that doubles in capacity whenever a frame outgrows it.
struct InstanceBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
}

impl InstanceBuffer {
    fn allocate(device: &wgpu::Device, capacity: usize) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Particle Instances"),
            size: (capacity * size_of::<ParticleInstance>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer, capacity }
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device, needed: usize) {
        if needed <= self.capacity {
            return;
        }
        let capacity = needed.next_power_of_two();
        log::info!(
            "Growing instance buffer from {} to {} particles",
            self.capacity,
            capacity
        );
        *self = Self::allocate(device, capacity);
    }
}

// --- Renderer ---

/// Draws the engine's particles as instanced discs, mapping the grid onto the whole surface.
pub struct Renderer<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    pipeline: wgpu::RenderPipeline,
    corner_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instances: InstanceBuffer,
    staging: Vec<ParticleInstance>,
    grid_bind_group: wgpu::BindGroup,
}

impl Renderer<'static> {
    pub async fn new(
        window: Arc<Window>,
        grid_size: (u32, u32),
        expected_particles: usize,
    ) -> Result<Self, RendererError> {
        let inner = window.inner_size();
        let size = PhysicalSize::new(inner.width.max(1), inner.height.max(1));
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RendererError::NoAdapter)?;
        log::info!("Using adapter {:?}", adapter.get_info().name);
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Dendrite Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| caps.formats.first().copied())
            .ok_or(RendererError::NoSurfaceFormat)?;
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let (grid_layout, grid_bind_group) = grid_binding(&device, grid_size);
        let pipeline = particle_pipeline(&device, &grid_layout, format);
        let corner_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Disc Corners"),
            contents: bytemuck::cast_slice(&CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Disc Indices"),
            contents: bytemuck::cast_slice(&CORNER_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        let capacity = expected_particles.max(1024);
        let instances = InstanceBuffer::allocate(&device, capacity);

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            size,
            pipeline,
            corner_buffer,
            index_buffer,
            instances,
            staging: Vec::with_capacity(capacity),
            grid_bind_group,
        })
    }
}

impl<'a> Renderer<'a> {
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let new_size = PhysicalSize::new(new_size.width.max(1), new_size.height.max(1));
        if new_size == self.size {
            return;
        }
        self.size = new_size;
        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.surface.configure(&self.device, &self.surface_config);
        log::debug!("Surface resized to {}x{}", new_size.width, new_size.height);
    }

    /// Reconfigures the surface at its current size, e.g. after it was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Clears to the background and draws every visible particle, aggregate first.
    pub fn render(&mut self, view: &RenderView<'_>) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let target = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.staging.clear();
        self.staging.extend(view.visible().map(ParticleInstance::from));
        let count = self.staging.len();
        self.instances.ensure_capacity(&self.device, count);
        if count > 0 {
            self.queue
                .write_buffer(&self.instances.buffer, 0, bytemuck::cast_slice(&self.staging));
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Particle Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if count > 0 {
                let used = (count * size_of::<ParticleInstance>()) as wgpu::BufferAddress;
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.grid_bind_group, &[]);
                pass.set_vertex_buffer(0, self.corner_buffer.slice(..));
                pass.set_vertex_buffer(1, self.instances.buffer.slice(..used));
                pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..CORNER_INDICES.len() as u32, 0, 0..count as u32);
            }
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

// --- Setup Helpers ---

fn grid_binding(
    device: &wgpu::Device,
    grid_size: (u32, u32),
) -> (wgpu::BindGroupLayout, wgpu::BindGroup) {
    let uniforms = GridUniforms {
        grid_size: [grid_size.0 as f32, grid_size.1 as f32],
        _padding: [0.0; 2],
    };
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Grid Uniforms"),
        contents: bytemuck::bytes_of(&uniforms),
        usage: wgpu::BufferUsages::UNIFORM,
    });
    let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Grid Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Grid Bind Group"),
        layout: &layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });
    (layout, bind_group)
}

fn particle_pipeline(
    device: &wgpu::Device,
    grid_layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Particle Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Particle Pipeline Layout"),
        bind_group_layouts: &[grid_layout],
        push_constant_ranges: &[],
    });
    let buffers = [
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Corner>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &CORNER_ATTRIBUTES,
        },
        wgpu::VertexBufferLayout {
            array_stride: size_of::<ParticleInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &INSTANCE_ATTRIBUTES,
        },
    ];
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Particle Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Category;

    #[test]
    fn instance_record_matches_attribute_offsets() {
        assert_eq!(size_of::<ParticleInstance>(), 28);
        assert_eq!(INSTANCE_ATTRIBUTES[1].offset, 8);
        assert_eq!(INSTANCE_ATTRIBUTES[2].offset, 12);
        assert_eq!(size_of::<GridUniforms>(), 16);
    }

    #[test]
    fn instance_carries_position_radius_and_category_colour() {
        let particle = Particle::new(12, 34, 1.0, Category::Spawned);
        let instance = ParticleInstance::from(&particle);
        assert_eq!(instance.grid_position, [12.0, 34.0]);
        assert_eq!(instance.radius, 1.0);
        assert_eq!(instance.color, Category::Spawned.color());
    }
}
// --- End of File: renderer.rs ---
