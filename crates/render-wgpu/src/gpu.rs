use std::path::Path;

use bytemuck::{Pod, Zeroable};
use voxrelic_math::Mat4;
use voxrelic_render::DrawCall;
use wgpu::util::DeviceExt;

use crate::shaders;
use crate::textures::{self, TextureError};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view: [f32; 16],
    proj: [f32; 16],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    uv: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model: [f32; 16],
    color: [f32; 4],
    /// x = texture blend weight, y = texture selector as a float.
    material: [f32; 2],
}

impl InstanceData {
    fn from_call(call: &DrawCall) -> Self {
        Self {
            model: call.model.m,
            color: call.color,
            material: [call.tex_weight, call.texture.index() as f32],
        }
    }
}

/// Shared unit-cube mesh: 24 vertices (4 per face, with per-face UVs over
/// the full texture) and 36 indices.
fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        Vertex { position: [-p, -p,  p], uv: [0.0, 0.0] },
        Vertex { position: [ p, -p,  p], uv: [1.0, 0.0] },
        Vertex { position: [ p,  p,  p], uv: [1.0, 1.0] },
        Vertex { position: [-p,  p,  p], uv: [0.0, 1.0] },
        // -Z face
        Vertex { position: [ p, -p, -p], uv: [0.0, 0.0] },
        Vertex { position: [-p, -p, -p], uv: [1.0, 0.0] },
        Vertex { position: [-p,  p, -p], uv: [1.0, 1.0] },
        Vertex { position: [ p,  p, -p], uv: [0.0, 1.0] },
        // +X face
        Vertex { position: [ p, -p,  p], uv: [0.0, 0.0] },
        Vertex { position: [ p, -p, -p], uv: [1.0, 0.0] },
        Vertex { position: [ p,  p, -p], uv: [1.0, 1.0] },
        Vertex { position: [ p,  p,  p], uv: [0.0, 1.0] },
        // -X face
        Vertex { position: [-p, -p, -p], uv: [0.0, 0.0] },
        Vertex { position: [-p, -p,  p], uv: [1.0, 0.0] },
        Vertex { position: [-p,  p,  p], uv: [1.0, 1.0] },
        Vertex { position: [-p,  p, -p], uv: [0.0, 1.0] },
        // +Y face
        Vertex { position: [-p,  p,  p], uv: [0.0, 0.0] },
        Vertex { position: [ p,  p,  p], uv: [1.0, 0.0] },
        Vertex { position: [ p,  p, -p], uv: [1.0, 1.0] },
        Vertex { position: [-p,  p, -p], uv: [0.0, 1.0] },
        // -Y face
        Vertex { position: [-p, -p, -p], uv: [0.0, 0.0] },
        Vertex { position: [ p, -p, -p], uv: [1.0, 0.0] },
        Vertex { position: [ p, -p,  p], uv: [1.0, 1.0] },
        Vertex { position: [-p, -p,  p], uv: [0.0, 1.0] },
    ];
    #[rustfmt::skip]
    let indices: Vec<u16> = vec![
        0,1,2, 2,3,0,       // +Z
        4,5,6, 6,7,4,       // -Z
        8,9,10, 10,11,8,    // +X
        12,13,14, 14,15,12, // -X
        16,17,18, 18,19,16, // +Y
        20,21,22, 22,23,20, // -Y
    ];
    (vertices, indices)
}

/// wgpu renderer: one instanced cube pass per frame.
pub struct WgpuRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    depth_texture: wgpu::TextureView,
}

impl WgpuRenderer {
    /// Build the pipeline, the shared cube mesh, and the two bound
    /// textures. Texture problems are the only error and abort startup.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        assets_dir: Option<&Path>,
    ) -> Result<Self, TextureError> {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view: Mat4::IDENTITY.m,
                proj: Mat4::IDENTITY.m,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // Texture provider: dirt on unit 0, wall on unit 1, both bound
        // before the first frame renders.
        let (dirt, wall) = textures::load_pair(assets_dir)?;
        let dirt_view = upload_texture(device, queue, &dirt, "dirt_texture");
        let wall_view = upload_texture(device, queue, &wall, "wall_texture");

        // Nearest filtering and repeat wrap, keeping the blocky look.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("block_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                texture_layout_entry(0),
                texture_layout_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture_bind_group"),
            layout: &texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&dirt_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&wall_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cube_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::CUBE_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cube_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x2,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                            7 => Float32x2,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let (verts, indices) = cube_mesh();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_index_buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        // Worst case is the whole block list plus the fixed draws; the
        // 32x32x4 world tops out well under this.
        let max_instances = 8192u32;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (max_instances as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = create_depth_texture(device, width, height);

        Ok(Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            texture_bind_group,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            instance_buffer,
            max_instances,
            depth_texture,
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = create_depth_texture(device, width, height);
    }

    /// Render one frame of draw calls to `target`.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        view: &Mat4,
        proj: &Mat4,
        calls: &[DrawCall],
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view: view.m,
                proj: proj.m,
            }),
        );

        let instances: Vec<InstanceData> = calls
            .iter()
            .take(self.max_instances as usize)
            .map(InstanceData::from_call)
            .collect();
        if instances.len() < calls.len() {
            tracing::warn!(
                dropped = calls.len() - instances.len(),
                "draw list exceeded instance buffer"
            );
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if !instances.is_empty() {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                pass.set_bind_group(1, &self.texture_bind_group, &[]);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..self.index_count, 0, 0..instances.len() as u32);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

fn texture_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    img: &image::RgbaImage,
    label: &str,
) -> wgpu::TextureView {
    let (width, height) = img.dimensions();
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        img,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );
    texture.create_view(&Default::default())
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxrelic_render::TextureId;

    #[test]
    fn cube_mesh_has_24_vertices_and_36_indices() {
        let (verts, indices) = cube_mesh();
        assert_eq!(verts.len(), 24);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| (i as usize) < verts.len()));
    }

    #[test]
    fn instance_data_packs_the_draw_call() {
        let call = DrawCall {
            model: Mat4::IDENTITY.translate(6.5, 0.0, 6.5),
            color: [1.0, 0.85, 0.3, 1.0],
            tex_weight: 0.15,
            texture: TextureId::Wall,
        };
        let inst = InstanceData::from_call(&call);
        assert_eq!(inst.model, call.model.m);
        assert_eq!(inst.material, [0.15, 1.0]);
        assert_eq!(
            std::mem::size_of::<InstanceData>(),
            22 * std::mem::size_of::<f32>()
        );
    }
}
