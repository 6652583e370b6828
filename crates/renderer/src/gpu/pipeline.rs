use std::path::{Path, PathBuf};

use crate::compile::{compile_shader, load_source};
use crate::effects::EffectCategory;
use crate::error::{Result, Stage, ViewerError};
use crate::types::ShaderSources;

use super::geometry::QuadGeometry;

/// Bind group layouts shared by every pipeline: the image at set 0 and the
/// effect uniforms at set 1.
pub(crate) struct PipelineLayouts {
    pub texture_layout: wgpu::BindGroupLayout,
    pub uniform_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
}

impl PipelineLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("image layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("effect layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("image pipeline layout"),
            bind_group_layouts: &[&texture_layout, &uniform_layout],
            push_constant_ranges: &[],
        });

        Self {
            texture_layout,
            uniform_layout,
            pipeline_layout,
        }
    }
}

/// A linked vertex + fragment program for one effect category.
pub(crate) struct ShaderPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub category: EffectCategory,
    pub fragment_source: PathBuf,
}

impl ShaderPipeline {
    pub fn new(
        device: &wgpu::Device,
        layouts: &PipelineLayouts,
        surface_format: wgpu::TextureFormat,
        sources: &ShaderSources,
        category: EffectCategory,
    ) -> Result<Self> {
        let vertex_module = compile_from_file(device, Stage::Vertex, &sources.vertex)?;
        let fragment_path = sources.fragment(category);
        let fragment_module = compile_from_file(device, Stage::Fragment, fragment_path)?;

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{category} pipeline")),
            layout: Some(&layouts.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("main"),
                buffers: &QuadGeometry::layouts(),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(ViewerError::ProgramLink {
                message: error.to_string(),
            });
        }

        Ok(Self {
            pipeline,
            category,
            fragment_source: fragment_path.to_path_buf(),
        })
    }
}

fn compile_from_file(device: &wgpu::Device, stage: Stage, path: &Path) -> Result<wgpu::ShaderModule> {
    let source = load_source(path)?;
    let module = compile_shader(device, stage, path, &source).inspect_err(|error| {
        tracing::error!(path = %path.display(), %error, "shader compilation failed");
    })?;
    tracing::debug!(%stage, path = %path.display(), "compiled shader");
    Ok(module)
}
