use wgpu::util::DeviceExt;

use crate::quad::{self, QuadVertices, QUAD_VERTEX_COUNT};

/// Vertex buffers for the quad: positions, colours, and pixel texcoords,
/// bound at slots 0, 1 and 2.
pub(crate) struct QuadGeometry {
    pub positions: wgpu::Buffer,
    pub colours: wgpu::Buffer,
    pub texcoords: wgpu::Buffer,
}

impl QuadGeometry {
    pub const VERTEX_COUNT: u32 = QUAD_VERTEX_COUNT as u32;

    pub fn build(
        device: &wgpu::Device,
        quad: &QuadVertices,
        texture_size: (u32, u32),
    ) -> Self {
        let texcoords = quad::texture_coordinates(texture_size.0, texture_size.1);
        let colours = quad::vertex_colours();
        Self {
            positions: vertex_buffer(device, "quad positions", bytemuck::cast_slice(quad.points())),
            colours: vertex_buffer(device, "quad colours", bytemuck::cast_slice(&colours)),
            texcoords: vertex_buffer(device, "quad texcoords", bytemuck::cast_slice(&texcoords)),
        }
    }

    pub fn layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
        const POSITION: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
        const COLOUR: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
        const TEXCOORD: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x2];
        [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &POSITION,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &COLOUR,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &TEXCOORD,
            },
        ]
    }
}

fn vertex_buffer(device: &wgpu::Device, label: &str, contents: &[u8]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents,
        usage: wgpu::BufferUsages::VERTEX,
    })
}
