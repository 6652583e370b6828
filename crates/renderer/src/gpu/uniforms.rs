use bytemuck::{Pod, Zeroable};

use crate::effects::EffectSelection;

/// Mirrors the `EffectParams` std140 block; padded to 16 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub(crate) struct EffectUniforms {
    pub colour_effect: i32,
    pub filter_effect: i32,
    pub blur_effect: i32,
    _padding: i32,
}

impl EffectUniforms {
    pub fn from_selection(selection: &EffectSelection) -> Self {
        let [colour_effect, filter_effect, blur_effect] = selection.as_uniform();
        Self {
            colour_effect,
            filter_effect,
            blur_effect,
            _padding: 0,
        }
    }
}

/// Uniform buffer plus the bind group that exposes it at set 1.
pub(crate) struct EffectBuffer {
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    last_written: Option<EffectUniforms>,
}

impl EffectBuffer {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("effect uniform buffer"),
            size: std::mem::size_of::<EffectUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("effect bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self {
            buffer,
            bind_group,
            last_written: None,
        }
    }

    /// Queues a write when `uniforms` differ from the last values sent.
    pub fn write(&mut self, queue: &wgpu::Queue, uniforms: EffectUniforms) {
        if self.last_written == Some(uniforms) {
            return;
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&uniforms));
        self.last_written = Some(uniforms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectCategory;

    #[test]
    fn layout_matches_std140_block() {
        assert_eq!(std::mem::size_of::<EffectUniforms>(), 16);
    }

    #[test]
    fn selection_maps_to_fields() {
        let mut selection = EffectSelection::default();
        selection.cycle(EffectCategory::Filter);
        selection.cycle(EffectCategory::Blur);
        selection.cycle(EffectCategory::Blur);
        let uniforms = EffectUniforms::from_selection(&selection);
        assert_eq!(
            bytemuck::cast::<_, [i32; 4]>(uniforms),
            [0, 1, 2, 0]
        );
    }
}
