//! GPU-compatible data types and scene packing.

use bytemuck::{Pod, Zeroable};
use splat_data::{Gaussian, Scene};

/// Per-instance payload for one splat: exactly 64 bytes, consumed as four
/// `vec4` per-instance vertex attributes.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SplatInstance {
    /// xyz = mean, w = opacity.
    pub mean_opacity: [f32; 4],
    /// Orientation quaternion xyzw. Carried for oriented-splat use; the
    /// current shading model does not read it.
    pub rotation: [f32; 4],
    /// xyz = scale, w = color red channel.
    pub scale_color_r: [f32; 4],
    /// xy = color green/blue, zw = padding to the 16-byte attribute stride.
    pub color_gb_pad: [f32; 4],
}

const _: () = assert!(std::mem::size_of::<SplatInstance>() == 64);

impl SplatInstance {
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub fn from_gaussian(g: &Gaussian) -> Self {
        Self {
            mean_opacity: [g.mean.x, g.mean.y, g.mean.z, g.opacity],
            rotation: g.rotation.to_array(),
            scale_color_r: [g.scale.x, g.scale.y, g.scale.z, g.color.x],
            color_gb_pad: [g.color.y, g.color.z, 0.0, 0.0],
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
            1 => Float32x4,
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRS,
        }
    }
}

/// One corner of the [-1, 1]^2 billboard quad.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct QuadVertex {
    pub pos: [f32; 2],
}

impl QuadVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRS,
        }
    }
}

/// Two CCW triangles spanning the billboard.
pub const QUAD_VERTICES: [QuadVertex; 6] = [
    QuadVertex { pos: [-1.0, -1.0] },
    QuadVertex { pos: [1.0, -1.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [-1.0, -1.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [-1.0, 1.0] },
];

/// Pack the whole scene into instance records, in scene order. Pure and
/// deterministic: an unchanged scene packs to identical bytes.
pub fn pack_scene(scene: &Scene) -> Vec<SplatInstance> {
    scene.iter().map(SplatInstance::from_gaussian).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use std::mem::offset_of;

    /// Inverse of `SplatInstance::from_gaussian`, test support only.
    fn unpack(inst: &SplatInstance) -> Gaussian {
        Gaussian {
            mean: Vec3::new(
                inst.mean_opacity[0],
                inst.mean_opacity[1],
                inst.mean_opacity[2],
            ),
            scale: Vec3::new(
                inst.scale_color_r[0],
                inst.scale_color_r[1],
                inst.scale_color_r[2],
            ),
            rotation: Quat::from_array(inst.rotation),
            opacity: inst.mean_opacity[3],
            color: Vec3::new(
                inst.scale_color_r[3],
                inst.color_gb_pad[0],
                inst.color_gb_pad[1],
            ),
        }
    }

    fn sample() -> Gaussian {
        Gaussian::new(
            Vec3::new(1.0, -2.0, 3.5),
            Vec3::new(0.1, 0.2, 0.3),
            Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.7),
            0.8,
            Vec3::new(0.25, 0.5, 0.75),
        )
    }

    #[test]
    fn instance_is_64_bytes_with_fixed_word_layout() {
        assert_eq!(SplatInstance::SIZE, 64);
        assert_eq!(offset_of!(SplatInstance, mean_opacity), 0);
        assert_eq!(offset_of!(SplatInstance, rotation), 16);
        assert_eq!(offset_of!(SplatInstance, scale_color_r), 32);
        assert_eq!(offset_of!(SplatInstance, color_gb_pad), 48);
    }

    #[test]
    fn pack_is_deterministic() {
        let g = sample();
        let a = SplatInstance::from_gaussian(&g);
        let b = SplatInstance::from_gaussian(&g);
        assert_eq!(bytemuck::bytes_of(&a), bytemuck::bytes_of(&b));
    }

    #[test]
    fn pack_then_unpack_recovers_all_fields() {
        let g = sample();
        let back = unpack(&SplatInstance::from_gaussian(&g));
        assert!((g.mean - back.mean).length() < 1e-6);
        assert!((g.scale - back.scale).length() < 1e-6);
        assert!((g.rotation.xyz() - back.rotation.xyz()).length() < 1e-6);
        assert!((g.rotation.w - back.rotation.w).abs() < 1e-6);
        assert!((g.opacity - back.opacity).abs() < 1e-6);
        assert!((g.color - back.color).length() < 1e-6);
    }

    #[test]
    fn padding_is_zeroed() {
        let inst = SplatInstance::from_gaussian(&sample());
        assert_eq!(inst.color_gb_pad[2], 0.0);
        assert_eq!(inst.color_gb_pad[3], 0.0);
    }

    #[test]
    fn pack_scene_preserves_count_and_order() {
        let mut scene = Scene::new();
        assert!(pack_scene(&scene).is_empty());

        for i in 0..3 {
            let mut g = Gaussian::with_color(Vec3::splat(0.5));
            g.mean = Vec3::new(i as f32, 0.0, 0.0);
            scene.push(g);
        }
        let instances = pack_scene(&scene);
        assert_eq!(instances.len(), 3);
        for (i, inst) in instances.iter().enumerate() {
            assert_eq!(inst.mean_opacity[0], i as f32);
        }
    }

    #[test]
    fn quad_spans_unit_square_as_two_triangles() {
        assert_eq!(QUAD_VERTICES.len(), 6);
        for v in QUAD_VERTICES {
            assert!(v.pos[0].abs() == 1.0 && v.pos[1].abs() == 1.0);
        }
    }
}
