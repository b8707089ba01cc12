//! Splat render pipeline, shading constants and depth-buffer setup.

use crate::error::RenderError;
use crate::gpu_types::{QuadVertex, SplatInstance};

/// Peak-density fraction below which a fragment is invisible. Shared by the
/// footprint-radius derivation and the fragment discard in `splat.wgsl`.
pub const ALPHA_CUTOFF: f32 = 0.03;

/// Upper bound on the billboard footprint radius, in quad units.
pub const MAX_FOOTPRINT: f32 = 1.5;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const SPLAT_SHADER: &str = include_str!("shaders/splat.wgsl");

/// World-space footprint radius for a given peak opacity.
///
/// CPU reference for the vertex-stage cutoff: the radius at which
/// `alpha = opacity * t^2` with `t = 1 - r^2` falls to [`ALPHA_CUTOFF`],
/// approximated as `sqrt(2 ln(opacity / cutoff))` and clamped to
/// [`MAX_FOOTPRINT`].
pub fn footprint_radius(opacity: f32) -> f32 {
    let op = opacity.max(ALPHA_CUTOFF);
    let r2 = 2.0 * (op / ALPHA_CUTOFF).ln();
    r2.max(0.0).sqrt().min(MAX_FOOTPRINT)
}

/// The instanced billboard pipeline and its camera bind group layout.
pub struct SplatPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl SplatPipeline {
    /// Build the shader module and pipeline. Validation failures in either
    /// step are captured through an error scope and surfaced as
    /// [`RenderError::ShaderBuild`] with the driver diagnostic.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> Result<Self, RenderError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Splat Shader"),
            source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(SPLAT_SHADER)),
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::ShaderBuild {
                stage: "shader compilation",
                message: err.to_string(),
            });
        }

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Splat Bind Group Layout"),
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Splat Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Splat Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[QuadVertex::layout(), SplatInstance::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    // Premultiplied-alpha accumulation: the fragment stage
                    // outputs color already scaled by alpha.
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                            operation: wgpu::BlendOperation::Add,
                        },
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            // Depth testing stays on so opaque geometry drawn earlier
            // occludes splats; depth writes stay off so overlapping splats
            // accumulate through blending.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::ShaderBuild {
                stage: "pipeline creation",
                message: err.to_string(),
            });
        }

        Ok(Self {
            pipeline,
            bind_group_layout,
        })
    }
}

pub fn create_depth_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_is_zero_at_the_cutoff_opacity() {
        assert_eq!(footprint_radius(ALPHA_CUTOFF), 0.0);
    }

    #[test]
    fn full_opacity_radius_clamps_to_max() {
        // Unclamped value is sqrt(2 ln(1/0.03)) ~ 1.868.
        let unclamped = (2.0 * (1.0f32 / ALPHA_CUTOFF).ln()).sqrt();
        assert!((unclamped - 1.868).abs() < 1e-3);
        assert_eq!(footprint_radius(1.0), MAX_FOOTPRINT);
    }

    #[test]
    fn radius_grows_monotonically_below_the_clamp() {
        let mut prev = footprint_radius(ALPHA_CUTOFF);
        for i in 1..=20 {
            let opacity = ALPHA_CUTOFF + (0.3 - ALPHA_CUTOFF) * i as f32 / 20.0;
            let r = footprint_radius(opacity);
            assert!(r >= prev);
            prev = r;
        }
    }

    #[test]
    fn sub_cutoff_opacity_does_not_go_negative() {
        assert_eq!(footprint_radius(0.001), 0.0);
        assert_eq!(footprint_radius(0.0), 0.0);
    }

    #[test]
    fn radius_matches_closed_form_below_the_clamp() {
        for opacity in [0.05f32, 0.1, 0.2] {
            let expected = (2.0 * (opacity / ALPHA_CUTOFF).ln()).sqrt();
            assert!((footprint_radius(opacity) - expected).abs() < 1e-6);
            assert!(expected < MAX_FOOTPRINT);
        }
    }
}
