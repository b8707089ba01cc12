//! Renderer error taxonomy.

use thiserror::Error;

/// Fatal renderer-initialization failures. Per-frame conditions (lost or
/// outdated surfaces) are handled in the frame loop and logged, never
/// surfaced through this type.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The driver rejected shader compilation or pipeline creation. Carries
    /// the validation diagnostic verbatim.
    #[error("shader build failed during {stage}: {message}")]
    ShaderBuild {
        stage: &'static str,
        message: String,
    },

    /// Graphics context or buffer acquisition failed.
    #[error("graphics resource error: {0}")]
    Resource(String),
}

impl From<wgpu::CreateSurfaceError> for RenderError {
    fn from(err: wgpu::CreateSurfaceError) -> Self {
        RenderError::Resource(err.to_string())
    }
}

impl From<wgpu::RequestDeviceError> for RenderError {
    fn from(err: wgpu::RequestDeviceError) -> Self {
        RenderError::Resource(err.to_string())
    }
}
