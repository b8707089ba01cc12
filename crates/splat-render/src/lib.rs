//! Interactive billboard renderer for Gaussian splat scenes.

pub mod camera;
pub mod clock;
pub mod error;
pub mod gpu_types;
pub mod overlay;
pub mod pipeline;
pub mod renderer;
pub mod window;

pub use camera::Camera;
pub use error::RenderError;
pub use renderer::SplatRenderer;
pub use window::{run, ViewerConfig};
