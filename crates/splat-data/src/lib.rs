//! Scene data for Gaussian splat rendering.
//!
//! - `gaussian`: the per-splat record
//! - `scene`: the insertion-ordered splat set
//! - `codec`: JSON interchange load/save
//! - `generate`: deterministic synthetic test scenes

pub mod codec;
pub mod gaussian;
pub mod generate;
pub mod scene;

pub use codec::LoadError;
pub use gaussian::Gaussian;
pub use scene::Scene;
