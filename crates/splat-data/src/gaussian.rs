//! A single anisotropic 3D Gaussian primitive.

use glam::{Quat, Vec3};

/// One splat of the reconstruction.
///
/// Field ranges expected by the renderer:
/// - `scale` components strictly positive
/// - `rotation` a unit quaternion
/// - `opacity` in (0, 1]
/// - `color` channels in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gaussian {
    /// Mean position in world space.
    pub mean: Vec3,
    /// Extent along the local principal axes, before rotation.
    pub scale: Vec3,
    /// Unit quaternion mapping local axes to world axes.
    pub rotation: Quat,
    /// Peak density at the mean.
    pub opacity: f32,
    /// Flat RGB color; no view-dependent shading.
    pub color: Vec3,
}

impl Gaussian {
    pub fn new(mean: Vec3, scale: Vec3, rotation: Quat, opacity: f32, color: Vec3) -> Self {
        Self {
            mean,
            scale,
            rotation,
            opacity,
            color,
        }
    }

    /// Record with the documented defaults for every field except `color`,
    /// which has no default (its absence in a scene file is a load error).
    pub fn with_color(color: Vec3) -> Self {
        Self {
            mean: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: Quat::IDENTITY,
            opacity: 1.0,
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_color_uses_documented_defaults() {
        let g = Gaussian::with_color(Vec3::new(0.2, 0.4, 0.6));
        assert_eq!(g.mean, Vec3::ZERO);
        assert_eq!(g.scale, Vec3::ONE);
        assert_eq!(g.rotation, Quat::IDENTITY);
        assert_eq!(g.opacity, 1.0);
        assert_eq!(g.color, Vec3::new(0.2, 0.4, 0.6));
    }
}
