//! Scene container: the authoritative splat set.

use crate::gaussian::Gaussian;

/// An insertion-ordered collection of Gaussians.
///
/// Order carries no rendering meaning (compositing is order-independent by
/// construction) but is preserved so a loaded scene saves back in the same
/// sequence.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    gaussians: Vec<Gaussian>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_gaussians(gaussians: Vec<Gaussian>) -> Self {
        Self { gaussians }
    }

    pub fn len(&self) -> usize {
        self.gaussians.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gaussians.is_empty()
    }

    pub fn push(&mut self, gaussian: Gaussian) {
        self.gaussians.push(gaussian);
    }

    pub fn clear(&mut self) {
        self.gaussians.clear();
    }

    /// Replace the whole splat set (bulk load).
    pub fn set_gaussians(&mut self, gaussians: Vec<Gaussian>) {
        self.gaussians = gaussians;
    }

    pub fn as_slice(&self) -> &[Gaussian] {
        &self.gaussians
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Gaussian> {
        self.gaussians.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn push_and_clear_keep_order() {
        let mut scene = Scene::new();
        assert!(scene.is_empty());

        for i in 0..4 {
            let mut g = Gaussian::with_color(Vec3::splat(0.5));
            g.mean = Vec3::new(i as f32, 0.0, 0.0);
            scene.push(g);
        }
        assert_eq!(scene.len(), 4);
        for (i, g) in scene.iter().enumerate() {
            assert_eq!(g.mean.x, i as f32);
        }

        scene.clear();
        assert!(scene.is_empty());
    }
}
