//! Deterministic synthetic test scenes.
//!
//! Every generator is a pure function of its parameters: the same seed
//! yields the same scene on every platform, so generated files are usable
//! as fixtures.

use std::f32::consts::TAU;

use glam::{Mat3, Quat, Vec3};

use crate::gaussian::Gaussian;
use crate::scene::Scene;

/// Minimal LCG (Knuth MMIX constants), the same generator the synthetic
/// catalog tooling uses. Not suitable for anything but test data.
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Uniform in [0, 1).
    fn next_f32(&mut self) -> f32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 32) as f64 / (u32::MAX as f64 + 1.0)) as f32
    }

    /// Normal via Box-Muller.
    fn next_gauss(&mut self, mean: f32, std_dev: f32) -> f32 {
        let u1 = self.next_f32().max(f32::MIN_POSITIVE);
        let u2 = self.next_f32();
        mean + std_dev * (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
    }
}

/// Axis-aligned `n^3` grid with an index-gradient color per record.
/// All fields except mean and color keep their defaults.
pub fn grid(per_axis: usize, spacing: f32) -> Scene {
    let n = per_axis.max(1);
    let half = (n as f32 - 1.0) / 2.0;
    let channel = |i: usize| {
        if n > 1 {
            i as f32 / (n as f32 - 1.0)
        } else {
            0.5
        }
    };

    let mut gaussians = Vec::with_capacity(n * n * n);
    for iz in 0..n {
        for iy in 0..n {
            for ix in 0..n {
                let mut g = Gaussian::with_color(Vec3::new(channel(ix), channel(iy), channel(iz)));
                g.mean = Vec3::new(
                    (ix as f32 - half) * spacing,
                    (iy as f32 - half) * spacing,
                    (iz as f32 - half) * spacing,
                );
                gaussians.push(g);
            }
        }
    }
    Scene::from_gaussians(gaussians)
}

/// Spiral galaxy: a warm dense core, five log-spiral arms and a violet haze.
pub fn galaxy(count: usize, seed: u64) -> Scene {
    const RADIUS: f32 = 5.0;
    const ARMS: u32 = 5;
    const ARM_SPREAD: f32 = 0.25;
    const THICKNESS: f32 = 0.18;
    const CORE_FRAC: f32 = 0.18;
    const HAZE_FRAC: f32 = 0.20;

    let core_color = Vec3::new(1.0, 0.95, 0.85);
    let arm_color = Vec3::new(0.25, 0.6, 1.0);
    let haze_color = Vec3::new(0.8, 0.3, 1.0);

    let mut rng = Lcg::new(seed);
    let n_core = (count as f32 * CORE_FRAC) as usize;
    let n_haze = (count as f32 * HAZE_FRAC) as usize;
    let n_arms = count.saturating_sub(n_core + n_haze);

    let mut gaussians = Vec::with_capacity(count);

    for _ in 0..n_core {
        let r = RADIUS * rng.next_f32().powf(2.8) * 0.25;
        let theta = rng.next_f32() * TAU;
        let phi = (2.0 * rng.next_f32() - 1.0).acos();
        let mean = Vec3::new(
            r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin(),
            r * phi.cos() * 0.6,
        );
        let t = (1.0 - r / (RADIUS * 0.25)).clamp(0.0, 1.0);
        let mut g = Gaussian::with_color(arm_color.lerp(core_color, t));
        g.mean = mean;
        gaussians.push(g);
    }

    for _ in 0..n_arms {
        let arm = (rng.next_f32() * ARMS as f32) as u32 % ARMS;
        let arm_offset = TAU * arm as f32 / ARMS as f32;

        let r = (RADIUS * rng.next_f32().powf(0.65)).max(1e-3);
        let k = 4.5;
        let mut angle = k * (r / (RADIUS * 0.02)).ln() + arm_offset;
        angle += rng.next_gauss(0.0, ARM_SPREAD);

        let mean = Vec3::new(
            r * angle.cos(),
            r * angle.sin(),
            rng.next_gauss(0.0, THICKNESS * (0.4 + 0.6 * r / RADIUS)),
        );
        let fade = 0.4 + 0.6 * (1.0 - r / RADIUS);
        let mut g = Gaussian::with_color((arm_color * fade).clamp(Vec3::ZERO, Vec3::ONE));
        g.mean = mean;
        gaussians.push(g);
    }

    for _ in 0..n_haze {
        let r = RADIUS * rng.next_f32().powf(0.9) * 1.2;
        let angle = rng.next_f32() * TAU;
        let mean = Vec3::new(
            r * angle.cos() + rng.next_gauss(0.0, RADIUS * 0.02),
            r * angle.sin() + rng.next_gauss(0.0, RADIUS * 0.02),
            rng.next_gauss(0.0, THICKNESS * 2.5),
        );
        let t = (1.0 - mean.length() / (RADIUS * 1.3)).clamp(0.0, 1.0);
        let mut g = Gaussian::with_color((haze_color * t.powf(1.7)).clamp(Vec3::ZERO, Vec3::ONE));
        g.mean = mean;
        gaussians.push(g);
    }

    Scene::from_gaussians(gaussians)
}

/// Anisotropic ribbon along a (2,3) torus knot: each record is stretched
/// along the local tangent and oriented by quaternion, exercising the full
/// field set.
pub fn ribbon(count: usize, seed: u64) -> Scene {
    const P: f32 = 2.0;
    const Q: f32 = 3.0;
    const R_MAJOR: f32 = 2.7;
    const R_MINOR: f32 = 1.1;

    let knot = |t: f32| {
        let cqt = (Q * t).cos();
        let sqt = (Q * t).sin();
        Vec3::new(
            (R_MAJOR + R_MINOR * cqt) * (P * t).cos(),
            (R_MAJOR + R_MINOR * cqt) * (P * t).sin(),
            R_MINOR * sqt,
        )
    };

    let mut rng = Lcg::new(seed);
    let n = count.max(1);
    let mut gaussians = Vec::with_capacity(n);

    for i in 0..n {
        let t = (i as f32 / n as f32) * TAU * 6.0;
        let center = knot(t);
        let eps = 1e-3;
        let tangent = (knot(t + eps) - knot(t - eps)).normalize();

        // Perpendicular frame for tube-radius jitter.
        let reference = if tangent.y.abs() < 0.9 { Vec3::Y } else { Vec3::X };
        let n1 = tangent.cross(reference).normalize();
        let n2 = tangent.cross(n1);

        let ang = rng.next_f32() * TAU;
        let rad = rng.next_f32().sqrt() * 0.35;
        let mean = center + n1 * (ang.cos() * rad) + n2 * (ang.sin() * rad);

        let roll = (rng.next_f32() - 0.5) * 0.8;
        let rotation = align_z_to(tangent, roll);

        let base = 0.015 + 0.020 * rng.next_f32();
        let scale = Vec3::new(
            base * (0.6 + 0.8 * rng.next_f32()),
            base * (0.6 + 0.8 * rng.next_f32()),
            base * (2.0 + 2.0 * rng.next_f32()),
        );

        let hue = t / (TAU * 6.0);
        let color = hsv_to_rgb(hue, 0.6, 0.9);
        let opacity = 0.4 + 0.5 * rng.next_f32();

        gaussians.push(Gaussian::new(mean, scale, rotation, opacity, color));
    }

    Scene::from_gaussians(gaussians)
}

/// Quaternion whose local +Z axis points along `direction`, with an extra
/// roll around that axis.
fn align_z_to(direction: Vec3, roll: f32) -> Quat {
    let z = direction.normalize();
    let reference = if z.y.abs() < 0.9 { Vec3::Y } else { Vec3::X };
    let x = reference.cross(z).normalize();
    let y = z.cross(x);
    let q = Quat::from_mat3(&Mat3::from_cols(x, y, z));
    (q * Quat::from_axis_angle(Vec3::Z, roll)).normalize()
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let h = h.rem_euclid(1.0) * 6.0;
    let i = h.floor();
    let f = h - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    match i as u32 % 6 {
        0 => Vec3::new(v, t, p),
        1 => Vec3::new(q, v, p),
        2 => Vec3::new(p, v, t),
        3 => Vec3::new(p, q, v),
        4 => Vec3::new(t, p, v),
        _ => Vec3::new(v, p, q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_counts_and_gradient() {
        let scene = grid(3, 0.5);
        assert_eq!(scene.len(), 27);
        // Corner records span the color gradient.
        assert_eq!(scene.as_slice()[0].color, Vec3::ZERO);
        assert_eq!(scene.as_slice()[26].color, Vec3::ONE);
        // Grid is centered on the origin.
        let centroid: Vec3 =
            scene.iter().map(|g| g.mean).sum::<Vec3>() / scene.len() as f32;
        assert!(centroid.length() < 1e-5);
    }

    #[test]
    fn single_cell_grid_uses_mid_gray() {
        let scene = grid(1, 0.5);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.as_slice()[0].color, Vec3::splat(0.5));
    }

    #[test]
    fn galaxy_is_deterministic_per_seed() {
        let a = galaxy(500, 7);
        let b = galaxy(500, 7);
        let c = galaxy(500, 8);
        assert_eq!(a.len(), 500);
        assert_eq!(a.as_slice(), b.as_slice());
        assert_ne!(a.as_slice()[0].mean, c.as_slice()[0].mean);
    }

    #[test]
    fn generated_records_stay_in_range() {
        for scene in [galaxy(300, 3), ribbon(300, 3)] {
            for g in scene.iter() {
                assert!(g.scale.min_element() > 0.0);
                assert!(g.opacity > 0.0 && g.opacity <= 1.0);
                assert!(g.color.min_element() >= 0.0 && g.color.max_element() <= 1.0);
                assert!((g.rotation.length() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn ribbon_orients_long_axis_along_tangent() {
        let scene = ribbon(16, 1);
        for g in scene.iter() {
            // Local Z is the stretched axis; it must be a unit direction.
            let local_z = g.rotation * Vec3::Z;
            assert!((local_z.length() - 1.0).abs() < 1e-4);
            assert!(g.scale.z > g.scale.x.min(g.scale.y));
        }
    }
}
