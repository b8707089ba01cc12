//! Fly camera: yaw/pitch orientation, WASD-style translation, view and
//! projection derivations.

use glam::{Mat4, Vec3};

/// Pitch is kept strictly inside (-89, 89) degrees to stay away from the
/// view-flip at the poles.
pub const PITCH_LIMIT: f32 = 89.0;

/// First-person camera. Yaw and pitch are in degrees; yaw -90 faces -Z.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Mouse look sensitivity in degrees per pixel.
    pub sensitivity: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.5, 4.0),
            yaw: -90.0,
            pitch: 0.0,
            fov_y: 60.0,
            znear: 0.1,
            zfar: 100.0,
            speed: 2.5,
            sensitivity: 0.1,
        }
    }
}

/// Held-key movement flags for one frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub up: bool,
}

impl Camera {
    /// Forward unit vector, re-derived from yaw/pitch on every call so the
    /// basis is always consistent with the current angles.
    pub fn forward(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize()
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), self.up())
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), aspect, self.znear, self.zfar)
    }

    /// Apply a mouse delta. Y is inverted so that moving the mouse up looks
    /// up; pitch is clamped to `±PITCH_LIMIT`.
    pub fn on_look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Translate along the camera basis for one frame.
    ///
    /// The summed direction is not renormalized: holding two keys moves
    /// sqrt(2) times faster than one. This is a long-standing property of
    /// the controls, kept as-is.
    pub fn on_move(&mut self, input: MoveInput, dt: f32) {
        let mut direction = Vec3::ZERO;
        if input.forward {
            direction += self.forward();
        }
        if input.backward {
            direction -= self.forward();
        }
        if input.right {
            direction += self.right();
        }
        if input.left {
            direction -= self.right();
        }
        if input.up {
            direction += self.up();
        }
        if input.down {
            direction -= self.up();
        }
        self.position += direction * self.speed * dt;
    }
}

/// Uniform buffer contents for the splat shader: the two matrices the
/// vertex stage consumes.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new(view: Mat4, proj: Mat4) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
        }
    }
}
