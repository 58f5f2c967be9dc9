// pose.rs — camera pose and its interpolation

use glam::{Mat3, Quat, Vec3};

/// Below this `1 - |dot|` the two rotations are treated as parallel and
/// blended with a normalized lerp instead of a slerp.
const SLERP_PARALLEL_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation: orientation.normalize(),
        }
    }

    /// A pose at `position` looking at `target`, with world +Y as the up hint.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self::new(position, look_rotation(target - position, Vec3::Y))
    }

    /// Unit view direction (camera looks down its local -Z).
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// The same orientation, displaced along the view direction.
    pub fn moved_along_view(&self, distance: f32) -> Self {
        Self {
            position: self.position + self.forward() * distance,
            orientation: self.orientation,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.orientation.is_finite()
    }
}

/// Rotation whose local -Z points along `forward`.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let f = forward.normalize_or_zero();
    if f == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let mut r = f.cross(up);
    if r.length_squared() < 1e-12 {
        // Looking straight along the up hint: pick any perpendicular.
        r = f.any_orthonormal_vector();
    }
    let r = r.normalize();
    let u = r.cross(f);
    Quat::from_mat3(&Mat3::from_cols(r, u, -f)).normalize()
}

/// Spherical interpolation that always takes the shorter arc.
pub fn slerp_shortest(from: Quat, to: Quat, t: f32) -> Quat {
    let mut to = to;
    let mut dot = from.dot(to);
    if dot < 0.0 {
        to = -to;
        dot = -dot;
    }

    if 1.0 - dot < SLERP_PARALLEL_EPSILON {
        return from.lerp(to, t).normalize();
    }

    let theta = dot.clamp(-1.0, 1.0).acos();
    let sin_theta = theta.sin();
    let a = ((1.0 - t) * theta).sin() / sin_theta;
    let b = (t * theta).sin() / sin_theta;
    (from * a + to * b).normalize()
}

/// Pure pose blend: lerp on position, shortest-arc slerp on orientation.
/// The endpoints are returned exactly at `t <= 0` and `t >= 1`.
pub fn interpolate(start: &Pose, target: &Pose, t: f32) -> Pose {
    if t <= 0.0 {
        return *start;
    }
    if t >= 1.0 {
        return *target;
    }
    Pose {
        position: start.position.lerp(target.position, t),
        orientation: slerp_shortest(start.orientation, target.orientation, t),
    }
}

/// Fraction of the remaining distance closed in `dt` seconds for an
/// exponential approach with `rate` per second.
pub fn damp_factor(rate: f32, dt: f32) -> f32 {
    if rate <= 0.0 || dt <= 0.0 {
        return 0.0;
    }
    1.0 - (-rate * dt).exp()
}
