// projection.rs — projection transforms and the matrix blender

use glam::Mat4;

/// Minimum |det| for a blended projection to be inverted.
const SINGULAR_EPSILON: f32 = 1e-12;

/// Right-handed perspective with a [0,1] depth range (wgpu clip space).
pub fn perspective(fov_deg: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh(fov_deg.to_radians(), aspect, near, far)
}

/// Orthographic frustum centered on the view axis. `half_width`/`half_height`
/// are in pixels and get divided by `zoom`, so zoom is pixels per world unit.
pub fn orthographic(half_width: f32, half_height: f32, zoom: f32, near: f32, far: f32) -> Mat4 {
    let hw = half_width / zoom;
    let hh = half_height / zoom;
    Mat4::orthographic_rh(-hw, hw, -hh, hh, near, far)
}

/// Entry-wise lerp of two 4×4 transforms. Not a geometric projection blend:
/// it only looks right because both sides share the same aspect ratio.
pub fn blend(from: &Mat4, to: &Mat4, t: f32) -> Mat4 {
    if t <= 0.0 {
        return *from;
    }
    if t >= 1.0 {
        return *to;
    }
    let a = from.to_cols_array();
    let b = to.to_cols_array();
    let mut out = [0.0f32; 16];
    for i in 0..16 {
        out[i] = a[i] + (b[i] - a[i]) * t;
    }
    Mat4::from_cols_array(&out)
}

/// Inverse of `m`, or `None` when it is singular or non-finite.
pub fn try_inverse(m: &Mat4) -> Option<Mat4> {
    if !m.is_finite() || m.determinant().abs() < SINGULAR_EPSILON {
        return None;
    }
    let inv = m.inverse();
    inv.is_finite().then_some(inv)
}
