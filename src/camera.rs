// camera.rs — the two virtual cameras and their lenses

use crate::pose::Pose;
use crate::projection;
use glam::{Mat4, Quat, Vec3};

/// Smallest viewport edge used for aspect and frustum math.
pub const MIN_VIEWPORT_DIM: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Perspective,
    Orthographic,
}

impl CameraMode {
    pub fn toggled(self) -> Self {
        match self {
            CameraMode::Perspective => CameraMode::Orthographic,
            CameraMode::Orthographic => CameraMode::Perspective,
        }
    }

    pub fn i18n_key(self) -> &'static str {
        match self {
            CameraMode::Perspective => "mode.perspective",
            CameraMode::Orthographic => "mode.orthographic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Zero-sized edges are clamped so aspect and frustum math stay finite.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(MIN_VIEWPORT_DIM),
            height: height.max(MIN_VIEWPORT_DIM),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn half_extents(&self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lens {
    Perspective {
        fov_deg: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        zoom: f32,
        half_width: f32,
        half_height: f32,
        near: f32,
        far: f32,
    },
}

impl Lens {
    pub fn perspective(fov_deg: f32, viewport: Viewport, near: f32, far: f32) -> Self {
        Lens::Perspective {
            fov_deg,
            aspect: viewport.aspect(),
            near,
            far,
        }
    }

    pub fn orthographic(zoom: f32, viewport: Viewport, near: f32, far: f32) -> Self {
        let (half_width, half_height) = viewport.half_extents();
        Lens::Orthographic {
            zoom,
            half_width,
            half_height,
            near,
            far,
        }
    }

    pub fn mode(&self) -> CameraMode {
        match self {
            Lens::Perspective { .. } => CameraMode::Perspective,
            Lens::Orthographic { .. } => CameraMode::Orthographic,
        }
    }

    /// Field of view in degrees for perspective, zoom for orthographic.
    pub fn intrinsic(&self) -> f32 {
        match *self {
            Lens::Perspective { fov_deg, .. } => fov_deg,
            Lens::Orthographic { zoom, .. } => zoom,
        }
    }

    pub fn set_intrinsic(&mut self, value: f32) {
        match self {
            Lens::Perspective { fov_deg, .. } => *fov_deg = value,
            Lens::Orthographic { zoom, .. } => *zoom = value,
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        match self {
            Lens::Perspective { aspect, .. } => *aspect = viewport.aspect(),
            Lens::Orthographic {
                half_width,
                half_height,
                ..
            } => {
                let (w, h) = viewport.half_extents();
                *half_width = w;
                *half_height = h;
            }
        }
    }

    pub fn projection(&self) -> Mat4 {
        match *self {
            Lens::Perspective {
                fov_deg,
                aspect,
                near,
                far,
            } => projection::perspective(fov_deg, aspect, near, far),
            Lens::Orthographic {
                zoom,
                half_width,
                half_height,
                near,
                far,
            } => projection::orthographic(half_width, half_height, zoom, near, far),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraState {
    pub position: Vec3,
    pub orientation: Quat,
    pub lens: Lens,
    projection: Mat4,
    projection_inverse: Mat4,
}

impl CameraState {
    pub fn new(pose: Pose, lens: Lens) -> Self {
        let mut cam = Self {
            position: pose.position,
            orientation: pose.orientation,
            lens,
            projection: Mat4::IDENTITY,
            projection_inverse: Mat4::IDENTITY,
        };
        cam.update_projection();
        cam
    }

    pub fn mode(&self) -> CameraMode {
        self.lens.mode()
    }

    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position,
            orientation: self.orientation,
        }
    }

    pub fn set_pose(&mut self, pose: &Pose) {
        self.position = pose.position;
        self.orientation = pose.orientation;
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn projection_inverse(&self) -> Mat4 {
        self.projection_inverse
    }

    /// Rebuilds the projection pair from the lens.
    pub fn update_projection(&mut self) {
        self.set_projection(self.lens.projection());
    }

    /// Overwrites the forward transform and re-derives the inverse from it.
    /// A singular input keeps the last good inverse.
    pub fn set_projection(&mut self, m: Mat4) {
        self.projection = m;
        match projection::try_inverse(&m) {
            Some(inv) => self.projection_inverse = inv,
            None => log::debug!("projection is singular, keeping previous inverse"),
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view()
    }
}
