// orbit.rs — orbit / zoom / pan for the idle orthographic camera

use crate::camera::{CameraState, Lens};
use crate::config::OrbitConfig;
use glam::{Quat, Vec2, Vec3};

/// Keeps the orbit offset away from the poles so the view never flips.
const POLAR_MARGIN: f32 = 0.05;
const MIN_TARGET_DEPTH: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
    /// Vertical motion zooms like the wheel; dragging up zooms in.
    Zoom,
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    enabled: bool,
    target: Vec3,
    drag: Option<DragMode>,
}

impl OrbitControls {
    pub fn new() -> Self {
        Self {
            enabled: false,
            target: Vec3::ZERO,
            drag: None,
        }
    }

    #[cfg(test)]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Enables the controls on `cam`, placing the orbit target on the view
    /// axis at the depth of `focus`.
    pub fn attach(&mut self, cam: &CameraState, focus: Vec3) {
        let pose = cam.pose();
        let depth = (focus - pose.position).dot(pose.forward());
        let depth = if depth.is_finite() && depth > MIN_TARGET_DEPTH {
            depth
        } else {
            MIN_TARGET_DEPTH
        };
        self.target = pose.position + pose.forward() * depth;
        self.enabled = true;
        self.drag = None;
    }

    pub fn detach(&mut self) {
        self.enabled = false;
        self.drag = None;
    }

    pub fn begin_drag(&mut self, mode: DragMode) {
        if self.enabled {
            self.drag = Some(mode);
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Applies a pointer motion in pixels to the active drag, if any.
    pub fn drag(&mut self, cam: &mut CameraState, delta_px: Vec2, cfg: &OrbitConfig) -> bool {
        if !self.enabled {
            return false;
        }
        match self.drag {
            Some(DragMode::Rotate) => self.rotate(cam, delta_px, cfg),
            Some(DragMode::Pan) => self.pan(cam, delta_px),
            Some(DragMode::Zoom) => self.zoom(cam, -delta_px.y * cfg.zoom_drag_speed, cfg),
            None => false,
        }
    }

    fn rotate(&mut self, cam: &mut CameraState, delta_px: Vec2, cfg: &OrbitConfig) -> bool {
        let yaw = Quat::from_rotation_y(-delta_px.x * cfg.rotate_speed);
        let mut rotation = yaw;

        let offset = yaw * (cam.position - self.target);
        let right = yaw * cam.orientation * Vec3::X;
        let pitch = Quat::from_axis_angle(right.normalize(), -delta_px.y * cfg.rotate_speed);
        let pitched = pitch * offset;
        let polar = (pitched.normalize_or_zero().y).clamp(-1.0, 1.0).acos();
        // A large step can jump over the pole; the horizontal heading must not flip.
        let same_side = Vec2::new(offset.x, offset.z).dot(Vec2::new(pitched.x, pitched.z)) > 0.0;
        if same_side && polar > POLAR_MARGIN && polar < std::f32::consts::PI - POLAR_MARGIN {
            rotation = pitch * yaw;
        }

        cam.position = self.target + rotation * (cam.position - self.target);
        cam.orientation = (rotation * cam.orientation).normalize();
        true
    }

    /// Grab-and-drag: the pixel delta goes to NDC and back through the
    /// inverse projection, then the camera moves opposite to it.
    fn pan(&mut self, cam: &mut CameraState, delta_px: Vec2) -> bool {
        let Lens::Orthographic {
            half_width,
            half_height,
            ..
        } = cam.lens
        else {
            return false;
        };
        let ndc = Vec3::new(delta_px.x / half_width, -delta_px.y / half_height, 0.0);
        let view = cam.projection_inverse().transform_vector3(ndc);
        let pose = cam.pose();
        let delta = -(pose.right() * view.x + pose.up() * view.y);
        cam.position += delta;
        self.target += delta;
        true
    }

    /// Wheel zoom on the orthographic lens. Positive lines zoom in.
    pub fn zoom(&mut self, cam: &mut CameraState, lines: f32, cfg: &OrbitConfig) -> bool {
        if !self.enabled || lines == 0.0 || !lines.is_finite() {
            return false;
        }
        let Lens::Orthographic { zoom, .. } = cam.lens else {
            return false;
        };
        let next = (zoom * cfg.zoom_step.powf(lines)).clamp(cfg.min_zoom, cfg.max_zoom);
        if next == zoom {
            return false;
        }
        cam.lens.set_intrinsic(next);
        cam.update_projection();
        true
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Viewport;
    use crate::pose::Pose;
    use approx::assert_abs_diff_eq;

    fn ortho_cam() -> CameraState {
        CameraState::new(
            Pose::looking_at(Vec3::new(0.0, 10.0, 100.0), Vec3::ZERO),
            Lens::orthographic(50.0, Viewport::new(1280, 720), 0.001, 10000.0),
        )
    }

    #[test]
    fn disabled_controls_do_nothing() {
        let cfg = OrbitConfig::default();
        let mut orbit = OrbitControls::new();
        let mut cam = ortho_cam();
        let before = cam.pose();
        orbit.begin_drag(DragMode::Rotate);
        assert!(!orbit.drag(&mut cam, Vec2::new(30.0, 0.0), &cfg));
        assert!(!orbit.zoom(&mut cam, 1.0, &cfg));
        assert_eq!(cam.pose(), before);
    }

    #[test]
    fn attach_targets_focus_depth() {
        let mut orbit = OrbitControls::new();
        let cam = ortho_cam();
        orbit.attach(&cam, Vec3::ZERO);
        assert!(orbit.enabled());
        assert!(orbit.target().abs_diff_eq(Vec3::ZERO, 1e-3));
    }

    #[test]
    fn rotation_keeps_distance_and_faces_target() {
        let cfg = OrbitConfig::default();
        let mut orbit = OrbitControls::new();
        let mut cam = ortho_cam();
        orbit.attach(&cam, Vec3::ZERO);
        let dist = cam.position.distance(orbit.target());
        orbit.begin_drag(DragMode::Rotate);
        assert!(orbit.drag(&mut cam, Vec2::new(120.0, 40.0), &cfg));
        assert_abs_diff_eq!(cam.position.distance(orbit.target()), dist, epsilon = 1e-2);
        let to_target = (orbit.target() - cam.position).normalize();
        assert!(cam.pose().forward().abs_diff_eq(to_target, 1e-4));
    }

    #[test]
    fn pitch_is_held_off_the_pole() {
        let cfg = OrbitConfig::default();
        let mut orbit = OrbitControls::new();
        let mut cam = ortho_cam();
        orbit.attach(&cam, Vec3::ZERO);
        orbit.begin_drag(DragMode::Rotate);
        for _ in 0..200 {
            orbit.drag(&mut cam, Vec2::new(0.0, 50.0), &cfg);
        }
        let dir = (cam.position - orbit.target()).normalize();
        assert!(dir.y.abs() < 1.0 - 1e-4);
    }

    #[test]
    fn zoom_is_clamped() {
        let cfg = OrbitConfig::default();
        let mut orbit = OrbitControls::new();
        let mut cam = ortho_cam();
        orbit.attach(&cam, Vec3::ZERO);
        for _ in 0..500 {
            orbit.zoom(&mut cam, 1.0, &cfg);
        }
        assert_eq!(cam.lens.intrinsic(), cfg.max_zoom);
        for _ in 0..500 {
            orbit.zoom(&mut cam, -1.0, &cfg);
        }
        assert_eq!(cam.lens.intrinsic(), cfg.min_zoom);
        assert_eq!(cam.projection(), cam.lens.projection());
    }

    #[test]
    fn zoom_drag_is_clamped_and_follows_drag_direction() {
        let cfg = OrbitConfig::default();
        let mut orbit = OrbitControls::new();
        let mut cam = ortho_cam();
        orbit.attach(&cam, Vec3::ZERO);
        let before = cam.pose();
        orbit.begin_drag(DragMode::Zoom);

        assert!(orbit.drag(&mut cam, Vec2::new(0.0, -20.0), &cfg));
        assert!(cam.lens.intrinsic() > 50.0);
        assert!(!orbit.drag(&mut cam, Vec2::new(35.0, 0.0), &cfg));

        for _ in 0..500 {
            orbit.drag(&mut cam, Vec2::new(0.0, -40.0), &cfg);
        }
        assert_eq!(cam.lens.intrinsic(), cfg.max_zoom);
        for _ in 0..500 {
            orbit.drag(&mut cam, Vec2::new(0.0, 40.0), &cfg);
        }
        assert_eq!(cam.lens.intrinsic(), cfg.min_zoom);
        assert_eq!(cam.projection(), cam.lens.projection());
        assert_eq!(cam.pose(), before);
    }

    #[test]
    fn pan_moves_camera_and_target_together() {
        let cfg = OrbitConfig::default();
        let mut orbit = OrbitControls::new();
        let mut cam = ortho_cam();
        orbit.attach(&cam, Vec3::ZERO);
        let offset = cam.position - orbit.target();
        let orientation = cam.orientation;
        orbit.begin_drag(DragMode::Pan);
        assert!(orbit.drag(&mut cam, Vec2::new(50.0, 0.0), &cfg));
        assert!((cam.position - orbit.target()).abs_diff_eq(offset, 1e-3));
        assert_eq!(cam.orientation, orientation);
        // 50 px at zoom 50 is one world unit to the left.
        assert_abs_diff_eq!(cam.position.x, -1.0, epsilon = 1e-4);
    }
}
