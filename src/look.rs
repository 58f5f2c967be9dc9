// look.rs — pointer-driven look offsets for the idle perspective camera

use crate::config::LookConfig;
use crate::pose::damp_factor;
use glam::{Quat, Vec2};

#[derive(Debug, Clone)]
pub struct LookState {
    pub pointer: Vec2,
    /// (yaw, pitch) in radians.
    pub target: Vec2,
    pub current: Vec2,
    pub base_orientation: Quat,
}

impl LookState {
    pub fn new(base_orientation: Quat) -> Self {
        Self {
            pointer: Vec2::ZERO,
            target: Vec2::ZERO,
            current: Vec2::ZERO,
            base_orientation,
        }
    }

    /// Drops any offset without touching the base.
    pub fn reset(&mut self) {
        self.pointer = Vec2::ZERO;
        self.target = Vec2::ZERO;
        self.current = Vec2::ZERO;
    }

    /// Re-arms on a fresh base orientation with zero offset.
    pub fn rearm(&mut self, base_orientation: Quat) {
        self.reset();
        self.base_orientation = base_orientation;
    }

    /// One frame of look: eases the offset toward the pointer target and
    /// returns the resulting camera orientation. Rebuilt from the base every
    /// call, so nothing accumulates.
    pub fn update(&mut self, pointer: Vec2, dt: f32, cfg: &LookConfig) -> Quat {
        self.pointer = pointer;
        self.target = target_offset(self.pointer, cfg);
        let k = damp_factor(cfg.decay_rate, dt);
        self.current += (self.target - self.current) * k;
        self.orientation()
    }

    pub fn orientation(&self) -> Quat {
        compose(self.base_orientation, self.current.x, self.current.y)
    }
}

/// Yaw from the horizontal axis (pointer right turns the view right), pitch
/// from the vertical axis.
pub fn target_offset(pointer: Vec2, cfg: &LookConfig) -> Vec2 {
    Vec2::new(-pointer.x * cfg.sensitivity_x, pointer.y * cfg.sensitivity_y)
}

/// `base ∘ yaw ∘ pitch`, both applied in the camera's local frame.
pub fn compose(base: Quat, yaw: f32, pitch: f32) -> Quat {
    (base * Quat::from_rotation_y(yaw) * Quat::from_rotation_x(pitch)).normalize()
}
