// pointer.rs — normalized pointer feed

use glam::Vec2;

/// Latest cursor position in normalized device coordinates: x right, y up,
/// both in `[-1, 1]`, `(0, 0)` at the viewport center.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerSampler {
    ndc: Vec2,
}

impl PointerSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_cursor_moved(&mut self, x_px: f64, y_px: f64, width: u32, height: u32) {
        self.ndc = normalize(x_px, y_px, width, height);
    }

    /// Cursor left the window: treat it as centered.
    pub fn on_cursor_left(&mut self) {
        self.ndc = Vec2::ZERO;
    }

    pub fn sample(&self) -> Vec2 {
        self.ndc
    }
}

pub fn normalize(x_px: f64, y_px: f64, width: u32, height: u32) -> Vec2 {
    let w = width.max(1) as f64;
    let h = height.max(1) as f64;
    let x = (x_px / w) * 2.0 - 1.0;
    let y = -((y_px / h) * 2.0 - 1.0);
    Vec2::new(x as f32, y as f32).clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
}
