//! Pointer position in normalized device coordinates.
//!
//! Nothing in the scene reads the pointer yet; the tracker only keeps the
//! latest position so hover effects can be layered on later.

/// `x` grows to the right and `y` grows upwards, both in `-1.0..=1.0`
/// inside the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Default)]
pub struct PointerTracker {
    position: PointerPosition,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pointer at viewport pixel `(x, y)` in a `width` x `height` viewport.
    pub fn on_pointer_move(&mut self, x: f64, y: f64, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("pointer event on an empty {width}x{height} viewport");
            return;
        }
        self.position = PointerPosition {
            x: (x / width as f64 * 2.0 - 1.0) as f32,
            y: (-(y / height as f64) * 2.0 + 1.0) as f32,
        };
    }

    pub fn on_touch_start(&mut self, x: f64, y: f64, width: u32, height: u32) {
        self.on_pointer_move(x, y, width, height);
    }

    /// Records the touch and returns `true`: the host must suppress its
    /// default scrolling for touch drags over the canvas.
    pub fn on_touch_move(&mut self, x: f64, y: f64, width: u32, height: u32) -> bool {
        self.on_pointer_move(x, y, width, height);
        true
    }

    pub fn position(&self) -> PointerPosition {
        self.position
    }
}
