use crate::config::SmoothingFactors;

/// Maps a pointer position in window pixels to `[-1, 1]` on both axes.
///
/// X grows to the right, Y grows upwards (the inverse of screen Y).
pub fn normalize_pointer(x: f64, y: f64, width: f64, height: f64) -> [f32; 2] {
    [
        ((x / width) * 2.0 - 1.0) as f32,
        (-(y / height) * 2.0 + 1.0) as f32,
    ]
}

/// Maps the vertical scroll position to an offset that starts at 1.0 at the
/// top of the page and decreases by 2.0 per viewport scrolled.
///
/// This is not clamped; pages taller than one viewport go below -1.0.
pub fn scroll_offset(scroll_y: f64, viewport_height: f64) -> f32 {
    (-(scroll_y / viewport_height) * 2.0 + 1.0) as f32
}

/// One step of an exponential approach towards `target`.
#[inline(always)]
fn approach(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

/// Pointer and scroll signals, written by input events and read once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    target: [f32; 2],
    smoothed: [f32; 2],
    scroll: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.target = normalize_pointer(x, y, width, height);
    }

    pub fn scrolled(&mut self, scroll_y: f64, viewport_height: f64) {
        if viewport_height <= 0.0 {
            return;
        }
        self.scroll = scroll_offset(scroll_y, viewport_height);
    }

    /// Moves the smoothed pointer one filter step towards the target.
    ///
    /// Each axis is filtered independently with its own factor.
    pub fn step(&mut self, factors: &SmoothingFactors) {
        self.smoothed[0] = approach(self.smoothed[0], self.target[0], factors.x);
        self.smoothed[1] = approach(self.smoothed[1], self.target[1], factors.y);
    }

    pub fn target(&self) -> [f32; 2] {
        self.target
    }

    pub fn smoothed(&self) -> [f32; 2] {
        self.smoothed
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }
}
