/// Side length of the repeating threshold pattern used by the dither shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DitherMatrixSize {
    Two,
    Four,
    /// Known to produce visibly wrong output with the current fragment shader.
    Eight,
}

impl DitherMatrixSize {
    pub fn side(self) -> u32 {
        match self {
            DitherMatrixSize::Two => 2,
            DitherMatrixSize::Four => 4,
            DitherMatrixSize::Eight => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DitherConfig {
    pub matrix_size: DitherMatrixSize,
    /// Shifts every threshold, 0.0 to 1.0.
    pub bias: f32,
}

/// Per-axis factor of the exponential pointer filter.
///
/// Each frame the smoothed position moves this fraction of the way towards
/// the pointer. `1.0` follows the pointer exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingFactors {
    pub x: f32,
    pub y: f32,
}

impl SmoothingFactors {
    pub const NONE: SmoothingFactors = SmoothingFactors { x: 1.0, y: 1.0 };
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("pixel scale must be at least 1")]
    PixelScale,
    #[error("dither bias {0} is outside 0.0..=1.0")]
    DitherBias(f32),
    #[error("smoothing factor {0} is outside (0.0, 1.0]")]
    Smoothing(f32),
    #[error("time scale {0} must be positive")]
    TimeScale(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// The scene is rendered at `window size / pixel_scale` and scaled up.
    pub pixel_scale: u32,
    pub dither: DitherConfig,
    pub smoothing: SmoothingFactors,
    /// Seconds of animation per millisecond of frame time.
    pub time_scale: f32,
    pub clear_color: [f32; 4],
    /// Whether the scroll offset is pushed to the shader.
    pub scroll_parallax: bool,
    pub model: String,
    pub vertex_shader: String,
    pub fragment_shader: String,
}

impl ViewerConfig {
    /// Chunky full page background with a heavy, slowly following model.
    pub fn landing() -> Self {
        Self {
            pixel_scale: 4,
            dither: DitherConfig {
                matrix_size: DitherMatrixSize::Four,
                bias: 0.6,
            },
            // X (spin) is looser than Y (tilt).
            smoothing: SmoothingFactors { x: 0.05, y: 0.1 },
            time_scale: 0.0008,
            clear_color: [0.02, 0.02, 0.02, 1.0],
            scroll_parallax: true,
            model: "models/torus2.obj".to_string(),
            vertex_shader: "shaders/vertex.wgsl".to_string(),
            fragment_shader: "shaders/fragment.wgsl".to_string(),
        }
    }

    /// Full resolution canvas that tracks the pointer directly.
    pub fn canvas() -> Self {
        Self {
            pixel_scale: 1,
            dither: DitherConfig {
                matrix_size: DitherMatrixSize::Four,
                bias: 0.7,
            },
            smoothing: SmoothingFactors::NONE,
            time_scale: 0.001,
            clear_color: [0.0, 0.0, 0.0, 0.0],
            scroll_parallax: false,
            model: "models/torus.obj".to_string(),
            ..Self::landing()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pixel_scale < 1 {
            return Err(ConfigError::PixelScale);
        }
        if !(0.0..=1.0).contains(&self.dither.bias) {
            return Err(ConfigError::DitherBias(self.dither.bias));
        }
        for factor in [self.smoothing.x, self.smoothing.y] {
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(ConfigError::Smoothing(factor));
            }
        }
        if !(self.time_scale.is_finite() && self.time_scale > 0.0) {
            return Err(ConfigError::TimeScale(self.time_scale));
        }
        if self.dither.matrix_size == DitherMatrixSize::Eight {
            log::warn!("8x8 dither matrix is known to render incorrectly");
        }
        Ok(())
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::landing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert_eq!(Ok(()), ViewerConfig::landing().validate());
        assert_eq!(Ok(()), ViewerConfig::canvas().validate());
    }

    #[test]
    fn canvas_keeps_shader_paths() {
        let canvas = ViewerConfig::canvas();
        assert_eq!(ViewerConfig::landing().vertex_shader, canvas.vertex_shader);
        assert_eq!(1, canvas.pixel_scale);
        assert!(!canvas.scroll_parallax);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut config = ViewerConfig::landing();
        config.pixel_scale = 0;
        assert_eq!(Err(ConfigError::PixelScale), config.validate());

        let mut config = ViewerConfig::landing();
        config.dither.bias = 1.5;
        assert_eq!(Err(ConfigError::DitherBias(1.5)), config.validate());

        let mut config = ViewerConfig::landing();
        config.smoothing.y = 0.0;
        assert_eq!(Err(ConfigError::Smoothing(0.0)), config.validate());

        let mut config = ViewerConfig::landing();
        config.time_scale = -1.0;
        assert_eq!(Err(ConfigError::TimeScale(-1.0)), config.validate());
    }

    #[test]
    fn eight_by_eight_is_accepted() {
        let mut config = ViewerConfig::landing();
        config.dither.matrix_size = DitherMatrixSize::Eight;
        assert_eq!(Ok(()), config.validate());
        assert_eq!(8, config.dither.matrix_size.side());
    }
}
