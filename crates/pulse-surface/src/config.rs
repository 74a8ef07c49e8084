use std::time::Duration;

/// Frame-loop settings for [`FrameDriver`](crate::FrameDriver).
#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    /// Time between frames while visible. Default: 33 ms (~30 fps)
    pub frame_interval: Duration,
    /// Cap on points drawn per frame. `None` leaves only the engine's
    /// built-in ceiling.
    pub max_points_per_frame: Option<usize>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(33),
            max_points_per_frame: None,
        }
    }
}

impl DriverConfig {
    /// Interval for a target frame rate. Rates with no representable
    /// interval (non-positive, NaN, infinite, or so small the interval overflows) keep
    /// the current one.
    pub fn with_fps(mut self, fps: f64) -> Self {
        if !(fps > 0.0) {
            log::warn!("Ignoring frame rate {}, keeping {:?}", fps, self.frame_interval);
            return self;
        }
        match Duration::try_from_secs_f64(1.0 / fps) {
            Ok(interval) if !interval.is_zero() => self.frame_interval = interval,
            Ok(_) => log::warn!("Ignoring frame rate {}: interval rounds to zero", fps),
            Err(e) => log::warn!("Ignoring frame rate {}: {}", fps, e),
        }
        self
    }

    pub fn with_max_points(mut self, max_points: Option<usize>) -> Self {
        self.max_points_per_frame = max_points;
        self
    }
}
