//! Pattern engine: a pure function from `(parameters, elapsed time, surface
//! size)` to one frame of coloured dots laid out on concentric rings.
//!
//! Each ring is sampled with a number of points proportional to its radius.
//! Every point is displaced by a per-ring radius wobble, a per-point angle
//! wobble, a global breathing pulse, a rotation that grows toward the outer
//! rings, and a wave pushed perpendicular to the radial direction. Colour
//! sweeps hue around the ring and fades saturation/lightness with radius.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::DVec2;

use crate::color::{clamp01, hsv_to_rgb, wrap_hue};
use crate::frame::Frame;
use crate::modulation::GlobalModulation;
use crate::params::ParameterSet;
use crate::point::{DrawPoint, MIN_DOT_RADIUS};

/// Surface width the pattern was designed against. Pixel scale grows
/// linearly with the actual width.
pub const REFERENCE_WIDTH: f64 = 400.0;

/// Relative slack so `rMax` is still visited when it sits on the step grid
/// but rounding pushed the span a hair below it.
const RING_TOLERANCE: f64 = 1e-9;

/// Hard ceiling on points in one frame, applied even when no budget is set.
/// Baseline parameters produce a few thousand points; only extreme density
/// settings reach this.
pub const MAX_POINTS_PER_FRAME: usize = 500_000;

/// Points on a ring of radius `r`: `floor(r * density)`, or 0 when that is
/// below one (or not a number).
pub fn point_count(r: f64, density_factor: f64) -> usize {
    let n = (r * density_factor).floor();
    if n >= 1.0 {
        n as usize
    } else {
        0
    }
}

/// Ring radii `rMin + k * rStep` for `k = 0, 1, ...` while `<= rMax`.
///
/// Radii are computed from the index rather than by repeated addition, so
/// the sequence never drifts.
#[derive(Debug, Clone)]
pub struct RingRadii {
    r_min: f64,
    r_step: f64,
    index: u64,
    count: u64,
}

impl RingRadii {
    pub fn new(params: &ParameterSet) -> Self {
        Self {
            r_min: params.r_min,
            r_step: params.r_step,
            index: 0,
            count: Self::ring_count(params.r_min, params.r_max, params.r_step),
        }
    }

    fn ring_count(r_min: f64, r_max: f64, r_step: f64) -> u64 {
        if !(r_step > 0.0) || !r_min.is_finite() || !r_max.is_finite() || r_max < r_min {
            return 0;
        }
        let span = (r_max - r_min) / r_step;
        (span * (1.0 + RING_TOLERANCE)).floor() as u64 + 1
    }
}

impl Iterator for RingRadii {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.index >= self.count {
            return None;
        }
        let r = self.r_min + self.index as f64 * self.r_step;
        self.index += 1;
        Some(r)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.index) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RingRadii {}

/// Frame-constant values shared by every point.
struct FrameContext {
    t: f64,
    modulation: GlobalModulation,
    center: DVec2,
    scale: f64,
}

impl FrameContext {
    fn new(params: &ParameterSet, elapsed_seconds: f64, width: f64, height: f64) -> Self {
        let t = elapsed_seconds * params.speed;
        Self {
            t,
            modulation: GlobalModulation::at(params, t),
            center: DVec2::new(width / 2.0, height / 2.0),
            scale: (width / REFERENCE_WIDTH) * params.scale,
        }
    }
}

/// Computes one frame of the pattern. Holds no per-frame state: the same
/// inputs always produce the same points in the same order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternEngine {
    point_budget: Option<usize>,
}

impl PatternEngine {
    /// An engine with no budget of its own. Frames are still cut at
    /// [`MAX_POINTS_PER_FRAME`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop emitting after `budget` points (inner rings first). A cap changes
    /// the picture at extreme density settings by dropping the outermost
    /// rings. The budget never lifts [`MAX_POINTS_PER_FRAME`].
    pub fn with_point_budget(budget: Option<usize>) -> Self {
        Self { point_budget: budget }
    }

    /// Points a frame may actually hold.
    pub fn effective_budget(&self) -> usize {
        self.point_budget.map_or(MAX_POINTS_PER_FRAME, |b| b.min(MAX_POINTS_PER_FRAME))
    }

    /// Number of points an uncapped frame would contain.
    pub fn estimated_points(params: &ParameterSet) -> usize {
        RingRadii::new(params)
            .map(|r| point_count(r, params.density_factor))
            .fold(0usize, usize::saturating_add)
    }

    /// Compute the full frame: background plus every point in ring order.
    pub fn render(&self, params: &ParameterSet, elapsed_seconds: f64, width: f64, height: f64) -> Frame {
        debug_assert!(params.r_max != 0.0, "rMax is used as a divisor and must be non-zero");

        let capacity = Self::estimated_points(params).min(self.effective_budget());
        let mut frame = Frame::with_capacity(params.background_color, width as f32, height as f32, capacity);
        self.emit_points(params, elapsed_seconds, width, height, |p| frame.push(p));
        frame
    }

    /// Stream the frame's points into `sink` in draw order. Returns how many
    /// points were emitted.
    pub fn emit_points<F>(
        &self,
        params: &ParameterSet,
        elapsed_seconds: f64,
        width: f64,
        height: f64,
        mut sink: F,
    ) -> usize
    where
        F: FnMut(DrawPoint),
    {
        let ctx = FrameContext::new(params, elapsed_seconds, width, height);
        let budget = self.effective_budget();
        let mut emitted = 0usize;

        for r in RingRadii::new(params) {
            let count = point_count(r, params.density_factor);
            if count == 0 {
                continue;
            }

            let ring = RingContext::new(params, &ctx, r);
            for i in 0..count {
                if emitted >= budget {
                    log::debug!("Point budget of {} reached at ring r={}", budget, r);
                    return emitted;
                }
                let angle = (i as f64 / count as f64) * TAU;
                sink(ring.point(params, &ctx, angle));
                emitted += 1;
            }
        }

        emitted
    }
}

/// Values that depend only on the ring radius.
struct RingContext {
    ratio: f64,
    modified_radius: f64,
    drift: f64,
    saturation: f64,
    lightness_base: f64,
    dot_radius: f32,
}

impl RingContext {
    fn new(params: &ParameterSet, ctx: &FrameContext, r: f64) -> Self {
        let ratio = r / params.r_max;
        let radius_mod = 1.0
            + (r / params.radius_divisor + ctx.t * params.radius_time_factor).sin() * params.radius_amplitude;
        let dot_radius = params.dot_size * (1.0 - ratio * params.dot_size_variation_factor);

        Self {
            ratio,
            modified_radius: r * radius_mod * ctx.modulation.breathing,
            drift: ratio * ctx.modulation.rotation,
            saturation: clamp01((params.base_saturation - ratio * params.saturation_range) / 100.0),
            lightness_base: params.base_lightness + ratio * params.lightness_range,
            dot_radius: dot_radius.max(MIN_DOT_RADIUS as f64) as f32,
        }
    }

    fn point(&self, params: &ParameterSet, ctx: &FrameContext, angle: f64) -> DrawPoint {
        let t = ctx.t;

        let angle_mod = (angle * params.angle_frequency + t * params.angle_time_factor).sin() * params.angle_amplitude;
        let modified_angle = angle + angle_mod + self.drift;
        let base = DVec2::from_angle(modified_angle) * self.modified_radius;

        let wave_distortion =
            (angle * params.wave_frequency + t * params.wave_time_factor).sin() * ctx.modulation.wave * self.ratio;
        let displaced = base + DVec2::from_angle(angle + FRAC_PI_2) * wave_distortion;
        let pixel = displaced * ctx.scale + ctx.center;

        let hue = wrap_hue((angle / TAU) * params.hue_range + t * params.hue_speed);
        let value = clamp01((self.lightness_base + (angle * 3.0 + t).sin() * params.lightness_pulse) / 100.0);

        DrawPoint::new(
            pixel.x as f32,
            pixel.y as f32,
            self.dot_radius,
            hsv_to_rgb(hue, self.saturation, value),
        )
    }
}
