use serde::{Deserialize, Serialize};

/// Opaque 8-bit RGB colour. Every colour the engine emits is fully opaque,
/// so alpha is implied rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// RGBA bytes with full opacity.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// Wrap a hue in degrees into `[0, 360)`.
///
/// Negative inputs wrap upwards. A tiny negative remainder that would round
/// to exactly 360 collapses to 0, and non-finite input maps to 0.
pub fn wrap_hue(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Convert HSV to an opaque RGB colour.
///
/// `hue` is in degrees (wrapped into `[0, 360)`), `saturation` and `value`
/// are clamped into `[0, 1]` before conversion.
pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Rgb {
    let h = wrap_hue(hue);
    let s = clamp01(saturation);
    let v = clamp01(value);

    let c = v * s;
    let sector = h / 60.0;
    let x = c * (1.0 - (sector % 2.0 - 1.0).abs());
    let m = v - c;

    let (r1, g1, b1) = match sector as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Rgb {
        r: to_channel(r1 + m),
        g: to_channel(g1 + m),
        b: to_channel(b1 + m),
    }
}

/// Clamp into `[0, 1]`; NaN becomes 0.
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn to_channel(unit: f64) -> u8 {
    (clamp01(unit) * 255.0).round() as u8
}
