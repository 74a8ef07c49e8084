use crate::color::Rgb;

/// Minimum visible dot radius in surface pixels.
pub const MIN_DOT_RADIUS: f32 = 0.5;

/// One filled disc to draw, in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawPoint {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: Rgb,
}

impl DrawPoint {
    pub fn new(x: f32, y: f32, radius: f32, color: Rgb) -> Self {
        Self { x, y, radius, color }
    }
}
