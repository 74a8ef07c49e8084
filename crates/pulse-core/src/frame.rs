use crate::color::Rgb;
use crate::point::DrawPoint;

/// A single immediate-mode drawing instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface with an opaque colour.
    Clear(Rgb),
    /// Fill a disc centred at `(x, y)`.
    FillCircle { x: f32, y: f32, radius: f32, color: Rgb },
}

/// A frame is the background colour plus the ordered points drawn over it.
///
/// Points are drawn in sequence order, so later points occlude earlier ones
/// where they overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub background: Rgb,
    pub points: Vec<DrawPoint>,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub fn new(background: Rgb, width: f32, height: f32) -> Self {
        Self { background, points: Vec::new(), width, height }
    }

    pub fn with_capacity(background: Rgb, width: f32, height: f32, capacity: usize) -> Self {
        Self { background, points: Vec::with_capacity(capacity), width, height }
    }

    pub fn push(&mut self, point: DrawPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `Clear(background)` followed by one `FillCircle` per point, in order.
    pub fn draw_commands(&self) -> impl Iterator<Item = DrawCommand> + '_ {
        std::iter::once(DrawCommand::Clear(self.background)).chain(self.points.iter().map(|p| {
            DrawCommand::FillCircle { x: p.x, y: p.y, radius: p.radius, color: p.color }
        }))
    }
}
