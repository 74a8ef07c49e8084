pub mod color;
pub mod point;
pub mod frame;
pub mod params;
pub mod modulation;
pub mod engine;

pub use color::{hsv_to_rgb, wrap_hue, Rgb};
pub use point::DrawPoint;
pub use frame::{DrawCommand, Frame};
pub use params::{ParamError, ParamOverrides, ParameterSet, TunableField};
pub use modulation::{GlobalModulation, SineModulator};
pub use engine::{point_count, RingRadii, PatternEngine, MAX_POINTS_PER_FRAME, REFERENCE_WIDTH};
