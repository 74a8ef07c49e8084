use crate::params::ParameterSet;

/// A slow sine oscillation around a base value: `sin(t / period) * amplitude + base`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineModulator {
    pub period: f64,
    pub amplitude: f64,
    pub base: f64,
}

impl SineModulator {
    pub fn new(period: f64, amplitude: f64, base: f64) -> Self {
        Self { period, amplitude, base }
    }

    /// Value at scaled time `t`.
    pub fn value_at(&self, t: f64) -> f64 {
        (t / self.period).sin() * self.amplitude + self.base
    }
}

/// The three frame-global modulations, evaluated once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalModulation {
    /// Radial pulsation multiplier applied to every ring.
    pub breathing: f64,
    /// Angular drift, scaled by `r / rMax` so outer rings turn further.
    pub rotation: f64,
    /// Perpendicular wave displacement strength.
    pub wave: f64,
}

impl GlobalModulation {
    pub fn at(params: &ParameterSet, t: f64) -> Self {
        Self {
            breathing: Self::breathing(params).value_at(t),
            rotation: Self::rotation(params).value_at(t),
            wave: Self::wave(params).value_at(t),
        }
    }

    pub fn breathing(params: &ParameterSet) -> SineModulator {
        SineModulator::new(params.breath_period, params.breath_amplitude, params.breath_base)
    }

    pub fn rotation(params: &ParameterSet) -> SineModulator {
        SineModulator::new(params.rotation_period, params.rotation_amplitude, params.rotation_base)
    }

    pub fn wave(params: &ParameterSet) -> SineModulator {
        SineModulator::new(params.wave_period, params.wave_amplitude, params.wave_base)
    }
}
