use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Rgb;

/// Every numeric knob controlling the pattern's shape, motion, and colour.
///
/// A `ParameterSet` is never mutated once built: mode changes and rerolls
/// construct a new one with [`ParameterSet::derive`]. Values outside the
/// documented ranges are accepted and simply produce extreme visuals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParameterSet {
    // Global
    pub speed: f64,
    pub scale: f64,
    pub dot_size: f64,
    pub background_color: Rgb,

    // Radial sampling
    pub r_min: f64,
    pub r_max: f64,
    pub r_step: f64,
    pub density_factor: f64,

    // Radius modulation
    pub radius_divisor: f64,
    pub radius_time_factor: f64,
    pub radius_amplitude: f64,

    // Angle modulation
    pub angle_frequency: f64,
    pub angle_time_factor: f64,
    pub angle_amplitude: f64,

    // Breathing
    pub breath_period: f64,
    pub breath_amplitude: f64,
    pub breath_base: f64,

    // Rotation
    pub rotation_period: f64,
    pub rotation_amplitude: f64,
    pub rotation_base: f64,

    // Wave distortion
    pub wave_period: f64,
    pub wave_amplitude: f64,
    pub wave_base: f64,
    pub wave_frequency: f64,
    pub wave_time_factor: f64,

    // Colour
    pub hue_range: f64,
    pub hue_speed: f64,
    pub base_saturation: f64,
    pub saturation_range: f64,
    pub base_lightness: f64,
    pub lightness_range: f64,
    pub lightness_pulse: f64,

    // Shape falloff
    pub dot_size_variation_factor: f64,
}

impl Default for ParameterSet {
    /// The hardcoded baseline used by Default mode.
    fn default() -> Self {
        Self {
            speed: 0.8,
            scale: 1.6,
            dot_size: 1.5,
            background_color: Rgb::new(5, 5, 15),
            r_min: 5.0,
            r_max: 120.0,
            r_step: 2.0,
            density_factor: 0.8,
            radius_divisor: 10.0,
            radius_time_factor: 0.5,
            radius_amplitude: 0.2,
            angle_frequency: 3.0,
            angle_time_factor: 0.3,
            angle_amplitude: 0.4,
            breath_period: 8.0,
            breath_amplitude: 0.15,
            breath_base: 1.0,
            rotation_period: 15.0,
            rotation_amplitude: 0.8,
            rotation_base: 0.2,
            wave_period: 10.0,
            wave_amplitude: 12.0,
            wave_base: 8.0,
            wave_frequency: 4.0,
            wave_time_factor: 0.5,
            hue_range: 60.0,
            hue_speed: 10.0,
            base_saturation: 80.0,
            saturation_range: 30.0,
            base_lightness: 50.0,
            lightness_range: 20.0,
            lightness_pulse: 10.0,
            dot_size_variation_factor: 0.5,
        }
    }
}

/// The four fields a user (Custom mode) or the reroll timer (Random mode)
/// may override. Everything else always comes from the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TunableField {
    WaveAmplitude,
    RotationAmplitude,
    AngleFrequency,
    DensityFactor,
}

impl TunableField {
    pub const ALL: [TunableField; 4] = [
        TunableField::WaveAmplitude,
        TunableField::RotationAmplitude,
        TunableField::AngleFrequency,
        TunableField::DensityFactor,
    ];

    /// Settings-store key for this field.
    pub fn key(&self) -> &'static str {
        match self {
            TunableField::WaveAmplitude => "waveAmplitude",
            TunableField::RotationAmplitude => "rotationAmplitude",
            TunableField::AngleFrequency => "angleFrequency",
            TunableField::DensityFactor => "densityFactor",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Read this field from a parameter set.
    pub fn get(&self, params: &ParameterSet) -> f64 {
        match self {
            TunableField::WaveAmplitude => params.wave_amplitude,
            TunableField::RotationAmplitude => params.rotation_amplitude,
            TunableField::AngleFrequency => params.angle_frequency,
            TunableField::DensityFactor => params.density_factor,
        }
    }

    fn slot<'a>(&self, params: &'a mut ParameterSet) -> &'a mut f64 {
        match self {
            TunableField::WaveAmplitude => &mut params.wave_amplitude,
            TunableField::RotationAmplitude => &mut params.rotation_amplitude,
            TunableField::AngleFrequency => &mut params.angle_frequency,
            TunableField::DensityFactor => &mut params.density_factor,
        }
    }
}

/// Override map restricted to the tunable fields.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParamOverrides {
    values: [Option<f64>; 4],
}

impl ParamOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: TunableField, value: f64) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: TunableField, value: f64) {
        self.values[Self::index(field)] = Some(value);
    }

    pub fn get(&self, field: TunableField) -> Option<f64> {
        self.values[Self::index(field)]
    }

    pub fn iter(&self) -> impl Iterator<Item = (TunableField, f64)> + '_ {
        TunableField::ALL
            .into_iter()
            .filter_map(|f| self.get(f).map(|v| (f, v)))
    }

    fn index(field: TunableField) -> usize {
        match field {
            TunableField::WaveAmplitude => 0,
            TunableField::RotationAmplitude => 1,
            TunableField::AngleFrequency => 2,
            TunableField::DensityFactor => 3,
        }
    }
}

/// A violated construction invariant, reported by [`ParameterSet::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("rMin must be positive, got {0}")]
    NonPositiveRMin(f64),
    #[error("rMax ({r_max}) must be greater than rMin ({r_min})")]
    RMaxNotAboveRMin { r_min: f64, r_max: f64 },
    #[error("rStep must be positive, got {0}")]
    NonPositiveRStep(f64),
    #[error("densityFactor must be positive, got {0}")]
    NonPositiveDensity(f64),
    #[error("field `{0}` is not finite")]
    NotFinite(&'static str),
}

impl ParameterSet {
    /// The Default-mode baseline.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// A new set identical to `self` except for the overridden fields.
    pub fn derive(&self, overrides: &ParamOverrides) -> Self {
        let mut next = self.clone();
        for (field, value) in overrides.iter() {
            *field.slot(&mut next) = value;
        }
        next
    }

    /// Check the radial-sampling invariants (`rMax > rMin > 0`, `rStep > 0`,
    /// `densityFactor > 0`) and that every field is finite.
    ///
    /// The engine never calls this; it exists for callers that build sets
    /// from untrusted input.
    pub fn validate(&self) -> Result<(), ParamError> {
        for (name, value) in self.named_fields() {
            if !value.is_finite() {
                return Err(ParamError::NotFinite(name));
            }
        }
        if self.r_min <= 0.0 {
            return Err(ParamError::NonPositiveRMin(self.r_min));
        }
        if self.r_max <= self.r_min {
            return Err(ParamError::RMaxNotAboveRMin { r_min: self.r_min, r_max: self.r_max });
        }
        if self.r_step <= 0.0 {
            return Err(ParamError::NonPositiveRStep(self.r_step));
        }
        if self.density_factor <= 0.0 {
            return Err(ParamError::NonPositiveDensity(self.density_factor));
        }
        Ok(())
    }

    fn named_fields(&self) -> [(&'static str, f64); 32] {
        [
            ("speed", self.speed),
            ("scale", self.scale),
            ("dotSize", self.dot_size),
            ("rMin", self.r_min),
            ("rMax", self.r_max),
            ("rStep", self.r_step),
            ("densityFactor", self.density_factor),
            ("radiusDivisor", self.radius_divisor),
            ("radiusTimeFactor", self.radius_time_factor),
            ("radiusAmplitude", self.radius_amplitude),
            ("angleFrequency", self.angle_frequency),
            ("angleTimeFactor", self.angle_time_factor),
            ("angleAmplitude", self.angle_amplitude),
            ("breathPeriod", self.breath_period),
            ("breathAmplitude", self.breath_amplitude),
            ("breathBase", self.breath_base),
            ("rotationPeriod", self.rotation_period),
            ("rotationAmplitude", self.rotation_amplitude),
            ("rotationBase", self.rotation_base),
            ("wavePeriod", self.wave_period),
            ("waveAmplitude", self.wave_amplitude),
            ("waveBase", self.wave_base),
            ("waveFrequency", self.wave_frequency),
            ("waveTimeFactor", self.wave_time_factor),
            ("hueRange", self.hue_range),
            ("hueSpeed", self.hue_speed),
            ("baseSaturation", self.base_saturation),
            ("saturationRange", self.saturation_range),
            ("baseLightness", self.base_lightness),
            ("lightnessRange", self.lightness_range),
            ("lightnessPulse", self.lightness_pulse),
            ("dotSizeVariationFactor", self.dot_size_variation_factor),
        ]
    }
}
