use pulse_core::{ParamOverrides, TunableField};
use rand::Rng;

/// Range, granularity and default of one user-tunable field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldInfo {
    pub field: TunableField,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

/// The four tunable fields, in settings-screen order.
pub static FIELDS: [FieldInfo; 4] = [
    FieldInfo {
        field: TunableField::WaveAmplitude,
        label: "Wave Amplitude",
        min: 0.0,
        max: 20.0,
        step: 0.5,
        default: 12.0,
    },
    FieldInfo {
        field: TunableField::RotationAmplitude,
        label: "Rotation Amplitude",
        min: 0.0,
        max: 2.0,
        step: 0.1,
        default: 0.8,
    },
    FieldInfo {
        field: TunableField::AngleFrequency,
        label: "Angle Frequency",
        min: 1.0,
        max: 10.0,
        step: 0.5,
        default: 3.0,
    },
    FieldInfo {
        field: TunableField::DensityFactor,
        label: "Density Factor",
        min: 0.1,
        max: 2.0,
        step: 0.1,
        default: 0.8,
    },
];

pub fn info(field: TunableField) -> &'static FieldInfo {
    match field {
        TunableField::WaveAmplitude => &FIELDS[0],
        TunableField::RotationAmplitude => &FIELDS[1],
        TunableField::AngleFrequency => &FIELDS[2],
        TunableField::DensityFactor => &FIELDS[3],
    }
}

/// Look a field up by its settings key.
pub fn lookup(key: &str) -> Option<&'static FieldInfo> {
    TunableField::from_key(key).map(info)
}

/// Every field at its default value.
pub fn default_overrides() -> ParamOverrides {
    FIELDS
        .iter()
        .fold(ParamOverrides::new(), |acc, s| acc.with(s.field, s.default))
}

/// One independent uniform draw per field.
pub fn sample_overrides<R: Rng + ?Sized>(rng: &mut R) -> ParamOverrides {
    FIELDS
        .iter()
        .fold(ParamOverrides::new(), |acc, s| acc.with(s.field, s.sample(rng)))
}

impl FieldInfo {
    pub fn key(&self) -> &'static str {
        self.field.key()
    }

    /// Grid index of `min`, so grid values are `(first + k) * step`.
    fn first_index(&self) -> i64 {
        (self.min / self.step).round() as i64
    }

    fn last_index(&self) -> i64 {
        (self.max / self.step).round() as i64
    }

    /// Number of distinct values on the grid.
    pub fn grid_len(&self) -> usize {
        (self.last_index() - self.first_index() + 1) as usize
    }

    /// Uniform draw over `min, min + step, ..., max`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let k = rng.gen_range(self.first_index()..=self.last_index());
        self.clamp(k as f64 * self.step)
    }

    /// Clamp into `[min, max]`. Non-finite input gives the default.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_finite() {
            value.clamp(self.min, self.max)
        } else {
            self.default
        }
    }

    /// Nearest grid value, clamped into range.
    pub fn snap(&self, value: f64) -> f64 {
        let clamped = self.clamp(value);
        self.clamp((clamped / self.step).round() * self.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_lookup_by_key() {
        assert_eq!(lookup("densityFactor").map(|s| s.label), Some("Density Factor"));
        assert!(lookup("mode").is_none());
        for field in TunableField::ALL {
            assert_eq!(info(field).field, field);
        }
    }

    #[test]
    fn test_grid_sizes() {
        assert_eq!(info(TunableField::WaveAmplitude).grid_len(), 41);
        assert_eq!(info(TunableField::RotationAmplitude).grid_len(), 21);
        assert_eq!(info(TunableField::AngleFrequency).grid_len(), 19);
        assert_eq!(info(TunableField::DensityFactor).grid_len(), 20);
    }

    #[test]
    fn test_samples_hit_both_ends() {
        let mut rng = StdRng::seed_from_u64(11);
        let s = info(TunableField::AngleFrequency);
        let samples: Vec<f64> = (0..2000).map(|_| s.sample(&mut rng)).collect();
        assert!(samples.iter().any(|v| *v == 1.0));
        assert!(samples.iter().any(|v| *v == 10.0));
        assert!(samples.iter().all(|v| (s.min..=s.max).contains(v)));
    }

    #[test]
    fn test_samples_are_on_grid() {
        let mut rng = StdRng::seed_from_u64(3);
        for s in FIELDS.iter() {
            for _ in 0..200 {
                let v = s.sample(&mut rng);
                let steps = v / s.step;
                assert!((steps - steps.round()).abs() < 1e-9, "{} off grid: {}", s.key(), v);
            }
        }
    }

    #[test]
    fn test_clamp_and_snap() {
        let s = info(TunableField::DensityFactor);
        assert_eq!(s.clamp(5.0), 2.0);
        assert_eq!(s.clamp(-1.0), 0.1);
        assert_eq!(s.clamp(f64::NAN), 0.8);
        assert!((s.snap(0.84) - 0.8).abs() < 1e-12);
        assert_eq!(s.snap(0.0), 0.1);
    }

    #[test]
    fn test_default_overrides_cover_every_field() {
        let o = default_overrides();
        assert_eq!(o.get(TunableField::WaveAmplitude), Some(12.0));
        assert_eq!(o.get(TunableField::DensityFactor), Some(0.8));
        assert_eq!(o.iter().count(), 4);
    }
}
