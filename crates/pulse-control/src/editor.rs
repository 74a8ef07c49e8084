use std::sync::Arc;

use pulse_core::{ParamOverrides, TunableField};
use serde_json::Value;

use crate::controller::{stored_mode, stored_overrides, Mode, MODE_KEY};
use crate::registry;
use crate::store::SettingsStore;

/// Headless settings screen: reads and writes the same store keys a UI
/// would, so a running controller reacts to edits exactly as it does to
/// any other write.
#[derive(Clone)]
pub struct SettingsEditor {
    store: Arc<dyn SettingsStore>,
}

impl SettingsEditor {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    pub fn mode(&self) -> Mode {
        stored_mode(&*self.store)
    }

    pub fn set_mode(&self, mode: Mode) {
        self.store.set(MODE_KEY, Value::from(mode.as_str()));
    }

    /// Stored custom value, or the field default.
    pub fn custom_value(&self, field: TunableField) -> f64 {
        let info = registry::info(field);
        self.store.get_f64(info.key(), info.default)
    }

    pub fn custom_values(&self) -> ParamOverrides {
        stored_overrides(&*self.store)
    }

    /// Store `value` clamped into the field's range and snapped to its
    /// slider step. Returns what was stored.
    pub fn set_custom_value(&self, field: TunableField, value: f64) -> f64 {
        let info = registry::info(field);
        let snapped = info.snap(value);
        self.store.set(info.key(), Value::from(snapped));
        snapped
    }

    /// Put all four custom values back to their defaults.
    pub fn reset_custom_values(&self) {
        for info in registry::FIELDS.iter() {
            self.store.set(info.key(), Value::from(info.default));
        }
    }

    /// Sliders only take effect in Custom mode.
    pub fn custom_controls_enabled(&self) -> bool {
        self.mode() == Mode::Custom
    }

    pub fn mode_descriptions() -> [(Mode, &'static str); 3] {
        [
            (Mode::Default, "The built-in pattern, always the same."),
            (Mode::Custom, "The built-in pattern with your own slider values."),
            (Mode::Random, "New slider values picked at random every few seconds."),
        ]
    }
}
