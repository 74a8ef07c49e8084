//! Mode controller: owns the active [`ParameterSet`] and the current
//! [`Mode`], reacts to settings-store notifications and runs the Random-mode
//! reroll timer.
//!
//! The active set is an `Arc<ParameterSet>` swapped as a whole, so the frame
//! path only ever clones a handle and never sees a half-written set.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use pulse_core::{ParamOverrides, ParameterSet};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ControllerConfig;
use crate::registry;
use crate::store::{lock, ListenerId, SettingsStore};
use crate::timer::RepeatingTask;

/// Settings key holding the mode string.
pub const MODE_KEY: &str = "mode";

/// Where the active parameters come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The fixed baseline.
    #[default]
    Default,
    /// Baseline plus the four stored custom values.
    Custom,
    /// Baseline plus four values resampled on a timer.
    Random,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Default, Mode::Custom, Mode::Random];

    /// The string stored under [`MODE_KEY`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Default => "default",
            Mode::Custom => "custom",
            Mode::Random => "random",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode `{0}` (expected default, custom or random)")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

/// Anything the frame path can ask for "the parameters right now".
pub trait ParamsSource: Send + Sync {
    fn current_params(&self) -> Arc<ParameterSet>;
}

/// A source that never changes. Handy for tests and previews.
impl ParamsSource for ParameterSet {
    fn current_params(&self) -> Arc<ParameterSet> {
        Arc::new(self.clone())
    }
}

/// Stored mode, or Default when the value is missing or unrecognised.
pub fn stored_mode(store: &dyn SettingsStore) -> Mode {
    let raw = store.get_str(MODE_KEY, Mode::Default.as_str());
    match raw.parse() {
        Ok(mode) => mode,
        Err(e) => {
            log::warn!("{}, falling back to default mode", e);
            Mode::Default
        }
    }
}

/// The four stored custom values, each falling back to its default.
pub fn stored_overrides(store: &dyn SettingsStore) -> ParamOverrides {
    registry::FIELDS.iter().fold(ParamOverrides::new(), |acc, info| {
        acc.with(info.field, store.get_f64(info.key(), info.default))
    })
}

struct ControllerState {
    mode: Mode,
    reroll: Option<RepeatingTask>,
    /// Bumped every time a reroll timer is started; a timer only acts while
    /// its generation is current.
    generation: u64,
}

pub struct ModeController {
    store: Arc<dyn SettingsStore>,
    config: ControllerConfig,
    active: RwLock<Arc<ParameterSet>>,
    state: Mutex<ControllerState>,
    rng: Mutex<StdRng>,
    listener: Mutex<Option<ListenerId>>,
    weak_self: Weak<ModeController>,
}

impl ModeController {
    /// Build a controller, subscribe it to `store` and apply the stored mode.
    pub fn new(store: Arc<dyn SettingsStore>, config: ControllerConfig) -> Arc<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let controller = Arc::new_cyclic(|weak| Self {
            store: store.clone(),
            config,
            active: RwLock::new(Arc::new(ParameterSet::baseline())),
            state: Mutex::new(ControllerState {
                mode: Mode::Default,
                reroll: None,
                generation: 0,
            }),
            rng: Mutex::new(rng),
            listener: Mutex::new(None),
            weak_self: weak.clone(),
        });

        let weak = Arc::downgrade(&controller);
        let id = store.subscribe(Arc::new(move |key: &str| {
            if let Some(controller) = weak.upgrade() {
                controller.on_external_preference_changed(key);
            }
        }));
        *lock(&controller.listener) = Some(id);

        controller.set_mode(stored_mode(&*store));
        controller
    }

    pub fn mode(&self) -> Mode {
        lock(&self.state).mode
    }

    /// Latest active parameters. Only clones a handle.
    pub fn current_params(&self) -> Arc<ParameterSet> {
        self.active.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// True while the reroll timer is alive.
    pub fn is_rerolling(&self) -> bool {
        lock(&self.state).reroll.as_ref().map_or(false, RepeatingTask::is_running)
    }

    /// Switch mode and recompute the active set.
    ///
    /// Re-selecting Default or Custom changes nothing. Selecting Random
    /// always draws a fresh sample and restarts the reroll timer.
    pub fn set_mode(&self, mode: Mode) {
        let stale_timer = {
            let mut state = lock(&self.state);
            let previous = state.mode;
            if previous == mode && mode != Mode::Random {
                return;
            }

            state.mode = mode;
            let stale = state.reroll.take();
            match mode {
                Mode::Default => self.replace(ParameterSet::baseline()),
                Mode::Custom => self.replace(self.custom_params()),
                Mode::Random => {
                    self.draw_random();
                    state.generation += 1;
                    state.reroll = Some(self.start_reroll_timer(state.generation));
                }
            }
            log::info!("Mode {} -> {}", previous, mode);
            stale
        };

        // Joined outside the state lock: the timer thread may be waiting on it.
        if let Some(mut timer) = stale_timer {
            timer.stop();
        }
    }

    /// React to a write of `key` in the settings store.
    pub fn on_external_preference_changed(&self, key: &str) {
        if key == MODE_KEY {
            self.set_mode(stored_mode(&*self.store));
            return;
        }

        if registry::lookup(key).is_some() {
            let state = lock(&self.state);
            if state.mode == Mode::Custom {
                self.replace(self.custom_params());
                log::debug!("Custom value `{}` changed", key);
            }
        }
    }

    /// Draw a new random set if the mode is Random. Returns whether it did.
    pub fn reroll_random(&self) -> bool {
        let state = lock(&self.state);
        if state.mode != Mode::Random {
            return false;
        }
        self.draw_random();
        true
    }

    fn reroll_from_timer(&self, generation: u64) -> bool {
        let state = lock(&self.state);
        if state.mode != Mode::Random || state.generation != generation {
            return false;
        }
        self.draw_random();
        true
    }

    fn start_reroll_timer(&self, generation: u64) -> RepeatingTask {
        let weak = self.weak_self.clone();
        RepeatingTask::start("pulse-reroll", self.config.reroll_interval, move || {
            match weak.upgrade() {
                Some(controller) => controller.reroll_from_timer(generation),
                None => false,
            }
        })
    }

    fn draw_random(&self) {
        let overrides = registry::sample_overrides(&mut *lock(&self.rng));
        let params = ParameterSet::baseline().derive(&overrides);
        log::debug!(
            "reroll: wave {} rotation {} angle {} density {}",
            params.wave_amplitude,
            params.rotation_amplitude,
            params.angle_frequency,
            params.density_factor
        );
        self.replace(params);
    }

    fn custom_params(&self) -> ParameterSet {
        ParameterSet::baseline().derive(&stored_overrides(&*self.store))
    }

    fn replace(&self, params: ParameterSet) {
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(params);
    }
}

impl ParamsSource for ModeController {
    fn current_params(&self) -> Arc<ParameterSet> {
        ModeController::current_params(self)
    }
}

impl Drop for ModeController {
    fn drop(&mut self) {
        if let Some(id) = lock(&self.listener).take() {
            self.store.unsubscribe(id);
        }
        let timer = lock(&self.state).reroll.take();
        if let Some(mut timer) = timer {
            timer.stop();
        }
    }
}
