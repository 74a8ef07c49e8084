use std::time::Duration;

/// Tuning knobs for the mode controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    /// Time between Random-mode rerolls. Default: 10 s
    pub reroll_interval: Duration,
    /// Seed for the reroll RNG. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            reroll_interval: Duration::from_secs(10),
            seed: None,
        }
    }
}

impl ControllerConfig {
    pub fn with_reroll_interval(mut self, interval: Duration) -> Self {
        self.reroll_interval = interval;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
