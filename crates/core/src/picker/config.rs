//! Picker configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing of a spin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerConfig {
    /// Time between ticks (milliseconds).
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    /// Number of ticks before the winner is announced.
    #[serde(default = "default_ticks")]
    pub ticks: u32,
}

fn default_tick_interval() -> u64 {
    150
}

fn default_ticks() -> u32 {
    15
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            ticks: default_ticks(),
        }
    }
}

impl PickerConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
