//! Debounce for per-frame classifications.
//!
//! A label is accepted only after it has been seen identically for a
//! number of consecutive classifications and a minimum interval has passed
//! since the previous acceptance.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::gesture::GestureLabel;

/// Debounce thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Consecutive identical classifications needed before acceptance.
    pub required_matches: u32,
    /// Minimum time (ms) between two accepted labels.
    pub min_interval_ms: u64,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            required_matches: 4,
            min_interval_ms: 1200,
        }
    }
}

impl StabilityConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

/// Consecutive-match counter plus an acceptance timer.
#[derive(Debug, Clone)]
pub struct StabilityFilter {
    pub config: StabilityConfig,
    /// Label of the previous classification (`None` = no match).
    last_label: Option<GestureLabel>,
    /// Identical classifications in a row, including the latest.
    consecutive: u32,
    /// Session time of the last acceptance.
    last_accepted_at: Option<Duration>,
}

impl StabilityFilter {
    pub fn new(config: StabilityConfig) -> Self {
        Self {
            config,
            last_label: None,
            consecutive: 0,
            last_accepted_at: None,
        }
    }

    /// Feed one classification observed at session time `now`.
    ///
    /// Returns the label when it becomes accepted.  Empty labels are
    /// counted but never accepted.
    pub fn observe(&mut self, label: Option<GestureLabel>, now: Duration) -> Option<GestureLabel> {
        if label == self.last_label {
            self.consecutive = self.consecutive.saturating_add(1);
        } else {
            self.last_label = label;
            self.consecutive = 1;
        }

        let label = label?;
        if self.consecutive < self.config.required_matches {
            return None;
        }

        let interval_ok = match self.last_accepted_at {
            Some(at) => now.saturating_sub(at) >= self.config.min_interval(),
            None => true,
        };
        if !interval_ok {
            return None;
        }

        // Must re-stabilize before the same label can be accepted again
        self.consecutive = 0;
        self.last_accepted_at = Some(now);
        debug!("accepted {} at {:?}", label.as_str(), now);
        Some(label)
    }

    /// Consecutive count for the current label.
    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    /// Forget everything, including the acceptance timer.
    pub fn reset(&mut self) {
        self.last_label = None;
        self.consecutive = 0;
        self.last_accepted_at = None;
    }
}

impl Default for StabilityFilter {
    fn default() -> Self {
        Self::new(StabilityConfig::default())
    }
}

// ── Tests ──────────────────────────────────────────────────
