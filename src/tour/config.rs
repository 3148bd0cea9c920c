// ABOUTME: Tunable timings and tolerances for the guided tour
//
// The debounce values were tuned empirically for scroll and layout settling;
// they only need to be long enough for one render pass, so all are configurable.
// Distances are layout units (terminal cells in the bundled host).

use super::step::Settle;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and tolerance knobs for tour progression and measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourTimings {
    // === Progression ===
    /// Debounce before auto-advancing quick steps (toggles, type selectors)
    #[serde(with = "duration_millis")]
    pub quick_advance: Duration,

    /// Debounce before auto-advancing most pickers
    #[serde(with = "duration_millis")]
    pub standard_advance: Duration,

    /// Debounce for steps whose completion triggers a large reflow
    #[serde(with = "duration_millis")]
    pub slow_advance: Duration,

    /// Delay before skipping a step whose precondition is false
    #[serde(with = "duration_millis")]
    pub auto_skip_delay: Duration,

    // === Scrolling ===
    /// Fallback when a scroll-end signal never arrives
    #[serde(with = "duration_millis")]
    pub scroll_timeout: Duration,

    /// Centering passes before giving up on convergence
    pub max_scroll_iterations: usize,

    /// Deviation from the ideal position that still counts as visible
    pub scroll_tolerance: f32,

    /// Smallest gap kept above the target when centering
    pub min_top_margin: f32,

    // === Stability ===
    /// Wait between stability samples
    #[serde(with = "duration_millis")]
    pub settle_interval: Duration,

    /// Upper bound on stability samples
    pub stability_attempts: usize,

    /// Consecutive agreeing samples needed before accepting a measurement
    pub required_stable_reads: usize,

    /// Movement between samples that still counts as stable
    pub stability_tolerance: f32,

    // === Highlight ===
    /// Breathing room around the highlighted node
    pub highlight_padding: f32,
}

impl Default for TourTimings {
    fn default() -> Self {
        Self {
            quick_advance: Duration::from_millis(100),
            standard_advance: Duration::from_millis(350),
            slow_advance: Duration::from_millis(650),
            auto_skip_delay: Duration::from_millis(80),

            scroll_timeout: Duration::from_millis(900),
            max_scroll_iterations: 3,
            scroll_tolerance: 1.0,
            min_top_margin: 2.0,

            settle_interval: Duration::from_millis(40),
            stability_attempts: 10,
            required_stable_reads: 2,
            stability_tolerance: 0.5,

            highlight_padding: 1.0,
        }
    }
}

impl TourTimings {
    /// Auto-advance debounce for a step's settle class
    pub const fn advance_delay(&self, settle: Settle) -> Duration {
        match settle {
            Settle::Quick => self.quick_advance,
            Settle::Standard => self.standard_advance,
            Settle::Slow => self.slow_advance,
        }
    }
}

/// Serde helper storing durations as whole milliseconds
pub(crate) mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let timings = TourTimings::default();
        assert_eq!(timings.scroll_timeout, Duration::from_millis(900));
        assert_eq!(timings.max_scroll_iterations, 3);
        assert_eq!(timings.stability_attempts, 10);
        assert!(timings.quick_advance < timings.slow_advance);
    }

    #[test]
    fn test_advance_delay_by_settle() {
        let timings = TourTimings::default();
        assert_eq!(timings.advance_delay(Settle::Quick), timings.quick_advance);
        assert_eq!(timings.advance_delay(Settle::Slow), timings.slow_advance);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let timings: TourTimings = toml::from_str("scroll_timeout = 500\nmax_scroll_iterations = 5").unwrap();
        assert_eq!(timings.scroll_timeout, Duration::from_millis(500));
        assert_eq!(timings.max_scroll_iterations, 5);
        assert_eq!(timings.slow_advance, Duration::from_millis(650));
    }
}
