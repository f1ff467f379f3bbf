//! Result normalizer.
//!
//! Player result contracts are loose: keys go missing, types vary. Nothing in
//! here fails; unreadable values fall back to the `-1` / `Unknown` sentinels.

use tracing::debug;

use crate::models::{EndReason, Extras, PlaybackResult};

/// Share of the duration past which playback counts as finished.
///
/// A tunable heuristic, not a contract of any player.
pub const DEFAULT_FINISHED_THRESHOLD: f64 = 0.95;

pub const NO_DATA_MESSAGE: &str = "No data returned";

const POSITION_KEY: &str = "position";
const ALT_POSITION_KEY: &str = "current_position";
const DURATION_KEY: &str = "duration";
const END_BY_KEY: &str = "end_by";

/// Normalize with the default threshold.
pub fn normalize(extras: Option<&Extras>) -> PlaybackResult {
    Normalizer::default().normalize(extras)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    finished_threshold: f64,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            finished_threshold: DEFAULT_FINISHED_THRESHOLD,
        }
    }
}

impl Normalizer {
    /// Threshold outside `(0, 1]` (or NaN) falls back to the default.
    pub fn new(finished_threshold: f64) -> Self {
        let finished_threshold = if finished_threshold > 0.0 && finished_threshold <= 1.0 {
            finished_threshold
        } else {
            DEFAULT_FINISHED_THRESHOLD
        };
        Self { finished_threshold }
    }

    pub fn finished_threshold(&self) -> f64 {
        self.finished_threshold
    }

    pub fn normalize(&self, extras: Option<&Extras>) -> PlaybackResult {
        let Some(extras) = extras else {
            debug!("Player returned no result data");
            return PlaybackResult::no_data(NO_DATA_MESSAGE);
        };

        let position = read_int(extras, POSITION_KEY)
            .or_else(|| read_int(extras, ALT_POSITION_KEY))
            .unwrap_or(-1);
        let duration = read_int(extras, DURATION_KEY).unwrap_or(-1);
        let end_reason = EndReason::from_raw(extras.get_str(END_BY_KEY));
        let finished = self.is_finished(end_reason, position, duration);

        debug!(position, duration, ?end_reason, finished, "Normalized player result");

        PlaybackResult {
            position,
            duration,
            end_reason,
            finished,
            message: None,
        }
    }

    /// Completion, or a known duration with the position at or past the threshold.
    pub fn is_finished(&self, end_reason: EndReason, position: i64, duration: i64) -> bool {
        if end_reason == EndReason::Completion {
            return true;
        }
        duration > 0
            && position > 0
            && position as f64 >= duration as f64 * self.finished_threshold
    }
}

/// `-1` is the players' own "not set" value and counts as absent.
fn read_int(extras: &Extras, key: &str) -> Option<i64> {
    extras.get_int(key).filter(|v| *v != -1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extras(pairs: &[(&str, i64)]) -> Extras {
        let mut e = Extras::new();
        for (k, v) in pairs {
            e.insert(*k, *v);
        }
        e
    }

    #[test]
    fn test_no_data() {
        let r = normalize(None);
        assert_eq!(r.position, -1);
        assert_eq!(r.duration, -1);
        assert_eq!(r.end_reason, EndReason::Unknown);
        assert!(!r.finished);
        assert_eq!(r.message.as_deref(), Some("No data returned"));
    }

    #[test]
    fn test_near_end_is_finished() {
        let r = normalize(Some(&extras(&[("position", 95), ("duration", 100)])));
        assert!(r.finished);
        assert_eq!(r.end_reason, EndReason::Unknown);
        assert!(r.message.is_none());
    }

    #[test]
    fn test_user_exit_midway_not_finished() {
        let mut e = extras(&[("position", 50), ("duration", 100)]);
        e.insert("end_by", "user");
        let r = normalize(Some(&e));
        assert_eq!(r.end_reason, EndReason::User);
        assert!(!r.finished);
    }

    #[test]
    fn test_user_exit_past_threshold_is_finished() {
        let mut e = extras(&[("position", 98), ("duration", 100)]);
        e.insert("end_by", "user");
        assert!(normalize(Some(&e)).finished);
    }

    #[test]
    fn test_completion_is_finished() {
        let mut e = Extras::new();
        e.insert("end_by", "playback_completion");
        let r = normalize(Some(&e));
        assert_eq!(r.end_reason, EndReason::Completion);
        assert!(r.finished);
        assert_eq!(r.position, -1);
    }

    #[test]
    fn test_alternate_position_key() {
        let r = normalize(Some(&extras(&[("current_position", 40), ("duration", 100)])));
        assert_eq!(r.position, 40);

        let r = normalize(Some(&extras(&[
            ("position", -1),
            ("current_position", 41),
        ])));
        assert_eq!(r.position, 41);
    }

    #[test]
    fn test_primary_position_wins() {
        let r = normalize(Some(&extras(&[("position", 10), ("current_position", 20)])));
        assert_eq!(r.position, 10);
    }

    #[test]
    fn test_malformed_values_degrade() {
        let mut e = Extras::new();
        e.insert("position", "ten");
        e.insert("duration", true);
        e.insert("end_by", 3i64);
        let r = normalize(Some(&e));
        assert_eq!(r.position, -1);
        assert_eq!(r.duration, -1);
        assert_eq!(r.end_reason, EndReason::Unknown);
        assert!(!r.finished);
    }

    #[test]
    fn test_empty_extras_is_not_no_data() {
        let r = normalize(Some(&Extras::new()));
        assert_eq!(r.position, -1);
        assert!(r.message.is_none());
    }

    #[test]
    fn test_zero_duration_never_finished() {
        let r = normalize(Some(&extras(&[("position", 0), ("duration", 0)])));
        assert!(!r.finished);
    }

    #[test]
    fn test_custom_threshold() {
        let n = Normalizer::new(0.8);
        assert!(n.is_finished(EndReason::User, 80, 100));
        assert!(!n.is_finished(EndReason::User, 79, 100));
    }

    #[test]
    fn test_invalid_threshold_falls_back() {
        assert_eq!(Normalizer::new(0.0).finished_threshold(), DEFAULT_FINISHED_THRESHOLD);
        assert_eq!(Normalizer::new(1.5).finished_threshold(), DEFAULT_FINISHED_THRESHOLD);
        assert_eq!(Normalizer::new(f64::NAN).finished_threshold(), DEFAULT_FINISHED_THRESHOLD);
    }
}
