use serde::{Deserialize, Serialize};

/// Why the external player stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndReason {
    User,
    Completion,
    Unknown,
}

impl EndReason {
    /// Map a player's raw `end_by` value.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("user") => Self::User,
            Some("playback_completion") | Some("completion") => Self::Completion,
            _ => Self::Unknown,
        }
    }
}

/// Canonical outcome of an external playback session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackResult {
    /// Last position reported by the player, `-1` if unknown.
    pub position: i64,
    /// Media duration reported by the player, `-1` if unknown.
    pub duration: i64,
    pub end_reason: EndReason,
    pub finished: bool,
    /// Diagnostic, set when the player returned nothing.
    pub message: Option<String>,
}

impl PlaybackResult {
    pub fn no_data(message: impl Into<String>) -> Self {
        Self {
            position: -1,
            duration: -1,
            end_reason: EndReason::Unknown,
            finished: false,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_reason_from_raw() {
        assert_eq!(EndReason::from_raw(Some("user")), EndReason::User);
        assert_eq!(
            EndReason::from_raw(Some("playback_completion")),
            EndReason::Completion
        );
        assert_eq!(EndReason::from_raw(Some("error")), EndReason::Unknown);
        assert_eq!(EndReason::from_raw(None), EndReason::Unknown);
    }
}
