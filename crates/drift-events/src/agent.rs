//! Agent Tags
//!
//! Discrete categories carried by the Creature and the Humans.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trust category of a Human.
///
/// Ordered from least to most trusting, so `Fearful < Neutral < Compassionate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Fearful,
    Neutral,
    Compassionate,
}

impl Disposition {
    /// All dispositions, least trusting first
    pub const ALL: [Disposition; 3] = [
        Disposition::Fearful,
        Disposition::Neutral,
        Disposition::Compassionate,
    ];

    /// Signed trust level: -1 fearful, 0 neutral, +1 compassionate
    pub fn trust_level(self) -> i8 {
        match self {
            Disposition::Fearful => -1,
            Disposition::Neutral => 0,
            Disposition::Compassionate => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Disposition::Fearful => "fearful",
            Disposition::Neutral => "neutral",
            Disposition::Compassionate => "compassionate",
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behavioural category of the Creature, derived from empathy and resentment.
///
/// Ordered by escalation: `Peaceful < Cautious < Vengeful`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MoralState {
    #[default]
    Peaceful,
    Cautious,
    Vengeful,
}

impl MoralState {
    /// All states, calmest first
    pub const ALL: [MoralState; 3] = [
        MoralState::Peaceful,
        MoralState::Cautious,
        MoralState::Vengeful,
    ];

    /// Numeric code used in trajectory averages (0 peaceful, 1 cautious, 2 vengeful)
    pub fn ordinal(self) -> u8 {
        match self {
            MoralState::Peaceful => 0,
            MoralState::Cautious => 1,
            MoralState::Vengeful => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MoralState::Peaceful => "peaceful",
            MoralState::Cautious => "cautious",
            MoralState::Vengeful => "vengeful",
        }
    }
}

impl fmt::Display for MoralState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escalation_order() {
        assert!(MoralState::Peaceful < MoralState::Cautious);
        assert!(MoralState::Cautious < MoralState::Vengeful);
        assert_eq!(MoralState::Vengeful.ordinal(), 2);
    }

    #[test]
    fn test_disposition_serialization() {
        let json = serde_json::to_string(&Disposition::Compassionate).unwrap();
        assert_eq!(json, "\"compassionate\"");

        let parsed: Disposition = serde_json::from_str("\"fearful\"").unwrap();
        assert_eq!(parsed, Disposition::Fearful);
        assert_eq!(parsed.trust_level(), -1);
    }
}
