//! Categorical add-ons shown next to the profile code.

use serde::{Deserialize, Serialize};

use crate::scoring::profile::MIDPOINT;
use crate::scoring::TraitScores;

/// Stress response, from N.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressKey {
    Sensitive,
    Steady,
}

/// Openness crossed with agreeableness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtypeKey {
    OpenWarm,
    OpenDirect,
    GroundedWarm,
    GroundedDirect,
}

/// Conscientiousness crossed with extraversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKey {
    StructuredOutgoing,
    StructuredReserved,
    FlexibleOutgoing,
    FlexibleReserved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOns {
    pub stress_key: StressKey,
    pub subtype_key: SubtypeKey,
    pub mode_key: ModeKey,
}

impl AddOns {
    pub fn from_scores(scores: &TraitScores) -> Self {
        let high = |v: f64| v >= MIDPOINT;

        let stress_key = if high(scores.neuroticism) {
            StressKey::Sensitive
        } else {
            StressKey::Steady
        };

        let subtype_key = match (high(scores.openness), high(scores.agreeableness)) {
            (true, true) => SubtypeKey::OpenWarm,
            (true, false) => SubtypeKey::OpenDirect,
            (false, true) => SubtypeKey::GroundedWarm,
            (false, false) => SubtypeKey::GroundedDirect,
        };

        let mode_key = match (high(scores.conscientiousness), high(scores.extraversion)) {
            (true, true) => ModeKey::StructuredOutgoing,
            (true, false) => ModeKey::StructuredReserved,
            (false, true) => ModeKey::FlexibleOutgoing,
            (false, false) => ModeKey::FlexibleReserved,
        };

        Self {
            stress_key,
            subtype_key,
            mode_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(e: f64, o: f64, c: f64, a: f64, n: f64) -> TraitScores {
        TraitScores {
            extraversion: e,
            openness: o,
            conscientiousness: c,
            agreeableness: a,
            neuroticism: n,
        }
    }

    #[test]
    fn midpoint_counts_as_high() {
        let addons = AddOns::from_scores(&scores(50.0, 50.0, 50.0, 50.0, 50.0));
        assert_eq!(addons.stress_key, StressKey::Sensitive);
        assert_eq!(addons.subtype_key, SubtypeKey::OpenWarm);
        assert_eq!(addons.mode_key, ModeKey::StructuredOutgoing);
    }

    #[test]
    fn low_scores() {
        let addons = AddOns::from_scores(&scores(10.0, 20.0, 30.0, 40.0, 49.9));
        assert_eq!(addons.stress_key, StressKey::Steady);
        assert_eq!(addons.subtype_key, SubtypeKey::GroundedDirect);
        assert_eq!(addons.mode_key, ModeKey::FlexibleReserved);
    }

    #[test]
    fn mixed_scores() {
        let addons = AddOns::from_scores(&scores(80.0, 70.0, 20.0, 30.0, 60.0));
        assert_eq!(addons.subtype_key, SubtypeKey::OpenDirect);
        assert_eq!(addons.mode_key, ModeKey::FlexibleOutgoing);

        let addons = AddOns::from_scores(&scores(20.0, 30.0, 90.0, 95.0, 60.0));
        assert_eq!(addons.subtype_key, SubtypeKey::GroundedWarm);
        assert_eq!(addons.mode_key, ModeKey::StructuredReserved);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let addons = AddOns::from_scores(&scores(80.0, 70.0, 20.0, 30.0, 60.0));
        let json = serde_json::to_value(addons).unwrap();
        assert_eq!(json["stressKey"], "sensitive");
        assert_eq!(json["subtypeKey"], "open_direct");
        assert_eq!(json["modeKey"], "flexible_outgoing");
    }
}
