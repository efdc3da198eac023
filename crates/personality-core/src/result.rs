//! The stored result record.
//!
//! Written once when a test completes and overwritten wholesale on retake.
//! The JSON shape is the one the browser keeps in local storage, so a
//! record can move between the two without translation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::scoring::{AddOns, ProfileCode, TraitScores};

/// Schema version written into every record.
pub const RESULT_VERSION: &str = "v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResult {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub answers: Vec<i64>,
    /// Order the answers were collected in. Older records omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_order: Option<Vec<String>>,
    pub scores: TraitScores,
    /// Decisiveness metric, not the displayed emotional stability.
    pub stability: f64,
    pub type_code: ProfileCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_ons: Option<AddOns>,
}

impl StoredResult {
    /// Parse and validate a stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the record shape, the
    /// type code is not P01..P16, the version is unknown, or a score is
    /// not a finite percentage.
    pub fn from_json(json: &str) -> Result<Self> {
        let result: StoredResult = serde_json::from_str(json)?;
        result.validate()?;
        Ok(result)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.version != RESULT_VERSION {
            return Err(ValidationError::UnsupportedVersion(self.version.clone()));
        }
        if !self.scores.is_well_formed() {
            return Err(ValidationError::InvalidValue {
                field: "scores".to_string(),
                message: "every trait score must be within 0-100".to_string(),
            });
        }
        if !self.stability.is_finite() || !(0.0..=100.0).contains(&self.stability) {
            return Err(ValidationError::InvalidValue {
                field: "stability".to_string(),
                message: format!("{} is outside 0-100", self.stability),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::scoring::Scorer;

    fn sample() -> StoredResult {
        let created = DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let answers = [5u8, 4, 4, 5, 1, 2, 3, 2, 2, 4, 5, 5, 4, 4, 1, 3, 3, 4, 3, 3, 2, 2, 1, 2, 4];
        Scorer::new().compute_result_at(&answers, None::<&[String]>, created)
    }

    #[test]
    fn json_shape_matches_browser_storage() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["version"], "v1");
        assert_eq!(json["createdAt"], "2026-03-01T12:00:00Z");
        assert!(json["scores"]["E"].is_number());
        assert!(json["scores"]["N"].is_number());
        assert!(json["typeCode"].as_str().unwrap().starts_with('P'));
        assert!(json["questionOrder"].is_array());
        assert!(json["addOns"]["stressKey"].is_string());
    }

    #[test]
    fn parse_back() {
        let original = sample();
        let json = original.to_json_pretty().unwrap();
        let parsed = StoredResult::from_json(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn older_records_without_optional_fields_parse() {
        let json = r#"{
            "version": "v1",
            "createdAt": "2025-11-20T08:30:00Z",
            "answers": [3,3,3,3,3,3,3,3,3,3,3,3,3,3,3,3,3,3,3,3,3,3,3,3,3],
            "scores": {"E": 50, "O": 50, "C": 50, "A": 50, "N": 50},
            "stability": 0,
            "typeCode": "P01",
            "typeName": "ignored"
        }"#;
        let parsed = StoredResult::from_json(json).unwrap();
        assert!(parsed.question_order.is_none());
        assert!(parsed.add_ons.is_none());
        assert_eq!(parsed.type_code, ProfileCode::P01);
    }

    #[test]
    fn rejects_bad_type_code() {
        let json = serde_json::to_string(&sample())
            .unwrap()
            .replace(&format!("\"{}\"", sample().type_code), "\"P17\"");
        assert!(StoredResult::from_json(&json).is_err());
    }

    #[test]
    fn rejects_unknown_version() {
        let mut result = sample();
        result.version = "v2".to_string();
        let json = serde_json::to_string(&result).unwrap();
        let err = StoredResult::from_json(&json).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_scores() {
        let mut result = sample();
        result.scores.openness = 140.0;
        assert!(result.validate().is_err());

        let mut result = sample();
        result.stability = -1.0;
        assert!(result.validate().is_err());
    }

    #[test]
    fn rejects_missing_scores() {
        let json = r#"{"version":"v1","createdAt":"2025-11-20T08:30:00Z","answers":[],
            "scores":{"E":50,"O":50},"stability":0,"typeCode":"P01"}"#;
        assert!(matches!(
            StoredResult::from_json(json),
            Err(CoreError::Json(_))
        ));
    }
}
