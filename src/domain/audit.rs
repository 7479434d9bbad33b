//! Structured auditor report.
//!
//! Only `totalDiff` is required; the rest is carried opaquely in the raw
//! auditor output.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    #[serde(deserialize_with = "whole_number")]
    pub total_diff: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tests: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passed_tests: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_tests: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic_diff: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_diff: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

impl AuditReport {
    /// Parse auditor output. `None` if it is not JSON or `totalDiff` is not a
    /// whole number.
    pub fn parse(output: &str) -> Option<Self> {
        serde_json::from_str(output.trim()).ok()
    }
}

/// Any JSON number with no fractional part that fits in an `i64` (`2`, `2.0`)
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = number.as_i64() {
        return Ok(n);
    }
    number
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
        .map(|f| f as i64)
        .ok_or_else(|| D::Error::custom(format!("totalDiff must be a whole number, got {}", number)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let report = AuditReport::parse(r#"{"totalDiff": 3}"#).unwrap();
        assert_eq!(report.total_diff, 3);
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_parse_full_report() {
        let output = r#"{
            "totalTests": 10,
            "passedTests": 7,
            "failedTests": 3,
            "logicDiff": 2,
            "visualDiff": 1,
            "totalDiff": 3,
            "recommendations": ["fix the submit handler"]
        }"#;
        let report = AuditReport::parse(output).unwrap();
        assert_eq!(report.failed_tests, Some(3));
        assert_eq!(report.logic_diff, Some(2.0));
        assert_eq!(report.recommendations.len(), 1);
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let report = AuditReport::parse(r#"{"totalDiff": 0, "analysis": "all good"}"#).unwrap();
        assert_eq!(report.total_diff, 0);
    }

    #[test]
    fn test_parse_rejects_missing_total_diff() {
        assert!(AuditReport::parse(r#"{"logicDiff": 0}"#).is_none());
    }

    #[test]
    fn test_parse_rejects_non_integer_total_diff() {
        assert!(AuditReport::parse(r#"{"totalDiff": "three"}"#).is_none());
        assert!(AuditReport::parse(r#"{"totalDiff": 1.5}"#).is_none());
    }

    #[test]
    fn test_parse_accepts_whole_floats() {
        assert_eq!(AuditReport::parse(r#"{"totalDiff": 0.0}"#).unwrap().total_diff, 0);
        assert_eq!(AuditReport::parse(r#"{"totalDiff": 2.0}"#).unwrap().total_diff, 2);
        assert_eq!(AuditReport::parse(r#"{"totalDiff": -1.0}"#).unwrap().total_diff, -1);
    }

    #[test]
    fn test_parse_tolerates_fractional_sub_scores() {
        let report = AuditReport::parse(r#"{"logicDiff": 1.5, "visualDiff": 0.5, "totalDiff": 2.0}"#).unwrap();
        assert_eq!(report.total_diff, 2);
        assert_eq!(report.visual_diff, Some(0.5));
    }

    #[test]
    fn test_parse_rejects_out_of_range_total_diff() {
        assert!(AuditReport::parse(r#"{"totalDiff": 1e300}"#).is_none());
        assert!(AuditReport::parse(r#"{"totalDiff": 18446744073709551615}"#).is_none());
    }

    #[test]
    fn test_parse_rejects_plain_text() {
        assert!(AuditReport::parse("All tests pass!").is_none());
    }
}
