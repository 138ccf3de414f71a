//! Parser for the raw analysis document
//!
//! The document arrives as JSON text from the record source and is not
//! trusted. Parsing fails closed: either the whole document is accepted or
//! nothing is.

use super::types::AnalysisModel;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not JSON, not an object, or a known section has the wrong shape
    #[error("malformed analysis document: {0}")]
    Malformed(String),
}

/// Parse a raw analysis document into a typed model
pub fn parse(raw: &str) -> Result<AnalysisModel, ParseError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ParseError::Malformed(e.to_string()))?;

    // Structs would otherwise also deserialize from a JSON array
    if !value.is_object() {
        return Err(ParseError::Malformed(format!(
            "expected a JSON object, found {}",
            json_kind(&value)
        )));
    }

    let model: AnalysisModel =
        serde_json::from_value(value).map_err(|e| ParseError::Malformed(e.to_string()))?;

    debug!(
        steps = model.steps().count(),
        objections = model.objections().len(),
        has_score = model.score().is_some(),
        "Parsed analysis document"
    );

    Ok(model)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::StepStatus;

    #[test]
    fn test_not_json_is_malformed() {
        assert!(matches!(parse("not json"), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn test_non_object_is_malformed() {
        for raw in ["[]", "42", "\"text\"", "null", "true"] {
            assert!(
                matches!(parse(raw), Err(ParseError::Malformed(_))),
                "expected {raw} to be rejected"
            );
        }
    }

    #[test]
    fn test_empty_object_is_valid() {
        let model = parse("{}").unwrap();
        assert_eq!(model, AnalysisModel::default());
    }

    #[test]
    fn test_parses_all_sections() {
        let raw = r#"{
            "SalesMethodologyAlignment": {
                "BuildRapport": {"status": "Clearly", "evidence": "small talk"},
                "Close": {"status": "NotAtAll", "evidence": "no ask"}
            },
            "ObjectionsRaised": [
                {"objectionText": "Too expensive", "handledEffectively": true, "category": "price"}
            ],
            "RepEffectivenessScore": {"score": 7, "rationale": "solid"},
            "CallSummary": "Customer asked about financing"
        }"#;

        let model = parse(raw).unwrap();
        let steps = model.sales_methodology_alignment.as_ref().unwrap();
        assert_eq!(steps["BuildRapport"].status, StepStatus::Clearly);
        assert_eq!(steps["Close"].evidence.as_deref(), Some("no ask"));

        let objection = &model.objections()[0];
        assert_eq!(objection.text(), "Too expensive");
        assert!(objection.is_handled());
        assert_eq!(objection.extra["category"], "price");

        assert_eq!(model.score(), Some(7.0));
        assert!(model.extra.contains_key("CallSummary"));
    }

    #[test]
    fn test_camel_case_aliases() {
        let raw = r#"{
            "salesMethodologyAlignment": {"Close": {"status": "Partially"}},
            "objectionsRaised": [],
            "repEffectivenessScore": {"score": 3.5}
        }"#;

        let model = parse(raw).unwrap();
        assert_eq!(model.steps().count(), 1);
        assert!(model.objections().is_empty());
        assert_eq!(model.score(), Some(3.5));
    }

    #[test]
    fn test_null_sections_are_absent() {
        let raw = r#"{"SalesMethodologyAlignment": null, "ObjectionsRaised": null}"#;
        let model = parse(raw).unwrap();
        assert!(model.sales_methodology_alignment.is_none());
        assert!(model.objections_raised.is_none());
    }

    #[test]
    fn test_wrong_shape_fails_whole_document() {
        let cases = [
            r#"{"SalesMethodologyAlignment": []}"#,
            r#"{"SalesMethodologyAlignment": {"Close": "NotAtAll"}}"#,
            r#"{"SalesMethodologyAlignment": {"Close": {"evidence": "no status"}}}"#,
            r#"{"ObjectionsRaised": {"objectionText": "x"}}"#,
            r#"{"ObjectionsRaised": [{"handledEffectively": "yes"}]}"#,
            r#"{"RepEffectivenessScore": {"score": "seven"}}"#,
            r#"{"RepEffectivenessScore": 7}"#,
        ];

        for raw in cases {
            assert!(
                matches!(parse(raw), Err(ParseError::Malformed(_))),
                "expected {raw} to be rejected"
            );
        }
    }

    #[test]
    fn test_parse_is_idempotent() {
        let raw = r#"{"SalesMethodologyAlignment": {"Zeta": {"status": "Odd"}, "Close": {"status": "Clearly"}}}"#;
        assert_eq!(parse(raw).unwrap(), parse(raw).unwrap());
    }

    #[test]
    fn test_preserves_step_insertion_order() {
        let raw = r#"{"SalesMethodologyAlignment": {
            "Zeta": {"status": "Clearly"},
            "Alpha": {"status": "Clearly"},
            "Mid": {"status": "Clearly"}
        }}"#;

        let model = parse(raw).unwrap();
        let keys: Vec<&str> = model.steps().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_both_casings_of_a_section_rejected() {
        let raw = r#"{
            "SalesMethodologyAlignment": {"Close": {"status": "Clearly"}},
            "salesMethodologyAlignment": {"Close": {"status": "NotAtAll"}}
        }"#;

        match parse(raw) {
            Err(ParseError::Malformed(msg)) => assert!(msg.contains("duplicate field"), "{msg}"),
            other => panic!("expected Malformed, got {other:?}"),
        }

        // One spelling per section is fine, even when sections mix casings
        let mixed = r#"{"SalesMethodologyAlignment": {}, "objectionsRaised": []}"#;
        assert!(parse(mixed).is_ok());
    }
}
