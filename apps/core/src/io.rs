//! JSON import and export for resume documents.

use thiserror::Error;

use crate::resume::JsonResume;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("resume document is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("resume document could not be serialized: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Serializes a resume as pretty-printed JSON suitable for download.
pub fn export_json(resume: &JsonResume) -> Result<String, IoError> {
    serde_json::to_string_pretty(resume).map_err(IoError::Serialize)
}

/// Parses an imported JSON-Resume document. Unknown top-level or nested
/// fields are dropped rather than rejected, so documents produced by other
/// tools still import.
pub fn import_json(raw: &str) -> Result<JsonResume, IoError> {
    serde_json::from_str(raw).map_err(IoError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::{Basics, Work};

    #[test]
    fn test_round_trip_preserves_document() {
        let mut resume = JsonResume::empty();
        resume.basics = Some(Basics {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            summary: Some("Engineer.".to_string()),
            ..Basics::default()
        });
        resume.work.push(Work {
            name: Some("Acme".to_string()),
            position: Some("Engineer".to_string()),
            start_date: Some("2021-01".to_string()),
            highlights: vec!["Shipped the thing".to_string()],
            ..Work::default()
        });
        let exported = export_json(&resume).unwrap();
        let reimported = import_json(&exported).unwrap();
        assert_eq!(reimported, resume);
    }

    #[test]
    fn test_absent_fields_stay_absent_in_output() {
        let resume = JsonResume::empty();
        let exported = export_json(&resume).unwrap();
        assert!(!exported.contains("\"work\""));
        assert!(!exported.contains("\"phone\""));
        assert!(!exported.contains("null"));
    }

    #[test]
    fn test_unknown_fields_are_tolerated() {
        let raw = r#"{"basics":{"name":"Jane","email":"","x-custom":1},"meta":{"theme":"x"}}"#;
        let resume = import_json(raw).unwrap();
        assert_eq!(resume.basics.unwrap().name, "Jane");
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(import_json("{not json"), Err(IoError::Parse(_))));
    }

    #[test]
    fn test_camel_case_field_names() {
        let raw = r#"{"work":[{"startDate":"2020-01","endDate":"2021-02"}]}"#;
        let resume = import_json(raw).unwrap();
        assert_eq!(resume.work[0].start_date.as_deref(), Some("2020-01"));
        let out = export_json(&resume).unwrap();
        assert!(out.contains("startDate"));
        assert!(!out.contains("start_date"));
    }
}
