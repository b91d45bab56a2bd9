//! Shape validation for raw expression documents.
//!
//! Checks run in order and stop at the first violation:
//! 1. the document is an object with a `genes` key
//! 2. `genes` is an object
//! 3. every gene maps to an object
//! 4. every leaf is a number
//! 5. every leaf is non-negative
//!
//! Extra top-level keys (e.g. export `metadata`) are ignored.

use anatomyx_common::error::{AnatomyxError, Result};
use serde::Serialize;
use serde_json::Value;

/// Outcome of [`validate`]. `message` is empty when valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub is_valid: bool,
    pub message: String,
}

impl Validation {
    pub fn valid() -> Self {
        Self { is_valid: true, message: String::new() }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self { is_valid: false, message: message.into() }
    }

    pub fn into_tuple(self) -> (bool, String) {
        (self.is_valid, self.message)
    }
}

pub fn validate(raw: &Value) -> Validation {
    match check(raw) {
        Ok(()) => Validation::valid(),
        Err(AnatomyxError::Validation(message)) => Validation::invalid(message),
        Err(other) => Validation::invalid(other.to_string()),
    }
}

/// Same checks as [`validate`], reported as a `Validation` error.
pub fn check(raw: &Value) -> Result<()> {
    let top = raw.as_object().ok_or_else(|| {
        invalid(format!("Data must be a JSON object, got {}", type_name(raw)))
    })?;

    let genes = top
        .get("genes")
        .ok_or_else(|| invalid("Data must contain 'genes' key".to_string()))?;

    let genes = genes.as_object().ok_or_else(|| {
        invalid(format!("'genes' must be an object, got {}", type_name(genes)))
    })?;

    for (gene, tissues) in genes {
        let tissues = tissues.as_object().ok_or_else(|| {
            invalid(format!(
                "Expression values for gene '{gene}' must be an object, got {}",
                type_name(tissues)
            ))
        })?;

        for (tissue, value) in tissues {
            let number = value.as_f64().ok_or_else(|| {
                invalid(format!(
                    "Expression value for {gene}/{tissue} must be numeric, got {}",
                    type_name(value)
                ))
            })?;
            if number < 0.0 {
                return Err(invalid(format!(
                    "Expression value for {gene}/{tissue} must be non-negative, got negative value {number}"
                )));
            }
        }
    }

    Ok(())
}

/// Rejects NaN and infinite thresholds.
pub fn check_threshold(threshold: f64) -> Result<()> {
    if threshold.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!(
            "Threshold must be a finite number, got {threshold}"
        )))
    }
}

fn invalid(message: String) -> AnatomyxError {
    AnatomyxError::Validation(message)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_document() {
        let v = validate(&json!({"genes": {"A": {"X": 1.0}}}));
        assert_eq!(v.into_tuple(), (true, String::new()));
    }

    #[test]
    fn test_negative_value() {
        let v = validate(&json!({"genes": {"A": {"X": -1}}}));
        assert!(!v.is_valid);
        assert!(v.message.contains("negative"), "{}", v.message);
        assert!(v.message.contains("A/X"));
    }

    #[test]
    fn test_top_level_not_object() {
        let v = validate(&json!([1, 2]));
        assert!(!v.is_valid);
        assert!(v.message.contains("array"));
    }

    #[test]
    fn test_missing_genes_key() {
        let v = validate(&json!({"data": {}}));
        assert_eq!(v.message, "Data must contain 'genes' key");
    }

    #[test]
    fn test_genes_not_object() {
        let v = validate(&json!({"genes": ["A"]}));
        assert_eq!(v.message, "'genes' must be an object, got array");
    }

    #[test]
    fn test_gene_not_object() {
        let v = validate(&json!({"genes": {"TP53": 0.4}}));
        assert!(!v.is_valid);
        assert!(v.message.contains("'TP53'"));
        assert!(v.message.contains("must be an object"));
    }

    #[test]
    fn test_non_numeric_leaf() {
        for leaf in [json!("high"), json!(null), json!(true), json!([1])] {
            let v = validate(&json!({"genes": {"A": {"X": leaf}}}));
            assert!(!v.is_valid);
            assert!(v.message.contains("must be numeric"), "{}", v.message);
        }
    }

    #[test]
    fn test_first_violation_wins() {
        // shape of gene B is checked before leaves of gene C
        let v = validate(&json!({"genes": {"B": 1, "C": {"X": -1}}}));
        assert!(v.message.contains("'B'"));
    }

    #[test]
    fn test_genes_checked_in_document_order() {
        let v = validate(&json!({"genes": {"Z": {"x": -1}, "A": 5}}));
        assert!(v.message.contains("Z/x"), "{}", v.message);
        assert!(v.message.contains("negative"));
    }

    #[test]
    fn test_check_threshold() {
        assert!(check_threshold(0.0).is_ok());
        assert!(check_threshold(12.5).is_ok());
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = check_threshold(bad).unwrap_err();
            assert!(matches!(err, AnatomyxError::Validation(_)), "{err}");
        }
    }

    #[test]
    fn test_empty_genes_is_valid() {
        assert!(validate(&json!({"genes": {}})).is_valid);
        assert!(validate(&json!({"genes": {"A": {}}})).is_valid);
    }

    #[test]
    fn test_extra_keys_ignored() {
        let v = validate(&json!({"genes": {"A": {"X": 2}}, "metadata": {"threshold": 0.5}}));
        assert!(v.is_valid);
    }
}
