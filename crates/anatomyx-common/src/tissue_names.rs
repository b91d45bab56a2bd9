//! Tissue id → display name lookup.
//!
//! The map is optional everywhere it is used: an id with no entry is
//! displayed as the id itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnatomyxError, Result};

/// Mapping from opaque tissue ids (e.g. `UBERON_0002107`) to names (`liver`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TissueNameMap {
    names: BTreeMap<String, String>,
}

impl TissueNameMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tissue_id: &str, name: &str) -> Self {
        self.names.insert(tissue_id.to_string(), name.to_string());
        self
    }

    /// Parse a JSON object of `{ "tissue_id": "name", ... }`.
    pub fn from_json_bytes(content: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(content)
            .map_err(|e| AnatomyxError::Format(format!("Invalid tissue name map JSON: {e}")))?;

        let object = value.as_object().ok_or_else(|| {
            AnatomyxError::Format("Tissue name map must be a JSON object".to_string())
        })?;

        let mut names = BTreeMap::new();
        for (id, name) in object {
            let name = name.as_str().ok_or_else(|| {
                AnatomyxError::Format(format!("Tissue name for '{id}' must be a string"))
            })?;
            names.insert(id.clone(), name.to_string());
        }

        debug!("Loaded {} tissue names", names.len());
        Ok(Self { names })
    }

    /// Load from a JSON file on disk.
    pub fn from_path(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read(path)?;
        Self::from_json_bytes(&content)
    }

    /// Human-readable name, or the id itself when unmapped.
    pub fn display_name<'a>(&'a self, tissue_id: &'a str) -> &'a str {
        self.names.get(tissue_id).map(String::as_str).unwrap_or(tissue_id)
    }

    pub fn get(&self, tissue_id: &str) -> Option<&str> {
        self.names.get(tissue_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_id() {
        let map = TissueNameMap::new().with("UBERON_0002107", "liver");
        assert_eq!(map.display_name("UBERON_0002107"), "liver");
        assert_eq!(map.display_name("UBERON_0000955"), "UBERON_0000955");
    }

    #[test]
    fn test_from_json_bytes() {
        let map = TissueNameMap::from_json_bytes(
            br#"{"UBERON_0002107": "liver", "UBERON_0000955": "brain"}"#,
        )
        .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("UBERON_0000955"), Some("brain"));
    }

    #[test]
    fn test_from_json_bytes_rejects_non_string_names() {
        let err = TissueNameMap::from_json_bytes(br#"{"UBERON_0002107": 3}"#).unwrap_err();
        assert!(matches!(err, AnatomyxError::Format(_)));
        assert!(err.to_string().contains("UBERON_0002107"));
    }

    #[test]
    fn test_from_json_bytes_rejects_arrays() {
        let err = TissueNameMap::from_json_bytes(b"[]").unwrap_err();
        assert!(matches!(err, AnatomyxError::Format(_)));
    }
}
