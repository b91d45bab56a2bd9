//! The validated expression dataset.

use std::collections::BTreeMap;

use anatomyx_common::error::{AnatomyxError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validate;

/// tissue_id → expression value for one gene.
pub type GeneExpression = BTreeMap<String, f64>;

/// `{ genes: gene_id → tissue_id → value }`, every value finite and >= 0.
///
/// Ordered maps keep gene and tissue iteration deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct ExpressionDataset {
    genes: BTreeMap<String, GeneExpression>,
}

impl ExpressionDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a raw parsed document and build the dataset from it.
    pub fn from_value(raw: &Value) -> Result<Self> {
        validate::check(raw)?;

        let mut genes = BTreeMap::new();
        if let Some(object) = raw.get("genes").and_then(Value::as_object) {
            for (gene, tissues) in object {
                let values: GeneExpression = tissues
                    .as_object()
                    .into_iter()
                    .flatten()
                    .filter_map(|(tissue, v)| v.as_f64().map(|v| (tissue.clone(), v)))
                    .collect();
                genes.insert(gene.clone(), values);
            }
        }
        Ok(Self { genes })
    }

    /// Build from already-typed maps, rejecting negative or non-finite values.
    pub fn from_genes(genes: BTreeMap<String, GeneExpression>) -> Result<Self> {
        for (gene, tissues) in &genes {
            for (tissue, value) in tissues {
                if !value.is_finite() {
                    return Err(AnatomyxError::Validation(format!(
                        "Expression value for {gene}/{tissue} must be a finite number, got {value}"
                    )));
                }
                if *value < 0.0 {
                    return Err(AnatomyxError::Validation(format!(
                        "Expression value for {gene}/{tissue} must be non-negative, got {value}"
                    )));
                }
            }
        }
        Ok(Self { genes })
    }

    pub fn genes(&self) -> &BTreeMap<String, GeneExpression> {
        &self.genes
    }

    pub fn gene(&self, gene: &str) -> Option<&GeneExpression> {
        self.genes.get(gene)
    }

    pub fn contains_gene(&self, gene: &str) -> bool {
        self.genes.contains_key(gene)
    }

    pub fn value(&self, gene: &str, tissue: &str) -> Option<f64> {
        self.genes.get(gene).and_then(|t| t.get(tissue)).copied()
    }

    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Every expression value across all genes and tissues.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.genes.values().flat_map(|t| t.values().copied())
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({ "genes": self.genes })
    }

    /// Caller guarantees every value is finite and non-negative.
    pub(crate) fn from_trusted(genes: BTreeMap<String, GeneExpression>) -> Self {
        Self { genes }
    }

    pub(crate) fn into_genes(self) -> BTreeMap<String, GeneExpression> {
        self.genes
    }
}

impl TryFrom<Value> for ExpressionDataset {
    type Error = AnatomyxError;

    fn try_from(raw: Value) -> Result<Self> {
        Self::from_value(&raw)
    }
}
