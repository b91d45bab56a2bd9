//! Gene / tissue listings and descriptive statistics.

use std::collections::BTreeSet;

use anatomyx_common::error::{AnatomyxError, Result};
use serde::Serialize;

use crate::dataset::ExpressionDataset;

/// Statistics over the flattened multiset of all expression values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub gene_count: usize,
    /// Size of the union of tissue ids, not the per-gene sum.
    pub tissue_count: usize,
    pub mean_expression: f64,
    /// Population standard deviation.
    pub std_expression: f64,
    pub min_expression: f64,
    pub max_expression: f64,
    pub total_data_points: usize,
}

/// Per-gene row of the gene table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneSummary {
    pub gene: String,
    pub tissue_count: usize,
    /// `None` when the gene has no values.
    pub min_expression: Option<f64>,
    pub max_expression: Option<f64>,
    pub mean_expression: Option<f64>,
}

/// One tissue of a gene, as listed in the expression analysis table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TissueExpression {
    pub tissue_id: String,
    pub expression: f64,
}

/// Gene ids in lexicographic order.
pub fn list_genes(dataset: &ExpressionDataset) -> Vec<String> {
    dataset.genes().keys().cloned().collect()
}

/// Union of tissue ids across all genes.
pub fn list_tissues(dataset: &ExpressionDataset) -> BTreeSet<String> {
    dataset
        .genes()
        .values()
        .flat_map(|tissues| tissues.keys().cloned())
        .collect()
}

/// `None` when the dataset has no genes or every gene mapping is empty.
pub fn summary_statistics(dataset: &ExpressionDataset) -> Option<SummaryStatistics> {
    let values: Vec<f64> = dataset.values().collect();
    let (mean, std, min, max) = describe(&values)?;

    Some(SummaryStatistics {
        gene_count: dataset.gene_count(),
        tissue_count: list_tissues(dataset).len(),
        mean_expression: mean,
        std_expression: std,
        min_expression: min,
        max_expression: max,
        total_data_points: values.len(),
    })
}

pub fn gene_summaries(dataset: &ExpressionDataset) -> Vec<GeneSummary> {
    dataset
        .genes()
        .iter()
        .map(|(gene, tissues)| {
            let values: Vec<f64> = tissues.values().copied().collect();
            let stats = describe(&values);
            GeneSummary {
                gene: gene.clone(),
                tissue_count: tissues.len(),
                min_expression: stats.map(|s| s.2),
                max_expression: stats.map(|s| s.3),
                mean_expression: stats.map(|s| s.0),
            }
        })
        .collect()
}

/// Tissues of `gene` with expression `>= threshold`, highest first.
/// Ties keep tissue id order.
pub fn ranked_tissues(
    dataset: &ExpressionDataset,
    gene: &str,
    threshold: f64,
) -> Result<Vec<TissueExpression>> {
    let tissues = dataset.gene(gene).ok_or_else(|| {
        AnatomyxError::Lookup(format!("Gene '{gene}' not found in expression data"))
    })?;

    let mut ranked: Vec<TissueExpression> = tissues
        .iter()
        .filter(|(_, v)| **v >= threshold)
        .map(|(tissue, v)| TissueExpression {
            tissue_id: tissue.clone(),
            expression: *v,
        })
        .collect();
    ranked.sort_by(|a, b| b.expression.total_cmp(&a.expression));
    Ok(ranked)
}

/// (mean, population std, min, max) of a non-empty slice.
fn describe(values: &[f64]) -> Option<(f64, f64, f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((mean, variance.sqrt(), min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn dataset(raw: serde_json::Value) -> ExpressionDataset {
        ExpressionDataset::from_value(&raw).unwrap()
    }

    #[test]
    fn test_single_value() {
        let ds = dataset(json!({"genes": {"A": {"X": 1.0}}}));
        assert_eq!(list_genes(&ds), vec!["A".to_string()]);
        assert_eq!(list_tissues(&ds), BTreeSet::from(["X".to_string()]));
        assert_eq!(
            summary_statistics(&ds),
            Some(SummaryStatistics {
                gene_count: 1,
                tissue_count: 1,
                mean_expression: 1.0,
                std_expression: 0.0,
                min_expression: 1.0,
                max_expression: 1.0,
                total_data_points: 1,
            })
        );
    }

    #[test]
    fn test_genes_sorted_and_tissues_unioned() {
        let ds = dataset(json!({"genes": {
            "TP53": {"T1": 0.2, "T2": 0.8},
            "BRCA1": {"T1": 0.5, "T3": 0.1},
            "ACTB": {}
        }}));
        assert_eq!(list_genes(&ds), vec!["ACTB", "BRCA1", "TP53"]);

        let stats = summary_statistics(&ds).unwrap();
        assert_eq!(stats.gene_count, 3);
        assert_eq!(stats.tissue_count, 3);
        assert_eq!(stats.total_data_points, 4);
        assert!((stats.mean_expression - 0.4).abs() < 1e-12);
        assert_eq!(stats.min_expression, 0.1);
        assert_eq!(stats.max_expression, 0.8);
        // population std of [0.2, 0.8, 0.5, 0.1]
        assert!((stats.std_expression - 0.075f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_no_data_is_explicit() {
        assert_eq!(summary_statistics(&dataset(json!({"genes": {}}))), None);
        assert_eq!(summary_statistics(&dataset(json!({"genes": {"A": {}, "B": {}}}))), None);
    }

    #[test]
    fn test_gene_summaries() {
        let ds = dataset(json!({"genes": {"A": {"X": 1.0, "Y": 3.0}, "B": {}}}));
        let rows = gene_summaries(&ds);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].gene, "A");
        assert_eq!(rows[0].tissue_count, 2);
        assert_eq!(rows[0].mean_expression, Some(2.0));
        assert_eq!(rows[0].min_expression, Some(1.0));
        assert_eq!(rows[0].max_expression, Some(3.0));
        assert_eq!(rows[1].gene, "B");
        assert_eq!(rows[1].mean_expression, None);
    }

    #[test]
    fn test_ranked_tissues() {
        let ds = dataset(json!({"genes": {"A": {"X": 0.1, "Y": 0.9, "Z": 0.5}}}));
        let ranked = ranked_tissues(&ds, "A", 0.2).unwrap();
        let ids: Vec<&str> = ranked.iter().map(|t| t.tissue_id.as_str()).collect();
        assert_eq!(ids, vec!["Y", "Z"]);

        let err = ranked_tissues(&ds, "B", 0.0).unwrap_err();
        assert!(matches!(err, AnatomyxError::Lookup(_)));
    }
}
