//! JSON exports of (filtered) expression data with provenance metadata.

use std::collections::BTreeMap;

use anatomyx_common::error::{AnatomyxError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dataset::{ExpressionDataset, GeneExpression};
use crate::transform::filter_by_threshold;
use crate::validate::check_threshold;

/// Threshold-filtered copy of the whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdExport {
    pub genes: BTreeMap<String, GeneExpression>,
    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub threshold: f64,
    pub selected_gene: String,
    /// Gene count of the dataset before filtering.
    pub total_genes: usize,
    pub export_date: DateTime<Utc>,
}

/// Unfiltered values of a single gene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneExport {
    pub gene: String,
    pub expression_data: GeneExpression,
    pub metadata: GeneExportMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneExportMetadata {
    pub total_tissues: usize,
    pub threshold: f64,
    pub export_date: DateTime<Utc>,
}

/// Fails with a lookup error when `selected_gene` is not in the dataset and
/// with a validation error for a non-finite threshold.
pub fn export_filtered(
    dataset: &ExpressionDataset,
    threshold: f64,
    selected_gene: &str,
    now: DateTime<Utc>,
) -> Result<ThresholdExport> {
    check_threshold(threshold)?;
    lookup_gene(dataset, selected_gene)?;

    let filtered = filter_by_threshold(dataset, threshold);
    Ok(ThresholdExport {
        genes: filtered.into_genes(),
        metadata: ExportMetadata {
            threshold,
            selected_gene: selected_gene.to_string(),
            total_genes: dataset.gene_count(),
            export_date: now,
        },
    })
}

/// Same error cases as [`export_filtered`].
pub fn export_gene(
    dataset: &ExpressionDataset,
    gene: &str,
    threshold: f64,
    now: DateTime<Utc>,
) -> Result<GeneExport> {
    check_threshold(threshold)?;
    let tissues = lookup_gene(dataset, gene)?;

    Ok(GeneExport {
        gene: gene.to_string(),
        expression_data: tissues.clone(),
        metadata: GeneExportMetadata {
            total_tissues: tissues.len(),
            threshold,
            export_date: now,
        },
    })
}

fn lookup_gene<'a>(dataset: &'a ExpressionDataset, gene: &str) -> Result<&'a GeneExpression> {
    dataset
        .gene(gene)
        .ok_or_else(|| AnatomyxError::Lookup(format!("Gene '{gene}' not found in expression data")))
}

/// `<prefix>_expression_YYYYmmdd_HHMMSS.json`
pub fn export_file_name(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{prefix}_expression_{}.json", now.format("%Y%m%d_%H%M%S"))
}

impl ThresholdExport {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn file_name(&self) -> String {
        export_file_name("filtered", self.metadata.export_date)
    }
}

impl GeneExport {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn file_name(&self) -> String {
        export_file_name(&self.gene, self.metadata.export_date)
    }
}
