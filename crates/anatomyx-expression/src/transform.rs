//! Dataset → dataset transformations.

use std::collections::BTreeMap;

use tracing::debug;

use crate::dataset::{ExpressionDataset, GeneExpression};

/// Keep values `>= threshold`. Genes left without tissues are dropped.
pub fn filter_by_threshold(dataset: &ExpressionDataset, threshold: f64) -> ExpressionDataset {
    let genes: BTreeMap<String, GeneExpression> = dataset
        .genes()
        .iter()
        .filter_map(|(gene, tissues)| {
            let kept: GeneExpression = tissues
                .iter()
                .filter(|(_, v)| **v >= threshold)
                .map(|(t, v)| (t.clone(), *v))
                .collect();
            (!kept.is_empty()).then(|| (gene.clone(), kept))
        })
        .collect();

    debug!(
        "Threshold {} kept {} of {} genes",
        threshold,
        genes.len(),
        dataset.gene_count()
    );

    // subset of an already validated dataset
    ExpressionDataset::from_trusted(genes)
}

/// Min-max normalisation within [min_val, max_val].
/// Degenerate range → 0.5 (every value sits in the middle).
pub fn minmax_normalise(value: f64, min_val: f64, max_val: f64) -> f64 {
    if (max_val - min_val).abs() < 1e-10 {
        return 0.5;
    }
    ((value - min_val) / (max_val - min_val)).clamp(0.0, 1.0)
}

/// Rescale every value into [0, 1] against the dataset-wide min and max.
pub fn normalize_minmax(dataset: &ExpressionDataset) -> ExpressionDataset {
    let (min_val, max_val) = dataset
        .values()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if min_val > max_val {
        // no values at all
        return dataset.clone();
    }

    let genes: BTreeMap<String, GeneExpression> = dataset
        .clone()
        .into_genes()
        .into_iter()
        .map(|(gene, tissues)| {
            let scaled = tissues
                .into_iter()
                .map(|(t, v)| (t, minmax_normalise(v, min_val, max_val)))
                .collect();
            (gene, scaled)
        })
        .collect();

    ExpressionDataset::from_trusted(genes)
}
