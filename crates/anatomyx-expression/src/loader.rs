//! Expression file loading.
//!
//! # Supported formats
//!
//! | Extension | Layout |
//! |-----------|--------|
//! | `.json` | `{"genes": {gene: {tissue: value}}}` |
//! | `.csv`  | gene × tissue matrix, comma separated |
//! | `.tsv`  | gene × tissue matrix, tab separated |
//!
//! # Matrix orientation
//!
//! One row per gene. The header row names the gene column in its first cell
//! and lists tissue ids in the remaining cells:
//!
//! ```text
//! gene,UBERON_0002107,UBERON_0000955
//! TP53,0.72,0.82
//! BRCA1,0.45,
//! ```
//!
//! Cells that are empty or not numbers are skipped. A gene whose row has no
//! numeric cells is left out of the dataset.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anatomyx_common::error::{AnatomyxError, Result};
use tracing::{debug, info, warn};

use crate::dataset::{ExpressionDataset, GeneExpression};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Csv,
    Tsv,
}

impl FileFormat {
    pub const SUPPORTED_EXTENSIONS: [&'static str; 3] = [".json", ".csv", ".tsv"];

    /// Pick the format from a file name's extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self> {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".json") {
            Ok(FileFormat::Json)
        } else if lower.ends_with(".csv") {
            Ok(FileFormat::Csv)
        } else if lower.ends_with(".tsv") {
            Ok(FileFormat::Tsv)
        } else {
            Err(AnatomyxError::Format(format!(
                "Unsupported file format for '{filename}'. Supported: {}",
                Self::SUPPORTED_EXTENSIONS.join(", ")
            )))
        }
    }

    fn delimiter(&self) -> u8 {
        match self {
            FileFormat::Tsv => b'\t',
            _ => b',',
        }
    }
}

/// Parse file content, dispatching on the file name's extension.
pub fn load_from_bytes(content: &[u8], filename: &str) -> Result<ExpressionDataset> {
    let format = FileFormat::from_filename(filename)?;
    debug!("Loading {} ({} bytes) as {:?}", filename, content.len(), format);

    let dataset = match format {
        FileFormat::Json => load_json(content)?,
        FileFormat::Csv | FileFormat::Tsv => load_matrix(content, format.delimiter())?,
    };

    info!(
        "Loaded {}: {} genes, {} values",
        filename,
        dataset.gene_count(),
        dataset.values().count()
    );
    Ok(dataset)
}

pub fn load_from_path(path: &Path) -> Result<ExpressionDataset> {
    let content = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    load_from_bytes(&content, &filename)
}

/// JSON must already have the dataset shape.
pub fn load_json(content: &[u8]) -> Result<ExpressionDataset> {
    let raw: serde_json::Value = serde_json::from_slice(strip_bom(content))
        .map_err(|e| AnatomyxError::Format(format!("Invalid JSON format: {e}")))?;
    ExpressionDataset::from_value(&raw)
}

/// Gene-per-row matrix; see the module docs for the layout.
pub fn load_matrix(content: &[u8], delimiter: u8) -> Result<ExpressionDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(strip_bom(content));

    let headers = reader
        .headers()
        .map_err(|e| AnatomyxError::Format(format!("Cannot read header row: {e}")))?
        .clone();

    if headers.len() < 2 {
        return Err(AnatomyxError::Format(
            "Header row must name the gene column followed by at least one tissue id".to_string(),
        ));
    }

    // First column is the gene id, rest are tissue ids
    let mut seen = HashSet::new();
    let mut tissue_ids = Vec::with_capacity(headers.len() - 1);
    for (i, header) in headers.iter().enumerate().skip(1) {
        if header.is_empty() {
            return Err(AnatomyxError::Format(format!(
                "Tissue id in header column {} is empty",
                i + 1
            )));
        }
        if !seen.insert(header) {
            return Err(AnatomyxError::Format(format!(
                "Tissue id '{header}' appears more than once in the header row"
            )));
        }
        tissue_ids.push(header.to_string());
    }

    let mut genes: BTreeMap<String, GeneExpression> = BTreeMap::new();
    let mut rows = 0usize;

    for result in reader.records() {
        let record = result?;
        rows += 1;

        let gene = record.get(0).unwrap_or_default();
        if gene.is_empty() {
            let line = record.position().map(|p| p.line()).unwrap_or(rows as u64 + 1);
            return Err(AnatomyxError::Format(format!("Gene id on line {line} is empty")));
        }

        let values: GeneExpression = record
            .iter()
            .skip(1)
            .zip(tissue_ids.iter())
            .filter_map(|(cell, tissue)| {
                cell.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(|v| (tissue.clone(), v))
            })
            .collect();

        if values.is_empty() {
            debug!("Gene {} has no numeric values, skipping", gene);
            continue;
        }
        if genes.insert(gene.to_string(), values).is_some() {
            warn!("Gene {} appears on more than one row; keeping the last", gene);
        }
    }

    if rows == 0 {
        return Err(AnatomyxError::Format("Matrix file contains no data rows".to_string()));
    }

    ExpressionDataset::from_genes(genes)
}

fn strip_bom(content: &[u8]) -> &[u8] {
    content.strip_prefix(UTF8_BOM).unwrap_or(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_dispatch() {
        assert_eq!(FileFormat::from_filename("data.JSON").unwrap(), FileFormat::Json);
        assert_eq!(FileFormat::from_filename("a.b.csv").unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_filename("x.tsv").unwrap(), FileFormat::Tsv);

        let err = FileFormat::from_filename("data.xlsx").unwrap_err();
        assert!(matches!(err, AnatomyxError::Format(_)));
        assert!(err.to_string().contains(".json, .csv, .tsv"));
    }

    #[test]
    fn test_load_csv() {
        let csv = b"gene,UBERON_0002107,UBERON_0000955\nTP53,0.72,0.82\nBRCA1,0.45,\n";
        let ds = load_from_bytes(csv, "expr.csv").unwrap();
        assert_eq!(ds.gene_count(), 2);
        assert_eq!(ds.value("TP53", "UBERON_0000955"), Some(0.82));
        assert_eq!(ds.value("BRCA1", "UBERON_0002107"), Some(0.45));
        assert_eq!(ds.value("BRCA1", "UBERON_0000955"), None);
    }

    #[test]
    fn test_load_tsv_with_bom_and_padding() {
        let tsv = b"\xEF\xBB\xBFgene\t T1 \tT2\n G1 \t 1.5 \tn/a\n";
        let ds = load_from_bytes(tsv, "expr.tsv").unwrap();
        assert_eq!(ds.value("G1", "T1"), Some(1.5));
        assert_eq!(ds.value("G1", "T2"), None);
    }

    #[test]
    fn test_rows_without_numbers_are_dropped() {
        let csv = b"gene,T1\nG1,NA\nG2,3\nG3,NaN\n";
        let ds = load_from_bytes(csv, "x.csv").unwrap();
        assert!(!ds.contains_gene("G1"));
        assert!(!ds.contains_gene("G3"));
        assert!(ds.contains_gene("G2"));
    }

    #[test]
    fn test_short_rows_are_tolerated() {
        let csv = b"gene,T1,T2,T3\nG1,1\n";
        let ds = load_from_bytes(csv, "x.csv").unwrap();
        assert_eq!(ds.gene("G1").unwrap().len(), 1);
    }

    #[test]
    fn test_header_errors() {
        for (content, needle) in [
            (&b"gene\nG1\n"[..], "at least one tissue"),
            (&b"gene,T1,\nG1,1,2\n"[..], "column 3 is empty"),
            (&b"gene,T1,T1\nG1,1,2\n"[..], "more than once"),
            (&b""[..], "at least one tissue"),
        ] {
            let err = load_from_bytes(content, "x.csv").unwrap_err();
            assert!(matches!(err, AnatomyxError::Format(_)), "{err}");
            assert!(err.to_string().contains(needle), "{err}");
        }
    }

    #[test]
    fn test_blank_gene_id_is_format_error() {
        let err = load_from_bytes(b"gene,T1\n,1\n", "x.csv").unwrap_err();
        assert!(matches!(err, AnatomyxError::Format(_)));
    }

    #[test]
    fn test_header_only_is_format_error() {
        let err = load_from_bytes(b"gene,T1\n", "x.csv").unwrap_err();
        assert!(err.to_string().contains("no data rows"));
    }

    #[test]
    fn test_negative_cell_is_validation_error() {
        let err = load_from_bytes(b"gene,T1\nG1,-2\n", "x.csv").unwrap_err();
        assert!(matches!(err, AnatomyxError::Validation(_)));
    }

    #[test]
    fn test_duplicate_gene_keeps_last() {
        let ds = load_from_bytes(b"gene,T1\nG1,1\nG1,2\n", "x.csv").unwrap();
        assert_eq!(ds.value("G1", "T1"), Some(2.0));
    }

    #[test]
    fn test_load_json() {
        let ds = load_from_bytes(br#"{"genes": {"A": {"X": 1}}}"#, "d.json").unwrap();
        assert_eq!(ds.value("A", "X"), Some(1.0));

        let syntax = load_from_bytes(b"{genes:", "d.json").unwrap_err();
        assert!(matches!(syntax, AnatomyxError::Format(_)));

        let shape = load_from_bytes(br#"{"genes": []}"#, "d.json").unwrap_err();
        assert!(matches!(shape, AnatomyxError::Validation(_)));
    }
}
