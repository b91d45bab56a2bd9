//! anatomyx-expression: Gene × tissue expression datasets.
//!
//! Loading (JSON, CSV, TSV), shape validation, descriptive statistics,
//! threshold filtering and JSON export. Every dataset is immutable once
//! built; transformations return a new one.

pub mod dataset;
pub mod export;
pub mod loader;
pub mod summary;
pub mod transform;
pub mod validate;

pub use dataset::{ExpressionDataset, GeneExpression};
pub use export::{export_file_name, export_filtered, export_gene, GeneExport, ThresholdExport};
pub use loader::{load_from_bytes, load_from_path, FileFormat};
pub use summary::{
    gene_summaries, list_genes, list_tissues, ranked_tissues, summary_statistics, GeneSummary,
    SummaryStatistics, TissueExpression,
};
pub use transform::{filter_by_threshold, normalize_minmax};
pub use validate::{check_threshold, validate, Validation};
