//! anatomyx-common: Shared types, errors, and configuration used across all anatomyx crates.

pub mod error;
pub mod tissue_names;
pub mod viewer_config;

// Re-export commonly used types
pub use error::{AnatomyxError, Result};
pub use tissue_names::TissueNameMap;
pub use viewer_config::{DataConfig, ViewConfig, ViewerConfig};
