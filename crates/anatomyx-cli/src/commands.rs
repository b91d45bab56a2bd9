//! Subcommand implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anatomyx_color::{Palette, Scale};
use anatomyx_common::{TissueNameMap, ViewerConfig};
use anatomyx_expression::{
    export_filtered, export_gene, gene_summaries, list_tissues, load_from_path, ranked_tissues,
    summary_statistics, ExpressionDataset,
};
use anatomyx_view::{Anatomogram, MemorySurface, Sex, ViewParams, ViewState};
use anyhow::Context;
use chrono::Utc;
use tracing::info;

/// Tissues listed after a gene export.
const TOP_TISSUES: usize = 10;

pub fn load_config(path: Option<&Path>) -> anyhow::Result<ViewerConfig> {
    let config = match path {
        Some(path) => ViewerConfig::from_path(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => ViewerConfig::load().context("Failed to load configuration")?,
    };
    Ok(config)
}

fn load_dataset(file: &Path) -> anyhow::Result<ExpressionDataset> {
    load_from_path(file).with_context(|| format!("Failed to load {}", file.display()))
}

pub fn summary(file: &Path, json: bool) -> anyhow::Result<()> {
    let dataset = load_dataset(file)?;
    let stats = summary_statistics(&dataset);
    let genes = gene_summaries(&dataset);

    if json {
        let doc = serde_json::json!({ "summary": stats, "genes": genes });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    match stats {
        Some(s) => {
            println!("Genes:        {}", s.gene_count);
            println!("Tissues:      {}", s.tissue_count);
            println!("Data points:  {}", s.total_data_points);
            println!("Mean:         {:.3}", s.mean_expression);
            println!("Std:          {:.3}", s.std_expression);
            println!("Range:        {:.3} .. {:.3}", s.min_expression, s.max_expression);
        }
        None => println!("Dataset contains no expression values"),
    }

    if !genes.is_empty() {
        println!();
        println!("{:<16} {:>8} {:>10} {:>10} {:>10}", "gene", "tissues", "min", "mean", "max");
        for g in &genes {
            println!(
                "{:<16} {:>8} {:>10} {:>10} {:>10}",
                g.gene,
                g.tissue_count,
                fmt_opt(g.min_expression),
                fmt_opt(g.mean_expression),
                fmt_opt(g.max_expression)
            );
        }
    }
    Ok(())
}

/// Render flags that take precedence over the config file.
#[derive(Debug, Default)]
pub struct RenderOverrides {
    pub gene: Option<String>,
    pub palette: Option<String>,
    pub scale: Option<String>,
    pub threshold: Option<f64>,
    pub sex: Option<String>,
    pub names: Option<PathBuf>,
}

impl RenderOverrides {
    pub fn params(&self, config: &ViewerConfig) -> ViewParams {
        let mut params = ViewParams::from_config(&config.view);
        params.selected_gene = self.gene.clone();
        if let Some(palette) = &self.palette {
            params.palette = Palette::from_name(palette);
        }
        if let Some(scale) = &self.scale {
            params.scale = Scale::from_name(scale);
        }
        if let Some(threshold) = self.threshold {
            params.threshold = threshold;
        }
        if let Some(sex) = &self.sex {
            params.sex = Sex::from_name(sex);
        }
        params
    }

    pub fn names_path<'a>(&'a self, config: &'a ViewerConfig) -> Option<&'a Path> {
        self.names.as_deref().or(config.data.tissue_names.as_deref())
    }
}

pub fn render(
    file: &Path,
    config: &ViewerConfig,
    overrides: RenderOverrides,
    json: bool,
) -> anyhow::Result<()> {
    let dataset = load_dataset(file)?;
    let names = match overrides.names_path(config) {
        Some(path) => TissueNameMap::from_path(path)
            .with_context(|| format!("Failed to load tissue names {}", path.display()))?,
        None => TissueNameMap::new(),
    };

    // every tissue in the data stands in for a shape in the graphic
    let surface = MemorySurface::new().with_elements(list_tissues(&dataset));
    let state = ViewState::new(Arc::new(dataset), Arc::new(names), overrides.params(config))?;

    let mut view = Anatomogram::new(surface, state);
    let result = view.load()?;
    info!("{} of {} tissues colored", result.colored_count(), result.elements.len());

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let params = view.state().params();
    println!(
        "Gene: {}  palette: {}  scale: {}  threshold: {}",
        result.gene.as_deref().unwrap_or("-"),
        params.palette,
        params.scale,
        params.threshold
    );
    for element in &result.elements {
        println!(
            "{:<20} {:<8} {:>10}  {}",
            element.element_id,
            element.color.to_hex(),
            fmt_opt(element.expression),
            element.tooltip.tissue_name
        );
    }
    Ok(())
}

pub fn export(
    file: &Path,
    threshold: f64,
    gene: Option<String>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let dataset = load_dataset(file)?;
    let selected = match gene {
        Some(gene) => gene,
        None => dataset
            .genes()
            .keys()
            .next()
            .cloned()
            .context("Dataset contains no genes to export")?,
    };

    let export = export_filtered(&dataset, threshold, &selected, Utc::now())?;
    let out = out.unwrap_or_else(|| PathBuf::from(export.file_name()));
    write_output(&out, &export.to_json_pretty()?)?;

    println!(
        "Exported {} of {} genes at threshold {} to {}",
        export.genes.len(),
        export.metadata.total_genes,
        threshold,
        out.display()
    );
    Ok(())
}

pub fn gene(file: &Path, gene: &str, threshold: f64, out: Option<PathBuf>) -> anyhow::Result<()> {
    let dataset = load_dataset(file)?;
    let export = export_gene(&dataset, gene, threshold, Utc::now())?;
    let out = out.unwrap_or_else(|| PathBuf::from(export.file_name()));
    write_output(&out, &export.to_json_pretty()?)?;

    println!(
        "Exported {} tissues for {} to {}",
        export.metadata.total_tissues,
        gene,
        out.display()
    );

    let ranked = ranked_tissues(&dataset, gene, threshold)?;
    for tissue in ranked.iter().take(TOP_TISSUES) {
        println!("  {:<20} {:.3}", tissue.tissue_id, tissue.expression);
    }
    Ok(())
}

fn write_output(path: &Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.3}")).unwrap_or_else(|| "-".to_string())
}
