//! Property bag and the transitions between its snapshots.

use std::fmt;
use std::sync::Arc;

use anatomyx_color::{ColorMapConfig, Domain, Palette, Scale};
use anatomyx_common::error::{AnatomyxError, Result};
use anatomyx_common::{TissueNameMap, ViewConfig};
use anatomyx_expression::{check_threshold, list_genes, ExpressionDataset};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl Sex {
    pub fn name(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    /// Case-insensitive; anything unrecognised is male.
    pub fn from_name(name: &str) -> Sex {
        match name.trim().to_ascii_lowercase().as_str() {
            "female" => Sex::Female,
            "male" => Sex::Male,
            other => {
                debug!("Unknown sex '{}', using male", other);
                Sex::Male
            }
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `<base>/homo_sapiens.<sex>.svg`
pub fn graphic_url(base_url: &str, sex: Sex) -> Result<String> {
    let base = base_url.trim().trim_end_matches('/');
    if base.is_empty() {
        return Err(AnatomyxError::Render("Graphic base URL is not set".to_string()));
    }
    Ok(format!("{base}/homo_sapiens.{}.svg", sex.name()))
}

/// Scalar view parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewParams {
    pub selected_gene: Option<String>,
    pub sex: Sex,
    pub palette: Palette,
    pub scale: Scale,
    pub threshold: f64,
    pub svg_base_url: String,
    pub tissue_prefix: String,
}

impl ViewParams {
    pub fn from_config(config: &ViewConfig) -> Self {
        Self {
            selected_gene: None,
            sex: Sex::from_name(&config.sex),
            palette: Palette::from_name(&config.palette),
            scale: Scale::from_name(&config.scale),
            threshold: config.threshold,
            svg_base_url: config.svg_base_url.clone(),
            tissue_prefix: config.tissue_prefix.clone(),
        }
    }
}

impl Default for ViewParams {
    fn default() -> Self {
        Self::from_config(&ViewConfig::default())
    }
}

/// One host-side property update.
#[derive(Debug, Clone)]
pub enum PropertyChange {
    SelectedGene(String),
    Sex(Sex),
    Palette(Palette),
    Scale(Scale),
    Threshold(f64),
    SvgBaseUrl(String),
    Dataset(Arc<ExpressionDataset>),
    TissueNames(Arc<TissueNameMap>),
}

/// What the surface has to do after a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Repaint the current graphic.
    Recolor,
    /// Fetch a different graphic, then repaint it.
    Reload,
}

/// Immutable snapshot of everything a render depends on.
///
/// While the dataset is non-empty the selected gene is always one of its
/// genes.
#[derive(Debug, Clone)]
pub struct ViewState {
    params: ViewParams,
    dataset: Arc<ExpressionDataset>,
    tissue_names: Arc<TissueNameMap>,
}

impl ViewState {
    /// With no gene selected the first gene of the dataset is picked.
    pub fn new(
        dataset: Arc<ExpressionDataset>,
        tissue_names: Arc<TissueNameMap>,
        params: ViewParams,
    ) -> Result<Self> {
        check_threshold(params.threshold)?;

        let mut state = Self {
            params,
            dataset,
            tissue_names,
        };
        match state.params.selected_gene.clone() {
            Some(gene) => state.ensure_gene(&gene)?,
            None => state.params.selected_gene = state.first_gene(),
        }
        Ok(state)
    }

    pub fn params(&self) -> &ViewParams {
        &self.params
    }

    pub fn dataset(&self) -> &Arc<ExpressionDataset> {
        &self.dataset
    }

    pub fn tissue_names(&self) -> &Arc<TissueNameMap> {
        &self.tissue_names
    }

    pub fn selected_gene(&self) -> Option<&str> {
        self.params.selected_gene.as_deref()
    }

    /// Genes offered for selection, sorted.
    pub fn available_genes(&self) -> Vec<String> {
        list_genes(&self.dataset)
    }

    pub fn graphic_url(&self) -> Result<String> {
        graphic_url(&self.params.svg_base_url, self.params.sex)
    }

    /// Switch the displayed gene.
    pub fn select_gene(&self, gene: &str) -> Result<ViewState> {
        self.ensure_gene(gene)?;
        let mut next = self.clone();
        next.params.selected_gene = Some(gene.to_string());
        Ok(next)
    }

    /// Apply one property change, returning the new snapshot.
    pub fn apply(&self, change: PropertyChange) -> Result<(ViewState, Transition)> {
        let mut next = self.clone();

        let transition = match change {
            PropertyChange::SelectedGene(gene) => {
                return Ok((self.select_gene(&gene)?, Transition::Recolor));
            }
            PropertyChange::Sex(sex) => {
                next.params.sex = sex;
                Transition::Reload
            }
            PropertyChange::SvgBaseUrl(url) => {
                next.params.svg_base_url = url;
                Transition::Reload
            }
            PropertyChange::Palette(palette) => {
                next.params.palette = palette;
                Transition::Recolor
            }
            PropertyChange::Scale(scale) => {
                next.params.scale = scale;
                Transition::Recolor
            }
            PropertyChange::Threshold(threshold) => {
                check_threshold(threshold)?;
                next.params.threshold = threshold;
                Transition::Recolor
            }
            PropertyChange::Dataset(dataset) => {
                next.dataset = dataset;
                let keep = next
                    .selected_gene()
                    .is_some_and(|g| next.dataset.contains_gene(g));
                if !keep {
                    next.params.selected_gene = next.first_gene();
                    info!(
                        "Dataset replaced, selected gene is now {:?}",
                        next.params.selected_gene
                    );
                }
                Transition::Recolor
            }
            PropertyChange::TissueNames(names) => {
                next.tissue_names = names;
                Transition::Recolor
            }
        };

        debug!("Property change → {:?}", transition);
        Ok((next, transition))
    }

    /// Color mapping for the selected gene.
    ///
    /// The domain spans the gene's strictly positive values. `None` when no
    /// gene is selected or it has no positive value.
    pub fn color_config(&self) -> Option<ColorMapConfig> {
        let tissues = self.dataset.gene(self.selected_gene()?)?;
        let domain = Domain::spanning(tissues.values().copied().filter(|v| *v > 0.0))?;

        Some(ColorMapConfig {
            palette: self.params.palette,
            scale: self.params.scale,
            domain,
            threshold: self.params.threshold,
        })
    }

    fn ensure_gene(&self, gene: &str) -> Result<()> {
        if self.dataset.contains_gene(gene) {
            Ok(())
        } else {
            Err(AnatomyxError::Lookup(format!(
                "Gene '{gene}' not found in expression data"
            )))
        }
    }

    fn first_gene(&self) -> Option<String> {
        self.dataset.genes().keys().next().cloned()
    }
}
