//! Colors and tooltips for a set of graphic elements.

use std::fmt;

use anatomyx_color::{map_value_to_color, ColorMapConfig, Rgb, NEUTRAL_COLOR};
use serde::Serialize;
use tracing::debug;

use crate::state::ViewState;

/// Hover text for one element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub tissue_name: String,
    /// Set only when the element is colored.
    pub expression: Option<f64>,
    pub gene: Option<String>,
}

impl Tooltip {
    pub fn no_data(tissue_name: &str) -> Self {
        Self {
            tissue_name: tissue_name.to_string(),
            expression: None,
            gene: None,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.tissue_name.clone()];
        match self.expression {
            Some(value) => {
                lines.push(format!("Expression: {value:.3}"));
                if let Some(gene) = &self.gene {
                    lines.push(format!("Gene: {gene}"));
                }
            }
            None => lines.push("No expression data".to_string()),
        }
        lines
    }
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementRender {
    pub element_id: String,
    pub color: Rgb,
    /// The value that produced `color`; `None` for neutral elements.
    pub expression: Option<f64>,
    pub tooltip: Tooltip,
}

impl ElementRender {
    pub fn is_colored(&self) -> bool {
        self.expression.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recomputation {
    pub gene: Option<String>,
    /// `None` when nothing can be colored.
    pub config: Option<ColorMapConfig>,
    pub elements: Vec<ElementRender>,
}

impl Recomputation {
    pub fn colored_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_colored()).count()
    }

    pub fn element(&self, element_id: &str) -> Option<&ElementRender> {
        self.elements.iter().find(|e| e.element_id == element_id)
    }
}

/// Color every element for the state's selected gene.
///
/// An element is colored iff the gene has a value for it that is at least
/// the threshold. Without a selected gene, or when the gene has no positive
/// value to span a domain, every element is neutral.
pub fn recompute<I, S>(state: &ViewState, element_ids: I) -> Recomputation
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let gene = state.selected_gene();
    let tissues = gene.and_then(|g| state.dataset().gene(g));
    let config = state.color_config();
    let names = state.tissue_names();

    let elements: Vec<ElementRender> = element_ids
        .into_iter()
        .map(|id| {
            let id = id.as_ref();
            let tissue_name = names.display_name(id);

            let colored = match (&config, tissues) {
                (Some(config), Some(tissues)) => tissues
                    .get(id)
                    .copied()
                    .filter(|v| *v >= config.threshold)
                    .map(|v| (v, map_value_to_color(Some(v), config))),
                _ => None,
            };

            match colored {
                Some((value, color)) => ElementRender {
                    element_id: id.to_string(),
                    color,
                    expression: Some(value),
                    tooltip: Tooltip {
                        tissue_name: tissue_name.to_string(),
                        expression: Some(value),
                        gene: gene.map(str::to_string),
                    },
                },
                None => ElementRender {
                    element_id: id.to_string(),
                    color: NEUTRAL_COLOR,
                    expression: None,
                    tooltip: Tooltip::no_data(tissue_name),
                },
            }
        })
        .collect();

    let result = Recomputation {
        gene: gene.map(str::to_string),
        config,
        elements,
    };
    debug!(
        "Recomputed {} elements for {:?}: {} colored",
        result.elements.len(),
        result.gene,
        result.colored_count()
    );
    result
}
