//! Rendering surface capability.

use std::collections::BTreeMap;

use anatomyx_color::Rgb;
use anatomyx_common::error::{AnatomyxError, Result};
use tracing::debug;

use crate::recompute::Tooltip;

/// Produces the tooltip shown while the pointer is over an element.
pub type HoverHandler = Box<dyn Fn() -> Tooltip + Send + Sync>;

/// A loaded anatomogram: where it came from and the ids of its shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graphic {
    pub url: String,
    pub element_ids: Vec<String>,
}

impl Graphic {
    /// Element ids that name tissues, in document order.
    pub fn tissue_elements<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.element_ids
            .iter()
            .map(String::as_str)
            .filter(move |id| id.starts_with(prefix))
    }
}

/// Something that can show an anatomogram and paint its shapes.
pub trait RenderSurface {
    /// Fetch and display the graphic at `url`, replacing any previous one.
    fn load_graphic(&mut self, url: &str) -> Result<Graphic>;

    fn set_element_color(&mut self, element_id: &str, color: Rgb);

    /// Replaces any handler already registered for the element.
    fn on_hover(&mut self, element_id: &str, handler: HoverHandler);
}

// ── In-memory Implementation ───────────────────────────────────────────────

/// Surface that keeps everything in maps. Every URL "contains" the same
/// element ids.
#[derive(Default)]
pub struct MemorySurface {
    element_ids: Vec<String>,
    load_failure: Option<String>,
    loaded_urls: Vec<String>,
    colors: BTreeMap<String, Rgb>,
    hover: BTreeMap<String, HoverHandler>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, element_id: &str) -> Self {
        self.element_ids.push(element_id.to_string());
        self
    }

    pub fn with_elements<I, S>(mut self, element_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.element_ids.extend(element_ids.into_iter().map(Into::into));
        self
    }

    /// Every subsequent load fails with `message`.
    pub fn with_load_failure(mut self, message: &str) -> Self {
        self.load_failure = Some(message.to_string());
        self
    }

    pub fn loaded_urls(&self) -> &[String] {
        &self.loaded_urls
    }

    pub fn color_of(&self, element_id: &str) -> Option<Rgb> {
        self.colors.get(element_id).copied()
    }

    pub fn colors(&self) -> &BTreeMap<String, Rgb> {
        &self.colors
    }

    /// Simulate hovering over an element.
    pub fn hover(&self, element_id: &str) -> Option<Tooltip> {
        self.hover.get(element_id).map(|handler| handler())
    }
}

impl RenderSurface for MemorySurface {
    fn load_graphic(&mut self, url: &str) -> Result<Graphic> {
        if let Some(message) = &self.load_failure {
            return Err(AnatomyxError::Render(format!("Failed to load {url}: {message}")));
        }

        // a fresh document has no paint or listeners
        self.colors.clear();
        self.hover.clear();
        self.loaded_urls.push(url.to_string());
        debug!("Loaded {} with {} elements", url, self.element_ids.len());

        Ok(Graphic {
            url: url.to_string(),
            element_ids: self.element_ids.clone(),
        })
    }

    fn set_element_color(&mut self, element_id: &str, color: Rgb) {
        self.colors.insert(element_id.to_string(), color);
    }

    fn on_hover(&mut self, element_id: &str, handler: HoverHandler) {
        self.hover.insert(element_id.to_string(), handler);
    }
}
