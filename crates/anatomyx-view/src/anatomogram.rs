//! Drives a [`RenderSurface`] from a [`ViewState`].

use anatomyx_common::error::Result;
use tracing::{debug, info};

use crate::recompute::{recompute, Recomputation};
use crate::state::{PropertyChange, Transition, ViewState};
use crate::surface::{Graphic, RenderSurface};

pub struct Anatomogram<S: RenderSurface> {
    surface: S,
    state: ViewState,
    graphic: Option<Graphic>,
}

impl<S: RenderSurface> Anatomogram<S> {
    /// Nothing is loaded until [`load`](Self::load) is called.
    pub fn new(surface: S, state: ViewState) -> Self {
        Self {
            surface,
            state,
            graphic: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn graphic(&self) -> Option<&Graphic> {
        self.graphic.as_ref()
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Load the graphic for the current sex and base URL, then paint it.
    ///
    /// On failure the previous graphic is forgotten; nothing is painted
    /// until a later load succeeds.
    pub fn load(&mut self) -> Result<Recomputation> {
        self.graphic = None;
        let url = self.state.graphic_url()?;
        let graphic = self.surface.load_graphic(&url)?;
        info!("Loaded anatomogram {} ({} elements)", url, graphic.element_ids.len());
        self.graphic = Some(graphic);
        Ok(self.paint())
    }

    /// Repaint the loaded graphic. `None` if no graphic is loaded.
    pub fn render(&mut self) -> Option<Recomputation> {
        if self.graphic.is_none() {
            debug!("Render requested before a graphic was loaded");
            return None;
        }
        Some(self.paint())
    }

    /// Apply a property change and bring the surface up to date.
    ///
    /// New data arriving before any graphic is shown triggers a load.
    pub fn apply(&mut self, change: PropertyChange) -> Result<Transition> {
        let is_dataset = matches!(change, PropertyChange::Dataset(_));
        let (next, transition) = self.state.apply(change)?;
        self.state = next;

        match transition {
            Transition::Recolor if is_dataset && self.graphic.is_none() => {
                self.load()?;
            }
            Transition::Reload => {
                self.load()?;
            }
            Transition::Recolor => {
                self.render();
            }
        }
        Ok(transition)
    }

    fn paint(&mut self) -> Recomputation {
        let prefix = self.state.params().tissue_prefix.as_str();
        let ids: Vec<&str> = self
            .graphic
            .as_ref()
            .map(|g| g.tissue_elements(prefix).collect())
            .unwrap_or_default();

        let result = recompute(&self.state, ids);

        for element in &result.elements {
            self.surface.set_element_color(&element.element_id, element.color);
            let tooltip = element.tooltip.clone();
            self.surface
                .on_hover(&element.element_id, Box::new(move || tooltip.clone()));
        }
        result
    }
}
