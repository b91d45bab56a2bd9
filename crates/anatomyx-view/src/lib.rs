//! Host-facing layer over the color mapper and the expression dataset.
//!
//! A host owns a [`ViewState`], feeds it [`PropertyChange`]s and hands the
//! resulting colors to a [`RenderSurface`]. [`Anatomogram`] wires the two
//! together.

pub mod anatomogram;
pub mod recompute;
pub mod state;
pub mod surface;

pub use anatomogram::Anatomogram;
pub use recompute::{recompute, ElementRender, Recomputation, Tooltip};
pub use state::{graphic_url, PropertyChange, Sex, Transition, ViewParams, ViewState};
pub use surface::{Graphic, HoverHandler, MemorySurface, RenderSurface};
