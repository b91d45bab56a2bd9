//! anatomyx-color: Expression value → color mapping.
//!
//! A value is normalised against a domain (linear or logarithmic scale),
//! then fed through a continuous palette. Values that are absent or below
//! the configured threshold get [`NEUTRAL_COLOR`].

pub mod color;
pub mod mapper;
pub mod palette;
pub mod scale;

pub use color::Rgb;
pub use mapper::{map_value_to_color, ColorMapConfig, NEUTRAL_COLOR};
pub use palette::Palette;
pub use scale::{Domain, Scale, LOG_FLOOR};
