//! Expression value → color.

use serde::Serialize;

use crate::color::Rgb;
use crate::palette::Palette;
use crate::scale::{Domain, Scale};

/// Fill for "no data" and "below threshold". Never produced by a palette
/// lookup through [`map_value_to_color`].
pub const NEUTRAL_COLOR: Rgb = Rgb::new(0xE0, 0xE0, 0xE0);

/// Snapshot of the color mapping parameters. Rebuilt on every interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorMapConfig {
    pub palette: Palette,
    pub scale: Scale,
    pub domain: Domain,
    /// Values strictly below this are rendered neutral.
    pub threshold: f64,
}

impl ColorMapConfig {
    pub fn new(palette: Palette, scale: Scale, domain_min: f64, domain_max: f64, threshold: f64) -> Self {
        Self {
            palette,
            scale,
            domain: Domain::new(domain_min, domain_max),
            threshold,
        }
    }

    pub fn with_palette(self, palette: Palette) -> Self {
        Self { palette, ..self }
    }

    pub fn with_scale(self, scale: Scale) -> Self {
        Self { scale, ..self }
    }

    pub fn with_threshold(self, threshold: f64) -> Self {
        Self { threshold, ..self }
    }

    /// Normalised position of a value that passes the threshold check.
    pub fn position(&self, value: f64) -> f64 {
        self.scale.normalize(value, &self.domain)
    }
}

impl Default for ColorMapConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            scale: Scale::default(),
            domain: Domain::default(),
            threshold: 0.0,
        }
    }
}

/// Map an expression value to a fill color.
///
/// Absent, NaN, and below-threshold values yield [`NEUTRAL_COLOR`];
/// everything else goes through the scale and then the palette.
pub fn map_value_to_color(value: Option<f64>, config: &ColorMapConfig) -> Rgb {
    match value {
        Some(v) if !v.is_nan() && !(v < config.threshold) => {
            config.palette.interpolate(config.position(v))
        }
        _ => NEUTRAL_COLOR,
    }
}
