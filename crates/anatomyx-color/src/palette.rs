//! Named continuous color palettes over [0, 1].
//!
//! | Palette | Interpolation |
//! |---------|---------------|
//! | viridis, magma, inferno, plasma | piecewise-linear over 11 reference stops |
//! | turbo, cividis | fifth-degree polynomial per channel |
//! | warm, cool | long-path cubehelix |
//!
//! Unknown names resolve to [`Palette::Viridis`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Palette {
    #[default]
    Viridis,
    Magma,
    Inferno,
    Plasma,
    Turbo,
    Cividis,
    Warm,
    Cool,
}

impl Palette {
    /// Every selectable palette, in picker order.
    pub const ALL: [Palette; 8] = [
        Palette::Viridis,
        Palette::Magma,
        Palette::Inferno,
        Palette::Plasma,
        Palette::Turbo,
        Palette::Cividis,
        Palette::Warm,
        Palette::Cool,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Palette::Viridis => "viridis",
            Palette::Magma => "magma",
            Palette::Inferno => "inferno",
            Palette::Plasma => "plasma",
            Palette::Turbo => "turbo",
            Palette::Cividis => "cividis",
            Palette::Warm => "warm",
            Palette::Cool => "cool",
        }
    }

    /// Exact (case-insensitive) lookup.
    pub fn lookup(name: &str) -> Option<Palette> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    /// Lookup with fallback to the default palette.
    pub fn from_name(name: &str) -> Palette {
        Self::lookup(name).unwrap_or_else(|| {
            debug!("Unknown palette '{}', falling back to {}", name, Palette::default());
            Palette::default()
        })
    }

    /// Continuous interpolator. `t` is clamped to [0, 1]; NaN reads as 0.
    pub fn interpolate(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Palette::Viridis => ramp(&VIRIDIS, t),
            Palette::Magma => ramp(&MAGMA, t),
            Palette::Inferno => ramp(&INFERNO, t),
            Palette::Plasma => ramp(&PLASMA, t),
            Palette::Turbo => turbo(t),
            Palette::Cividis => cividis(t),
            Palette::Warm => cubehelix_long(WARM_START, CUBEHELIX_END, t),
            Palette::Cool => cubehelix_long(COOL_START, CUBEHELIX_END, t),
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Palette {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Palette::from_name(s))
    }
}

impl From<String> for Palette {
    fn from(name: String) -> Self {
        Palette::from_name(&name)
    }
}

impl From<Palette> for String {
    fn from(palette: Palette) -> Self {
        palette.name().to_string()
    }
}

// ── Stop ramps ───────────────────────────────────────────────────────────────

const VIRIDIS: [Rgb; 11] = [
    Rgb::new(0x44, 0x01, 0x54),
    Rgb::new(0x48, 0x24, 0x75),
    Rgb::new(0x41, 0x44, 0x87),
    Rgb::new(0x35, 0x5f, 0x8d),
    Rgb::new(0x2a, 0x78, 0x8e),
    Rgb::new(0x21, 0x91, 0x8c),
    Rgb::new(0x22, 0xa8, 0x84),
    Rgb::new(0x44, 0xbf, 0x70),
    Rgb::new(0x7a, 0xd1, 0x51),
    Rgb::new(0xbd, 0xdf, 0x26),
    Rgb::new(0xfd, 0xe7, 0x25),
];

const MAGMA: [Rgb; 11] = [
    Rgb::new(0x00, 0x00, 0x04),
    Rgb::new(0x14, 0x0e, 0x36),
    Rgb::new(0x3b, 0x0f, 0x70),
    Rgb::new(0x64, 0x1a, 0x80),
    Rgb::new(0x8c, 0x29, 0x81),
    Rgb::new(0xb7, 0x37, 0x79),
    Rgb::new(0xde, 0x49, 0x68),
    Rgb::new(0xf7, 0x70, 0x5c),
    Rgb::new(0xfe, 0x9f, 0x6d),
    Rgb::new(0xfe, 0xcf, 0x92),
    Rgb::new(0xfc, 0xfd, 0xbf),
];

const INFERNO: [Rgb; 11] = [
    Rgb::new(0x00, 0x00, 0x04),
    Rgb::new(0x16, 0x0b, 0x39),
    Rgb::new(0x42, 0x0a, 0x68),
    Rgb::new(0x6a, 0x17, 0x6e),
    Rgb::new(0x93, 0x26, 0x67),
    Rgb::new(0xbc, 0x37, 0x54),
    Rgb::new(0xdd, 0x51, 0x3a),
    Rgb::new(0xf3, 0x78, 0x19),
    Rgb::new(0xfc, 0xa5, 0x0a),
    Rgb::new(0xf6, 0xd7, 0x46),
    Rgb::new(0xfc, 0xff, 0xa4),
];

const PLASMA: [Rgb; 11] = [
    Rgb::new(0x0d, 0x08, 0x87),
    Rgb::new(0x41, 0x04, 0x9d),
    Rgb::new(0x6a, 0x00, 0xa8),
    Rgb::new(0x8f, 0x0d, 0xa4),
    Rgb::new(0xb1, 0x2a, 0x90),
    Rgb::new(0xcc, 0x47, 0x78),
    Rgb::new(0xe1, 0x64, 0x62),
    Rgb::new(0xf2, 0x84, 0x4b),
    Rgb::new(0xfc, 0xa6, 0x36),
    Rgb::new(0xfc, 0xce, 0x25),
    Rgb::new(0xf0, 0xf9, 0x21),
];

fn ramp(stops: &[Rgb], t: f64) -> Rgb {
    let last = stops.len() - 1;
    let pos = t * last as f64;
    let i = (pos.floor() as usize).min(last - 1);
    stops[i].lerp(&stops[i + 1], pos - i as f64)
}

// ── Polynomial palettes ──────────────────────────────────────────────────────

fn turbo(t: f64) -> Rgb {
    Rgb::from_channels(
        34.61 + t * (1172.33 - t * (10793.56 - t * (33300.12 - t * (38394.49 - t * 14825.05)))),
        23.31 + t * (557.33 + t * (1225.33 - t * (3574.96 - t * (1073.77 + t * 707.56)))),
        27.2 + t * (3211.1 - t * (15327.97 - t * (27814.0 - t * (22569.18 - t * 6838.66)))),
    )
}

fn cividis(t: f64) -> Rgb {
    Rgb::from_channels(
        -4.54 - t * (35.34 - t * (2381.73 - t * (6402.7 - t * (7024.72 - t * 2710.57)))),
        32.49 + t * (170.73 + t * (52.82 - t * (131.46 - t * (176.58 - t * 67.37)))),
        81.24 + t * (442.36 - t * (2482.43 - t * (6167.24 - t * (6614.94 - t * 2475.67)))),
    )
}

// ── Cubehelix ────────────────────────────────────────────────────────────────

/// (hue in degrees, saturation, lightness)
type Cubehelix = (f64, f64, f64);

const WARM_START: Cubehelix = (-100.0, 0.75, 0.35);
const COOL_START: Cubehelix = (260.0, 0.75, 0.35);
const CUBEHELIX_END: Cubehelix = (80.0, 1.50, 0.80);

fn cubehelix_long(start: Cubehelix, end: Cubehelix, t: f64) -> Rgb {
    let h = start.0 + (end.0 - start.0) * t;
    let s = start.1 + (end.1 - start.1) * t;
    let l = start.2 + (end.2 - start.2) * t;
    cubehelix_to_rgb(h, s, l)
}

fn cubehelix_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    const A: f64 = -0.14861;
    const B: f64 = 1.78277;
    const C: f64 = -0.29227;
    const D: f64 = -0.90649;
    const E: f64 = 1.97294;

    let h = (h + 120.0).to_radians();
    let a = s * l * (1.0 - l);
    let (sin_h, cos_h) = h.sin_cos();
    Rgb::from_channels(
        255.0 * (l + a * (A * cos_h + B * sin_h)),
        255.0 * (l + a * (C * cos_h + D * sin_h)),
        255.0 * (l + a * (E * cos_h)),
    )
}
