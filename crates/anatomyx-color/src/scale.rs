//! Value normalisation onto [0, 1].
//! Linear and logarithmic min-max scaling with saturation at both ends.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Substitute lower bound for a logarithmic domain whose minimum is <= 0.
pub const LOG_FLOOR: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Scale {
    #[default]
    Linear,
    Log,
}

/// Closed value range `[min, max]`; `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Domain {
    min: f64,
    max: f64,
}

impl Domain {
    /// Reversed bounds are swapped.
    pub fn new(a: f64, b: f64) -> Self {
        if b < a {
            Self { min: b, max: a }
        } else {
            Self { min: a, max: b }
        }
    }

    /// Smallest and largest finite values of an iterator, if any.
    pub fn spanning<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .map(|(lo, hi)| Self { min: lo, max: hi })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl Scale {
    pub fn name(&self) -> &'static str {
        match self {
            Scale::Linear => "linear",
            Scale::Log => "log",
        }
    }

    /// Accepts `linear`, `log`, `logarithmic`; anything else → linear.
    pub fn from_name(name: &str) -> Scale {
        match name.trim().to_ascii_lowercase().as_str() {
            "linear" => Scale::Linear,
            "log" | "logarithmic" => Scale::Log,
            other => {
                debug!("Unknown scale '{}', falling back to linear", other);
                Scale::Linear
            }
        }
    }

    /// Position of `value` within `domain`, clamped to [0, 1].
    /// Total: degenerate domains and non-positive log inputs yield 0.
    pub fn normalize(&self, value: f64, domain: &Domain) -> f64 {
        match self {
            Scale::Linear => minmax_normalise(value, domain.min, domain.max),
            Scale::Log => log_normalise(value, domain.min, domain.max),
        }
    }
}

/// Min-max normalisation within [min_val, max_val]; degenerate range → 0.
pub fn minmax_normalise(value: f64, min_val: f64, max_val: f64) -> f64 {
    let span = max_val - min_val;
    if !(span > 0.0) || !span.is_finite() || value.is_nan() {
        return 0.0;
    }
    ((value - min_val) / span).clamp(0.0, 1.0)
}

/// Log-space min-max normalisation. A non-positive minimum is replaced by
/// [`LOG_FLOOR`]; a non-positive value maps to 0.
pub fn log_normalise(value: f64, min_val: f64, max_val: f64) -> f64 {
    if !(value > 0.0) {
        return 0.0;
    }
    let effective_min = if min_val > 0.0 { min_val } else { LOG_FLOOR };
    let log_min = effective_min.ln();
    let span = max_val.ln() - log_min;
    if !(span > 0.0) || !span.is_finite() {
        return 0.0;
    }
    ((value.ln() - log_min) / span).clamp(0.0, 1.0)
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scale {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Scale::from_name(s))
    }
}

impl From<String> for Scale {
    fn from(name: String) -> Self {
        Scale::from_name(&name)
    }
}

impl From<Scale> for String {
    fn from(scale: Scale) -> Self {
        scale.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_basic() {
        let d = Domain::new(0.0, 10.0);
        assert!((Scale::Linear.normalize(2.5, &d) - 0.25).abs() < 1e-12);
        assert_eq!(Scale::Linear.normalize(0.0, &d), 0.0);
        assert_eq!(Scale::Linear.normalize(10.0, &d), 1.0);
    }

    #[test]
    fn test_linear_saturates_outside_domain() {
        let d = Domain::new(1.0, 2.0);
        assert_eq!(Scale::Linear.normalize(-50.0, &d), 0.0);
        assert_eq!(Scale::Linear.normalize(50.0, &d), 1.0);
        assert_eq!(Scale::Linear.normalize(f64::INFINITY, &d), 1.0);
    }

    #[test]
    fn test_degenerate_domain_is_zero() {
        let d = Domain::new(3.0, 3.0);
        assert!(d.is_degenerate());
        assert_eq!(Scale::Linear.normalize(3.0, &d), 0.0);
        assert_eq!(Scale::Linear.normalize(100.0, &d), 0.0);
        assert_eq!(Scale::Log.normalize(3.0, &d), 0.0);
    }

    #[test]
    fn test_linear_is_monotonic_and_deterministic() {
        let d = Domain::new(0.2, 0.9);
        let mut previous = 0.0;
        for step in 0..=100 {
            let v = step as f64 / 100.0;
            let t = Scale::Linear.normalize(v, &d);
            assert_eq!(t, Scale::Linear.normalize(v, &d));
            assert!(t >= previous);
            previous = t;
        }
    }

    #[test]
    fn test_log_uses_floor_for_non_positive_min() {
        let d = Domain::new(0.0, 10.0);
        let expected = (1.0f64.ln() - LOG_FLOOR.ln()) / (10.0f64.ln() - LOG_FLOOR.ln());
        assert!((Scale::Log.normalize(1.0, &d) - expected).abs() < 1e-12);

        let negative = Domain::new(-5.0, 10.0);
        assert_eq!(Scale::Log.normalize(1.0, &negative), Scale::Log.normalize(1.0, &d));
    }

    #[test]
    fn test_log_non_positive_value_is_zero() {
        let d = Domain::new(1.0, 100.0);
        assert_eq!(Scale::Log.normalize(0.0, &d), 0.0);
        assert_eq!(Scale::Log.normalize(-1.0, &d), 0.0);
        assert!((Scale::Log.normalize(10.0, &d) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_log_domain_below_floor_is_zero() {
        let d = Domain::new(0.0, 0.0);
        assert_eq!(Scale::Log.normalize(5.0, &d), 0.0);
    }

    #[test]
    fn test_domain_new_orders_bounds() {
        let d = Domain::new(5.0, 1.0);
        assert_eq!((d.min(), d.max()), (1.0, 5.0));
    }

    #[test]
    fn test_domain_spanning() {
        let d = Domain::spanning([0.4, 0.1, f64::NAN, 0.9]).unwrap();
        assert_eq!((d.min(), d.max()), (0.1, 0.9));
        assert!(Domain::spanning(Vec::<f64>::new()).is_none());
    }

    #[test]
    fn test_scale_names() {
        assert_eq!(Scale::from_name("log"), Scale::Log);
        assert_eq!(Scale::from_name("Logarithmic"), Scale::Log);
        assert_eq!(Scale::from_name("sqrt"), Scale::Linear);
        assert_eq!(Scale::Log.to_string(), "log");
    }
}
