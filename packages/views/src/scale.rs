//! Numeric and color scales.

use serde::{Deserialize, Serialize};

/// A closed numeric interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Domain {
    /// Creates `[min, max]`.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Observed extent of `values`, `None` when empty. A zero-width extent
    /// is widened by 1 on each side.
    #[must_use]
    pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut iter = values.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if (max - min).abs() < f64::EPSILON {
            Some(Self::new(min - 1.0, max + 1.0))
        } else {
            Some(Self::new(min, max))
        }
    }

    /// Position of `value` in the interval as a fraction clamped to `[0, 1]`.
    /// A zero-width interval maps everything to 0.
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        let width = self.max - self.min;
        if width <= 0.0 || !value.is_finite() {
            return 0.0;
        }
        ((value - self.min) / width).clamp(0.0, 1.0)
    }

    /// Linear interpolation inside the interval.
    #[must_use]
    pub fn lerp(&self, t: f64) -> f64 {
        (self.max - self.min).mul_add(t, self.min)
    }
}

/// Area-proportional radius scale: `sqrt` of the value over `[0, max]`,
/// mapped into a pixel range and clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    max: f64,
    range: Domain,
}

impl SqrtScale {
    /// Scale for values in `[0, max]` onto `[min_radius, max_radius]`.
    #[must_use]
    pub const fn new(max: f64, min_radius: f64, max_radius: f64) -> Self {
        Self {
            max,
            range: Domain::new(min_radius, max_radius),
        }
    }

    /// Radius of `value`; `None` and non-positive values get the minimum.
    #[must_use]
    pub fn radius(&self, value: Option<f64>) -> f64 {
        let Some(value) = value.filter(|v| *v > 0.0) else {
            return self.range.min;
        };
        if self.max <= 0.0 {
            return self.range.min;
        }
        let t = (value.sqrt() / self.max.sqrt()).clamp(0.0, 1.0);
        self.range.lerp(t)
    }
}

/// Two-stop sequential color ramp between hex colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRamp {
    low: [u8; 3],
    high: [u8; 3],
}

impl ColorRamp {
    /// Builds a ramp from `#rrggbb` strings. Unparseable colors fall back to
    /// black/white.
    #[must_use]
    pub fn new(low: &str, high: &str) -> Self {
        Self {
            low: parse_hex(low).unwrap_or([255, 255, 255]),
            high: parse_hex(high).unwrap_or([0, 0, 0]),
        }
    }

    /// Color at fraction `t` in `[0, 1]`.
    #[must_use]
    pub fn at(&self, t: f64) -> String {
        let t = t.clamp(0.0, 1.0);
        let channel = |i: usize| {
            let lo = f64::from(self.low[i]);
            let hi = f64::from(self.high[i]);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let value = (hi - lo).mul_add(t, lo).round() as u8;
            value
        };
        format!("#{:02x}{:02x}{:02x}", channel(0), channel(1), channel(2))
    }
}

fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some([byte(0)?, byte(2)?, byte(4)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_extent_is_widened() {
        assert_eq!(Domain::extent([5.0, 5.0]), Some(Domain::new(4.0, 6.0)));
        assert_eq!(Domain::extent([3.0, 1.0, 2.0]), Some(Domain::new(1.0, 3.0)));
        assert_eq!(Domain::extent(std::iter::empty()), None);
    }

    #[test]
    fn zero_width_domain_maps_to_start() {
        let domain = Domain::new(0.0, 0.0);
        assert!(domain.normalize(0.0).abs() < f64::EPSILON);
        assert!(domain.normalize(10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sqrt_radius_is_clamped() {
        let scale = SqrtScale::new(100.0, 3.0, 18.0);
        assert!((scale.radius(Some(100.0)) - 18.0).abs() < 1e-9);
        assert!((scale.radius(Some(400.0)) - 18.0).abs() < 1e-9);
        assert!((scale.radius(Some(25.0)) - 10.5).abs() < 1e-9);
        assert!((scale.radius(None) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn ramp_interpolates_hex() {
        let ramp = ColorRamp::new("#000000", "#ffffff");
        assert_eq!(ramp.at(0.0), "#000000");
        assert_eq!(ramp.at(1.0), "#ffffff");
        assert_eq!(ramp.at(0.5), "#808080");
        assert_eq!(ColorRamp::new("bad", "#0000ff").at(0.0), "#ffffff");
    }
}
