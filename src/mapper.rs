//! Maps a signed reading onto a bar position and a gradient colour.
//!
//! Negative readings use the lower bound of the range and the negative
//! gradient, everything else (zero included) uses the upper bound and the
//! positive gradient. The magnitude is normalised against the selected bound
//! and capped at 1, so readings outside the range saturate instead of
//! overflowing the bar.

use log::debug;
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "[u8; 3]")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Rgb(c[0], c[1], c[2])
    }
}

impl Rgb {
    fn channels(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "[Rgb; 2]")]
pub struct ColorGradient {
    pub start: Rgb,
    pub end: Rgb,
}

impl From<[Rgb; 2]> for ColorGradient {
    fn from(c: [Rgb; 2]) -> Self {
        ColorGradient { start: c[0], end: c[1] }
    }
}

impl ColorGradient {
    pub const LIME_TO_GREEN: Self = Self::new(Rgb(212, 226, 132), Rgb(0, 173, 14));
    pub const YELLOW_TO_RED: Self = Self::new(Rgb(255, 238, 82), Rgb(173, 0, 14));
    pub const BLUE_TO_RED: Self = Self::new(Rgb(38, 0, 255), Rgb(255, 0, 0));
    pub const BLUE_TO_PURPLE: Self = Self::new(Rgb(38, 0, 255), Rgb(174, 0, 255));

    pub const fn new(start: Rgb, end: Rgb) -> Self {
        Self { start, end }
    }

    /// Linear interpolation per channel, each channel rounded on its own.
    pub fn at(&self, factor: f64) -> Rgb {
        let start = self.start.channels();
        let end = self.end.channels();
        let mut out = [0u8; 3];
        for c in 0..3 {
            let delta = (f64::from(end[c]) - f64::from(start[c])) * factor;
            let value = f64::from(start[c]) + round_half_up(delta);
            out[c] = value.clamp(0.0, 255.0) as u8;
        }
        Rgb(out[0], out[1], out[2])
    }
}

// Ties go toward +inf, so -16.5 becomes -16 rather than -17.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Validated `(min, max)` envelope of a metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    min: f64,
    max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        Self::named("value", min, max)
    }

    pub fn named(name: &str, min: f64, max: f64) -> Result<Self, ConfigError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::non_finite(name, min, max));
        }
        if min == max {
            return Err(ConfigError::degenerate(name, min, max));
        }
        Ok(Self { min, max })
    }

    /// A range whose bar is split around zero.
    pub fn two_sided(name: &str, min: f64, max: f64) -> Result<Self, ConfigError> {
        let range = Self::named(name, min, max)?;
        if min > 0.0 || max < 0.0 {
            return Err(ConfigError::excludes_zero(name, min, max));
        }
        Ok(range)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Share of the bar, in percent, given to the positive side.
    pub fn anchor_percent(&self) -> f64 {
        (1.0 - (self.min / (self.min - self.max)).abs()) * 100.0
    }

    pub fn contains(&self, reading: f64) -> bool {
        reading >= self.min && reading <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarMode {
    /// Negative and positive halves share one bar, meeting at the anchor.
    TwoSided,
    /// The fill starts at the left edge.
    OneSided,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingResult {
    pub negative: bool,
    pub factor: f64,
    pub anchor_percent: f64,
    pub rgb: Rgb,
    pub out_of_range: bool,
}

impl MappingResult {
    pub fn fill_percent(&self, mode: BarMode) -> f64 {
        match mode {
            BarMode::OneSided => self.factor * 100.0,
            BarMode::TwoSided if self.negative => self.factor * (100.0 - self.anchor_percent),
            BarMode::TwoSided => self.factor * self.anchor_percent,
        }
    }
}

pub fn map(
    reading: f64,
    range: &Range,
    gradient_pos: &ColorGradient,
    gradient_neg: &ColorGradient,
) -> MappingResult {
    let negative = reading < 0.0;
    let (bound, gradient) = if negative {
        (range.min, gradient_neg)
    } else {
        (range.max, gradient_pos)
    };

    let factor = if bound == 0.0 {
        if reading == 0.0 { 0.0 } else { 1.0 }
    } else {
        (reading / bound).abs().min(1.0)
    };

    let result = MappingResult {
        negative,
        factor,
        anchor_percent: range.anchor_percent(),
        rgb: gradient.at(factor),
        out_of_range: !range.contains(reading),
    };
    debug!(
        "reading {reading} - anchor: {:.2} - factor: {:.3} - out of range: {}",
        result.anchor_percent, result.factor, result.out_of_range
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn power() -> Range {
        Range::two_sided("power", -2500.0, 2200.0).unwrap()
    }

    fn map_power(reading: f64) -> MappingResult {
        map(
            reading,
            &power(),
            &ColorGradient::LIME_TO_GREEN,
            &ColorGradient::YELLOW_TO_RED,
        )
    }

    #[test]
    fn test_branch_follows_sign() {
        let pos = map_power(1100.0);
        assert!(!pos.negative);
        assert!((pos.factor - 0.5).abs() < 1e-9, "positive bound is max");

        let neg = map_power(-1250.0);
        assert!(neg.negative);
        assert!((neg.factor - 0.5).abs() < 1e-9, "negative bound is min");
    }

    #[test]
    fn test_zero_takes_positive_branch() {
        let r = map_power(0.0);
        assert!(!r.negative);
        assert_eq!(r.factor, 0.0);
        assert_eq!(r.rgb, ColorGradient::LIME_TO_GREEN.start);
    }

    #[test]
    fn test_factor_saturates() {
        assert_eq!(map_power(5000.0).factor, 1.0);
        assert_eq!(map_power(-99999.0).factor, 1.0);
    }

    #[test]
    fn test_gradient_exact_at_boundaries() {
        let g = ColorGradient::YELLOW_TO_RED;
        assert_eq!(g.at(0.0), g.start);
        assert_eq!(g.at(1.0), g.end);
    }

    #[test]
    fn test_round_half_toward_positive_infinity() {
        assert_eq!(round_half_up(-16.5), -16.0);
        assert_eq!(round_half_up(16.5), 17.0);
        assert_eq!(round_half_up(-47.6), -48.0);
    }

    #[test]
    fn test_anchor_depends_on_range_only() {
        let expected = (1.0 - 2500.0 / 4700.0) * 100.0;
        assert!((map_power(-2000.0).anchor_percent - expected).abs() < 1e-9);
        assert!((map_power(1500.0).anchor_percent - expected).abs() < 1e-9);
        assert!((expected - 46.8).abs() < 0.1);
    }

    #[test]
    fn test_out_of_range_is_inclusive() {
        assert!(map_power(2300.0).out_of_range);
        assert!(!map_power(2200.0).out_of_range);
        assert!(!map_power(-2500.0).out_of_range);
        assert!(map_power(-2500.5).out_of_range);
    }

    #[test]
    fn test_zero_bound_saturates_instead_of_nan() {
        let temp = Range::new(0.0, 60.0).unwrap();
        let r = map(
            -5.0,
            &temp,
            &ColorGradient::BLUE_TO_RED,
            &ColorGradient::BLUE_TO_PURPLE,
        );
        assert_eq!(r.factor, 1.0);
        assert_eq!(r.rgb, ColorGradient::BLUE_TO_PURPLE.end);
        assert!(r.out_of_range);
    }

    #[test]
    fn test_degenerate_range_rejected() {
        assert!(matches!(
            Range::new(10.0, 10.0),
            Err(ConfigError::DegenerateRange { .. })
        ));
        assert!(matches!(
            Range::new(f64::NAN, 10.0),
            Err(ConfigError::NonFiniteRange { .. })
        ));
        assert!(matches!(
            Range::two_sided("power", 100.0, 2200.0),
            Err(ConfigError::PowerRangeExcludesZero { .. })
        ));
    }

    #[test]
    fn test_fill_percent_modes() {
        let r = map_power(2200.0);
        assert!((r.fill_percent(BarMode::TwoSided) - r.anchor_percent).abs() < 1e-9);
        assert_eq!(r.fill_percent(BarMode::OneSided), 100.0);

        let r = map_power(-2500.0);
        assert!((r.fill_percent(BarMode::TwoSided) - (100.0 - r.anchor_percent)).abs() < 1e-9);
    }
}
