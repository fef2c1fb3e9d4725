//! Ball velocity model
//!
//! A ball moves with `speed * (dx, dy)`. The heading `(dx, dy)` is NOT a unit
//! vector: paddle bounces store a slope (`dx = ±1`, `dy = tan(angle)`) while
//! bumpers store a true unit normal. Two families of response exist:
//!
//! - axis reversal: flip the sign of one component, speed untouched
//! - re-derivation: write a fresh heading, then reclamp `speed` so the true
//!   cartesian magnitude stays inside `[min_speed, max_speed]`
//!
//! The heading is never normalized away; a shallow paddle graze keeps its
//! slope and its speed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BALL_MAX_SPEED, BALL_MIN_SPEED};

/// Allowed band for the ball's cartesian speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedBand {
    pub min: f32,
    pub max: f32,
}

impl Default for SpeedBand {
    fn default() -> Self {
        Self {
            min: BALL_MIN_SPEED,
            max: BALL_MAX_SPEED,
        }
    }
}

impl SpeedBand {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// True when `0 < min <= max` and both are finite
    pub fn is_usable(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max
    }

    /// This band, or the default bounds substituted for whichever end is
    /// unusable (non-finite, non-positive min, or max below min)
    pub fn sanitized(&self) -> SpeedBand {
        if self.is_usable() {
            return *self;
        }
        let min = if self.min.is_finite() && self.min > 0.0 {
            self.min
        } else {
            BALL_MIN_SPEED
        };
        let max = if self.max.is_finite() && self.max >= min {
            self.max
        } else {
            BALL_MAX_SPEED.max(min)
        };
        log::warn!(
            "Unusable speed band [{}, {}], using [{}, {}]",
            self.min,
            self.max,
            min,
            max
        );
        SpeedBand { min, max }
    }
}

/// A freshly derived heading, tagged by the collider that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Heading {
    /// Sign/slope pair: paddle deflection (`dx = ±1`, `dy = tan(angle)`)
    /// or a wall bounce (`dy = ±1`, `dx` kept)
    Slope { dx: f32, dy: f32 },
    /// Unit outward normal (bumper)
    Normal(Vec2),
}

impl Heading {
    fn components(self) -> (f32, f32) {
        match self {
            Heading::Slope { dx, dy } => (dx, dy),
            Heading::Normal(n) => (n.x, n.y),
        }
    }
}

/// Scalar speed + direction descriptor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub speed: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Velocity {
    pub const ZERO: Velocity = Velocity {
        speed: 0.0,
        dx: 0.0,
        dy: 0.0,
    };

    pub fn new(speed: f32, dx: f32, dy: f32) -> Self {
        Self { speed, dx, dy }
    }

    /// Cartesian velocity in pixels per second
    #[inline]
    pub fn cartesian(&self) -> Vec2 {
        Vec2::new(self.speed * self.dx, self.speed * self.dy)
    }

    /// Length of the heading descriptor
    #[inline]
    pub fn heading_norm(&self) -> f32 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }

    /// Direction of travel as a unit vector (zero when stationary)
    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.dx, self.dy).normalize_or_zero()
    }

    pub fn reverse_x(&mut self) {
        self.dx = -self.dx;
    }

    pub fn reverse_y(&mut self) {
        self.dy = -self.dy;
    }

    /// Replace the heading and reclamp speed against `band`.
    ///
    /// `speed` is clamped to `[band.min / norm, band.max / norm]`, which keeps
    /// `|speed * (dx, dy)|` inside the band whatever the heading's length.
    pub fn rederive(&mut self, heading: Heading, band: SpeedBand) {
        self.rederive_from(self.speed, heading, band);
    }

    /// As [`Velocity::rederive`], starting from `speed` instead of the current one
    pub fn rederive_from(&mut self, speed: f32, heading: Heading, band: SpeedBand) {
        let band = band.sanitized();
        let (dx, dy) = heading.components();
        self.dx = dx;
        self.dy = dy;
        let norm = self.heading_norm();
        let (lo, hi) = if norm > f32::EPSILON {
            (band.min / norm, band.max / norm)
        } else {
            (band.min, band.max)
        };
        // NaN speed falls to the floor of the band
        self.speed = speed.max(lo).min(hi);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slope_reclamp_keeps_shallow_heading() {
        let band = SpeedBand::new(300.0, 500.0);
        let mut v = Velocity::new(300.0, -1.0, 0.0);
        v.rederive(Heading::Slope { dx: 1.0, dy: 0.1 }, band);
        assert_eq!(v.dx, 1.0);
        assert_eq!(v.dy, 0.1);
        let mag = v.cartesian().length();
        assert!((mag - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_steep_slope_caps_at_max() {
        let band = SpeedBand::new(300.0, 500.0);
        let mut v = Velocity::new(500.0, 1.0, 0.0);
        v.rederive(Heading::Slope { dx: -1.0, dy: 3.0_f32.sqrt() }, band);
        // norm = 2, so stored speed halves but magnitude stays at max
        assert!((v.speed - 250.0).abs() < 1e-3);
        assert!((v.cartesian().length() - 500.0).abs() < 1e-2);
    }

    #[test]
    fn test_axis_reversal_is_elastic() {
        let mut v = Velocity::new(400.0, 1.0, 0.4);
        let before = v.cartesian();
        v.reverse_x();
        let after = v.cartesian();
        assert_eq!(after.x, -before.x);
        assert_eq!(after.y, before.y);
        assert_eq!(v.speed, 400.0);
    }

    #[test]
    fn test_zero_heading_falls_back_to_band() {
        let mut v = Velocity::new(1000.0, 1.0, 0.0);
        v.rederive(Heading::Normal(Vec2::ZERO), SpeedBand::new(300.0, 500.0));
        assert_eq!(v.speed, 500.0);
    }

    #[test]
    fn test_unusable_band_falls_back_to_defaults() {
        let band = SpeedBand::new(300.0, f32::NAN).sanitized();
        assert_eq!(band, SpeedBand::new(300.0, BALL_MAX_SPEED));

        let inverted = SpeedBand::new(600.0, 500.0).sanitized();
        assert_eq!(inverted, SpeedBand::new(600.0, 600.0));

        let mut v = Velocity::new(900.0, 1.0, 0.0);
        v.rederive(Heading::Slope { dx: -1.0, dy: 0.0 }, SpeedBand::new(f32::NAN, -1.0));
        assert_eq!(v.speed, BALL_MAX_SPEED);
    }

    #[test]
    fn test_nan_speed_lands_on_band_floor() {
        let mut v = Velocity::new(f32::NAN, 1.0, 0.0);
        v.rederive(Heading::Slope { dx: 1.0, dy: 0.0 }, SpeedBand::new(300.0, 500.0));
        assert_eq!(v.speed, 300.0);
    }

    proptest! {
        #[test]
        fn prop_rederived_magnitude_in_band(
            speed in 0.0f32..2000.0,
            dy in -4.0f32..4.0,
            left in any::<bool>(),
        ) {
            let band = SpeedBand::new(300.0, 500.0);
            let mut v = Velocity::new(speed, 1.0, 0.0);
            let dx = if left { 1.0 } else { -1.0 };
            v.rederive(Heading::Slope { dx, dy }, band);
            let mag = v.cartesian().length();
            prop_assert!(mag >= 300.0 - 0.05 && mag <= 500.0 + 0.05);
        }
    }
}
