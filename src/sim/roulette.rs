//! Roulette spinner: capture, spin, release
//!
//! Two states:
//!
//! - Idle: a ball touching the wheel (combined radii) is captured. The
//!   impact angle, measured in the wheel's own rotating frame, picks one of
//!   36 segments; the segment index sets how long the ball is held.
//! - Spinning: the wheel turns at a constant rate, the ball orbits the hub
//!   at half the wheel radius and twice the wheel's angular speed, and the
//!   hold timer runs down. At zero the ball is flung out along the wheel's
//!   current angle at its max speed.
//!
//! A captured ball is owned by the spinner, so it can't be swept by any
//! other collider and can't be held by two spinners.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::collision::circles_overlap;
use super::velocity::Velocity;
use crate::consts::{ROULETTE_MAX_HOLD, ROULETTE_SPIN_RATE};
use crate::{cartesian_to_polar, polar_to_cartesian, wrap_angle};

/// Pocket numbers around an American wheel, 0 and 00 left out
pub const SEGMENTS: [u8; 36] = [
    28, 9, 26, 30, 11, 7, 20, 32, 17, 5, 22, 34, 15, 3, 24, 36, 13, 1, //
    27, 10, 25, 29, 12, 8, 19, 31, 18, 6, 21, 33, 16, 4, 23, 35, 14, 2,
];

/// Hold time for segment `index` on a wheel with `segment_count` segments.
///
/// Linear from 0 (index 0) to `max_hold` (last index). A single-segment
/// wheel holds for half of `max_hold`; an empty one doesn't hold at all.
pub fn hold_duration(index: usize, segment_count: usize, max_hold: f32) -> f32 {
    match segment_count {
        0 => {
            log::warn!("Spinner has no segments, releasing immediately");
            0.0
        }
        1 => max_hold / 2.0,
        n => (index.min(n - 1) as f32 / (n - 1) as f32) * max_hold,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouletteSpinner {
    pub center: Vec2,
    pub radius: f32,
    /// Radians, only ever increases
    pub rotation: f32,
    /// Radians per second while spinning
    pub spin_rate: f32,
    pub max_hold_duration: f32,
    /// Seconds left before release (0 when idle)
    pub hold_timer: f32,
    /// Hold chosen for the current capture
    pub hold_duration: f32,
    /// Segment the current ball landed in
    pub landed_segment: Option<usize>,
    captured: Option<Ball>,
}

impl RouletteSpinner {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius,
            rotation: 0.0,
            spin_rate: ROULETTE_SPIN_RATE,
            max_hold_duration: ROULETTE_MAX_HOLD,
            hold_timer: 0.0,
            hold_duration: 0.0,
            landed_segment: None,
            captured: None,
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.captured.is_some()
    }

    /// The held ball, for drawing
    pub fn captured(&self) -> Option<&Ball> {
        self.captured.as_ref()
    }

    pub fn segment_count(&self) -> usize {
        SEGMENTS.len()
    }

    /// Pocket number printed on segment `index`
    pub fn segment_number(&self, index: usize) -> Option<u8> {
        SEGMENTS.get(index).copied()
    }

    /// Segment under world-space angle `angle`, accounting for wheel rotation
    pub fn segment_at(&self, angle: f32) -> usize {
        let count = self.segment_count();
        if count == 0 {
            return 0;
        }
        let local = wrap_angle(angle - self.rotation);
        let width = std::f32::consts::TAU / count as f32;
        ((local / width) as usize).min(count - 1)
    }

    /// Capture `ball` if it touches an idle wheel.
    ///
    /// On capture the spinner takes ownership; otherwise the ball is handed
    /// back untouched.
    pub fn handle_collision(&mut self, mut ball: Ball) -> Result<(), Ball> {
        if self.is_spinning()
            || !circles_overlap(ball.center(), ball.radius(), self.center, self.radius)
        {
            return Err(ball);
        }

        let (_, impact_angle) = cartesian_to_polar(ball.center() - self.center);
        let segment = self.segment_at(impact_angle);
        self.hold_duration = hold_duration(segment, self.segment_count(), self.max_hold_duration);
        self.hold_timer = self.hold_duration;
        self.landed_segment = Some(segment);

        ball.velocity = Velocity::ZERO;
        ball.rect.set_center(self.center);
        log::debug!(
            "Ball {} captured on segment {} ({:?}), holding {:.2}s",
            ball.id,
            segment,
            self.segment_number(segment),
            self.hold_duration
        );
        self.captured = Some(ball);
        Ok(())
    }

    /// Spin the wheel; returns the ball on the frame it is released
    pub fn update(&mut self, dt: f32) -> Option<Ball> {
        let mut ball = self.captured.take()?;

        self.rotation += self.spin_rate * dt;
        self.hold_timer -= dt;

        if self.hold_timer > 0.0 {
            let orbit = polar_to_cartesian(self.radius / 2.0, 2.0 * self.rotation);
            ball.rect.set_center(self.center + orbit);
            ball.velocity.speed = 0.0;
            self.captured = Some(ball);
            return None;
        }

        self.hold_timer = 0.0;
        let direction = polar_to_cartesian(1.0, self.rotation);
        let speed = ball.release_speed();
        ball.velocity = Velocity::new(speed, direction.x, direction.y);

        let distance = self.radius + ball.radius() + 1.0;
        ball.rect.set_center(self.center + direction * distance);
        log::debug!(
            "Ball {} released at {:.1} rad, speed {}",
            ball.id,
            wrap_angle(self.rotation),
            speed
        );
        Some(ball)
    }

    /// Drop any held ball without releasing it (round reset)
    pub fn clear(&mut self) -> Option<Ball> {
        self.hold_timer = 0.0;
        self.landed_segment = None;
        self.captured.take()
    }
}
