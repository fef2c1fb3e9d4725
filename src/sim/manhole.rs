//! Manhole water-spout hazard
//!
//! A cover in the floor that periodically erupts. Two states:
//!
//! - Dormant: the cover's own timer runs toward a random interval drawn from
//!   `[min_interval, max_interval]`. Eruption also needs fewer than
//!   [`MAX_CONCURRENT_SPOUTS`] other manholes erupting; otherwise it waits.
//! - Spouting: the spout column is live for `spout_duration` seconds, then
//!   the manhole goes dormant and draws a fresh interval.
//!
//! A ball caught in a live spout is kicked vertically out of the column and
//! sped up by [`MANHOLE_SPEED_MULTIPLIER`]. That boost is NOT clamped to the
//! ball's max speed.
//!
//! A ball already moving outward (for instance rising through the upper half
//! of the column) is not a hit: it keeps its velocity and the boost is not
//! applied. Only a ball heading into the column, or moving level with it, is
//! kicked. Without this the unclamped boost would compound on every frame the
//! ball spends inside the column.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::rect::Rect;
use crate::consts::{MANHOLE_SPEED_MULTIPLIER, MAX_CONCURRENT_SPOUTS};

/// Timing parameters for one manhole
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpoutTiming {
    /// Seconds
    pub min_interval: f32,
    /// Seconds
    pub max_interval: f32,
    /// Seconds
    pub spout_duration: f32,
}

impl Default for SpoutTiming {
    fn default() -> Self {
        Self {
            min_interval: 4.0,
            max_interval: 9.0,
            spout_duration: 1.5,
        }
    }
}

impl SpoutTiming {
    fn draw_interval(&self, rng: &mut impl Rng) -> f32 {
        if self.max_interval > self.min_interval {
            rng.random_range(self.min_interval..=self.max_interval)
        } else {
            self.min_interval
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manhole {
    /// The cover, always drawn
    pub rect: Rect,
    /// Water column; only dangerous while spouting
    pub spout_rect: Rect,
    pub is_spouting: bool,
    /// Seconds spent in the current state
    pub elapsed: f32,
    /// Dormant time to wait before the next eruption
    pub next_interval: f32,
    pub timing: SpoutTiming,
}

impl Manhole {
    /// Cover at `rect`, spout column rising `spout_height` above it
    pub fn new(rect: Rect, spout_height: f32, timing: SpoutTiming, rng: &mut impl Rng) -> Self {
        let spout_rect = Rect::new(
            rect.x,
            rect.top() - spout_height,
            rect.w,
            spout_height + rect.h,
        );
        Self {
            rect,
            spout_rect,
            is_spouting: false,
            elapsed: 0.0,
            next_interval: timing.draw_interval(rng),
            timing,
        }
    }

    /// Seconds left in the current spout (0 when dormant)
    pub fn spout_remaining(&self) -> f32 {
        if self.is_spouting {
            (self.timing.spout_duration - self.elapsed).max(0.0)
        } else {
            0.0
        }
    }

    /// Advance timers; `others_spouting` counts the other manholes currently
    /// erupting. Returns true if the state flipped this frame.
    pub fn update(&mut self, dt: f32, others_spouting: usize, rng: &mut impl Rng) -> bool {
        self.elapsed += dt;

        if self.is_spouting {
            if self.elapsed >= self.timing.spout_duration {
                self.is_spouting = false;
                self.elapsed = 0.0;
                self.next_interval = self.timing.draw_interval(rng);
                log::debug!("Manhole spout ended, next in {:.2}s", self.next_interval);
                return true;
            }
        } else if self.elapsed >= self.next_interval && others_spouting < MAX_CONCURRENT_SPOUTS {
            self.is_spouting = true;
            self.elapsed = 0.0;
            log::debug!("Manhole spouting for {:.2}s", self.timing.spout_duration);
            return true;
        }
        false
    }

    /// Kick a ball out of a live spout column
    pub fn handle_collision(&self, ball: &mut Ball) -> bool {
        if !self.is_spouting || !ball.rect.overlaps(&self.spout_rect) {
            return false;
        }

        let outward = if ball.center().y < self.spout_rect.center().y {
            -1.0
        } else {
            1.0
        };
        // Already thrown clear; boosting again every frame would compound
        if ball.velocity.dy * outward > 0.0 {
            return false;
        }

        ball.velocity.dy = outward;
        ball.velocity.speed *= MANHOLE_SPEED_MULTIPLIER;
        true
    }
}
