//! The ball entity
//!
//! The only moving body in the arena. Position and size live in a `Rect`;
//! motion lives in a [`Velocity`] whose heading is deliberately not unit
//! length (see `velocity.rs`).

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::mask::CollisionMask;
use super::obstacle::GoalEvent;
use super::paddle::{Paddle, Side};
use super::rect::Rect;
use super::state::Arena;
use super::velocity::{Heading, SpeedBand, Velocity};
use crate::consts::DEFAULT_RELEASE_SPEED;

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Assigned by the arena on adoption; 0 until then
    pub id: u32,
    pub rect: Rect,
    pub velocity: Velocity,
    pub band: SpeedBand,
    mask: CollisionMask,
}

impl Ball {
    pub fn new(id: u32, center: Vec2, size: f32, band: SpeedBand) -> Self {
        Self {
            id,
            rect: Rect::from_center(center, size, size),
            velocity: Velocity::new(band.min, 1.0, 0.0),
            band,
            mask: CollisionMask::ellipse(size, size),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.rect.w / 2.0
    }

    pub fn size(&self) -> f32 {
        self.rect.w
    }

    pub fn mask(&self) -> &CollisionMask {
        &self.mask
    }

    /// Speed used when a spinner throws this ball back out
    pub fn release_speed(&self) -> f32 {
        if self.band.max.is_finite() && self.band.max > 0.0 {
            self.band.max
        } else {
            log::warn!(
                "Ball {} has no usable max speed ({}), releasing at {}",
                self.id,
                self.band.max,
                DEFAULT_RELEASE_SPEED
            );
            DEFAULT_RELEASE_SPEED
        }
    }

    /// Integrate position by the cartesian velocity
    pub fn advance(&mut self, dt: f32) {
        let v = self.velocity.cartesian();
        self.rect.x += v.x * dt;
        self.rect.y += v.y * dt;
    }

    /// Re-center for a new serve: random vertical heading, minimum speed.
    ///
    /// The horizontal sign is kept so play continues toward the same side.
    pub fn reset_position(&mut self, arena: &Arena, rng: &mut impl Rng) {
        self.rect.set_center(arena.play_center());

        let dx = if self.velocity.dx < 0.0 { -1.0 } else { 1.0 };
        let slope = rng.random_range(0.25f32..=0.75);
        let dy = if rng.random_bool(0.5) { slope } else { -slope };

        self.velocity = Velocity::new(self.band.sanitized().min, dx, dy);
    }

    /// Bounce off the top (scoreboard edge) and bottom of the play area.
    ///
    /// Always active, whatever the side-wall configuration.
    pub fn handle_wall_collision(&mut self, top: f32, bottom: f32) -> bool {
        let dx = self.velocity.dx;

        if self.rect.top() <= top {
            self.rect.set_top(top);
            self.velocity
                .rederive(Heading::Slope { dx, dy: 1.0 }, self.band);
            true
        } else if self.rect.bottom() >= bottom {
            self.rect.set_bottom(bottom);
            self.velocity
                .rederive(Heading::Slope { dx, dy: -1.0 }, self.band);
            true
        } else {
            false
        }
    }

    /// Bounce off the left/right edges (arenas with `bounce_side_walls`)
    pub fn handle_side_wall_collision(&mut self, width: f32) -> bool {
        if self.rect.left() <= 0.0 && self.velocity.dx < 0.0 {
            self.rect.set_left(0.0);
            self.velocity.reverse_x();
            true
        } else if self.rect.right() >= width && self.velocity.dx > 0.0 {
            self.rect.set_right(width);
            self.velocity.reverse_x();
            true
        } else {
            false
        }
    }

    /// Deflect off a paddle.
    ///
    /// Box overlap first, then a pixel test of the ball's disc against the
    /// paddle's sprite mask. The outgoing angle grows linearly with the
    /// distance of the impact from the paddle's middle.
    pub fn handle_paddle_collision(&mut self, paddle: &Paddle) -> bool {
        if !self.rect.overlaps(&paddle.rect) {
            return false;
        }

        let offset_x = (paddle.rect.x - self.rect.x).round() as i32;
        let offset_y = (paddle.rect.y - self.rect.y).round() as i32;
        if !self.mask.overlaps(paddle.mask(), offset_x, offset_y) {
            return false;
        }

        let half = paddle.rect.h / 2.0;
        let relative = if half > 0.0 {
            ((self.center().y - paddle.rect.center().y) / half).clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let angle = relative * paddle.max_bounce_angle.to_radians();

        let dx = match paddle.side {
            Side::Left => {
                self.rect.set_left(paddle.rect.right());
                1.0
            }
            Side::Right => {
                self.rect.set_right(paddle.rect.left());
                -1.0
            }
        };
        self.velocity
            .rederive(Heading::Slope { dx, dy: angle.tan() }, self.band);
        true
    }

    /// Edge scoring for a ball that left the arena without entering a goal.
    ///
    /// Leaving past the left edge scores for the right player and vice versa.
    pub fn handle_scoring(&self, width: f32) -> Option<GoalEvent> {
        if self.rect.right() < 0.0 {
            Some(GoalEvent::Scored(Side::Right))
        } else if self.rect.left() > width {
            Some(GoalEvent::Scored(Side::Left))
        } else {
            None
        }
    }

    /// Copy of this ball (same size and exact velocity) centered at `center`
    pub fn duplicate_at(&self, center: Vec2) -> Ball {
        let mut clone = self.clone();
        clone.id = 0;
        clone.rect.set_center(center);
        clone
    }
}
