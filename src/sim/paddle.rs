//! Player paddles
//!
//! Vertical sliders on either side of the arena. The input adapter sets the
//! intent flags; the simulation only moves the paddle and reads its box,
//! side and collision mask.

use serde::{Deserialize, Serialize};

use super::mask::CollisionMask;
use super::rect::Rect;
use crate::consts::{MAX_BOUNCE_ANGLE_DEG, PADDLE_SPEED};

/// Which player / which half of the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// A player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
    pub side: Side,
    pub moving_up: bool,
    pub moving_down: bool,
    /// Pixels per second
    pub speed: f32,
    /// Deflection at the paddle tips (degrees)
    pub max_bounce_angle: f32,
    mask: CollisionMask,
    mask_revision: u32,
}

impl Paddle {
    pub fn new(side: Side, x: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, 0.0, width, height),
            side,
            moving_up: false,
            moving_down: false,
            speed: PADDLE_SPEED,
            max_bounce_angle: MAX_BOUNCE_ANGLE_DEG,
            mask: CollisionMask::capsule(width, height),
            mask_revision: 1,
        }
    }

    pub fn mask(&self) -> &CollisionMask {
        &self.mask
    }

    /// Number of times the mask has been generated
    pub fn mask_revision(&self) -> u32 {
        self.mask_revision
    }

    /// Resize the paddle sprite. The mask is regenerated only on a real change.
    pub fn set_size(&mut self, width: f32, height: f32) {
        if width == self.rect.w && height == self.rect.h {
            return;
        }
        let center = self.rect.center();
        self.rect.w = width;
        self.rect.h = height;
        self.rect.set_center(center);
        self.mask = CollisionMask::capsule(width, height);
        self.mask_revision += 1;
    }

    /// Move by the current intent, clamped to `[top, bottom - height]`
    pub fn advance(&mut self, dt: f32, top: f32, bottom: f32) {
        let mut direction = 0.0;
        if self.moving_up {
            direction -= 1.0;
        }
        if self.moving_down {
            direction += 1.0;
        }

        self.rect.y += direction * self.speed * dt;
        let max_y = (bottom - self.rect.h).max(top);
        self.rect.y = self.rect.y.clamp(top, max_y);
    }
}
