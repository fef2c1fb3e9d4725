//! Pinball-style bumper
//!
//! A round repulsor. Hits throw the ball along the outward normal, nudged one
//! degree in the direction the ball was already turning so a ball can't get
//! trapped bouncing back and forth between two bumpers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::collision::{circles_overlap, cross, rotate};
use super::velocity::Heading;
use crate::consts::{
    BUMPER_ANIM_DURATION, BUMPER_ANIM_SWELL, BUMPER_DEFLECT_DEG, BUMPER_SPEED_MULTIPLIER,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bumper {
    pub center: Vec2,
    pub base_radius: f32,
    /// Collision and draw radius; swells briefly after a hit
    pub current_radius: f32,
    /// 0..1, renderer flash strength
    pub flash_intensity: f32,
    /// Seconds of hit animation remaining
    pub hit_timer: f32,
}

impl Bumper {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            base_radius: radius,
            current_radius: radius,
            flash_intensity: 0.0,
            hit_timer: 0.0,
        }
    }

    /// Decay the hit animation
    pub fn update(&mut self, dt: f32) {
        self.hit_timer = (self.hit_timer - dt).max(0.0);
        let phase = self.hit_timer / BUMPER_ANIM_DURATION;
        // Ease out: fast shrink at first, settling gently
        let eased = phase * phase;
        self.current_radius = self.base_radius * (1.0 + BUMPER_ANIM_SWELL * eased);
        self.flash_intensity = eased;
    }

    pub fn handle_collision(&mut self, ball: &mut Ball) -> bool {
        let ball_center = ball.center();
        let ball_radius = ball.radius();
        if !circles_overlap(ball_center, ball_radius, self.center, self.current_radius) {
            return false;
        }

        let old_dir = ball.velocity.direction();
        let normal = match (ball_center - self.center).try_normalize() {
            Some(n) => n,
            None => {
                // Dead center: throw it back the way it came
                let fallback = (-old_dir).try_normalize().unwrap_or(Vec2::X);
                log::warn!(
                    "Ball {} centered on bumper at ({}, {}), using fallback normal",
                    ball.id,
                    self.center.x,
                    self.center.y
                );
                fallback
            }
        };

        let turn = if cross(old_dir, normal) < 0.0 { -1.0 } else { 1.0 };
        let heading = rotate(normal, turn * BUMPER_DEFLECT_DEG.to_radians());

        let boosted = ball.velocity.speed * BUMPER_SPEED_MULTIPLIER;
        ball.velocity
            .rederive_from(boosted, Heading::Normal(heading), ball.band);

        let push = self.current_radius + ball_radius + 1.0;
        ball.rect.set_center(self.center + heading * push);

        self.hit_timer = BUMPER_ANIM_DURATION;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BALL_MAX_SPEED, BALL_MIN_SPEED};
    use crate::sim::velocity::{SpeedBand, Velocity};

    fn band() -> SpeedBand {
        SpeedBand::new(BALL_MIN_SPEED, BALL_MAX_SPEED)
    }

    #[test]
    fn test_overlapping_ball_is_repelled() {
        let mut bumper = Bumper::new(Vec2::new(100.0, 100.0), 30.0);
        let mut ball = Ball::new(1, Vec2::new(135.0, 100.0), 20.0, band());
        ball.velocity = Velocity::new(BALL_MIN_SPEED, -1.0, 0.2);

        let radius = bumper.current_radius;
        assert!(bumper.handle_collision(&mut ball));
        assert_eq!(
            ball.velocity.speed,
            (BALL_MIN_SPEED * 1.5).min(BALL_MAX_SPEED)
        );

        let dist = ball.center().distance(bumper.center);
        assert!((dist - (radius + 10.0 + 1.0)).abs() < 1e-3);

        // Heading is the unit normal, off the x axis by one degree
        let heading = Vec2::new(ball.velocity.dx, ball.velocity.dy);
        assert!((heading.length() - 1.0).abs() < 1e-5);
        let angle = heading.y.atan2(heading.x).to_degrees().abs();
        assert!((angle - 1.0).abs() < 1e-3);
        let offset = (ball.center() - bumper.center).normalize();
        assert!((offset - heading).length() < 1e-4);
    }

    #[test]
    fn test_deflection_follows_rotation_sense() {
        // Moving down-left into the right side of the bumper: cross(old, normal) < 0
        let mut bumper = Bumper::new(Vec2::ZERO, 30.0);
        let mut ball = Ball::new(1, Vec2::new(38.0, 0.0), 20.0, band());
        ball.velocity = Velocity::new(400.0, -1.0, 1.0);
        assert!(bumper.handle_collision(&mut ball));
        assert!(ball.velocity.dy < 0.0);

        let mut bumper = Bumper::new(Vec2::ZERO, 30.0);
        let mut ball = Ball::new(1, Vec2::new(38.0, 0.0), 20.0, band());
        ball.velocity = Velocity::new(400.0, -1.0, -1.0);
        assert!(bumper.handle_collision(&mut ball));
        assert!(ball.velocity.dy > 0.0);
    }

    #[test]
    fn test_speed_capped_at_max() {
        let mut bumper = Bumper::new(Vec2::ZERO, 30.0);
        let mut ball = Ball::new(1, Vec2::new(0.0, 35.0), 20.0, band());
        ball.velocity = Velocity::new(450.0, 0.0, -1.0);
        assert!(bumper.handle_collision(&mut ball));
        assert!((ball.velocity.speed - BALL_MAX_SPEED).abs() < 1e-2);
        assert!(ball.velocity.cartesian().length() <= BALL_MAX_SPEED + 1e-2);
    }

    #[test]
    fn test_coincident_centers_use_fallback() {
        let mut bumper = Bumper::new(Vec2::new(50.0, 50.0), 30.0);
        let mut ball = Ball::new(1, Vec2::new(50.0, 50.0), 20.0, band());
        ball.velocity = Velocity::new(400.0, 1.0, 0.0);
        assert!(bumper.handle_collision(&mut ball));
        // Sent back left, out of the bumper
        assert!(ball.velocity.dx < 0.0);
        assert!(ball.center().distance(bumper.center) > 40.0);
    }

    #[test]
    fn test_miss_outside_combined_radius() {
        let mut bumper = Bumper::new(Vec2::ZERO, 30.0);
        let mut ball = Ball::new(1, Vec2::new(41.0, 0.0), 20.0, band());
        assert!(!bumper.handle_collision(&mut ball));
    }

    #[test]
    fn test_hit_animation_decays() {
        let mut bumper = Bumper::new(Vec2::ZERO, 30.0);
        let mut ball = Ball::new(1, Vec2::new(35.0, 0.0), 20.0, band());
        assert!(bumper.handle_collision(&mut ball));

        bumper.update(0.0);
        assert!((bumper.current_radius - 30.0 * (1.0 + BUMPER_ANIM_SWELL)).abs() < 1e-4);
        assert_eq!(bumper.flash_intensity, 1.0);

        bumper.update(0.1);
        assert!(bumper.current_radius > 30.0 && bumper.current_radius < 37.5);

        bumper.update(0.2);
        assert_eq!(bumper.current_radius, 30.0);
        assert_eq!(bumper.flash_intensity, 0.0);
    }
}
