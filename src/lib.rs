//! Hazard Pong - ball and paddle simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball, paddles, hazards, frame tick)
//! - `settings`: Data-driven tuning and level layout
//! - `error`: Configuration loading errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{ArenaSettings, LevelLayout};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Frames per second the frame-counted timers are tuned for
    pub const FRAME_RATE: f32 = 60.0;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / FRAME_RATE;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    /// Scoreboard strip at the top of the window; balls bounce off its lower edge
    pub const HEADER_HEIGHT: f32 = 60.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 16.0;
    pub const BALL_MIN_SPEED: f32 = 300.0;
    pub const BALL_MAX_SPEED: f32 = 500.0;
    /// Release speed for a captured ball whose own max speed is unknown
    pub const DEFAULT_RELEASE_SPEED: f32 = 500.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 15.0;
    pub const PADDLE_HEIGHT: f32 = 90.0;
    pub const PADDLE_SPEED: f32 = 420.0;
    pub const PADDLE_INSET: f32 = 20.0;
    /// Steepest paddle deflection (degrees), reached at the paddle tips
    pub const MAX_BOUNCE_ANGLE_DEG: f32 = 60.0;

    /// Portal re-trigger lockout (~0.25s)
    pub const PORTAL_COOLDOWN_FRAMES: u32 = 15;

    /// Bumper hit response
    pub const BUMPER_SPEED_MULTIPLIER: f32 = 1.5;
    pub const BUMPER_DEFLECT_DEG: f32 = 1.0;
    pub const BUMPER_ANIM_DURATION: f32 = 0.2;
    pub const BUMPER_ANIM_SWELL: f32 = 0.25;

    /// Manhole spout response
    pub const MANHOLE_SPEED_MULTIPLIER: f32 = 1.5;
    pub const MAX_CONCURRENT_SPOUTS: usize = 2;

    /// Power-up spawning
    pub const POWERUP_SIZE: f32 = 24.0;
    pub const POWERUP_MIN_DELAY_FRAMES: u32 = 3 * 60;
    pub const POWERUP_MAX_DELAY_FRAMES: u32 = 15 * 60;
    pub const POWERUP_MAX_BALLS: usize = 10;
    pub const POWERUP_PLACEMENT_ATTEMPTS: u32 = 50;
    pub const POWERUP_OBSTACLE_MARGIN: f32 = 20.0;
    /// Width of the strip in front of each paddle kept clear of power-ups
    pub const PADDLE_ZONE_WIDTH: f32 = 100.0;

    /// Roulette spinner
    pub const ROULETTE_RADIUS: f32 = 40.0;
    pub const ROULETTE_SPIN_RATE: f32 = 1.5 * std::f32::consts::TAU;
    pub const ROULETTE_MAX_HOLD: f32 = 3.0;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-5);
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!(wrap_angle(-1e-9) < TAU);
    }

    #[test]
    fn test_polar_round_trip() {
        let p = polar_to_cartesian(10.0, PI / 3.0);
        let (r, theta) = cartesian_to_polar(p);
        assert!((r - 10.0).abs() < 1e-4);
        assert!((theta - PI / 3.0).abs() < 1e-5);
    }
}
