//! Arena tuning and level layout
//!
//! Both come from the level layer as JSON. Missing fields fall back to the
//! defaults in [`crate::consts`].

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::collision::circles_overlap;
use crate::sim::manhole::SpoutTiming;
use crate::sim::paddle::Side;
use crate::sim::rect::Rect;
use crate::sim::velocity::SpeedBand;

/// Tunables for one arena session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    // === Arena ===
    pub width: f32,
    pub height: f32,
    /// Scoreboard strip; the ball's ceiling
    pub header_height: f32,
    /// Bounce off the left/right edges instead of scoring there
    pub bounce_side_walls: bool,

    // === Ball ===
    pub ball_size: f32,
    pub min_speed: f32,
    pub max_speed: f32,

    // === Paddles ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    /// Gap between the arena edge and each paddle
    pub paddle_inset: f32,
    /// Degrees
    pub max_bounce_angle: f32,

    // === Hazards ===
    pub power_up_size: f32,
    pub spinner_spin_rate: f32,
    pub spinner_max_hold: f32,

    /// RNG seed for serves, spout intervals and power-up placement
    pub seed: u64,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            header_height: HEADER_HEIGHT,
            bounce_side_walls: false,

            ball_size: BALL_SIZE,
            min_speed: BALL_MIN_SPEED,
            max_speed: BALL_MAX_SPEED,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            paddle_inset: PADDLE_INSET,
            max_bounce_angle: MAX_BOUNCE_ANGLE_DEG,

            power_up_size: POWERUP_SIZE,
            spinner_spin_rate: ROULETTE_SPIN_RATE,
            spinner_max_hold: ROULETTE_MAX_HOLD,

            seed: 0x5EED,
        }
    }
}

impl ArenaSettings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and validate a settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Where every ball is served from
    pub fn serve_point(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, (self.header_height + self.height) / 2.0)
    }

    pub fn speed_band(&self) -> SpeedBand {
        SpeedBand::new(self.min_speed, self.max_speed)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::invalid("width/height", "arena must have positive size"));
        }
        if !(self.header_height >= 0.0 && self.header_height < self.height) {
            return Err(ConfigError::invalid(
                "header_height",
                format!("{} must lie in [0, {})", self.header_height, self.height),
            ));
        }
        if !(self.min_speed > 0.0) {
            return Err(ConfigError::invalid("min_speed", "must be positive"));
        }
        if self.min_speed > self.max_speed {
            return Err(ConfigError::invalid(
                "max_speed",
                format!("{} is below min_speed {}", self.max_speed, self.min_speed),
            ));
        }
        if !(self.ball_size > 0.0 && self.paddle_width > 0.0 && self.paddle_height > 0.0) {
            return Err(ConfigError::invalid("ball_size/paddle size", "must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSpec {
    pub rect: Rect,
    /// Player defending this goal
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManholeSpec {
    /// Cover box
    pub rect: Rect,
    pub spout_height: f32,
    #[serde(default)]
    pub timing: SpoutTiming,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleSpec {
    pub center: Vec2,
    pub radius: f32,
}

/// Initial placement of every collider in a level
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelLayout {
    pub obstacles: Vec<Rect>,
    pub goals: Vec<GoalSpec>,
    pub portal_pairs: Vec<[Rect; 2]>,
    pub manholes: Vec<ManholeSpec>,
    pub bumpers: Vec<CircleSpec>,
    /// Center of the duplicating power-up, if the level has one
    pub power_up: Option<Vec2>,
    pub spinners: Vec<CircleSpec>,
}

impl LevelLayout {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let layout: Self = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Read and validate a layout file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// [`LevelLayout::validate`] plus checks that need the arena tuning:
    /// a freshly served ball must not start inside any collider.
    pub fn validate_for(&self, settings: &ArenaSettings) -> Result<(), ConfigError> {
        self.validate()?;

        let center = settings.serve_point();
        let ball = Rect::from_center(center, settings.ball_size, settings.ball_size);
        let radius = settings.ball_size / 2.0;

        let boxed = self
            .obstacles
            .iter()
            .map(|r| ("obstacles", *r))
            .chain(self.goals.iter().map(|g| ("goals", g.rect)))
            .chain(self.portal_pairs.iter().flatten().map(|r| ("portal_pairs", *r)))
            .chain(
                self.power_up
                    .map(|c| ("power_up", Rect::from_center(c, settings.power_up_size, settings.power_up_size))),
            );
        for (field, rect) in boxed {
            if ball.overlaps(&rect) {
                return Err(ConfigError::invalid(field, "overlaps the serve point"));
            }
        }

        let circles = self
            .bumpers
            .iter()
            .map(|c| ("bumpers", c))
            .chain(self.spinners.iter().map(|c| ("spinners", c)));
        for (field, circle) in circles {
            if circles_overlap(center, radius, circle.center, circle.radius) {
                return Err(ConfigError::invalid(field, "overlaps the serve point"));
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for manhole in &self.manholes {
            let t = &manhole.timing;
            if t.min_interval < 0.0 || t.min_interval > t.max_interval {
                return Err(ConfigError::invalid(
                    "manholes.timing",
                    format!("interval [{}, {}] is empty", t.min_interval, t.max_interval),
                ));
            }
            if t.spout_duration <= 0.0 {
                return Err(ConfigError::invalid("manholes.timing.spout_duration", "must be positive"));
            }
        }
        if self.bumpers.iter().chain(&self.spinners).any(|c| c.radius <= 0.0) {
            return Err(ConfigError::invalid("radius", "bumpers and spinners need a positive radius"));
        }
        for [a, b] in &self.portal_pairs {
            if a == b {
                return Err(ConfigError::invalid("portal_pairs", "a portal can't pair with itself"));
            }
        }
        Ok(())
    }

    /// Built-in level exercising every hazard
    pub fn demo(settings: &ArenaSettings) -> Self {
        let w = settings.width;
        let h = settings.height;
        let top = settings.header_height;
        let mid_y = (top + h) / 2.0;

        Self {
            obstacles: vec![
                Rect::new(w * 0.5 - 10.0, top + 20.0, 20.0, 60.0),
                Rect::new(w * 0.5 - 10.0, h - 80.0, 20.0, 60.0),
            ],
            goals: vec![
                GoalSpec {
                    rect: Rect::new(0.0, mid_y - 80.0, 12.0, 160.0),
                    side: Side::Left,
                },
                GoalSpec {
                    rect: Rect::new(w - 12.0, mid_y - 80.0, 12.0, 160.0),
                    side: Side::Right,
                },
            ],
            portal_pairs: vec![[
                Rect::new(w * 0.3, top + 30.0, 16.0, 70.0),
                Rect::new(w * 0.7 - 16.0, h - 100.0, 16.0, 70.0),
            ]],
            manholes: vec![
                ManholeSpec {
                    rect: Rect::new(w * 0.38, h - 16.0, 40.0, 16.0),
                    spout_height: 140.0,
                    timing: SpoutTiming::default(),
                },
                ManholeSpec {
                    rect: Rect::new(w * 0.58, h - 16.0, 40.0, 16.0),
                    spout_height: 140.0,
                    timing: SpoutTiming::default(),
                },
                ManholeSpec {
                    rect: Rect::new(w * 0.48, h - 16.0, 40.0, 16.0),
                    spout_height: 140.0,
                    timing: SpoutTiming::default(),
                },
            ],
            bumpers: vec![CircleSpec {
                center: Vec2::new(w * 0.35, mid_y + 90.0),
                radius: 26.0,
            }],
            power_up: Some(Vec2::new(w * 0.62, top + 90.0)),
            spinners: vec![CircleSpec {
                center: Vec2::new(w * 0.5, mid_y - 130.0),
                radius: ROULETTE_RADIUS,
            }],
        }
    }
}
