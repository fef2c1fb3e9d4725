//! Arena session state
//!
//! One `ArenaState` lives for one level: created from settings + layout at
//! level start, reset between rounds, dropped at level end. Everything the
//! frame tick touches is owned here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::bumper::Bumper;
use super::manhole::Manhole;
use super::obstacle::{Goal, Obstacle};
use super::paddle::{Paddle, Side};
use super::portal::Portal;
use super::powerup::PowerUpBall;
use super::rect::Rect;
use super::roulette::RouletteSpinner;
use crate::settings::{ArenaSettings, LevelLayout};

/// Play-field bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    /// Scoreboard strip; the ball bounces off its lower edge
    pub header_height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32, header_height: f32) -> Self {
        Self {
            width,
            height,
            header_height,
        }
    }

    /// Center of the area below the scoreboard
    pub fn play_center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, (self.header_height + self.height) / 2.0)
    }
}

/// Points per player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn award(&mut self, side: Side) {
        match side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
    }
}

/// Things that happened during a tick, for the audio and scoring layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArenaEvent {
    WallBounce { ball: u32 },
    PaddleHit { ball: u32, side: Side },
    GoalBounce { ball: u32 },
    Scored { ball: u32, side: Side },
    ObstacleHit { ball: u32 },
    Teleported { ball: u32 },
    SpoutStarted,
    Spouted { ball: u32 },
    Bumped { ball: u32 },
    Duplicated { source: u32, ball: u32 },
    PowerUpSpawned,
    Captured { ball: u32 },
    Released { ball: u32 },
}

/// Complete arena state for one level
#[derive(Debug, Clone)]
pub struct ArenaState {
    pub settings: ArenaSettings,
    pub arena: Arena,
    pub rng: Pcg32,
    /// Simulation frame counter
    pub frame: u64,
    pub score: Score,
    /// Left paddle first
    pub paddles: [Paddle; 2],
    /// Free balls, sorted by id. Balls held by spinners live in the spinner.
    pub balls: Vec<Ball>,
    pub obstacles: Vec<Obstacle>,
    pub goals: Vec<Goal>,
    pub portals: Vec<Portal>,
    pub manholes: Vec<Manhole>,
    pub bumpers: Vec<Bumper>,
    pub power_up: Option<PowerUpBall>,
    pub spinners: Vec<RouletteSpinner>,
    next_id: u32,
}

impl ArenaState {
    /// Build a session. Settings and layout that fail validation are still
    /// used (with a warning); unusable speed bands fall back to the defaults
    /// on first use.
    pub fn new(settings: ArenaSettings, layout: &LevelLayout) -> Self {
        if let Err(e) = settings.validate() {
            log::warn!("Arena settings: {}", e);
        }
        if let Err(e) = layout.validate_for(&settings) {
            log::warn!("Level layout: {}", e);
        }

        let arena = Arena::new(settings.width, settings.height, settings.header_height);
        let mut rng = Pcg32::seed_from_u64(settings.seed);

        let paddles = [Side::Left, Side::Right].map(|side| {
            let x = match side {
                Side::Left => settings.paddle_inset,
                Side::Right => settings.width - settings.paddle_inset - settings.paddle_width,
            };
            let mut paddle = Paddle::new(side, x, settings.paddle_width, settings.paddle_height);
            paddle.speed = settings.paddle_speed;
            paddle.max_bounce_angle = settings.max_bounce_angle;
            paddle.rect.set_center_y(arena.play_center().y);
            paddle
        });

        let mut portals = Vec::with_capacity(layout.portal_pairs.len() * 2);
        for [a, b] in &layout.portal_pairs {
            let first = portals.len();
            portals.extend(Portal::pair(*a, *b, first, settings.width));
        }

        let manholes = layout
            .manholes
            .iter()
            .map(|spec| Manhole::new(spec.rect, spec.spout_height, spec.timing, &mut rng))
            .collect();

        let spinners = layout
            .spinners
            .iter()
            .map(|spec| {
                let mut spinner = RouletteSpinner::new(spec.center, spec.radius);
                spinner.spin_rate = settings.spinner_spin_rate;
                spinner.max_hold_duration = settings.spinner_max_hold;
                spinner
            })
            .collect();

        let mut state = Self {
            arena,
            rng,
            frame: 0,
            score: Score::default(),
            paddles,
            balls: Vec::new(),
            obstacles: layout.obstacles.iter().copied().map(Obstacle::new).collect(),
            goals: layout
                .goals
                .iter()
                .map(|spec| Goal::new(spec.rect, spec.side))
                .collect(),
            portals,
            manholes,
            bumpers: layout
                .bumpers
                .iter()
                .map(|spec| Bumper::new(spec.center, spec.radius))
                .collect(),
            power_up: layout
                .power_up
                .map(|center| PowerUpBall::new(center, settings.power_up_size)),
            spinners,
            settings,
            next_id: 1,
        };

        state.spawn_ball();
        log::info!(
            "Arena {}x{} ready: {} obstacles, {} goals, {} portals, {} manholes, {} bumpers, {} spinners",
            state.arena.width,
            state.arena.height,
            state.obstacles.len(),
            state.goals.len(),
            state.portals.len(),
            state.manholes.len(),
            state.bumpers.len(),
            state.spinners.len()
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take ownership of a ball created elsewhere (power-up twin); returns its id
    pub fn adopt_ball(&mut self, mut ball: Ball) -> u32 {
        ball.id = self.next_entity_id();
        let id = ball.id;
        self.balls.push(ball);
        id
    }

    /// Serve a fresh ball from the middle of the arena
    pub fn spawn_ball(&mut self) -> u32 {
        let id = self.next_entity_id();
        let mut ball = Ball::new(
            id,
            self.arena.play_center(),
            self.settings.ball_size,
            self.settings.speed_band(),
        );
        ball.reset_position(&self.arena, &mut self.rng);
        self.balls.push(ball);
        id
    }

    /// Start a new round: one ball at center, spinners emptied.
    /// Hazard timers and the score carry over.
    pub fn reset_round(&mut self) {
        self.balls.clear();
        for spinner in &mut self.spinners {
            spinner.clear();
        }
        let id = self.spawn_ball();
        log::info!("Round reset, serving ball {}", id);
    }

    /// Free balls plus balls held by spinners
    pub fn live_ball_count(&self) -> usize {
        self.balls.len() + self.spinners.iter().filter(|s| s.is_spinning()).count()
    }

    /// Boxes a respawning power-up must keep clear of
    pub fn blocker_rects(&self) -> Vec<Rect> {
        let circle_box = |center: Vec2, radius: f32| Rect::from_center(center, radius * 2.0, radius * 2.0);

        self.obstacles
            .iter()
            .map(|o| o.rect)
            .chain(self.goals.iter().map(|g| g.rect))
            .chain(self.portals.iter().map(|p| p.rect))
            .chain(self.manholes.iter().map(|m| m.spout_rect))
            .chain(self.bumpers.iter().map(|b| circle_box(b.center, b.base_radius)))
            .chain(self.spinners.iter().map(|s| circle_box(s.center, s.radius)))
            .collect()
    }

    /// Ensure balls are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.balls.sort_by_key(|b| b.id);
    }
}
