//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod ball;
pub mod bumper;
pub mod collision;
pub mod manhole;
pub mod mask;
pub mod obstacle;
pub mod paddle;
pub mod portal;
pub mod powerup;
pub mod rect;
pub mod roulette;
pub mod state;
pub mod tick;
pub mod velocity;

pub use ball::Ball;
pub use bumper::Bumper;
pub use collision::{ImpactSide, impact_side};
pub use manhole::{Manhole, SpoutTiming};
pub use mask::CollisionMask;
pub use obstacle::{Goal, GoalEvent, Obstacle};
pub use paddle::{Paddle, Side};
pub use portal::Portal;
pub use powerup::PowerUpBall;
pub use rect::Rect;
pub use roulette::{RouletteSpinner, hold_duration};
pub use state::{Arena, ArenaEvent, ArenaState, Score};
pub use tick::{PaddleIntent, TickInput, tick};
pub use velocity::{Heading, SpeedBand, Velocity};
