//! Ball-duplicating power-up
//!
//! Touching an active power-up consumes it and spawns a twin of the touching
//! ball. The power-up then hides for a random 3-15 seconds (counted in
//! frames) and reappears somewhere clear of paddles and other obstacles.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::rect::Rect;
use super::state::Arena;
use crate::consts::{
    PADDLE_ZONE_WIDTH, POWERUP_MAX_BALLS, POWERUP_MAX_DELAY_FRAMES, POWERUP_MIN_DELAY_FRAMES,
    POWERUP_OBSTACLE_MARGIN, POWERUP_PLACEMENT_ATTEMPTS,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpBall {
    pub rect: Rect,
    pub active: bool,
    /// Frames spent hidden so far
    pub spawn_timer: u32,
    /// Frames to stay hidden before respawning
    pub next_spawn_delay: u32,
}

impl PowerUpBall {
    /// An active power-up of `size` centered at `center`
    pub fn new(center: Vec2, size: f32) -> Self {
        Self {
            rect: Rect::from_center(center, size, size),
            active: true,
            spawn_timer: 0,
            next_spawn_delay: POWERUP_MIN_DELAY_FRAMES,
        }
    }

    /// Consume the power-up and return the ball's twin
    pub fn handle_collision(&mut self, ball: &Ball, rng: &mut impl Rng) -> Option<Ball> {
        if !self.active || !ball.rect.overlaps(&self.rect) {
            return None;
        }

        self.active = false;
        self.spawn_timer = 0;
        self.next_spawn_delay = rng.random_range(POWERUP_MIN_DELAY_FRAMES..=POWERUP_MAX_DELAY_FRAMES);
        log::debug!(
            "Ball {} duplicated, power-up back in {} frames",
            ball.id,
            self.next_spawn_delay
        );
        Some(ball.duplicate_at(self.rect.center()))
    }

    /// Count one frame while hidden and respawn when due.
    ///
    /// Respawning waits while `live_balls` is at the cap. Returns true on the
    /// frame the power-up reappears.
    pub fn update(
        &mut self,
        live_balls: usize,
        arena: &Arena,
        blockers: &[Rect],
        rng: &mut impl Rng,
    ) -> bool {
        if self.active {
            return false;
        }

        self.spawn_timer = self.spawn_timer.saturating_add(1);
        if self.spawn_timer < self.next_spawn_delay || live_balls >= POWERUP_MAX_BALLS {
            return false;
        }

        let size = self.rect.w;
        let position = (0..POWERUP_PLACEMENT_ATTEMPTS)
            .filter_map(|_| sample_position(arena, size, rng))
            .find(|candidate| is_clear(candidate, arena, blockers));

        match position {
            Some(rect) => self.rect = rect,
            None => {
                log::warn!(
                    "No clear spot for power-up after {} attempts, using arena center",
                    POWERUP_PLACEMENT_ATTEMPTS
                );
                self.rect.set_center(arena.play_center());
            }
        }
        self.active = true;
        self.spawn_timer = 0;
        true
    }
}

fn sample_position(arena: &Arena, size: f32, rng: &mut impl Rng) -> Option<Rect> {
    let max_x = arena.width - size;
    let min_y = arena.header_height;
    let max_y = arena.height - size;
    if max_x <= 0.0 || max_y <= min_y {
        return None;
    }
    let x = rng.random_range(0.0..max_x);
    let y = rng.random_range(min_y..max_y);
    Some(Rect::new(x, y, size, size))
}

/// Outside the paddle approach strips and clear of every inflated blocker
pub fn is_clear(candidate: &Rect, arena: &Arena, blockers: &[Rect]) -> bool {
    if candidate.left() < PADDLE_ZONE_WIDTH || candidate.right() > arena.width - PADDLE_ZONE_WIDTH
    {
        return false;
    }
    !blockers
        .iter()
        .any(|blocker| candidate.overlaps(&blocker.inflate(POWERUP_OBSTACLE_MARGIN)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::velocity::{SpeedBand, Velocity};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn arena() -> Arena {
        Arena::new(ARENA_WIDTH, ARENA_HEIGHT, HEADER_HEIGHT)
    }

    #[test]
    fn test_touch_spawns_twin() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut power = PowerUpBall::new(Vec2::new(400.0, 300.0), POWERUP_SIZE);
        let mut ball = Ball::new(4, Vec2::new(390.0, 300.0), 18.0, SpeedBand::default());
        ball.velocity = Velocity::new(333.0, -1.0, 0.25);

        let twin = power.handle_collision(&ball, &mut rng).unwrap();
        assert!(!power.active);
        assert_eq!(twin.velocity, ball.velocity);
        assert_eq!(twin.size(), 18.0);
        assert_eq!(twin.center(), Vec2::new(400.0, 300.0));
        assert!((POWERUP_MIN_DELAY_FRAMES..=POWERUP_MAX_DELAY_FRAMES).contains(&power.next_spawn_delay));

        // Inactive power-ups can't be collected
        assert!(power.handle_collision(&ball, &mut rng).is_none());
    }

    #[test]
    fn test_respawns_after_delay() {
        let mut rng = Pcg32::seed_from_u64(2);
        let arena = arena();
        let mut power = PowerUpBall::new(Vec2::new(400.0, 300.0), POWERUP_SIZE);
        power.active = false;
        power.next_spawn_delay = 10;

        for _ in 0..9 {
            assert!(!power.update(1, &arena, &[], &mut rng));
        }
        assert!(power.update(1, &arena, &[], &mut rng));
        assert!(power.active);
        assert!(is_clear(&power.rect, &arena, &[]));
    }

    #[test]
    fn test_ball_cap_delays_respawn() {
        let mut rng = Pcg32::seed_from_u64(3);
        let arena = arena();
        let mut power = PowerUpBall::new(Vec2::new(400.0, 300.0), POWERUP_SIZE);
        power.active = false;
        power.next_spawn_delay = 1;

        for _ in 0..50 {
            assert!(!power.update(POWERUP_MAX_BALLS, &arena, &[], &mut rng));
        }
        assert!(power.update(POWERUP_MAX_BALLS - 1, &arena, &[], &mut rng));
    }

    #[test]
    fn test_falls_back_to_center_when_blocked() {
        let mut rng = Pcg32::seed_from_u64(4);
        let arena = arena();
        let wall = [Rect::new(0.0, 0.0, ARENA_WIDTH, ARENA_HEIGHT)];
        let mut power = PowerUpBall::new(Vec2::new(10.0, 10.0), POWERUP_SIZE);
        power.active = false;
        power.next_spawn_delay = 1;

        assert!(power.update(1, &arena, &wall, &mut rng));
        assert_eq!(power.rect.center(), arena.play_center());
    }

    proptest! {
        #[test]
        fn prop_respawn_avoids_blockers(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let arena = arena();
            let blockers = [
                Rect::new(300.0, 150.0, 40.0, 120.0),
                Rect::new(460.0, 380.0, 40.0, 120.0),
                Rect::new(380.0, 280.0, 40.0, 40.0),
            ];
            let mut power = PowerUpBall::new(Vec2::new(400.0, 300.0), POWERUP_SIZE);

            for _ in 0..20 {
                power.active = false;
                power.next_spawn_delay = 1;
                prop_assert!(power.update(1, &arena, &blockers, &mut rng));
                prop_assert!(is_clear(&power.rect, &arena, &blockers));
                prop_assert!(power.rect.left() >= PADDLE_ZONE_WIDTH);
                prop_assert!(power.rect.right() <= ARENA_WIDTH - PADDLE_ZONE_WIDTH);
            }
        }
    }
}
