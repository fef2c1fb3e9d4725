//! Paired teleporters
//!
//! Each portal targets its partner by index into the arena's portal list.
//! Transit keeps the ball's velocity bit-for-bit and maps its vertical
//! offset from the source portal onto the target.

use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::paddle::Side;
use super::rect::Rect;
use crate::consts::PORTAL_COOLDOWN_FRAMES;

/// One end of a portal pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portal {
    pub rect: Rect,
    /// Index of the partner portal
    pub target: usize,
    /// Direction a ball leaves this portal when it arrives here
    pub exit: Side,
    /// Frames until this end may trigger again
    pub cooldown: u32,
}

impl Portal {
    /// Portals on the left half of the arena face right, the rest face left
    pub fn new(rect: Rect, target: usize, arena_width: f32) -> Self {
        let exit = if rect.center().x < arena_width / 2.0 {
            Side::Right
        } else {
            Side::Left
        };
        Self {
            rect,
            target,
            exit,
            cooldown: 0,
        }
    }

    /// Build a mutually targeting pair that will live at `first_index` and
    /// `first_index + 1`
    pub fn pair(a: Rect, b: Rect, first_index: usize, arena_width: f32) -> [Portal; 2] {
        [
            Portal::new(a, first_index + 1, arena_width),
            Portal::new(b, first_index, arena_width),
        ]
    }

    /// Decrement the cooldown; runs every frame, ball nearby or not
    pub fn tick(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown == 0
    }

    /// Teleport `ball` from `self` to `target` if it overlaps `self`.
    ///
    /// Refuses while either end is cooling down. On transit both ends are
    /// locked for [`PORTAL_COOLDOWN_FRAMES`].
    pub fn handle_collision(&mut self, target: &mut Portal, ball: &mut Ball) -> bool {
        if !self.is_ready() || !target.is_ready() {
            return false;
        }
        if !ball.rect.overlaps(&self.rect) {
            return false;
        }

        let relative = if self.rect.h > 0.0 {
            ((ball.center().y - self.rect.top()) / self.rect.h).clamp(0.0, 1.0)
        } else {
            0.5
        };
        ball.rect
            .set_center_y(target.rect.top() + relative * target.rect.h);

        match target.exit {
            Side::Right => ball.rect.set_left(target.rect.right() + 1.0),
            Side::Left => ball.rect.set_right(target.rect.left() - 1.0),
        }

        self.cooldown = PORTAL_COOLDOWN_FRAMES;
        target.cooldown = PORTAL_COOLDOWN_FRAMES;
        log::debug!(
            "Ball {} teleported to ({:.1}, {:.1})",
            ball.id,
            ball.center().x,
            ball.center().y
        );
        true
    }
}

/// Mutable access to a portal and its partner at the same time
pub fn pair_mut(portals: &mut [Portal], index: usize) -> Option<(&mut Portal, &mut Portal)> {
    let target = portals.get(index)?.target;
    if target == index || target >= portals.len() {
        return None;
    }

    if index < target {
        let (head, tail) = portals.split_at_mut(target);
        Some((&mut head[index], &mut tail[0]))
    } else {
        let (head, tail) = portals.split_at_mut(index);
        Some((&mut tail[0], &mut head[target]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::ARENA_WIDTH;
    use crate::sim::velocity::{SpeedBand, Velocity};
    use glam::Vec2;
    use proptest::prelude::*;

    fn portals() -> Vec<Portal> {
        Portal::pair(
            Rect::new(100.0, 100.0, 20.0, 80.0),
            Rect::new(650.0, 300.0, 20.0, 160.0),
            0,
            ARENA_WIDTH,
        )
        .to_vec()
    }

    fn ball_at(center: Vec2) -> Ball {
        let mut ball = Ball::new(1, center, 16.0, SpeedBand::default());
        ball.velocity = Velocity::new(412.5, -1.0, 0.37);
        ball
    }

    #[test]
    fn test_pair_targets_each_other() {
        let portals = portals();
        assert_eq!(portals[0].target, 1);
        assert_eq!(portals[1].target, 0);
        assert_eq!(portals[0].exit, Side::Right);
        assert_eq!(portals[1].exit, Side::Left);
    }

    #[test]
    fn test_transit_preserves_velocity_and_offset() {
        let mut portals = portals();
        let mut ball = ball_at(Vec2::new(110.0, 120.0));
        let before = ball.velocity;

        let (src, dst) = pair_mut(&mut portals, 0).unwrap();
        assert!(src.handle_collision(dst, &mut ball));
        assert_eq!(ball.velocity, before);
        // 20/80 into the source maps to 40/160 into the target
        assert!((ball.center().y - 340.0).abs() < 1e-3);
        // Target sits on the right half, so the ball exits leftward
        assert_eq!(ball.rect.right(), 649.0);
        assert_eq!(portals[0].cooldown, PORTAL_COOLDOWN_FRAMES);
        assert_eq!(portals[1].cooldown, PORTAL_COOLDOWN_FRAMES);
    }

    #[test]
    fn test_cooldown_blocks_either_end() {
        let mut portals = portals();
        portals[0].cooldown = 1;

        let mut ball = ball_at(Vec2::new(660.0, 380.0));
        let (src, dst) = pair_mut(&mut portals, 1).unwrap();
        assert!(!src.handle_collision(dst, &mut ball));

        portals[0].tick();
        let (src, dst) = pair_mut(&mut portals, 1).unwrap();
        assert!(src.handle_collision(dst, &mut ball));
        assert_eq!(ball.rect.left(), 121.0);
    }

    #[test]
    fn test_offset_clamped_to_span() {
        let mut portals = portals();
        // Ball center sits above the source's top edge but its box overlaps
        let mut ball = ball_at(Vec2::new(110.0, 95.0));
        let (src, dst) = pair_mut(&mut portals, 0).unwrap();
        assert!(src.handle_collision(dst, &mut ball));
        assert_eq!(ball.center().y, 300.0);
    }

    #[test]
    fn test_pair_mut_rejects_self_target() {
        let mut portals = vec![Portal::new(Rect::new(0.0, 0.0, 10.0, 10.0), 0, ARENA_WIDTH)];
        assert!(pair_mut(&mut portals, 0).is_none());
        assert!(pair_mut(&mut portals, 3).is_none());
    }

    proptest! {
        #[test]
        fn prop_transit_maps_relative_offset(offset in 0.0f32..=1.0) {
            let mut portals = portals();
            let src_y = 100.0 + offset * 80.0;
            let mut ball = ball_at(Vec2::new(110.0, src_y));
            let before = ball.velocity;
            let (src, dst) = pair_mut(&mut portals, 0).unwrap();
            prop_assert!(src.handle_collision(dst, &mut ball));
            prop_assert_eq!(ball.velocity, before);
            let dst_offset = (ball.center().y - 300.0) / 160.0;
            prop_assert!((dst_offset - offset).abs() < 1e-4);
        }
    }
}
