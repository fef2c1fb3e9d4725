//! Static box colliders: walls and scoring goals
//!
//! Both resolve hits by axis reversal only, so the ball's speed is never
//! touched here.

use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::collision::{ImpactSide, impact_side, place_flush};
use super::paddle::Side;
use super::rect::Rect;

/// Outcome of a ball touching a goal (or leaving through an open edge)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalEvent {
    /// A point for the given player
    Scored(Side),
    /// The ball struck the goal's frame and was reflected
    Bounce,
}

impl GoalEvent {
    /// Wire name used by the scoring layer: "left", "right" or "bounce"
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalEvent::Scored(side) => side.as_str(),
            GoalEvent::Bounce => "bounce",
        }
    }
}

fn reflect(ball: &mut Ball, target: &Rect, side: ImpactSide) {
    if side.is_horizontal() {
        ball.velocity.reverse_x();
    } else {
        ball.velocity.reverse_y();
    }
    place_flush(&mut ball.rect, target, side);
}

/// A static wall block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
}

impl Obstacle {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    /// Reflect the ball off whichever edge it entered through
    pub fn handle_collision(&self, ball: &mut Ball) -> bool {
        if !ball.rect.overlaps(&self.rect) {
            return false;
        }
        let side = impact_side(&ball.rect, &self.rect);
        reflect(ball, &self.rect, side);
        true
    }
}

/// A scoring pocket defended by `side`'s player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub rect: Rect,
    pub side: Side,
}

impl Goal {
    pub fn new(rect: Rect, side: Side) -> Self {
        Self { rect, side }
    }

    /// The edge facing the field: a left goal opens to the right
    pub fn open_side(&self) -> ImpactSide {
        match self.side {
            Side::Left => ImpactSide::Right,
            Side::Right => ImpactSide::Left,
        }
    }

    /// Score when entered through the mouth, otherwise bounce off the frame
    pub fn handle_collision(&self, ball: &mut Ball) -> Option<GoalEvent> {
        if !ball.rect.overlaps(&self.rect) {
            return None;
        }

        let side = impact_side(&ball.rect, &self.rect);
        if side == self.open_side() {
            Some(GoalEvent::Scored(self.side.opponent()))
        } else {
            reflect(ball, &self.rect, side);
            Some(GoalEvent::Bounce)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::velocity::{SpeedBand, Velocity};
    use glam::Vec2;
    use proptest::prelude::*;

    fn ball_at(center: Vec2, velocity: Velocity) -> Ball {
        let mut ball = Ball::new(1, center, 16.0, SpeedBand::default());
        ball.velocity = velocity;
        ball
    }

    #[test]
    fn test_obstacle_reverses_dx_on_side_hit() {
        let wall = Obstacle::new(Rect::new(300.0, 200.0, 40.0, 200.0));
        let mut ball = ball_at(Vec2::new(294.0, 300.0), Velocity::new(350.0, 1.0, 0.3));
        assert!(wall.handle_collision(&mut ball));
        assert_eq!(ball.velocity.dx, -1.0);
        assert_eq!(ball.velocity.dy, 0.3);
        assert_eq!(ball.velocity.speed, 350.0);
        assert_eq!(ball.rect.right(), 300.0);
    }

    #[test]
    fn test_obstacle_reverses_dy_on_top_hit() {
        let wall = Obstacle::new(Rect::new(300.0, 200.0, 200.0, 40.0));
        let mut ball = ball_at(Vec2::new(400.0, 195.0), Velocity::new(350.0, -1.0, 0.6));
        assert!(wall.handle_collision(&mut ball));
        assert_eq!(ball.velocity.dy, -0.6);
        assert_eq!(ball.rect.bottom(), 200.0);
    }

    #[test]
    fn test_obstacle_miss() {
        let wall = Obstacle::new(Rect::new(300.0, 200.0, 40.0, 40.0));
        let mut ball = ball_at(Vec2::new(100.0, 100.0), Velocity::new(350.0, 1.0, 0.0));
        assert!(!wall.handle_collision(&mut ball));
    }

    #[test]
    fn test_goal_scores_through_mouth() {
        let goal = Goal::new(Rect::new(0.0, 250.0, 30.0, 100.0), Side::Left);
        let mut ball = ball_at(Vec2::new(34.0, 300.0), Velocity::new(350.0, -1.0, 0.0));
        assert_eq!(goal.handle_collision(&mut ball), Some(GoalEvent::Scored(Side::Right)));
        assert_eq!(GoalEvent::Scored(Side::Right).as_str(), "right");
        // Scoring leaves the ball untouched
        assert_eq!(ball.velocity.dx, -1.0);
    }

    #[test]
    fn test_goal_frame_bounces() {
        let goal = Goal::new(Rect::new(770.0, 250.0, 30.0, 100.0), Side::Right);
        let mut ball = ball_at(Vec2::new(785.0, 245.0), Velocity::new(350.0, 1.0, 0.8));
        assert_eq!(goal.handle_collision(&mut ball), Some(GoalEvent::Bounce));
        assert_eq!(ball.velocity.dy, -0.8);
        assert_eq!(ball.rect.bottom(), 250.0);
        assert_eq!(GoalEvent::Bounce.as_str(), "bounce");
    }

    proptest! {
        #[test]
        fn prop_obstacle_bounce_is_elastic(
            x in 270.0f32..370.0,
            y in 170.0f32..270.0,
            dx in -1.5f32..1.5,
            dy in -1.5f32..1.5,
            speed in 100.0f32..900.0,
        ) {
            let wall = Obstacle::new(Rect::new(300.0, 200.0, 40.0, 40.0));
            let mut ball = ball_at(Vec2::new(x, y), Velocity::new(speed, dx, dy));
            let before = ball.velocity.cartesian();
            if wall.handle_collision(&mut ball) {
                let after = ball.velocity.cartesian();
                let x_flipped = after.x == -before.x && after.y == before.y;
                let y_flipped = after.y == -before.y && after.x == before.x;
                prop_assert!(x_flipped || y_flipped);
                prop_assert_eq!(ball.velocity.speed, speed);
            }
        }
    }
}
