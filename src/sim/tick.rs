//! Fixed timestep simulation tick
//!
//! One call advances the arena by one frame:
//!
//! 1. paddles move, then free balls move
//! 2. collider timers advance (portal cooldowns, spouts, bumper flashes,
//!    power-up respawn, spinners, which may let go of their ball)
//! 3. every free ball is checked against colliders in a fixed priority
//!    order, stopping at the first one that accepts the hit:
//!    walls + paddles, goals and the open edges, obstacles, portals,
//!    manholes, bumpers, power-up, spinners
//! 4. side effects land: points, twins adopted, captured balls handed to
//!    their spinner, released balls back into play

use super::ball::Ball;
use super::obstacle::GoalEvent;
use super::paddle::Side;
use super::portal::pair_mut;
use super::state::{ArenaEvent, ArenaState};

/// Movement intent for one paddle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddleIntent {
    pub up: bool,
    pub down: bool,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left: PaddleIntent,
    pub right: PaddleIntent,
}

/// Advance the arena by one timestep
pub fn tick(state: &mut ArenaState, input: &TickInput, dt: f32) -> Vec<ArenaEvent> {
    let mut events = Vec::new();
    state.frame += 1;

    let height = state.arena.height;
    for (paddle, intent) in state.paddles.iter_mut().zip([input.left, input.right]) {
        paddle.moving_up = intent.up;
        paddle.moving_down = intent.down;
        paddle.advance(dt, 0.0, height);
    }

    for ball in &mut state.balls {
        ball.advance(dt);
    }

    let released = advance_timers(state, dt, &mut events);

    let balls = std::mem::take(&mut state.balls);
    let mut free = Vec::with_capacity(balls.len());
    let mut twins = Vec::new();
    for ball in balls {
        if let Some(ball) = resolve_ball(state, ball, &mut twins, &mut events) {
            free.push(ball);
        }
    }
    state.balls = free;

    for (source, twin) in twins {
        let id = state.adopt_ball(twin);
        events.push(ArenaEvent::Duplicated { source, ball: id });
    }
    // Released balls sit clear of their spinner; they rejoin the sweep next frame
    state.balls.extend(released);

    // Ensure deterministic ordering
    state.normalize_order();
    events
}

fn advance_timers(state: &mut ArenaState, dt: f32, events: &mut Vec<ArenaEvent>) -> Vec<Ball> {
    for portal in &mut state.portals {
        portal.tick();
    }

    // Sequential so each manhole sees the spouts already started this frame
    for i in 0..state.manholes.len() {
        let others = state
            .manholes
            .iter()
            .enumerate()
            .filter(|(j, m)| *j != i && m.is_spouting)
            .count();
        let manhole = &mut state.manholes[i];
        if manhole.update(dt, others, &mut state.rng) && manhole.is_spouting {
            events.push(ArenaEvent::SpoutStarted);
        }
    }

    for bumper in &mut state.bumpers {
        bumper.update(dt);
    }

    if state.power_up.as_ref().is_some_and(|p| !p.active) {
        let live = state.live_ball_count();
        let blockers = state.blocker_rects();
        if let Some(power) = state.power_up.as_mut() {
            if power.update(live, &state.arena, &blockers, &mut state.rng) {
                events.push(ArenaEvent::PowerUpSpawned);
            }
        }
    }

    let mut released = Vec::new();
    for spinner in &mut state.spinners {
        if let Some(ball) = spinner.update(dt) {
            events.push(ArenaEvent::Released { ball: ball.id });
            released.push(ball);
        }
    }
    released
}

/// Run one ball through the colliders. Returns `None` if a spinner took it.
fn resolve_ball(
    state: &mut ArenaState,
    mut ball: Ball,
    twins: &mut Vec<(u32, Ball)>,
    events: &mut Vec<ArenaEvent>,
) -> Option<Ball> {
    let id = ball.id;

    // --- Walls and paddles ---
    let wall = ball.handle_wall_collision(state.arena.header_height, state.arena.height);
    if wall {
        events.push(ArenaEvent::WallBounce { ball: id });
    }
    let paddle = state
        .paddles
        .iter()
        .find(|paddle| ball.handle_paddle_collision(paddle))
        .map(|paddle| paddle.side);
    if let Some(side) = paddle {
        events.push(ArenaEvent::PaddleHit { ball: id, side });
    }
    if wall || paddle.is_some() {
        return Some(ball);
    }

    // --- Goals, then the open edges beside them ---
    let mut goal_event = state
        .goals
        .iter()
        .find_map(|goal| goal.handle_collision(&mut ball));
    if goal_event.is_none() {
        let width = state.arena.width;
        goal_event = if state.settings.bounce_side_walls {
            ball.handle_side_wall_collision(width)
                .then_some(GoalEvent::Bounce)
        } else {
            ball.handle_scoring(width)
        };
    }
    match goal_event {
        Some(GoalEvent::Scored(side)) => {
            score_point(state, &mut ball, side, events);
            return Some(ball);
        }
        Some(GoalEvent::Bounce) => {
            events.push(ArenaEvent::GoalBounce { ball: id });
            return Some(ball);
        }
        None => {}
    }

    // --- Static obstacles ---
    if state
        .obstacles
        .iter()
        .any(|obstacle| obstacle.handle_collision(&mut ball))
    {
        events.push(ArenaEvent::ObstacleHit { ball: id });
        return Some(ball);
    }

    // --- Portals ---
    for i in 0..state.portals.len() {
        if let Some((source, target)) = pair_mut(&mut state.portals, i) {
            if source.handle_collision(target, &mut ball) {
                events.push(ArenaEvent::Teleported { ball: id });
                return Some(ball);
            }
        }
    }

    // --- Manholes ---
    if state
        .manholes
        .iter()
        .any(|manhole| manhole.handle_collision(&mut ball))
    {
        events.push(ArenaEvent::Spouted { ball: id });
        return Some(ball);
    }

    // --- Bumpers ---
    if state
        .bumpers
        .iter_mut()
        .any(|bumper| bumper.handle_collision(&mut ball))
    {
        events.push(ArenaEvent::Bumped { ball: id });
        return Some(ball);
    }

    // --- Power-up ---
    if let Some(power) = state.power_up.as_mut() {
        if let Some(twin) = power.handle_collision(&ball, &mut state.rng) {
            twins.push((id, twin));
            return Some(ball);
        }
    }

    // --- Roulette spinners ---
    for spinner in &mut state.spinners {
        match spinner.handle_collision(ball) {
            Ok(()) => {
                events.push(ArenaEvent::Captured { ball: id });
                return None;
            }
            Err(returned) => ball = returned,
        }
    }

    Some(ball)
}

fn score_point(state: &mut ArenaState, ball: &mut Ball, side: Side, events: &mut Vec<ArenaEvent>) {
    state.score.award(side);
    log::info!(
        "Point to {} ({} - {})",
        side.as_str(),
        state.score.left,
        state.score.right
    );
    events.push(ArenaEvent::Scored { ball: ball.id, side });
    ball.reset_position(&state.arena, &mut state.rng);
}
