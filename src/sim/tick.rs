//! Fixed-tick simulation step and player commands
//!
//! `tick` is called once per `TICK_MS` by the game loop. Commands arrive
//! between ticks from the host event source and act on the state immediately.

use glam::Vec2;

use super::collision::{
    BounceAxis, brick_bounce_axis, brick_cell, cell_of, paddle_deflection, paddle_hit,
    reflect_walls,
};
use super::state::{GamePhase, GameState, PhaseEvent, paddle_center};
use crate::consts::*;

/// Notable outcome of a single tick, for logging and the app layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Ball bounced off the paddle at `hit_pos` (0 = left edge, 1 = right edge)
    PaddleHit { hit_pos: f32 },
    /// A brick was destroyed
    BrickDestroyed {
        row: usize,
        col: usize,
        axis: BounceAxis,
        speed_bumped: bool,
    },
    /// Ball fell past the paddle; it is back on the paddle
    LifeLost { lives_left: u8 },
    /// The game ended this tick
    GameOver { won: bool },
}

impl GameState {
    /// Shift the paddle left by `PADDLE_SPEED`, clamped to the field
    pub fn move_paddle_left(&mut self) {
        if !self.is_running() {
            return;
        }
        self.paddle_x = self.paddle_x.saturating_sub(PADDLE_SPEED);
        self.follow_paddle();
    }

    /// Shift the paddle right by `PADDLE_SPEED`, clamped to the field
    pub fn move_paddle_right(&mut self) {
        if !self.is_running() {
            return;
        }
        self.paddle_x = (self.paddle_x + PADDLE_SPEED).min(COLS - PADDLE_WIDTH);
        self.follow_paddle();
    }

    /// Release an attached ball at ~60° above horizontal.
    /// Returns false when there was no attached ball.
    pub fn launch(&mut self) -> bool {
        if !self.transition(PhaseEvent::Launch) {
            return false;
        }
        self.ball.dir = Vec2::new(LAUNCH_DX, LAUNCH_DY);
        true
    }

    fn follow_paddle(&mut self) {
        if self.ball_attached() {
            self.ball.pos.x = paddle_center(self.paddle_x) as f32;
        }
    }

    /// Ball passed below the paddle
    fn lose_life(&mut self) -> GameEvent {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.transition(PhaseEvent::OutOfLives);
            return GameEvent::GameOver { won: false };
        }
        self.transition(PhaseEvent::LifeLost);
        self.attach_ball();
        GameEvent::LifeLost {
            lives_left: self.lives,
        }
    }

    /// Destroy the brick under the ball, if any
    fn hit_brick(&mut self) -> Option<GameEvent> {
        let (col, row) = cell_of(self.ball.pos);
        let (brick_row, brick_col) = brick_cell(col, row)?;
        if !self.bricks.destroy(brick_row, brick_col) {
            return None;
        }

        self.score += 1;
        self.bricks_destroyed += 1;

        let speed_bumped = self.bricks_destroyed % BRICKS_PER_SPEED_BUMP == 0;
        if speed_bumped {
            self.ball.speed = (self.ball.speed + BALL_SPEED_INC).min(BALL_SPEED_MAX);
        }

        let axis = brick_bounce_axis(&self.ball);
        self.ball.dir = axis.apply(self.ball.dir);

        if self.bricks.all_cleared() {
            self.transition(PhaseEvent::Cleared);
            return Some(GameEvent::GameOver { won: true });
        }

        Some(GameEvent::BrickDestroyed {
            row: brick_row,
            col: brick_col,
            axis,
            speed_bumped,
        })
    }
}

/// Advance the game by one fixed tick.
///
/// Does nothing unless the ball is in free motion. Order: move, walls, paddle
/// (ends the tick on a hit), drop check, bricks.
pub fn tick(state: &mut GameState) -> Option<GameEvent> {
    if state.phase != GamePhase::Playing {
        return None;
    }

    let ball = &mut state.ball;
    ball.pos += ball.velocity();
    reflect_walls(ball);

    if let Some(hit_pos) = paddle_hit(ball, state.paddle_x) {
        ball.pos.y = PADDLE_ROW as f32 - 1.0;
        ball.dir = paddle_deflection(hit_pos);
        return Some(GameEvent::PaddleHit { hit_pos });
    }

    if ball.pos.y > PADDLE_ROW as f32 {
        return Some(state.lose_life());
    }

    state.hit_brick()
}
