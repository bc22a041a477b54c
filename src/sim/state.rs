//! Game state and core simulation types
//!
//! One `GameState` lives for the whole process. `reset_game` reinitializes it
//! in place at the start of every game; only the high score survives.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Coarse phase of the game.
///
/// Replaces the `running / over / won / attached` flag soup: every variant is a
/// valid combination, and the accessors below give the flag view back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title page, no game in progress
    Splash,
    /// Ball resting on the paddle, waiting for launch
    Attached,
    /// Ball in free motion
    Playing,
    /// Every brick cleared
    GameOverWon,
    /// Ran out of lives
    GameOverLost,
}

/// Inputs to the phase transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// New game requested
    Start,
    /// Ball launched off the paddle
    Launch,
    /// Ball dropped with lives remaining
    LifeLost,
    /// Ball dropped on the last life
    OutOfLives,
    /// Last brick destroyed
    Cleared,
    /// Game-over page acknowledged, back to the title
    Dismiss,
}

impl GamePhase {
    /// Transition table. Returns `None` for transitions that are not allowed.
    pub fn next(self, event: PhaseEvent) -> Option<GamePhase> {
        use GamePhase::*;
        use PhaseEvent::*;
        match (self, event) {
            (Splash, Start) => Some(Attached),
            (Attached, Launch) => Some(Playing),
            (Playing, LifeLost) => Some(Attached),
            (Playing, OutOfLives) => Some(GameOverLost),
            (Playing, Cleared) => Some(GameOverWon),
            (GameOverWon | GameOverLost, Dismiss) => Some(Splash),
            _ => None,
        }
    }

    /// A game is in progress (commands are accepted)
    pub fn is_running(self) -> bool {
        matches!(self, GamePhase::Attached | GamePhase::Playing)
    }

    pub fn is_over(self) -> bool {
        matches!(self, GamePhase::GameOverWon | GamePhase::GameOverLost)
    }

    pub fn won(self) -> bool {
        self == GamePhase::GameOverWon
    }

    pub fn ball_attached(self) -> bool {
        self == GamePhase::Attached
    }
}

/// The ball, in grid-cell units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Unit direction while free, zero while attached
    pub dir: Vec2,
    /// Distance travelled per tick
    pub speed: f32,
}

impl Ball {
    /// A ball resting on a paddle whose left edge is at `paddle_x`
    pub fn attached_to(paddle_x: usize) -> Self {
        Self {
            pos: Vec2::new(
                paddle_center(paddle_x) as f32,
                PADDLE_ROW as f32 - 1.0,
            ),
            dir: Vec2::ZERO,
            speed: BALL_SPEED_INIT,
        }
    }

    /// Velocity for this tick
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.dir * self.speed
    }
}

/// Column the attached ball rests on
#[inline]
pub fn paddle_center(paddle_x: usize) -> usize {
    paddle_x + PADDLE_WIDTH / 2
}

/// Paddle start column (centered)
#[inline]
pub fn paddle_start() -> usize {
    (COLS - PADDLE_WIDTH) / 2
}

/// Brick band, `BRICK_ROWS x COLS`, indexed relative to `BRICK_START_ROW`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickGrid {
    cells: [[bool; COLS]; BRICK_ROWS],
}

impl Default for BrickGrid {
    fn default() -> Self {
        Self::full()
    }
}

impl BrickGrid {
    /// Every cell present
    pub fn full() -> Self {
        Self {
            cells: [[true; COLS]; BRICK_ROWS],
        }
    }

    /// No cell present
    pub fn empty() -> Self {
        Self {
            cells: [[false; COLS]; BRICK_ROWS],
        }
    }

    /// Whether the brick at band row `row`, column `col` is present.
    /// Out-of-range coordinates read as absent.
    pub fn is_present(&self, row: usize, col: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Set a single cell (test setups and level tweaks)
    pub fn set(&mut self, row: usize, col: usize, present: bool) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = present;
        }
    }

    /// Remove a brick. Returns true if one was there.
    pub fn destroy(&mut self, row: usize, col: usize) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) if *cell => {
                *cell = false;
                true
            }
            _ => false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.cells.iter().flatten().filter(|&&b| b).count()
    }

    pub fn all_cleared(&self) -> bool {
        self.cells.iter().all(|row| row.iter().all(|&b| !b))
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Current phase
    pub phase: GamePhase,
    /// Column of the paddle's left edge, `0..=COLS-PADDLE_WIDTH`
    pub paddle_x: usize,
    pub ball: Ball,
    pub bricks: BrickGrid,
    pub score: u32,
    pub bricks_destroyed: u32,
    pub lives: u8,
    /// Best score known locally; survives `reset_game`
    pub high_score: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh state on the title page
    pub fn new() -> Self {
        let paddle_x = paddle_start();
        Self {
            phase: GamePhase::Splash,
            paddle_x,
            ball: Ball::attached_to(paddle_x),
            bricks: BrickGrid::full(),
            score: 0,
            bricks_destroyed: 0,
            lives: LIVES,
            high_score: 0,
        }
    }

    /// Start a new game: reinitialize everything except the high score and
    /// enter `Attached`. Only allowed from `Splash`; returns false otherwise
    /// and leaves the state untouched.
    pub fn reset_game(&mut self) -> bool {
        if !self.transition(PhaseEvent::Start) {
            return false;
        }
        *self = Self {
            phase: self.phase,
            high_score: self.high_score,
            ..Self::new()
        };
        true
    }

    /// Put the ball back on the paddle with no momentum
    pub fn attach_ball(&mut self) {
        self.ball = Ball::attached_to(self.paddle_x);
    }

    /// Apply a phase event, ignoring transitions the table rejects.
    /// Returns true if the phase changed.
    pub fn transition(&mut self, event: PhaseEvent) -> bool {
        match self.phase.next(event) {
            Some(next) => {
                log::debug!("phase {:?} --{:?}--> {:?}", self.phase, event, next);
                self.phase = next;
                true
            }
            None => {
                log::debug!("phase {:?} ignores {:?}", self.phase, event);
                false
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    pub fn won(&self) -> bool {
        self.phase.won()
    }

    pub fn ball_attached(&self) -> bool {
        self.phase.ball_attached()
    }
}
