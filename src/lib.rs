//! Arkanoid - a brick breaker for a constrained glyph display
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (physics, collisions, game state)
//! - `renderer`: Glyph grid and page layouts pushed to the display
//! - `platform`: Display/input abstraction plus terminal and in-memory hosts
//! - `persistence`: Remote best-score store
//! - `app`: Game loop and command dispatch
//! - `session`: Connect/action entry points used by the host shell

pub mod app;
pub mod error;
pub mod event_log;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use app::App;
pub use error::{ArkanoidError, Result};
pub use event_log::EventLog;
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Display surface in pixels
    pub const DISPLAY_WIDTH: u32 = 576;
    pub const DISPLAY_HEIGHT: u32 = 288;

    /// Logical glyph grid
    pub const COLS: usize = 28;
    pub const ROWS: usize = 10;

    /// Paddle geometry (columns) and step per move command
    pub const PADDLE_WIDTH: usize = 5;
    pub const PADDLE_ROW: usize = 9;
    pub const PADDLE_SPEED: usize = 2;

    /// Brick band
    pub const BRICK_ROWS: usize = 4;
    pub const BRICK_START_ROW: usize = 0;

    /// Ball speed in cells per tick
    pub const BALL_SPEED_INIT: f32 = 0.8;
    pub const BALL_SPEED_INC: f32 = 0.02;
    pub const BRICKS_PER_SPEED_BUMP: u32 = 10;
    pub const BALL_SPEED_MAX: f32 = 1.0;
    /// Minimum |dx| after a paddle bounce
    pub const MIN_DX: f32 = 0.15;

    /// Launch direction, 60° above horizontal (unit length)
    pub const LAUNCH_DX: f32 = 0.5;
    pub const LAUNCH_DY: f32 = -0.866_025_4;

    /// Fixed tick interval
    pub const TICK_MS: u64 = 50;
    pub const LIVES: u8 = 3;

    const _: () = assert!(PADDLE_ROW > BRICK_START_ROW + BRICK_ROWS);
    const _: () = assert!(PADDLE_ROW < ROWS);
    const _: () = assert!(PADDLE_WIDTH <= COLS);
}

/// Round to the nearest integer with halves going up (`-0.5 -> 0`, `2.5 -> 3`).
///
/// Grid snapping for brick tests and rendering uses this instead of
/// `f32::round`, which rounds halves away from zero.
#[inline]
pub fn round_half_up(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}
