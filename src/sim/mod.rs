//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Fixed tick only, no clocks
//! - No rendering, I/O or platform dependencies
//! - Every mutation goes through `tick` or a command method

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{BounceAxis, clamp_min_dx, paddle_deflection, reflect_walls};
pub use state::{Ball, BrickGrid, GamePhase, GameState, PhaseEvent};
pub use tick::{GameEvent, tick};
