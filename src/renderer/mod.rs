//! Display rendering
//!
//! The game is drawn as a glyph grid inside a full-screen text container.
//! The splash and game-over pages show an image with one line of text.

pub mod assets;
pub mod frame;
pub mod grid;
pub mod page;

pub use assets::Assets;
pub use frame::{PushOutcome, Renderer};
pub use grid::render_grid;
pub use page::PageMode;
