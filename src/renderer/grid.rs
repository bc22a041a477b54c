//! Glyph grid for the game page

use crate::consts::*;
use crate::round_half_up;
use crate::sim::GameState;

pub const EMPTY: char = '□';
pub const BALL: char = '●';
pub const PADDLE: char = '━';
/// One glyph per brick row, top to bottom
pub const BRICK_GLYPHS: [char; BRICK_ROWS] = ['▩', '▦', '▤', '▥'];

/// Render the state as `ROWS` lines of `COLS` glyphs, each ending in `\n`.
///
/// Overlaps resolve as: free ball, brick, paddle, attached ball, empty.
pub fn render_grid(state: &GameState) -> String {
    let ball_col = round_half_up(state.ball.pos.x);
    let ball_row = round_half_up(state.ball.pos.y);
    let attached = state.ball_attached();
    let paddle = state.paddle_x..state.paddle_x + PADDLE_WIDTH;

    let mut text = String::with_capacity(ROWS * (COLS * 3 + 1));
    for r in 0..ROWS {
        for c in 0..COLS {
            let on_ball = c as i32 == ball_col && r as i32 == ball_row;
            let brick_row = r.checked_sub(BRICK_START_ROW).filter(|&b| b < BRICK_ROWS);

            let glyph = if on_ball && !attached {
                BALL
            } else if let Some(b) = brick_row.filter(|&b| state.bricks.is_present(b, c)) {
                BRICK_GLYPHS[b]
            } else if r == PADDLE_ROW && paddle.contains(&c) {
                PADDLE
            } else if on_ball {
                BALL
            } else {
                EMPTY
            };
            text.push(glyph);
        }
        text.push('\n');
    }
    text
}
