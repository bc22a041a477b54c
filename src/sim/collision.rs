//! Collision tests and responses on the glyph grid
//!
//! Positions are real-valued cell coordinates. Walls and the paddle are tested
//! on the raw position (the paddle with half-cell tolerance); bricks are tested
//! on the rounded cell.

use glam::Vec2;

use super::state::Ball;
use crate::consts::*;
use crate::round_half_up;

/// Which axes a brick hit reverses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceAxis {
    /// Entered through a row boundary: reverse `dy`
    Vertical,
    /// Entered through a column boundary (or no boundary): reverse `dx`
    Horizontal,
    /// Crossed both boundaries: reverse both
    Corner,
}

impl BounceAxis {
    pub fn apply(self, dir: Vec2) -> Vec2 {
        match self {
            BounceAxis::Vertical => Vec2::new(dir.x, -dir.y),
            BounceAxis::Horizontal => Vec2::new(-dir.x, dir.y),
            BounceAxis::Corner => -dir,
        }
    }
}

/// Reflect off the left, right and top walls.
///
/// Each wall is checked independently; position is mirrored about the wall and
/// the matching direction component forced to point back into the field.
/// Returns true if any wall was hit.
pub fn reflect_walls(ball: &mut Ball) -> bool {
    let right = COLS as f32 - 1.0;
    let mut hit = false;

    if ball.pos.x < 0.0 {
        ball.pos.x = -ball.pos.x;
        ball.dir.x = ball.dir.x.abs();
        hit = true;
    }

    if ball.pos.x > right {
        ball.pos.x = 2.0 * right - ball.pos.x;
        ball.dir.x = -ball.dir.x.abs();
        hit = true;
    }

    if ball.pos.y < 0.0 {
        ball.pos.y = -ball.pos.y;
        ball.dir.y = ball.dir.y.abs();
        hit = true;
    }

    hit
}

/// Check the ball against the paddle.
///
/// Only a descending ball at or below the row above the paddle can hit, and
/// its x must lie within `[paddle_x - 0.5, paddle_x + PADDLE_WIDTH - 0.5]`.
/// Returns the hit position along the paddle (0 = left edge, 1 = right edge).
pub fn paddle_hit(ball: &Ball, paddle_x: usize) -> Option<f32> {
    let left = paddle_x as f32;
    let contact_row = PADDLE_ROW as f32 - 1.0;

    let descending = ball.dir.y > 0.0;
    let low_enough = ball.pos.y >= contact_row;
    let over_paddle =
        ball.pos.x >= left - 0.5 && ball.pos.x <= left + PADDLE_WIDTH as f32 - 0.5;

    if descending && low_enough && over_paddle {
        Some((ball.pos.x - left) / PADDLE_WIDTH as f32)
    } else {
        None
    }
}

/// Direction after a paddle hit.
///
/// Maps the hit position linearly to -60° (left edge) .. +60° (right edge)
/// from vertical, always upward, then applies the minimum-dx floor.
pub fn paddle_deflection(hit_pos: f32) -> Vec2 {
    let angle = (hit_pos - 0.5) * (std::f32::consts::PI / 3.0) * 2.0;
    clamp_min_dx(Vec2::new(angle.sin(), -angle.cos()))
}

/// Keep the ball off near-vertical trajectories.
///
/// A nonzero `dx` below `MIN_DX` is snapped to `±MIN_DX` and the direction
/// re-normalized. An exact zero is left alone.
pub fn clamp_min_dx(dir: Vec2) -> Vec2 {
    if dir.x != 0.0 && dir.x.abs() < MIN_DX {
        Vec2::new(dir.x.signum() * MIN_DX, dir.y).normalize()
    } else {
        dir
    }
}

/// Rounded (column, row) cell of a position
#[inline]
pub fn cell_of(pos: Vec2) -> (i32, i32) {
    (round_half_up(pos.x), round_half_up(pos.y))
}

/// Brick-band coordinates (band row, column) of a cell, if inside the band
pub fn brick_cell(col: i32, row: i32) -> Option<(usize, usize)> {
    let start = BRICK_START_ROW as i32;
    let in_rows = row >= start && row < start + BRICK_ROWS as i32;
    let in_cols = col >= 0 && col < COLS as i32;
    if in_rows && in_cols {
        Some(((row - start) as usize, col as usize))
    } else {
        None
    }
}

/// Decide how a brick hit bounces.
///
/// The previous cell is reconstructed by stepping back one tick of the current
/// velocity. This can misclassify the axis for a ball that crosses more than
/// one cell boundary per tick; at speeds up to `BALL_SPEED_MAX` it holds.
pub fn brick_bounce_axis(ball: &Ball) -> BounceAxis {
    let (col, row) = cell_of(ball.pos);
    let (prev_col, prev_row) = cell_of(ball.pos - ball.velocity());

    match (prev_col != col, prev_row != row) {
        (true, true) => BounceAxis::Corner,
        (false, true) => BounceAxis::Vertical,
        _ => BounceAxis::Horizontal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(x: f32, y: f32, dx: f32, dy: f32, speed: f32) -> Ball {
        Ball {
            pos: Vec2::new(x, y),
            dir: Vec2::new(dx, dy),
            speed,
        }
    }

    #[test]
    fn test_left_wall_mirrors_position_and_direction() {
        let mut b = ball(-0.3, 5.0, -0.4, 0.9, 0.8);
        assert!(reflect_walls(&mut b));
        assert!((b.pos.x - 0.3).abs() < 1e-6);
        assert!((b.dir.x - 0.4).abs() < 1e-6);
        assert_eq!(b.dir.y, 0.9);
    }

    #[test]
    fn test_right_wall() {
        let mut b = ball(27.4, 5.0, 0.6, 0.8, 0.8);
        assert!(reflect_walls(&mut b));
        assert!((b.pos.x - 26.6).abs() < 1e-5);
        assert!((b.dir.x + 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_top_wall() {
        let mut b = ball(10.0, -0.25, 0.6, -0.8, 0.8);
        assert!(reflect_walls(&mut b));
        assert!((b.pos.y - 0.25).abs() < 1e-6);
        assert!((b.dir.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_corner_hits_both_walls() {
        let mut b = ball(-0.2, -0.1, -0.6, -0.8, 0.8);
        assert!(reflect_walls(&mut b));
        assert!(b.dir.x > 0.0 && b.dir.y > 0.0);
        assert!(b.pos.x > 0.0 && b.pos.y > 0.0);
    }

    #[test]
    fn test_no_wall_inside_field() {
        let mut b = ball(10.0, 5.0, -0.6, -0.8, 0.8);
        assert!(!reflect_walls(&mut b));
        assert_eq!(b.pos, Vec2::new(10.0, 5.0));
    }

    #[test]
    fn test_paddle_hit_window() {
        // Paddle spans columns 10..15, tolerance half a cell each side
        let paddle_x = 10;
        assert_eq!(paddle_hit(&ball(9.5, 8.2, 0.0, 1.0, 0.8), paddle_x), Some(-0.1));
        assert!(paddle_hit(&ball(9.49, 8.2, 0.0, 1.0, 0.8), paddle_x).is_none());
        assert!(paddle_hit(&ball(14.5, 8.2, 0.0, 1.0, 0.8), paddle_x).is_some());
        assert!(paddle_hit(&ball(14.51, 8.2, 0.0, 1.0, 0.8), paddle_x).is_none());
        // Too high
        assert!(paddle_hit(&ball(12.0, 7.9, 0.0, 1.0, 0.8), paddle_x).is_none());
        // Moving up
        assert!(paddle_hit(&ball(12.0, 8.2, 0.0, -1.0, 0.8), paddle_x).is_none());
    }

    #[test]
    fn test_center_hit_goes_straight_up() {
        let dir = paddle_deflection(0.5);
        assert!(dir.x.abs() < 1e-6);
        assert!((dir.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_edge_hits_deflect_sixty_degrees() {
        let left = paddle_deflection(0.0);
        let right = paddle_deflection(1.0);
        let s60 = (std::f32::consts::PI / 3.0).sin();
        assert!((left.x + s60).abs() < 1e-5);
        assert!((right.x - s60).abs() < 1e-5);
        assert!(left.y < 0.0 && right.y < 0.0);
    }

    #[test]
    fn test_min_dx_floor_preserves_sign_and_length() {
        // sin(6°) ~ 0.105 is below the floor
        let dir = paddle_deflection(0.55);
        assert!(dir.x > 0.14 && dir.x < MIN_DX);
        assert!(dir.y < 0.0);
        assert!((dir.length() - 1.0).abs() < 1e-5);

        let neg = clamp_min_dx(Vec2::new(-0.05, -0.99875));
        assert!(neg.x < 0.0);
        assert!(neg.x.abs() > 0.14);
        assert!((neg.length() - 1.0).abs() < 1e-5);

        let zero = clamp_min_dx(Vec2::new(0.0, -1.0));
        assert_eq!(zero, Vec2::new(0.0, -1.0));

        let wide = clamp_min_dx(Vec2::new(0.6, -0.8));
        assert_eq!(wide, Vec2::new(0.6, -0.8));
    }

    #[test]
    fn test_brick_cell_bounds() {
        assert_eq!(brick_cell(0, 0), Some((0, 0)));
        assert_eq!(brick_cell(27, 3), Some((3, 27)));
        assert_eq!(brick_cell(28, 3), None);
        assert_eq!(brick_cell(-1, 0), None);
        assert_eq!(brick_cell(5, 4), None);
    }

    #[test]
    fn test_bounce_axis_from_previous_cell() {
        // Came up through a row boundary
        let b = ball(5.0, 3.4, 0.0, -1.0, 0.8);
        assert_eq!(brick_bounce_axis(&b), BounceAxis::Vertical);

        // Came sideways through a column boundary
        let b = ball(5.6, 3.0, 1.0, 0.0, 0.8);
        assert_eq!(brick_bounce_axis(&b), BounceAxis::Horizontal);

        // Crossed both
        let b = ball(5.6, 3.4, 0.6, -0.8, 1.0);
        assert_eq!(brick_bounce_axis(&b), BounceAxis::Corner);

        // Same cell as last tick falls back to horizontal
        let b = ball(5.1, 3.1, 0.0, -1.0, 0.05);
        assert_eq!(brick_bounce_axis(&b), BounceAxis::Horizontal);
    }

    #[test]
    fn test_bounce_axis_apply() {
        let dir = Vec2::new(0.6, -0.8);
        assert_eq!(BounceAxis::Vertical.apply(dir), Vec2::new(0.6, 0.8));
        assert_eq!(BounceAxis::Horizontal.apply(dir), Vec2::new(-0.6, -0.8));
        assert_eq!(BounceAxis::Corner.apply(dir), Vec2::new(-0.6, 0.8));
    }
}
