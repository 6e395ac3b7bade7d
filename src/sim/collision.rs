//! Ball vs. brick collision response
//!
//! Picks the face of the brick the ball struck by comparing the centre offset
//! against the combined half-extents (the Minkowski-sum diagonal test), then
//! reflects the matching velocity component and pushes the ball clear.

use super::bodies::Ball;
use super::rect::Rect;

/// Which face of the brick the ball struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Top,
    Bottom,
    Left,
    Right,
}

/// Reflect the ball off `brick` and move it 1 unit outside the struck face
///
/// Returns `None` (and leaves the ball alone) when the boxes don't overlap.
pub fn resolve_ball_brick(ball: &mut Ball, brick: &Rect) -> Option<Face> {
    let ball_rect = ball.rect();
    let delta = ball_rect.center() - brick.center();

    let w = (ball_rect.w + brick.w) / 2.0;
    let h = (ball_rect.h + brick.h) / 2.0;

    if delta.x.abs() > w || delta.y.abs() > h {
        return None;
    }

    let cross_w = w * delta.y;
    let cross_h = h * delta.x;

    let face = if cross_w > cross_h {
        if cross_w > -cross_h {
            ball.vel.y = ball.vel.y.abs();
            ball.set_top(brick.bottom() + 1.0);
            Face::Bottom
        } else {
            ball.vel.x = -ball.vel.x.abs();
            ball.set_right(brick.left() - 1.0);
            Face::Left
        }
    } else if cross_w > -cross_h {
        ball.vel.x = ball.vel.x.abs();
        ball.set_left(brick.right() + 1.0);
        Face::Right
    } else {
        ball.vel.y = -ball.vel.y.abs();
        ball.set_bottom(brick.top() - 1.0);
        Face::Top
    };

    Some(face)
}
