//! Ball bounce resolution
//!
//! All sprites a ball overlaps in one frame are merged into a single union
//! overlap box; its shape decides the bounce axis. A box taller than wide
//! means the ball hit a side, wider than tall means top or bottom, and a
//! square box (corner clip, or a degenerate zero-area overlap) reflects
//! both axes. Paddle contact is special-cased for carry and angle control.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_6};

use crate::sim::rect::Rect;
use crate::sim::state::{Ball, Paddle};

/// Shallowest bounce angle off the paddle edge, measured from the surface
const MIN_BOUNCE_ANGLE: f32 = FRAC_PI_6;

/// Union of the ball's overlaps with every rect it collides with this frame.
/// `rects` must be non-empty and all colliding with the ball.
pub fn union_overlap(ball: &Rect, rects: &[Rect]) -> Rect {
    let mut left = i32::MAX;
    let mut top = i32::MAX;
    let mut right = i32::MIN;
    let mut bottom = i32::MIN;
    for rect in rects {
        let overlap = ball.clip(rect);
        left = left.min(overlap.left());
        top = top.min(overlap.top());
        right = right.max(overlap.right());
        bottom = bottom.max(overlap.bottom());
    }
    Rect::new(left, top, (right - left).max(0), (bottom - top).max(0))
}

/// Bounce off blocks (or walls of blocks): pick the axis from the overlap
/// box shape and snap the ball flush against the struck surface.
pub fn bounce(ball: &mut Ball, overlap: &Rect) {
    if overlap.w > overlap.h {
        vertical_bounce(ball, overlap);
    } else if overlap.h > overlap.w {
        horizontal_bounce(ball, overlap);
    } else {
        diagonal_bounce(ball, overlap);
    }
}

/// Bounce off the paddle. A tall overlap means the paddle's side pushed into
/// the ball, so the ball is carried along instead of reflected; a wide
/// overlap is a top hit with angle control.
pub fn paddle_bounce(
    ball: &mut Ball,
    overlap: &Rect,
    paddle: &Paddle,
    fps: f32,
    carry_nudge_frames: f32,
) {
    if overlap.h > overlap.w {
        carry(ball, paddle, fps, carry_nudge_frames);
    } else if overlap.w > overlap.h {
        vertical_bounce(ball, overlap);
        adjust_angle(ball, overlap, paddle);
    } else {
        diagonal_bounce(ball, overlap);
    }
}

/// Reflect the vertical component and snap clear of the overlap
pub fn vertical_bounce(ball: &mut Ball, overlap: &Rect) {
    if ball.direction.y < 0.0 {
        ball.rect.set_top(overlap.bottom());
    } else {
        ball.rect.set_bottom(overlap.top());
    }
    ball.direction.y = -ball.direction.y;
}

/// Reflect the horizontal component and snap clear of the overlap
pub fn horizontal_bounce(ball: &mut Ball, overlap: &Rect) {
    if ball.direction.x < 0.0 {
        ball.rect.set_left(overlap.right());
    } else {
        ball.rect.set_right(overlap.left());
    }
    ball.direction.x = -ball.direction.x;
}

/// Corner hit: reflect both components and snap on both axes
pub fn diagonal_bounce(ball: &mut Ball, overlap: &Rect) {
    if ball.direction.y < 0.0 {
        ball.rect.set_top(overlap.bottom());
    } else {
        ball.rect.set_bottom(overlap.top());
    }
    ball.direction.y = -ball.direction.y;

    if ball.direction.x < 0.0 {
        ball.rect.set_left(overlap.right());
    } else {
        ball.rect.set_right(overlap.left());
    }
    ball.direction.x = -ball.direction.x;
}

/// Side hit by a moving paddle: adopt the paddle's horizontal direction and
/// nudge a few frames of paddle travel ahead so the next frame is clear.
fn carry(ball: &mut Ball, paddle: &Paddle, fps: f32, carry_nudge_frames: f32) {
    let per_frame = (paddle.direction.x * paddle.speed / fps).abs();
    let nudge = (carry_nudge_frames * per_frame).round() as i32;
    if paddle.direction.x > 0.0 {
        ball.rect.x += nudge;
    } else {
        ball.rect.x -= nudge;
    }
    ball.direction.x = paddle.direction.x;
}

/// Re-aim after a top hit. The bounce angle steepens toward vertical at the
/// paddle center and flattens to [`MIN_BOUNCE_ANGLE`] at the edges.
fn adjust_angle(ball: &mut Ball, overlap: &Rect, paddle: &Paddle) {
    let hit_x = overlap.center().0;
    let distance = (hit_x - paddle.rect.centerx()) as f32;
    let half_width = (paddle.rect.w as f32 / 2.0).max(1.0);
    let ratio = (distance.abs() / half_width).min(1.0);
    if ratio == 0.0 {
        // Dead-center hit goes straight up
        ball.direction.x = 0.0;
        return;
    }
    let angle = FRAC_PI_2 - ratio * (FRAC_PI_2 - MIN_BOUNCE_ANGLE);
    let cot = 1.0 / angle.tan();
    ball.direction.x = cot * ball.direction.y.abs() * distance.signum();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use glam::Vec2;

    fn ball_at(x: i32, y: i32, size: i32, direction: Vec2) -> Ball {
        let mut ball = Ball::new((x + size / 2, y + size), size, 400.0);
        ball.direction = direction.normalize_or_zero();
        ball.active = true;
        ball
    }

    fn paddle_at(x: i32, w: i32) -> Paddle {
        let cfg = GameConfig::default();
        let mut paddle = Paddle::new(&cfg, 0);
        paddle.rect = Rect::new(x, 800, w, 22);
        paddle
    }

    #[test]
    fn test_union_overlap_spans_all_sprites() {
        let ball = Rect::new(95, 45, 20, 20);
        let a = Rect::new(0, 50, 100, 30);
        let b = Rect::new(105, 50, 100, 30);
        let overlap = union_overlap(&ball, &[a, b]);
        assert_eq!(overlap, Rect::new(95, 50, 20, 15));
    }

    #[test]
    fn test_wide_overlap_flips_vertical() {
        let mut ball = ball_at(100, 100, 20, Vec2::new(0.2, -1.0));
        let block = Rect::new(90, 80, 100, 25);
        let overlap = union_overlap(&ball.rect, &[block]);
        assert!(overlap.w > overlap.h);

        let dir_before = ball.direction;
        bounce(&mut ball, &overlap);
        assert!(ball.direction.y > 0.0);
        assert!((ball.direction.x - dir_before.x).abs() < 1e-6);
        // Snapped flush below the struck surface
        assert_eq!(ball.rect.top(), overlap.bottom());
    }

    #[test]
    fn test_tall_overlap_flips_horizontal() {
        let mut ball = ball_at(100, 100, 20, Vec2::new(1.0, 0.3));
        let block = Rect::new(115, 60, 60, 100);
        let overlap = union_overlap(&ball.rect, &[block]);
        assert!(overlap.h > overlap.w);

        bounce(&mut ball, &overlap);
        assert!(ball.direction.x < 0.0);
        assert_eq!(ball.rect.right(), overlap.left());
    }

    #[test]
    fn test_square_overlap_flips_both() {
        let mut ball = ball_at(100, 100, 20, Vec2::new(1.0, 1.0));
        let block = Rect::new(110, 110, 50, 50);
        let overlap = union_overlap(&ball.rect, &[block]);
        assert_eq!(overlap.w, overlap.h);

        bounce(&mut ball, &overlap);
        assert!(ball.direction.x < 0.0);
        assert!(ball.direction.y < 0.0);
    }

    #[test]
    fn test_dead_center_paddle_hit_goes_straight_up() {
        let paddle = paddle_at(400, 200);
        // Ball centered exactly on the paddle center
        let mut ball = ball_at(490, 790, 20, Vec2::new(0.5, 1.0));
        let overlap = union_overlap(&ball.rect, &[paddle.rect]);
        paddle_bounce(&mut ball, &overlap, &paddle, 60.0, 3.0);
        assert_eq!(ball.direction.x, 0.0);
        assert!(ball.direction.y < 0.0);
    }

    #[test]
    fn test_edge_hit_flattens_toward_min_angle() {
        let paddle = paddle_at(400, 200);
        // Far right edge of the paddle
        let mut ball = ball_at(580, 790, 20, Vec2::new(0.0, 1.0));
        let overlap = union_overlap(&ball.rect, &[paddle.rect]);
        paddle_bounce(&mut ball, &overlap, &paddle, 60.0, 3.0);
        assert!(ball.direction.y < 0.0);
        assert!(ball.direction.x > 0.0);
        // Steeper than the minimum angle allows is a bug
        let max_x = ball.direction.y.abs() / MIN_BOUNCE_ANGLE.tan();
        assert!(ball.direction.x <= max_x + 1e-4);
    }

    #[test]
    fn test_side_hit_by_moving_paddle_carries_ball() {
        let mut paddle = paddle_at(400, 200);
        paddle.direction.x = 1.0;
        paddle.speed = 900.0;
        // Overlap taller than wide on the paddle's right side
        let mut ball = ball_at(590, 795, 20, Vec2::new(-0.5, 1.0));
        let overlap = ball.rect.clip(&paddle.rect);
        assert!(overlap.h > overlap.w);

        let x_before = ball.rect.x;
        paddle_bounce(&mut ball, &overlap, &paddle, 60.0, 3.0);
        assert_eq!(ball.direction.x, 1.0);
        let expected_nudge = (3.0f32 * (900.0 / 60.0)).round() as i32;
        assert_eq!(ball.rect.x, x_before + expected_nudge);
    }
}
