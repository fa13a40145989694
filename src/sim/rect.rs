//! Integer axis-aligned rectangles
//!
//! Positions are integrated as `f32` vectors and rounded into rects each
//! frame, so both collision and the render feed work on whole pixels.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box. `(x, y)` is the top-left corner; y grows down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rect of the given size centered on `(cx, cy)`
    pub fn from_center(cx: i32, cy: i32, w: i32, h: i32) -> Self {
        Self {
            x: cx - w / 2,
            y: cy - h / 2,
            w,
            h,
        }
    }

    /// Build a rect of the given size with its bottom-center at `(cx, by)`
    pub fn from_midbottom(cx: i32, by: i32, w: i32, h: i32) -> Self {
        Self {
            x: cx - w / 2,
            y: by - h,
            w,
            h,
        }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Move the rect so its left edge sits at `left`
    pub fn set_left(&mut self, left: i32) {
        self.x = left;
    }

    /// Move the rect so its right edge sits at `right`
    pub fn set_right(&mut self, right: i32) {
        self.x = right - self.w;
    }

    /// Move the rect so its top edge sits at `top`
    pub fn set_top(&mut self, top: i32) {
        self.y = top;
    }

    /// Move the rect so its bottom edge sits at `bottom`
    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h;
    }

    #[inline]
    pub fn centerx(&self) -> i32 {
        self.x + self.w / 2
    }

    #[inline]
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    #[inline]
    pub fn midbottom(&self) -> (i32, i32) {
        (self.centerx(), self.bottom())
    }

    #[inline]
    pub fn midtop(&self) -> (i32, i32) {
        (self.centerx(), self.top())
    }

    /// Move the rect so its bottom-center sits at `(cx, by)`
    pub fn set_midbottom(&mut self, (cx, by): (i32, i32)) {
        self.x = cx - self.w / 2;
        self.y = by - self.h;
    }

    /// Resize in place, keeping the center fixed
    pub fn resize_about_center(&mut self, new_w: i32, new_h: i32) {
        let (cx, cy) = self.center();
        *self = Rect::from_center(cx, cy, new_w, new_h);
    }

    /// True if the two rects overlap with positive area on both axes
    pub fn colliderect(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Intersection of the two rects; zero-sized when they do not overlap
    pub fn clip(&self, other: &Rect) -> Rect {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect {
            x: left,
            y: top,
            w: (right - left).max(0),
            h: (bottom - top).max(0),
        }
    }
}
