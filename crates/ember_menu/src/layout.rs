//! Screen-space rectangles for layout and hit testing.

use ember_shared::Vec2;

/// A rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// X position (left edge).
    pub x: f32,
    /// Y position (top edge).
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle from a top-left corner and a size.
    #[must_use]
    pub const fn at(origin: Vec2, width: f32, height: f32) -> Self {
        Self::new(origin.x, origin.y, width, height)
    }

    /// Returns the top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Returns the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns true if the point is inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Smallest rectangle covering both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(x, y, self.right().max(other.right()) - x, self.bottom().max(other.bottom()) - y)
    }

    /// Expands the rectangle by the given amount on all sides.
    #[must_use]
    pub fn expand(&self, amount: f32) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    /// Shrinks the rectangle by the given amount on all sides.
    #[must_use]
    pub fn shrink(&self, amount: f32) -> Self {
        self.expand(-amount)
    }

    /// Splits off a slice of `width` from the right edge.
    ///
    /// Returns `(left, right)`.
    #[must_use]
    pub fn split_right(&self, width: f32) -> (Self, Self) {
        let width = width.min(self.width);
        let left = Self::new(self.x, self.y, self.width - width, self.height);
        let right = Self::new(self.right() - width, self.y, width, self.height);
        (left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_half_open() {
        let rect = Rect::new(10.0, 10.0, 100.0, 20.0);
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(rect.contains(Vec2::new(109.9, 29.9)));
        assert!(!rect.contains(Vec2::new(110.0, 15.0)));
        assert!(!rect.contains(Vec2::new(50.0, 30.0)));
    }

    #[test]
    fn test_rect_union_and_expand() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 20.0, 10.0, 10.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 15.0, 30.0));
        assert_eq!(a.expand(2.0), Rect::new(-2.0, -2.0, 14.0, 14.0));
    }

    #[test]
    fn test_split_right() {
        let (left, right) = Rect::new(0.0, 0.0, 100.0, 10.0).split_right(30.0);
        assert_eq!(left, Rect::new(0.0, 0.0, 70.0, 10.0));
        assert_eq!(right, Rect::new(70.0, 0.0, 30.0, 10.0));
    }
}
