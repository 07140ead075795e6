//! Ground-plane shapes used by scripts for area checks.

use crate::math::Vec2;

/// A line segment between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// Start point.
    pub start: Vec2,
    /// End point.
    pub end: Vec2,
}

impl Segment {
    /// Creates a new segment.
    #[must_use]
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Closest point on the segment to `point`.
    #[must_use]
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        let dir = self.end - self.start;
        let len_sq = dir.length_squared();
        if len_sq <= f32::EPSILON {
            return self.start;
        }
        let t = ((point - self.start).dot(dir) / len_sq).clamp(0.0, 1.0);
        self.start + dir * t
    }

    /// Shortest distance from `point` to the segment.
    #[must_use]
    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.closest_point(point).distance(point)
    }
}

/// A circle on the ground plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    /// Center.
    pub center: Vec2,
    /// Radius.
    pub radius: f32,
}

impl Circle {
    /// Creates a new circle.
    #[must_use]
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Returns true if the point lies inside or on the circle.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance(point) <= self.radius
    }

    /// Approximates the circle with `segments` vertices.
    #[must_use]
    pub fn to_polygon(&self, segments: usize) -> Polygon {
        let segments = segments.max(3);
        #[allow(clippy::cast_precision_loss)]
        let step = std::f32::consts::TAU / segments as f32;
        let points = (0..segments)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let angle = step * i as f32;
                self.center + Vec2::new(self.radius, 0.0).rotated(angle)
            })
            .collect();
        Polygon::new(points)
    }
}

/// A simple polygon (vertices in order, implicitly closed).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    /// Vertices.
    pub points: Vec<Vec2>,
}

impl Polygon {
    /// Creates a polygon from its vertices.
    #[must_use]
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// Rectangle of `width` around the segment `start -> end`.
    #[must_use]
    pub fn from_segment(start: Vec2, end: Vec2, width: f32) -> Self {
        let side = (end - start).normalized().perpendicular() * (width * 0.5);
        Self::new(vec![start + side, end + side, end - side, start - side])
    }

    /// Even-odd point containment test.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y > point.y) != (b.y > point.y)
                && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Edges of the polygon.
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| Segment::new(self.points[i], self.points[(i + 1) % n]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_distance() {
        let seg = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        assert_eq!(seg.distance_to(Vec2::new(5.0, 3.0)), 3.0);
        assert_eq!(seg.distance_to(Vec2::new(-4.0, 3.0)), 5.0);
    }

    #[test]
    fn test_rectangle_polygon_contains() {
        let poly = Polygon::from_segment(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 4.0);
        assert!(poly.contains(Vec2::new(5.0, 1.0)));
        assert!(!poly.contains(Vec2::new(5.0, 3.0)));
        assert_eq!(poly.edges().count(), 4);
    }

    #[test]
    fn test_circle_polygon() {
        let circle = Circle::new(Vec2::ZERO, 5.0);
        assert!(circle.contains(Vec2::new(3.0, 4.0)));
        let poly = circle.to_polygon(32);
        assert_eq!(poly.points.len(), 32);
        assert!(poly.contains(Vec2::new(1.0, 1.0)));
    }
}
