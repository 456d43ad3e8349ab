//! 2D point / vector value type in pixel space.
//!
//! Equality is tolerance based: repeated constraint propagation drifts by
//! tiny amounts, and the engine relies on `==` to detect that an update
//! reached a fixed point.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Per-axis relative tolerance used by `Point2d` equality.
pub const EPSILON: f64 = 0.001;

/// Floor for the relative-difference denominator. Near the origin the
/// comparison degrades to an absolute tolerance of `EPSILON` pixels.
pub const MAGNITUDE_FLOOR: f64 = 1.0;

/// Relative difference `|a - b| / max(|a|, |b|, MAGNITUDE_FLOOR)`.
pub fn rel_diff(a: f64, b: f64) -> f64 {
    (a - b).abs() / a.abs().max(b.abs()).max(MAGNITUDE_FLOOR)
}

/// Tolerant scalar comparison with the same rule as `Point2d` equality.
pub fn approx_eq(a: f64, b: f64) -> bool {
    rel_diff(a, b) < EPSILON
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

impl Point2d {
    pub const ZERO: Point2d = Point2d { x: 0.0, y: 0.0 };
    /// Imaginary unit. Complex-multiplying by it rotates a vector by 90°.
    pub const I: Point2d = Point2d { x: 0.0, y: 1.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Point2d) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product.
    pub fn cross(self, other: Point2d) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn distance_squared(self, other: Point2d) -> f64 {
        (self - other).length_squared()
    }

    pub fn distance(self, other: Point2d) -> f64 {
        self.distance_squared(other).sqrt()
    }

    pub fn conj(self) -> Point2d {
        Point2d::new(self.x, -self.y)
    }

    /// Counter-clockwise rotation by 90° (complex multiply by `i`).
    pub fn perp(self) -> Point2d {
        self * Point2d::I
    }

    /// Unit vector in the same direction, `None` for a (near) zero vector.
    pub fn normalized(self) -> Option<Point2d> {
        let len = self.length();
        if len < EPSILON {
            None
        } else {
            Some(self / len)
        }
    }

    pub fn midpoint(self, other: Point2d) -> Point2d {
        (self + other) / 2.0
    }

    pub fn is_zero(self) -> bool {
        self == Point2d::ZERO
    }

    /// Complex division, `None` when the divisor is the zero vector.
    pub fn checked_div(self, divisor: Point2d) -> Option<Point2d> {
        let denom = divisor.length_squared();
        if denom == 0.0 || !denom.is_finite() {
            return None;
        }
        Some(self * divisor.conj() / denom)
    }

    /// Component of `self` along `direction`.
    ///
    /// Dividing by `direction` expresses `self` in the frame of `direction`;
    /// the real part scaled back by `direction` is the projection.
    pub fn project_onto(self, direction: Point2d) -> Option<Point2d> {
        self.checked_div(direction).map(|local| direction * local.x)
    }
}

impl PartialEq for Point2d {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.y, other.y)
    }
}

impl fmt::Display for Point2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Point2d {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Point2d {
    type Output = Point2d;
    fn add(self, rhs: Point2d) -> Point2d {
        Point2d::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point2d {
    fn add_assign(&mut self, rhs: Point2d) {
        *self = *self + rhs;
    }
}

impl Sub for Point2d {
    type Output = Point2d;
    fn sub(self, rhs: Point2d) -> Point2d {
        Point2d::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point2d {
    fn sub_assign(&mut self, rhs: Point2d) {
        *self = *self - rhs;
    }
}

impl Neg for Point2d {
    type Output = Point2d;
    fn neg(self) -> Point2d {
        Point2d::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Point2d {
    type Output = Point2d;
    fn mul(self, rhs: f64) -> Point2d {
        Point2d::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point2d {
    type Output = Point2d;
    fn div(self, rhs: f64) -> Point2d {
        Point2d::new(self.x / rhs, self.y / rhs)
    }
}

/// Complex multiplication `(x1 + i·y1)(x2 + i·y2)`.
impl Mul for Point2d {
    type Output = Point2d;
    fn mul(self, rhs: Point2d) -> Point2d {
        Point2d::new(
            self.x * rhs.x - self.y * rhs.y,
            self.x * rhs.y + self.y * rhs.x,
        )
    }
}

/// Complex division.
///
/// Callers must pass a non-zero divisor; a zero divisor fails fast in debug
/// builds and yields `Point2d::ZERO` in release builds. Use
/// [`Point2d::checked_div`] when the divisor is not known to be non-zero.
impl Div for Point2d {
    type Output = Point2d;
    fn div(self, rhs: Point2d) -> Point2d {
        debug_assert!(
            rhs.length_squared() != 0.0,
            "complex division by the zero vector"
        );
        self.checked_div(rhs).unwrap_or(Point2d::ZERO)
    }
}

// ─── Geometry helpers ────────────────────────────────────────────────────

/// Squared distance from `p` to the segment `s1`–`s2`.
pub fn distance_to_segment_squared(s1: Point2d, s2: Point2d, p: Point2d) -> f64 {
    let span = s2 - s1;
    let len_sq = span.length_squared();
    if len_sq == 0.0 {
        return p.distance_squared(s1);
    }
    let t = ((p - s1).dot(span) / len_sq).clamp(0.0, 1.0);
    p.distance_squared(s1 + span * t)
}

/// Intersection points of two circles, `None` when they do not meet or are
/// concentric.
pub fn circle_intersections(
    c0: Point2d,
    r0: f64,
    c1: Point2d,
    r1: f64,
) -> Option<(Point2d, Point2d)> {
    let axis = c1 - c0;
    let d = axis.length();
    if d < EPSILON {
        return None;
    }
    // Tangent circles come out of the tolerance slightly apart; clamp them.
    let slack = EPSILON * d.max(1.0);
    if d > r0 + r1 + slack || d < (r0 - r1).abs() - slack {
        return None;
    }
    let a = (r0 * r0 - r1 * r1 + d * d) / (2.0 * d);
    let h = (r0 * r0 - a * a).max(0.0).sqrt();
    let base = c0 + axis * (a / d);
    let offset = axis.perp() * (h / d);
    Some((base + offset, base - offset))
}

/// Intersection of the lines `p + t·u` and `q + s·v`, `None` when parallel.
pub fn line_intersection(p: Point2d, u: Point2d, q: Point2d, v: Point2d) -> Option<Point2d> {
    let denom = u.cross(v);
    let scale = u.length() * v.length();
    if scale == 0.0 || denom.abs() < EPSILON * scale {
        return None;
    }
    let t = (q - p).cross(v) / denom;
    Some(p + u * t)
}

/// Pick whichever candidate lies closer to `target`; the first wins ties.
pub fn closest_to(target: Point2d, candidates: (Point2d, Point2d)) -> Point2d {
    let (a, b) = candidates;
    if b.distance_squared(target) < a.distance_squared(target) {
        b
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_absorbs_drift() {
        let a = Point2d::new(250.0, 100.0);
        assert_eq!(a, Point2d::new(250.0001, 99.99995));
        assert_ne!(a, Point2d::new(251.0, 100.0));
    }

    #[test]
    fn equality_near_origin_is_absolute() {
        assert_eq!(Point2d::ZERO, Point2d::new(1e-9, -1e-6));
        assert_ne!(Point2d::ZERO, Point2d::new(0.01, 0.0));
    }

    #[test]
    fn complex_multiply_by_i_rotates() {
        let v = Point2d::new(3.0, 4.0);
        assert_eq!(v * Point2d::I, Point2d::new(-4.0, 3.0));
        assert_eq!(v.perp().dot(v), 0.0);
    }

    #[test]
    fn complex_divide_inverts_multiply() {
        let a = Point2d::new(2.0, -1.0);
        let b = Point2d::new(0.5, 3.0);
        assert_eq!((a * b) / b, a);
        assert!(a.checked_div(Point2d::ZERO).is_none());
    }

    #[test]
    fn projection_onto_direction() {
        let v = Point2d::new(3.0, 4.0);
        let along = v.project_onto(Point2d::new(10.0, 0.0)).unwrap();
        assert_eq!(along, Point2d::new(3.0, 0.0));
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let s1 = Point2d::new(0.0, 0.0);
        let s2 = Point2d::new(10.0, 0.0);
        assert_eq!(distance_to_segment_squared(s1, s2, Point2d::new(5.0, 2.0)), 4.0);
        assert_eq!(distance_to_segment_squared(s1, s2, Point2d::new(13.0, 4.0)), 25.0);
        assert_eq!(distance_to_segment_squared(s1, s1, Point2d::new(3.0, 4.0)), 25.0);
    }

    #[test]
    fn circles_meet_at_two_points() {
        let (a, b) = circle_intersections(
            Point2d::new(0.0, 0.0),
            5.0,
            Point2d::new(8.0, 0.0),
            5.0,
        )
        .unwrap();
        assert_eq!(a, Point2d::new(4.0, 3.0));
        assert_eq!(b, Point2d::new(4.0, -3.0));
        assert_eq!(closest_to(Point2d::new(4.0, -1.0), (a, b)), b);
    }

    #[test]
    fn disjoint_circles_do_not_meet() {
        assert!(
            circle_intersections(Point2d::ZERO, 1.0, Point2d::new(10.0, 0.0), 1.0).is_none()
        );
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let u = Point2d::new(1.0, 1.0);
        assert!(line_intersection(Point2d::ZERO, u, Point2d::new(0.0, 5.0), u * 3.0).is_none());
        let hit = line_intersection(
            Point2d::ZERO,
            Point2d::new(1.0, 0.0),
            Point2d::new(4.0, -2.0),
            Point2d::new(0.0, 1.0),
        )
        .unwrap();
        assert_eq!(hit, Point2d::new(4.0, 0.0));
    }
}
