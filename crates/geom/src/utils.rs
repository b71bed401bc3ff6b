//! Signed areas, normals and other small helpers shared by the samplers and the tessellators.

use crate::scalar::Scalar;
use crate::{vector, Point, Vector};

/// Twice the signed area of the triangle `(a, b, c)`.
///
/// Positive when `a`, `b`, `c` turn counterclockwise (y up), negative when they turn
/// clockwise and zero when they are collinear.
#[inline]
pub fn signed_area<S: Scalar>(a: Point<S>, b: Point<S>, c: Point<S>) -> S {
    (b - a).cross(c - a)
}

/// Signed area of a closed polygon using the shoelace formula.
///
/// The last point connects back to the first one.
pub fn polygon_signed_area<S: Scalar>(points: &[Point<S>]) -> S {
    if points.len() < 3 {
        return S::ZERO;
    }

    let first = points[0];
    let mut double_area = S::ZERO;
    let mut v0 = points[1] - first;
    for p in &points[2..] {
        let v1 = *p - first;
        double_area += v0.cross(v1);
        v0 = v1;
    }

    double_area * S::HALF
}

/// Returns true if `p` is strictly inside the triangle `(a, b, c)`, regardless of the
/// triangle's winding.
///
/// Points on the edges or on the vertices of the triangle are not considered inside.
pub fn is_point_in_triangle<S: Scalar>(p: Point<S>, a: Point<S>, b: Point<S>, c: Point<S>) -> bool {
    let area1 = signed_area(p, a, b);
    let area2 = signed_area(p, b, c);
    let area3 = signed_area(p, c, a);

    (area1 > S::ZERO && area2 > S::ZERO && area3 > S::ZERO)
        || (area1 < S::ZERO && area2 < S::ZERO && area3 < S::ZERO)
}

/// Returns true if `p` is inside the triangle `(a, b, c)` or on its boundary, regardless
/// of the triangle's winding.
///
/// The triangle must not be degenerate.
pub fn is_point_in_closed_triangle<S: Scalar>(
    p: Point<S>,
    a: Point<S>,
    b: Point<S>,
    c: Point<S>,
) -> bool {
    let area1 = signed_area(p, a, b);
    let area2 = signed_area(p, b, c);
    let area3 = signed_area(p, c, a);

    (area1 >= S::ZERO && area2 >= S::ZERO && area3 >= S::ZERO)
        || (area1 <= S::ZERO && area2 <= S::ZERO && area3 <= S::ZERO)
}

/// The normal of a tangent, rotated a quarter turn clockwise: `(t.y, -t.x)`.
#[inline]
pub fn normal<S: Scalar>(tangent: Vector<S>) -> Vector<S> {
    vector(tangent.y, -tangent.x)
}

/// Rotates a vector by `angle` radians, counterclockwise for positive angles.
#[inline]
pub fn rotate<S: Scalar>(v: Vector<S>, angle: S) -> Vector<S> {
    crate::Rotation::radians(angle).transform_vector(v)
}

/// Orders points by increasing y, then by increasing x.
#[inline]
pub fn is_before<S: Scalar>(a: Point<S>, b: Point<S>) -> bool {
    a.y < b.y || (a.y == b.y && a.x < b.x)
}

/// Returns true if the closed polygon is monotone with respect to the y axis.
///
/// A polygon is y-monotone when walking along its boundary, y (with ties broken by x)
/// reaches exactly one local minimum and one local maximum.
pub fn is_y_monotone<S: Scalar>(points: &[Point<S>]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }

    let mut local_minima = 0;
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let curr = points[i];
        let next = points[(i + 1) % n];
        if is_before(curr, prev) && is_before(curr, next) {
            local_minima += 1;
        }
    }

    local_minima == 1
}

#[cfg(test)]
use crate::point;

#[test]
fn signed_area_sign() {
    let a = point(0.0f32, 0.0);
    let b = point(1.0, 0.0);
    let c = point(0.0, 1.0);
    assert_eq!(signed_area(a, b, c), 1.0);
    assert_eq!(signed_area(a, c, b), -1.0);
    assert_eq!(signed_area(a, b, point(2.0, 0.0)), 0.0);
}

#[test]
fn shoelace() {
    let square = [
        point(0.0f32, 0.0),
        point(2.0, 0.0),
        point(2.0, 2.0),
        point(0.0, 2.0),
    ];
    assert_eq!(polygon_signed_area(&square), 4.0);

    let mut reversed = square;
    reversed.reverse();
    assert_eq!(polygon_signed_area(&reversed), -4.0);

    assert_eq!(polygon_signed_area(&square[..2]), 0.0);
}

#[test]
fn point_in_triangle() {
    let a = point(0.0f32, 0.0);
    let b = point(4.0, 0.0);
    let c = point(0.0, 4.0);

    assert!(is_point_in_triangle(point(1.0, 1.0), a, b, c));
    assert!(is_point_in_triangle(point(1.0, 1.0), a, c, b));
    assert!(!is_point_in_triangle(point(3.0, 3.0), a, b, c));
    // On an edge.
    assert!(!is_point_in_triangle(point(2.0, 0.0), a, b, c));
    // On a vertex.
    assert!(!is_point_in_triangle(a, a, b, c));
}

#[test]
fn point_in_closed_triangle() {
    let a = point(0.0f32, 0.0);
    let b = point(4.0, 0.0);
    let c = point(0.0, 4.0);

    assert!(is_point_in_closed_triangle(point(1.0, 1.0), a, b, c));
    assert!(is_point_in_closed_triangle(point(1.0, 1.0), c, b, a));
    assert!(is_point_in_closed_triangle(point(2.0, 2.0), a, b, c));
    assert!(is_point_in_closed_triangle(point(2.0, 0.0), a, c, b));
    assert!(is_point_in_closed_triangle(c, a, b, c));
    assert!(!is_point_in_closed_triangle(point(3.0, 3.0), a, b, c));
    // On the line through an edge, outside of the triangle.
    assert!(!is_point_in_closed_triangle(point(5.0, 0.0), a, b, c));
}

#[test]
fn normal_and_rotation() {
    assert_eq!(normal(vector(1.0f32, 0.0)), vector(0.0, -1.0));

    let v = rotate(vector(1.0f32, 0.0), core::f32::consts::FRAC_PI_2);
    assert!((v - vector(0.0, 1.0)).length() < 1e-6);
}

#[test]
fn y_monotone() {
    let square = [
        point(0.0f32, 0.0),
        point(1.0, 0.0),
        point(1.0, 1.0),
        point(0.0, 1.0),
    ];
    assert!(is_y_monotone(&square));

    // A "W" shape has two local minima along y.
    let w = [
        point(0.0f32, 0.0),
        point(1.0, 2.0),
        point(2.0, 0.0),
        point(2.0, 3.0),
        point(0.0, 3.0),
    ];
    assert!(!is_y_monotone(&w));

    assert!(!is_y_monotone(&square[..2]));
}
