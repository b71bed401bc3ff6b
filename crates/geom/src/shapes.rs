//! Outlines of common shapes, ready to be handed to the polygon tessellators.

use crate::circle::{sample_circle_segment, CircleSegmentOptions};
use crate::scalar::Scalar;
use crate::{point, vector, Box2D, InvalidArgument, Point, Vector};

/// Emits the outline of a rectangle with rounded corners, counterclockwise (y up).
///
/// Each corner is a quarter circle of `radius` approximated with `segments_per_corner`
/// segments. The radius is clamped to half of the smallest side, and a radius of zero
/// produces the four corners of the rectangle. Consecutive duplicate points are skipped,
/// as is the point closing the outline, so the output is a simple polygon.
pub fn rounded_rectangle<S: Scalar>(
    rect: &Box2D<S>,
    radius: S,
    segments_per_corner: u32,
    output: &mut dyn FnMut(Point<S>),
) -> Result<(), InvalidArgument> {
    if rect.min.x.is_nan() || rect.min.y.is_nan() || rect.max.x.is_nan() || rect.max.y.is_nan()
    {
        return Err(InvalidArgument::PositionIsNaN);
    }

    let w = (rect.max.x - rect.min.x).max(S::ZERO);
    let h = (rect.max.y - rect.min.y).max(S::ZERO);
    let r = if radius.is_nan() {
        S::ZERO
    } else {
        radius.min(w.min(h) * S::HALF).max(S::ZERO)
    };

    if r > S::ZERO && segments_per_corner == 0 {
        return Err(InvalidArgument::ZeroSegments);
    }

    let (x0, y0, x1, y1) = (rect.min.x, rect.min.y, rect.min.x + w, rect.min.y + h);

    // Corner centers with the offset to where each arc starts, in counterclockwise order.
    let corners: [(Point<S>, Vector<S>); 4] = [
        (point(x1 - r, y0 + r), vector(S::ZERO, -r)),
        (point(x1 - r, y1 - r), vector(r, S::ZERO)),
        (point(x0 + r, y1 - r), vector(S::ZERO, r)),
        (point(x0 + r, y0 + r), vector(-r, S::ZERO)),
    ];

    let mut dedup = Dedup::new(output);

    if r <= S::ZERO {
        for (corner, _) in &corners {
            dedup.push(*corner);
        }
        dedup.finish();
        return Ok(());
    }

    let arc = CircleSegmentOptions::segments(segments_per_corner)
        .without_first()
        .without_last();

    for (center, start) in &corners {
        let end = vector(-start.y, start.x);
        dedup.push(*center + *start);
        sample_circle_segment(
            *center + *start,
            *center,
            S::FRAC_PI_2(),
            &arc,
            &mut |p| dedup.push(p),
        )?;
        dedup.push(*center + end);
    }

    dedup.finish();

    Ok(())
}

/// Holds back one point so that a point equal to its predecessor, or a last point equal
/// to the first one, can be dropped.
struct Dedup<'l, S> {
    output: &'l mut dyn FnMut(Point<S>),
    first: Option<Point<S>>,
    pending: Option<Point<S>>,
    emitted: u32,
}

impl<'l, S: Scalar> Dedup<'l, S> {
    fn new(output: &'l mut dyn FnMut(Point<S>)) -> Self {
        Dedup {
            output,
            first: None,
            pending: None,
            emitted: 0,
        }
    }

    fn push(&mut self, p: Point<S>) {
        if let Some(pending) = self.pending {
            if almost_equal(pending, p) {
                return;
            }
            (self.output)(pending);
            self.emitted += 1;
        } else {
            self.first = Some(p);
        }
        self.pending = Some(p);
    }

    fn finish(&mut self) {
        if let Some(pending) = self.pending.take() {
            let closes = match self.first {
                Some(first) => self.emitted > 0 && almost_equal(first, pending),
                None => false,
            };
            if !closes {
                (self.output)(pending);
            }
        }
    }
}

fn almost_equal<S: Scalar>(a: Point<S>, b: Point<S>) -> bool {
    (a - b).square_length() <= S::EPSILON * S::EPSILON
}

#[cfg(test)]
use crate::utils::polygon_signed_area;
#[cfg(test)]
use alloc::vec::Vec;

#[cfg(test)]
fn outline(rect: Box2D<f32>, radius: f32, segments: u32) -> Vec<Point<f32>> {
    let mut points = Vec::new();
    rounded_rectangle(&rect, radius, segments, &mut |p| points.push(p)).unwrap();
    points
}

#[test]
fn sharp_corners() {
    let rect = Box2D::new(point(0.0, 0.0), point(4.0, 2.0));
    let points = outline(rect, 0.0, 8);
    assert_eq!(
        points,
        [
            point(4.0, 0.0),
            point(4.0, 2.0),
            point(0.0, 2.0),
            point(0.0, 0.0),
        ]
    );
    assert_eq!(polygon_signed_area(&points), 8.0);
}

#[test]
fn rounded_corners() {
    let rect = Box2D::new(point(0.0, 0.0), point(10.0, 6.0));
    let points = outline(rect, 1.0, 4);

    // Each corner has 5 points and no two corners share one.
    assert_eq!(points.len(), 20);
    assert_eq!(points[0], point(9.0, 0.0));

    // The rounded rectangle loses the area between each corner and its arc.
    let expected = 60.0 - (4.0 - core::f32::consts::PI);
    let area = polygon_signed_area(&points);
    assert!(area > 0.0);
    assert!((area - expected).abs() < 0.1, "{}", area);

    for p in &points {
        assert!(p.x >= -1e-4 && p.x <= 10.0 + 1e-4);
        assert!(p.y >= -1e-4 && p.y <= 6.0 + 1e-4);
    }
}

#[test]
fn clamped_radius() {
    // A radius of half the height makes the short sides vanish: the arcs of two
    // adjacent corners meet and their shared point is emitted once.
    let rect = Box2D::new(point(0.0, 0.0), point(10.0, 4.0));
    let points = outline(rect, 100.0, 2);
    assert_eq!(points.len(), 10);

    for i in 0..points.len() {
        let next = points[(i + 1) % points.len()];
        assert!((next - points[i]).length() > 1e-3);
    }
}

#[test]
fn circle_from_square() {
    // All sides vanish when the radius is half of a square's side.
    let rect = Box2D::new(point(-1.0, -1.0), point(1.0, 1.0));
    let points = outline(rect, 1.0, 4);
    assert_eq!(points.len(), 16);
    for p in &points {
        assert!((p.to_vector().length() - 1.0).abs() < 1e-4);
    }
}

#[test]
fn invalid_rectangles() {
    let mut count = 0;
    let nan = Box2D::new(point(f32::NAN, 0.0), point(1.0, 1.0));
    assert_eq!(
        rounded_rectangle(&nan, 0.5, 4, &mut |_| count += 1),
        Err(InvalidArgument::PositionIsNaN)
    );
    let rect = Box2D::new(point(0.0f32, 0.0), point(1.0, 1.0));
    assert_eq!(
        rounded_rectangle(&rect, 0.5, 0, &mut |_| count += 1),
        Err(InvalidArgument::ZeroSegments)
    );
    assert_eq!(count, 0);
}
