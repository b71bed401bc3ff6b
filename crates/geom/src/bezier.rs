//! Sampling of bézier curves of arbitrary degree.
//!
//! A curve is described by its control polygon: `N` control points define a curve of
//! degree `N - 1` (four points for the cubic curves used to draw connectors). Points are
//! evaluated with de Casteljau's algorithm, which repeatedly interpolates adjacent control
//! points until a single point remains.

use crate::scalar::Scalar;
use crate::{InvalidArgument, Point};

use alloc::vec::Vec;
use arrayvec::ArrayVec;

/// Number of control points that are evaluated with stack scratch space.
///
/// Longer control polygons are supported but need a heap allocation per call.
pub const INLINE_CONTROL_POINTS: usize = 16;

/// Parameters for [`sample_bezier`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct BezierOptions {
    /// Number of line segments approximating the curve.
    ///
    /// Must be at least one.
    /// Default value: `BezierOptions::DEFAULT_NUM_SEGMENTS`.
    pub num_segments: u32,

    /// Whether to emit the point at `t = 0`.
    ///
    /// Default value: `true`.
    pub emit_first_point: bool,

    /// Whether to emit the point at `t = 1`.
    ///
    /// Default value: `true`.
    pub emit_last_point: bool,
}

impl BezierOptions {
    pub const DEFAULT_NUM_SEGMENTS: u32 = 30;

    pub const DEFAULT: Self = BezierOptions {
        num_segments: Self::DEFAULT_NUM_SEGMENTS,
        emit_first_point: true,
        emit_last_point: true,
    };

    #[inline]
    pub const fn segments(num_segments: u32) -> Self {
        Self::DEFAULT.with_num_segments(num_segments)
    }

    #[inline]
    pub const fn with_num_segments(mut self, num_segments: u32) -> Self {
        self.num_segments = num_segments;
        self
    }

    /// Skip the first point, typically because it was emitted by the previous piece of
    /// the outline.
    #[inline]
    pub const fn without_first(mut self) -> Self {
        self.emit_first_point = false;
        self
    }

    /// Skip the last point, typically because the next piece of the outline emits it.
    #[inline]
    pub const fn without_last(mut self) -> Self {
        self.emit_last_point = false;
        self
    }

    /// Number of points a call to [`sample_bezier`] emits with these options.
    pub fn num_samples(&self) -> u32 {
        let first = if self.emit_first_point { 0 } else { 1 };
        let last = self
            .num_segments
            .saturating_sub(if self.emit_last_point { 0 } else { 1 });
        (last + 1).saturating_sub(first)
    }
}

impl Default for BezierOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Samples the bézier curve defined by `control_points` at `num_segments + 1` evenly
/// spaced values of `t`, in increasing order, minus the endpoints that the options
/// suppress.
///
/// The first emitted point is the first control point when `emit_first_point` is set,
/// the last emitted point is the last control point when `emit_last_point` is set.
///
/// Nothing is emitted if the control polygon is empty or if `num_segments` is zero.
pub fn sample_bezier<S: Scalar>(
    control_points: &[Point<S>],
    options: &BezierOptions,
    output: &mut dyn FnMut(Point<S>),
) -> Result<(), InvalidArgument> {
    if control_points.is_empty() {
        return Err(InvalidArgument::EmptyControlPolygon);
    }
    if options.num_segments == 0 {
        return Err(InvalidArgument::ZeroSegments);
    }

    if control_points.len() <= INLINE_CONTROL_POINTS {
        let mut scratch: ArrayVec<Point<S>, INLINE_CONTROL_POINTS> = ArrayVec::new();
        scratch.extend(control_points.iter().copied());
        sample_with_scratch(control_points, &mut scratch, options, output);
    } else {
        let mut scratch: Vec<Point<S>> = control_points.to_vec();
        sample_with_scratch(control_points, &mut scratch, options, output);
    }

    Ok(())
}

/// Samples a cubic bézier curve.
///
/// Equivalent to calling [`sample_bezier`] with `[from, ctrl1, ctrl2, to]`.
pub fn sample_cubic_bezier<S: Scalar>(
    from: Point<S>,
    ctrl1: Point<S>,
    ctrl2: Point<S>,
    to: Point<S>,
    options: &BezierOptions,
    output: &mut dyn FnMut(Point<S>),
) -> Result<(), InvalidArgument> {
    sample_bezier(&[from, ctrl1, ctrl2, to], options, output)
}

/// Evaluates the bézier curve defined by `control_points` at `t`.
///
/// Returns `None` if the control polygon is empty.
pub fn evaluate_bezier<S: Scalar>(control_points: &[Point<S>], t: S) -> Option<Point<S>> {
    if control_points.is_empty() {
        return None;
    }

    if control_points.len() <= INLINE_CONTROL_POINTS {
        let mut scratch: ArrayVec<Point<S>, INLINE_CONTROL_POINTS> = ArrayVec::new();
        scratch.extend(control_points.iter().copied());
        Some(de_casteljau(&mut scratch, t))
    } else {
        let mut scratch: Vec<Point<S>> = control_points.to_vec();
        Some(de_casteljau(&mut scratch, t))
    }
}

fn sample_with_scratch<S: Scalar>(
    control_points: &[Point<S>],
    scratch: &mut [Point<S>],
    options: &BezierOptions,
    output: &mut dyn FnMut(Point<S>),
) {
    let num_segments = options.num_segments;
    let first = if options.emit_first_point { 0 } else { 1 };
    let last = num_segments - if options.emit_last_point { 0 } else { 1 };
    let inv_segments = S::ONE / S::from_u32(num_segments);

    for s in first..=last {
        let t = if s == num_segments {
            S::ONE
        } else {
            S::from_u32(s) * inv_segments
        };
        scratch.copy_from_slice(control_points);
        output(de_casteljau(scratch, t));
    }
}

/// Reduces the control points in place and returns the point of the curve at `t`.
fn de_casteljau<S: Scalar>(points: &mut [Point<S>], t: S) -> Point<S> {
    let count = points.len();
    for j in 1..count {
        for i in 0..(count - j) {
            points[i] = points[i].lerp(points[i + 1], t);
        }
    }

    points[0]
}

#[cfg(test)]
use crate::point;
#[cfg(test)]
use alloc::vec;

#[cfg(test)]
fn samples(control_points: &[Point<f32>], options: &BezierOptions) -> Vec<Point<f32>> {
    let mut points = Vec::new();
    sample_bezier(control_points, options, &mut |p| points.push(p)).unwrap();
    points
}

#[cfg(test)]
fn assert_almost_eq(a: Point<f32>, b: Point<f32>) {
    if (a - b).square_length() > 0.00001 {
        panic!("assert almost equal: {:?} != {:?}", a, b);
    }
}

#[test]
fn endpoints_are_control_points() {
    let ctrl = [
        point(0.0, 0.0),
        point(1.0, 3.0),
        point(4.0, 3.0),
        point(5.0, 0.0),
    ];

    let points = samples(&ctrl, &BezierOptions::segments(10));
    assert_eq!(points.len(), 11);
    assert_eq!(points[0], ctrl[0]);
    assert_eq!(points[10], ctrl[3]);
}

#[test]
fn suppressed_endpoints() {
    let ctrl = [point(0.0, 0.0), point(1.0, 1.0), point(2.0, 0.0)];

    let full = samples(&ctrl, &BezierOptions::segments(4));
    let no_first = samples(&ctrl, &BezierOptions::segments(4).without_first());
    let no_last = samples(&ctrl, &BezierOptions::segments(4).without_last());
    let neither = samples(
        &ctrl,
        &BezierOptions::segments(4).without_first().without_last(),
    );

    assert_eq!(full.len(), 5);
    assert_eq!(no_first.len(), 4);
    assert_eq!(no_last.len(), 4);
    assert_eq!(neither.len(), 3);

    assert_eq!(&no_first[..], &full[1..]);
    assert_eq!(&no_last[..], &full[..4]);
    assert_eq!(&neither[..], &full[1..4]);

    assert_eq!(BezierOptions::segments(4).num_samples(), 5);
    assert_eq!(
        BezierOptions::segments(4)
            .without_first()
            .without_last()
            .num_samples(),
        3
    );
    assert_eq!(
        BezierOptions::segments(1)
            .without_first()
            .without_last()
            .num_samples(),
        0
    );
}

#[test]
fn quadratic_midpoint() {
    // B(0.5) = 0.25 * p0 + 0.5 * p1 + 0.25 * p2
    let ctrl = [point(0.0, 0.0), point(2.0, 4.0), point(4.0, 0.0)];
    let points = samples(&ctrl, &BezierOptions::segments(2));
    assert_almost_eq(points[1], point(2.0, 2.0));
}

#[test]
fn samples_increase_along_t() {
    // A curve that is monotonic in x, so increasing t means increasing x.
    let ctrl = [
        point(0.0, 0.0),
        point(1.0, 5.0),
        point(2.0, -5.0),
        point(3.0, 0.0),
    ];
    let points = samples(&ctrl, &BezierOptions::DEFAULT);
    assert_eq!(points.len(), 31);
    for pair in points.windows(2) {
        assert!(pair[1].x > pair[0].x);
    }
}

#[test]
fn single_control_point() {
    let points = samples(&[point(3.0, 4.0)], &BezierOptions::segments(3));
    assert_eq!(points, vec![point(3.0, 4.0); 4]);
}

#[test]
fn linear_curve() {
    let ctrl = [point(0.0, 0.0), point(10.0, 0.0)];
    let points = samples(&ctrl, &BezierOptions::segments(5));
    for (i, p) in points.iter().enumerate() {
        assert_almost_eq(*p, point(2.0 * i as f32, 0.0));
    }
}

#[test]
fn long_control_polygon() {
    let ctrl: Vec<Point<f32>> = (0..(INLINE_CONTROL_POINTS + 4))
        .map(|i| point(i as f32, 0.0))
        .collect();
    let points = samples(&ctrl, &BezierOptions::segments(8));
    assert_eq!(points.len(), 9);
    assert_eq!(points[0], ctrl[0]);
    assert_eq!(points[8], *ctrl.last().unwrap());

    // Evenly spaced collinear control points give a uniform parametrization.
    let mid = evaluate_bezier(&ctrl, 0.5).unwrap();
    assert_almost_eq(mid, point((ctrl.len() - 1) as f32 * 0.5, 0.0));
}

#[test]
fn invalid_arguments() {
    let mut count = 0;
    assert_eq!(
        sample_bezier::<f32>(&[], &BezierOptions::DEFAULT, &mut |_| count += 1),
        Err(InvalidArgument::EmptyControlPolygon)
    );
    assert_eq!(
        sample_bezier(
            &[point(0.0f32, 0.0), point(1.0, 1.0)],
            &BezierOptions::segments(0),
            &mut |_| count += 1
        ),
        Err(InvalidArgument::ZeroSegments)
    );
    assert_eq!(count, 0);
    assert_eq!(evaluate_bezier::<f32>(&[], 0.5), None);
}

#[test]
fn cubic_shorthand() {
    let mut a = Vec::new();
    let mut b = Vec::new();
    let (p0, p1, p2, p3) = (
        point(0.0f32, 0.0),
        point(0.0, 1.0),
        point(1.0, 1.0),
        point(1.0, 0.0),
    );
    sample_cubic_bezier(p0, p1, p2, p3, &BezierOptions::segments(6), &mut |p| {
        a.push(p)
    })
    .unwrap();
    sample_bezier(&[p0, p1, p2, p3], &BezierOptions::segments(6), &mut |p| {
        b.push(p)
    })
    .unwrap();
    assert_eq!(a, b);
}
