//! Sampling of circular arcs.

use crate::scalar::Scalar;
use crate::utils::rotate;
use crate::{InvalidArgument, Orientation, Point};

/// Parameters for [`sample_circle_segment`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct CircleSegmentOptions {
    /// Direction of the sweep. A clockwise sweep negates the angle.
    ///
    /// Default value: `Orientation::Counterclockwise`.
    pub orientation: Orientation,

    /// Number of line segments approximating the arc.
    ///
    /// Must be at least one.
    /// Default value: `CircleSegmentOptions::DEFAULT_NUM_SEGMENTS`.
    pub num_segments: u32,

    /// Whether to emit the start of the arc.
    ///
    /// Default value: `true`.
    pub emit_first: bool,

    /// Whether to emit the end of the arc.
    ///
    /// Default value: `true`.
    pub emit_last: bool,
}

impl CircleSegmentOptions {
    pub const DEFAULT_NUM_SEGMENTS: u32 = 20;

    pub const DEFAULT: Self = CircleSegmentOptions {
        orientation: Orientation::Counterclockwise,
        num_segments: Self::DEFAULT_NUM_SEGMENTS,
        emit_first: true,
        emit_last: true,
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

    #[inline]
    pub const fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[inline]
    pub const fn clockwise(self) -> Self {
        self.with_orientation(Orientation::Clockwise)
    }

    #[inline]
    pub const fn without_first(mut self) -> Self {
        self.emit_first = false;
        self
    }

    #[inline]
    pub const fn without_last(mut self) -> Self {
        self.emit_last = false;
        self
    }
}

impl Default for CircleSegmentOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Samples the arc of the circle centered at `origin` that starts at `begin` and sweeps
/// `total_angle` radians.
///
/// Sample `i` is `begin` rotated around `origin` by `total_angle * i / num_segments`,
/// negated for clockwise sweeps. A zero angle is valid and emits `begin` repeatedly.
pub fn sample_circle_segment<S: Scalar>(
    begin: Point<S>,
    origin: Point<S>,
    total_angle: S,
    options: &CircleSegmentOptions,
    output: &mut dyn FnMut(Point<S>),
) -> Result<(), InvalidArgument> {
    if options.num_segments == 0 {
        return Err(InvalidArgument::ZeroSegments);
    }

    let num_segments = options.num_segments;
    let first = if options.emit_first { 0 } else { 1 };
    let last = num_segments - if options.emit_last { 0 } else { 1 };
    let step = options.orientation.sign::<S>() * total_angle / S::from_u32(num_segments);
    let v = begin - origin;

    for i in first..=last {
        if i == 0 {
            output(begin);
            continue;
        }
        output(origin + rotate(v, step * S::from_u32(i)));
    }

    Ok(())
}

#[cfg(test)]
use crate::point;
#[cfg(test)]
use alloc::vec::Vec;
#[cfg(test)]
use core::f32::consts::PI;

#[cfg(test)]
fn samples(
    begin: Point<f32>,
    origin: Point<f32>,
    angle: f32,
    options: &CircleSegmentOptions,
) -> Vec<Point<f32>> {
    let mut points = Vec::new();
    sample_circle_segment(begin, origin, angle, options, &mut |p| points.push(p)).unwrap();
    points
}

#[cfg(test)]
fn assert_almost_eq(a: Point<f32>, b: Point<f32>) {
    if (a - b).square_length() > 0.00001 {
        panic!("assert almost equal: {:?} != {:?}", a, b);
    }
}

#[test]
fn zero_sweep() {
    let begin = point(3.0, 1.0);
    let points = samples(begin, point(1.0, 1.0), 0.0, &CircleSegmentOptions::segments(5));
    assert_eq!(points.len(), 6);
    for p in points {
        assert_almost_eq(p, begin);
    }
}

#[test]
fn full_turn() {
    let begin = point(2.0, 0.0);
    let origin = point(0.0, 0.0);
    for options in [
        CircleSegmentOptions::DEFAULT,
        CircleSegmentOptions::segments(7).clockwise(),
    ] {
        let points = samples(begin, origin, 2.0 * PI, &options);
        assert_eq!(points.len() as u32, options.num_segments + 1);
        assert_almost_eq(points[0], begin);
        assert_almost_eq(*points.last().unwrap(), begin);
        for p in &points {
            assert!(((*p - origin).length() - 2.0).abs() < 1e-4);
        }
    }
}

#[test]
fn quarter_turn_orientation() {
    let begin = point(1.0, 0.0);
    let origin = point(0.0, 0.0);

    let ccw = samples(begin, origin, PI / 2.0, &CircleSegmentOptions::segments(2));
    assert_almost_eq(ccw[1], point(0.5f32.sqrt(), 0.5f32.sqrt()));
    assert_almost_eq(ccw[2], point(0.0, 1.0));

    let cw = samples(
        begin,
        origin,
        PI / 2.0,
        &CircleSegmentOptions::segments(2).clockwise(),
    );
    assert_almost_eq(cw[2], point(0.0, -1.0));
}

#[test]
fn suppressed_endpoints() {
    let begin = point(1.0, 0.0);
    let origin = point(0.0, 0.0);
    let options = CircleSegmentOptions::segments(4);

    let full = samples(begin, origin, PI, &options);
    let inner = samples(begin, origin, PI, &options.without_first().without_last());
    assert_eq!(full.len(), 5);
    assert_eq!(inner.len(), 3);
    assert_eq!(&inner[..], &full[1..4]);
}

#[test]
fn zero_segments() {
    let mut called = false;
    let result = sample_circle_segment(
        point(1.0f32, 0.0),
        point(0.0, 0.0),
        PI,
        &CircleSegmentOptions::segments(0),
        &mut |_| called = true,
    );
    assert_eq!(result, Err(InvalidArgument::ZeroSegments));
    assert!(!called);
}
