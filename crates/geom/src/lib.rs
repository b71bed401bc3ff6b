#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::many_single_char_names)]
#![no_std]

//! Simple 2D geometric primitives on top of euclid, and the curve samplers of the
//! aether tessellation engine.
//!
//! This crate is reexported in `aether_mesh`.
//!
//! # Overview.
//!
//! This crate implements:
//!
//! - point and vector aliases over euclid, shared by all aether crates,
//! - sampling of bézier curves of any degree ([`bezier`]),
//! - sampling of circular arcs ([`circle`]),
//! - polygon outlines for common shapes ([`shapes`]),
//! - a few signed area and orientation helpers ([`utils`]).
//!
//! # Sampling
//!
//! Curves are approximated with a fixed number of segments rather than a tolerance
//! threshold. The samplers push each point into a callback so that consecutive curve
//! pieces can be appended to the same point sequence. The `emit_first`/`emit_last`
//! flags of the options let chained pieces skip their shared endpoint.
//!
//! ```
//! use aether_geom::{point, Point};
//! use aether_geom::bezier::{sample_bezier, BezierOptions};
//! use aether_geom::circle::{sample_circle_segment, CircleSegmentOptions};
//!
//! let mut outline: Vec<Point<f32>> = Vec::new();
//!
//! sample_bezier(
//!     &[point(0.0, 0.0), point(5.0, 10.0), point(10.0, 0.0)],
//!     &BezierOptions::segments(8),
//!     &mut |p| outline.push(p),
//! ).unwrap();
//!
//! // The arc starts where the curve ended.
//! sample_circle_segment(
//!     point(10.0, 0.0),
//!     point(5.0, 0.0),
//!     std::f32::consts::PI,
//!     &CircleSegmentOptions::segments(8).without_first(),
//!     &mut |p| outline.push(p),
//! ).unwrap();
//!
//! assert_eq!(outline.len(), 9 + 8);
//! ```

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

// Reexport dependencies.
pub use arrayvec;
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod bezier;
pub mod circle;
mod error;
pub mod shapes;
pub mod utils;

#[doc(inline)]
pub use crate::bezier::{sample_bezier, BezierOptions};
#[doc(inline)]
pub use crate::circle::{sample_circle_segment, CircleSegmentOptions};
#[doc(inline)]
pub use crate::error::InvalidArgument;

pub use crate::scalar::Scalar;

mod scalar {
    pub(crate) use euclid::Trig;
    pub(crate) use num_traits::{Float, FloatConst, NumCast};

    use core::fmt::{Debug, Display};
    use core::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

    pub trait Scalar:
        Float
        + NumCast
        + FloatConst
        + Sized
        + Display
        + Debug
        + Trig
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
    {
        const HALF: Self;
        const ZERO: Self;
        const ONE: Self;

        const EPSILON: Self;

        fn from_u32(v: u32) -> Self;
    }

    impl Scalar for f32 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;

        const EPSILON: Self = 1e-4;

        #[inline]
        fn from_u32(v: u32) -> Self {
            v as f32
        }
    }

    impl Scalar for f64 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;

        const EPSILON: Self = 1e-8;

        #[inline]
        fn from_u32(v: u32) -> Self {
            v as f64
        }
    }
}

/// Alias for `euclid::default::Point2D`.
pub use euclid::default::Point2D as Point;

/// Alias for `euclid::default::Vector2D`.
pub use euclid::default::Vector2D as Vector;

/// Alias for `euclid::default::Box2D`
pub use euclid::default::Box2D;

/// Alias for `euclid::default::Rotation2D`
pub type Rotation<S> = euclid::default::Rotation2D<S>;

/// Shorthand for `Vector::new(x, y)`.
#[inline]
pub fn vector<S>(x: S, y: S) -> Vector<S> {
    Vector::new(x, y)
}

/// Shorthand for `Point::new(x, y)`.
#[inline]
pub fn point<S>(x: S, y: S) -> Point<S> {
    Point::new(x, y)
}

/// The direction in which a closed outline or an arc turns.
///
/// Counterclockwise is the direction of a polygon with a positive signed
/// area (see [`utils::polygon_signed_area`]) in a coordinate system where y
/// points up. With y pointing down, as is usual for screen coordinates, the
/// same polygons appear clockwise on screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Orientation {
    Clockwise,
    #[default]
    Counterclockwise,
}

impl Orientation {
    /// `1.0` for counterclockwise, `-1.0` for clockwise.
    #[inline]
    pub fn sign<S: Scalar>(self) -> S {
        match self {
            Orientation::Counterclockwise => S::ONE,
            Orientation::Clockwise => -S::ONE,
        }
    }

    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Orientation::Counterclockwise => Orientation::Clockwise,
            Orientation::Clockwise => Orientation::Counterclockwise,
        }
    }

    /// The orientation of a polygon with the provided signed area, or `None`
    /// if the area is zero or NaN.
    pub fn from_signed_area<S: Scalar>(area: S) -> Option<Self> {
        if area > S::ZERO {
            Some(Orientation::Counterclockwise)
        } else if area < S::ZERO {
            Some(Orientation::Clockwise)
        } else {
            None
        }
    }
}

#[test]
fn orientation_from_area() {
    assert_eq!(
        Orientation::from_signed_area(2.0f32),
        Some(Orientation::Counterclockwise)
    );
    assert_eq!(
        Orientation::from_signed_area(-0.5f64),
        Some(Orientation::Clockwise)
    );
    assert_eq!(Orientation::from_signed_area(0.0f32), None);
    assert_eq!(Orientation::from_signed_area(f32::NAN), None);
    assert_eq!(Orientation::Clockwise.sign::<f32>(), -1.0);
    assert_eq!(
        Orientation::Clockwise.opposite(),
        Orientation::Counterclockwise
    );
}
