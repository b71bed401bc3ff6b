#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]
#![no_std]

//! Tessellation of 2D line strokes and polygon fills.
//!
//! This crate is reexported in `aether_mesh`.
//!
//! ## Overview
//!
//! The most interesting items of this crate are:
//!
//! * [`build_line_mesh`] - Builds the mesh of a polyline of constant width with miter joins
//!   and optional round caps.
//! * [`triangulate_polygon`] - Triangulates a simple polygon, by ear clipping or with a single
//!   sweep if the polygon is known to be y-monotone.
//! * [`fill_polygon`] - Same as above, also emitting the polygon's vertices.
//! * [`DrawList`] - Accumulates lines and polygons into shared buffers and records a draw call
//!   for each of them.
//! * The [geometry_builder module](geometry_builder/index.html) which the above are built on.
//!   Its traits receive the generated vertices and triangles, usually to assemble them into
//!   application-specific vertex and index buffers.
//!
//! ## The input: point slices
//!
//! The tessellators consume plain slices of points. Curves are sampled beforehand into
//! point sequences with the samplers of [`geom`] (bézier curves and circular arcs), which
//! emit their points through a callback so that several pieces can be appended to the same
//! `Vec`.
//!
//! ## The output: sinks
//!
//! The tessellators are not tied to a vertex layout or an index type. They emit vertices
//! into a [`VertexSink`](geometry_builder::VertexSink) and triangles into an
//! [`IndexSink`](geometry_builder::IndexSink). Closures implement both traits. The structs
//! [`VertexBuffers`](geometry_builder::VertexBuffers) and
//! [`BuffersBuilder`](geometry_builder::BuffersBuilder) are provided to write into a pair of
//! vertex and index vectors, with a [`VertexConstructor`](geometry_builder::VertexConstructor)
//! producing the application's vertex type.
//!
//! ### Rendering the tessellated geometry
//!
//! The tessellators produce geometry in the form of vertex and index buffers which are expected
//! to be rendered using the equivalent of OpenGL's `glDrawElements` with mode `GL_TRIANGLES`
//! available under various names in the different graphics APIs.
//!
//! ## Examples
//!
//! - [Stroking a line](fn.build_line_mesh.html#examples).
//! - [Triangulating a polygon](fn.triangulate_polygon.html#examples).
//! - [Generating custom vertices](geometry_builder/index.html#generating-custom-vertices).
//! - [Generating completely custom output](geometry_builder/index.html#generating-a-completely-custom-output).
//! - [Batching draw calls](struct.DrawList.html#examples).

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub use aether_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

mod draw_list;
mod error;
pub mod geometry_builder;
mod monotone;
mod stroke;
mod triangulation;

#[cfg(test)]
mod triangulation_tests;

/// `f32` versions of the geometric types, used by all of the tessellators.
pub mod math {
    pub use crate::geom::Orientation;

    /// Alias for `euclid::default::Point2D<f32>`.
    pub type Point = crate::geom::Point<f32>;

    /// Alias for `euclid::default::Vector2D<f32>`.
    pub type Vector = crate::geom::Vector<f32>;

    /// Alias for `euclid::default::Box2D<f32>`.
    pub type Box2D = crate::geom::Box2D<f32>;

    /// Shorthand for `Point::new(x, y)`.
    #[inline]
    pub fn point(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    /// Shorthand for `Vector::new(x, y)`.
    #[inline]
    pub fn vector(x: f32, y: f32) -> Vector {
        Vector::new(x, y)
    }
}

#[doc(inline)]
pub use crate::stroke::*;

#[doc(inline)]
pub use crate::triangulation::*;

#[doc(inline)]
pub use crate::draw_list::{DrawCall, DrawList};

#[doc(inline)]
pub use crate::geometry_builder::{
    BuffersBuilder, GeometryBuilderError, IndexSink, MeshSink, MeshVertex, VertexBuffers,
    VertexConstructor, VertexSink,
};

#[doc(inline)]
pub use crate::error::*;

pub use crate::geom::Orientation;

use core::ops::{Add, Sub};

/// The shape at the unconnected ends of an open line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineCap {
    /// The line stops at the endpoint.
    #[default]
    None,
    /// A half disc around the endpoint, approximated with a fan of `num_segments` triangles.
    Circle { num_segments: u32 },
}

impl LineCap {
    pub const DEFAULT_CIRCLE_SEGMENTS: u32 = 20;

    #[inline]
    pub const fn circle(num_segments: u32) -> Self {
        LineCap::Circle { num_segments }
    }
}

/// Parameters for [`build_line_mesh`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct LineMeshOptions {
    /// Total width of the line, half of it on each side of the points.
    ///
    /// Must be a non-negative number.
    /// Default value: `LineMeshOptions::DEFAULT_LINE_WIDTH`.
    pub line_width: f32,

    /// Whether the last point connects back to the first one.
    ///
    /// Closed lines have no caps.
    /// Default value: `false`.
    pub closed: bool,

    /// What cap to use at the first point of an open line.
    ///
    /// Default value: `LineCap::None`.
    pub start_cap: LineCap,

    /// What cap to use at the last point of an open line.
    ///
    /// Default value: `LineCap::None`.
    pub end_cap: LineCap,

    /// Maximum length of the miter offset, as a multiple of half the line width.
    ///
    /// Sharp turns otherwise produce offsets that grow without bound. Clamping the offset
    /// doesn't change the number of vertices and triangles.
    ///
    /// Must be greater than or equal to `LineMeshOptions::MINIMUM_MITER_LIMIT`.
    /// Default value: `None`.
    pub miter_limit: Option<f32>,
}

impl LineMeshOptions {
    /// The offset of a miter can't be shorter than half the line width.
    pub const MINIMUM_MITER_LIMIT: f32 = 1.0;
    pub const DEFAULT_LINE_WIDTH: f32 = 10.0;
    pub const DEFAULT_LINE_CAP: LineCap = LineCap::None;

    pub const DEFAULT: Self = LineMeshOptions {
        line_width: Self::DEFAULT_LINE_WIDTH,
        closed: false,
        start_cap: Self::DEFAULT_LINE_CAP,
        end_cap: Self::DEFAULT_LINE_CAP,
        miter_limit: None,
    };

    #[inline]
    pub const fn width(line_width: f32) -> Self {
        Self::DEFAULT.with_line_width(line_width)
    }

    #[inline]
    pub const fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    #[inline]
    pub const fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    #[inline]
    pub const fn with_line_cap(mut self, cap: LineCap) -> Self {
        self.start_cap = cap;
        self.end_cap = cap;
        self
    }

    #[inline]
    pub const fn with_start_cap(mut self, cap: LineCap) -> Self {
        self.start_cap = cap;
        self
    }

    #[inline]
    pub const fn with_end_cap(mut self, cap: LineCap) -> Self {
        self.end_cap = cap;
        self
    }

    /// Invalid limits are reported by [`build_line_mesh`] as an
    /// [`InvalidArgument::InvalidMiterLimit`](crate::geom::InvalidArgument::InvalidMiterLimit)
    /// error.
    #[inline]
    pub const fn with_miter_limit(mut self, limit: f32) -> Self {
        self.miter_limit = Some(limit);
        self
    }
}

impl Default for LineMeshOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Parameters for [`triangulate_polygon`] and [`fill_polygon`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct TriangulationOptions {
    /// A fast path for polygons that are monotone with respect to the y axis.
    ///
    /// Do not set this to `true` unless the polygon is known to be y-monotone and to have
    /// the declared `orientation`, else the output is incorrect.
    ///
    /// Default value: `false`.
    pub y_monotone: bool,

    /// The orientation of the polygon, used by the y-monotone sweep.
    ///
    /// Ear clipping detects the orientation of the polygon and ignores this.
    /// Default value: `Orientation::Counterclockwise`.
    pub orientation: Orientation,
}

impl TriangulationOptions {
    pub const DEFAULT: Self = TriangulationOptions {
        y_monotone: false,
        orientation: Orientation::Counterclockwise,
    };

    /// Options for the sweep of a y-monotone polygon of the given orientation.
    #[inline]
    pub const fn monotone(orientation: Orientation) -> Self {
        TriangulationOptions {
            y_monotone: true,
            orientation,
        }
    }

    #[inline]
    pub const fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }
}

impl Default for TriangulationOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

type Index = u32;

/// A virtual vertex offset in a geometry.
///
/// The `VertexId`s are only valid between `IndexSink::begin_geometry` and
/// `IndexSink::end_geometry`. Sinks typically translate the ids internally so that the
/// first vertex emitted after `begin_geometry` has id zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct VertexId(pub Index);

impl VertexId {
    pub const INVALID: VertexId = VertexId(u32::MAX);

    pub fn offset(self) -> Index {
        self.0
    }

    pub fn to_usize(self) -> usize {
        self.0 as usize
    }

    pub fn from_usize(v: usize) -> Self {
        VertexId(v as Index)
    }
}

impl Add<u32> for VertexId {
    type Output = Self;
    fn add(self, rhs: u32) -> Self {
        VertexId(self.0 + rhs)
    }
}

impl Sub<u32> for VertexId {
    type Output = Self;
    fn sub(self, rhs: u32) -> Self {
        VertexId(self.0 - rhs)
    }
}

impl From<u16> for VertexId {
    fn from(v: u16) -> Self {
        VertexId(v as Index)
    }
}
impl From<u32> for VertexId {
    fn from(v: u32) -> Self {
        VertexId(v)
    }
}
impl From<i32> for VertexId {
    fn from(v: i32) -> Self {
        VertexId(v as Index)
    }
}

impl From<VertexId> for u8 {
    fn from(v: VertexId) -> Self {
        v.0 as u8
    }
}
impl From<VertexId> for u16 {
    fn from(v: VertexId) -> Self {
        v.0 as u16
    }
}
impl From<VertexId> for u32 {
    fn from(v: VertexId) -> Self {
        v.0
    }
}
impl From<VertexId> for i32 {
    fn from(v: VertexId) -> Self {
        v.0 as i32
    }
}
impl From<VertexId> for usize {
    fn from(v: VertexId) -> Self {
        v.0 as usize
    }
}

#[test]
fn test_default_line_options() {
    let options = LineMeshOptions::default();

    assert_eq!(options.line_width, 10.0);
    assert!(!options.closed);
    assert_eq!(options.start_cap, LineCap::None);
    assert_eq!(options.miter_limit, None);
}

#[test]
fn test_line_options_builders() {
    let options = LineMeshOptions::width(2.0)
        .closed()
        .with_start_cap(LineCap::circle(4))
        .with_miter_limit(3.0);

    assert_eq!(options.line_width, 2.0);
    assert!(options.closed);
    assert_eq!(options.start_cap, LineCap::Circle { num_segments: 4 });
    assert_eq!(options.end_cap, LineCap::None);
    assert_eq!(options.miter_limit, Some(3.0));
}

#[test]
fn test_with_invalid_miter_limit_does_not_panic() {
    let options = LineMeshOptions::default().with_miter_limit(0.0);
    assert_eq!(options.miter_limit, Some(0.0));
}

#[test]
fn test_triangulation_options() {
    let options = TriangulationOptions::default();
    assert!(!options.y_monotone);
    assert_eq!(options.orientation, Orientation::Counterclockwise);

    let options = TriangulationOptions::monotone(Orientation::Clockwise);
    assert!(options.y_monotone);
    assert_eq!(options.orientation, Orientation::Clockwise);
}

#[test]
fn test_vertex_id_conversions() {
    let id = VertexId::from(7u16) + 3;
    assert_eq!(id, VertexId(10));
    assert_eq!(u8::from(id), 10);
    assert_eq!(usize::from(id - 10), 0);
    assert_eq!(VertexId::from_usize(5).to_usize(), 5);
}
