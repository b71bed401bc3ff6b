#![deny(bare_trait_objects)]

//! Tessellation of 2D lines, curves and polygons into vertex and index buffers.
//!
//! # Crates
//!
//! This meta-crate (`aether_mesh`) reexports the following sub-crates for convenience:
//!
//! * **aether_geom** - Points and vectors, sampling of bézier curves and circular arcs,
//!   outlines of common shapes.
//! * **aether_tessellation** - Line strokes, polygon triangulation and the output sinks.
//!
//! Each `aether_<name>` crate is reexported as a `<name>` module in `aether_mesh`. For example:
//!
//! ```ignore
//! use aether_tessellation::build_line_mesh;
//! ```
//!
//! Is equivalent to:
//!
//! ```ignore
//! use aether_mesh::tessellation::build_line_mesh;
//! ```
//!
//! # Feature flags
//!
//! serialization using serde can be enabled on each crate using the
//! `serialization` feature flag (disabled by default).
//!
//! All crates are `no_std` compatible (with `alloc`) when the default `std` feature
//! is disabled.
//!
//! # Logging
//!
//! The crates report unusual input (degenerate polygons, clamped miters) through the
//! [log](https://docs.rs/log) facade. Nothing is printed unless the application installs
//! a logger.
//!
//! # Examples
//!
//! ## Stroking a curve
//!
//! Curves are sampled into point sequences which can then be stroked or filled.
//!
//! ```
//! use aether_mesh::geom::bezier::{sample_cubic_bezier, BezierOptions};
//! use aether_mesh::math::{point, Point};
//! use aether_mesh::tessellation::{build_line_mesh, LineCap, LineMeshOptions};
//! use aether_mesh::tessellation::geometry_builder::{simple_builder, VertexBuffers};
//!
//! let mut points: Vec<Point> = Vec::new();
//! sample_cubic_bezier(
//!     point(0.0, 0.0),
//!     point(30.0, 50.0),
//!     point(70.0, -50.0),
//!     point(100.0, 0.0),
//!     &BezierOptions::segments(20),
//!     &mut |p| points.push(p),
//! ).unwrap();
//!
//! let mut geometry: VertexBuffers<Point, u16> = VertexBuffers::new();
//! build_line_mesh(
//!     &points,
//!     &LineMeshOptions::width(4.0).with_line_cap(LineCap::circle(6)),
//!     &mut simple_builder(&mut geometry),
//! ).unwrap();
//!
//! // Two vertices per sample, six per cap.
//! assert_eq!(geometry.vertices.len(), 2 * 21 + 2 * 6);
//! ```
//!
//! ## Filling a rounded rectangle
//!
//! ```
//! use aether_mesh::geom::shapes::rounded_rectangle;
//! use aether_mesh::math::{point, Box2D, Point};
//! use aether_mesh::tessellation::{fill_polygon, TriangulationOptions};
//! use aether_mesh::tessellation::geometry_builder::{BuffersBuilder, MeshVertex, VertexBuffers};
//!
//! #[derive(Copy, Clone, Debug)]
//! struct MyVertex { position: [f32; 2] }
//!
//! let mut outline: Vec<Point> = Vec::new();
//! rounded_rectangle(
//!     &Box2D::new(point(0.0, 0.0), point(100.0, 50.0)),
//!     10.0,
//!     8,
//!     &mut |p| outline.push(p),
//! ).unwrap();
//!
//! let mut geometry: VertexBuffers<MyVertex, u16> = VertexBuffers::new();
//! fill_polygon(
//!     &outline,
//!     &TriangulationOptions::DEFAULT,
//!     &mut BuffersBuilder::new(&mut geometry, |vertex: MeshVertex| MyVertex {
//!         position: vertex.position().to_array(),
//!     }),
//! ).unwrap();
//!
//! // The tessellated geometry is ready to be uploaded to the GPU.
//! assert_eq!(geometry.vertices.len(), outline.len());
//! assert_eq!(geometry.indices.len(), (outline.len() - 2) * 3);
//! ```
//!
//! ## Rendering the tessellated geometry
//!
//! This crate does not provide any GPU abstraction or rendering backend. The
//! [`DrawList`](tessellation::DrawList) accumulates geometry into a single pair of buffers
//! and records the range of each shape, which maps directly to indexed draw calls in any
//! graphics API.

pub extern crate aether_geom;
pub extern crate aether_tessellation;

pub use aether_geom as geom;
pub use aether_tessellation as tessellation;

pub use tessellation::math;
