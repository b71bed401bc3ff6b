//! Tools to help with generating vertex and index buffers.
//!
//! ## Overview
//!
//! The tessellators don't know about the vertex layout or the index type of the
//! application. Instead they push their output into sinks:
//!
//! * [`VertexSink`] receives the generated vertices as [`MeshVertex`] values.
//! * [`IndexSink`] receives triangles as triples of [`VertexId`], and is notified at the
//!   beginning and the end of each generation.
//! * [`MeshSink`] is implemented by everything that implements both.
//!
//! The vertex ids passed to an index sink are relative to the first vertex emitted by the
//! call that produced them. A sink that appends into shared buffers is expected to offset
//! them, which is what [`BuffersBuilder`] does.
//!
//! Closures are the simplest sinks: any `FnMut(MeshVertex)` is a vertex sink and any
//! `FnMut(VertexId, VertexId, VertexId)` is an index sink. [`Emitters`] pairs two of them into
//! a mesh sink. It is very common to push vertices and indices into a pair of vectors, so
//! to facilitate this pattern this module also provides:
//!
//! * The struct [`VertexBuffers`], a simple pair of vectors of vertices and indices.
//! * The struct [`BuffersBuilder`] which writes into a [`VertexBuffers`] and implements the sink
//!   traits. Producing the vertex values is delegated to a [`VertexConstructor`].
//!
//! ## Examples
//!
//! ### Generating custom vertices
//!
//! ```
//! use aether_tessellation::{build_line_mesh, LineMeshOptions, MeshVertex};
//! use aether_tessellation::geometry_builder::{BuffersBuilder, VertexBuffers, VertexConstructor};
//! use aether_tessellation::math::point;
//!
//! #[derive(Copy, Clone, Debug)]
//! pub struct MyVertex {
//!     position: [f32; 2],
//!     color: [f32; 4],
//! }
//!
//! struct WithColor([f32; 4]);
//!
//! impl VertexConstructor<MyVertex> for WithColor {
//!     fn new_vertex(&mut self, vertex: MeshVertex) -> MyVertex {
//!         MyVertex {
//!             position: vertex.position().to_array(),
//!             color: self.0,
//!         }
//!     }
//! }
//!
//! let mut output: VertexBuffers<MyVertex, u16> = VertexBuffers::new();
//! let line = [point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)];
//!
//! build_line_mesh(
//!     &line,
//!     &LineMeshOptions::width(2.0),
//!     &mut BuffersBuilder::new(&mut output, WithColor([1.0, 0.0, 0.0, 1.0])),
//! ).unwrap();
//!
//! assert_eq!(output.vertices.len(), 6);
//! assert_eq!(output.indices.len(), 12);
//! ```
//!
//! ### Generating a completely custom output
//!
//! ```
//! use aether_tessellation::{triangulate_polygon, TriangulationOptions, VertexId};
//! use aether_tessellation::geometry_builder::IndexSink;
//! use aether_tessellation::math::point;
//!
//! // Writes the triangles to stdout instead of filling buffers.
//! struct ToStdOut {
//!     triangles: u32,
//! }
//!
//! impl IndexSink for ToStdOut {
//!     fn begin_geometry(&mut self) {
//!         self.triangles = 0;
//!         println!(" -- begin geometry");
//!     }
//!
//!     fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
//!         println!("triangle ({}, {}, {})", a.offset(), b.offset(), c.offset());
//!         self.triangles += 1;
//!     }
//!
//!     fn abort_geometry(&mut self) {
//!         println!(" -- oops!");
//!     }
//! }
//!
//! let mut output = ToStdOut { triangles: 0 };
//! triangulate_polygon(
//!     &[point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0), point(0.0, 1.0)],
//!     &TriangulationOptions::DEFAULT,
//!     &mut output,
//! ).unwrap();
//! assert_eq!(output.triangles, 2);
//! ```

pub use crate::error::GeometryBuilderError;
use crate::math::Point;
use crate::{Index, VertexId};

use alloc::vec::Vec;
use core::convert::From;

/// A vertex produced by the tessellators.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct MeshVertex {
    pub position: Point,
    /// Index of the input point this vertex was generated from.
    pub source: usize,
}

impl MeshVertex {
    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    #[inline]
    pub fn source(&self) -> usize {
        self.source
    }
}

/// Receives the vertices generated by the stroke tessellator and by [`fill_polygon`](crate::fill_polygon).
pub trait VertexSink {
    /// Inserts a vertex. Its id is the number of vertices added since the last call to
    /// `begin_geometry`.
    fn add_vertex(&mut self, vertex: MeshVertex) -> Result<(), GeometryBuilderError>;
}

/// Receives the triangles of a tessellation.
pub trait IndexSink {
    /// Called at the beginning of a generation.
    ///
    /// end_geometry must be called before begin_geometry is called again.
    fn begin_geometry(&mut self) {}

    /// Called at the end of a generation.
    fn end_geometry(&mut self) {}

    /// Insert a triangle made of vertices that were added after the last call to begin_geometry.
    ///
    /// This method can only be called between begin_geometry and end_geometry.
    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId);

    /// abort_geometry is called instead of end_geometry if an error occurred while producing
    /// the geometry and we won't be able to finish.
    ///
    /// The implementation is expected to discard the geometry that was generated since the last
    /// time begin_geometry was called, and to remain in a usable state.
    fn abort_geometry(&mut self) {}
}

/// A sink for both vertices and triangles.
pub trait MeshSink: VertexSink + IndexSink {}

impl<T: VertexSink + IndexSink + ?Sized> MeshSink for T {}

impl<F> VertexSink for F
where
    F: FnMut(MeshVertex),
{
    fn add_vertex(&mut self, vertex: MeshVertex) -> Result<(), GeometryBuilderError> {
        self(vertex);
        Ok(())
    }
}

impl<F> IndexSink for F
where
    F: FnMut(VertexId, VertexId, VertexId),
{
    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        self(a, b, c)
    }
}

/// Pairs a vertex closure and a triangle closure into a [`MeshSink`].
pub struct Emitters<V, I> {
    pub vertices: V,
    pub indices: I,
}

impl<V, I> Emitters<V, I>
where
    V: FnMut(MeshVertex),
    I: FnMut(VertexId, VertexId, VertexId),
{
    pub fn new(vertices: V, indices: I) -> Self {
        Emitters { vertices, indices }
    }
}

impl<V: FnMut(MeshVertex), I> VertexSink for Emitters<V, I> {
    fn add_vertex(&mut self, vertex: MeshVertex) -> Result<(), GeometryBuilderError> {
        (self.vertices)(vertex);
        Ok(())
    }
}

impl<V, I: FnMut(VertexId, VertexId, VertexId)> IndexSink for Emitters<V, I> {
    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        (self.indices)(a, b, c)
    }
}

/// An index sink that passes each index of each triangle to a closure, for callers
/// that consume a flat index stream.
pub struct FlatIndices<F>(pub F);

impl<F: FnMut(VertexId)> IndexSink for FlatIndices<F> {
    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        (self.0)(a);
        (self.0)(b);
        (self.0)(c);
    }
}

/// A wrapper for sinks that inverts the triangle face winding.
pub struct InvertWinding<B>(pub B);

impl<B: IndexSink> IndexSink for InvertWinding<B> {
    fn begin_geometry(&mut self) {
        self.0.begin_geometry();
    }

    fn end_geometry(&mut self) {
        self.0.end_geometry()
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        // Invert the triangle winding by flipping b and c.
        self.0.add_triangle(a, c, b);
    }

    fn abort_geometry(&mut self) {
        self.0.abort_geometry();
    }
}

impl<B: VertexSink> VertexSink for InvertWinding<B> {
    #[inline]
    fn add_vertex(&mut self, vertex: MeshVertex) -> Result<(), GeometryBuilderError> {
        self.0.add_vertex(vertex)
    }
}

/// Structure that holds the vertex and index data.
///
/// Usually written into though temporary `BuffersBuilder` objects.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct VertexBuffers<OutputVertex, OutputIndex> {
    pub vertices: Vec<OutputVertex>,
    pub indices: Vec<OutputIndex>,
}

impl<OutputVertex, OutputIndex> VertexBuffers<OutputVertex, OutputIndex> {
    /// Constructor
    pub fn new() -> Self {
        VertexBuffers::with_capacity(512, 1024)
    }

    /// Constructor
    pub fn with_capacity(num_vertices: usize, num_indices: usize) -> Self {
        VertexBuffers {
            vertices: Vec::with_capacity(num_vertices),
            indices: Vec::with_capacity(num_indices),
        }
    }

    /// Empty the buffers without freeing memory, for reuse without reallocation.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

/// A temporary view on a `VertexBuffers` object which facilitates the population of vertex and
/// index data.
///
/// At each `begin_geometry` the builder records the current size of the buffers. The ids it
/// receives are relative to the first vertex of the generation, so they are offset by the
/// recorded vertex count (plus an optional fixed `vertex_offset`) before being written. This
/// lets several tessellations share the same buffers without knowing about each other.
///
/// `abort_geometry` truncates both buffers back to the recorded sizes.
///
/// The `VertexConstructor` does the translation from [`MeshVertex`] to `OutputVertex`.
/// If the positions are all you need, use the `SimpleBuffersBuilder` convenience typedef.
pub struct BuffersBuilder<'l, OutputVertex: 'l, OutputIndex: 'l, Ctor> {
    buffers: &'l mut VertexBuffers<OutputVertex, OutputIndex>,
    first_vertex: Index,
    first_index: Index,
    vertex_offset: Index,
    vertex_constructor: Ctor,
}

impl<'l, OutputVertex: 'l, OutputIndex: 'l, Ctor>
    BuffersBuilder<'l, OutputVertex, OutputIndex, Ctor>
{
    pub fn new(buffers: &'l mut VertexBuffers<OutputVertex, OutputIndex>, ctor: Ctor) -> Self {
        let first_vertex = buffers.vertices.len() as Index;
        let first_index = buffers.indices.len() as Index;
        BuffersBuilder {
            buffers,
            first_vertex,
            first_index,
            vertex_offset: 0,
            vertex_constructor: ctor,
        }
    }

    /// Adds a fixed offset to every written index, on top of the vertex count recorded at
    /// `begin_geometry`.
    pub fn with_vertex_offset(mut self, offset: Index) -> Self {
        self.vertex_offset = offset;

        self
    }

    /// Consumes self and returns a builder with opposite triangle face winding.
    pub fn with_inverted_winding(self) -> InvertWinding<Self> {
        InvertWinding(self)
    }

    pub fn buffers<'a, 'b: 'a>(&'b self) -> &'a VertexBuffers<OutputVertex, OutputIndex> {
        self.buffers
    }
}

/// A trait specifying how to create vertex values.
pub trait VertexConstructor<OutputVertex> {
    fn new_vertex(&mut self, vertex: MeshVertex) -> OutputVertex;
}

/// A simple vertex constructor that just takes the position.
pub struct Positions;

impl VertexConstructor<Point> for Positions {
    fn new_vertex(&mut self, vertex: MeshVertex) -> Point {
        vertex.position()
    }
}

impl<F, OutputVertex> VertexConstructor<OutputVertex> for F
where
    F: FnMut(MeshVertex) -> OutputVertex,
{
    fn new_vertex(&mut self, vertex: MeshVertex) -> OutputVertex {
        self(vertex)
    }
}

/// A `BuffersBuilder` that takes the actual vertex type as input.
pub type SimpleBuffersBuilder<'l> = BuffersBuilder<'l, Point, u16, Positions>;

/// Creates a `SimpleBuffersBuilder`.
pub fn simple_builder(buffers: &mut VertexBuffers<Point, u16>) -> SimpleBuffersBuilder {
    BuffersBuilder::new(buffers, Positions)
}

impl<'l, OutputVertex, OutputIndex, Ctor> IndexSink
    for BuffersBuilder<'l, OutputVertex, OutputIndex, Ctor>
where
    OutputVertex: 'l,
    OutputIndex: From<VertexId> + MaxIndex,
{
    fn begin_geometry(&mut self) {
        self.first_vertex = self.buffers.vertices.len() as Index;
        self.first_index = self.buffers.indices.len() as Index;
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        debug_assert!(a != b);
        debug_assert!(a != c);
        debug_assert!(b != c);
        debug_assert!(a != VertexId::INVALID);
        debug_assert!(b != VertexId::INVALID);
        debug_assert!(c != VertexId::INVALID);
        let offset = self.first_vertex + self.vertex_offset;
        self.buffers.indices.push((a + offset).into());
        self.buffers.indices.push((b + offset).into());
        self.buffers.indices.push((c + offset).into());
    }

    fn abort_geometry(&mut self) {
        self.buffers.vertices.truncate(self.first_vertex as usize);
        self.buffers.indices.truncate(self.first_index as usize);
    }
}

impl<'l, OutputVertex, OutputIndex, Ctor> VertexSink
    for BuffersBuilder<'l, OutputVertex, OutputIndex, Ctor>
where
    OutputVertex: 'l,
    OutputIndex: From<VertexId> + MaxIndex,
    Ctor: VertexConstructor<OutputVertex>,
{
    fn add_vertex(&mut self, vertex: MeshVertex) -> Result<(), GeometryBuilderError> {
        // The index of the new vertex must be representable.
        let len = self.buffers.vertices.len() + self.vertex_offset as usize;
        if len > OutputIndex::MAX {
            return Err(GeometryBuilderError::TooManyVertices);
        }
        self.buffers
            .vertices
            .push(self.vertex_constructor.new_vertex(vertex));
        Ok(())
    }
}

/// A sink that does not output any geometry and counts what it receives.
///
/// Mostly useful for testing and benchmarking.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NoOutput {
    pub vertices: u32,
    pub triangles: u32,
}

impl NoOutput {
    pub fn new() -> Self {
        NoOutput {
            vertices: 0,
            triangles: 0,
        }
    }
}

impl IndexSink for NoOutput {
    fn begin_geometry(&mut self) {
        self.vertices = 0;
        self.triangles = 0;
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        debug_assert!(a != b);
        debug_assert!(a != c);
        debug_assert!(b != c);
        self.triangles += 1;
    }
}

impl VertexSink for NoOutput {
    fn add_vertex(&mut self, _: MeshVertex) -> Result<(), GeometryBuilderError> {
        if self.vertices == u32::MAX {
            return Err(GeometryBuilderError::TooManyVertices);
        }
        self.vertices += 1;
        Ok(())
    }
}

/// Provides the maximum value of an index.
///
/// This should be the maximum value representable by the index type up
/// to u32::MAX because the tessellators can't internally represent more
/// than u32::MAX indices.
pub trait MaxIndex {
    const MAX: usize;
}

impl MaxIndex for u8 {
    const MAX: usize = u8::MAX as usize;
}
impl MaxIndex for u16 {
    const MAX: usize = u16::MAX as usize;
}
impl MaxIndex for u32 {
    const MAX: usize = u32::MAX as usize;
}
impl MaxIndex for i32 {
    const MAX: usize = i32::MAX as usize;
}
// The tessellators internally use u32 indices so we can't have more than u32::MAX
impl MaxIndex for usize {
    const MAX: usize = u32::MAX as usize;
}

#[cfg(test)]
use crate::math::point;

#[cfg(test)]
fn vertex(x: f32, y: f32, source: usize) -> MeshVertex {
    MeshVertex {
        position: point(x, y),
        source,
    }
}

#[test]
fn buffers_builder_offsets_each_geometry() {
    let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();

    for i in 0..2 {
        let mut builder = simple_builder(&mut buffers);
        builder.begin_geometry();
        builder.add_vertex(vertex(0.0, 0.0, 0)).unwrap();
        builder.add_vertex(vertex(1.0, 0.0, 1)).unwrap();
        builder.add_vertex(vertex(0.0, i as f32, 2)).unwrap();
        builder.add_triangle(VertexId(0), VertexId(1), VertexId(2));
        builder.end_geometry();
    }

    assert_eq!(buffers.vertices.len(), 6);
    assert_eq!(buffers.indices, [0, 1, 2, 3, 4, 5]);
}

#[test]
fn buffers_builder_vertex_offset() {
    let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
    let mut builder = BuffersBuilder::new(&mut buffers, Positions).with_vertex_offset(10);
    builder.begin_geometry();
    builder.add_triangle(VertexId(0), VertexId(1), VertexId(2));
    builder.end_geometry();
    assert_eq!(buffers.indices, [10, 11, 12]);
}

#[test]
fn buffers_builder_abort() {
    let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
    {
        let mut builder = simple_builder(&mut buffers);
        builder.begin_geometry();
        builder.add_vertex(vertex(0.0, 0.0, 0)).unwrap();
        builder.add_vertex(vertex(1.0, 0.0, 1)).unwrap();
        builder.add_vertex(vertex(1.0, 1.0, 2)).unwrap();
        builder.add_triangle(VertexId(0), VertexId(1), VertexId(2));
        builder.end_geometry();
    }
    {
        let mut builder = simple_builder(&mut buffers);
        builder.begin_geometry();
        builder.add_vertex(vertex(5.0, 5.0, 0)).unwrap();
        builder.add_triangle(VertexId(0), VertexId(1), VertexId(2));
        builder.abort_geometry();
    }

    assert_eq!(buffers.vertices.len(), 3);
    assert_eq!(buffers.indices.len(), 3);
}

#[test]
fn buffers_builder_too_many_vertices() {
    let mut buffers: VertexBuffers<Point, u8> = VertexBuffers::new();
    let mut builder = BuffersBuilder::new(&mut buffers, Positions);
    builder.begin_geometry();
    for i in 0..256 {
        builder.add_vertex(vertex(i as f32, 0.0, i)).unwrap();
    }
    assert_eq!(
        builder.add_vertex(vertex(0.0, 1.0, 256)),
        Err(GeometryBuilderError::TooManyVertices)
    );
    assert_eq!(buffers.vertices.len(), 256);
}

#[test]
fn vertex_constructor_closure() {
    let mut buffers: VertexBuffers<(f32, usize), u32> = VertexBuffers::new();
    let mut builder = BuffersBuilder::new(&mut buffers, |v: MeshVertex| (v.position.x, v.source));
    builder.begin_geometry();
    builder.add_vertex(vertex(3.0, 4.0, 7)).unwrap();
    builder.end_geometry();
    assert_eq!(buffers.vertices, [(3.0, 7)]);
}

#[test]
fn invert_winding() {
    let mut triangles = Vec::new();
    {
        let mut sink = InvertWinding(|a: VertexId, b: VertexId, c: VertexId| {
            triangles.push((a.0, b.0, c.0))
        });
        sink.begin_geometry();
        sink.add_triangle(VertexId(0), VertexId(1), VertexId(2));
        sink.end_geometry();
    }
    assert_eq!(triangles, [(0, 2, 1)]);
}

#[test]
fn flat_indices_and_emitters() {
    let mut indices = Vec::new();
    let mut sink = FlatIndices(|id: VertexId| indices.push(id.0));
    sink.add_triangle(VertexId(4), VertexId(5), VertexId(6));
    assert_eq!(indices, [4, 5, 6]);

    let mut positions = Vec::new();
    let mut count = 0;
    {
        let mut emitters = Emitters::new(
            |v: MeshVertex| positions.push(v.position),
            |_: VertexId, _: VertexId, _: VertexId| count += 1,
        );
        let sink: &mut dyn MeshSink = &mut emitters;
        sink.add_vertex(vertex(1.0, 2.0, 0)).unwrap();
        sink.add_triangle(VertexId(0), VertexId(1), VertexId(2));
    }
    assert_eq!(positions, [point(1.0, 2.0)]);
    assert_eq!(count, 1);
}

#[test]
fn no_output_counts() {
    let mut sink = NoOutput::new();
    sink.begin_geometry();
    sink.add_vertex(vertex(0.0, 0.0, 0)).unwrap();
    sink.add_vertex(vertex(1.0, 0.0, 1)).unwrap();
    sink.add_triangle(VertexId(0), VertexId(1), VertexId(2));
    sink.end_geometry();
    assert_eq!(
        sink,
        NoOutput {
            vertices: 2,
            triangles: 1
        }
    );
}
