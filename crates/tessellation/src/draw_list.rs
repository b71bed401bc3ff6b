use crate::geometry_builder::{BuffersBuilder, MaxIndex, MeshSink, VertexBuffers, VertexConstructor};
use crate::math::Point;
use crate::{
    build_line_mesh, fill_polygon, LineMeshOptions, TessellationResult, TriangulationOptions,
    VertexId,
};

use alloc::vec::Vec;
use core::ops::Range;

/// A range of the vertex and index buffers of a [`DrawList`], produced by a single
/// tessellation call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct DrawCall {
    pub vertices: Range<u32>,
    pub indices: Range<u32>,
}

/// Accumulates the meshes of several lines and polygons into shared vertex and index
/// buffers, recording a [`DrawCall`] for each of them.
///
/// The indices are absolute offsets into the shared vertex buffer, so the whole list can
/// also be submitted at once.
///
/// Calls that produce no vertex or no triangle don't record anything. Calls that fail
/// leave the buffers as they were before the call.
///
/// # Examples
///
/// ```
/// use aether_tessellation::{DrawList, LineMeshOptions, TriangulationOptions};
/// use aether_tessellation::geometry_builder::Positions;
/// use aether_tessellation::math::{point, Point};
///
/// let mut list: DrawList<Point, u16> = DrawList::new();
///
/// list.add_line(
///     &[point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)],
///     &LineMeshOptions::width(1.0),
///     Positions,
/// ).unwrap();
///
/// list.add_polygon(
///     &[point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0), point(0.0, 1.0)],
///     &TriangulationOptions::DEFAULT,
///     Positions,
/// ).unwrap();
///
/// list.flush(|buffers, draw_calls| {
///     assert_eq!(draw_calls.len(), 2);
///     assert_eq!(draw_calls[1].vertices, 6..10);
///     assert_eq!(buffers.indices.len(), 12 + 6);
/// });
///
/// assert!(list.draw_calls().is_empty());
/// ```
pub struct DrawList<OutputVertex, OutputIndex> {
    buffers: VertexBuffers<OutputVertex, OutputIndex>,
    draw_calls: Vec<DrawCall>,
}

impl<OutputVertex, OutputIndex> DrawList<OutputVertex, OutputIndex> {
    pub fn new() -> Self {
        DrawList {
            buffers: VertexBuffers::new(),
            draw_calls: Vec::new(),
        }
    }

    pub fn buffers(&self) -> &VertexBuffers<OutputVertex, OutputIndex> {
        &self.buffers
    }

    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    pub fn is_empty(&self) -> bool {
        self.draw_calls.is_empty()
    }

    /// Hands the accumulated geometry to a renderer, then clears the list.
    pub fn flush<F>(&mut self, render: F)
    where
        F: FnOnce(&VertexBuffers<OutputVertex, OutputIndex>, &[DrawCall]),
    {
        render(&self.buffers, &self.draw_calls);
        self.clear();
    }

    /// Discards the accumulated geometry without freeing memory.
    pub fn clear(&mut self) {
        self.buffers.clear();
        self.draw_calls.clear();
    }
}

impl<OutputVertex, OutputIndex> DrawList<OutputVertex, OutputIndex>
where
    OutputIndex: From<VertexId> + MaxIndex,
{
    /// Builds the mesh of a line, see [`build_line_mesh`].
    pub fn add_line<Ctor>(
        &mut self,
        points: &[Point],
        options: &LineMeshOptions,
        vertex_constructor: Ctor,
    ) -> TessellationResult
    where
        Ctor: VertexConstructor<OutputVertex>,
    {
        self.record(vertex_constructor, |output| {
            build_line_mesh(points, options, output)
        })
    }

    /// Builds the mesh of a filled polygon, see [`fill_polygon`].
    pub fn add_polygon<Ctor>(
        &mut self,
        points: &[Point],
        options: &TriangulationOptions,
        vertex_constructor: Ctor,
    ) -> TessellationResult
    where
        Ctor: VertexConstructor<OutputVertex>,
    {
        self.record(vertex_constructor, |output| {
            fill_polygon(points, options, output)
        })
    }

    fn record<Ctor, F>(&mut self, vertex_constructor: Ctor, build: F) -> TessellationResult
    where
        Ctor: VertexConstructor<OutputVertex>,
        F: FnOnce(&mut dyn MeshSink) -> TessellationResult,
    {
        let first_vertex = self.buffers.vertices.len() as u32;
        let first_index = self.buffers.indices.len() as u32;

        build(&mut BuffersBuilder::new(&mut self.buffers, vertex_constructor))?;

        let draw_call = DrawCall {
            vertices: first_vertex..self.buffers.vertices.len() as u32,
            indices: first_index..self.buffers.indices.len() as u32,
        };

        if draw_call.vertices.is_empty() || draw_call.indices.is_empty() {
            return Ok(());
        }

        self.draw_calls.push(draw_call);

        Ok(())
    }
}

impl<OutputVertex, OutputIndex> Default for DrawList<OutputVertex, OutputIndex> {
    fn default() -> Self {
        Self::new()
    }
}
