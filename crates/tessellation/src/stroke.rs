use crate::geom::utils::{normal, rotate};
use crate::geom::InvalidArgument;
use crate::geometry_builder::{GeometryBuilderError, MeshSink, MeshVertex};
use crate::math::{vector, Point, Vector};
use crate::{Index, LineCap, LineMeshOptions, TessellationResult, VertexId};

use alloc::vec::Vec;
use core::f32::consts::PI;

/// Builds the triangle mesh of a polyline of constant width.
///
/// ## Overview
///
/// Each input point produces two vertices, offset on each side of the line along the
/// bisector of the normals of the two segments meeting at the point. The length of the
/// offset is adjusted so that the edges of the mesh stay at `line_width / 2` from the
/// segments (miter joins). Consecutive pairs of vertices are connected by two triangles.
///
/// The vertices of the point `i` have ids `2 * i` (on the side of the segment normal
/// `(tangent.y, -tangent.x)`) and `2 * i + 1`. Ids are relative to the first vertex this
/// call emits. Vertices generated for round caps come after the vertices of the line.
///
/// With a counterclockwise coordinate system (y up), the triangles of a straight line
/// are counterclockwise.
///
/// Closed lines connect the last point back to the first one and have no caps.
/// Lines with fewer than two points produce nothing.
///
/// Parts of the line that overlap (at sharp turns or self intersections) are covered by
/// overlapping triangles.
///
/// # Examples
///
/// ```
/// use aether_tessellation::{build_line_mesh, LineCap, LineMeshOptions};
/// use aether_tessellation::geometry_builder::{simple_builder, VertexBuffers};
/// use aether_tessellation::math::{point, Point};
///
/// let line = [point(0.0, 0.0), point(1.0, 2.0), point(2.0, 0.0), point(1.0, 1.0)];
///
/// let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
///
/// build_line_mesh(
///     &line,
///     &LineMeshOptions::width(0.5).with_line_cap(LineCap::circle(8)),
///     &mut simple_builder(&mut buffers),
/// ).unwrap();
///
/// // Two vertices per point plus eight per cap.
/// assert_eq!(buffers.vertices.len(), 8 + 16);
/// // Two triangles per segment plus eight per cap.
/// assert_eq!(buffers.indices.len(), (6 + 16) * 3);
/// ```
pub fn build_line_mesh(
    points: &[Point],
    options: &LineMeshOptions,
    output: &mut dyn MeshSink,
) -> TessellationResult {
    if points.len() < 2 {
        log::debug!("skipping a line with {} point(s)", points.len());
        return Ok(());
    }

    validate(points, options)?;

    output.begin_geometry();

    let mut builder = LineMeshBuilder {
        options,
        half_width: options.line_width * 0.5,
        next_vertex: 0,
        output,
    };

    match builder.build(points) {
        Ok(()) => {
            builder.output.end_geometry();
            Ok(())
        }
        Err(e) => {
            builder.output.abort_geometry();
            Err(e.into())
        }
    }
}

fn validate(points: &[Point], options: &LineMeshOptions) -> Result<(), InvalidArgument> {
    if options.line_width.is_nan() || options.line_width < 0.0 {
        return Err(InvalidArgument::InvalidLineWidth);
    }

    if let Some(limit) = options.miter_limit {
        if limit.is_nan() || limit < LineMeshOptions::MINIMUM_MITER_LIMIT {
            return Err(InvalidArgument::InvalidMiterLimit);
        }
    }

    if !options.closed {
        for cap in [options.start_cap, options.end_cap] {
            if cap == (LineCap::Circle { num_segments: 0 }) {
                return Err(InvalidArgument::ZeroSegments);
            }
        }
    }

    if points.iter().any(|p| p.x.is_nan() || p.y.is_nan()) {
        return Err(InvalidArgument::PositionIsNaN);
    }

    Ok(())
}

struct LineMeshBuilder<'l> {
    options: &'l LineMeshOptions,
    half_width: f32,
    next_vertex: Index,
    output: &'l mut dyn MeshSink,
}

impl<'l> LineMeshBuilder<'l> {
    fn build(&mut self, points: &[Point]) -> Result<(), GeometryBuilderError> {
        let n = points.len();
        let closed = self.options.closed;
        let tangents = segment_tangents(points, closed);
        let m = tangents.len();

        for (i, p) in points.iter().enumerate() {
            let seg_normal = normal(tangents[i.min(m - 1)]);
            let prev_normal = if i > 0 {
                normal(tangents[i - 1])
            } else if closed {
                normal(tangents[m - 1])
            } else {
                seg_normal
            };

            let offset = self.miter_offset(seg_normal, prev_normal);
            self.add_vertex(*p + offset, i)?;
            self.add_vertex(*p - offset, i)?;

            if i > 0 {
                let a = 2 * (i as Index - 1);
                self.add_quad(a, a + 1, a + 2, a + 3);
            }
        }

        if closed {
            let a = 2 * (n as Index - 1);
            self.add_quad(a, a + 1, 0, 1);
            return Ok(());
        }

        let num_line_vertices = self.next_vertex;
        self.add_cap(
            self.options.start_cap,
            points[0],
            -tangents[0],
            (0, 1),
            0,
        )?;
        self.add_cap(
            self.options.end_cap,
            points[n - 1],
            tangents[m - 1],
            (num_line_vertices - 1, num_line_vertices - 2),
            n - 1,
        )?;

        Ok(())
    }

    fn miter_offset(&self, seg_normal: Vector, prev_normal: Vector) -> Vector {
        let sum = seg_normal + prev_normal;
        if sum.square_length() < 1e-8 {
            // The line turns back on itself, there is no bisector.
            return seg_normal * self.half_width;
        }

        let bisector = sum.normalize();
        let cos_alpha = seg_normal.dot(bisector);
        let mut length = self.half_width / cos_alpha;

        if let Some(limit) = self.options.miter_limit {
            let max_length = limit * self.half_width;
            if length > max_length {
                log::debug!("clamping a miter of length {} to {}", length, max_length);
                length = max_length;
            }
        }

        bisector * length
    }

    /// Fans a half disc around `tangent` from the edge `(a, b)` at the end of the line.
    fn add_cap(
        &mut self,
        cap: LineCap,
        center: Point,
        tangent: Vector,
        (a, b): (Index, Index),
        source: usize,
    ) -> Result<(), GeometryBuilderError> {
        let num_segments = match cap {
            LineCap::None => {
                return Ok(());
            }
            LineCap::Circle { num_segments } => num_segments,
        };

        let first = self.next_vertex;
        let step = PI / (num_segments + 1) as f32;
        for i in 0..num_segments {
            let angle = PI * 0.5 - step * (i + 1) as f32;
            let offset = rotate(tangent, angle) * self.half_width;
            self.add_vertex(center + offset, source)?;
        }

        self.output
            .add_triangle(VertexId(a), VertexId(b), VertexId(first));
        for i in 1..num_segments {
            self.output.add_triangle(
                VertexId(first + i - 1),
                VertexId(b),
                VertexId(first + i),
            );
        }

        Ok(())
    }

    // a -- b
    // |  / |
    // | /  |
    // c -- d
    fn add_quad(&mut self, a: Index, b: Index, c: Index, d: Index) {
        self.output
            .add_triangle(VertexId(b), VertexId(a), VertexId(c));
        self.output
            .add_triangle(VertexId(b), VertexId(c), VertexId(d));
    }

    fn add_vertex(&mut self, position: Point, source: usize) -> Result<(), GeometryBuilderError> {
        self.output.add_vertex(MeshVertex { position, source })?;
        self.next_vertex += 1;
        Ok(())
    }
}

/// Unit tangents of the segments of the line, including the closing segment of closed lines.
///
/// Zero-length segments take the tangent of the previous segment, or of the next one at
/// the start of the line.
fn segment_tangents(points: &[Point], closed: bool) -> Vec<Vector> {
    let n = points.len();
    let num_segments = if closed { n } else { n - 1 };

    let mut tangents: Vec<Option<Vector>> = Vec::with_capacity(num_segments);
    let mut previous = None;
    for i in 0..num_segments {
        let d = points[(i + 1) % n] - points[i];
        let length = d.length();
        if length > 0.0 {
            previous = Some(d / length);
        }
        tangents.push(previous);
    }

    let first_valid = tangents
        .iter()
        .find_map(|t| *t)
        .unwrap_or_else(|| vector(1.0, 0.0));

    tangents
        .into_iter()
        .map(|t| t.unwrap_or(first_valid))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::utils::signed_area;
    use crate::geometry_builder::*;
    use crate::math::point;
    use crate::TessellationError;
    use alloc::vec;

    /// Checks the validity of the generated geometry as it is emitted.
    struct TestBuilder<'l> {
        builder: BuffersBuilder<'l, Point, u32, Positions>,
        check_winding: bool,
    }

    impl<'l> IndexSink for TestBuilder<'l> {
        fn begin_geometry(&mut self) {
            self.builder.begin_geometry();
        }
        fn end_geometry(&mut self) {
            self.builder.end_geometry()
        }
        fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
            assert!(a != b);
            assert!(a != c);
            assert!(b != c);
            let vertices = &self.builder.buffers().vertices;
            let pa = vertices[a.to_usize()];
            let pb = vertices[b.to_usize()];
            let pc = vertices[c.to_usize()];
            if self.check_winding {
                let threshold = -0.001; // Floating point errors.
                assert!(signed_area(pa, pb, pc) >= threshold);
            }
            self.builder.add_triangle(a, b, c);
        }
        fn abort_geometry(&mut self) {
            panic!();
        }
    }

    impl<'l> VertexSink for TestBuilder<'l> {
        fn add_vertex(&mut self, vertex: MeshVertex) -> Result<(), GeometryBuilderError> {
            assert!(!vertex.position().x.is_nan());
            assert!(!vertex.position().y.is_nan());
            self.builder.add_vertex(vertex)
        }
    }

    fn test_line(
        points: &[Point],
        options: &LineMeshOptions,
        check_winding: bool,
    ) -> VertexBuffers<Point, u32> {
        let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
        build_line_mesh(
            points,
            options,
            &mut TestBuilder {
                builder: BuffersBuilder::new(&mut buffers, Positions),
                check_winding,
            },
        )
        .unwrap();

        for index in &buffers.indices {
            assert!((*index as usize) < buffers.vertices.len());
        }

        buffers
    }

    fn mesh_area(buffers: &VertexBuffers<Point, u32>) -> f32 {
        let v = &buffers.vertices;
        buffers
            .indices
            .chunks(3)
            .map(|t| signed_area(v[t[0] as usize], v[t[1] as usize], v[t[2] as usize]) * 0.5)
            .sum()
    }

    #[test]
    fn straight_line_area() {
        let line = [point(0.0, 0.0), point(3.0, 0.0), point(7.0, 0.0)];
        let buffers = test_line(&line, &LineMeshOptions::width(2.0), true);
        assert!((mesh_area(&buffers) - 14.0).abs() < 1e-4);

        // The default width.
        let buffers = test_line(&line[..2], &LineMeshOptions::DEFAULT, true);
        assert!((mesh_area(&buffers) - 30.0).abs() < 1e-3);
    }

    #[test]
    fn open_line_counts() {
        let line = [
            point(0.0, 0.0),
            point(1.0, 2.0),
            point(2.0, 0.0),
            point(3.0, 2.0),
            point(4.0, 0.0),
        ];
        let buffers = test_line(&line, &LineMeshOptions::width(0.2), false);
        assert_eq!(buffers.vertices.len(), 2 * line.len());
        assert_eq!(buffers.indices.len() / 3, 2 * (line.len() - 1));
    }

    #[test]
    fn vertex_layout() {
        let line = [point(0.0, 0.0), point(10.0, 0.0)];
        let buffers = test_line(&line, &LineMeshOptions::width(2.0), true);
        assert_eq!(
            buffers.vertices,
            [
                point(0.0, -1.0),
                point(0.0, 1.0),
                point(10.0, -1.0),
                point(10.0, 1.0),
            ]
        );
        assert_eq!(buffers.indices, [1, 0, 2, 1, 2, 3]);
    }

    #[test]
    fn right_angle_miter() {
        let line = [point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)];
        let buffers = test_line(&line, &LineMeshOptions::width(2.0), false);
        let corner = &buffers.vertices[2..4];
        assert!((corner[0] - point(11.0, -1.0)).length() < 1e-5);
        assert!((corner[1] - point(9.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn closed_square() {
        let square = [
            point(0.0, 0.0),
            point(10.0, 0.0),
            point(10.0, 10.0),
            point(0.0, 10.0),
        ];
        let buffers = test_line(&square, &LineMeshOptions::width(2.0).closed(), true);
        assert_eq!(buffers.vertices.len(), 8);
        assert_eq!(buffers.indices.len() / 3, 8);

        // The outer and inner squares are 12 and 8 units wide.
        assert!((mesh_area(&buffers) - 80.0).abs() < 1e-3);
        assert!((buffers.vertices[0] - point(-1.0, -1.0)).length() < 1e-5);
        assert!((buffers.vertices[1] - point(1.0, 1.0)).length() < 1e-5);

        // Caps are ignored on closed lines.
        let capped = test_line(
            &square,
            &LineMeshOptions::width(2.0)
                .closed()
                .with_line_cap(LineCap::circle(4)),
            true,
        );
        assert_eq!(capped.vertices.len(), 8);
    }

    #[test]
    fn round_caps() {
        let line = [point(0.0, 0.0), point(10.0, 0.0)];
        let num_segments = 8;
        let half_width = 1.0;
        let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
        let mut sources = Vec::new();
        {
            let mut builder = BuffersBuilder::new(&mut buffers, |v: MeshVertex| {
                sources.push(v.source());
                v.position()
            });
            build_line_mesh(
                &line,
                &LineMeshOptions::width(2.0).with_line_cap(LineCap::circle(num_segments)),
                &mut builder,
            )
            .unwrap();
        }

        assert_eq!(buffers.vertices.len(), 4 + 2 * num_segments as usize);
        assert_eq!(buffers.indices.len() / 3, 2 + 2 * num_segments as usize);
        assert_eq!(&sources[4..12], &[0; 8]);
        assert_eq!(&sources[12..], &[1; 8]);

        for p in &buffers.vertices[4..12] {
            assert!(p.x < 0.0);
            assert!((p.to_vector().length() - half_width).abs() < 1e-5);
        }
        for p in &buffers.vertices[12..] {
            assert!(p.x > 10.0);
        }

        // Each cap is a polygon inscribed in a half disc with num_segments + 1 sides.
        let s = (num_segments + 1) as f32;
        let cap_area = s * 0.5 * half_width * half_width * (PI / s).sin();
        let area = mesh_area(&buffers);
        assert!((area - (20.0 + 2.0 * cap_area)).abs() < 1e-3, "{}", area);

        for t in buffers.indices.chunks(3) {
            let v = &buffers.vertices;
            assert!(signed_area(v[t[0] as usize], v[t[1] as usize], v[t[2] as usize]) > 0.0);
        }
    }

    #[test]
    fn single_cap() {
        let line = [point(0.0, 0.0), point(0.0, 5.0)];
        let buffers = test_line(
            &line,
            &LineMeshOptions::width(1.0).with_end_cap(LineCap::circle(3)),
            true,
        );
        assert_eq!(buffers.vertices.len(), 7);
        for p in &buffers.vertices[4..] {
            assert!(p.y > 5.0);
        }
    }

    #[test]
    fn miter_limit() {
        // A very sharp turn.
        let line = [point(0.0, 0.0), point(10.0, 0.0), point(0.0, 1.0)];
        let width = 2.0;

        let unclamped = test_line(&line, &LineMeshOptions::width(width), false);
        let spike = (unclamped.vertices[2] - line[1]).length();
        assert!(spike > 10.0);

        let limit = 2.0;
        let clamped = test_line(
            &line,
            &LineMeshOptions::width(width).with_miter_limit(limit),
            false,
        );
        assert_eq!(clamped.vertices.len(), unclamped.vertices.len());
        assert_eq!(clamped.indices, unclamped.indices);
        for (i, p) in clamped.vertices.iter().enumerate() {
            let d = (*p - line[i / 2]).length();
            assert!(d <= limit * width * 0.5 + 1e-4);
        }
    }

    #[test]
    fn reversal() {
        let line = [point(0.0, 0.0), point(10.0, 0.0), point(0.0, 0.0)];
        let buffers = test_line(&line, &LineMeshOptions::width(2.0), false);
        assert_eq!(buffers.vertices.len(), 6);
        for p in &buffers.vertices {
            assert!(p.x.is_finite() && p.y.is_finite());
        }
        assert!((buffers.vertices[2] - line[1]).length() <= 1.0 + 1e-5);
    }

    #[test]
    fn zero_length_segments() {
        let line = [
            point(0.0, 0.0),
            point(5.0, 0.0),
            point(5.0, 0.0),
            point(10.0, 0.0),
        ];
        let buffers = test_line(&line, &LineMeshOptions::width(2.0), true);
        assert_eq!(buffers.vertices.len(), 8);
        assert!((mesh_area(&buffers) - 20.0).abs() < 1e-4);

        // All points at the same position.
        let dot = [point(1.0, 1.0); 3];
        let buffers = test_line(&dot, &LineMeshOptions::width(2.0), false);
        assert_eq!(buffers.vertices.len(), 6);
    }

    #[test]
    fn too_few_points() {
        let mut output = NoOutput::new();
        build_line_mesh(&[], &LineMeshOptions::DEFAULT, &mut output).unwrap();
        build_line_mesh(
            &[point(1.0, 1.0)],
            &LineMeshOptions::DEFAULT.with_line_cap(LineCap::circle(4)),
            &mut output,
        )
        .unwrap();
        assert_eq!(output, NoOutput::new());
    }

    #[test]
    fn invalid_arguments() {
        let line = [point(0.0, 0.0), point(1.0, 0.0)];
        let mut output = NoOutput::new();

        let cases = [
            (
                line,
                LineMeshOptions::width(f32::NAN),
                InvalidArgument::InvalidLineWidth,
            ),
            (
                line,
                LineMeshOptions::width(-1.0),
                InvalidArgument::InvalidLineWidth,
            ),
            (
                line,
                LineMeshOptions::width(1.0).with_miter_limit(0.5),
                InvalidArgument::InvalidMiterLimit,
            ),
            (
                line,
                LineMeshOptions::width(1.0).with_start_cap(LineCap::circle(0)),
                InvalidArgument::ZeroSegments,
            ),
            (
                [point(0.0, 0.0), point(f32::NAN, 0.0)],
                LineMeshOptions::width(1.0),
                InvalidArgument::PositionIsNaN,
            ),
        ];

        for (points, options, expected) in &cases {
            assert_eq!(
                build_line_mesh(points, options, &mut output),
                Err(TessellationError::InvalidArgument(*expected))
            );
        }
        assert_eq!(output, NoOutput::new());
    }

    #[test]
    fn sink_failure_aborts() {
        let mut buffers: VertexBuffers<Point, u8> = VertexBuffers::new();
        buffers.vertices.push(point(-1.0, -1.0));

        let line: Vec<Point> = (0..200).map(|i| point(i as f32, 0.0)).collect();
        let result = build_line_mesh(
            &line,
            &LineMeshOptions::width(1.0),
            &mut BuffersBuilder::new(&mut buffers, Positions),
        );

        assert_eq!(
            result,
            Err(TessellationError::GeometryBuilder(
                GeometryBuilderError::TooManyVertices
            ))
        );
        assert_eq!(buffers.vertices, vec![point(-1.0, -1.0)]);
        assert!(buffers.indices.is_empty());
    }
}
