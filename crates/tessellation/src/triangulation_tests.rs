use crate::geom::bezier::{sample_bezier, BezierOptions};
use crate::geom::shapes::rounded_rectangle;
use crate::geom::utils::{is_point_in_triangle, polygon_signed_area, signed_area};
use crate::geom::InvalidArgument;
use crate::geometry_builder::*;
use crate::math::*;
use crate::{
    build_line_mesh, fill_polygon, triangulate_polygon, LineMeshOptions, TessellationError,
    TriangulationOptions, VertexId,
};

use alloc::vec::Vec;
use core::f32::consts::PI;

#[derive(Copy, Clone, Debug, PartialEq)]
enum Event {
    Begin,
    Triangle(u32, u32, u32),
    End,
    Abort,
}

/// Records everything the triangulator sends.
#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl Recorder {
    fn triangles(&self) -> Vec<[u32; 3]> {
        self.events
            .iter()
            .filter_map(|e| match *e {
                Event::Triangle(a, b, c) => Some([a, b, c]),
                _ => None,
            })
            .collect()
    }
}

impl IndexSink for Recorder {
    fn begin_geometry(&mut self) {
        self.events.push(Event::Begin);
    }
    fn end_geometry(&mut self) {
        self.events.push(Event::End);
    }
    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        self.events.push(Event::Triangle(a.0, b.0, c.0));
    }
    fn abort_geometry(&mut self) {
        self.events.push(Event::Abort);
    }
}

fn triangulate(
    points: &[Point],
    options: &TriangulationOptions,
) -> Result<Vec<[u32; 3]>, TessellationError> {
    let mut recorder = Recorder::default();
    triangulate_polygon(points, options, &mut recorder)?;

    assert_eq!(recorder.events.first(), Some(&Event::Begin));
    assert_eq!(recorder.events.last(), Some(&Event::End));

    Ok(recorder.triangles())
}

/// Samples closer than this to an edge are ambiguous and skipped.
const EDGE_TOLERANCE: f32 = 1e-3;

fn is_near_segment(p: Point, a: Point, b: Point) -> bool {
    let ab = b - a;
    let t = ((p - a).dot(ab) / ab.square_length()).max(0.0).min(1.0);
    (a + ab * t - p).square_length() < EDGE_TOLERANCE * EDGE_TOLERANCE
}

fn is_inside_polygon(p: Point, polygon: &[Point]) -> bool {
    let mut inside = false;
    for (i, &a) in polygon.iter().enumerate() {
        let b = polygon[(i + 1) % polygon.len()];
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
    }

    inside
}

/// Samples a grid over the polygon's bounding box. Samples inside the polygon must be
/// inside exactly one triangle, samples outside of it in none.
fn check_coverage(points: &[Point], triangles: &[[u32; 3]]) {
    const STEPS: u32 = 32;

    let bounds = Box2D::from_points(points.iter()).inflate(1.0, 1.0);

    let mut edges: Vec<(Point, Point)> = (0..points.len())
        .map(|i| (points[i], points[(i + 1) % points.len()]))
        .collect();
    for &[a, b, c] in triangles {
        let (a, b, c) = (points[a as usize], points[b as usize], points[c as usize]);
        edges.extend_from_slice(&[(a, b), (b, c), (c, a)]);
    }

    for i in 0..STEPS {
        for j in 0..STEPS {
            let p = point(
                bounds.min.x + bounds.width() * (i as f32 + 0.5) / STEPS as f32,
                bounds.min.y + bounds.height() * (j as f32 + 0.5) / STEPS as f32,
            );
            if edges.iter().any(|&(a, b)| is_near_segment(p, a, b)) {
                continue;
            }

            let count = triangles
                .iter()
                .filter(|&&[a, b, c]| {
                    let (a, b, c) = (points[a as usize], points[b as usize], points[c as usize]);
                    is_point_in_triangle(p, a, b, c)
                })
                .count();
            let expected = if is_inside_polygon(p, points) { 1 } else { 0 };
            assert_eq!(count, expected, "{:?} is covered by {} triangles", p, count);
        }
    }
}

/// Checks that the triangles are valid, all wound like the polygon, and that together
/// they cover the polygon exactly once.
fn check_triangulation(points: &[Point], triangles: &[[u32; 3]]) {
    assert_eq!(triangles.len(), points.len() - 2);

    let expected_area = polygon_signed_area(points);
    let mut area = 0.0;
    for &[a, b, c] in triangles {
        assert!(a != b && b != c && a != c);
        let n = points.len() as u32;
        assert!(a < n && b < n && c < n);

        let triangle_area =
            signed_area(points[a as usize], points[b as usize], points[c as usize]) * 0.5;
        assert!(
            triangle_area * expected_area >= 0.0,
            "triangle {:?} is not wound like the polygon",
            [a, b, c]
        );
        area += triangle_area;
    }

    assert!(
        (area - expected_area).abs() < 1e-3,
        "triangles area {} polygon area {}",
        area,
        expected_area
    );

    check_coverage(points, triangles);
}

fn check_both_algorithms(points: &[Point]) {
    let orientation = match Orientation::from_signed_area(polygon_signed_area(points)) {
        Some(orientation) => orientation,
        None => panic!("the test polygon has no area"),
    };

    let ear = triangulate(points, &TriangulationOptions::DEFAULT).unwrap();
    check_triangulation(points, &ear);

    let sweep = triangulate(points, &TriangulationOptions::monotone(orientation)).unwrap();
    check_triangulation(points, &sweep);
}

fn reversed(points: &[Point]) -> Vec<Point> {
    points.iter().rev().copied().collect()
}

fn regular_polygon(n: u32, radius: f32) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let angle = 2.0 * PI * i as f32 / n as f32 + 0.3;
            point(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

fn unit_square() -> [Point; 4] {
    [
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.0, 1.0),
        point(0.0, 1.0),
    ]
}

// A zig-zag polygon that is y-monotone with reflex vertices on both sides.
fn zig_zag() -> [Point; 9] {
    [
        point(0.0, 0.0),
        point(2.0, 1.0),
        point(1.0, 2.0),
        point(2.0, 3.0),
        point(0.0, 5.0),
        point(-1.0, 4.0),
        point(-0.5, 3.0),
        point(-2.0, 2.0),
        point(-0.5, 1.0),
    ]
}

#[test]
fn test_unit_square() {
    let square = unit_square();

    let ear = triangulate(&square, &TriangulationOptions::DEFAULT).unwrap();
    assert_eq!(ear, [[3, 0, 1], [1, 2, 3]]);
    check_triangulation(&square, &ear);

    let sweep = triangulate(
        &square,
        &TriangulationOptions::monotone(Orientation::Counterclockwise),
    )
    .unwrap();
    assert_eq!(sweep, [[0, 1, 3], [1, 2, 3]]);
    check_triangulation(&square, &sweep);
}

#[test]
fn test_clockwise_square() {
    let square = reversed(&unit_square());

    let ear = triangulate(&square, &TriangulationOptions::DEFAULT).unwrap();
    check_triangulation(&square, &ear);

    let sweep = triangulate(&square, &TriangulationOptions::monotone(Orientation::Clockwise))
        .unwrap();
    check_triangulation(&square, &sweep);
}

#[test]
fn test_single_triangle() {
    let triangle = [point(0.0, 0.0), point(1.0, 0.0), point(0.0, 1.0)];
    let triangles = triangulate(&triangle, &TriangulationOptions::DEFAULT).unwrap();
    assert_eq!(triangles, [[0, 1, 2]]);
}

#[test]
fn test_regular_polygons() {
    for n in [3, 5, 8, 64] {
        let polygon = regular_polygon(n, 10.0);
        check_both_algorithms(&polygon);
        check_both_algorithms(&reversed(&polygon));
    }

    let pentagon = regular_polygon(5, 1.0);
    let triangles = triangulate(&pentagon, &TriangulationOptions::DEFAULT).unwrap();
    assert_eq!(triangles.len(), 3);
}

#[test]
fn test_monotone_reflex_vertex() {
    let polygon = [
        point(0.0, 0.0),
        point(2.0, 1.0),
        point(1.0, 2.0),
        point(2.0, 3.0),
        point(0.0, 4.0),
    ];

    let sweep = triangulate(
        &polygon,
        &TriangulationOptions::monotone(Orientation::Counterclockwise),
    )
    .unwrap();
    assert_eq!(sweep, [[0, 1, 2], [0, 2, 4], [2, 3, 4]]);

    check_both_algorithms(&polygon);
}

#[test]
fn test_zig_zag() {
    let polygon = zig_zag();
    check_both_algorithms(&polygon);
    check_both_algorithms(&reversed(&polygon));
    assert!((polygon_signed_area(&polygon) - 10.0).abs() < 1e-5);
}

#[test]
fn test_reflex_vertices_on_the_backward_chain() {
    let polygon = [
        point(0.0, 0.0),
        point(1.0, 5.0),
        point(0.0, 6.0),
        point(-1.0, 4.0),
        point(-0.2, 3.0),
        point(-1.0, 2.0),
        point(-0.2, 1.0),
    ];
    check_both_algorithms(&polygon);
    check_both_algorithms(&reversed(&polygon));
}

#[test]
fn test_star() {
    let star: Vec<Point> = (0..10)
        .map(|i| {
            let radius = if i % 2 == 0 { 1.0 } else { 0.4 };
            let angle = PI * i as f32 / 5.0;
            point(radius * angle.cos(), radius * angle.sin())
        })
        .collect();

    let triangles = triangulate(&star, &TriangulationOptions::DEFAULT).unwrap();
    check_triangulation(&star, &triangles);

    let triangles = triangulate(&reversed(&star), &TriangulationOptions::DEFAULT).unwrap();
    check_triangulation(&reversed(&star), &triangles);
}

#[test]
fn test_comb() {
    // Not y-monotone, only ear clipping applies.
    let comb = [
        point(0.0, 0.0),
        point(5.0, 0.0),
        point(5.0, 3.0),
        point(4.0, 3.0),
        point(4.0, 1.0),
        point(3.0, 1.0),
        point(3.0, 3.0),
        point(2.0, 3.0),
        point(2.0, 1.0),
        point(1.0, 1.0),
        point(1.0, 3.0),
        point(0.0, 3.0),
    ];

    let triangles = triangulate(&comb, &TriangulationOptions::DEFAULT).unwrap();
    check_triangulation(&comb, &triangles);
    assert!((polygon_signed_area(&comb) - 11.0).abs() < 1e-5);
}

#[test]
fn test_rounded_rectangle() {
    let mut outline = Vec::new();
    rounded_rectangle(
        &Box2D::new(point(0.0, 0.0), point(20.0, 10.0)),
        3.0,
        8,
        &mut |p| outline.push(p),
    )
    .unwrap();

    check_both_algorithms(&outline);
}

#[test]
fn test_vertex_on_diagonal() {
    // The diagonal between vertices 2 and 5 passes through vertex 6.
    let polygon = [
        point(-2.0, 1.0),
        point(1.0, 0.0),
        point(6.0, 1.0),
        point(0.0, 8.0),
        point(-4.0, 7.0),
        point(-4.0, 6.0),
        point(-2.0, 5.0),
        point(-7.0, 3.0),
        point(-5.0, 2.0),
    ];
    assert_eq!(polygon_signed_area(&polygon), 52.5);

    let ear = triangulate(&polygon, &TriangulationOptions::DEFAULT).unwrap();
    assert!(!ear.contains(&[5, 6, 8]));
    check_triangulation(&polygon, &ear);

    check_both_algorithms(&polygon);
    check_both_algorithms(&reversed(&polygon));
}

#[test]
fn test_vertex_on_diagonal_not_monotone() {
    let polygon = [
        point(-1.0, 9.0),
        point(-7.0, 7.0),
        point(-2.0, 5.0),
        point(-4.0, 2.0),
        point(1.0, 0.0),
        point(1.5, 0.0),
        point(3.0, 1.0),
        point(6.0, 3.0),
        point(6.0, 5.0),
        point(3.0, 6.0),
        point(3.0, 7.0),
    ];

    let triangles = triangulate(&polygon, &TriangulationOptions::DEFAULT).unwrap();
    check_triangulation(&polygon, &triangles);

    let triangles = triangulate(&reversed(&polygon), &TriangulationOptions::DEFAULT).unwrap();
    check_triangulation(&reversed(&polygon), &triangles);
}

#[test]
fn test_grid_aligned_monotone_polygons() {
    // Integer coordinates, with collinear vertices and vertices lying on diagonals.
    let polygons = [
        alloc::vec![
            point(0.0, 0.0),
            point(2.0, 0.0),
            point(4.0, 0.0),
            point(4.0, 2.0),
            point(5.0, 4.0),
            point(4.0, 6.0),
            point(2.0, 6.0),
            point(0.0, 6.0),
            point(1.0, 4.0),
            point(0.0, 2.0),
        ],
        alloc::vec![
            point(0.0, 0.0),
            point(3.0, 1.0),
            point(3.0, 3.0),
            point(5.0, 5.0),
            point(3.0, 7.0),
            point(0.0, 8.0),
            point(-2.0, 6.0),
            point(-2.0, 4.0),
            point(0.0, 3.0),
            point(-3.0, 1.0),
        ],
        alloc::vec![
            point(0.0, 0.0),
            point(1.0, 1.0),
            point(2.0, 2.0),
            point(3.0, 3.0),
            point(2.0, 4.0),
            point(1.0, 5.0),
            point(0.0, 6.0),
            point(-1.0, 3.0),
        ],
    ];

    for polygon in &polygons {
        check_both_algorithms(polygon);
        check_both_algorithms(&reversed(polygon));
    }
}

#[test]
fn test_bowtie() {
    let bowtie = [
        point(0.0, 0.0),
        point(1.0, 1.0),
        point(1.0, 0.0),
        point(0.0, 1.0),
    ];

    let mut recorder = Recorder::default();
    assert_eq!(
        triangulate_polygon(&bowtie, &TriangulationOptions::DEFAULT, &mut recorder),
        Err(TessellationError::DegeneratePolygon {
            emitted_triangles: 0
        })
    );
    assert_eq!(recorder.events, [Event::Begin, Event::Abort]);
}

#[test]
fn test_collinear_points() {
    let line = [point(0.0, 0.0), point(1.0, 1.0), point(2.0, 2.0)];
    assert_eq!(
        triangulate(&line, &TriangulationOptions::DEFAULT),
        Err(TessellationError::DegeneratePolygon {
            emitted_triangles: 0
        })
    );
}

#[test]
fn test_self_intersection_after_some_ears() {
    // Self-intersecting, with two ears that can be clipped before getting stuck.
    let polygon = [
        point(0.0, 0.0),
        point(6.0, 0.0),
        point(6.0, 6.0),
        point(3.0, -1.0),
        point(0.0, 6.0),
        point(3.0, 7.0),
    ];

    let mut recorder = Recorder::default();
    assert_eq!(
        triangulate_polygon(&polygon, &TriangulationOptions::DEFAULT, &mut recorder),
        Err(TessellationError::DegeneratePolygon {
            emitted_triangles: 2
        })
    );
    assert_eq!(
        recorder.events,
        [
            Event::Begin,
            Event::Triangle(5, 0, 1),
            Event::Triangle(5, 1, 2),
            Event::Abort,
        ]
    );

    // Buffer-backed sinks discard the partial output.
    let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
    fill_polygon(
        &unit_square(),
        &TriangulationOptions::DEFAULT,
        &mut simple_builder(&mut buffers),
    )
    .unwrap();
    assert!(fill_polygon(
        &polygon,
        &TriangulationOptions::DEFAULT,
        &mut simple_builder(&mut buffers),
    )
    .is_err());
    assert_eq!(buffers.vertices.len(), 4);
    assert_eq!(buffers.indices.len(), 6);
}

#[test]
fn test_invalid_arguments() {
    let mut recorder = Recorder::default();

    assert_eq!(
        triangulate_polygon(
            &[point(0.0, 0.0), point(1.0, 0.0)],
            &TriangulationOptions::DEFAULT,
            &mut recorder,
        ),
        Err(TessellationError::InvalidArgument(
            InvalidArgument::NotEnoughVertices(2)
        ))
    );
    assert_eq!(
        triangulate_polygon(&[], &TriangulationOptions::DEFAULT, &mut recorder),
        Err(TessellationError::InvalidArgument(
            InvalidArgument::NotEnoughVertices(0)
        ))
    );
    assert_eq!(
        triangulate_polygon(
            &[point(0.0, 0.0), point(1.0, f32::NAN), point(0.0, 1.0)],
            &TriangulationOptions::monotone(Orientation::Counterclockwise),
            &mut recorder,
        ),
        Err(TessellationError::InvalidArgument(
            InvalidArgument::PositionIsNaN
        ))
    );

    // Nothing reaches the sink when the input is rejected.
    assert!(recorder.events.is_empty());
}

#[test]
fn test_inverted_winding() {
    let square = unit_square();
    let mut triangles = Vec::new();
    triangulate_polygon(
        &square,
        &TriangulationOptions::DEFAULT,
        &mut InvertWinding(|a: VertexId, b: VertexId, c: VertexId| {
            triangles.push([a.0, b.0, c.0])
        }),
    )
    .unwrap();

    for &[a, b, c] in &triangles {
        assert!(signed_area(square[a as usize], square[b as usize], square[c as usize]) < 0.0);
    }
}

#[test]
fn test_fill_polygon() {
    let mut buffers: VertexBuffers<(Point, usize), u32> = VertexBuffers::new();
    let ctor = |v: MeshVertex| (v.position(), v.source());

    let triangle = [point(5.0, 5.0), point(6.0, 5.0), point(5.0, 6.0)];
    fill_polygon(
        &triangle,
        &TriangulationOptions::DEFAULT,
        &mut BuffersBuilder::new(&mut buffers, ctor),
    )
    .unwrap();

    let square = unit_square();
    fill_polygon(
        &square,
        &TriangulationOptions::DEFAULT,
        &mut BuffersBuilder::new(&mut buffers, ctor),
    )
    .unwrap();

    assert_eq!(buffers.vertices.len(), 7);
    assert_eq!(buffers.vertices[3], (point(0.0, 0.0), 0));
    assert_eq!(buffers.vertices[6], (point(0.0, 1.0), 3));

    assert_eq!(buffers.indices[..3], [0, 1, 2]);
    assert_eq!(buffers.indices[3..], [6, 3, 4, 4, 5, 6]);
}

#[test]
fn test_fill_polygon_too_many_vertices() {
    let polygon = regular_polygon(300, 10.0);
    let mut buffers: VertexBuffers<Point, u8> = VertexBuffers::new();

    assert_eq!(
        fill_polygon(
            &polygon,
            &TriangulationOptions::DEFAULT,
            &mut BuffersBuilder::new(&mut buffers, Positions),
        ),
        Err(TessellationError::GeometryBuilder(
            GeometryBuilderError::TooManyVertices
        ))
    );
    assert!(buffers.vertices.is_empty());
    assert!(buffers.indices.is_empty());
}

#[test]
fn test_sampled_curve_to_stroke_and_fill() {
    let num_segments = 16;
    let mut curve = Vec::new();
    sample_bezier(
        &[
            point(0.0, 0.0),
            point(10.0, 20.0),
            point(20.0, -20.0),
            point(30.0, 0.0),
        ],
        &BezierOptions::segments(num_segments),
        &mut |p| curve.push(p),
    )
    .unwrap();

    for pair in curve.windows(2) {
        assert!((pair[1] - pair[0]).square_length() > 0.0);
    }

    let mut mesh: VertexBuffers<Point, u16> = VertexBuffers::new();
    build_line_mesh(&curve, &LineMeshOptions::width(2.0), &mut simple_builder(&mut mesh))
        .unwrap();
    assert_eq!(mesh.vertices.len() as u32, 2 * (num_segments + 1));
    assert_eq!(mesh.indices.len() as u32, 3 * 2 * num_segments);
    for triangle in mesh.indices.chunks(3) {
        let [a, b, c] = [0, 1, 2].map(|i| mesh.vertices[triangle[i] as usize]);
        assert!(signed_area(a, b, c).abs() > 1e-3, "zero-area triangle {:?}", triangle);
    }

    // Closing an arch with a straight line gives a polygon to fill.
    let mut arch = Vec::new();
    sample_bezier(
        &[point(0.0, 0.0), point(10.0, 20.0), point(20.0, 0.0)],
        &BezierOptions::segments(num_segments),
        &mut |p| arch.push(p),
    )
    .unwrap();
    arch.reverse();

    let mut output = NoOutput::new();
    fill_polygon(&arch, &TriangulationOptions::DEFAULT, &mut output).unwrap();
    assert_eq!(output.vertices, num_segments + 1);
    assert_eq!(output.triangles, num_segments - 1);
}
