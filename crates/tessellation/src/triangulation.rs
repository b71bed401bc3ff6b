use crate::geom::utils::{is_point_in_closed_triangle, polygon_signed_area, signed_area};
use crate::geom::{InvalidArgument, Orientation};
use crate::geometry_builder::{IndexSink, MeshSink, MeshVertex};
use crate::math::Point;
use crate::monotone::{Chain, MonotoneTessellator};
use crate::{TessellationError, TessellationResult, TriangulationOptions, VertexId};

use alloc::vec::Vec;
use core::cmp::Ordering;

/// Triangulates a simple polygon.
///
/// The polygon is described by its vertices and is implicitly closed. The triangles are
/// emitted as triples of indices into `vertices`, no new vertex is created.
///
/// ## Algorithms
///
/// By default the polygon is triangulated by ear clipping, which handles any simple
/// polygon in `O(n²)` to `O(n³)` time. The winding of the input is detected from its
/// signed area and the emitted triangles have the same winding as the polygon.
///
/// When [`TriangulationOptions::y_monotone`] is set, the polygon is instead assumed to
/// be monotone with respect to the y axis and to have the declared orientation, and is
/// triangulated in a single sweep. Both are the caller's responsibility, they are only
/// verified in debug builds. The emitted triangles are wound according to the declared
/// orientation.
///
/// ## Errors
///
/// Polygons with fewer than three vertices or with NaN positions are rejected before
/// anything is emitted.
///
/// If ear clipping fails to make progress, which happens with self-intersecting polygons
/// or polygons with no area, a [`TessellationError::DegeneratePolygon`] error counting
/// the triangles emitted so far is returned and `abort_geometry` is called on the output.
///
/// # Examples
///
/// ```
/// use aether_tessellation::{triangulate_polygon, TriangulationOptions, VertexId};
/// use aether_tessellation::math::point;
///
/// let square = [point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0), point(0.0, 1.0)];
///
/// let mut triangles = Vec::new();
/// triangulate_polygon(
///     &square,
///     &TriangulationOptions::DEFAULT,
///     &mut |a: VertexId, b: VertexId, c: VertexId| triangles.push([a.0, b.0, c.0]),
/// ).unwrap();
///
/// assert_eq!(triangles.len(), 2);
/// ```
pub fn triangulate_polygon(
    vertices: &[Point],
    options: &TriangulationOptions,
    output: &mut dyn IndexSink,
) -> TessellationResult {
    validate(vertices)?;

    output.begin_geometry();

    let result = triangulate(vertices, options, output);

    finish(result, output)
}

/// Emits the vertices of a simple polygon and triangulates it.
///
/// The vertex of the input point `i` has id `i` and source `i`. This is the same as
/// calling [`triangulate_polygon`] after having pushed the points into a vertex buffer,
/// except that sinks like [`BuffersBuilder`](crate::geometry_builder::BuffersBuilder)
/// see both streams in the same geometry and offset the indices accordingly.
pub fn fill_polygon(
    vertices: &[Point],
    options: &TriangulationOptions,
    output: &mut dyn MeshSink,
) -> TessellationResult {
    validate(vertices)?;

    output.begin_geometry();

    let mut result = Ok(());
    for (source, &position) in vertices.iter().enumerate() {
        if let Err(e) = output.add_vertex(MeshVertex { position, source }) {
            result = Err(e.into());
            break;
        }
    }

    if result.is_ok() {
        result = triangulate(vertices, options, output);
    }

    finish(result, output)
}

fn validate(vertices: &[Point]) -> Result<(), InvalidArgument> {
    if vertices.len() < 3 {
        return Err(InvalidArgument::NotEnoughVertices(vertices.len()));
    }

    if vertices.iter().any(|p| p.x.is_nan() || p.y.is_nan()) {
        return Err(InvalidArgument::PositionIsNaN);
    }

    Ok(())
}

fn finish<S: IndexSink + ?Sized>(result: TessellationResult, output: &mut S) -> TessellationResult {
    match result {
        Ok(()) => output.end_geometry(),
        Err(_) => output.abort_geometry(),
    }

    result
}

fn triangulate<S: IndexSink + ?Sized>(
    vertices: &[Point],
    options: &TriangulationOptions,
    output: &mut S,
) -> TessellationResult {
    if options.y_monotone {
        triangulate_monotone(vertices, options.orientation, output);
        Ok(())
    } else {
        ear_clipping(vertices, output)
    }
}

/// Ear clipping, emitting directly into the output.
///
/// On failure the error counts the triangles that were already emitted.
fn ear_clipping<S: IndexSink + ?Sized>(
    vertices: &[Point],
    output: &mut S,
) -> TessellationResult {
    let area = polygon_signed_area(vertices);
    let sign = match Orientation::from_signed_area(area) {
        Some(orientation) => orientation.sign::<f32>(),
        None => {
            log::warn!(
                "cannot triangulate a polygon with {} vertices and no area",
                vertices.len()
            );
            return Err(TessellationError::DegeneratePolygon {
                emitted_triangles: 0,
            });
        }
    };

    let mut remaining: Vec<usize> = (0..vertices.len()).collect();
    let mut emitted_triangles = 0;

    while remaining.len() > 3 {
        let n = remaining.len();
        let ear = match find_ear(vertices, &remaining, sign) {
            Some(ear) => ear,
            None => {
                log::warn!(
                    "no ear found among {} remaining vertices after {} triangles, \
                     the polygon is probably self-intersecting",
                    n,
                    emitted_triangles
                );
                return Err(TessellationError::DegeneratePolygon { emitted_triangles });
            }
        };

        output.add_triangle(
            VertexId::from_usize(remaining[(ear + n - 1) % n]),
            VertexId::from_usize(remaining[ear]),
            VertexId::from_usize(remaining[(ear + 1) % n]),
        );
        emitted_triangles += 1;

        remaining.remove(ear);
    }

    let (a, b, c) = (remaining[0], remaining[1], remaining[2]);
    if signed_area(vertices[a], vertices[b], vertices[c]) * sign <= 0.0 {
        log::warn!(
            "the last triangle is not wound like the polygon after {} triangles",
            emitted_triangles
        );
        return Err(TessellationError::DegeneratePolygon { emitted_triangles });
    }

    output.add_triangle(
        VertexId::from_usize(a),
        VertexId::from_usize(b),
        VertexId::from_usize(c),
    );

    Ok(())
}

/// Position in `remaining` of the first ear, if any.
fn find_ear(vertices: &[Point], remaining: &[usize], sign: f32) -> Option<usize> {
    let n = remaining.len();
    (0..n).find(|&i| {
        let prev = remaining[(i + n - 1) % n];
        let curr = remaining[i];
        let next = remaining[(i + 1) % n];
        let (a, b, c) = (vertices[prev], vertices[curr], vertices[next]);

        if signed_area(a, b, c) * sign <= 0.0 {
            return false;
        }

        // A vertex on the diagonal blocks the ear as well, otherwise the remaining
        // polygon would touch itself.
        !remaining
            .iter()
            .map(|&j| vertices[j])
            .filter(|&p| p != a && p != b && p != c)
            .any(|p| is_point_in_closed_triangle(p, a, b, c))
    })
}

/// Sweeps a y-monotone polygon from bottom to top.
fn triangulate_monotone<S: IndexSink + ?Sized>(
    vertices: &[Point],
    orientation: Orientation,
    output: &mut S,
) {
    debug_assert!(crate::geom::utils::is_y_monotone(vertices));
    debug_assert!(
        Orientation::from_signed_area(polygon_signed_area(vertices)) == Some(orientation),
        "the polygon does not have the declared orientation"
    );

    let n = vertices.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        let (pa, pb) = (vertices[a], vertices[b]);
        pa.y.partial_cmp(&pb.y)
            .unwrap_or(Ordering::Equal)
            .then(pa.x.partial_cmp(&pb.x).unwrap_or(Ordering::Equal))
            .then(a.cmp(&b))
    });

    let first = order[0];
    let last = order[n - 1];

    let mut chains = alloc::vec![Chain::Backward; n];
    let mut i = (first + 1) % n;
    while i != last {
        chains[i] = Chain::Forward;
        i = (i + 1) % n;
    }

    let mut tess = MonotoneTessellator::new(orientation);
    tess.begin(vertices[first], VertexId::from_usize(first));
    for &i in &order[1..n - 1] {
        tess.vertex(vertices[i], VertexId::from_usize(i), chains[i]);
    }
    tess.end(vertices[last], VertexId::from_usize(last));

    tess.flush(output);
}
