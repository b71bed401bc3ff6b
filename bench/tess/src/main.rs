#[macro_use]
extern crate bencher;

use aether_mesh::geom::bezier::{sample_bezier, BezierOptions};
use aether_mesh::geom::shapes::rounded_rectangle;
use aether_mesh::math::{point, Box2D, Orientation, Point};
use aether_mesh::tessellation::geometry_builder::{simple_builder, NoOutput, VertexBuffers};
use aether_mesh::tessellation::{
    build_line_mesh, triangulate_polygon, LineCap, LineMeshOptions, TriangulationOptions,
};

use bencher::Bencher;

const N: usize = 100;

fn wave(num_points: usize) -> Vec<Point> {
    (0..num_points)
        .map(|i| {
            let x = i as f32;
            point(x, (x * 0.3).sin() * 20.0)
        })
        .collect()
}

fn star(num_branches: usize) -> Vec<Point> {
    let n = num_branches * 2;
    (0..n)
        .map(|i| {
            let radius = if i % 2 == 0 { 100.0 } else { 40.0 };
            let angle = std::f32::consts::PI * 2.0 * i as f32 / n as f32;
            point(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

fn rounded_rect_outline() -> Vec<Point> {
    let mut outline = Vec::new();
    rounded_rectangle(
        &Box2D::new(point(0.0, 0.0), point(300.0, 100.0)),
        20.0,
        16,
        &mut |p| outline.push(p),
    )
    .unwrap();
    outline
}

fn stroke_wave(bench: &mut Bencher) {
    let line = wave(500);
    let options = LineMeshOptions::width(3.0).with_line_cap(LineCap::circle(8));

    bench.iter(|| {
        for _ in 0..N {
            let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::with_capacity(1024, 3072);
            build_line_mesh(&line, &options, &mut simple_builder(&mut buffers)).unwrap();
        }
    })
}

fn stroke_wave_no_output(bench: &mut Bencher) {
    let line = wave(500);
    let options = LineMeshOptions::width(3.0).with_miter_limit(4.0);

    bench.iter(|| {
        for _ in 0..N {
            build_line_mesh(&line, &options, &mut NoOutput::new()).unwrap();
        }
    })
}

fn ear_clipping_star(bench: &mut Bencher) {
    let polygon = star(50);

    bench.iter(|| {
        for _ in 0..N {
            triangulate_polygon(&polygon, &TriangulationOptions::DEFAULT, &mut NoOutput::new())
                .unwrap();
        }
    })
}

fn ear_clipping_rounded_rect(bench: &mut Bencher) {
    let polygon = rounded_rect_outline();

    bench.iter(|| {
        for _ in 0..N {
            triangulate_polygon(&polygon, &TriangulationOptions::DEFAULT, &mut NoOutput::new())
                .unwrap();
        }
    })
}

fn monotone_rounded_rect(bench: &mut Bencher) {
    let polygon = rounded_rect_outline();
    let options = TriangulationOptions::monotone(Orientation::Counterclockwise);

    bench.iter(|| {
        for _ in 0..N {
            triangulate_polygon(&polygon, &options, &mut NoOutput::new()).unwrap();
        }
    })
}

fn sample_cubic(bench: &mut Bencher) {
    let ctrl = [
        point(0.0, 0.0),
        point(30.0, 100.0),
        point(70.0, -100.0),
        point(100.0, 0.0),
    ];
    let options = BezierOptions::segments(64);
    let mut points = Vec::with_capacity(65);

    bench.iter(|| {
        for _ in 0..N {
            points.clear();
            sample_bezier(&ctrl, &options, &mut |p| points.push(p)).unwrap();
        }
    })
}

benchmark_group!(stroke, stroke_wave, stroke_wave_no_output);

benchmark_group!(
    triangulation,
    ear_clipping_star,
    ear_clipping_rounded_rect,
    monotone_rounded_rect
);

benchmark_group!(sampling, sample_cubic);

benchmark_main!(stroke, triangulation, sampling);
