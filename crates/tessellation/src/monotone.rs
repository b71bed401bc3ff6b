use crate::geom::utils::signed_area;
use crate::geom::Orientation;
use crate::geometry_builder::IndexSink;
use crate::math::{point, Point};
use crate::VertexId;

use alloc::vec::Vec;

/// Which part of the boundary of a y-monotone polygon a vertex belongs to.
///
/// The boundary is split at its first and last vertices in sweep order. The forward
/// chain is reached from the first vertex by walking the polygon in increasing index
/// order, the backward chain in decreasing index order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Chain {
    Forward,
    Backward,
}

impl Chain {
    pub fn opposite(self) -> Self {
        match self {
            Chain::Forward => Chain::Backward,
            Chain::Backward => Chain::Forward,
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct MonotoneVertex {
    pos: Point,
    id: VertexId,
    chain: Chain,
}

/// Generates a triangulation from the vertices of a y-monotone polygon, visited in
/// sweep order (increasing y, then increasing x).
pub(crate) struct MonotoneTessellator {
    stack: Vec<MonotoneVertex>,
    previous: MonotoneVertex,
    orientation: Orientation,
    triangles: Vec<(VertexId, VertexId, VertexId)>,
}

impl MonotoneTessellator {
    pub fn new(orientation: Orientation) -> Self {
        MonotoneTessellator {
            stack: Vec::new(),
            triangles: Vec::new(),
            orientation,
            // Some placeholder value that will be replaced right away.
            previous: MonotoneVertex {
                pos: point(0.0, 0.0),
                id: VertexId(0),
                chain: Chain::Backward,
            },
        }
    }

    pub fn begin(&mut self, pos: Point, id: VertexId) {
        debug_assert!(id != VertexId::INVALID);
        let first = MonotoneVertex {
            pos,
            id,
            chain: Chain::Backward,
        };
        self.previous = first;

        self.triangles.clear();
        self.triangles.reserve(16);

        self.stack.clear();
        self.stack.reserve(16);
        self.stack.push(first);
    }

    #[inline]
    pub fn vertex(&mut self, pos: Point, id: VertexId, chain: Chain) {
        self.monotone_vertex(MonotoneVertex { pos, id, chain });
    }

    fn monotone_vertex(&mut self, current: MonotoneVertex) {
        debug_assert!(current.id != VertexId::INVALID);
        debug_assert!(current.pos.y >= self.previous.pos.y);
        debug_assert!(!self.stack.is_empty());

        if current.chain != self.previous.chain {
            // Every vertex of the stack sees the new vertex across the polygon.
            for i in 0..(self.stack.len() - 1) {
                let a = self.stack[i];
                let b = self.stack[i + 1];
                self.push_triangle(&a, &b, &current);
            }
            self.stack.clear();
            self.stack.push(self.previous);
        } else {
            let mut last_popped = self.stack.pop();
            while let (Some(a), Some(&b)) = (last_popped, self.stack.last()) {
                if !self.sees_over(&b, &a, &current) {
                    break;
                }
                self.push_triangle(&b, &a, &current);
                last_popped = self.stack.pop();
            }
            if let Some(item) = last_popped {
                self.stack.push(item);
            }
        }

        self.stack.push(current);
        self.previous = current;
    }

    /// Whether the diagonal `(b, current)` passes inside the polygon, that is whether
    /// the chain vertex `a` between them is convex.
    fn sees_over(
        &self,
        b: &MonotoneVertex,
        a: &MonotoneVertex,
        current: &MonotoneVertex,
    ) -> bool {
        let forward_turn = (current.chain == Chain::Forward)
            == (self.orientation == Orientation::Counterclockwise);
        let area = signed_area(b.pos, a.pos, current.pos);

        if forward_turn {
            area > 0.0
        } else {
            area < 0.0
        }
    }

    pub fn end(&mut self, pos: Point, id: VertexId) {
        let chain = self.previous.chain.opposite();
        self.vertex(pos, id, chain);
        self.stack.clear();
    }

    #[inline]
    fn push_triangle(&mut self, a: &MonotoneVertex, b: &MonotoneVertex, c: &MonotoneVertex) {
        debug_assert!(a.id != b.id);
        debug_assert!(b.id != c.id);
        debug_assert!(a.id != c.id);

        let area = signed_area(a.pos, b.pos, c.pos);
        if area * self.orientation.sign::<f32>() < 0.0 {
            self.triangles.push((a.id, c.id, b.id));
        } else {
            self.triangles.push((a.id, b.id, c.id));
        }
    }

    #[cfg(test)]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    pub fn flush<S: IndexSink + ?Sized>(&mut self, output: &mut S) {
        for &(a, b, c) in &self.triangles {
            output.add_triangle(a, b, c);
        }
        self.triangles.clear();
    }
}

#[cfg(test)]
fn triangle_area(positions: &[Point], tess: &MonotoneTessellator) -> f32 {
    tess.triangles
        .iter()
        .map(|&(a, b, c)| {
            signed_area(
                positions[a.to_usize()],
                positions[b.to_usize()],
                positions[c.to_usize()],
            ) * 0.5
        })
        .sum()
}

#[test]
fn test_monotone_tess() {
    {
        let positions = [point(0.0, 0.0), point(-1.0, 1.0), point(1.0, 2.0)];
        let mut tess = MonotoneTessellator::new(Orientation::Clockwise);
        tess.begin(positions[0], VertexId(0));
        tess.vertex(positions[1], VertexId(1), Chain::Forward);
        tess.end(positions[2], VertexId(2));
        assert_eq!(tess.num_triangles(), 1);
        assert!(triangle_area(&positions, &tess) < 0.0);
    }
    {
        // Reflex vertices on the forward chain of a counterclockwise polygon.
        let positions = [
            point(0.0, 0.0),
            point(1.0, 1.0),
            point(3.0, 2.0),
            point(1.0, 3.0),
            point(1.0, 4.0),
            point(4.0, 5.0),
            point(0.0, 6.0),
        ];
        let mut tess = MonotoneTessellator::new(Orientation::Counterclockwise);
        tess.begin(positions[0], VertexId(0));
        for i in 1..6 {
            tess.vertex(positions[i], VertexId(i as u32), Chain::Forward);
        }
        tess.end(positions[6], VertexId(6));
        assert_eq!(tess.num_triangles(), 5);
        let expected = crate::geom::utils::polygon_signed_area(&positions);
        assert!((triangle_area(&positions, &tess) - expected).abs() < 1e-5);
    }
    {
        // Alternating chains.
        let positions = [
            point(0.0, 0.0),
            point(1.0, 1.0),
            point(-1.5, 2.0),
            point(-1.0, 3.0),
            point(1.0, 4.0),
            point(0.0, 5.0),
        ];
        let chains = [
            Chain::Forward,
            Chain::Backward,
            Chain::Backward,
            Chain::Forward,
        ];
        let mut tess = MonotoneTessellator::new(Orientation::Counterclockwise);
        tess.begin(positions[0], VertexId(0));
        for i in 1..5 {
            tess.vertex(positions[i], VertexId(i as u32), chains[i - 1]);
        }
        tess.end(positions[5], VertexId(5));
        assert_eq!(tess.num_triangles(), 4);

        let mut count = 0;
        tess.flush(&mut |_: VertexId, _: VertexId, _: VertexId| count += 1);
        assert_eq!(count, 4);
        assert_eq!(tess.num_triangles(), 0);
    }
}
