use crate::geom::InvalidArgument;
use thiserror::Error;

/// The result type of the tessellators.
pub type TessellationResult = Result<(), TessellationError>;

/// An error that can happen while generating geometry.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeometryBuilderError {
    #[error("Invalid vertex")]
    InvalidVertex,
    #[error("Too many vertices")]
    TooManyVertices,
}

/// The tessellators' error enumeration.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TessellationError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
    /// The polygon has no area or is self-intersecting.
    ///
    /// The triangles emitted before the failure was detected are counted in
    /// `emitted_triangles`. The sink's `abort_geometry` was called, so buffer
    /// backed sinks already discarded them.
    #[error("Degenerate polygon ({emitted_triangles} triangles emitted)")]
    DegeneratePolygon { emitted_triangles: u32 },
    #[error("Geometry builder error: {0}")]
    GeometryBuilder(#[from] GeometryBuilderError),
}
