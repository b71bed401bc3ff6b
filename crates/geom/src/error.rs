use thiserror::Error;

/// A violated precondition that the caller could have checked before the call.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InvalidArgument {
    #[error("the control polygon is empty")]
    EmptyControlPolygon,
    #[error("the number of segments must be at least one")]
    ZeroSegments,
    #[error("a polygon needs at least 3 vertices, got {0}")]
    NotEnoughVertices(usize),
    #[error("position is not a number")]
    PositionIsNaN,
    #[error("line width must be a non-negative number")]
    InvalidLineWidth,
    #[error("miter limit must be a number greater than or equal to 1")]
    InvalidMiterLimit,
}
