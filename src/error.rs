use crate::ir::{NodeId, Position};
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed markup at byte {offset}: {message}")]
    MalformedMarkup { message: String, offset: usize },

    #[error("Cannot resolve {endpoint} of edge {edge}: {target}")]
    UnresolvedEdgeEndpoint {
        edge: usize,
        endpoint: EdgeEnd,
        target: Endpoint,
    },

    #[error("Malformed wire format: {message}")]
    MalformedWireFormat { message: String },

    #[error("Diagram grid of {width}x{height} cells is too large")]
    GridTooLarge { width: u64, height: u64 },
}

impl Error {
    pub(crate) fn markup(message: impl Into<String>, offset: usize) -> Self {
        Self::MalformedMarkup {
            message: message.into(),
            offset,
        }
    }

    pub(crate) fn wire(message: impl fmt::Display) -> Self {
        Self::MalformedWireFormat {
            message: message.to_string(),
        }
    }

    /// Grid spanned by the corners `min` and `max`, both inclusive.
    pub(crate) fn grid(min: Position, max: Position) -> Self {
        let span = |lo: i32, hi: i32| (i64::from(hi) - i64::from(lo) + 1) as u64;
        Self::GridTooLarge {
            width: span(min.x, max.x),
            height: span(min.y, max.y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEnd {
    From,
    To,
}

impl fmt::Display for EdgeEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::From => f.write_str("source"),
            Self::To => f.write_str("target"),
        }
    }
}

/// How an unresolved edge endpoint was addressed when lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Grid coordinate from an arrow directive.
    Position(Position),
    /// Array index in the wire form.
    Index(usize),
    /// Node identity in the model.
    Id(NodeId),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(pos) => write!(f, "no node at position ({}, {})", pos.x, pos.y),
            Self::Index(idx) => write!(f, "no node at index {idx}"),
            Self::Id(id) => write!(f, "no node with id {id}"),
        }
    }
}
