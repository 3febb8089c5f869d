//! This module contains all custom errors used in this library.

use std::fmt;
use std::error::Error;
use crate::milp::SolveStatus;

/// Rejected generator parameters. Raised before any edge is emitted.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ConfigError {
    /// A snark needs at least one block to close the ring.
    NoBlocks,
    /// Every linking vertex consumes three block tails, so `3 * linking` may not exceed `blocks`.
    TooManyLinkingVertices { linking: usize, blocks: usize },
    UnknownPolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoBlocks => write!(f, "Config: at least one block is required."),
            Self::TooManyLinkingVertices { linking, blocks } => write!(
                f,
                "Config: {} linking vertices need {} block tails, but only {} blocks exist.",
                linking,
                3 * linking,
                blocks
            ),
            Self::UnknownPolicy(name) => write!(
                f,
                "Config: unknown link policy `{}` (expected `random`, `direct` or `crossed`).",
                name
            ),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingError {
    GraphError(String),
    /// The solver stopped with a status other than `Optimal`. No labels are available.
    NotOptimal(SolveStatus),
    InvalidSolution(String),
}

impl fmt::Display for ProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GraphError(msg) => write!(f, "Graph error: {}", msg),
            Self::NotOptimal(status) => write!(f, "The solver could not find an optimal solution ({})", status),
            Self::InvalidSolution(msg) => write!(f, "InvalidSolution: {}", msg),
        }
    }
}

impl Error for ProcessingError {}
