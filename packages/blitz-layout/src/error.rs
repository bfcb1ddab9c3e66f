//! Error types for tree mutation, queries and layout computation.

use thiserror::Error;

use crate::tree::NodeId;

/// Errors surfaced by [`LayoutTree`](crate::LayoutTree) operations.
///
/// All of these indicate a usage error by the caller and are never retried internally.
#[derive(Error, Debug)]
pub enum LayoutTreeError {
    #[error("Node {node} does not exist in this tree")]
    NotFound { node: NodeId },

    #[error("Child index {index} is out of bounds for node {parent} with {child_count} children")]
    OutOfBounds {
        parent: NodeId,
        index: usize,
        child_count: usize,
    },

    #[error("Node {child} is not a child of node {parent}")]
    InvalidChild { parent: NodeId, child: NodeId },

    #[error("Adding node {child} under node {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("Measuring node {node} failed: {source}")]
    Measure {
        node: NodeId,
        #[source]
        source: MeasureError,
    },
}

impl LayoutTreeError {
    pub fn not_found(node: NodeId) -> Self {
        Self::NotFound { node }
    }

    pub fn out_of_bounds(parent: NodeId, index: usize, child_count: usize) -> Self {
        Self::OutOfBounds {
            parent,
            index,
            child_count,
        }
    }

    pub fn invalid_child(parent: NodeId, child: NodeId) -> Self {
        Self::InvalidChild { parent, child }
    }
}

/// Failure reported by a measure function
#[derive(Error, Debug)]
#[error(transparent)]
pub struct MeasureError(#[from] Box<dyn std::error::Error + Send + Sync>);

impl MeasureError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into().into())
    }
}

/// Result type for tree operations
pub type LayoutResult<T> = Result<T, LayoutTreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_message_names_the_index() {
        let error = LayoutTreeError::out_of_bounds(NodeId::new(3, 1), 7, 2);
        let message = error.to_string();
        assert!(message.contains("index 7"), "unexpected message: {message}");
        assert!(message.contains("2 children"), "unexpected message: {message}");
    }

    #[test]
    fn measure_error_wraps_a_message() {
        let error = MeasureError::new("font missing");
        assert_eq!(error.to_string(), "font missing");
    }
}
