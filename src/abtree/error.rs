use thiserror::Error;

use super::node::NodeId;

/// Errors that can occur during alpha-balanced tree operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbTreeError {
    #[error("Invalid balance ratio: {top}/{bottom} (must lie strictly between 1/2 and 1)")]
    InvalidRatio { top: u32, bottom: u32 },

    #[error("No more elements")]
    NoMoreElements,

    #[error("Invalid iterator state: {0}")]
    InvalidState(String),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
}

pub type AbTreeResult<T> = Result<T, AbTreeError>;
