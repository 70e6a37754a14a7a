// Workflow graph error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Workflow graph error code constants
///
/// Error code range: 3001-3005
pub struct GraphErrorCodes {}

impl GraphErrorCodes {
    /// Document is not valid graph JSON
    pub const PARSE: i32 = 3001;

    /// Graph has no nodes
    pub const EMPTY_GRAPH: i32 = 3002;

    /// Two nodes share an id
    pub const DUPLICATE_NODE_ID: i32 = 3003;

    /// Edge references a node id that does not exist
    pub const DANGLING_EDGE: i32 = 3004;

    /// Start node policy did not resolve to a node
    pub const MISSING_START_NODE: i32 = 3005;
}

/// Log a graph error with structured context
pub fn log_graph_error(err: &GraphError, context: &str) {
    error!(
        "Graph error in {}: code={}, component=WorkflowGraph, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised while loading or entering a workflow graph
///
/// The authoring tool is a separate producer, so none of these abort a
/// presentation: the state machine reports them as a "no content" state.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// JSON could not be parsed into a graph document
    Parse { reason: String },

    /// Graph contains no nodes
    EmptyGraph,

    /// Node id declared more than once
    DuplicateNodeId { id: String },

    /// Edge endpoint does not name an existing node
    DanglingEdge { edge_id: String, endpoint: String },

    /// No node satisfies the start node policy
    MissingStartNode { policy: String },
}

impl ErrorCode for GraphError {
    fn code(&self) -> i32 {
        match self {
            GraphError::Parse { .. } => GraphErrorCodes::PARSE,
            GraphError::EmptyGraph => GraphErrorCodes::EMPTY_GRAPH,
            GraphError::DuplicateNodeId { .. } => GraphErrorCodes::DUPLICATE_NODE_ID,
            GraphError::DanglingEdge { .. } => GraphErrorCodes::DANGLING_EDGE,
            GraphError::MissingStartNode { .. } => GraphErrorCodes::MISSING_START_NODE,
        }
    }

    fn message(&self) -> String {
        match self {
            GraphError::Parse { reason } => format!("Failed to parse workflow graph: {}", reason),
            GraphError::EmptyGraph => "Workflow graph has no slides".to_string(),
            GraphError::DuplicateNodeId { id } => format!("Duplicate node id '{}'", id),
            GraphError::DanglingEdge { edge_id, endpoint } => {
                format!("Edge '{}' references unknown node '{}'", edge_id, endpoint)
            }
            GraphError::MissingStartNode { policy } => {
                format!("No start node found for policy {}", policy)
            }
        }
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GraphError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for GraphError {}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::Parse {
            reason: err.to_string(),
        }
    }
}
