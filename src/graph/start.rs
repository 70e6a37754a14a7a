// StartNodePolicy - which slide a presentation opens on
//
// Authoring tools disagree on what the "root" of a workflow is, so the
// choice is an explicit policy rather than a guess.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::GraphError;
use crate::graph::{SlideNode, WorkflowGraph};

/// Start node selection policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartNodePolicy {
    /// First node in authored order
    #[default]
    FirstNode,
    /// A specific node id
    NodeId(String),
    /// Node without incoming edges; ties go to the leftmost, then topmost
    /// authored position. Nodes without a position lose ties and keep their
    /// authored order among themselves.
    RootByPosition,
}

impl StartNodePolicy {
    /// Resolve the policy against a graph
    pub fn resolve<'g>(&self, graph: &'g WorkflowGraph) -> Result<&'g SlideNode, GraphError> {
        if graph.nodes.is_empty() {
            return Err(GraphError::EmptyGraph);
        }

        let found = match self {
            StartNodePolicy::FirstNode => graph.nodes.first(),
            StartNodePolicy::NodeId(id) => graph.node(id),
            StartNodePolicy::RootByPosition => Self::leftmost_root(graph),
        };

        found.ok_or_else(|| GraphError::MissingStartNode {
            policy: self.to_string(),
        })
    }

    fn leftmost_root(graph: &WorkflowGraph) -> Option<&SlideNode> {
        let mut roots: Vec<&SlideNode> = graph
            .nodes
            .iter()
            .filter(|node| graph.incoming(&node.id).next().is_none())
            .collect();

        // sort_by is stable, so authored order breaks remaining ties
        roots.sort_by(|a, b| match (a.position, b.position) {
            (Some(pa), Some(pb)) => pa.x.total_cmp(&pb.x).then(pa.y.total_cmp(&pb.y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        roots.into_iter().next()
    }
}

impl fmt::Display for StartNodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartNodePolicy::FirstNode => f.write_str("first_node"),
            StartNodePolicy::NodeId(id) => write!(f, "node_id({})", id),
            StartNodePolicy::RootByPosition => f.write_str("root_by_position"),
        }
    }
}
