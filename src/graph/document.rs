// WorkflowGraph - the authored slide graph
//
// The document is produced by the external editor and borrowed read-only
// for the duration of a presentation. `validate` reports what a careful
// author would want to fix; none of the reported issues stop playback.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::GraphError;
use crate::gesture::GestureLabel;
use crate::graph::{GestureEdge, SlideActions, SlideNode, ZoomBinding};

/// Diagnostic produced by [`WorkflowGraph::validate`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum GraphIssue {
    EmptyGraph,
    DuplicateNodeId {
        id: String,
    },
    DanglingEdge {
        edge_id: String,
        endpoint: String,
    },
    /// Several outgoing edges of one node share a gesture; the first wins
    AmbiguousEdges {
        source: String,
        gesture: GestureLabel,
        edge_ids: Vec<String>,
    },
    /// Edge has no usable gesture and can never fire
    UnboundEdge {
        edge_id: String,
    },
    /// Zoom gesture configured without a zoom point; zoom is inactive
    ZoomWithoutPoint {
        node_id: String,
    },
    ZoomPointOutOfRange {
        node_id: String,
    },
}

impl GraphIssue {
    /// Issues that would also stop a presentation from entering a slide
    pub fn as_error(&self) -> Option<GraphError> {
        match self {
            GraphIssue::EmptyGraph => Some(GraphError::EmptyGraph),
            GraphIssue::DuplicateNodeId { id } => {
                Some(GraphError::DuplicateNodeId { id: id.clone() })
            }
            GraphIssue::DanglingEdge { edge_id, endpoint } => Some(GraphError::DanglingEdge {
                edge_id: edge_id.clone(),
                endpoint: endpoint.clone(),
            }),
            _ => None,
        }
    }
}

/// Slides plus gesture-labelled transitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowGraph {
    #[serde(default)]
    pub nodes: Vec<SlideNode>,
    #[serde(default)]
    pub edges: Vec<GestureEdge>,
}

impl WorkflowGraph {
    pub fn new(nodes: Vec<SlideNode>, edges: Vec<GestureEdge>) -> Self {
        Self { nodes, edges }
    }

    /// Parse a graph document
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let graph: WorkflowGraph = serde_json::from_str(json)?;
        log::debug!(
            "[Graph] Parsed {} nodes, {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );
        Ok(graph)
    }

    /// Node by id; with duplicate ids the first declared node wins
    pub fn node(&self, id: &str) -> Option<&SlideNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Outgoing edges of a node, in authored order
    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GestureEdge> + 'a {
        self.edges.iter().filter(move |edge| edge.source == id)
    }

    pub fn incoming<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GestureEdge> + 'a {
        self.edges.iter().filter(move |edge| edge.target == id)
    }

    /// First outgoing edge of `source` that fires on `gesture`
    pub fn edge_for<'a>(
        &'a self,
        source: &'a str,
        gesture: GestureLabel,
    ) -> Option<&'a GestureEdge> {
        self.outgoing(source).find(|edge| edge.fires_on(gesture))
    }

    /// Gesture bindings active while `id` is the current slide
    pub fn slide_actions<'a>(&'a self, id: &'a str) -> Option<SlideActions<'a>> {
        let node = self.node(id)?;
        let zoom = node.zoom_point.map(|point| ZoomBinding {
            point: point.clamped(),
            zoom_in: node.zoom_in_gesture,
            zoom_out: node.zoom_out_gesture,
        });

        Some(SlideActions {
            node_id: node.id.as_str(),
            media: node.media_bindings(),
            zoom,
            navigation: self.outgoing(id).collect(),
        })
    }

    /// Collect diagnostics for the whole document
    pub fn validate(&self) -> Vec<GraphIssue> {
        let mut issues = Vec::new();
        if self.nodes.is_empty() {
            issues.push(GraphIssue::EmptyGraph);
        }

        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                issues.push(GraphIssue::DuplicateNodeId {
                    id: node.id.clone(),
                });
            }

            let has_zoom_gesture = node.zoom_in_gesture.is_some() || node.zoom_out_gesture.is_some();
            match node.zoom_point {
                None if has_zoom_gesture => issues.push(GraphIssue::ZoomWithoutPoint {
                    node_id: node.id.clone(),
                }),
                Some(point) if !point.is_in_range() => {
                    issues.push(GraphIssue::ZoomPointOutOfRange {
                        node_id: node.id.clone(),
                    })
                }
                _ => {}
            }
        }

        let mut by_source_gesture: HashMap<(&str, GestureLabel), Vec<String>> = HashMap::new();
        let mut ambiguity_order = Vec::new();
        for edge in &self.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !seen.contains(endpoint.as_str()) {
                    issues.push(GraphIssue::DanglingEdge {
                        edge_id: edge.id.clone(),
                        endpoint: endpoint.clone(),
                    });
                }
            }

            match edge.gesture {
                Some(gesture) => {
                    let key = (edge.source.as_str(), gesture);
                    let ids = by_source_gesture.entry(key).or_default();
                    if ids.len() == 1 {
                        ambiguity_order.push(key);
                    }
                    ids.push(edge.id.clone());
                }
                None => issues.push(GraphIssue::UnboundEdge {
                    edge_id: edge.id.clone(),
                }),
            }
        }

        for key in ambiguity_order {
            if let Some(edge_ids) = by_source_gesture.remove(&key) {
                issues.push(GraphIssue::AmbiguousEdges {
                    source: key.0.to_string(),
                    gesture: key.1,
                    edge_ids,
                });
            }
        }

        if !issues.is_empty() {
            log::warn!("[Graph] Validation found {} issue(s)", issues.len());
        }
        issues
    }

    /// First issue that prevents entering slides reliably
    pub fn check(&self) -> Result<(), GraphError> {
        match self.validate().iter().find_map(GraphIssue::as_error) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
