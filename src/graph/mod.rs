//! Workflow graph consumed read-only during a presentation.
//!
//! The node/edge editor produces this document; the core only reads it.
//! Loading is tolerant: unknown gesture labels become unbound bindings and
//! structural problems are reported as [`GraphIssue`] diagnostics instead of
//! rejecting the whole document.

pub mod actions;
pub mod document;
pub mod edge;
pub mod node;
pub mod start;

pub use actions::{SlideActions, ZoomBinding};
pub use document::{GraphIssue, WorkflowGraph};
pub use edge::GestureEdge;
pub use node::{MediaBindings, Position, SlideContent, SlideKind, SlideNode, ZoomPoint};
pub use start::StartNodePolicy;
