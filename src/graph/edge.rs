// GestureEdge - a gesture-labelled transition between slides

use serde::{Deserialize, Serialize};

use crate::gesture::label::deserialize_lenient;
use crate::gesture::GestureLabel;

/// Directed edge `source -> target` fired by `gesture`
///
/// An edge whose gesture is missing or unknown stays in the graph but can
/// never fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub gesture: Option<GestureLabel>,
}

impl GestureEdge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        gesture: GestureLabel,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            gesture: Some(gesture),
        }
    }

    pub fn fires_on(&self, gesture: GestureLabel) -> bool {
        self.gesture == Some(gesture)
    }
}
