// GestureLabel - the closed set of gestures the core understands
//
// Wire names match the hand-gesture classifier's category names so that
// classifier output, graph documents and persisted thresholds all share one
// spelling. The declaration order is also the calibration order.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Gesture recognized by the external classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GestureLabel {
    #[serde(rename = "Thumb_Up")]
    ThumbUp,
    #[serde(rename = "Thumb_Down")]
    ThumbDown,
    #[serde(rename = "Open_Palm")]
    OpenPalm,
    #[serde(rename = "Closed_Fist")]
    ClosedFist,
    #[serde(rename = "Victory")]
    Victory,
    #[serde(rename = "Pointing_Up")]
    PointingUp,
}

impl GestureLabel {
    /// Every gesture, in calibration order
    pub const ALL: [GestureLabel; 6] = [
        GestureLabel::ThumbUp,
        GestureLabel::ThumbDown,
        GestureLabel::OpenPalm,
        GestureLabel::ClosedFist,
        GestureLabel::Victory,
        GestureLabel::PointingUp,
    ];

    /// Classifier label used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureLabel::ThumbUp => "Thumb_Up",
            GestureLabel::ThumbDown => "Thumb_Down",
            GestureLabel::OpenPalm => "Open_Palm",
            GestureLabel::ClosedFist => "Closed_Fist",
            GestureLabel::Victory => "Victory",
            GestureLabel::PointingUp => "Pointing_Up",
        }
    }

    /// Human-readable name for calibration prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            GestureLabel::ThumbUp => "THUMB UP",
            GestureLabel::ThumbDown => "THUMB DOWN",
            GestureLabel::OpenPalm => "OPEN PALM",
            GestureLabel::ClosedFist => "CLOSED FIST",
            GestureLabel::Victory => "VICTORY",
            GestureLabel::PointingUp => "POINTING UP",
        }
    }

    /// Position in calibration order
    pub fn index(&self) -> usize {
        match self {
            GestureLabel::ThumbUp => 0,
            GestureLabel::ThumbDown => 1,
            GestureLabel::OpenPalm => 2,
            GestureLabel::ClosedFist => 3,
            GestureLabel::Victory => 4,
            GestureLabel::PointingUp => 5,
        }
    }

    /// Gesture at a calibration index, `None` past the end
    pub fn from_index(index: usize) -> Option<GestureLabel> {
        Self::ALL.get(index).copied()
    }

    /// Get the next gesture in the calibration sequence
    ///
    /// # Returns
    /// * `Some(GestureLabel)` - Next gesture to calibrate
    /// * `None` - Calibration sequence complete
    pub fn next(&self) -> Option<GestureLabel> {
        Self::from_index(self.index() + 1)
    }

    /// Parse a classifier label
    ///
    /// Returns `None` for the classifier's `"None"` category, empty strings
    /// and anything outside the closed set. Unknown labels are not errors.
    pub fn parse(label: &str) -> Option<GestureLabel> {
        match label.trim() {
            "Thumb_Up" => Some(GestureLabel::ThumbUp),
            "Thumb_Down" => Some(GestureLabel::ThumbDown),
            "Open_Palm" => Some(GestureLabel::OpenPalm),
            "Closed_Fist" => Some(GestureLabel::ClosedFist),
            "Victory" => Some(GestureLabel::Victory),
            "Pointing_Up" => Some(GestureLabel::PointingUp),
            _ => None,
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deserialize an optional gesture binding without failing on unknown labels
///
/// Graph documents come from a separate authoring tool. A binding to a label
/// this build does not know is treated as unbound instead of rejecting the
/// whole document.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<GestureLabel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let parsed = GestureLabel::parse(&value);
        if parsed.is_none() && !value.is_empty() && value != "None" {
            log::warn!("[Graph] Ignoring unknown gesture label '{}'", value);
        }
        parsed
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_order() {
        assert_eq!(GestureLabel::ALL[0], GestureLabel::ThumbUp);
        assert_eq!(GestureLabel::ALL[5], GestureLabel::PointingUp);
        for (i, gesture) in GestureLabel::ALL.iter().enumerate() {
            assert_eq!(gesture.index(), i);
        }
    }

    #[test]
    fn test_next() {
        assert_eq!(GestureLabel::ThumbUp.next(), Some(GestureLabel::ThumbDown));
        assert_eq!(GestureLabel::Victory.next(), Some(GestureLabel::PointingUp));
        assert_eq!(GestureLabel::PointingUp.next(), None);
    }

    #[test]
    fn test_parse_known_labels() {
        for gesture in GestureLabel::ALL {
            assert_eq!(GestureLabel::parse(gesture.as_str()), Some(gesture));
        }
    }

    #[test]
    fn test_parse_rejects_none_and_unknown() {
        assert_eq!(GestureLabel::parse("None"), None);
        assert_eq!(GestureLabel::parse(""), None);
        assert_eq!(GestureLabel::parse("ILoveYou"), None);
        assert_eq!(GestureLabel::parse("thumb_up"), None);
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&GestureLabel::ClosedFist).unwrap();
        assert_eq!(json, "\"Closed_Fist\"");

        let parsed: GestureLabel = serde_json::from_str("\"Pointing_Up\"").unwrap();
        assert_eq!(parsed, GestureLabel::PointingUp);
    }

    #[test]
    fn test_lenient_deserialization() {
        #[derive(Deserialize)]
        struct Binding {
            #[serde(default, deserialize_with = "deserialize_lenient")]
            gesture: Option<GestureLabel>,
        }

        let known: Binding = serde_json::from_str(r#"{"gesture":"Victory"}"#).unwrap();
        assert_eq!(known.gesture, Some(GestureLabel::Victory));

        let unknown: Binding = serde_json::from_str(r#"{"gesture":"Wave"}"#).unwrap();
        assert_eq!(unknown.gesture, None);

        let null: Binding = serde_json::from_str(r#"{"gesture":null}"#).unwrap();
        assert_eq!(null.gesture, None);

        let missing: Binding = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.gesture, None);
    }
}
