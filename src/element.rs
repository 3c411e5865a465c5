//! Circuit element records and the coordinate transform.
//!
//! Elements are produced in source order by the interpreter; that order is
//! visual stacking order and is preserved all the way to the serialized
//! output. The JSON shape (`type` tag, `endPoint`, `direction`, ...) matches
//! the interchange format consumed downstream.

use serde::Serialize;

/// Scale factor applied when mapping circuitikz coordinates to output space.
pub const SCALE_FACTOR: f64 = 37.795;

/// Label offset used for every labeled element.
pub const LABEL_DISTANCE: &str = "0.12cm";

/// Routing style for wire segments.
pub const WIRE_ROUTING: &str = "-|";

/// Component-type aliases, resolved when building element identifiers.
/// Unknown type names pass through unchanged.
pub const COMPONENT_ALIASES: &[(&str, &str)] = &[
    ("V", "american voltage source"),
    ("R", "american resistor"),
    ("resistor", "american resistor"),
    ("L", "cute inductor"),
    ("C", "capacitor"),
    ("I", "european current source"),
    ("current source", "european current source"),
    ("voltage source", "american voltage source"),
];

/// Shorthand node kinds: `*` is a filled terminal, `o` an open one.
pub const NODE_KIND_ALIASES: &[(&str, &str)] = &[("*", "circ"), ("o", "ocirc")];

/// Label position keywords and their compass translations.
pub const LABEL_POSITIONS: &[(&str, &str)] = &[
    ("above", "north"),
    ("below", "south"),
    ("left", "west"),
    ("right", "east"),
];

/// Resolve a component-type key through [`COMPONENT_ALIASES`].
pub fn component_alias(key: &str) -> &str {
    COMPONENT_ALIASES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or(key)
}

/// Resolve a node-kind shorthand through [`NODE_KIND_ALIASES`].
pub fn node_kind_alias(key: &str) -> &str {
    NODE_KIND_ALIASES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or(key)
}

/// Translate a label position keyword; unknown keywords pass through.
pub fn label_position(key: &str) -> &str {
    LABEL_POSITIONS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or(key)
}

/// Build a `node_...` identifier from an alias-resolved kind name.
pub fn node_id(kind: &str) -> String {
    format!("node_{}", component_alias(kind).replace(' ', "-"))
}

/// Build a `path_...` identifier from an alias-resolved type name.
pub fn path_id(kind: &str) -> String {
    format!("path_{}", component_alias(kind).replace(' ', "-"))
}

/// Round to 3 decimals and normalize negative zero.
pub fn clean_value(value: f64) -> f64 {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// A point in output space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// The document origin.
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    /// Transform a raw source coordinate pair into output space: scale both
    /// axes, invert the vertical axis, then clean.
    ///
    /// Unparseable components fall back to zero, matching the permissive
    /// policy of the rest of the DSL core.
    pub fn from_source(raw_x: &str, raw_y: &str) -> Self {
        let x: f64 = raw_x.trim().parse().unwrap_or(0.0);
        let y: f64 = raw_y.trim().parse().unwrap_or(0.0);
        Position {
            x: clean_value(x * SCALE_FACTOR),
            y: clean_value(-y * SCALE_FACTOR),
        }
    }

    /// Re-clean both components.
    pub fn cleaned(self) -> Self {
        Position {
            x: clean_value(self.x),
            y: clean_value(self.y),
        }
    }
}

/// A label attached to a node or path element.
///
/// Node labels carry the full `anchor`/`position` pair; path labels carry
/// only `value` and `distance`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub distance: String,
}

impl Label {
    /// A full node label.
    pub fn node(value: impl Into<String>, position: impl Into<String>) -> Self {
        Label {
            value: value.into(),
            anchor: Some("default".to_string()),
            position: Some(position.into()),
            distance: LABEL_DISTANCE.to_string(),
        }
    }

    /// A path label: value and distance only.
    pub fn path(value: impl Into<String>) -> Self {
        Label {
            value: value.into(),
            anchor: None,
            position: None,
            distance: LABEL_DISTANCE.to_string(),
        }
    }

    /// A label with empty value and default position carries no information
    /// and must not appear in output.
    pub fn is_absent(&self) -> bool {
        self.value.is_empty() && self.position.as_deref().map_or(true, |p| p == "default")
    }
}

/// One wire segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    #[serde(rename = "endPoint")]
    pub end_point: Position,
    pub direction: String,
}

impl Segment {
    /// A segment ending at `end_point` with the fixed routing style.
    pub fn to(end_point: Position) -> Self {
        Segment {
            end_point,
            direction: WIRE_ROUTING.to_string(),
        }
    }
}

/// A circuit element, in the interchange shape expected downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    /// A point-like element: terminal, junction marker.
    Node {
        id: String,
        position: Position,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<Label>,
    },
    /// A plain conductor run. Never labeled.
    Wire {
        start: Position,
        segments: Vec<Segment>,
    },
    /// A two-terminal component spanning start and end.
    Path {
        id: String,
        start: Position,
        end: Position,
        label: Label,
    },
}
