//! Token-stream interpreter and element builders.
//!
//! Walks a draw command's token list once with a single forward cursor and
//! at most one token of lookahead, maintaining the current pen position and
//! a pending label, and appending elements in source order. The pen position
//! carries across draw commands of one document; the pending label is local
//! to one command.

use crate::element::{
    self, node_kind_alias, Element, Label, Position, Segment,
};

use super::connector::{self, Connector};
use super::label::{extract_label, strip_outer_wrap, take_value};
use super::lexer::Token;
use super::scan::{match_delimiter, split_options};

/// Counters for every permissive-drop site. Output shape is unaffected;
/// these exist so tests (and the CLI at debug level) can observe what the
/// best-effort parsing discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// NodeSpec tokens that produced no element (bad shape or no visual kind).
    pub dropped_nodes: usize,
    /// PathSpec tokens that produced no element (no usable option group).
    pub dropped_paths: usize,
    /// Wires suppressed because start and end coincide.
    pub suppressed_wires: usize,
    /// Tokens skipped by the interpreter's fallback rule.
    pub skipped_tokens: usize,
}

/// Interpreter for one document's draw commands.
///
/// The pen position starts at the origin and persists across [`run`] calls;
/// create a fresh interpreter per document.
///
/// [`run`]: Interpreter::run
#[derive(Debug, Default)]
pub struct Interpreter {
    position: Position,
    elements: Vec<Element>,
    diagnostics: Diagnostics,
}

impl Interpreter {
    /// Create an interpreter with the pen at the origin.
    pub fn new() -> Self {
        Self {
            position: Position::ORIGIN,
            elements: Vec::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    /// Interpret one draw command's token list.
    pub fn run(&mut self, tokens: &[Token]) {
        let mut pending: Option<Label> = None;
        let mut i = 0;

        while i < tokens.len() {
            match &tokens[i] {
                Token::Coordinate { x, y } => {
                    self.position = Position::from_source(x, y);
                    i += 1;
                }
                Token::NodeSpec(raw) => {
                    self.process_node(raw, self.position, &mut pending);
                    i += 1;
                }
                Token::WireMarker | Token::PathSpec(_)
                    if matches!(tokens.get(i + 1), Some(Token::Coordinate { .. })) =>
                {
                    let Some(Token::Coordinate { x, y }) = tokens.get(i + 1) else {
                        unreachable!()
                    };
                    let start = self.position;
                    let end = Position::from_source(x, y);

                    match &tokens[i] {
                        Token::WireMarker => self.push_wire(start, end, &mut pending),
                        Token::PathSpec(raw) => self.process_path(raw, start, end, &mut pending),
                        _ => unreachable!(),
                    }

                    // The segment end becomes the pen position even when the
                    // segment itself was dropped.
                    self.position = end;
                    i += 2;

                    if let Some(Token::NodeSpec(raw)) = tokens.get(i) {
                        self.process_node(raw, self.position, &mut pending);
                        i += 1;
                    }
                }
                other => {
                    log::debug!("skipping stray token {other:?}");
                    self.diagnostics.skipped_tokens += 1;
                    i += 1;
                }
            }
        }
    }

    /// Elements produced so far, in emission (stacking) order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Drop counters accumulated so far.
    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    /// Consume the interpreter, yielding the ordered element list.
    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    fn process_node(&mut self, raw: &str, position: Position, pending: &mut Option<Label>) {
        match build_node(raw) {
            None => {
                log::debug!("dropping node spec {raw:?}");
                self.diagnostics.dropped_nodes += 1;
            }
            Some(NodeOutcome::Special(conn)) => {
                // Both markers sit at the node's own anchor position.
                if let Some(kind) = conn.start {
                    self.push_marker_node(kind.node_kind(), position);
                }
                if let Some(kind) = conn.end {
                    self.push_marker_node(kind.node_kind(), position);
                }
            }
            Some(NodeOutcome::Node {
                kind,
                label,
                placeholder,
            }) => {
                let mut label = label;
                let lacks_value = label.as_ref().map_or(true, |l| l.value.is_empty());
                if lacks_value && pending.is_some() {
                    label = pending.take();
                }
                if placeholder {
                    *pending = label.clone();
                }
                self.elements.push(Element::Node {
                    id: element::node_id(&kind),
                    position: position.cleaned(),
                    label,
                });
            }
        }
    }

    fn process_path(
        &mut self,
        raw: &str,
        start: Position,
        end: Position,
        pending: &mut Option<Label>,
    ) {
        let options = match bracket_interior(raw) {
            Some(options) => options,
            None => {
                log::debug!("dropping path spec without option group {raw:?}");
                self.diagnostics.dropped_paths += 1;
                return;
            }
        };

        if let Some(conn) = connector::classify(options) {
            self.push_wire(start, end, pending);
            self.push_connector_markers(conn, start, end);
            return;
        }

        let type_key = path_type_key(&split_options(options));
        if type_key == "short" {
            self.push_wire(start, end, pending);
            return;
        }

        let mut label = Label::path(extract_label(options));
        if label.value.is_empty() {
            if let Some(carried) = pending.take() {
                label.value = carried.value;
            }
        }

        self.elements.push(Element::Path {
            id: element::path_id(&type_key),
            start: start.cleaned(),
            end: end.cleaned(),
            label,
        });
    }

    fn push_wire(&mut self, start: Position, end: Position, pending: &mut Option<Label>) {
        // A wire consumes a pending label so the next component cannot pick
        // it up, but never carries it.
        *pending = None;

        let start = start.cleaned();
        let end = end.cleaned();
        if start == end {
            log::debug!("suppressing zero-length wire at {start:?}");
            self.diagnostics.suppressed_wires += 1;
            return;
        }

        self.elements.push(Element::Wire {
            start,
            segments: vec![Segment::to(end)],
        });
    }

    fn push_connector_markers(&mut self, conn: Connector, start: Position, end: Position) {
        if let Some(kind) = conn.start {
            self.push_marker_node(kind.node_kind(), start);
        }
        if let Some(kind) = conn.end {
            self.push_marker_node(kind.node_kind(), end);
        }
    }

    fn push_marker_node(&mut self, kind: &str, position: Position) {
        self.elements.push(Element::Node {
            id: element::node_id(kind),
            position: position.cleaned(),
            label: None,
        });
    }
}

/// Outcome of parsing a NodeSpec token.
enum NodeOutcome {
    /// A special connector written in node form; the interpreter synthesizes
    /// the marker nodes.
    Special(Connector),
    /// A regular node.
    Node {
        kind: String,
        label: Option<Label>,
        /// The node had a label but no visual kind: its label is also left
        /// pending for the next component.
        placeholder: bool,
    },
}

/// Parse a NodeSpec token: `node[<options>]` optionally followed by
/// `{<label>}`. Any other shape yields `None`.
fn build_node(raw: &str) -> Option<NodeOutcome> {
    let rest = raw.strip_prefix("node")?.trim_start();
    let interior = rest.strip_prefix('[')?;
    let close = interior.find(']')?;
    let options = &interior[..close];

    let after = interior[close + 1..].trim();
    let braces = if after.is_empty() {
        ""
    } else if after.starts_with('{') && after.ends_with('}') {
        after[1..after.len() - 1].trim()
    } else {
        return None;
    };

    // One layer of math-mode wrapping around the brace text.
    let braces = if braces.len() >= 2 && braces.starts_with('$') && braces.ends_with('$') {
        &braces[1..braces.len() - 1]
    } else {
        braces
    };

    if let Some(conn) = connector::classify(options) {
        return Some(NodeOutcome::Special(conn));
    }

    let mut kind: Option<String> = None;
    let mut value = braces.to_string();
    let mut position = "default".to_string();

    for option in split_options(options) {
        if element::LABEL_POSITIONS.iter().any(|(k, _)| *k == option) {
            position = element::label_position(&option).to_string();
        } else if let Some((key, raw_value)) = option.split_once('=') {
            if key == "label" {
                if let Some((pos_key, rest)) = raw_value.split_once(':') {
                    position = element::label_position(pos_key.trim()).to_string();
                    value = rest.trim().to_string();
                } else {
                    value = take_value(raw_value).to_string();
                }
                value = strip_outer_wrap(&value).to_string();
            }
        } else if !option.is_empty() && option != "short" {
            kind = Some(node_kind_alias(&option).to_string());
        }
    }

    // A label with no visual kind gets the open-circle default and leaves
    // its label pending.
    let placeholder = kind.is_none() && !value.is_empty();
    if placeholder {
        kind = Some("ocirc".to_string());
    }

    let kind = kind?;
    let label = Some(Label::node(value, position)).filter(|l| !l.is_absent());

    Some(NodeOutcome::Node {
        kind,
        label,
        placeholder,
    })
}

/// Interior of the first `[...]` group of a PathSpec token.
fn bracket_interior(raw: &str) -> Option<&str> {
    let open = raw.find('[')?;
    let close = match_delimiter(raw, open, '[', ']').ok()?;
    Some(&raw[open + 1..close])
}

/// Single-letter and word forms that name a component type even in
/// `key=value` position.
const TYPED_KEYS: &[&str] = &["R", "L", "C", "resistor", "inductor", "capacitor"];

/// Determine the component type key from a path's options.
fn path_type_key(options: &[String]) -> String {
    for option in options {
        if !option.contains('=') {
            if !option.is_empty() {
                return option.clone();
            }
        } else if let Some((key, _)) = option.split_once('=') {
            if TYPED_KEYS.contains(&key) {
                return key.to_string();
            }
        }
    }

    // Fall back to the first option's key, or the whole first option.
    match options.first() {
        Some(first) => match first.split_once('=') {
            Some((key, _)) => key.trim().to_string(),
            None => first.clone(),
        },
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::lexer::tokenize;
    use super::*;

    fn interpret(command: &str) -> Vec<Element> {
        let mut interp = Interpreter::new();
        interp.run(&tokenize(command));
        interp.into_elements()
    }

    fn pos(x: f64, y: f64) -> Position {
        Position { x, y }
    }

    #[test]
    fn test_resistor_path() {
        let elements = interpret("(0,0) to[R, l=$R_1$] (2,0)");
        assert_eq!(elements.len(), 1);
        match &elements[0] {
            Element::Path {
                id,
                start,
                end,
                label,
            } => {
                assert_eq!(id, "path_american-resistor");
                assert_eq!(*start, pos(0.0, 0.0));
                assert_eq!(*end, pos(75.59, 0.0));
                assert_eq!(label.value, "R_1");
                assert_eq!(label.distance, "0.12cm");
                assert_eq!(label.anchor, None);
                assert_eq!(label.position, None);
            }
            other => panic!("expected path, got {other:?}"),
        }
    }

    #[test]
    fn test_terminal_node_then_wire() {
        let elements = interpret("(0,0) node[ocirc]{} -- (0,-2)");
        assert_eq!(elements.len(), 2);
        match &elements[0] {
            Element::Node {
                id,
                position,
                label,
            } => {
                assert_eq!(id, "node_ocirc");
                assert_eq!(*position, pos(0.0, 0.0));
                assert!(label.is_none());
            }
            other => panic!("expected node, got {other:?}"),
        }
        match &elements[1] {
            Element::Wire { start, segments } => {
                assert_eq!(*start, pos(0.0, 0.0));
                assert_eq!(segments.len(), 1);
                assert_eq!(segments[0].end_point, pos(0.0, 75.59));
                assert_eq!(segments[0].direction, "-|");
            }
            other => panic!("expected wire, got {other:?}"),
        }
    }

    #[test]
    fn test_special_connector_path() {
        let elements = interpret("(0,0) to[short, o-*] (2,0)");
        assert_eq!(elements.len(), 3);
        assert!(matches!(&elements[0], Element::Wire { .. }));
        match (&elements[1], &elements[2]) {
            (
                Element::Node {
                    id: start_id,
                    position: start_pos,
                    ..
                },
                Element::Node {
                    id: end_id,
                    position: end_pos,
                    ..
                },
            ) => {
                assert_eq!(start_id, "node_ocirc");
                assert_eq!(*start_pos, pos(0.0, 0.0));
                assert_eq!(end_id, "node_circ");
                assert_eq!(*end_pos, pos(75.59, 0.0));
            }
            other => panic!("expected two marker nodes, got {other:?}"),
        }
        assert!(!elements.iter().any(|e| matches!(e, Element::Path { .. })));
    }

    #[test]
    fn test_special_connector_node_form() {
        let elements = interpret("(1,0) node[o-o]");
        assert_eq!(elements.len(), 2);
        for element in &elements {
            match element {
                Element::Node { id, position, .. } => {
                    assert_eq!(id, "node_ocirc");
                    assert_eq!(*position, pos(37.795, 0.0));
                }
                other => panic!("expected node, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_short_option_yields_wire() {
        let elements = interpret("(0,0) to[short] (1,0)");
        assert_eq!(elements.len(), 1);
        assert!(matches!(&elements[0], Element::Wire { .. }));
    }

    #[test]
    fn test_zero_length_wire_is_suppressed() {
        let mut interp = Interpreter::new();
        interp.run(&tokenize("(1,1) -- (1,1)"));
        assert!(interp.elements().is_empty());
        assert_eq!(interp.diagnostics().suppressed_wires, 1);
    }

    #[test]
    fn test_pending_label_moves_to_next_path() {
        let elements = interpret("(0,0) node[label=$v_1$]{} to[R] (2,0)");
        assert_eq!(elements.len(), 2);
        match &elements[0] {
            Element::Node { id, label, .. } => {
                // Label-only node defaults to the open-circle kind and
                // keeps its own label.
                assert_eq!(id, "node_ocirc");
                assert_eq!(label.as_ref().unwrap().value, "v_1");
            }
            other => panic!("expected node, got {other:?}"),
        }
        match &elements[1] {
            Element::Path { label, .. } => {
                assert_eq!(label.value, "v_1");
                assert_eq!(label.anchor, None);
            }
            other => panic!("expected path, got {other:?}"),
        }
    }

    #[test]
    fn test_pending_label_not_used_by_labeled_path() {
        let elements = interpret("(0,0) node[label=$v_1$]{} to[R, l=$R_2$] (2,0)");
        match &elements[1] {
            Element::Path { label, .. } => assert_eq!(label.value, "R_2"),
            other => panic!("expected path, got {other:?}"),
        }
    }

    #[test]
    fn test_wire_discards_pending_label() {
        let elements = interpret("(0,0) node[label=$v_1$]{} -- (2,0) to[R] (3,0)");
        assert_eq!(elements.len(), 3);
        match &elements[2] {
            Element::Path { label, .. } => assert_eq!(label.value, ""),
            other => panic!("expected path, got {other:?}"),
        }
    }

    #[test]
    fn test_pending_label_attaches_to_bare_node() {
        let elements = interpret("(0,0) node[label=above:$v$]{} (1,0) node[circ]{}");
        assert_eq!(elements.len(), 2);
        match &elements[0] {
            Element::Node { label, .. } => {
                let label = label.as_ref().unwrap();
                assert_eq!(label.value, "v");
                assert_eq!(label.position.as_deref(), Some("north"));
            }
            other => panic!("expected node, got {other:?}"),
        }
        match &elements[1] {
            Element::Node { id, label, .. } => {
                assert_eq!(id, "node_circ");
                // The pending label, with its position, lands here.
                let label = label.as_ref().unwrap();
                assert_eq!(label.value, "v");
                assert_eq!(label.position.as_deref(), Some("north"));
            }
            other => panic!("expected node, got {other:?}"),
        }
    }

    #[test]
    fn test_position_carries_across_segments() {
        let elements = interpret("(0,0) to[R] (2,0) to[C, l=$C_1$] (2,-2)");
        assert_eq!(elements.len(), 2);
        match &elements[1] {
            Element::Path {
                id, start, end, label, ..
            } => {
                assert_eq!(id, "path_capacitor");
                assert_eq!(*start, pos(75.59, 0.0));
                assert_eq!(*end, pos(75.59, 75.59));
                assert_eq!(label.value, "C_1");
            }
            other => panic!("expected path, got {other:?}"),
        }
    }

    #[test]
    fn test_node_right_after_segment_end() {
        let elements = interpret("(0,0) -- (2,0) node[circ]{}");
        assert_eq!(elements.len(), 2);
        match &elements[1] {
            Element::Node { position, .. } => assert_eq!(*position, pos(75.59, 0.0)),
            other => panic!("expected node, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_to_drops_segment_but_advances_pen() {
        let mut interp = Interpreter::new();
        interp.run(&tokenize("(0,0) to (2,0) -- (2,2)"));
        assert_eq!(interp.diagnostics().dropped_paths, 1);
        let elements = interp.into_elements();
        assert_eq!(elements.len(), 1);
        match &elements[0] {
            Element::Wire { start, segments } => {
                assert_eq!(*start, pos(75.59, 0.0));
                assert_eq!(segments[0].end_point, pos(75.59, -75.59));
            }
            other => panic!("expected wire, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_node_produces_nothing() {
        let mut interp = Interpreter::new();
        interp.run(&tokenize("(0,0) node[]{}"));
        assert!(interp.elements().is_empty());
        assert_eq!(interp.diagnostics().dropped_nodes, 1);
    }

    #[test]
    fn test_node_with_position_keyword_only_is_dropped() {
        // `right` names a label position, not a visual kind; with no label
        // value the node reduces to nothing.
        let elements = interpret("(0,0) node[right]{}");
        assert!(elements.is_empty());
    }

    #[test]
    fn test_node_with_position_and_text() {
        let elements = interpret("(0,0) node[right]{$V_o$}");
        assert_eq!(elements.len(), 1);
        match &elements[0] {
            Element::Node { id, label, .. } => {
                assert_eq!(id, "node_ocirc");
                let label = label.as_ref().unwrap();
                assert_eq!(label.value, "V_o");
                assert_eq!(label.position.as_deref(), Some("east"));
                assert_eq!(label.anchor.as_deref(), Some("default"));
            }
            other => panic!("expected node, got {other:?}"),
        }
    }

    #[test]
    fn test_typed_key_value_option() {
        let elements = interpret("(0,0) to[R=2k] (2,0)");
        match &elements[0] {
            Element::Path { id, label, .. } => {
                assert_eq!(id, "path_american-resistor");
                assert_eq!(label.value, "2k");
            }
            other => panic!("expected path, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_key_passes_through() {
        let elements = interpret("(0,0) to[thermistor] (2,0)");
        match &elements[0] {
            Element::Path { id, .. } => assert_eq!(id, "path_thermistor"),
            other => panic!("expected path, got {other:?}"),
        }
    }

    #[test]
    fn test_type_key_falls_back_to_first_option_key() {
        let elements = interpret("(0,0) to[battery1=x] (2,0)");
        match &elements[0] {
            Element::Path { id, .. } => assert_eq!(id, "path_battery1"),
            other => panic!("expected path, got {other:?}"),
        }
    }

    #[test]
    fn test_voltage_source_alias() {
        let elements = interpret("(0,0) to[V, v=$V_s$] (0,2)");
        match &elements[0] {
            Element::Path { id, label, .. } => {
                assert_eq!(id, "path_american-voltage-source");
                assert_eq!(label.value, "V_s");
            }
            other => panic!("expected path, got {other:?}"),
        }
    }

    #[test]
    fn test_stray_wire_marker_is_skipped() {
        let mut interp = Interpreter::new();
        interp.run(&tokenize("(0,0) --"));
        assert!(interp.elements().is_empty());
        assert_eq!(interp.diagnostics().skipped_tokens, 1);
    }

    #[test]
    fn test_default_interpreter_starts_at_origin() {
        let mut interp = Interpreter::default();
        interp.run(&tokenize("-- (2,0)"));
        let elements = interp.into_elements();
        assert_eq!(elements.len(), 1);
        match &elements[0] {
            Element::Wire { start, .. } => assert_eq!(*start, pos(0.0, 0.0)),
            other => panic!("expected wire, got {other:?}"),
        }
    }

    #[test]
    fn test_pen_position_persists_across_commands() {
        let mut interp = Interpreter::new();
        interp.run(&tokenize("(0,0) -- (2,0)"));
        interp.run(&tokenize("-- (2,2)"));
        let elements = interp.into_elements();
        assert_eq!(elements.len(), 2);
        match &elements[1] {
            Element::Wire { start, .. } => assert_eq!(*start, pos(75.59, 0.0)),
            other => panic!("expected wire, got {other:?}"),
        }
    }

    #[test]
    fn test_pending_label_is_per_command() {
        let mut interp = Interpreter::new();
        interp.run(&tokenize("(0,0) node[label=$v$]{}"));
        interp.run(&tokenize("(0,0) to[R] (2,0)"));
        let elements = interp.into_elements();
        match &elements[1] {
            Element::Path { label, .. } => assert_eq!(label.value, ""),
            other => panic!("expected path, got {other:?}"),
        }
    }
}
