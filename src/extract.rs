//! Document-level extraction: locating the drawing block, stripping
//! comments, resolving named coordinates and enumerating draw commands.
//!
//! Everything here runs before the DSL core: it hands the interpreter
//! pre-cleaned command text with comments removed and named coordinates
//! substituted by their literal values.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::dsl::{tokenize, Interpreter};
use crate::element::Element;
use crate::error::{Result, TikzError};

/// Environments that may hold a circuit drawing.
const DRAWING_ENVIRONMENTS: &[&str] = &["circuitikz", "tikzpicture"];

lazy_static! {
    static ref COORDINATE_DEF: Regex =
        Regex::new(r"(?s)\\coordinate\s*\(([^)]*)\)\s*at\s*\(([^)]*)\)\s*;").unwrap();
    static ref DRAW_COMMAND: Regex = Regex::new(r"(?s)\\draw(\[.*?\])?(.*?);").unwrap();
    static ref STANDALONE_NODE: Regex = Regex::new(
        r"(?s)\\node\s*(\[[^\]]*\])?\s*at\s*\(([^)]+)\)\s*(\[[^\]]*\])?\s*\{([^}]*)\}\s*;"
    )
    .unwrap();
}

/// Interior of the first `\begin{circuitikz}`/`\begin{tikzpicture}` block.
///
/// The begin and end environment names must match; when both environments
/// appear, the earlier block wins.
pub fn drawing_block(latex: &str) -> Option<&str> {
    let mut best: Option<(usize, &str)> = None;

    for env in DRAWING_ENVIRONMENTS {
        let begin = format!("\\begin{{{env}}}");
        let end = format!("\\end{{{env}}}");
        if let Some(begin_at) = latex.find(&begin) {
            let body_start = begin_at + begin.len();
            if let Some(end_offset) = latex[body_start..].find(&end) {
                let body = &latex[body_start..body_start + end_offset];
                if best.map_or(true, |(at, _)| begin_at < at) {
                    best = Some((begin_at, body));
                }
            }
        }
    }

    best.map(|(_, body)| body)
}

/// Strip `%`-to-end-of-line comments, honoring `\%` escapes. Lines that
/// become (or already are) blank are dropped.
pub fn remove_comments(content: &str) -> String {
    let mut clean_lines = Vec::new();

    for line in content.lines() {
        let mut comment_at = None;
        let mut prev = None;
        for (index, ch) in line.char_indices() {
            if ch == '%' && prev != Some('\\') {
                comment_at = Some(index);
                break;
            }
            prev = Some(ch);
        }

        match comment_at {
            Some(at) => {
                let kept = line[..at].trim_end();
                if !kept.is_empty() {
                    clean_lines.push(kept);
                }
            }
            None => {
                if !line.trim().is_empty() {
                    clean_lines.push(line);
                }
            }
        }
    }

    clean_lines.join("\n")
}

/// Collect `\coordinate (NAME) at (X,Y);` definitions. Values are stored
/// with their parentheses, ready for textual substitution.
pub fn coordinate_definitions(block: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for caps in COORDINATE_DEF.captures_iter(block) {
        let name = caps[1].trim().to_string();
        let value = format!("({})", caps[2].trim());
        map.insert(name, value);
    }
    map
}

/// Substitute `(NAME)` references by their literal coordinates.
pub fn replace_named_coords(command: &str, coords: &HashMap<String, String>) -> String {
    let mut result = command.to_string();
    for (name, value) in coords {
        result = result.replace(&format!("({name})"), value);
    }
    result
}

/// Enumerate the draw commands of a drawing block, comments stripped.
///
/// `\draw` commands whose option group contains an arrow are skipped
/// (arrows annotate measurements, not circuit topology). Standalone
/// `\node ... at (x,y) {text};` statements are rewritten into the
/// equivalent draw fragment so the interpreter sees a single shape of
/// input.
pub fn draw_commands(block: &str) -> Vec<String> {
    let clean = remove_comments(block);
    let mut commands = Vec::new();

    for caps in DRAW_COMMAND.captures_iter(&clean) {
        let options = caps.get(1).map_or("", |m| m.as_str());
        if options.contains("->") || options.contains("<-") {
            continue;
        }
        let body = caps.get(2).map_or("", |m| m.as_str());
        commands.push(body.trim().to_string());
    }

    for caps in STANDALONE_NODE.captures_iter(&clean) {
        let coords = caps[2].trim().to_string();
        let first = caps.get(1).map_or("", |m| m.as_str()).trim();
        let second = caps.get(3).map_or("", |m| m.as_str()).trim();
        let label = caps[4].trim();

        // Options may sit before or after `at`.
        let mut options = if !first.is_empty() { first } else { second };
        options = options
            .strip_prefix('[')
            .and_then(|o| o.strip_suffix(']'))
            .unwrap_or(options);
        if options.is_empty() {
            options = "above";
        }

        commands.push(format!("({coords}) node[{options}]{{{label}}}"));
    }

    commands
}

/// Convert one LaTeX document into its ordered circuit element list.
///
/// Fails with [`TikzError::NoDrawingBlock`] when the document has no
/// drawing environment; a block whose commands are all unparseable yields
/// an empty list, which is a valid result.
pub fn convert_document(latex: &str) -> Result<Vec<Element>> {
    let block = drawing_block(latex).ok_or(TikzError::NoDrawingBlock)?;

    let coords = coordinate_definitions(block);
    let mut interp = Interpreter::new();

    for command in draw_commands(block) {
        let processed = replace_named_coords(&command, &coords);
        interp.run(&tokenize(&processed));
    }

    let diagnostics = interp.diagnostics();
    if diagnostics != crate::dsl::Diagnostics::default() {
        log::debug!("document conversion dropped fragments: {diagnostics:?}");
    }

    Ok(interp.into_elements())
}
