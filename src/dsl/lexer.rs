//! Tokenizer for draw-command text.
//!
//! One left-to-right pass turning a command into coordinates, wire markers,
//! inline node specifications and `to[...]` path specifications. Compound
//! tokens keep their raw text; the interpreter parses them later.
//! Tokenization never fails: anything unrecognized is skipped, which is the
//! permissive-parsing policy of the whole core.

use super::scan::{find_top_level_comma, match_delimiter};

/// A syntactic token of a draw command, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A `(x,y)` coordinate literal, raw components untrimmed of content
    /// beyond surrounding whitespace.
    Coordinate { x: String, y: String },
    /// The plain `--` wire connector.
    WireMarker,
    /// An inline `node[...]{...}` placement, raw text retained.
    NodeSpec(String),
    /// A `to[...]` path specification, raw text retained.
    PathSpec(String),
}

/// Tokenize one draw command.
pub fn tokenize(command: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut i = 0;
    let len = command.len();

    while i < len {
        i = skip_whitespace(command, i);
        if i >= len {
            break;
        }

        let rest = &command[i..];

        if rest.starts_with('(') {
            match match_delimiter(command, i, '(', ')') {
                Ok(close) => {
                    let interior = &command[i + 1..close];
                    let (x, y) = match find_top_level_comma(interior) {
                        Some(comma) => (&interior[..comma], &interior[comma + 1..]),
                        None => (interior, ""),
                    };
                    tokens.push(Token::Coordinate {
                        x: x.trim().to_string(),
                        y: y.trim().to_string(),
                    });
                    i = close + 1;
                }
                Err(err) => {
                    log::warn!("skipping rest of command: {err}");
                    break;
                }
            }
        } else if rest.starts_with("--") {
            tokens.push(Token::WireMarker);
            i += 2;
        } else if rest.starts_with("node") {
            let (end, raw) = scan_node_spec(command, i);
            tokens.push(Token::NodeSpec(raw));
            i = end;
        } else if rest.starts_with("to") {
            let (end, raw) = scan_path_spec(command, i);
            tokens.push(Token::PathSpec(raw));
            i = end;
        } else {
            // Unrecognized character: skip it.
            i += rest.chars().next().map_or(1, char::len_utf8);
        }
    }

    tokens
}

fn skip_whitespace(text: &str, mut i: usize) -> usize {
    while let Some(ch) = text[i..].chars().next() {
        if !ch.is_whitespace() {
            break;
        }
        i += ch.len_utf8();
    }
    i
}

/// Scan `node` followed by an optional `[...]` group and an optional `{...}`
/// group. Returns the end index and the trimmed raw span.
fn scan_node_spec(text: &str, start: usize) -> (usize, String) {
    let mut i = start + "node".len();

    i = skip_whitespace(text, i);
    if text[i..].starts_with('[') {
        match match_delimiter(text, i, '[', ']') {
            Ok(close) => i = close + 1,
            Err(_) => i = text.len(),
        }
    }

    let after_options = i;
    i = skip_whitespace(text, i);
    if text[i..].starts_with('{') {
        match match_delimiter(text, i, '{', '}') {
            Ok(close) => i = close + 1,
            Err(_) => i = text.len(),
        }
    } else {
        i = after_options;
    }

    (i, text[start..i].trim().to_string())
}

/// Scan `to[...]`, tracking square-bracket depth, brace depth and a
/// math-mode toggle. Brackets and braces only count while math mode is
/// inactive, and a backslash escapes the next character, so a `]` inside
/// `$...$` does not end the group.
fn scan_path_spec(text: &str, start: usize) -> (usize, String) {
    let mut i = start + "to".len();

    i = skip_whitespace(text, i);
    if text[i..].starts_with('[') {
        let mut square_depth = 0i32;
        let mut brace_depth = 0i32;
        let mut in_math = false;
        let mut escape = false;
        let mut end = text.len();

        for (offset, ch) in text[i..].char_indices() {
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '$' {
                in_math = !in_math;
            } else if !in_math {
                match ch {
                    '[' => square_depth += 1,
                    ']' => square_depth -= 1,
                    '{' => brace_depth += 1,
                    '}' => brace_depth -= 1,
                    _ => {}
                }
            }
            if square_depth == 0 && brace_depth == 0 && !in_math {
                end = i + offset + ch.len_utf8();
                break;
            }
        }
        i = end;
    }

    (i, text[start..i].trim().to_string())
}
