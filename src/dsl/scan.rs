//! Low-level scanning primitives shared by the tokenizer, the option
//! splitter and the label extractor.

use crate::error::{Result, TikzError};

/// Find the closing delimiter matching the opener at `open_index`.
///
/// Scans forward counting nesting depth and returns the byte index of the
/// character where the depth returns to zero. The character at `open_index`
/// must be `open`.
pub fn match_delimiter(text: &str, open_index: usize, open: char, close: char) -> Result<usize> {
    debug_assert_eq!(text[open_index..].chars().next(), Some(open));

    let mut depth = 0i32;
    for (offset, ch) in text[open_index..].char_indices() {
        if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                return Ok(open_index + offset);
            }
        }
    }
    Err(TikzError::unterminated(open, open_index))
}

/// Split a bracket interior into its top-level comma-separated options.
///
/// Commas inside `$...$` math regions or `{...}` groups do not split, and a
/// backslash escapes the following character verbatim. Each option is
/// trimmed; an empty trailing fragment is dropped. Call this on the interior
/// of a bracket pair only, never on the brackets themselves.
pub fn split_options(text: &str) -> Vec<String> {
    let mut options = Vec::new();
    let mut current = String::new();
    let mut in_math = false;
    let mut brace_depth = 0i32;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                current.push(ch);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '$' => {
                in_math = !in_math;
                current.push(ch);
            }
            '{' => {
                brace_depth += 1;
                current.push(ch);
            }
            '}' => {
                brace_depth -= 1;
                current.push(ch);
            }
            ',' if !in_math && brace_depth == 0 => {
                options.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if !current.trim().is_empty() {
        options.push(current.trim().to_string());
    }

    options
}

/// Byte index of the first comma not inside a `$...$` region or `{...}`
/// group, honoring backslash escapes.
pub fn find_top_level_comma(text: &str) -> Option<usize> {
    let mut in_math = false;
    let mut brace_depth = 0i32;
    let mut escape = false;

    for (index, ch) in text.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' => escape = true,
            '$' => in_math = !in_math,
            '{' => brace_depth += 1,
            '}' => brace_depth -= 1,
            ',' if !in_math && brace_depth == 0 => return Some(index),
            _ => {}
        }
    }
    None
}
