//! Extraction of label values from option strings.
//!
//! Labels can be introduced by several keys (`l=`, `R=`, `v=`, ...). The
//! first key present, in priority order, wins. Values may be wrapped in
//! math mode (`$...$`), a brace group, or run up to the next top-level
//! comma; outer wrapping is stripped repeatedly so `${R_1}$` and `$R_1$`
//! both yield `R_1`.

use super::scan::find_top_level_comma;

/// Label-bearing keys in priority order. The flag marks keys that accept a
/// decoration character (`>`, `^`, `_`) before the `=`.
const LABEL_KEYS: &[(char, bool)] = &[
    ('l', false),
    ('R', false),
    ('L', false),
    ('C', false),
    ('v', false),
    ('i', true),
];

/// Decoration characters allowed after a decorated key.
const DECORATIONS: &[char] = &['>', '^', '_'];

fn is_word(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Find `key` at a word boundary, optionally decorated, followed by `=`.
/// Returns the byte index just after the `=`.
fn find_key(text: &str, key: char, decorated: bool) -> Option<usize> {
    let mut prev: Option<char> = None;

    for (index, ch) in text.char_indices() {
        let at_boundary = prev.map_or(true, |p| !is_word(p));
        prev = Some(ch);

        if ch != key || !at_boundary {
            continue;
        }

        // `label=` must not match the `l=` rule, hence the boundary check
        // above; here we only need to walk past any decorations.
        let mut end = index + ch.len_utf8();
        if decorated {
            while let Some(deco) = text[end..].chars().next().filter(|c| DECORATIONS.contains(c)) {
                end += deco.len_utf8();
            }
        }
        if text[end..].starts_with('=') {
            return Some(end + 1);
        }
    }
    None
}

/// Isolate the raw value following a label key's `=`.
///
/// A value starting with `$` spans to the matching close marker
/// (escape-aware); one starting with `{` spans the balanced brace group;
/// anything else runs to the next top-level comma or the end of the string.
/// An unterminated span falls back to the whole remainder.
pub(crate) fn take_value(after_equals: &str) -> &str {
    let after = after_equals.trim();

    if let Some(rest) = after.strip_prefix('$') {
        let mut chars = rest.char_indices();
        while let Some((offset, ch)) = chars.next() {
            match ch {
                '\\' => {
                    chars.next();
                }
                '$' => return &after[..1 + offset + 1],
                _ => {}
            }
        }
        after
    } else if after.starts_with('{') {
        let mut depth = 0i32;
        for (index, ch) in after.char_indices() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return &after[..index + 1];
                    }
                }
                _ => {}
            }
        }
        after
    } else {
        match find_top_level_comma(after) {
            Some(comma) => after[..comma].trim_end(),
            None => after,
        }
    }
}

/// Repeatedly strip matching outer `{...}` and `$...$` wrapping.
pub(crate) fn strip_outer_wrap(value: &str) -> &str {
    let mut value = value.trim();
    loop {
        let before = value;
        if value.len() >= 2 && value.starts_with('{') && value.ends_with('}') {
            value = &value[1..value.len() - 1];
        }
        if value.len() >= 2 && value.starts_with('$') && value.ends_with('$') {
            value = &value[1..value.len() - 1];
        }
        if value == before {
            return value;
        }
    }
}

/// Extract the label value from a full options string, or an empty string
/// when no label-bearing key is present.
pub fn extract_label(options: &str) -> String {
    for &(key, decorated) in LABEL_KEYS {
        if let Some(value_start) = find_key(options, key, decorated) {
            return strip_outer_wrap(take_value(&options[value_start..])).to_string();
        }
    }
    String::new()
}
