//! Parser for the circuitikz drawing mini-language.
//!
//! One draw command is a sequence of coordinates, connectors and inline
//! node placements. The tokenizer splits the command into syntactic tokens
//! and the interpreter walks them once, emitting circuit elements.
//!
//! # Grammar Overview
//!
//! ```text
//! command    = { coordinate | wire | node_spec | path_spec }
//! coordinate = '(' raw_x ',' raw_y ')'
//! wire       = '--'
//! node_spec  = 'node' [ '[' options ']' ] [ '{' label '}' ]
//! path_spec  = 'to' '[' options ']'
//! options    = option { ',' option }            ; commas inside $...$ or {...} do not split
//! option     = position | key '=' value | kind
//! ```
//!
//! # Option Vocabulary
//!
//! | Option | Meaning |
//! |--------|---------|
//! | `R`, `C`, `L`, `V`, `I`, ... | Component type (aliased to canonical names) |
//! | `short` | Plain wire instead of a component |
//! | `-o`, `o-`, `o-o`, `*-*`, `*-o`, `o-*` | Terminal markers at the segment endpoints |
//! | `l=`, `R=`, `L=`, `C=`, `v=`, `i=` | Label value (first key wins, in that order) |
//! | `above`, `below`, `left`, `right` | Label position keyword |
//! | `label=pos:value` | Label with explicit position |
//! | `*`, `o` | Node kind shorthand (filled / open circle) |
//!
//! # Parsing Policy
//!
//! Parsing is permissive and best-effort: unrecognized characters, malformed
//! node specs and bracket-less path specs are dropped, never fatal. The
//! [`Diagnostics`] counters record every drop for observability; output
//! shape is unaffected.
//!
//! # Example
//!
//! ```
//! use tikzcircuit::dsl;
//!
//! let elements = dsl::parse_draw_command("(0,0) to[R, l=$R_1$] (2,0)");
//! assert_eq!(elements.len(), 1);
//! ```

mod connector;
mod interp;
mod label;
mod lexer;
mod scan;

pub use connector::{classify, Connector, MarkerKind};
pub use interp::{Diagnostics, Interpreter};
pub use label::extract_label;
pub use lexer::{tokenize, Token};
pub use scan::{match_delimiter, split_options};

use crate::element::Element;

/// Parse a single pre-cleaned draw command into circuit elements.
///
/// The pen starts at the origin. To interpret several commands of one
/// document with the pen position carried across them, drive an
/// [`Interpreter`] directly.
pub fn parse_draw_command(command: &str) -> Vec<Element> {
    let mut interp = Interpreter::new();
    interp.run(&tokenize(command));
    interp.into_elements()
}
