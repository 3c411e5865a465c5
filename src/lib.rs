//! # Tikzcircuit
//!
//! Extracts structured circuit elements from hand-written circuitikz
//! drawings embedded in LaTeX documents.
//!
//! This library provides:
//! - A permissive tokenizer and interpreter for the circuitikz drawing
//!   mini-language (coordinates, wires, `to[...]` components, inline nodes)
//! - Document-level extraction: drawing-block location, comment stripping,
//!   named-coordinate resolution
//! - An ordered, JSON-serializable element model (nodes, wires, paths)
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`dsl`] - Tokenizer and token-stream interpreter for draw commands
//! - [`extract`] - LaTeX document handling and the document conversion entry point
//! - [`element`] - Element records, coordinate transform and alias tables
//! - [`error`] - Unified error type
//!
//! ## Usage
//!
//! ```
//! use tikzcircuit::convert_document;
//!
//! let latex = r"\begin{circuitikz}
//!   \draw (0,0) to[R, l=$R_1$] (2,0);
//! \end{circuitikz}";
//!
//! let elements = convert_document(latex).unwrap();
//! assert_eq!(elements.len(), 1);
//! ```
//!
//! ## Parsing Model
//!
//! One draw command is tokenized in a single pass, then interpreted by a
//! state machine that carries the current pen position and a pending label.
//! Element order is emission order and is semantically meaningful: it is
//! the visual stacking order of the drawing. Parsing is best-effort;
//! malformed fragments are dropped, never fatal (see the [`dsl`] docs).

pub mod dsl;
pub mod element;
pub mod error;
pub mod extract;

// Re-export main types for convenience
pub use element::{Element, Label, Position};
pub use error::{Result, TikzError};
pub use extract::convert_document;
