//! FILENAME: engine/src/lib.rs
//! PURPOSE: Main library entry point for the spreadsheet engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.
//!
//! The engine keeps a sparse grid of cells, a dependency graph over their
//! references, and evaluates formulas lazily with per-cell memoization.
//! Edits that would close a reference loop are rejected before anything
//! changes.

pub mod cell;
pub mod dependency_extractor;
pub mod dependency_graph;
pub mod evaluator;
pub mod formula;
pub mod position;
pub mod sheet;

// Re-export commonly used types at the crate root
pub use cell::{Cell, CellContent, CellError, CellValue, ESCAPE_SIGN, FORMULA_SIGN};
pub use dependency_extractor::extract_references;
pub use dependency_graph::DependencyGraph;
pub use evaluator::Evaluator;
pub use formula::Formula;
pub use position::{col_to_index, index_to_col, Position, Size, MAX_COLS, MAX_ROWS};
pub use sheet::{Sheet, SheetError};

// The parse error type appears in SheetError, so expose it alongside.
pub use parser::ParseError;
