//! FILENAME: engine/src/cell.rs
//! PURPOSE: Defines the fundamental data structures for a single spreadsheet cell.
//! CONTEXT: This file contains the `Cell` struct, the `CellContent` sum type
//! (Empty / Text / Formula) and the `CellValue` / `CellError` result types.
//! A Formula variant carries its own value cache; the cache is cleared when
//! the cell or any cell it transitively feeds into is edited.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;

use crate::formula::Formula;
use crate::position::Position;
use crate::sheet::Sheet;
use parser::ParseError;

/// Marks the remainder of the input as a formula expression.
pub const FORMULA_SIGN: char = '=';

/// A leading apostrophe forces literal text even if the rest starts with '='.
pub const ESCAPE_SIGN: char = '\'';

/// Represents the evaluation errors a cell can hold (e.g. #DIV/0!).
/// These are values carried in `CellValue`, never unwound through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellError {
    /// Reference to a position outside the grid
    Ref,
    /// A referenced cell's text is not numeric, or arithmetic overflowed
    Value,
    /// Division by a divisor that evaluated to exactly zero
    Div0,
}

impl std::fmt::Display for CellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellError::Ref => write!(f, "#REF!"),
            CellError::Value => write!(f, "#VALUE!"),
            CellError::Div0 => write!(f, "#DIV/0!"),
        }
    }
}

/// The computed value of a cell. An Empty cell reports `Text("")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Error(CellError),
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

/// What a cell holds. Formula keeps its memoized result next to the AST so
/// the cache cannot outlive the content it was computed from.
#[derive(Debug, Clone)]
pub enum CellContent {
    Empty,
    Text(String),
    Formula {
        formula: Formula,
        cache: RefCell<Option<CellValue>>,
    },
}

impl CellContent {
    /// Builds the content variant for raw user input.
    /// "" -> Empty; "=<expr>" (length >= 2) -> Formula; anything else -> Text.
    /// A formula that fails to parse surfaces the error and produces nothing.
    pub(crate) fn from_input(text: &str) -> Result<CellContent, ParseError> {
        if text.is_empty() {
            return Ok(CellContent::Empty);
        }

        if text.len() > 1 && text.starts_with(FORMULA_SIGN) {
            let formula = Formula::parse(&text[1..])?;
            return Ok(CellContent::Formula {
                formula,
                cache: RefCell::new(None),
            });
        }

        Ok(CellContent::Text(text.to_string()))
    }

    /// The valid grid positions this content reads, in formula order.
    pub(crate) fn referenced_cells(&self) -> Vec<Position> {
        match self {
            CellContent::Empty | CellContent::Text(_) => Vec::new(),
            CellContent::Formula { formula, .. } => formula.referenced_cells(),
        }
    }
}

/// The atomic unit of the spreadsheet.
#[derive(Debug, Clone)]
pub struct Cell {
    content: CellContent,
}

impl Cell {
    pub fn new() -> Self {
        Cell {
            content: CellContent::Empty,
        }
    }

    /// Replaces the content. Callers (the Sheet) are responsible for the
    /// cycle check, edge bookkeeping and cache invalidation around the swap.
    pub(crate) fn set_content(&mut self, content: CellContent) {
        self.content = content;
    }

    /// Returns the computed value of the cell.
    ///
    /// - Empty: the empty string.
    /// - Text: the stored text with a single leading escape apostrophe
    ///   stripped.
    /// - Formula: the cached result if present, otherwise the formula is
    ///   evaluated against `sheet` and the result (number or error) cached.
    pub fn value(&self, sheet: &Sheet) -> CellValue {
        match &self.content {
            CellContent::Empty => CellValue::Text(String::new()),
            CellContent::Text(text) => {
                let stripped = text.strip_prefix(ESCAPE_SIGN).unwrap_or(text);
                CellValue::Text(stripped.to_string())
            }
            CellContent::Formula { formula, cache } => {
                if let Some(value) = cache.borrow().clone() {
                    return value;
                }
                let value = match formula.evaluate(sheet) {
                    Ok(number) => CellValue::Number(number),
                    Err(error) => CellValue::Error(error),
                };
                *cache.borrow_mut() = Some(value.clone());
                value
            }
        }
    }

    /// Returns the user-facing text of the cell: "" for Empty, the stored
    /// text verbatim for Text (escape apostrophe included), and "=" followed
    /// by the canonical expression for Formula.
    pub fn text(&self) -> String {
        match &self.content {
            CellContent::Empty => String::new(),
            CellContent::Text(text) => text.clone(),
            CellContent::Formula { formula, .. } => {
                format!("{}{}", FORMULA_SIGN, formula.expression())
            }
        }
    }

    /// The valid positions referenced by the current content, deduplicated
    /// (adjacent only) and in left-to-right formula order.
    pub fn referenced_cells(&self) -> Vec<Position> {
        self.content.referenced_cells()
    }

    /// Drops the memoized formula result. A no-op for Empty and Text cells
    /// and for an already-empty cache.
    pub fn invalidate_cache(&self) {
        if let CellContent::Formula { cache, .. } = &self.content {
            cache.borrow_mut().take();
        }
    }

    /// True if a Formula cell currently holds a memoized result.
    pub fn is_cached(&self) -> bool {
        match &self.content {
            CellContent::Formula { cache, .. } => cache.borrow().is_some(),
            _ => false,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content() {
        let content = CellContent::from_input("").unwrap();
        assert!(matches!(content, CellContent::Empty));
    }

    #[test]
    fn test_text_content() {
        let content = CellContent::from_input("hello").unwrap();
        assert!(matches!(content, CellContent::Text(_)));
    }

    #[test]
    fn test_lone_formula_sign_is_text() {
        // "=" by itself is too short to be a formula.
        let content = CellContent::from_input("=").unwrap();
        assert!(matches!(content, CellContent::Text(_)));
    }

    #[test]
    fn test_formula_content() {
        let content = CellContent::from_input("=1+2").unwrap();
        assert!(matches!(content, CellContent::Formula { .. }));
    }

    #[test]
    fn test_formula_parse_failure_surfaces() {
        assert!(CellContent::from_input("=1+").is_err());
        assert!(CellContent::from_input("=(1").is_err());
    }

    #[test]
    fn test_escape_sign_stripped_from_value_only() {
        let sheet = Sheet::new();
        let mut cell = Cell::new();
        cell.set_content(CellContent::from_input("'=1+2").unwrap());

        assert_eq!(cell.value(&sheet), CellValue::Text("=1+2".to_string()));
        assert_eq!(cell.text(), "'=1+2");
    }

    #[test]
    fn test_single_escape_sign_stripped() {
        let sheet = Sheet::new();
        let mut cell = Cell::new();
        cell.set_content(CellContent::from_input("''quoted").unwrap());

        // Only one apostrophe comes off.
        assert_eq!(cell.value(&sheet), CellValue::Text("'quoted".to_string()));
        assert_eq!(cell.text(), "''quoted");
    }

    #[test]
    fn test_formula_text_is_canonical() {
        let mut cell = Cell::new();
        cell.set_content(CellContent::from_input("=1 + 2 * 3").unwrap());
        assert_eq!(cell.text(), "=1+2*3");
    }

    #[test]
    fn test_error_tokens() {
        assert_eq!(CellError::Ref.to_string(), "#REF!");
        assert_eq!(CellError::Value.to_string(), "#VALUE!");
        assert_eq!(CellError::Div0.to_string(), "#DIV/0!");
    }

    #[test]
    fn test_cell_value_display() {
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Number(10.0).to_string(), "10");
        assert_eq!(CellValue::Text("x".to_string()).to_string(), "x");
        assert_eq!(
            CellValue::Error(CellError::Div0).to_string(),
            "#DIV/0!"
        );
    }

    #[test]
    fn test_cell_value_serde_roundtrip() {
        let value = CellValue::Error(CellError::Value);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(serde_json::from_str::<CellValue>(&json).unwrap(), value);
    }
}
