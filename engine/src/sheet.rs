//! FILENAME: engine/src/sheet.rs
//! PURPOSE: Manages the collection of cells (The Spreadsheet Sheet).
//! CONTEXT: This file defines the `Sheet` struct which owns all cell data
//! and the dependency graph between cells. It uses a sparse storage
//! strategy (HashMap) to efficiently handle sheets where most cells are
//! empty, and drives the edit sequence: parse, cycle check, content swap,
//! edge rewiring, cache invalidation. If parsing or the cycle check fails,
//! nothing observable changes.

use log::{debug, trace};
use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use thiserror::Error;

use crate::cell::{Cell, CellContent};
use crate::dependency_graph::DependencyGraph;
use crate::position::{Position, Size};
use parser::ParseError;

/// Errors raised out of the Sheet API. Unlike `CellError`, these never
/// appear as cell values; they abort the operation that caused them.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("invalid position ({}, {})", .0.row, .0.col)]
    InvalidPosition(Position),

    #[error("formula syntax: {0}")]
    FormulaSyntax(#[from] ParseError),

    #[error("setting {0} would introduce a circular dependency")]
    CircularDependency(Position),
}

/// The Sheet struct holds the state of the spreadsheet data.
/// It uses a sparse representation (HashMap) mapping positions to Cells.
#[derive(Debug, Default)]
pub struct Sheet {
    /// Sparse storage: keys are positions, values are Cell instances.
    pub(crate) cells: HashMap<Position, Cell>,

    /// Reference edges between cells, kept in sync with cell contents.
    pub(crate) graph: DependencyGraph,
}

impl Sheet {
    /// Creates a new, empty Sheet.
    pub fn new() -> Self {
        Sheet {
            cells: HashMap::new(),
            graph: DependencyGraph::new(),
        }
    }

    /// Sets the content of the cell at `pos` from raw input text.
    ///
    /// Empty text makes the cell Empty; text of length >= 2 starting with
    /// '=' is parsed as a formula; anything else is literal text. The edit
    /// sequence is: parse, cycle check, content swap, edge rewiring, cache
    /// invalidation of the cell and its transitive dependents. A parse or
    /// cycle failure leaves the sheet untouched.
    ///
    /// Valid positions referenced by the new formula that have no cell yet
    /// are materialized as Empty cells, so the edge relation stays closed
    /// over existing cells.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<(), SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition(pos));
        }

        let content = match CellContent::from_input(text) {
            Ok(content) => content,
            Err(error) => {
                debug!("rejected edit at {}: {}", pos, error);
                return Err(SheetError::FormulaSyntax(error));
            }
        };

        let new_precedents = content.referenced_cells();
        let precedent_set: HashSet<Position> = new_precedents.iter().copied().collect();

        if self.graph.would_create_cycle(pos, &precedent_set) {
            debug!("rejected edit at {}: circular dependency", pos);
            return Err(SheetError::CircularDependency(pos));
        }

        // Materialize referenced cells that do not exist yet.
        for &precedent in &new_precedents {
            self.cells.entry(precedent).or_default();
        }

        self.cells.entry(pos).or_default().set_content(content);
        self.graph.set_dependencies(pos, precedent_set);
        self.invalidate_from(pos);

        Ok(())
    }

    /// Returns the cell at `pos` if one exists. Never materializes.
    pub fn get_cell(&self, pos: Position) -> Result<Option<&Cell>, SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition(pos));
        }
        Ok(self.cells.get(&pos))
    }

    /// Unchecked lookup for internal use (the evaluator has already
    /// validated the position).
    pub(crate) fn cell_at(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(&pos)
    }

    /// Reverts the cell at `pos` to Empty. The node itself is only removed
    /// from storage when no other cell references it, so dependents keep a
    /// target for their edges.
    pub fn clear_cell(&mut self, pos: Position) -> Result<(), SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition(pos));
        }

        match self.cells.get_mut(&pos) {
            Some(cell) => cell.set_content(CellContent::Empty),
            None => return Ok(()),
        }

        self.graph.clear_dependencies(pos);
        self.invalidate_from(pos);

        if self.graph.get_dependents(pos).is_none() {
            self.cells.remove(&pos);
        }

        Ok(())
    }

    /// Drops the memoized value of the cell at `pos` and of every cell that
    /// transitively reads it.
    fn invalidate_from(&self, pos: Position) {
        if let Some(cell) = self.cells.get(&pos) {
            cell.invalidate_cache();
        }

        let dependents = self.graph.get_all_dependents(pos);
        if !dependents.is_empty() {
            trace!("invalidating {} dependent cell(s) of {}", dependents.len(), pos);
        }
        for dependent in dependents {
            if let Some(cell) = self.cells.get(&dependent) {
                cell.invalidate_cache();
            }
        }
    }

    /// The smallest rectangle that contains every cell whose text is
    /// non-empty, as 1-based row/column counts.
    pub fn printable_size(&self) -> Size {
        let mut size = Size::default();
        for (pos, cell) in &self.cells {
            if !cell.text().is_empty() {
                size.rows = size.rows.max(pos.row + 1);
                size.cols = size.cols.max(pos.col + 1);
            }
        }
        size
    }

    /// Prints the printable area with one line per row, fields separated by
    /// a single TAB. Missing cells print as empty fields.
    fn print<W: Write>(
        &self,
        out: &mut W,
        format_cell: impl Fn(&Cell, &Sheet) -> String,
    ) -> io::Result<()> {
        let size = self.printable_size();

        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    write!(out, "\t")?;
                }
                if let Some(cell) = self.cells.get(&Position::new(row, col)) {
                    write!(out, "{}", format_cell(cell, self))?;
                }
            }
            writeln!(out)?;
        }

        Ok(())
    }

    /// Prints computed values: numbers in their default form, text verbatim,
    /// errors as their tokens (#REF!, #VALUE!, #DIV/0!).
    pub fn print_values<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print(out, |cell, sheet| cell.value(sheet).to_string())
    }

    /// Prints raw cell texts: formulas in canonical form with their leading
    /// '=', text cells verbatim (escape apostrophe included).
    pub fn print_texts<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print(out, |cell, _| cell.text())
    }
}
