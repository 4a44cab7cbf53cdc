//! FILENAME: engine/src/dependency_graph.rs
//! PURPOSE: Tracks which cells read which other cells.
//! CONTEXT: The Sheet consults this graph on every edit: to reject edits
//! that would close a reference loop, and to find every downstream formula
//! whose cached value must be dropped when an input changes.
//!
//! TERMINOLOGY:
//! - Precedents: Cells that a formula cell references (its inputs).
//!   If A3 = A1 + A2, then A1 and A2 are precedents of A3.
//! - Dependents: Cells that reference a given cell (reverse lookup).
//!   If A3 = A1 + A2, then A3 is a dependent of A1 and A2.
//!
//! The two maps are kept mutually symmetric: A is a precedent of B exactly
//! when B is a dependent of A.

use crate::position::Position;
use std::collections::{HashMap, HashSet, VecDeque};

/// The Dependency Graph tracks relationships between cells.
/// It maintains both forward (precedents) and reverse (dependents) mappings
/// for efficient lookups in either direction.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// For each cell, the set of cells it directly depends on (its precedents).
    precedents: HashMap<Position, HashSet<Position>>,

    /// For each cell, the set of cells that directly depend on it (its dependents).
    dependents: HashMap<Position, HashSet<Position>>,
}

impl DependencyGraph {
    /// Creates a new, empty dependency graph.
    pub fn new() -> Self {
        DependencyGraph {
            precedents: HashMap::new(),
            dependents: HashMap::new(),
        }
    }

    /// Sets the dependencies for a cell, replacing any previous dependencies.
    /// This updates both the precedents and dependents mappings.
    ///
    /// # Note
    /// This does NOT check for cycles. Use `would_create_cycle()` first.
    pub fn set_dependencies(&mut self, cell: Position, new_precedents: HashSet<Position>) {
        // First, remove old dependencies
        self.clear_dependencies(cell);

        if !new_precedents.is_empty() {
            // Update the dependents map: for each precedent, add this cell as a dependent
            for &prec in &new_precedents {
                self.dependents.entry(prec).or_default().insert(cell);
            }

            // Store the precedents for this cell
            self.precedents.insert(cell, new_precedents);
        }
    }

    /// Clears all dependencies for a cell.
    /// Call this when a cell becomes a literal value or is cleared.
    pub fn clear_dependencies(&mut self, cell: Position) {
        if let Some(old_precs) = self.precedents.remove(&cell) {
            // Remove this cell from each precedent's dependents set
            for prec in old_precs {
                if let Some(deps) = self.dependents.get_mut(&prec) {
                    deps.remove(&cell);
                    // Clean up empty sets
                    if deps.is_empty() {
                        self.dependents.remove(&prec);
                    }
                }
            }
        }
    }

    /// Returns the direct precedents of a cell (cells it directly references),
    /// or None if the cell has no precedents.
    pub fn get_precedents(&self, cell: Position) -> Option<&HashSet<Position>> {
        self.precedents.get(&cell)
    }

    /// Returns the direct dependents of a cell (cells that directly reference
    /// it), or None if no cells depend on this cell.
    pub fn get_dependents(&self, cell: Position) -> Option<&HashSet<Position>> {
        self.dependents.get(&cell)
    }

    /// Checks if giving `cell` the proposed precedents would close a
    /// reference loop.
    ///
    /// The walk runs over **dependents** edges starting from `cell`: those
    /// are exactly the cells whose recomputation would depend on `cell`
    /// after the edit. If any of them (including `cell` itself) appears in
    /// the proposed precedent set, committing the edit would create a cycle.
    /// A proposed precedent with no cell yet has no dependents and cannot
    /// take part.
    pub fn would_create_cycle(
        &self,
        cell: Position,
        new_precedents: &HashSet<Position>,
    ) -> bool {
        if new_precedents.is_empty() {
            return false;
        }

        let mut visited = HashSet::new();
        let mut stack = vec![cell];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }

            if new_precedents.contains(&current) {
                return true;
            }

            if let Some(deps) = self.dependents.get(&current) {
                for &dep in deps {
                    if !visited.contains(&dep) {
                        stack.push(dep);
                    }
                }
            }
        }

        false
    }

    /// Gets all transitive dependents of a cell (not including the cell
    /// itself). Uses BFS with a visited set, so diamond-shaped graphs are
    /// traversed once. This is the invalidation frontier after an edit.
    pub fn get_all_dependents(&self, cell: Position) -> HashSet<Position> {
        let mut result = HashSet::new();
        let mut queue = VecDeque::new();

        // Start with direct dependents
        if let Some(deps) = self.dependents.get(&cell) {
            for &dep in deps {
                queue.push_back(dep);
            }
        }

        while let Some(current) = queue.pop_front() {
            if result.contains(&current) {
                continue;
            }
            result.insert(current);

            // Add this cell's dependents to the queue
            if let Some(deps) = self.dependents.get(&current) {
                for &dep in deps {
                    if !result.contains(&dep) {
                        queue.push_back(dep);
                    }
                }
            }
        }

        result
    }

    /// Returns the total number of cells that have precedents.
    pub fn formula_cell_count(&self) -> usize {
        self.precedents.len()
    }

    /// Returns the total number of dependency relationships.
    pub fn dependency_count(&self) -> usize {
        self.precedents.values().map(|v| v.len()).sum()
    }
}
