//! FILENAME: engine/src/evaluator.rs
//! PURPOSE: Evaluates AST expressions to compute cell values.
//! CONTEXT: After a formula is parsed into an AST, this module traverses
//! the tree post-order and computes the final f64 result, resolving cell
//! references through the owning Sheet. Referenced formula cells evaluate
//! (and memoize) themselves recursively; edit-time cycle rejection
//! guarantees the recursion terminates.
//!
//! RESOLUTION RULES for a referenced position:
//! - outside the grid            -> #REF!
//! - no cell there               -> 0.0
//! - numeric value               -> that number
//! - empty text                  -> 0.0
//! - numeric text                -> the parsed number
//! - non-numeric text            -> #VALUE!
//! - error value                 -> that error, unchanged
//!
//! Division by an exactly-zero divisor is #DIV/0!; any other non-finite
//! intermediate result (overflow to infinity, NaN) is #VALUE!.

use crate::cell::{CellError, CellValue};
use crate::position::Position;
use crate::sheet::Sheet;
use parser::{BinaryOperator, Expression, UnaryOperator};

/// The formula evaluator.
/// Holds a reference to the sheet for cell lookups.
pub struct Evaluator<'a> {
    sheet: &'a Sheet,
}

impl<'a> Evaluator<'a> {
    pub fn new(sheet: &'a Sheet) -> Self {
        Evaluator { sheet }
    }

    /// Evaluates an AST expression and returns the result.
    pub fn evaluate(&self, expr: &Expression) -> Result<f64, CellError> {
        match expr {
            Expression::Number(n) => Ok(*n),
            Expression::CellRef(reference) => self.eval_cell_ref(reference),
            Expression::UnaryOp { op, operand } => self.eval_unary_op(*op, operand),
            Expression::BinaryOp { left, op, right } => self.eval_binary_op(left, *op, right),
        }
    }

    /// Resolves a referenced cell to a numeric operand.
    fn eval_cell_ref(&self, reference: &str) -> Result<f64, CellError> {
        let pos = Position::from_string(reference);
        if !pos.is_valid() {
            return Err(CellError::Ref);
        }

        let cell = match self.sheet.cell_at(pos) {
            Some(cell) => cell,
            None => return Ok(0.0),
        };

        match cell.value(self.sheet) {
            CellValue::Number(n) => Ok(n),
            CellValue::Text(s) => {
                if s.is_empty() {
                    Ok(0.0)
                } else {
                    parse_cell_number(&s).ok_or(CellError::Value)
                }
            }
            CellValue::Error(e) => Err(e),
        }
    }

    fn eval_unary_op(&self, op: UnaryOperator, operand: &Expression) -> Result<f64, CellError> {
        let value = self.evaluate(operand)?;

        let result = match op {
            UnaryOperator::Plus => value,
            UnaryOperator::Negate => -value,
        };

        if !result.is_finite() {
            return Err(CellError::Value);
        }
        Ok(result)
    }

    fn eval_binary_op(
        &self,
        left: &Expression,
        op: BinaryOperator,
        right: &Expression,
    ) -> Result<f64, CellError> {
        let lhs = self.evaluate(left)?;
        let rhs = self.evaluate(right)?;

        let result = match op {
            BinaryOperator::Add => lhs + rhs,
            BinaryOperator::Subtract => lhs - rhs,
            BinaryOperator::Multiply => lhs * rhs,
            BinaryOperator::Divide => {
                if rhs == 0.0 {
                    return Err(CellError::Div0);
                }
                lhs / rhs
            }
        };

        if !result.is_finite() {
            return Err(CellError::Value);
        }
        Ok(result)
    }
}

/// Numeric coercion of cell text: leading whitespace is permitted, the
/// entire remainder must parse as a decimal number.
fn parse_cell_number(text: &str) -> Option<f64> {
    text.trim_start().parse().ok()
}
