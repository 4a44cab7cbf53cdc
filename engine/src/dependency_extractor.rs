//! FILENAME: engine/src/dependency_extractor.rs
//! PURPOSE: Walks a formula AST and collects the positions it references.
//! CONTEXT: The Sheet uses the extracted references to wire dependency
//! edges before a formula is committed; the Formula wrapper uses them to
//! report a cell's inputs. Order matters: references come out in
//! left-to-right formula order, and invalid labels come out as
//! `Position::NONE` so callers can decide how to treat them.

use crate::position::Position;
use parser::Expression;

/// Collects every cell reference in the expression, in left-to-right AST
/// order. References that do not name a grid position map to
/// `Position::NONE`; no deduplication happens at this level.
pub fn extract_references(expr: &Expression) -> Vec<Position> {
    let mut references = Vec::new();
    walk_expression(expr, &mut references);
    references
}

fn walk_expression(expr: &Expression, references: &mut Vec<Position>) {
    match expr {
        Expression::Number(_) => {}
        Expression::CellRef(text) => references.push(Position::from_string(text)),
        Expression::UnaryOp { operand, .. } => walk_expression(operand, references),
        Expression::BinaryOp { left, right, .. } => {
            walk_expression(left, references);
            walk_expression(right, references);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parser::parse;

    #[test]
    fn test_extracts_in_formula_order() {
        let expr = parse("C1+A1*B1").unwrap();
        assert_eq!(
            extract_references(&expr),
            vec![
                Position::new(0, 2),
                Position::new(0, 0),
                Position::new(0, 1),
            ]
        );
    }

    #[test]
    fn test_extracts_through_unary_and_parens() {
        let expr = parse("-(A1+(B1))").unwrap();
        assert_eq!(
            extract_references(&expr),
            vec![Position::new(0, 0), Position::new(0, 1)]
        );
    }

    #[test]
    fn test_literals_contribute_nothing() {
        let expr = parse("1+2*3").unwrap();
        assert!(extract_references(&expr).is_empty());
    }

    #[test]
    fn test_invalid_reference_becomes_none() {
        let expr = parse("AAAA1+A1").unwrap();
        assert_eq!(
            extract_references(&expr),
            vec![Position::NONE, Position::new(0, 0)]
        );
    }
}
