//! FILENAME: parser/src/ast.rs
//! PURPOSE: Defines the Abstract Syntax Tree (AST) for formula expressions.
//! CONTEXT: After the Lexer tokenizes a formula string, the Parser converts
//! those tokens into this tree structure. The Evaluator then traverses
//! this tree to compute the final result, and Display renders the tree
//! back to its canonical text form.
//!
//! SUPPORTED EXPRESSIONS:
//! - Numeric literals: 1, 2.5, 1e308
//! - Cell references: A1, AA100 (stored as raw text)
//! - Binary operations: +, -, *, /
//! - Unary operations: + and - (a single sign in front of a primary)

/// Represents a parsed formula expression.
/// This is the core data structure that the evaluator will traverse.
#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    /// A numeric literal.
    Number(f64),

    /// A cell reference like A1 or AA100, kept as the raw source text.
    /// Out-of-range references survive parsing unchanged and only become
    /// #REF! when the formula is evaluated.
    CellRef(String),

    /// A unary operation: op operand (e.g. -5, +A1).
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    /// A binary operation: left op right (e.g. 5 + 3, A1 * 2).
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
}

/// Binary operators, all arithmetic over f64.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BinaryOperator {
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /
}

/// Unary operators.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum UnaryOperator {
    Plus,   // +
    Negate, // -
}

/// Relative binding strength used by the canonical printer.
/// Atoms never need parentheses; unary binds tighter than * /,
/// which bind tighter than + -.
const PRECEDENCE_ADDITIVE: u8 = 0;
const PRECEDENCE_MULTIPLICATIVE: u8 = 1;
const PRECEDENCE_UNARY: u8 = 2;
const PRECEDENCE_ATOM: u8 = 3;

impl Expression {
    /// Returns the precedence rank of this node's top-level operator.
    pub fn precedence(&self) -> u8 {
        match self {
            Expression::Number(_) | Expression::CellRef(_) => PRECEDENCE_ATOM,
            Expression::UnaryOp { .. } => PRECEDENCE_UNARY,
            Expression::BinaryOp { op, .. } => match op {
                BinaryOperator::Multiply | BinaryOperator::Divide => PRECEDENCE_MULTIPLICATIVE,
                BinaryOperator::Add | BinaryOperator::Subtract => PRECEDENCE_ADDITIVE,
            },
        }
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOperator::Add => write!(f, "+"),
            BinaryOperator::Subtract => write!(f, "-"),
            BinaryOperator::Multiply => write!(f, "*"),
            BinaryOperator::Divide => write!(f, "/"),
        }
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Plus => write!(f, "+"),
            UnaryOperator::Negate => write!(f, "-"),
        }
    }
}

/// Canonical infix printing with minimum parenthesization.
///
/// Parenthesization rules:
/// - A child on the left of a binary operator is parenthesized iff its
///   precedence is strictly lower than the parent's.
/// - A child on the right of + or - is parenthesized iff its precedence is
///   lower or equal, so 1-(2-3) keeps its grouping.
/// - A child on the right of * or / is parenthesized iff its precedence is
///   strictly lower.
/// - The operand of a unary sign is parenthesized when it is an additive
///   expression or another unary sign, so -(-1) stays parseable.
impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Number(n) => write!(f, "{}", n),
            Expression::CellRef(reference) => write!(f, "{}", reference),
            Expression::UnaryOp { op, operand } => {
                write!(f, "{}", op)?;
                let needs_parens = operand.precedence() == PRECEDENCE_ADDITIVE
                    || operand.precedence() == PRECEDENCE_UNARY;
                if needs_parens {
                    write!(f, "({})", operand)
                } else {
                    write!(f, "{}", operand)
                }
            }
            Expression::BinaryOp { left, op, right } => {
                let parent = self.precedence();

                if left.precedence() < parent {
                    write!(f, "({})", left)?;
                } else {
                    write!(f, "{}", left)?;
                }

                write!(f, "{}", op)?;

                let needs_parens = match op {
                    BinaryOperator::Add | BinaryOperator::Subtract => {
                        right.precedence() <= parent
                    }
                    BinaryOperator::Multiply | BinaryOperator::Divide => {
                        right.precedence() < parent
                    }
                };
                if needs_parens {
                    write!(f, "({})", right)
                } else {
                    write!(f, "{}", right)
                }
            }
        }
    }
}
