//! Formula abstract syntax tree.
//!
//! Formulas are immutable expression trees owned by exactly one quality or
//! condition. Leaves reference model elements through arena handles, so a
//! formula never holds a textual name once it has been linked.

use crate::model::ElementId;

/// Binary operators shared by boolean, arithmetic and comparison formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    Plus,
    Minus,
    Multiply,
    Divide,
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Neq,
}

impl BinaryOp {
    /// Prolog arithmetic operator, for `Plus`/`Minus`/`Multiply`/`Divide`.
    pub fn arithmetic_symbol(self) -> Option<&'static str> {
        match self {
            BinaryOp::Plus => Some("+"),
            BinaryOp::Minus => Some("-"),
            BinaryOp::Multiply => Some("*"),
            BinaryOp::Divide => Some("/"),
            _ => None,
        }
    }

    /// Prolog arithmetic comparison operator, for the six comparison kinds.
    pub fn comparison_symbol(self) -> Option<&'static str> {
        match self {
            BinaryOp::Gt => Some(">"),
            BinaryOp::Gte => Some(">="),
            BinaryOp::Lt => Some("<"),
            BinaryOp::Lte => Some("=<"),
            BinaryOp::Eq => Some("=:="),
            BinaryOp::Neq => Some("=\\="),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Plus => "plus",
            BinaryOp::Minus => "minus",
            BinaryOp::Multiply => "multiply",
            BinaryOp::Divide => "divide",
            BinaryOp::Gt => "gt",
            BinaryOp::Gte => "gte",
            BinaryOp::Lt => "lt",
            BinaryOp::Lte => "lte",
            BinaryOp::Eq => "eq",
            BinaryOp::Neq => "neq",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
    /// Evaluate the operand at the initial situation `s0`.
    Previous,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "not",
            UnaryOp::Negate => "negate",
            UnaryOp::Previous => "previous",
        }
    }
}

/// A linked formula node.
#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    Atom(ElementId),
    Number(f64),
    Bool(bool),
    Binary {
        op: BinaryOp,
        left: Box<Formula>,
        right: Box<Formula>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Formula>,
    },
}

impl Formula {
    pub fn binary(op: BinaryOp, left: Formula, right: Formula) -> Self {
        Formula::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Formula) -> Self {
        Formula::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// True if the tree contains `Previous(Atom(target))` anywhere.
    pub fn references_previous(&self, target: ElementId) -> bool {
        match self {
            Formula::Unary {
                op: UnaryOp::Previous,
                operand,
            } => matches!(operand.as_ref(), Formula::Atom(id) if *id == target)
                || operand.references_previous(target),
            Formula::Unary { operand, .. } => operand.references_previous(target),
            Formula::Binary { left, right, .. } => {
                left.references_previous(target) || right.references_previous(target)
            }
            Formula::Atom(_) | Formula::Number(_) | Formula::Bool(_) => false,
        }
    }

    /// Maximum nesting depth (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        match self {
            Formula::Atom(_) | Formula::Number(_) | Formula::Bool(_) => 1,
            Formula::Unary { operand, .. } => 1 + operand.depth(),
            Formula::Binary { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_previous_finds_nested_self_reference() {
        let target = ElementId(3);
        let formula = Formula::binary(
            BinaryOp::Plus,
            Formula::Number(1.0),
            Formula::unary(UnaryOp::Previous, Formula::Atom(target)),
        );
        assert!(formula.references_previous(target));
        assert!(!formula.references_previous(ElementId(4)));
    }

    #[test]
    fn plain_atom_is_not_a_previous_reference() {
        let target = ElementId(0);
        assert!(!Formula::Atom(target).references_previous(target));
    }

    #[test]
    fn depth_counts_longest_branch() {
        let formula = Formula::binary(
            BinaryOp::And,
            Formula::Bool(true),
            Formula::unary(UnaryOp::Not, Formula::Atom(ElementId(0))),
        );
        assert_eq!(formula.depth(), 3);
    }
}
