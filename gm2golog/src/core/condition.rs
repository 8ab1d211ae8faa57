//! Condition renderer: boolean formulas as goals over the situation `S`.

use crate::core::diagnostics::Diagnostics;
use crate::core::naming::{CURRENT, FLUENT, INITIAL, SAT, suffixed};
use crate::core::quantity::render_quantity;
use crate::formula::{BinaryOp, Formula, UnaryOp};
use crate::model::{ElementId, ElementKind, Model};

/// Placeholder goal for subtrees that have no boolean meaning.
const PLACEHOLDER: &str = "true";

pub fn render_condition(
    model: &Model,
    formula: &Formula,
    diagnostics: &mut Diagnostics,
) -> String {
    match formula {
        Formula::Atom(id) => atom(model, *id, diagnostics),
        Formula::Bool(true) => "true".to_string(),
        Formula::Bool(false) => "fail".to_string(),
        Formula::Number(value) => {
            diagnostics.report(format!("number {value} used as a condition"));
            PLACEHOLDER.to_string()
        }
        Formula::Unary { op, operand } => match op {
            UnaryOp::Not => format!("\\+ ({})", render_condition(model, operand, diagnostics)),
            UnaryOp::Previous => match operand.as_ref() {
                Formula::Atom(id) => suffixed(model.name_of(*id), FLUENT, INITIAL),
                _ => {
                    diagnostics.report("previous applies only to an element reference");
                    PLACEHOLDER.to_string()
                }
            },
            UnaryOp::Negate => {
                diagnostics.report(format!(
                    "arithmetic operator '{}' used as a condition",
                    op.as_str()
                ));
                PLACEHOLDER.to_string()
            }
        },
        Formula::Binary { op, left, right } => {
            if let Some(symbol) = op.comparison_symbol() {
                return comparison(model, left, right, symbol, diagnostics);
            }
            let sep = match op {
                BinaryOp::And => ",",
                BinaryOp::Or => ";",
                _ => {
                    diagnostics.report(format!(
                        "arithmetic operator '{}' used as a condition",
                        op.as_str()
                    ));
                    return PLACEHOLDER.to_string();
                }
            };
            let left = render_condition(model, left, diagnostics);
            let right = render_condition(model, right, diagnostics);
            format!("({left} {sep} {right})")
        }
    }
}

fn atom(model: &Model, id: ElementId, diagnostics: &mut Diagnostics) -> String {
    let element = model.element(id);
    match element.kind {
        ElementKind::Goal(_) | ElementKind::Task(_) => suffixed(&element.name, SAT, CURRENT),
        ElementKind::Predicate => suffixed(&element.name, FLUENT, CURRENT),
        ElementKind::Quality(_) | ElementKind::Variable | ElementKind::Condition(_) => {
            suffixed(&element.name, "", CURRENT)
        }
        ElementKind::Effect(_) => {
            diagnostics.report(format!(
                "'{}' is an effect and cannot be evaluated; using its name",
                element.name
            ));
            element.name.clone()
        }
    }
}

/// Bind both sides, then compare the bound values.
fn comparison(
    model: &Model,
    left: &Formula,
    right: &Formula,
    symbol: &str,
    diagnostics: &mut Diagnostics,
) -> String {
    let left = render_quantity(model, left, diagnostics);
    let right = render_quantity(model, right, diagnostics);
    let mut goals = left.bindings;
    for binding in right.bindings {
        if !goals.contains(&binding) {
            goals.push(binding);
        }
    }
    goals.push(format!("{} {symbol} {}", left.expression, right.expression));
    format!("({})", goals.join(", "))
}
