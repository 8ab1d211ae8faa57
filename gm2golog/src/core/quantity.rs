//! Quantity renderer: arithmetic formulas as value bindings plus an
//! expression over the bound variables.
//!
//! Every leaf becomes a goal binding `R_<term>` (or `R_<term>_init` at
//! `s0`). The expression mirrors the operator tree over those variables.

use crate::core::diagnostics::Diagnostics;
use crate::core::naming::{CURRENT, INIT, INITIAL, number, term};
use crate::formula::{Formula, UnaryOp};
use crate::model::{ElementId, ElementKind, Model};

/// Placeholder expression for subtrees that have no arithmetic meaning.
const PLACEHOLDER: &str = "0";

/// Bindings and value expression of a rendered formula.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Quantity {
    /// Binding goals, deduplicated, first occurrence first.
    pub bindings: Vec<String>,
    pub expression: String,
}

impl Quantity {
    fn bind(&mut self, goal: String) {
        if !self.bindings.contains(&goal) {
            self.bindings.push(goal);
        }
    }
}

pub fn render_quantity(
    model: &Model,
    formula: &Formula,
    diagnostics: &mut Diagnostics,
) -> Quantity {
    let mut quantity = Quantity::default();
    let rendered = expression(model, formula, &mut quantity, diagnostics);
    quantity.expression = rendered;
    quantity
}

/// Binding variable for `id` at the current (`initial = false`) or initial
/// situation.
pub fn binding_variable(model: &Model, id: ElementId, initial: bool) -> String {
    let base = format!("R_{}", term(model, id));
    if initial { format!("{base}{INIT}") } else { base }
}

fn expression(
    model: &Model,
    formula: &Formula,
    quantity: &mut Quantity,
    diagnostics: &mut Diagnostics,
) -> String {
    match formula {
        Formula::Atom(id) => leaf(model, *id, false, quantity, diagnostics),
        Formula::Number(value) => number(*value),
        Formula::Bool(flag) => String::from(if *flag { "1" } else { "0" }),
        Formula::Unary {
            op: UnaryOp::Previous,
            operand,
        } => match operand.as_ref() {
            Formula::Atom(id) => leaf(model, *id, true, quantity, diagnostics),
            _ => {
                diagnostics.report("previous applies only to an element reference");
                PLACEHOLDER.to_string()
            }
        },
        Formula::Unary {
            op: UnaryOp::Negate,
            operand,
        } => format!("-({})", expression(model, operand, quantity, diagnostics)),
        Formula::Unary {
            op: op @ UnaryOp::Not,
            ..
        } => {
            diagnostics.report(format!(
                "boolean operator '{}' in a quantity expression",
                op.as_str()
            ));
            PLACEHOLDER.to_string()
        }
        Formula::Binary { op, left, right } => match op.arithmetic_symbol() {
            Some(symbol) => {
                let left = expression(model, left, quantity, diagnostics);
                let right = expression(model, right, quantity, diagnostics);
                format!("({left}){symbol}({right})")
            }
            None => {
                diagnostics.report(format!(
                    "boolean operator '{}' in a quantity expression",
                    op.as_str()
                ));
                PLACEHOLDER.to_string()
            }
        },
    }
}

fn leaf(
    model: &Model,
    id: ElementId,
    initial: bool,
    quantity: &mut Quantity,
    diagnostics: &mut Diagnostics,
) -> String {
    let element = model.element(id);
    let situation = if initial { INITIAL } else { CURRENT };
    let variable = binding_variable(model, id, initial);
    let goal = match element.kind {
        ElementKind::Predicate
        | ElementKind::Goal(_)
        | ElementKind::Task(_)
        | ElementKind::Condition(_) => {
            format!("val({}({situation}), {variable})", term(model, id))
        }
        ElementKind::Quality(_) | ElementKind::Variable => {
            format!("{}({variable}, {situation})", element.name)
        }
        ElementKind::Effect(_) => {
            diagnostics.report(format!(
                "'{}' is an effect and has no value; using its name",
                element.name
            ));
            return element.name.clone();
        }
    };
    quantity.bind(goal);
    variable
}

/// Whether the clause of `quality` adds its own value at `s0` to the formula.
///
/// True for cross-run qualities that do not already refer to their previous
/// value.
pub fn accumulates(model: &Model, quality: ElementId) -> bool {
    model.is_cross_run(quality)
        && model
            .quality(quality)
            .is_some_and(|data| !data.formula.references_previous(quality))
}

/// Clauses defining `q(V, S)`.
///
/// A base case at `s0` comes first whenever evaluating the general clause
/// at `s0` would call `q` at `s0` again.
pub fn quality_clauses(
    model: &Model,
    quality: ElementId,
    diagnostics: &mut Diagnostics,
) -> Vec<String> {
    let Some(data) = model.quality(quality) else {
        return Vec::new();
    };
    let name = model.name_of(quality);
    let mut rendered = render_quantity(model, &data.formula, diagnostics);
    let accumulating = accumulates(model, quality);

    let mut clauses = Vec::new();
    if accumulating || data.formula.references_previous(quality) {
        clauses.push(format!(
            "{name}(V, {INITIAL}) :- !, initialValue({name}, V)."
        ));
    }

    let value = if accumulating {
        let init = binding_variable(model, quality, true);
        rendered.bind(format!("{name}({init}, {INITIAL})"));
        format!("{init} + {}", rendered.expression)
    } else {
        rendered.expression.clone()
    };

    let mut goals = rendered.bindings;
    goals.push(format!("V is {value}"));
    clauses.push(format!("{name}(V, {CURRENT}) :- {}.", goals.join(", ")));
    clauses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::link_json;
    use serde_json::json;

    fn model_with(formula: serde_json::Value, cross_run: &[&str]) -> Model {
        link_json(json!({
            "actors": [{
                "name": "agent",
                "predicates": ["pA"],
                "variables": ["budget"],
                "goals": [{ "name": "G", "or": ["A"] }],
                "tasks": [{ "name": "A", "effects": [
                    { "name": "eA", "probability": 1.0, "satisfying": true, "turnsTrue": ["pA"] }
                ]}],
                "qualities": [{ "name": "cost", "root": true, "formula": formula }]
            }],
            "crossRun": cross_run
        }))
    }

    fn clauses(model: &Model) -> (Vec<String>, Vec<String>) {
        let cost = model.find("cost").expect("cost");
        let mut diagnostics = Diagnostics::new();
        let clauses = quality_clauses(model, cost, &mut diagnostics);
        let messages = diagnostics
            .into_vec()
            .into_iter()
            .map(|d| d.message)
            .collect();
        (clauses, messages)
    }

    #[test]
    fn cross_run_quality_accumulates_initial_value() {
        let model = model_with(
            json!({ "multiply": [{ "number": 0.5 }, { "atom": "pA" }] }),
            &["cost"],
        );
        let (clauses, messages) = clauses(&model);
        assert!(messages.is_empty());
        assert_eq!(
            clauses,
            vec![
                "cost(V, s0) :- !, initialValue(cost, V).".to_string(),
                "cost(V, S) :- val(pA_fl(S), R_pA_fl), cost(R_cost_init, s0), V is R_cost_init + (0.5)*(R_pA_fl).".to_string(),
            ]
        );
    }

    #[test]
    fn non_cross_run_quality_is_plain_expression() {
        let model = model_with(
            json!({ "multiply": [{ "number": 0.5 }, { "atom": "pA" }] }),
            &[],
        );
        let (clauses, _) = clauses(&model);
        assert_eq!(
            clauses,
            vec!["cost(V, S) :- val(pA_fl(S), R_pA_fl), V is (0.5)*(R_pA_fl).".to_string()]
        );
    }

    #[test]
    fn self_referencing_cross_run_quality_does_not_accumulate_twice() {
        let model = model_with(
            json!({ "plus": [{ "previous": { "atom": "cost" } }, { "atom": "budget" }] }),
            &["cost"],
        );
        let (clauses, _) = clauses(&model);
        assert_eq!(
            clauses,
            vec![
                "cost(V, s0) :- !, initialValue(cost, V).".to_string(),
                "cost(V, S) :- cost(R_cost_init, s0), budget(R_budget, S), V is (R_cost_init)+(R_budget).".to_string(),
            ]
        );
    }

    #[test]
    fn repeated_leaves_bind_once() {
        let model = model_with(
            json!({ "plus": [{ "atom": "pA" }, { "negate": { "atom": "pA" } }] }),
            &[],
        );
        let (clauses, _) = clauses(&model);
        assert_eq!(
            clauses,
            vec!["cost(V, S) :- val(pA_fl(S), R_pA_fl), V is (R_pA_fl)+(-(R_pA_fl)).".to_string()]
        );
    }

    #[test]
    fn goal_and_task_leaves_bind_through_val() {
        let model = model_with(json!({ "minus": [{ "atom": "G" }, { "atom": "A" }] }), &[]);
        let (clauses, _) = clauses(&model);
        assert_eq!(
            clauses,
            vec!["cost(V, S) :- val(G_Sat(S), R_G_Sat), val(A_Sat(S), R_A_Sat), V is (R_G_Sat)-(R_A_Sat).".to_string()]
        );
    }

    #[test]
    fn constant_quality_has_no_bindings() {
        let model = model_with(json!({ "number": 5 }), &[]);
        let (clauses, _) = clauses(&model);
        assert_eq!(clauses, vec!["cost(V, S) :- V is 5.0.".to_string()]);
    }

    #[test]
    fn boolean_operator_degrades_to_placeholder_and_reports() {
        let model = model_with(
            json!({ "plus": [{ "and": [{ "atom": "pA" }, { "bool": true }] }, { "number": 2 }] }),
            &[],
        );
        let (clauses, messages) = clauses(&model);
        assert_eq!(clauses, vec!["cost(V, S) :- V is (0)+(2.0).".to_string()]);
        assert_eq!(messages, vec!["boolean operator 'and' in a quantity expression".to_string()]);
    }

    #[test]
    fn effect_leaf_falls_back_to_literal_name() {
        let model = model_with(json!({ "atom": "eA" }), &[]);
        let (clauses, messages) = clauses(&model);
        assert_eq!(clauses, vec!["cost(V, S) :- V is eA.".to_string()]);
        assert_eq!(messages.len(), 1);
    }
}
