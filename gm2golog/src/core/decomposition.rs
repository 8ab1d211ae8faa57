//! Decomposition tree navigation and derived satisfaction formulas.
//!
//! Goals combine their children's `_Sat` and `_Pre` with the decomposition
//! operator (`,` for AND, `;` for OR) but always combine `_Att` with `;`.
//! Tasks derive all three from their effects.

use crate::core::naming::{
    ATT, CURRENT, FLUENT, INITIAL, PRE, SAT, grouped_conjunction, join_or, suffixed,
};
use crate::model::{DecompKind, Decomposition, ElementId, ElementKind, Model};

const AND_SEP: &str = " , ";
const OR_SEP: &str = " ; ";
const EMPTY_BODY: &str = "fail";

fn node(model: &Model, id: ElementId) -> Option<&Decomposition> {
    model.element(id).decomposition()
}

pub fn children(model: &Model, id: ElementId) -> &[ElementId] {
    node(model, id).map_or(&[], |node| node.children.as_slice())
}

pub fn parent(model: &Model, id: ElementId) -> Option<ElementId> {
    node(model, id).and_then(|node| node.parent)
}

pub fn decomp_kind(model: &Model, id: ElementId) -> DecompKind {
    node(model, id).map_or(DecompKind::Leaf, |node| node.kind)
}

pub fn is_root(model: &Model, id: ElementId) -> bool {
    parent(model, id).is_none()
}

/// Children of the parent of `id`, excluding `id`, in declaration order.
pub fn siblings(model: &Model, id: ElementId) -> Vec<ElementId> {
    match parent(model, id) {
        Some(parent) => children(model, parent)
            .iter()
            .copied()
            .filter(|child| *child != id)
            .collect(),
        None => Vec::new(),
    }
}

/// Which derived formula to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derived {
    Satisfied,
    Attempted,
    /// Satisfaction evaluated at the initial situation.
    PreRun,
}

impl Derived {
    pub fn suffix(self) -> &'static str {
        match self {
            Derived::Satisfied => SAT,
            Derived::Attempted => ATT,
            Derived::PreRun => PRE,
        }
    }
}

/// Clause `X_Sat(S) :- ...` (or `_Att`, `_Pre`) for a goal or task.
pub fn derived_clause(model: &Model, id: ElementId, derived: Derived) -> String {
    let name = model.name_of(id);
    format!(
        "{} :- {}.",
        suffixed(name, derived.suffix(), CURRENT),
        derived_body(model, id, derived)
    )
}

pub fn derived_body(model: &Model, id: ElementId, derived: Derived) -> String {
    match &model.element(id).kind {
        ElementKind::Task(task) => {
            let parts = task
                .effects
                .iter()
                .filter_map(|effect| model.effect(*effect))
                .filter(|effect| derived == Derived::Attempted || effect.satisfying)
                // Effects that turn nothing true leave no trace in the situation.
                .filter(|effect| !effect.turns_true.is_empty())
                .map(|effect| {
                    let situation = if derived == Derived::PreRun {
                        INITIAL
                    } else {
                        CURRENT
                    };
                    let predicates = effect
                        .turns_true
                        .iter()
                        .map(|p| suffixed(model.name_of(*p), FLUENT, situation))
                        .collect::<Vec<_>>();
                    grouped_conjunction(&predicates)
                })
                .collect::<Vec<_>>();
            join_or(&parts, OR_SEP, EMPTY_BODY)
        }
        ElementKind::Goal(goal) => {
            let sep = match (derived, goal.kind) {
                (Derived::Attempted, _) => OR_SEP,
                (_, DecompKind::Or) => OR_SEP,
                (_, DecompKind::And | DecompKind::Leaf) => AND_SEP,
            };
            let parts = goal
                .children
                .iter()
                .map(|child| suffixed(model.name_of(*child), derived.suffix(), CURRENT))
                .collect::<Vec<_>>();
            join_or(&parts, sep, EMPTY_BODY)
        }
        _ => EMPTY_BODY.to_string(),
    }
}
