//! Precondition axioms derived from the decomposition tree.
//!
//! An effect may fire only while neither its own task nor any OR-alternative
//! at any ancestor level has been attempted.

use crate::core::decomposition::{decomp_kind, parent, siblings};
use crate::core::naming::{ATT, CURRENT, suffixed};
use crate::model::{DecompKind, ElementId, Model};

/// OR-alternatives of `id` collected at every ancestor level, nearest first.
pub fn competing_alternatives(model: &Model, id: ElementId) -> Vec<ElementId> {
    let mut alternatives = Vec::new();
    let mut current = id;
    while let Some(up) = parent(model, current) {
        if decomp_kind(model, up) == DecompKind::Or {
            alternatives.extend(siblings(model, current));
        }
        current = up;
    }
    alternatives
}

/// `poss(e,S) :- \+ T_Att(S), \+ Alt_Att(S).`
pub fn effect_precondition(model: &Model, effect: ElementId) -> Option<String> {
    let task = model.effect(effect)?.task;
    let guards = std::iter::once(task)
        .chain(competing_alternatives(model, task))
        .map(|node| format!("\\+ {}", suffixed(model.name_of(node), ATT, CURRENT)))
        .collect::<Vec<_>>();
    Some(format!(
        "poss({},{CURRENT}) :- {}.",
        model.name_of(effect),
        guards.join(", ")
    ))
}

/// `poss(T,S) :- poss(e1,S) ; poss(e2,S).`, or the fact `poss(T,S).` for a
/// task without effects.
pub fn task_precondition(model: &Model, task: ElementId) -> String {
    let name = model.name_of(task);
    let effects = model
        .task(task)
        .map(|data| data.effects.as_slice())
        .unwrap_or_default();
    if effects.is_empty() {
        return format!("poss({name},{CURRENT}).");
    }
    let options = effects
        .iter()
        .map(|effect| format!("poss({},{CURRENT})", model.name_of(*effect)))
        .collect::<Vec<_>>();
    format!("poss({name},{CURRENT}) :- {}.", options.join(" ; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::link_json;
    use serde_json::json;

    /// ```text
    /// R (or)
    /// ├── M (and)
    /// │   ├── N (or)
    /// │   │   ├── A
    /// │   │   └── B
    /// │   └── C
    /// └── D
    /// ```
    fn deep_model() -> Model {
        link_json(json!({
            "actors": [{
                "name": "agent",
                "predicates": ["p"],
                "goals": [
                    { "name": "R", "or": ["M", "D"] },
                    { "name": "M", "and": ["N", "C"] },
                    { "name": "N", "or": ["A", "B"] }
                ],
                "tasks": [
                    { "name": "A", "effects": [{ "name": "eA", "probability": 1.0, "satisfying": true, "turnsTrue": ["p"] }] },
                    { "name": "B", "effects": [{ "name": "eB", "probability": 1.0, "satisfying": true, "turnsTrue": ["p"] }] },
                    { "name": "C", "effects": [
                        { "name": "eC1", "probability": 0.4, "satisfying": true, "turnsTrue": ["p"] },
                        { "name": "eC2", "probability": 0.6, "turnsTrue": [] }
                    ]},
                    { "name": "D", "effects": [] }
                ]
            }]
        }))
    }

    fn names(model: &Model, ids: &[ElementId]) -> Vec<String> {
        ids.iter().map(|id| model.name_of(*id).to_string()).collect()
    }

    #[test]
    fn alternatives_are_collected_transitively_through_or_ancestors() {
        let model = deep_model();
        let a = model.find("A").expect("A");
        assert_eq!(names(&model, &competing_alternatives(&model, a)), vec!["B", "D"]);
    }

    #[test]
    fn and_siblings_are_not_alternatives() {
        let model = deep_model();
        let c = model.find("C").expect("C");
        assert_eq!(names(&model, &competing_alternatives(&model, c)), vec!["D"]);
        let a = model.find("A").expect("A");
        assert!(!competing_alternatives(&model, a).contains(&c));
    }

    #[test]
    fn root_has_no_alternatives() {
        let model = deep_model();
        let r = model.find("R").expect("R");
        assert!(competing_alternatives(&model, r).is_empty());
    }

    #[test]
    fn effect_precondition_starts_with_own_task() {
        let model = deep_model();
        let e = model.find("eA").expect("eA");
        assert_eq!(
            effect_precondition(&model, e).as_deref(),
            Some("poss(eA,S) :- \\+ A_Att(S), \\+ B_Att(S), \\+ D_Att(S).")
        );
    }

    #[test]
    fn task_precondition_is_disjunction_of_effects() {
        let model = deep_model();
        let c = model.find("C").expect("C");
        assert_eq!(
            task_precondition(&model, c),
            "poss(C,S) :- poss(eC1,S) ; poss(eC2,S)."
        );
    }

    #[test]
    fn task_without_effects_is_always_possible() {
        let model = deep_model();
        let d = model.find("D").expect("D");
        assert_eq!(task_precondition(&model, d), "poss(D,S).");
    }

    #[test]
    fn non_effect_has_no_effect_precondition() {
        let model = deep_model();
        let a = model.find("A").expect("A");
        assert_eq!(effect_precondition(&model, a), None);
    }
}
