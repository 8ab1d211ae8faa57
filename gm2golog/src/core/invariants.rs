//! Semantic invariants of a linked model that linking alone cannot rule out.

use crate::model::{DecompKind, ElementId, Model};

/// Check whole-graph invariants:
/// - exactly one root goal
/// - no decomposition cycles
/// - parent and child links agree in both directions
/// - decomposition kind matches the presence of children
pub fn validate_invariants(model: &Model) -> Vec<String> {
    let mut errors = Vec::new();

    match model.root_goals().as_slice() {
        [] => errors.push("model has no root goal".to_string()),
        [_] => {}
        roots => {
            let names = roots
                .iter()
                .map(|id| model.name_of(*id))
                .collect::<Vec<_>>()
                .join(", ");
            errors.push(format!("model has more than one root goal: {names}"));
        }
    }

    for id in model.goals().chain(model.tasks()) {
        validate_node(model, id, &mut errors);
    }

    errors
}

fn validate_node(model: &Model, id: ElementId, errors: &mut Vec<String>) {
    let name = model.name_of(id);
    let Some(node) = model.element(id).decomposition() else {
        return;
    };

    if let Some(parent) = node.parent {
        let listed = model
            .element(parent)
            .decomposition()
            .is_some_and(|up| up.children.contains(&id));
        if !listed {
            errors.push(format!(
                "{name}: parent '{}' does not list it as a child",
                model.name_of(parent)
            ));
        }
    }

    for child in &node.children {
        let back = model.element(*child).decomposition().and_then(|n| n.parent);
        if back != Some(id) {
            errors.push(format!(
                "{name}: child '{}' does not point back to it",
                model.name_of(*child)
            ));
        }
    }

    if (node.kind == DecompKind::Leaf) != node.children.is_empty() {
        errors.push(format!(
            "{name}: decomposition '{}' does not match {} children",
            node.kind.as_str(),
            node.children.len()
        ));
    }

    if has_cycle_above(model, id) {
        errors.push(format!("{name}: decomposition cycle"));
    }
}

/// True if walking parent links from `id` never reaches a root.
fn has_cycle_above(model: &Model, id: ElementId) -> bool {
    let mut current = id;
    for _ in 0..=model.elements.len() {
        match model.element(current).decomposition().and_then(|n| n.parent) {
            Some(parent) => current = parent,
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::link_json;
    use serde_json::json;

    #[test]
    fn valid_model_has_no_errors() {
        let model = link_json(json!({
            "actors": [{
                "name": "agent",
                "goals": [{ "name": "G", "or": ["A", "B"] }],
                "tasks": [{ "name": "A" }, { "name": "B" }]
            }]
        }));
        assert!(validate_invariants(&model).is_empty());
    }

    #[test]
    fn reports_missing_and_multiple_roots() {
        let empty = link_json(json!({ "actors": [{ "name": "agent" }] }));
        assert_eq!(validate_invariants(&empty), vec!["model has no root goal".to_string()]);

        let two = link_json(json!({
            "actors": [{ "name": "agent", "goals": [{ "name": "G" }, { "name": "H" }] }]
        }));
        assert_eq!(
            validate_invariants(&two),
            vec!["model has more than one root goal: G, H".to_string()]
        );
    }

    #[test]
    fn reports_cycles() {
        let model = link_json(json!({
            "actors": [{
                "name": "agent",
                "goals": [
                    { "name": "R" },
                    { "name": "G", "and": ["H"] },
                    { "name": "H", "and": ["G"] }
                ]
            }]
        }));
        let errors = validate_invariants(&model);
        assert!(errors.contains(&"G: decomposition cycle".to_string()));
        assert!(errors.contains(&"H: decomposition cycle".to_string()));
    }

    #[test]
    fn reports_mismatched_links() {
        let mut model = link_json(json!({
            "actors": [{
                "name": "agent",
                "goals": [{ "name": "G", "and": ["A"] }],
                "tasks": [{ "name": "A" }]
            }]
        }));
        let g = model.find("G").expect("G");
        if let Some(node) = model.elements[g.0].decomposition_mut() {
            node.children.clear();
        }
        let errors = validate_invariants(&model);
        assert!(errors.contains(&"A: parent 'G' does not list it as a child".to_string()));
        assert!(errors.contains(&"G: decomposition 'and' does not match 0 children".to_string()));
    }
}
