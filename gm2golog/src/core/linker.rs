//! Resolution of a name-based [`ModelDocument`] into a linked [`Model`].
//!
//! A [`ResolutionContext`] lives for one linking pass and is dropped with it.
//! All problems are collected in document order rather than stopping at the
//! first one.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::document::{DomainDoc, FormulaDoc, InitValueDoc, ModelDocument};
use crate::core::naming::RESERVED_SUFFIXES;
use crate::formula::{BinaryOp, Formula, UnaryOp};
use crate::model::{
    Actor, ConditionData, DecompKind, Decomposition, EffectData, Element, ElementId, ElementKind,
    ExportDomain, ExportedEntry, InitValue, Initialization, Model, QualityData, TaskData,
};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("name pattern is valid"));

/// Name-to-handle index plus the errors found so far.
#[derive(Debug, Default)]
pub struct ResolutionContext {
    index: HashMap<String, ElementId>,
    errors: Vec<String>,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every element already present in `model`.
    pub fn for_model(model: &Model) -> Self {
        let mut ctx = Self::new();
        for (position, element) in model.elements.iter().enumerate() {
            ctx.index.insert(element.name.clone(), ElementId(position));
        }
        ctx
    }

    fn declare(&mut self, model: &mut Model, name: &str, kind: ElementKind) -> ElementId {
        if !NAME_RE.is_match(name) {
            self.errors.push(format!(
                "invalid name '{name}': expected [A-Za-z_][A-Za-z0-9_]*"
            ));
        }
        if let Some(suffix) = RESERVED_SUFFIXES.iter().find(|s| name.ends_with(**s)) {
            self.errors.push(format!(
                "invalid name '{name}': suffix '{suffix}' is reserved for generated terms"
            ));
        }
        let id = ElementId(model.elements.len());
        if self.index.insert(name.to_string(), id).is_some() {
            self.errors.push(format!("duplicate element name '{name}'"));
        }
        model.elements.push(Element {
            name: name.to_string(),
            kind,
        });
        id
    }

    fn resolve(&mut self, name: &str, referrer: &str) -> Option<ElementId> {
        let found = self.index.get(name).copied();
        if found.is_none() {
            self.errors
                .push(format!("{referrer}: unresolved reference '{name}'"));
        }
        found
    }

    /// Resolve `name` and require its kind to satisfy `accept`.
    fn resolve_kind(
        &mut self,
        model: &Model,
        name: &str,
        referrer: &str,
        expected: &str,
        accept: fn(&ElementKind) -> bool,
    ) -> Option<ElementId> {
        let id = self.resolve(name, referrer)?;
        let kind = &model.element(id).kind;
        if !accept(kind) {
            self.errors.push(format!(
                "{referrer}: '{name}' ({}) is not {expected}",
                kind.label()
            ));
            return None;
        }
        Some(id)
    }

    pub fn link_formula(&mut self, doc: &FormulaDoc, referrer: &str) -> Formula {
        match doc {
            FormulaDoc::Atom(name) => match self.resolve(name, referrer) {
                Some(id) => Formula::Atom(id),
                None => Formula::Bool(false),
            },
            FormulaDoc::Number(value) => Formula::Number(*value),
            FormulaDoc::Bool(flag) => Formula::Bool(*flag),
            FormulaDoc::And(l, r) => self.link_binary(BinaryOp::And, l, r, referrer),
            FormulaDoc::Or(l, r) => self.link_binary(BinaryOp::Or, l, r, referrer),
            FormulaDoc::Plus(l, r) => self.link_binary(BinaryOp::Plus, l, r, referrer),
            FormulaDoc::Minus(l, r) => self.link_binary(BinaryOp::Minus, l, r, referrer),
            FormulaDoc::Multiply(l, r) => self.link_binary(BinaryOp::Multiply, l, r, referrer),
            FormulaDoc::Divide(l, r) => self.link_binary(BinaryOp::Divide, l, r, referrer),
            FormulaDoc::Gt(l, r) => self.link_binary(BinaryOp::Gt, l, r, referrer),
            FormulaDoc::Gte(l, r) => self.link_binary(BinaryOp::Gte, l, r, referrer),
            FormulaDoc::Lt(l, r) => self.link_binary(BinaryOp::Lt, l, r, referrer),
            FormulaDoc::Lte(l, r) => self.link_binary(BinaryOp::Lte, l, r, referrer),
            FormulaDoc::Eq(l, r) => self.link_binary(BinaryOp::Eq, l, r, referrer),
            FormulaDoc::Neq(l, r) => self.link_binary(BinaryOp::Neq, l, r, referrer),
            FormulaDoc::Not(x) => Formula::unary(UnaryOp::Not, self.link_formula(x, referrer)),
            FormulaDoc::Negate(x) => {
                Formula::unary(UnaryOp::Negate, self.link_formula(x, referrer))
            }
            FormulaDoc::Previous(x) => {
                Formula::unary(UnaryOp::Previous, self.link_formula(x, referrer))
            }
        }
    }

    fn link_binary(
        &mut self,
        op: BinaryOp,
        left: &FormulaDoc,
        right: &FormulaDoc,
        referrer: &str,
    ) -> Formula {
        let left = self.link_formula(left, referrer);
        let right = self.link_formula(right, referrer);
        Formula::binary(op, left, right)
    }

    pub fn into_result<T>(self, value: T) -> Result<T, Vec<String>> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }
}

fn is_node(kind: &ElementKind) -> bool {
    matches!(kind, ElementKind::Goal(_) | ElementKind::Task(_))
}

fn is_predicate(kind: &ElementKind) -> bool {
    matches!(kind, ElementKind::Predicate)
}

fn is_stateful(kind: &ElementKind) -> bool {
    !matches!(kind, ElementKind::Effect(_))
}

/// Link a single formula against an existing model.
pub fn link_formula(model: &Model, doc: &FormulaDoc) -> Result<Formula, Vec<String>> {
    let mut ctx = ResolutionContext::for_model(model);
    let formula = ctx.link_formula(doc, "formula");
    ctx.into_result(formula)
}

/// Build a linked model from `doc`, or every linking error found.
pub fn link(doc: &ModelDocument) -> Result<Model, Vec<String>> {
    let mut ctx = ResolutionContext::new();
    let mut model = Model {
        name: doc.name.clone(),
        ..Model::default()
    };

    // Declare every element before resolving any reference.
    for actor_doc in &doc.actors {
        let mut actor = Actor {
            name: actor_doc.name.clone(),
            ..Actor::default()
        };
        for name in &actor_doc.predicates {
            actor
                .predicates
                .push(ctx.declare(&mut model, name, ElementKind::Predicate));
        }
        for name in &actor_doc.variables {
            actor
                .variables
                .push(ctx.declare(&mut model, name, ElementKind::Variable));
        }
        for goal in &actor_doc.goals {
            let kind = ElementKind::Goal(Decomposition::leaf());
            actor.goals.push(ctx.declare(&mut model, &goal.name, kind));
        }
        for task in &actor_doc.tasks {
            let kind = ElementKind::Task(TaskData {
                node: Decomposition::leaf(),
                effects: Vec::new(),
            });
            let task_id = ctx.declare(&mut model, &task.name, kind);
            let mut effects = Vec::with_capacity(task.effects.len());
            for effect in &task.effects {
                if !(effect.probability > 0.0 && effect.probability <= 1.0) {
                    ctx.errors.push(format!(
                        "effect '{}': probability {} outside (0, 1]",
                        effect.name, effect.probability
                    ));
                }
                let kind = ElementKind::Effect(EffectData {
                    task: task_id,
                    probability: effect.probability,
                    satisfying: effect.satisfying,
                    turns_true: Vec::new(),
                });
                effects.push(ctx.declare(&mut model, &effect.name, kind));
            }
            if let ElementKind::Task(data) = &mut model.elements[task_id.0].kind {
                data.effects = effects;
            }
            actor.tasks.push(task_id);
        }
        for quality in &actor_doc.qualities {
            let kind = ElementKind::Quality(QualityData {
                formula: Formula::Bool(false),
                is_root: quality.root,
            });
            actor
                .qualities
                .push(ctx.declare(&mut model, &quality.name, kind));
        }
        for condition in &actor_doc.conditions {
            let kind = ElementKind::Condition(ConditionData {
                formula: Formula::Bool(false),
            });
            actor
                .conditions
                .push(ctx.declare(&mut model, &condition.name, kind));
        }
        model.actors.push(actor);
    }

    for (actor_doc, actor) in doc.actors.iter().zip(model.actors.clone()) {
        for (goal, goal_id) in actor_doc.goals.iter().zip(&actor.goals) {
            link_goal(&mut ctx, &mut model, *goal_id, &goal.and, &goal.or);
        }
        for (task, task_id) in actor_doc.tasks.iter().zip(&actor.tasks) {
            let effect_ids = model.task(*task_id).map(|t| t.effects.clone()).unwrap_or_default();
            for (effect, effect_id) in task.effects.iter().zip(effect_ids) {
                let referrer = format!("effect '{}'", effect.name);
                let mut turns_true = Vec::with_capacity(effect.turns_true.len());
                for name in &effect.turns_true {
                    let Some(id) =
                        ctx.resolve_kind(&model, name, &referrer, "a predicate", is_predicate)
                    else {
                        continue;
                    };
                    if turns_true.contains(&id) {
                        ctx.errors
                            .push(format!("{referrer}: predicate '{name}' listed twice"));
                        continue;
                    }
                    turns_true.push(id);
                }
                if let ElementKind::Effect(data) = &mut model.elements[effect_id.0].kind {
                    data.turns_true = turns_true;
                }
            }
        }
        for (quality, quality_id) in actor_doc.qualities.iter().zip(&actor.qualities) {
            let referrer = format!("quality '{}'", quality.name);
            let formula = ctx.link_formula(&quality.formula, &referrer);
            debug!(quality = %quality.name, depth = formula.depth(), "linked quality formula");
            if let ElementKind::Quality(data) = &mut model.elements[quality_id.0].kind {
                data.formula = formula;
            }
        }
        for (condition, condition_id) in actor_doc.conditions.iter().zip(&actor.conditions) {
            let referrer = format!("condition '{}'", condition.name);
            let formula = ctx.link_formula(&condition.formula, &referrer);
            if let ElementKind::Condition(data) = &mut model.elements[condition_id.0].kind {
                data.formula = formula;
            }
        }
    }

    let roots = model
        .qualities()
        .filter(|id| model.quality(*id).is_some_and(|q| q.is_root))
        .map(|id| model.name_of(id).to_string())
        .collect::<Vec<_>>();
    if roots.len() > 1 {
        ctx.errors.push(format!(
            "more than one root quality: {}",
            roots.join(", ")
        ));
    }

    for name in &doc.cross_run {
        let Some(id) = ctx.resolve_kind(&model, name, "crossRun", "a stateful element", is_stateful)
        else {
            continue;
        };
        if model.cross_run.contains(&id) {
            ctx.errors.push(format!("crossRun: '{name}' listed twice"));
            continue;
        }
        model.cross_run.push(id);
    }

    for entry in &doc.exported {
        let Some(element) =
            ctx.resolve_kind(&model, &entry.name, "exported", "a stateful element", is_stateful)
        else {
            continue;
        };
        if let (Some(min), Some(max)) = (entry.min, entry.max)
            && min > max
        {
            ctx.errors.push(format!(
                "exported: '{}' has min {min} above max {max}",
                entry.name
            ));
        }
        model.exported.push(ExportedEntry {
            element,
            domain: match entry.domain {
                DomainDoc::Discrete => ExportDomain::Discrete,
                DomainDoc::Continuous => ExportDomain::Continuous,
            },
            min: entry.min,
            max: entry.max,
        });
    }

    for init in &doc.initializations {
        let Some(element) = ctx.resolve_kind(
            &model,
            &init.name,
            "initializations",
            "a stateful element",
            is_stateful,
        ) else {
            continue;
        };
        let value = match &init.value {
            InitValueDoc::Bool(flag) => InitValue::Bool(*flag),
            InitValueDoc::Number(n) => InitValue::Number(*n),
            InitValueDoc::Text(text) => InitValue::Text(text.clone()),
        };
        model.initializations.push(Initialization { element, value });
    }

    debug!(
        model = %model.name,
        elements = model.elements.len(),
        actors = model.actors.len(),
        "model linked"
    );
    ctx.into_result(model)
}

fn link_goal(
    ctx: &mut ResolutionContext,
    model: &mut Model,
    goal: ElementId,
    and: &[String],
    or: &[String],
) {
    let goal_name = model.name_of(goal).to_string();
    let referrer = format!("goal '{goal_name}'");
    let (kind, names) = match (and.is_empty(), or.is_empty()) {
        (true, true) => (DecompKind::Leaf, and),
        (false, true) => (DecompKind::And, and),
        (true, false) => (DecompKind::Or, or),
        (false, false) => {
            ctx.errors
                .push(format!("{referrer}: mixes and-children with or-children"));
            return;
        }
    };

    let mut children = Vec::with_capacity(names.len());
    for name in names {
        let Some(child) = ctx.resolve_kind(model, name, &referrer, "a goal or task", is_node)
        else {
            continue;
        };
        if children.contains(&child) {
            ctx.errors
                .push(format!("{referrer}: child '{name}' listed twice"));
            continue;
        }
        let existing = model.element(child).decomposition().and_then(|node| node.parent);
        if let Some(existing) = existing
            && existing != goal
        {
            ctx.errors.push(format!(
                "'{name}' has more than one parent ('{}' and '{goal_name}')",
                model.name_of(existing)
            ));
            continue;
        }
        if let Some(node) = model.elements[child.0].decomposition_mut() {
            node.parent = Some(goal);
        }
        children.push(child);
    }

    if let Some(node) = model.elements[goal.0].decomposition_mut() {
        node.kind = if children.is_empty() { DecompKind::Leaf } else { kind };
        node.children = children;
    }
}
