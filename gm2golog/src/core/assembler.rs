//! Section assembler: one pass over the linked model per output section.

use std::fmt;

use tracing::debug;

use crate::core::condition::render_condition;
use crate::core::decomposition::{Derived, derived_clause};
use crate::core::diagnostics::{Diagnostic, Diagnostics};
use crate::core::naming::{
    ATT, CURRENT, FLUENT, INITIAL, PRE, SAT, grouped_conjunction, init_value, list_clause,
    number, prolog_list, suffixed, term,
};
use crate::core::preconditions::{effect_precondition, task_precondition};
use crate::core::quantity::quality_clauses;
use crate::core::sections::{Section, SectionKind, Specification};
use crate::model::{DecompKind, ElementId, ExportDomain, ExportedEntry, Model};

/// Hard preconditions checked before traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssembleError {
    NoRootGoal,
    MultipleRootGoals(Vec<String>),
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssembleError::NoRootGoal => write!(f, "model has no root goal"),
            AssembleError::MultipleRootGoals(names) => {
                write!(f, "model has more than one root goal: {}", names.join(", "))
            }
        }
    }
}

impl std::error::Error for AssembleError {}

/// Generated program plus the diagnostics recorded while rendering it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub specification: Specification,
    pub diagnostics: Vec<Diagnostic>,
}

impl Translation {
    pub fn render(&self) -> String {
        self.specification.render()
    }
}

/// Translate `model` into every output section.
pub fn assemble(model: &Model) -> Result<Translation, AssembleError> {
    let root = match model.root_goals().as_slice() {
        [] => return Err(AssembleError::NoRootGoal),
        [root] => *root,
        roots => {
            return Err(AssembleError::MultipleRootGoals(
                roots.iter().map(|id| model.name_of(*id).to_string()).collect(),
            ));
        }
    };

    let mut assembler = Assembler {
        model,
        root,
        diagnostics: Diagnostics::new(),
    };
    let sections = SectionKind::ALL
        .iter()
        .map(|kind| {
            let section = assembler.section(*kind);
            debug!(section = kind.title(), clauses = section.lines.len(), "assembled section");
            section
        })
        .collect();

    Ok(Translation {
        specification: Specification { sections },
        diagnostics: assembler.diagnostics.into_vec(),
    })
}

struct Assembler<'a> {
    model: &'a Model,
    root: ElementId,
    diagnostics: Diagnostics,
}

impl Assembler<'_> {
    fn name(&self, id: ElementId) -> &str {
        self.model.name_of(id)
    }

    fn names<I: IntoIterator<Item = ElementId>>(&self, ids: I) -> Vec<String> {
        ids.into_iter().map(|id| self.name(id).to_string()).collect()
    }

    fn section(&mut self, kind: SectionKind) -> Section {
        let mut section = Section::new(kind);
        match kind {
            SectionKind::StateStructure => {
                let terms = self.model.cross_run.iter().map(|id| term(self.model, *id));
                section.push(list_clause("transStateStructure", terms));
            }
            SectionKind::DiscreteExported => {
                section.push(list_clause(
                    "discreteExportedSet",
                    self.exported(ExportDomain::Discrete),
                ));
            }
            SectionKind::ContinuousExported => {
                section.push(list_clause(
                    "continuousExportedSet",
                    self.exported(ExportDomain::Continuous),
                ));
            }
            SectionKind::InitialValues => {
                let entries = self.model.initializations.iter().map(|init| {
                    format!("{}({})", term(self.model, init.element), init_value(&init.value))
                });
                section.push(list_clause("init", entries));
            }
            SectionKind::AgentActions => {
                let tasks = self.names(self.model.tasks());
                section.push(list_clause("agentActionList", &tasks));
                section.extend(tasks.iter().map(|task| format!("agentAction({task}).")));
            }
            SectionKind::StochasticActions => {
                let effects = self.names(self.model.effects());
                section.push(list_clause("stochasticActionList", &effects));
                section.extend(
                    effects
                        .iter()
                        .map(|effect| format!("stochasticAction({effect}).")),
                );
            }
            SectionKind::NondetActions => {
                for task in self.model.tasks() {
                    let effects = self
                        .model
                        .task(task)
                        .map(|data| self.names(data.effects.iter().copied()))
                        .unwrap_or_default();
                    section.push(format!(
                        "nondetActions({},_,{}).",
                        self.name(task),
                        prolog_list(&effects)
                    ));
                }
            }
            SectionKind::Probabilities => {
                for effect in self.model.effects() {
                    if let Some(data) = self.model.effect(effect) {
                        section.push(format!(
                            "prob({},{},_).",
                            self.name(effect),
                            number(data.probability)
                        ));
                    }
                }
            }
            SectionKind::Procedures => {
                for goal in self.model.goals() {
                    section.push(self.procedure(goal));
                }
            }
            SectionKind::Fluents => {
                let fluents = self.model.predicates().map(|id| term(self.model, id));
                section.push(list_clause("fluentList", fluents));
            }
            SectionKind::SuccessorState => {
                for predicate in self.model.predicates() {
                    section.extend(self.successor_state(predicate));
                }
            }
            SectionKind::Preconditions => {
                for effect in self.model.effects() {
                    if let Some(clause) = effect_precondition(self.model, effect) {
                        section.push(clause);
                    }
                }
                for task in self.model.tasks() {
                    section.push(task_precondition(self.model, task));
                }
            }
            SectionKind::Satisfaction => {
                for node in self.model.tasks().chain(self.model.goals()) {
                    for derived in [Derived::Satisfied, Derived::Attempted, Derived::PreRun] {
                        section.push(derived_clause(self.model, node, derived));
                    }
                }
                section.push(format!(
                    "goalAchieved({CURRENT}) :- {}.",
                    suffixed(self.name(self.root), SAT, CURRENT)
                ));
            }
            SectionKind::Rewards => {
                for quality in self.model.qualities() {
                    self.diagnostics.enter(self.model.name_of(quality));
                    section.extend(quality_clauses(self.model, quality, &mut self.diagnostics));
                }
                section.push(match self.model.root_quality() {
                    Some(root) => {
                        let name = self.name(root);
                        format!("reward(V, {CURRENT}) :- {name}(V, {CURRENT}).")
                    }
                    None => "reward(0, _).".to_string(),
                });
            }
            SectionKind::Conditions => {
                for condition in self.model.conditions() {
                    section.extend(self.condition(condition));
                }
            }
            SectionKind::Sensing => {
                for effect in self.model.effects() {
                    section.push(self.sense_condition(effect));
                }
            }
            SectionKind::SituationArguments => {
                section.extend(self.situation_arguments());
            }
        }
        section
    }

    fn exported(&self, domain: ExportDomain) -> Vec<String> {
        self.model
            .exported
            .iter()
            .filter(|entry| entry.domain == domain)
            .map(|entry| self.exported_entry(entry))
            .collect()
    }

    fn exported_entry(&self, entry: &ExportedEntry) -> String {
        let term = term(self.model, entry.element);
        if entry.min.is_none() && entry.max.is_none() {
            return term;
        }
        let min = entry.min.map_or_else(|| "-inf".to_string(), number);
        let max = entry.max.map_or_else(|| "inf".to_string(), number);
        format!("{term}({min},{max})")
    }

    fn procedure(&self, goal: ElementId) -> String {
        let name = self.name(goal);
        let Some(node) = self.model.element(goal).decomposition() else {
            return format!("proc({name}, nil).");
        };
        let children = self.names(node.children.iter().copied());
        let body = match (children.as_slice(), node.kind) {
            ([], _) => "nil".to_string(),
            ([single], _) => single.clone(),
            (_, DecompKind::Or) => format!("({})", children.join(" # ")),
            (_, DecompKind::And | DecompKind::Leaf) => format!("({})", children.join(" : ")),
        };
        format!("proc({name}, {body}).")
    }

    fn successor_state(&self, predicate: ElementId) -> [String; 2] {
        let fluent = term(self.model, predicate);
        let mut disjuncts = vec![format!("{fluent}({CURRENT})")];
        for effect in self.model.effects() {
            let makes_true = self
                .model
                .effect(effect)
                .is_some_and(|data| data.turns_true.contains(&predicate));
            if makes_true {
                disjuncts.push(format!("A={}", self.name(effect)));
            }
        }
        [
            format!("{fluent}({INITIAL}) :- initiallyTrue({fluent})."),
            format!(
                "{fluent}(do(A,{CURRENT})) :- {}.",
                disjuncts.join(" ; ")
            ),
        ]
    }

    fn condition(&mut self, condition: ElementId) -> [String; 2] {
        let name = self.model.name_of(condition);
        self.diagnostics.enter(name);
        let body = match self.model.condition(condition) {
            Some(data) => render_condition(self.model, &data.formula, &mut self.diagnostics),
            None => "fail".to_string(),
        };
        [
            format!("{name}({INITIAL}) :- !, initiallyTrue({name})."),
            format!("{name}({CURRENT}) :- {body}."),
        ]
    }

    fn sense_condition(&self, effect: ElementId) -> String {
        let terms = self
            .model
            .effect(effect)
            .map(|data| {
                data.turns_true
                    .iter()
                    .map(|p| term(self.model, *p))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        format!(
            "senseCondition({},{}).",
            self.name(effect),
            grouped_conjunction(&terms)
        )
    }

    fn situation_arguments(&self) -> Vec<String> {
        let model = self.model;
        let restore = |fluent: String| format!("restoreSitArg({fluent},S,{fluent}(S)).");
        let mut lines = Vec::new();
        for predicate in model.predicates() {
            lines.push(restore(format!("{}{FLUENT}", model.name_of(predicate))));
        }
        for node in model.tasks().chain(model.goals()) {
            let name = model.name_of(node);
            lines.push(restore(format!("{name}{SAT}")));
            lines.push(restore(format!("{name}{ATT}")));
            lines.push(restore(format!("{name}{PRE}")));
        }
        for condition in model.conditions() {
            lines.push(restore(model.name_of(condition).to_string()));
        }
        for quality in model.qualities() {
            let name = model.name_of(quality);
            lines.push(format!("restoreSitArg({name}(V),S,{name}(V,S))."));
        }
        lines
    }
}
