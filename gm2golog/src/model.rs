//! Linked goal model.
//!
//! The model is an arena of elements addressed by [`ElementId`]. Parent,
//! child, effect and formula links are handles into the arena, so upward
//! traversal is an index lookup and nothing in the graph owns anything else
//! twice. A `Model` is built once by the linker and read-only afterwards.

use crate::formula::Formula;

/// Stable handle of an element inside a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompKind {
    And,
    Or,
    Leaf,
}

impl DecompKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DecompKind::And => "and",
            DecompKind::Or => "or",
            DecompKind::Leaf => "leaf",
        }
    }
}

/// Position of a goal or task in the decomposition tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    pub kind: DecompKind,
    pub children: Vec<ElementId>,
    pub parent: Option<ElementId>,
}

impl Decomposition {
    pub fn leaf() -> Self {
        Self {
            kind: DecompKind::Leaf,
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskData {
    pub node: Decomposition,
    /// Effects owned by this task, in declaration order.
    pub effects: Vec<ElementId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectData {
    /// Owning task.
    pub task: ElementId,
    /// In `(0, 1]`.
    pub probability: f64,
    pub satisfying: bool,
    /// Predicates made true by the effect, ordered and duplicate-free.
    pub turns_true: Vec<ElementId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualityData {
    pub formula: Formula,
    /// The root quality is the total reward source.
    pub is_root: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionData {
    pub formula: Formula,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Predicate,
    Variable,
    Goal(Decomposition),
    Task(TaskData),
    Effect(EffectData),
    Quality(QualityData),
    Condition(ConditionData),
}

impl ElementKind {
    pub fn label(&self) -> &'static str {
        match self {
            ElementKind::Predicate => "predicate",
            ElementKind::Variable => "variable",
            ElementKind::Goal(_) => "goal",
            ElementKind::Task(_) => "task",
            ElementKind::Effect(_) => "effect",
            ElementKind::Quality(_) => "quality",
            ElementKind::Condition(_) => "condition",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub kind: ElementKind,
}

impl Element {
    /// Decomposition data for goals and tasks.
    pub fn decomposition(&self) -> Option<&Decomposition> {
        match &self.kind {
            ElementKind::Goal(node) => Some(node),
            ElementKind::Task(task) => Some(&task.node),
            _ => None,
        }
    }

    pub fn decomposition_mut(&mut self) -> Option<&mut Decomposition> {
        match &mut self.kind {
            ElementKind::Goal(node) => Some(node),
            ElementKind::Task(task) => Some(&mut task.node),
            _ => None,
        }
    }
}

/// An actor and the elements it declares, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Actor {
    pub name: String,
    pub predicates: Vec<ElementId>,
    pub variables: Vec<ElementId>,
    pub goals: Vec<ElementId>,
    pub tasks: Vec<ElementId>,
    pub qualities: Vec<ElementId>,
    pub conditions: Vec<ElementId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportDomain {
    Discrete,
    Continuous,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportedEntry {
    pub element: ElementId,
    pub domain: ExportDomain,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InitValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Initialization {
    pub element: ElementId,
    pub value: InitValue,
}

/// A fully linked model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub name: String,
    pub elements: Vec<Element>,
    pub actors: Vec<Actor>,
    /// Elements whose values persist across planning runs.
    pub cross_run: Vec<ElementId>,
    pub exported: Vec<ExportedEntry>,
    pub initializations: Vec<Initialization>,
}

impl Model {
    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }

    pub fn name_of(&self, id: ElementId) -> &str {
        &self.element(id).name
    }

    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|element| element.name == name)
            .map(ElementId)
    }

    pub fn task(&self, id: ElementId) -> Option<&TaskData> {
        match &self.element(id).kind {
            ElementKind::Task(task) => Some(task),
            _ => None,
        }
    }

    pub fn effect(&self, id: ElementId) -> Option<&EffectData> {
        match &self.element(id).kind {
            ElementKind::Effect(effect) => Some(effect),
            _ => None,
        }
    }

    pub fn quality(&self, id: ElementId) -> Option<&QualityData> {
        match &self.element(id).kind {
            ElementKind::Quality(quality) => Some(quality),
            _ => None,
        }
    }

    pub fn condition(&self, id: ElementId) -> Option<&ConditionData> {
        match &self.element(id).kind {
            ElementKind::Condition(condition) => Some(condition),
            _ => None,
        }
    }

    pub fn predicates(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.actors.iter().flat_map(|actor| actor.predicates.iter().copied())
    }

    pub fn goals(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.actors.iter().flat_map(|actor| actor.goals.iter().copied())
    }

    pub fn tasks(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.actors.iter().flat_map(|actor| actor.tasks.iter().copied())
    }

    pub fn qualities(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.actors.iter().flat_map(|actor| actor.qualities.iter().copied())
    }

    pub fn conditions(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.actors.iter().flat_map(|actor| actor.conditions.iter().copied())
    }

    /// Effects of every task, in task then effect order.
    pub fn effects(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.tasks()
            .filter_map(|task| self.task(task))
            .flat_map(|task| task.effects.iter().copied())
    }

    /// Goals without a parent.
    pub fn root_goals(&self) -> Vec<ElementId> {
        self.goals()
            .filter(|id| {
                self.element(*id)
                    .decomposition()
                    .is_some_and(Decomposition::is_root)
            })
            .collect()
    }

    pub fn root_quality(&self) -> Option<ElementId> {
        self.qualities()
            .find(|id| self.quality(*id).is_some_and(|quality| quality.is_root))
    }

    pub fn is_cross_run(&self, id: ElementId) -> bool {
        self.cross_run.contains(&id)
    }
}
