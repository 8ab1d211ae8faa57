//! Unlinked model document as read from JSON.
//!
//! References between elements are plain names here. [`crate::core::linker`]
//! resolves them into a [`crate::model::Model`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDocument {
    #[serde(default)]
    pub name: String,
    pub actors: Vec<ActorDoc>,
    #[serde(default)]
    pub cross_run: Vec<String>,
    #[serde(default)]
    pub exported: Vec<ExportedDoc>,
    #[serde(default)]
    pub initializations: Vec<InitializationDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorDoc {
    pub name: String,
    pub predicates: Vec<String>,
    pub variables: Vec<String>,
    pub goals: Vec<GoalDoc>,
    pub tasks: Vec<TaskDoc>,
    pub qualities: Vec<QualityDoc>,
    pub conditions: Vec<ConditionDoc>,
}

/// A goal refined by AND children or OR children (never both).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalDoc {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub and: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub or: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDoc {
    pub name: String,
    #[serde(default)]
    pub effects: Vec<EffectDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectDoc {
    pub name: String,
    pub probability: f64,
    #[serde(default)]
    pub satisfying: bool,
    #[serde(default)]
    pub turns_true: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityDoc {
    pub name: String,
    #[serde(default)]
    pub root: bool,
    pub formula: FormulaDoc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDoc {
    pub name: String,
    pub formula: FormulaDoc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainDoc {
    Discrete,
    Continuous,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedDoc {
    pub name: String,
    pub domain: DomainDoc,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InitValueDoc {
    Bool(bool),
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializationDoc {
    pub name: String,
    pub value: InitValueDoc,
}

/// Formula with textual references, externally tagged: `{"atom": "p"}`,
/// `{"multiply": [l, r]}`, `{"not": x}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaDoc {
    Atom(String),
    Number(f64),
    Bool(bool),
    And(Box<FormulaDoc>, Box<FormulaDoc>),
    Or(Box<FormulaDoc>, Box<FormulaDoc>),
    Plus(Box<FormulaDoc>, Box<FormulaDoc>),
    Minus(Box<FormulaDoc>, Box<FormulaDoc>),
    Multiply(Box<FormulaDoc>, Box<FormulaDoc>),
    Divide(Box<FormulaDoc>, Box<FormulaDoc>),
    Gt(Box<FormulaDoc>, Box<FormulaDoc>),
    Gte(Box<FormulaDoc>, Box<FormulaDoc>),
    Lt(Box<FormulaDoc>, Box<FormulaDoc>),
    Lte(Box<FormulaDoc>, Box<FormulaDoc>),
    Eq(Box<FormulaDoc>, Box<FormulaDoc>),
    Neq(Box<FormulaDoc>, Box<FormulaDoc>),
    Not(Box<FormulaDoc>),
    Negate(Box<FormulaDoc>),
    Previous(Box<FormulaDoc>),
}
