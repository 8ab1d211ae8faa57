//! Rendering vocabulary shared by every section: term names, suffixes,
//! number literals and list clauses.

use crate::model::{ElementId, ElementKind, InitValue, Model};

pub const SAT: &str = "_Sat";
pub const ATT: &str = "_Att";
pub const PRE: &str = "_Pre";
pub const FLUENT: &str = "_fl";
/// Suffix of binding variables evaluated at `s0`.
pub const INIT: &str = "_init";

/// Suffixes the translator appends to element names. A declared name ending
/// in one of them could collide with a generated term or variable.
pub const RESERVED_SUFFIXES: [&str; 5] = [FLUENT, SAT, ATT, PRE, INIT];

/// Current situation variable.
pub const CURRENT: &str = "S";
/// Initial situation constant.
pub const INITIAL: &str = "s0";

/// State term of an element: `p_fl` for predicates, `x_Sat` for goals and
/// tasks, the bare name otherwise.
pub fn term(model: &Model, id: ElementId) -> String {
    let element = model.element(id);
    match element.kind {
        ElementKind::Predicate => format!("{}{FLUENT}", element.name),
        ElementKind::Goal(_) | ElementKind::Task(_) => format!("{}{SAT}", element.name),
        ElementKind::Variable
        | ElementKind::Effect(_)
        | ElementKind::Quality(_)
        | ElementKind::Condition(_) => element.name.clone(),
    }
}

/// `name` + `suffix` applied to a situation argument, e.g. `A_Att(S)`.
pub fn suffixed(name: &str, suffix: &str, situation: &str) -> String {
    format!("{name}{suffix}({situation})")
}

/// Numeric literal as it appears in the program (`1.0`, `0.5`, `-3.0`).
///
/// Exponent forms always carry a fractional mantissa (`1.0e-5`, not `1e-5`).
pub fn number(value: f64) -> String {
    let text = format!("{value:?}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{mantissa}.0e{exponent}")
        }
        _ => text,
    }
}

pub fn init_value(value: &InitValue) -> String {
    match value {
        InitValue::Bool(flag) => flag.to_string(),
        InitValue::Number(n) => number(*n),
        InitValue::Text(text) => text.clone(),
    }
}

/// `[a,b,c]`, or `[]` for an empty input.
pub fn prolog_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = items
        .into_iter()
        .map(|item| item.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("[{joined}]")
}

/// A list-valued fact: `functor([a,b]).`
pub fn list_clause<I, S>(functor: &str, items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    format!("{functor}({}).", prolog_list(items))
}

/// Join goals with `sep`, or fall back to `empty` when there are none.
pub fn join_or(parts: &[String], sep: &str, empty: &str) -> String {
    if parts.is_empty() {
        return empty.to_string();
    }
    parts.join(sep)
}

/// Conjunction of goals, parenthesised when it has more than one member.
pub fn grouped_conjunction(parts: &[String]) -> String {
    match parts {
        [] => "true".to_string(),
        [single] => single.clone(),
        _ => format!("({})", parts.join(" , ")),
    }
}
