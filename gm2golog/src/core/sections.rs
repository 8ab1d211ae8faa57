//! Ordered, comment-delimited output sections.

use std::fmt::Write as _;

/// Output sections in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SectionKind {
    StateStructure,
    DiscreteExported,
    ContinuousExported,
    InitialValues,
    AgentActions,
    StochasticActions,
    NondetActions,
    Probabilities,
    Procedures,
    Fluents,
    SuccessorState,
    Preconditions,
    Satisfaction,
    Rewards,
    Conditions,
    Sensing,
    SituationArguments,
}

impl SectionKind {
    pub const ALL: [SectionKind; 17] = [
        SectionKind::StateStructure,
        SectionKind::DiscreteExported,
        SectionKind::ContinuousExported,
        SectionKind::InitialValues,
        SectionKind::AgentActions,
        SectionKind::StochasticActions,
        SectionKind::NondetActions,
        SectionKind::Probabilities,
        SectionKind::Procedures,
        SectionKind::Fluents,
        SectionKind::SuccessorState,
        SectionKind::Preconditions,
        SectionKind::Satisfaction,
        SectionKind::Rewards,
        SectionKind::Conditions,
        SectionKind::Sensing,
        SectionKind::SituationArguments,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::StateStructure => "Cross-run state structure",
            SectionKind::DiscreteExported => "Discrete exported set",
            SectionKind::ContinuousExported => "Continuous exported set",
            SectionKind::InitialValues => "Initial values",
            SectionKind::AgentActions => "Agent actions",
            SectionKind::StochasticActions => "Stochastic actions",
            SectionKind::NondetActions => "Nondeterministic actions",
            SectionKind::Probabilities => "Outcome probabilities",
            SectionKind::Procedures => "Procedures",
            SectionKind::Fluents => "Fluents",
            SectionKind::SuccessorState => "Successor state axioms",
            SectionKind::Preconditions => "Preconditions",
            SectionKind::Satisfaction => "Satisfaction and attempt",
            SectionKind::Rewards => "Rewards",
            SectionKind::Conditions => "Conditions",
            SectionKind::Sensing => "Sensing",
            SectionKind::SituationArguments => "Situation arguments",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    /// One clause per line, without trailing newlines.
    pub lines: Vec<String>,
}

impl Section {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, lines: I) {
        self.lines.extend(lines);
    }
}

/// A generated program: every section, in [`SectionKind::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Specification {
    pub sections: Vec<Section>,
}

impl Specification {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|section| section.kind == kind)
    }

    /// Full program text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            let _ = writeln!(out, "%");
            let _ = writeln!(out, "% {}", section.kind.title());
            let _ = writeln!(out, "%");
            for line in &section.lines {
                let _ = writeln!(out, "{line}");
            }
            out.push('\n');
        }
        out
    }
}
