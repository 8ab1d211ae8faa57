//! Goal model to DT-Golog translator.
//!
//! This crate compiles a goal-oriented requirements model (actors, goals,
//! tasks, stochastic effects, qualities, conditions) into a situation-calculus
//! program for a decision-theoretic planner. The architecture enforces a
//! strict separation:
//!
//! - **[`core`]**: Pure, deterministic translation (decomposition tree,
//!   precondition engine, formula renderers, section assembly). No I/O.
//! - **[`io`]**: Side-effecting operations (configuration, model files,
//!   output files).
//!
//! [`translate`] coordinates core logic with I/O to implement CLI commands.

pub mod core;
pub mod document;
pub mod exit_codes;
pub mod formula;
pub mod io;
pub mod logging;
pub mod model;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod translate;
