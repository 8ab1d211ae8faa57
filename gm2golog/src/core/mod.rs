//! Deterministic, pure translation logic.
//!
//! Core modules must be free of I/O side effects. They operate on an
//! in-memory, already linked model and return fresh strings, so two runs over
//! the same model always produce byte-identical output.

pub mod assembler;
pub mod condition;
pub mod decomposition;
pub mod diagnostics;
pub mod invariants;
pub mod linker;
pub mod naming;
pub mod preconditions;
pub mod quantity;
pub mod sections;
