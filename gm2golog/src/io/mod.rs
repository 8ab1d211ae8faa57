//! I/O helpers for translator commands.

pub mod config;
pub mod model_store;
pub mod spec_writer;
