//! Stable exit codes for CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to an invalid model, config, or I/O error.
pub const INVALID: i32 = 1;
/// `translate` wrote output but recorded diagnostics while `deny_diagnostics` is set.
pub const DEGRADED: i32 = 2;
