//! Sub-validators for allowlisted commands that need more than a name check.
//!
//! Each validator inspects the arguments of one command occurrence and either
//! accepts it or returns the [`Rejection`] explaining why not.

/// `chmod` restricted to adding the execute bit.
pub mod chmod;
/// `pkill` restricted to development processes.
pub mod pkill;
/// The project's local script, runnable only by path.
pub mod script;

use crate::eval::{CommandContext, Rejection};

/// Trait for command sub-validators.
pub trait CommandSpec: Send + Sync {
    /// Accept the command occurrence in `ctx` or say why it is refused.
    fn check(&self, ctx: &CommandContext) -> Result<(), Rejection>;
}

/// The closed set of commands that get argument-level validation on top of
/// allowlist membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraValidation {
    /// `pkill`: target must be a known development process.
    ProcessKill,
    /// `chmod`: no flags, mode must match the configured pattern.
    PermissionChange,
    /// The local script: must be invoked by path, not bare name.
    LocalScript,
}

impl ExtraValidation {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtraValidation::ProcessKill => "process-kill",
            ExtraValidation::PermissionChange => "permission-change",
            ExtraValidation::LocalScript => "local-script",
        }
    }
}
