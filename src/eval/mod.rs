pub mod context;
pub mod verdict;

pub use context::CommandContext;
pub use verdict::{Rejection, Verdict};

use std::collections::HashSet;

use crate::commands::chmod::PermissionChangeSpec;
use crate::commands::pkill::ProcessKillSpec;
use crate::commands::script::LocalScriptSpec;
use crate::commands::{CommandSpec, ExtraValidation};
use crate::config::{Config, ConfigError};
use crate::parse;

/// Decides whether a proposed command string may run.
///
/// Immutable after construction; share it by reference or `Arc` across
/// threads.
pub struct PolicyEngine {
    allowed: HashSet<String>,
    pkill: ProcessKillSpec,
    chmod: PermissionChangeSpec,
    script: LocalScriptSpec,
}

impl PolicyEngine {
    /// Build the engine from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            allowed: config.commands.allow.iter().cloned().collect(),
            pkill: ProcessKillSpec::from_config(&config.pkill),
            chmod: PermissionChangeSpec::from_config(&config.chmod)?,
            script: LocalScriptSpec::from_config(&config.script),
        })
    }

    /// Whether a command basename is on the allowlist.
    pub fn is_allowed(&self, name: &str) -> bool {
        self.allowed.contains(name)
    }

    /// The sub-validation a command basename requires, if any.
    pub fn extra_validation(&self, name: &str) -> Option<ExtraValidation> {
        match name {
            ProcessKillSpec::COMMAND => Some(ExtraValidation::ProcessKill),
            PermissionChangeSpec::COMMAND => Some(ExtraValidation::PermissionChange),
            n if !self.script.name().is_empty() && n == self.script.name() => {
                Some(ExtraValidation::LocalScript)
            }
            _ => None,
        }
    }

    fn spec(&self, kind: ExtraValidation) -> &dyn CommandSpec {
        match kind {
            ExtraValidation::ProcessKill => &self.pkill,
            ExtraValidation::PermissionChange => &self.chmod,
            ExtraValidation::LocalScript => &self.script,
        }
    }

    /// Validate a command string, stopping at the first problem.
    ///
    /// Every command word is checked in order of appearance: first against
    /// the allowlist, then (for the extra-validation set) against its own
    /// segment's arguments.
    pub fn check(&self, command: &str) -> Result<(), Rejection> {
        if command.trim().is_empty() {
            return Err(Rejection::EmptyInput);
        }

        let extraction = match parse::extract(command) {
            Some(e) if !e.commands.is_empty() => e,
            _ => return Err(Rejection::UnparsableCommand(command.to_string())),
        };

        for token in &extraction.commands {
            log::debug!(
                "command {:?} in segment {:?}",
                token.name,
                extraction.segment_of(token).text
            );

            if !self.is_allowed(&token.name) {
                return Err(Rejection::DisallowedCommand(token.name.clone()));
            }

            if let Some(kind) = self.extra_validation(&token.name) {
                let ctx = CommandContext::new(&extraction, token);
                self.spec(kind).check(&ctx)?;
                log::debug!("{} check passed: {:?}", kind.as_str(), ctx.stage);
            }
        }

        Ok(())
    }

    /// Validate a command string into a [`Verdict`].
    pub fn validate(&self, command: &str) -> Verdict {
        let result = self.check(command);
        if let Err(ref rejection) = result {
            log::info!("blocked {command:?}: {rejection}");
        }
        Verdict::from(result)
    }
}
