use regex::Regex;

use crate::commands::CommandSpec;
use crate::config::{ChmodConfig, ConfigError};
use crate::eval::{CommandContext, Rejection};

pub struct PermissionChangeSpec {
    mode_pattern: Regex,
}

impl PermissionChangeSpec {
    pub const COMMAND: &'static str = "chmod";

    pub fn from_config(config: &ChmodConfig) -> Result<Self, ConfigError> {
        let mode_pattern =
            Regex::new(&config.mode_pattern).map_err(|source| ConfigError::ModePattern {
                pattern: config.mode_pattern.clone(),
                source,
            })?;
        Ok(Self { mode_pattern })
    }
}

impl CommandSpec for PermissionChangeSpec {
    /// `chmod [MODE] [FILE...]` with no flags at all; remaining operands are
    /// target paths and are not inspected here.
    fn check(&self, ctx: &CommandContext) -> Result<(), Rejection> {
        if ctx.has_flags() {
            return Err(Rejection::ChmodFlagsDisallowed);
        }
        let Some(mode) = ctx.operands().next() else {
            return Err(Rejection::ChmodMissingMode);
        };
        if !self.mode_pattern.is_match(mode) {
            return Err(Rejection::ChmodModeDisallowed(mode.to_string()));
        }
        Ok(())
    }
}
