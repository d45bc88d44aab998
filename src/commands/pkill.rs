use crate::commands::CommandSpec;
use crate::config::PkillConfig;
use crate::eval::{CommandContext, Rejection};

pub struct ProcessKillSpec {
    allowed_targets: Vec<String>,
}

impl ProcessKillSpec {
    pub const COMMAND: &'static str = "pkill";

    pub fn from_config(config: &PkillConfig) -> Self {
        Self {
            allowed_targets: config.allowed_targets.clone(),
        }
    }
}

impl CommandSpec for ProcessKillSpec {
    fn check(&self, ctx: &CommandContext) -> Result<(), Rejection> {
        let Some(last) = ctx.operands().last() else {
            return Err(Rejection::PkillMissingTarget);
        };
        // A quoted pattern like "node server.js" names its process first
        let target = last.split_whitespace().next().unwrap_or(last);

        if self.allowed_targets.iter().any(|t| t == target) {
            return Ok(());
        }
        Err(Rejection::PkillTargetDisallowed {
            target: target.to_string(),
            allowed: self.allowed_targets.join(", "),
        })
    }
}
