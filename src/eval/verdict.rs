use serde::Serialize;

/// Why a command was refused. `Display` is the user-facing reason.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("Empty command")]
    EmptyInput,
    #[error("Could not parse command: {0}")]
    UnparsableCommand(String),
    #[error("Command '{0}' is not in the allowed commands list")]
    DisallowedCommand(String),
    #[error("pkill requires a process name")]
    PkillMissingTarget,
    #[error("pkill only allowed for dev processes ({allowed}), got: {target}")]
    PkillTargetDisallowed { target: String, allowed: String },
    #[error("chmod flags are not allowed")]
    ChmodFlagsDisallowed,
    #[error("chmod requires a mode")]
    ChmodMissingMode,
    #[error("chmod only allowed with +x mode, got: {0}")]
    ChmodModeDisallowed(String),
    #[error("Only ./{script} is allowed, got: {word}")]
    ScriptPathDisallowed { script: String, word: String },
}

/// Outcome of validating one command string. `reason` is empty iff allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub allowed: bool,
    pub reason: String,
}

impl Verdict {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: String::new(),
        }
    }

    pub fn reject(rejection: &Rejection) -> Self {
        Self {
            allowed: false,
            reason: rejection.to_string(),
        }
    }

    /// Text handed back to the agent in place of command output.
    pub fn block_message(&self) -> Option<String> {
        (!self.allowed).then(|| format!("[SECURITY BLOCK] Command blocked: {}", self.reason))
    }
}

impl From<Result<(), Rejection>> for Verdict {
    fn from(result: Result<(), Rejection>) -> Self {
        match result {
            Ok(()) => Verdict::allow(),
            Err(r) => Verdict::reject(&r),
        }
    }
}
