//! agent-shellgate: decides whether a shell command proposed by an autonomous
//! coding agent may run, before any process is spawned.
//!
//! A command string is scanned into segments (split on `&&`, `||`, `;` and
//! newlines, quote-aware), every word in command position is extracted, and
//! each one must be on the allowlist. A few dangerous-by-default commands
//! (`pkill`, `chmod`, the project's init script) are further checked against
//! their own arguments. Anything the scanner cannot make sense of is rejected.
//!
//! # Architecture
//!
//! - **[`parse`]**: Shell scanning: segments, pipeline stages, substitutions, shlex tokenizer.
//! - **[`eval`]**: Policy engine, verdicts and rejection reasons, per-command context.
//! - **[`commands`]**: Sub-validators for `pkill`, `chmod` and the local script.
//! - **[`config`]**: Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]**: Stderr logger setup and the decision log.

/// Sub-validator trait and per-command implementations.
pub mod commands;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Policy engine: allowlist checks, sub-validation dispatch, verdicts.
pub mod eval;
/// Logger initialisation and file-based decision logging.
pub mod logging;
/// Shell command scanning and command-word extraction.
pub mod parse;

use std::sync::LazyLock;

pub use eval::{PolicyEngine, Rejection, Verdict};
pub use parse::{extract_commands, segment};

static DEFAULT_ENGINE: LazyLock<PolicyEngine> = LazyLock::new(|| {
    PolicyEngine::from_config(&config::Config::default_config())
        .expect("embedded default config must build an engine")
});

/// The engine built from the embedded default configuration.
pub fn default_engine() -> &'static PolicyEngine {
    &DEFAULT_ENGINE
}

/// Validate a command against the default policy.
///
/// This is the main entry point for tests and simple usage. To honor a user
/// overlay, build a [`PolicyEngine`] from [`config::Config::load`].
pub fn validate(command: &str) -> Verdict {
    default_engine().validate(command)
}
