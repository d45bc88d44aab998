use crate::parse::{CommandToken, Extraction, Segment};

/// Context for sub-validating one command occurrence.
#[derive(Debug)]
pub struct CommandContext<'a> {
    /// The segment the command was found in.
    pub segment: &'a Segment,
    /// The pipeline stage holding the command (substitutions as placeholders).
    pub stage: &'a str,
    /// The command word itself.
    pub command: &'a CommandToken,
}

impl<'a> CommandContext<'a> {
    /// Build the context for a token produced by `extraction`.
    pub fn new(extraction: &'a Extraction, command: &'a CommandToken) -> Self {
        let segment = extraction.segment_of(command);
        let stage = segment
            .stages
            .get(command.stage)
            .map_or(segment.text.as_str(), String::as_str);
        Self {
            segment,
            stage,
            command,
        }
    }

    /// Words after the command word.
    pub fn args(&self) -> &[String] {
        &self.command.args
    }

    /// Arguments that are not flags, in order.
    pub fn operands(&self) -> impl Iterator<Item = &str> {
        self.args()
            .iter()
            .map(String::as_str)
            .filter(|a| !a.starts_with('-'))
    }

    /// Check if any argument is a flag.
    pub fn has_flags(&self) -> bool {
        self.args().iter().any(|a| a.starts_with('-'))
    }
}
