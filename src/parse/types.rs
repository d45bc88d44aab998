//! Types produced by the shell scanner and consumed by the extractor and eval layer.

use std::ops::Range;

/// Text substituted for `$(...)`, backtick and `<(...)` spans in stage text.
///
/// The body of each substitution is scanned as its own segment(s); the
/// placeholder keeps the outer word intact for tokenizing. A placeholder in
/// command position is never on the allowlist, so a computed command name is
/// always rejected.
pub const SUBST_PLACEHOLDER: &str = "$(...)";

/// Text substituted for `$'...'` spans in stage text.
///
/// The escapes are not decoded, so a command name, `chmod` mode or `pkill`
/// target spelled with ANSI-C quoting never matches a policy entry.
pub const ANSI_C_PLACEHOLDER: &str = "$'...'";

/// Shell operator that ends a segment or a pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `&&`: run next only if previous succeeded
    And,
    /// `||`: run next only if previous failed
    Or,
    /// `;`: run next unconditionally
    Semi,
    /// Unquoted newline, equivalent to `;`
    Newline,
    /// `|`: pipe stdout
    Pipe,
    /// `|&`: pipe stdout+stderr
    PipeErr,
    /// `&`: run previous in the background
    Background,
}

impl Operator {
    /// True for list operators, which end a [`Segment`]. Pipes and `&`
    /// only end a stage within the segment.
    pub fn ends_segment(self) -> bool {
        matches!(
            self,
            Operator::And | Operator::Or | Operator::Semi | Operator::Newline
        )
    }
}

/// One member of a command list, split on `&&`, `||`, `;` or newline.
///
/// `text` is the exact (trimmed) slice of the original input at `span`, so
/// segments can always be mapped back to what the caller submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Segment text as it appears in the input.
    pub text: String,
    /// Byte range of `text` within the original input.
    pub span: Range<usize>,
    /// Pipeline stages, with substitution spans replaced by [`SUBST_PLACEHOLDER`].
    pub stages: Vec<String>,
    /// 0 for top-level segments, N for segments found inside N levels of substitution.
    pub depth: usize,
}

/// Output of [`parse`](super::shell::parse): every segment, substitution
/// bodies included, in order of first appearance.
#[derive(Debug, Clone)]
pub struct ParsedCommand {
    pub segments: Vec<Segment>,
    /// False when a substitution was opened but never closed.
    pub complete: bool,
}

/// A word occupying a command position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandToken {
    /// Basename of the word, compared against the allowlist.
    pub name: String,
    /// The word as written (after shell unquoting), e.g. `./init.sh`.
    pub word: String,
    /// Words following the command word up to the next operator token.
    pub args: Vec<String>,
    /// Index into [`Extraction::segments`] of the owning segment.
    pub segment: usize,
    /// Index of the pipeline stage within that segment.
    pub stage: usize,
}

/// Result of a successful extraction pass.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub segments: Vec<Segment>,
    pub commands: Vec<CommandToken>,
}

impl Extraction {
    /// The segment a command token was found in.
    pub fn segment_of(&self, token: &CommandToken) -> &Segment {
        &self.segments[token.segment]
    }
}
