use std::ops::Range;

use super::types::{ANSI_C_PLACEHOLDER, Operator, ParsedCommand, SUBST_PLACEHOLDER, Segment};

/// Parse a full command string into segments and pipeline stages.
///
/// Splits at unquoted `&&`, `||`, `;` and newlines, and within each segment at
/// unquoted `|`, `|&` and background `&`. Single quotes, double quotes,
/// `$'...'` and backslash escapes are respected. `$(...)`, backtick and `<(...)`/`>(...)`
/// bodies are scanned recursively; their segments are emitted directly after
/// the segment containing them.
pub fn parse(command: &str) -> ParsedCommand {
    let mut segments = Vec::new();
    let mut complete = true;
    scan(command, 0, 0, &mut segments, &mut complete);
    ParsedCommand { segments, complete }
}

/// Split a compound command into its top-level segments, in order.
///
/// Empty pieces are dropped. An input with no list operators yields one
/// segment equal to the trimmed input.
pub fn segment(command: &str) -> Vec<String> {
    parse(command)
        .segments
        .into_iter()
        .filter(|s| s.depth == 0)
        .map(|s| s.text)
        .collect()
}

/// The segment currently being scanned.
struct SegmentBuilder<'a> {
    input: &'a str,
    base: usize,
    depth: usize,
    /// Byte offset in `input` where this segment starts.
    start: usize,
    stage: String,
    stages: Vec<String>,
    /// Byte ranges in `input` of substitution bodies seen in this segment.
    substitutions: Vec<Range<usize>>,
}

impl<'a> SegmentBuilder<'a> {
    fn new(input: &'a str, base: usize, depth: usize) -> Self {
        Self {
            input,
            base,
            depth,
            start: 0,
            stage: String::new(),
            stages: Vec::new(),
            substitutions: Vec::new(),
        }
    }

    fn end_stage(&mut self) {
        let trimmed = self.stage.trim();
        if !trimmed.is_empty() {
            self.stages.push(trimmed.to_string());
        }
        self.stage.clear();
    }

    /// Close the segment ending at byte `end`; the next one starts at `next`.
    fn end_segment(
        &mut self,
        end: usize,
        next: usize,
        out: &mut Vec<Segment>,
        complete: &mut bool,
    ) {
        self.end_stage();
        let stages = std::mem::take(&mut self.stages);

        let raw = &self.input[self.start..end];
        let text = raw.trim();
        if !text.is_empty() {
            let begin = self.base + self.start + (raw.len() - raw.trim_start().len());
            out.push(Segment {
                text: text.to_string(),
                span: begin..begin + text.len(),
                stages,
                depth: self.depth,
            });
        }

        for body in std::mem::take(&mut self.substitutions) {
            scan(
                &self.input[body.clone()],
                self.base + body.start,
                self.depth + 1,
                out,
                complete,
            );
        }
        self.start = next;
    }
}

fn scan(input: &str, base: usize, depth: usize, out: &mut Vec<Segment>, complete: &mut bool) {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let len = chars.len();
    let offset = |i: usize| chars.get(i).map_or(input.len(), |&(pos, _)| pos);

    let mut seg = SegmentBuilder::new(input, base, depth);
    let mut i = 0;
    let (mut sq, mut dq, mut esc) = (false, false, false);
    // Previous char was a bare `>` or `<`
    let mut redirect = false;

    while i < len {
        let c = chars[i].1;
        let next = chars.get(i + 1).map(|&(_, n)| n);
        let after_redirect = std::mem::take(&mut redirect);

        if esc {
            seg.stage.push(c);
            esc = false;
            i += 1;
            continue;
        }
        if c == '\\' && !sq {
            esc = true;
            seg.stage.push(c);
            i += 1;
            continue;
        }
        if c == '\'' && !dq {
            sq = !sq;
            seg.stage.push(c);
            i += 1;
            continue;
        }
        if c == '"' && !sq {
            dq = !dq;
            seg.stage.push(c);
            i += 1;
            continue;
        }
        // Single quotes block everything, substitutions included
        if sq {
            seg.stage.push(c);
            i += 1;
            continue;
        }

        // $( expands inside double quotes too; <( and >( only bare
        if next == Some('(') && (c == '$' || (!dq && (c == '<' || c == '>'))) {
            let open = i + 2;
            match closing_paren(&chars, open) {
                Some(close) => {
                    seg.substitutions.push(offset(open)..offset(close));
                    i = close + 1;
                }
                None => {
                    *complete = false;
                    seg.substitutions.push(offset(open)..input.len());
                    i = len;
                }
            }
            seg.stage.push_str(SUBST_PLACEHOLDER);
            continue;
        }

        if c == '`' {
            let open = i + 1;
            match closing_unescaped(&chars, open, '`') {
                Some(close) => {
                    seg.substitutions.push(offset(open)..offset(close));
                    i = close + 1;
                }
                None => {
                    *complete = false;
                    seg.substitutions.push(offset(open)..input.len());
                    i = len;
                }
            }
            seg.stage.push_str(SUBST_PLACEHOLDER);
            continue;
        }

        // ANSI-C quoting: a backslash escapes the next char, `\'` included
        if !dq && c == '$' && next == Some('\'') {
            match closing_unescaped(&chars, i + 2, '\'') {
                Some(close) => i = close + 1,
                None => {
                    *complete = false;
                    i = len;
                }
            }
            seg.stage.push_str(ANSI_C_PLACEHOLDER);
            continue;
        }

        if dq {
            seg.stage.push(c);
            i += 1;
            continue;
        }

        // `>|` is a clobbering redirect; `&` after `>`/`<` or before `>` is fd
        // duplication (2>&1, >&2, &>file), not a background operator.
        let op = match (c, next) {
            ('&', Some('&')) => Some((Operator::And, 2)),
            ('|', Some('|')) => Some((Operator::Or, 2)),
            ('|', Some('&')) => Some((Operator::PipeErr, 2)),
            ('|', _) if !after_redirect => Some((Operator::Pipe, 1)),
            (';', _) => Some((Operator::Semi, 1)),
            ('\n', _) => Some((Operator::Newline, 1)),
            ('&', _) if next != Some('>') && !after_redirect => {
                Some((Operator::Background, 1))
            }
            _ => None,
        };

        if let Some((op, width)) = op {
            if op.ends_segment() {
                seg.end_segment(offset(i), offset(i + width), out, complete);
            } else {
                seg.end_stage();
            }
            i += width;
            continue;
        }

        redirect = matches!(c, '>' | '<');
        seg.stage.push(c);
        i += 1;
    }

    seg.end_segment(input.len(), input.len(), out, complete);
}

/// Index of the `)` closing a paren opened just before `from`, honoring
/// nesting, quotes and escapes inside the body.
fn closing_paren(chars: &[(usize, char)], from: usize) -> Option<usize> {
    let mut depth: u32 = 1;
    let (mut sq, mut dq) = (false, false);
    let mut i = from;
    while i < chars.len() {
        let next = chars.get(i + 1).map(|&(_, n)| n);
        match chars[i].1 {
            '\\' if !sq => i += 1,
            '$' if !sq && !dq && next == Some('\'') => {
                i = closing_unescaped(chars, i + 2, '\'')?;
            }
            '\'' if !dq => sq = !sq,
            '"' if !sq => dq = !dq,
            '(' if !sq && !dq => depth += 1,
            ')' if !sq && !dq => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Index of the next `delim` at or after `from` not preceded by a backslash.
fn closing_unescaped(chars: &[(usize, char)], from: usize, delim: char) -> Option<usize> {
    let mut i = from;
    while i < chars.len() {
        match chars[i].1 {
            '\\' => i += 2,
            c if c == delim => return Some(i),
            _ => i += 1,
        }
    }
    None
}
