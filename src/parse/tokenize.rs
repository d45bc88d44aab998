/// Tokens that separate commands inside a stage's word stream.
pub const OPERATOR_TOKENS: &[&str] = &["|", "||", "&&", "&"];

/// Shell reserved words that may precede a command without being one.
pub const KEYWORDS: &[&str] = &[
    "if", "then", "else", "elif", "fi", "for", "while", "until", "do", "done", "case", "esac",
    "in", "!", "{", "}",
];

/// Tokenize a stage into words using shlex (POSIX word splitting).
///
/// Returns `None` on an unbalanced quote or a trailing escape. Callers must
/// treat that as unparsable rather than fall back to a looser split.
pub fn tokenize(command: &str) -> Option<Vec<String>> {
    shlex::split(command)
}

/// Final path component of a word: /usr/bin/ls → ls, ./init.sh → init.sh.
pub fn basename(word: &str) -> &str {
    match word.rsplit_once('/') {
        Some((_, name)) if !name.is_empty() => name,
        _ => word,
    }
}

/// Operator word left in a stage, e.g. a quoted `"|"`.
pub fn is_operator(word: &str) -> bool {
    OPERATOR_TOKENS.contains(&word)
}

/// Reserved word that leaves command position open.
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Option word: anything starting with `-`.
pub fn is_flag(word: &str) -> bool {
    word.starts_with('-')
}

/// `NAME=value` style words (an `=` anywhere but the first character).
pub fn is_assignment(word: &str) -> bool {
    word.find('=').is_some_and(|pos| pos > 0)
}
