//! Command-position extraction over the scanner's segments and stages.

use super::shell;
use super::tokenize::{basename, is_assignment, is_flag, is_keyword, is_operator, tokenize};
use super::types::{CommandToken, Extraction};

/// Find every word in command position, tracking the segment it came from.
///
/// Each stage starts out expecting a command. Operator tokens re-arm that
/// expectation; keywords, flags and `NAME=value` assignments are skipped
/// without consuming it. The first remaining word is the command.
///
/// Returns `None` if any stage fails word splitting or a substitution is
/// left open: a partially understood command must never yield a partial list
/// that could be approved.
pub fn extract(command: &str) -> Option<Extraction> {
    let parsed = shell::parse(command);
    if !parsed.complete {
        return None;
    }

    let mut commands = Vec::new();
    for (seg_idx, segment) in parsed.segments.iter().enumerate() {
        for (stage_idx, stage) in segment.stages.iter().enumerate() {
            let words = tokenize(stage)?;
            let mut expect_command = true;

            for (pos, word) in words.iter().enumerate() {
                if is_operator(word) {
                    expect_command = true;
                    continue;
                }
                if is_keyword(word) || is_flag(word) || is_assignment(word) {
                    continue;
                }
                if expect_command {
                    let args = words[pos + 1..]
                        .iter()
                        .take_while(|w| !is_operator(w))
                        .cloned()
                        .collect();
                    commands.push(CommandToken {
                        name: basename(word).to_string(),
                        word: word.clone(),
                        args,
                        segment: seg_idx,
                        stage: stage_idx,
                    });
                    expect_command = false;
                }
            }
        }
    }

    Some(Extraction {
        segments: parsed.segments,
        commands,
    })
}

/// Command basenames in order of first appearance; empty if unparsable.
pub fn extract_commands(command: &str) -> Vec<String> {
    extract(command)
        .map(|e| e.commands.into_iter().map(|c| c.name).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::segment;

    #[test]
    fn and_list() {
        assert_eq!(extract_commands("ls -la && git status"), vec!["ls", "git"]);
    }

    #[test]
    fn assignment_skipped() {
        assert_eq!(extract_commands("FOO=bar node script.js"), vec!["node"]);
        assert_eq!(
            extract_commands("NODE_ENV=test PORT=3000 npm start"),
            vec!["npm"]
        );
    }

    #[test]
    fn pipeline() {
        assert_eq!(
            extract_commands("cat package.json | grep name | wc -l"),
            vec!["cat", "grep", "wc"]
        );
    }

    #[test]
    fn semicolons_and_or() {
        assert_eq!(
            extract_commands("mkdir -p out; cp a out/ || rm -f out/a"),
            vec!["mkdir", "cp", "rm"]
        );
    }

    #[test]
    fn path_reduced_to_basename() {
        assert_eq!(
            extract_commands("/usr/bin/git log && ./init.sh"),
            vec!["git", "init.sh"]
        );
    }

    #[test]
    fn keywords_skipped() {
        assert_eq!(
            extract_commands("if ls; then pwd; else node x.js; fi"),
            vec!["ls", "pwd", "node"]
        );
        // The loop variable lands in command position; the allowlist rejects it.
        assert_eq!(
            extract_commands("for f in a b; do cat $f; done"),
            vec!["f", "cat"]
        );
    }

    #[test]
    fn negation_and_braces() {
        assert_eq!(extract_commands("! grep -q x f"), vec!["grep"]);
        assert_eq!(extract_commands("{ ls; pwd; }"), vec!["ls", "pwd"]);
    }

    #[test]
    fn leading_flags_skipped() {
        assert_eq!(extract_commands("-x ls"), vec!["ls"]);
    }

    #[test]
    fn spaced_operator_tokens_in_stage() {
        // A quoted operator is still treated as a separator: fail closed.
        assert_eq!(extract_commands("ls \"|\" rm"), vec!["ls", "rm"]);
    }

    #[test]
    fn duplicates_kept() {
        assert_eq!(extract_commands("ls a; ls b"), vec!["ls", "ls"]);
    }

    #[test]
    fn substitution_commands_extracted() {
        assert_eq!(
            extract_commands("ls $(rm -rf /) && pwd"),
            vec!["ls", "rm", "pwd"]
        );
    }

    #[test]
    fn substitution_in_command_position() {
        assert_eq!(
            extract_commands("$(which node) app.js"),
            vec!["$(...)", "which"]
        );
    }

    #[test]
    fn unbalanced_quote_yields_nothing() {
        assert!(extract_commands("ls; echo 'oops").is_empty());
        assert!(extract("ls \"x").is_none());
    }

    #[test]
    fn unterminated_substitution_yields_nothing() {
        assert!(extract_commands("ls $(pwd").is_empty());
    }

    #[test]
    fn empty_input() {
        assert!(extract_commands("").is_empty());
        assert_eq!(extract("   ").map(|e| e.commands.len()), Some(0));
    }

    #[test]
    fn tokens_carry_owning_segment() {
        let e = extract("ls && chmod +x a.sh; pkill -9 node").unwrap();
        let owners: Vec<&str> = e
            .commands
            .iter()
            .map(|c| e.segment_of(c).text.as_str())
            .collect();
        assert_eq!(owners, vec!["ls", "chmod +x a.sh", "pkill -9 node"]);
        assert_eq!(e.commands[1].args, vec!["+x", "a.sh"]);
        assert_eq!(e.commands[2].args, vec!["-9", "node"]);
    }

    #[test]
    fn tokens_carry_stage() {
        let e = extract("ps aux | grep node").unwrap();
        assert_eq!(e.commands[0].stage, 0);
        assert_eq!(e.commands[1].stage, 1);
        assert_eq!(e.commands[1].args, vec!["node"]);
    }

    #[test]
    fn args_stop_at_operator_token() {
        let e = extract("pkill node \"&&\" ls").unwrap();
        assert_eq!(e.commands[0].args, vec!["node"]);
        assert_eq!(e.commands[1].name, "ls");
    }

    #[test]
    fn segmenting_preserves_commands() {
        for input in [
            "ls -la && git status",
            "cat f | grep x; rm -f y || pwd",
            "FOO=1 node a.js && ./init.sh",
            "grep 'a;b' f ; ls",
        ] {
            let rejoined = segment(input).join(" ; ");
            assert_eq!(
                extract_commands(&rejoined),
                extract_commands(input),
                "input: {input}"
            );
        }
    }
}
