use crate::commands::CommandSpec;
use crate::config::ScriptConfig;
use crate::eval::{CommandContext, Rejection};
use crate::parse::tokenize;

pub struct LocalScriptSpec {
    name: String,
}

impl LocalScriptSpec {
    pub fn from_config(config: &ScriptConfig) -> Self {
        Self {
            name: config.name.clone(),
        }
    }

    /// Basename the script is allowlisted under.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn is_by_path(&self, word: &str) -> bool {
        word.strip_suffix(self.name.as_str())
            .is_some_and(|dir| dir.ends_with('/'))
    }
}

impl CommandSpec for LocalScriptSpec {
    /// The script must open its segment (no pipe or assignment in front of
    /// it) and be invoked by path.
    fn check(&self, ctx: &CommandContext) -> Result<(), Rejection> {
        let first = ctx
            .segment
            .stages
            .first()
            .and_then(|stage| tokenize(stage))
            .and_then(|words| words.into_iter().next())
            .unwrap_or_default();
        let word = ctx.command.word.as_str();

        for candidate in [first.as_str(), word] {
            if !self.is_by_path(candidate) {
                return Err(Rejection::ScriptPathDisallowed {
                    script: self.name.clone(),
                    word: candidate.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::parse::extract;

    fn check(cmd: &str) -> Result<(), Rejection> {
        let spec = LocalScriptSpec::from_config(&Config::default_config().script);
        let e = extract(cmd).unwrap();
        let token = e.commands.iter().rev().find(|c| c.name == "init.sh").unwrap();
        spec.check(&CommandContext::new(&e, token))
    }

    #[test]
    fn allow_relative() {
        assert_eq!(check("./init.sh"), Ok(()));
    }

    #[test]
    fn allow_with_args() {
        assert_eq!(check("./init.sh --install"), Ok(()));
    }

    #[test]
    fn allow_path_ending_in_name() {
        assert_eq!(check("scripts/init.sh"), Ok(()));
        assert_eq!(check("/work/project/init.sh"), Ok(()));
    }

    #[test]
    fn deny_bare_name() {
        assert_eq!(
            check("init.sh"),
            Err(Rejection::ScriptPathDisallowed {
                script: "init.sh".into(),
                word: "init.sh".into(),
            })
        );
    }

    #[test]
    fn deny_after_pipe() {
        assert_eq!(
            check("ls | ./init.sh"),
            Err(Rejection::ScriptPathDisallowed {
                script: "init.sh".into(),
                word: "ls".into(),
            })
        );
    }

    #[test]
    fn deny_assignment_prefix() {
        let err = check("FOO=1 ./init.sh").unwrap_err();
        assert_eq!(err.to_string(), "Only ./init.sh is allowed, got: FOO=1");
    }

    #[test]
    fn each_occurrence_by_path() {
        assert!(check("./init.sh | init.sh").is_err());
    }

    #[test]
    fn allow_in_later_segment() {
        assert_eq!(check("ls && ./init.sh"), Ok(()));
    }

    #[test]
    fn reason_text() {
        let err = check("init.sh").unwrap_err();
        assert_eq!(err.to_string(), "Only ./init.sh is allowed, got: init.sh");
    }
}
