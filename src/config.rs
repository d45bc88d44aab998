use serde::{Deserialize, Serialize};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// Location of the optional user overlay.
const USER_CONFIG_PATH: &str = "~/.config/agent-shellgate/config.toml";

/// Invalid configuration: unparsable TOML or a bad rule value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid chmod mode_pattern {pattern:?}: {source}")]
    ModePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub commands: Commands,
    #[serde(default)]
    pub pkill: PkillConfig,
    #[serde(default)]
    pub chmod: ChmodConfig,
    #[serde(default)]
    pub script: ScriptConfig,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Settings {
    /// Append each decision to the decision log (see [`crate::logging`]).
    #[serde(default)]
    pub log_decisions: bool,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Commands {
    /// Command basenames permitted to run at all.
    #[serde(default)]
    pub allow: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct PkillConfig {
    /// Process names `pkill` may target.
    #[serde(default)]
    pub allowed_targets: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ChmodConfig {
    /// Regex the single `chmod` mode argument must match.
    #[serde(default)]
    pub mode_pattern: String,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ScriptConfig {
    /// Filename of the local script that may only be run directly (`./name`).
    #[serde(default)]
    pub name: String,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    commands: CommandsOverlay,
    #[serde(default)]
    pkill: PkillOverlay,
    #[serde(default)]
    chmod: ChmodOverlay,
    #[serde(default)]
    script: ScriptOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    log_decisions: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct CommandsOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    allow: Vec<String>,
    #[serde(default)]
    remove_allow: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct PkillOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    allowed_targets: Vec<String>,
    #[serde(default)]
    remove_allowed_targets: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ChmodOverlay {
    mode_pattern: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ScriptOverlay {
    name: Option<String>,
}

// ── Merge logic ──

/// Merge a user list into a default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove items first, then extend with additions (deduped).
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/agent-shellgate/config.toml (if exists)
    ///
    /// A broken overlay is reported and ignored; the defaults still apply.
    pub fn load() -> Self {
        let Some(content) = Self::read_user_overlay() else {
            return Self::default_config();
        };
        match Self::from_overlay_str(&content) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring {USER_CONFIG_PATH}: {e}");
                Self::default_config()
            }
        }
    }

    /// Defaults merged with an overlay given as TOML text.
    pub fn from_overlay_str(toml_str: &str) -> Result<Self, ConfigError> {
        let overlay: ConfigOverlay = toml::from_str(toml_str)?;
        let mut config = Self::default_config();
        config.apply_overlay(overlay);
        Ok(config)
    }

    fn read_user_overlay() -> Option<String> {
        let path = shellexpand::tilde(USER_CONFIG_PATH);
        if path.starts_with('~') {
            // No home directory to expand against
            return None;
        }
        std::fs::read_to_string(&*path).ok()
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        if let Some(v) = overlay.settings.log_decisions {
            self.settings.log_decisions = v;
        }

        let c = overlay.commands;
        merge_list(&mut self.commands.allow, c.allow, &c.remove_allow, c.replace);

        let p = overlay.pkill;
        merge_list(
            &mut self.pkill.allowed_targets,
            p.allowed_targets,
            &p.remove_allowed_targets,
            p.replace,
        );

        if let Some(v) = overlay.chmod.mode_pattern {
            self.chmod.mode_pattern = v;
        }
        if let Some(v) = overlay.script.name {
            self.script.name = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let config = Config::default_config();
        assert!(!config.commands.allow.is_empty());
        assert!(!config.pkill.allowed_targets.is_empty());
        assert!(!config.chmod.mode_pattern.is_empty());
        assert_eq!(config.script.name, "init.sh");
    }

    #[test]
    fn default_allowlist_matches_policy() {
        let config = Config::default_config();
        let expected = [
            "ls", "cat", "head", "tail", "wc", "grep", "cp", "mkdir", "chmod", "rm", "mv", "pwd",
            "npm", "node", "npx", "git", "ps", "lsof", "sleep", "pkill", "init.sh",
        ];
        assert_eq!(config.commands.allow, expected);
    }

    #[test]
    fn default_pkill_targets() {
        let config = Config::default_config();
        assert_eq!(
            config.pkill.allowed_targets,
            vec!["node", "npm", "npx", "vite", "next"]
        );
    }

    #[test]
    fn default_mode_pattern() {
        assert_eq!(Config::default_config().chmod.mode_pattern, r"^[ugoa]*\+x$");
    }

    #[test]
    fn default_logs_decisions() {
        assert!(Config::default_config().settings.log_decisions);
    }

    // ── Merge semantics ──

    #[test]
    fn overlay_extends_allow_list() {
        let config = Config::from_overlay_str(
            r#"
            [commands]
            allow = ["echo"]
        "#,
        )
        .unwrap();
        assert!(config.commands.allow.contains(&"ls".to_string()));
        assert!(config.commands.allow.contains(&"echo".to_string()));
    }

    #[test]
    fn overlay_removes_from_allow_list() {
        let config = Config::from_overlay_str(
            r#"
            [commands]
            remove_allow = ["rm", "mv"]
        "#,
        )
        .unwrap();
        assert!(!config.commands.allow.contains(&"rm".to_string()));
        assert!(!config.commands.allow.contains(&"mv".to_string()));
        assert!(config.commands.allow.contains(&"ls".to_string()));
    }

    #[test]
    fn overlay_replace_commands() {
        let config = Config::from_overlay_str(
            r#"
            [commands]
            replace = true
            allow = ["ls", "cat"]
        "#,
        )
        .unwrap();
        assert_eq!(config.commands.allow, vec!["ls", "cat"]);
    }

    #[test]
    fn overlay_no_duplicates() {
        let config = Config::from_overlay_str(
            r#"
            [commands]
            allow = ["ls"]
        "#,
        )
        .unwrap();
        let count = config.commands.allow.iter().filter(|s| *s == "ls").count();
        assert_eq!(count, 1);
    }

    #[test]
    fn overlay_pkill_targets() {
        let config = Config::from_overlay_str(
            r#"
            [pkill]
            allowed_targets = ["webpack"]
            remove_allowed_targets = ["next"]
        "#,
        )
        .unwrap();
        assert!(config.pkill.allowed_targets.contains(&"webpack".to_string()));
        assert!(!config.pkill.allowed_targets.contains(&"next".to_string()));
        assert!(config.pkill.allowed_targets.contains(&"node".to_string()));
    }

    #[test]
    fn overlay_scalars_override() {
        let config = Config::from_overlay_str(
            r#"
            [settings]
            log_decisions = false

            [chmod]
            mode_pattern = '^u\+x$'

            [script]
            name = "setup.sh"
        "#,
        )
        .unwrap();
        assert!(!config.settings.log_decisions);
        assert_eq!(config.chmod.mode_pattern, r"^u\+x$");
        assert_eq!(config.script.name, "setup.sh");
    }

    #[test]
    fn overlay_unrelated_sections_untouched() {
        let original = Config::default_config();
        let config = Config::from_overlay_str(
            r#"
            [script]
            name = "bootstrap.sh"
        "#,
        )
        .unwrap();
        assert_eq!(config.commands.allow, original.commands.allow);
        assert_eq!(config.pkill.allowed_targets, original.pkill.allowed_targets);
        assert_eq!(config.chmod.mode_pattern, original.chmod.mode_pattern);
    }

    #[test]
    fn empty_overlay_changes_nothing() {
        let original = Config::default_config();
        let config = Config::from_overlay_str("").unwrap();
        assert_eq!(config.commands.allow, original.commands.allow);
        assert_eq!(config.script.name, original.script.name);
    }

    #[test]
    fn overlay_parse_error() {
        let err = Config::from_overlay_str("[commands\nallow = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn overlay_wrong_type_is_error() {
        assert!(Config::from_overlay_str("[commands]\nallow = \"ls\"").is_err());
    }

    #[test]
    fn dump_roundtrips_through_toml() {
        let config = Config::default_config();
        let text = toml::to_string(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.commands.allow, config.commands.allow);
    }
}
