use anyhow::Result;
use clap::ArgMatches;
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "./rexbook.toml";

/// Complete configuration that merges CLI args, env vars, config files, and defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RexbookConfig {
    pub build: BuildConfig,
    /// Values handed to the templates (from rexbook-core)
    pub site: rexbook_core::config::SiteConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuildConfig {
    /// Directory holding one subdirectory per topic
    pub source: String,
    /// Directory the generated site is written to; replaced on every build
    pub output: String,
    /// Optional directory with `templates/` and `assets/` overrides
    pub theme: String,
    /// Configuration file path
    pub config: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source: "./topics".to_string(),
            output: "./html_output".to_string(),
            theme: "./theme".to_string(),
            config: DEFAULT_CONFIG_FILE.to_string(),
        }
    }
}

impl RexbookConfig {
    /// Load configuration with cascading precedence:
    /// 1. CLI arguments (highest priority)
    /// 2. Environment variables (REXBOOK_*)
    /// 3. Configuration file
    /// 4. Defaults (lowest priority)
    pub fn load(args: &ArgMatches) -> Result<Self> {
        let config_file = arg(args, "config").unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        let mut builder = ConfigBuilder::builder().add_source(ConfigBuilder::try_from(&Self::default())?);

        if Path::new(&config_file).is_file() {
            builder = builder.add_source(File::new(&config_file, FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("REXBOOK")
                .prefix_separator("_")
                .separator("__"), // Use double underscore for nested keys
        );

        for key in ["source", "output", "theme", "config"] {
            if let Some(value) = arg(args, key) {
                builder = builder.set_override(format!("build.{key}"), value)?;
            }
        }

        Ok(builder.build()?.try_deserialize()?)
    }
}

// Only look at args that are actually defined for this command
fn arg(args: &ArgMatches, id: &str) -> Option<String> {
    args.try_get_one::<String>(id).ok().flatten().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::build::add_build_args;
    use clap::Command;
    use std::fs;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::TempDir;

    // Tests that read the REXBOOK_* environment must not overlap with the one that sets it
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn matches(argv: &[&str]) -> ArgMatches {
        add_build_args(Command::new("test"))
            .try_get_matches_from(argv)
            .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = RexbookConfig::default();
        assert_eq!(config.build.source, "./topics");
        assert_eq!(config.build.output, "./html_output");
        assert_eq!(config.build.theme, "./theme");
        assert_eq!(config.site.title, "Regular Expression Learning");
    }

    #[test]
    fn test_cli_args_override() {
        let _env = env_lock();
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        let config = RexbookConfig::load(&matches(&[
            "test",
            "--source",
            "/custom/source",
            "--output",
            "/custom/output",
            "--config",
            missing.to_str().unwrap(),
        ]))
        .unwrap();

        assert_eq!(config.build.source, "/custom/source");
        assert_eq!(config.build.output, "/custom/output");
        // Should still have defaults for non-overridden values
        assert_eq!(config.build.theme, "./theme");
    }

    #[test]
    fn config_file_sits_between_defaults_and_cli() {
        let _env = env_lock();
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("rexbook.toml");
        fs::write(
            &file,
            r#"
[build]
source = "from-file"
output = "file-out"

[site]
title = "Regex Drills"
tagline = "One pattern at a time"
"#,
        )
        .unwrap();

        let config = RexbookConfig::load(&matches(&[
            "test",
            "--config",
            file.to_str().unwrap(),
            "--output",
            "cli-out",
        ]))
        .unwrap();

        assert_eq!(config.build.source, "from-file");
        assert_eq!(config.build.output, "cli-out");
        assert_eq!(config.build.theme, "./theme");
        assert_eq!(config.site.title, "Regex Drills");
        assert_eq!(config.site.tagline.as_deref(), Some("One pattern at a time"));
    }

    #[test]
    fn env_overrides_file_but_not_cli() {
        let _env = env_lock();
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("rexbook.toml");
        fs::write(
            &file,
            r#"
[build]
theme = "file-theme"
source = "file-source"
"#,
        )
        .unwrap();

        // SAFETY: ENV_LOCK keeps every environment-reading test in this module serialized
        unsafe { std::env::set_var("REXBOOK_BUILD__THEME", "env-theme") };

        let from_env = RexbookConfig::load(&matches(&["test", "--config", file.to_str().unwrap()]));
        let from_cli = RexbookConfig::load(&matches(&[
            "test",
            "--config",
            file.to_str().unwrap(),
            "--theme",
            "cli-theme",
        ]));

        unsafe { std::env::remove_var("REXBOOK_BUILD__THEME") };

        let from_env = from_env.unwrap();
        assert_eq!(from_env.build.theme, "env-theme");
        assert_eq!(from_env.build.source, "file-source");
        assert_eq!(from_cli.unwrap().build.theme, "cli-theme");
    }
}
