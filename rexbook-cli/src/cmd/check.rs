use anyhow::{Result, bail};
use clap::{ArgMatches, Command};
use rexbook_core::SiteBuilder;
use crate::cmd::build::add_build_args;
use crate::config::RexbookConfig;

pub fn make_subcommand() -> Command {
    add_build_args(Command::new("check"))
        .about("Run every example without writing any output; fails on broken patterns")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let config = RexbookConfig::load(args)?;
    let build = &config.build;

    let site = SiteBuilder::new()
        .source_dir(&build.source)
        .theme_dir(&build.theme)
        .site_config(config.site.clone())
        .build()?;

    for skipped in site.skipped() {
        println!("skipped {}: {}", skipped.path.display(), skipped.reason);
    }

    let failures = site.failures();
    for failure in &failures {
        println!("{}/{}:\n{}\n", failure.topic, failure.example, failure.message);
    }

    let examples: usize = site.topics().iter().map(|t| t.topic.examples.len()).sum();
    println!("Checked {} examples in {} topics", examples, site.topics().len());

    if !failures.is_empty() {
        bail!("{} patterns failed to compile", failures.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn example(root: &Path, name: &str, pattern: &str) {
        let dir = root.join("01_basics").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("pattern.txt"), pattern).unwrap();
        fs::write(dir.join("test_input.txt"), "abc\n").unwrap();
        fs::write(dir.join("description.html"), "<p>desc</p>").unwrap();
    }

    fn check(src: &Path, out: &Path) -> Result<()> {
        let missing = src.join("missing.toml");
        let args = make_subcommand()
            .try_get_matches_from([
                "check",
                "--source",
                src.to_str().unwrap(),
                "--output",
                out.to_str().unwrap(),
                "--config",
                missing.to_str().unwrap(),
            ])
            .unwrap();
        execute(&args)
    }

    #[test]
    fn broken_pattern_fails_without_writing_output() {
        let src = TempDir::new().unwrap();
        example(src.path(), "good", "a+");
        example(src.path(), "broken", "(a+");
        let out = src.path().join("html_output");

        let err = check(src.path(), &out).unwrap_err();
        assert_eq!(err.to_string(), "1 patterns failed to compile");
        assert!(!out.exists());
    }

    #[test]
    fn valid_patterns_pass() {
        let src = TempDir::new().unwrap();
        example(src.path(), "good", "a+");
        let out = src.path().join("html_output");

        check(src.path(), &out).unwrap();
        assert!(!out.exists());
    }
}
