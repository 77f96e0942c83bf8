use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::Result;
use crate::markup::render_markdown;
use crate::matcher::{Mode, split_cases};
use crate::scanner::{dir_name, subdirectories};
use crate::site::{Example, SkipReason, Skipped, display_name};

const PATTERN_FILE: &str = "pattern.txt";
const TEST_INPUT_FILE: &str = "test_input.txt";
const DESCRIPTION_HTML: &str = "description.html";
const DESCRIPTION_MD: &str = "description.md";

#[derive(Debug, Default)]
pub struct Loaded {
    pub examples: Vec<Example>,
    pub skipped: Vec<Skipped>,
}

/// Loads the examples of a single topic directory.
pub struct ExampleLoader {
    topic_dir: PathBuf,
}

impl ExampleLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            topic_dir: path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Result<Loaded> {
        let mut loaded = Loaded::default();

        for example_dir in subdirectories(&self.topic_dir)? {
            match load_example(&example_dir) {
                Ok(example) => {
                    debug!(example = %example_dir.display(), "loaded example");
                    loaded.examples.push(example);
                }
                Err(reason) => {
                    warn!(example = %example_dir.display(), %reason, "skipping example");
                    loaded.skipped.push(Skipped {
                        path: example_dir,
                        reason,
                    });
                }
            }
        }

        Ok(loaded)
    }
}

fn load_example(dir: &Path) -> std::result::Result<Example, SkipReason> {
    let pattern = read_artifact(dir, PATTERN_FILE)?.ok_or(SkipReason::MissingArtifact(PATTERN_FILE))?;
    let test_input =
        read_artifact(dir, TEST_INPUT_FILE)?.ok_or(SkipReason::MissingArtifact(TEST_INPUT_FILE))?;
    let description = read_description(dir)?;

    let lines: Vec<&str> = pattern.lines().filter(|line| !line.is_empty()).collect();
    if lines.len() > 1 {
        return Err(SkipReason::MultiLinePattern);
    }
    let pattern = lines.first().copied().ok_or(SkipReason::EmptyPattern)?;

    if split_cases(&test_input, Mode::Line).is_empty() {
        return Err(SkipReason::EmptyTestInput);
    }

    let dir_name = dir_name(dir);
    Ok(Example {
        name: display_name(&dir_name),
        dir_name,
        pattern: pattern.to_string(),
        test_input,
        description,
    })
}

fn read_description(dir: &Path) -> std::result::Result<String, SkipReason> {
    if let Some(html) = read_artifact(dir, DESCRIPTION_HTML)? {
        return Ok(html);
    }
    match read_artifact(dir, DESCRIPTION_MD)? {
        Some(markdown) => Ok(render_markdown(&markdown)),
        None => Err(SkipReason::MissingArtifact(DESCRIPTION_HTML)),
    }
}

/// `Ok(None)` when the file does not exist.
fn read_artifact(dir: &Path, file: &'static str) -> std::result::Result<Option<String>, SkipReason> {
    match std::fs::read_to_string(dir.join(file)) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SkipReason::Unreadable {
            file,
            error: e.to_string(),
        }),
    }
}
