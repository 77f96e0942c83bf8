use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

pub const INDEX_PAGE: &str = "index.html";

#[derive(Debug, Clone, Serialize)]
pub struct Topic {
    pub dir_name: String,
    pub title: String,
    pub description: String,
    pub examples: Vec<Example>,
}

impl Topic {
    /// Output file name, relative to the output root.
    pub fn file_name(&self) -> String {
        format!("{}.html", self.dir_name)
    }

    /// True when the topic page would land on the index page. Compared
    /// case-insensitively so `Index/` clashes on case-folding filesystems too.
    pub fn shadows_index(&self) -> bool {
        self.file_name().eq_ignore_ascii_case(INDEX_PAGE)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Example {
    pub dir_name: String,
    pub name: String,
    pub pattern: String,
    pub test_input: String,
    /// Ready-to-embed HTML
    pub description: String,
}

/// An example directory that was left out of the build.
#[derive(Debug, Clone, Serialize)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Serialize)]
pub enum SkipReason {
    MissingArtifact(&'static str),
    EmptyPattern,
    MultiLinePattern,
    EmptyTestInput,
    Unreadable { file: &'static str, error: String },
    /// A topic whose page would overwrite `index.html`
    ReservedTopicName,
    /// A topic directory whose entries could not be listed
    UnlistableTopic(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingArtifact(file) => write!(f, "missing {}", file),
            SkipReason::EmptyPattern => write!(f, "pattern.txt is empty"),
            SkipReason::MultiLinePattern => write!(f, "pattern.txt holds more than one line"),
            SkipReason::EmptyTestInput => write!(f, "test_input.txt has no test cases"),
            SkipReason::Unreadable { file, error } => write!(f, "cannot read {}: {}", file, error),
            SkipReason::ReservedTopicName => write!(f, "topic name clashes with the index page"),
            SkipReason::UnlistableTopic(error) => write!(f, "cannot list topic directory: {}", error),
        }
    }
}

/// Turns a directory name like `02_character_classes` into `02 Character Classes`.
pub fn display_name(dir_name: &str) -> String {
    dir_name
        .split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
