use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{GenerateError, Result};
use crate::loader::ExampleLoader;
use crate::site::{SkipReason, Skipped, Topic, display_name};

const TOPIC_METADATA: &str = "topic.json";

#[derive(Debug, Default, Deserialize)]
struct TopicMetadata {
    title: Option<String>,
    description: Option<String>,
}

/// Everything found under the source root.
#[derive(Debug, Default)]
pub struct Scan {
    pub topics: Vec<Topic>,
    pub skipped: Vec<Skipped>,
}

pub struct TopicScanner {
    source_dir: PathBuf,
}

impl TopicScanner {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            source_dir: path.as_ref().to_path_buf(),
        }
    }

    pub fn scan(&self) -> Result<Scan> {
        if !self.source_dir.is_dir() {
            return Err(GenerateError::MissingSourceDir(self.source_dir.clone()));
        }
        debug!(source = %self.source_dir.display(), "scanning topics");

        let mut scan = Scan::default();

        for topic_dir in subdirectories(&self.source_dir)? {
            let dir_name = dir_name(&topic_dir);
            let loaded = match ExampleLoader::new(&topic_dir).load() {
                Ok(loaded) => loaded,
                Err(e) => {
                    warn!(topic = %dir_name, error = %e, "cannot read topic, leaving it out");
                    scan.skipped.push(Skipped {
                        path: topic_dir,
                        reason: SkipReason::UnlistableTopic(e.to_string()),
                    });
                    continue;
                }
            };
            scan.skipped.extend(loaded.skipped);

            if loaded.examples.is_empty() {
                warn!(topic = %dir_name, "topic has no usable examples, leaving it out");
                continue;
            }

            let metadata = read_metadata(&topic_dir);
            let topic = Topic {
                title: metadata.title.unwrap_or_else(|| display_name(&dir_name)),
                description: metadata.description.unwrap_or_default(),
                dir_name,
                examples: loaded.examples,
            };

            if topic.shadows_index() {
                warn!(topic = %topic.dir_name, "topic page would replace the index, leaving it out");
                scan.skipped.push(Skipped {
                    path: topic_dir,
                    reason: SkipReason::ReservedTopicName,
                });
                continue;
            }

            scan.topics.push(topic);
        }

        Ok(scan)
    }
}

fn read_metadata(topic_dir: &Path) -> TopicMetadata {
    let path = topic_dir.join(TOPIC_METADATA);
    if !path.is_file() {
        return TopicMetadata::default();
    }

    let parsed: std::result::Result<TopicMetadata, String> = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|data| serde_json::from_str(&data).map_err(|e| e.to_string()));

    match parsed {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unusable topic metadata");
            TopicMetadata::default()
        }
    }
}

/// Immediate subdirectories of `path`, sorted by file name.
pub(crate) fn subdirectories(path: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();

    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| GenerateError::Walk {
            path: path.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }

    Ok(dirs)
}

pub(crate) fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}
