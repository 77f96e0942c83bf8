use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that abort a generation run.
///
/// Problems local to one example (missing files, bad patterns) never surface
/// here; they are reported through [`crate::Skipped`] and
/// [`crate::Evaluation::CompileError`] instead.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("source directory not specified")]
    SourceNotSpecified,

    #[error("source directory does not exist: {}", .0.display())]
    MissingSourceDir(PathBuf),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("output directory {} overlaps source directory {}", output.display(), source_dir.display())]
    OutputOverlapsSource { output: PathBuf, source_dir: PathBuf },

    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

impl GenerateError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerateError>;
