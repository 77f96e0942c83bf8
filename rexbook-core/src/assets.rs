use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{GenerateError, Result};

const BUILTIN_STYLESHEET: &str = include_str!("../theme/assets/style.css");

/// Writes the built-in stylesheet, then copies `<theme>/assets/**` over it.
/// Returns the number of files written.
pub fn copy_assets(theme_dir: &Path, output_dir: &Path) -> Result<usize> {
    let stylesheet = output_dir.join("style.css");
    std::fs::write(&stylesheet, BUILTIN_STYLESHEET).map_err(|e| GenerateError::io(&stylesheet, e))?;
    let mut written = 1;

    let assets_dir = theme_dir.join("assets");
    if !assets_dir.is_dir() {
        return Ok(written);
    }

    for entry in WalkDir::new(&assets_dir).sort_by_file_name() {
        let entry = entry.map_err(|source| GenerateError::Walk {
            path: assets_dir.clone(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(&assets_dir) else {
            continue;
        };

        let target = output_dir.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| GenerateError::io(parent, e))?;
        }
        std::fs::copy(entry.path(), &target).map_err(|e| GenerateError::io(entry.path(), e))?;
        debug!(asset = %relative.display(), "copied asset");
        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn builtin_stylesheet_is_written_without_a_theme() {
        let out = TempDir::new().unwrap();
        let count = copy_assets(&out.path().join("no-theme"), out.path()).unwrap();

        assert_eq!(count, 1);
        let css = fs::read_to_string(out.path().join("style.css")).unwrap();
        assert!(css.contains(".match-result"));
    }

    #[test]
    fn theme_assets_are_copied_and_override_the_stylesheet() {
        let theme = TempDir::new().unwrap();
        let assets = theme.path().join("assets");
        fs::create_dir_all(assets.join("img")).unwrap();
        fs::write(assets.join("style.css"), "body {}").unwrap();
        fs::write(assets.join("img/logo.svg"), "<svg/>").unwrap();

        let out = TempDir::new().unwrap();
        let count = copy_assets(theme.path(), out.path()).unwrap();

        assert_eq!(count, 3);
        assert_eq!(fs::read_to_string(out.path().join("style.css")).unwrap(), "body {}");
        assert_eq!(fs::read_to_string(out.path().join("img/logo.svg")).unwrap(), "<svg/>");
    }
}
