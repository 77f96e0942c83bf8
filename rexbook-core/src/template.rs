use serde::Serialize;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{GenerateError, Result};

const BUILTIN_TEMPLATES: [(&str, &str); 3] = [
    ("base.html", include_str!("../theme/templates/base.html")),
    ("index.html", include_str!("../theme/templates/index.html")),
    ("topic.html", include_str!("../theme/templates/topic.html")),
];

/// Tera wrapper holding the context shared by every page.
///
/// Templates found in `<theme>/templates/` take precedence; anything the
/// theme does not provide comes from the built-in set.
pub struct Renderer {
    tera: Tera,
    global: Context,
}

impl Renderer {
    pub fn new<P: AsRef<Path>>(theme_dir: P) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(BUILTIN_TEMPLATES)?;

        let templates_dir = theme_dir.as_ref().join("templates");
        if templates_dir.is_dir() {
            let overrides = theme_templates(&templates_dir)?;
            debug!(templates = %templates_dir.display(), count = overrides.len(), "loading theme templates");
            tera.add_template_files(overrides)?;
        }

        Ok(Self {
            tera,
            global: Context::new(),
        })
    }

    /// Add a value available to every render call
    pub fn set_global_context<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        self.global.insert(key, value);
    }

    /// Render `template` with the global context overlaid by `context`
    pub fn render(&self, template: &str, context: &RenderContext) -> Result<String> {
        let mut full = self.global.clone();
        full.extend(context.inner.clone());
        Ok(self.tera.render(template, &full)?)
    }
}

/// Every `.html` file under `dir`, named by its `/`-separated relative path.
fn theme_templates(dir: &Path) -> Result<Vec<(PathBuf, Option<String>)>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|source| GenerateError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "html") {
            continue;
        }
        let Ok(relative) = path.strip_prefix(dir) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push((path.to_path_buf(), Some(name)));
    }

    Ok(files)
}

/// Per-page template values.
#[derive(Default)]
pub struct RenderContext {
    inner: Context,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_to_context<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        self.inner.insert(key, value);
    }
}
