use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::assets::copy_assets;
use crate::config::SiteConfig;
use crate::error::{GenerateError, Result};
use crate::matcher::{Evaluation, evaluate};
use crate::scanner::TopicScanner;
use crate::site::{Example, INDEX_PAGE, Skipped, Topic};
use crate::template::{RenderContext, Renderer};

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub text: String,
    pub link: String,
}

/// A topic together with the outcome of every example, in example order.
#[derive(Debug)]
pub struct EvaluatedTopic {
    pub topic: Topic,
    pub evaluations: Vec<Evaluation>,
}

#[derive(Serialize)]
struct ExampleView<'a> {
    #[serde(flatten)]
    example: &'a Example,
    evaluation: &'a Evaluation,
}

/// An example whose pattern did not compile.
#[derive(Debug, Clone, Serialize)]
pub struct PatternFailure {
    pub topic: String,
    pub example: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct BuildReport {
    pub topics: usize,
    pub examples: usize,
    pub pages: usize,
    pub assets: usize,
    pub skipped: Vec<Skipped>,
    pub failures: Vec<PatternFailure>,
}

pub struct SiteBuilder {
    source_dir: Option<PathBuf>,
    output_dir: PathBuf,
    theme_dir: PathBuf,
    site: SiteConfig,
}

impl Default for SiteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteBuilder {
    pub fn new() -> Self {
        Self {
            source_dir: None,
            output_dir: PathBuf::from("./html_output"),
            theme_dir: PathBuf::from("./theme"),
            site: SiteConfig::default(),
        }
    }

    // Required configuration
    pub fn source_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_dir = Some(path.as_ref().to_path_buf());
        self
    }

    // Optional paths
    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn theme_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.theme_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn site_config(mut self, config: SiteConfig) -> Self {
        self.site = config;
        self
    }

    /// Scans the source tree, runs every pattern and prepares the renderer.
    /// Nothing is written until [`Site::render_all`].
    pub fn build(self) -> Result<Site> {
        let source_dir = self.source_dir.ok_or(GenerateError::SourceNotSpecified)?;

        let scan = TopicScanner::new(&source_dir).scan()?;
        let topics: Vec<EvaluatedTopic> = scan.topics.into_iter().map(evaluate_topic).collect();

        let mut navigation = vec![NavItem {
            text: "Home".into(),
            link: INDEX_PAGE.into(),
        }];
        navigation.extend(topics.iter().map(|t| NavItem {
            text: t.topic.title.clone(),
            link: t.topic.file_name(),
        }));

        let mut renderer = Renderer::new(&self.theme_dir)?;
        renderer.set_global_context("site", &self.site);
        renderer.set_global_context("navigation", &navigation);

        Ok(Site {
            topics,
            skipped: scan.skipped,
            renderer,
            source_dir,
            output_dir: self.output_dir,
            theme_dir: self.theme_dir,
        })
    }
}

fn evaluate_topic(topic: Topic) -> EvaluatedTopic {
    let evaluations = topic
        .examples
        .iter()
        .map(|example| {
            debug!(topic = %topic.dir_name, example = %example.dir_name, "testing pattern");
            let evaluation = evaluate(&example.pattern, &example.test_input);
            if let Evaluation::CompileError { message } = &evaluation {
                warn!(
                    topic = %topic.dir_name,
                    example = %example.dir_name,
                    error = %message,
                    "pattern does not compile"
                );
            }
            evaluation
        })
        .collect();

    EvaluatedTopic { topic, evaluations }
}

pub struct Site {
    topics: Vec<EvaluatedTopic>,
    skipped: Vec<Skipped>,
    renderer: Renderer,
    source_dir: PathBuf,
    output_dir: PathBuf,
    theme_dir: PathBuf,
}

impl Site {
    pub fn topics(&self) -> &[EvaluatedTopic] {
        &self.topics
    }

    pub fn skipped(&self) -> &[Skipped] {
        &self.skipped
    }

    pub fn failures(&self) -> Vec<PatternFailure> {
        self.topics
            .iter()
            .flat_map(|t| {
                t.topic.examples.iter().zip(&t.evaluations).filter_map(|(example, evaluation)| {
                    match evaluation {
                        Evaluation::CompileError { message } => Some(PatternFailure {
                            topic: t.topic.dir_name.clone(),
                            example: example.dir_name.clone(),
                            message: message.clone(),
                        }),
                        Evaluation::Matched { .. } => None,
                    }
                })
            })
            .collect()
    }

    /// Replaces the output directory with a fresh rendering of the site.
    pub fn render_all(&self) -> Result<BuildReport> {
        self.prepare_output()?;

        let assets = copy_assets(&self.theme_dir, &self.output_dir)?;
        self.render_index()?;
        for topic in &self.topics {
            self.render_topic(topic)?;
        }

        Ok(BuildReport {
            topics: self.topics.len(),
            examples: self.topics.iter().map(|t| t.topic.examples.len()).sum(),
            pages: self.topics.len() + 1,
            assets,
            skipped: self.skipped.clone(),
            failures: self.failures(),
        })
    }

    fn prepare_output(&self) -> Result<()> {
        if self.output_dir.exists() {
            let output = canonicalize(&self.output_dir)?;
            let source = canonicalize(&self.source_dir)?;
            if source.starts_with(&output) {
                return Err(GenerateError::OutputOverlapsSource {
                    output,
                    source_dir: source,
                });
            }
            std::fs::remove_dir_all(&self.output_dir).map_err(|e| GenerateError::io(&self.output_dir, e))?;
        }

        std::fs::create_dir_all(&self.output_dir).map_err(|e| GenerateError::io(&self.output_dir, e))
    }

    fn render_index(&self) -> Result<()> {
        let topics: Vec<&Topic> = self.topics.iter().map(|t| &t.topic).collect();

        let mut context = RenderContext::new();
        context.add_to_context("page_title", "Home");
        context.add_to_context("current", INDEX_PAGE);
        context.add_to_context("topics", &topics);

        let html = self.renderer.render("index.html", &context)?;
        self.write_page(INDEX_PAGE, &html)
    }

    fn render_topic(&self, evaluated: &EvaluatedTopic) -> Result<()> {
        let topic = &evaluated.topic;
        let examples: Vec<ExampleView> = topic
            .examples
            .iter()
            .zip(&evaluated.evaluations)
            .map(|(example, evaluation)| ExampleView { example, evaluation })
            .collect();

        let file_name = topic.file_name();
        let mut context = RenderContext::new();
        context.add_to_context("page_title", &topic.title);
        context.add_to_context("current", &file_name);
        context.add_to_context("topic", topic);
        context.add_to_context("examples", &examples);

        let html = self.renderer.render("topic.html", &context)?;
        self.write_page(&file_name, &html)
    }

    fn write_page(&self, file_name: &str, html: &str) -> Result<()> {
        let path = self.output_dir.join(file_name);
        std::fs::write(&path, html).map_err(|e| GenerateError::io(&path, e))?;
        info!(page = %file_name, "wrote page");
        Ok(())
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
    path.canonicalize().map_err(|e| GenerateError::io(path, e))
}

/// Scan, evaluate and render in one go.
pub fn build_site(site: &SiteConfig, source_dir: &Path, output_dir: &Path, theme_dir: &Path) -> Result<BuildReport> {
    SiteBuilder::new()
        .source_dir(source_dir)
        .output_dir(output_dir)
        .theme_dir(theme_dir)
        .site_config(site.clone())
        .build()?
        .render_all()
}
