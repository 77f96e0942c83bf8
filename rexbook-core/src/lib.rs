pub mod assets;
pub mod builder;
pub mod config;
pub mod error;
pub mod loader;
pub mod markup;
pub mod matcher;
pub mod scanner;
pub mod site;
pub mod template;

// Re-export main types
pub use builder::{BuildReport, NavItem, PatternFailure, Site, SiteBuilder, build_site};
pub use error::GenerateError;
pub use matcher::{Evaluation, MatchDetail, MatchResult, Mode, evaluate};
pub use scanner::TopicScanner;
pub use site::{Example, SkipReason, Skipped, Topic};
