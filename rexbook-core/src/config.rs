use serde::{Deserialize, Serialize};

/// Site-wide settings exposed to every template as `site`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub tagline: Option<String>,
    /// Links listed under "Additional Resources" on the index page
    pub resources: Vec<Link>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Regular Expression Learning".into(),
            tagline: None,
            resources: vec![
                Link::new("Rust regex crate documentation", "https://docs.rs/regex/latest/regex/"),
                Link::new("Regex101 - Online Regex Tester", "https://regex101.com/"),
                Link::new(
                    "Regular-Expressions.info - Comprehensive Tutorial",
                    "https://www.regular-expressions.info/",
                ),
                Link::new("RegExr - Learn, Build, & Test RegEx", "https://regexr.com/"),
            ],
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Link {
    pub text: String,
    pub link: String,
}

impl Link {
    pub fn new(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: link.into(),
        }
    }
}
