use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};
use std::sync::LazyLock;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

// Initialize syntax highlighting resources once
static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "InspiredGitHub";

/// Renders a `description.md` body to HTML, highlighting fenced code blocks.
pub fn render_markdown(content: &str) -> String {
    let parser = Parser::new_ext(content, Options::all());

    let events: Vec<Event> = parser.collect();
    let mut processed_events = Vec::with_capacity(events.len());
    let mut i = 0;

    while i < events.len() {
        match &events[i] {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang))) => {
                let mut code = String::new();
                i += 1;

                while i < events.len() {
                    match &events[i] {
                        Event::End(TagEnd::CodeBlock) => break,
                        Event::Text(text) => code.push_str(text),
                        _ => {}
                    }
                    i += 1;
                }

                processed_events.push(Event::Html(highlight_code(lang, &code).into()));
            }
            event => processed_events.push(event.clone()),
        }
        i += 1;
    }

    let mut out = String::new();
    html::push_html(&mut out, processed_events.into_iter());
    out
}

fn highlight_code(lang: &str, code: &str) -> String {
    let plain = || format!("<pre><code>{}</code></pre>\n", html_escape::encode_text(code));

    let Some(syntax) = SYNTAX_SET.find_syntax_by_token(lang) else {
        return plain();
    };
    let Some(theme) = THEME_SET.themes.get(CODE_THEME) else {
        return plain();
    };

    highlighted_html_for_string(code, &SYNTAX_SET, syntax, theme).unwrap_or_else(|_| plain())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_inline_markdown() {
        let html = render_markdown("Matches **one** digit with `\\d`.");
        assert_eq!(html, "<p>Matches <strong>one</strong> digit with <code>\\d</code>.</p>\n");
    }

    #[test]
    fn unknown_fence_language_is_escaped_plain_code() {
        let html = render_markdown("```nosuchlang\n<a>\n```\n");
        assert!(html.contains("<pre><code>&lt;a&gt;\n</code></pre>"));
    }

    #[test]
    fn known_fence_language_is_highlighted() {
        let html = render_markdown("```rust\nlet re = 1;\n```\n");
        assert!(html.contains("<pre style="));
        assert!(!html.contains("```"));
    }
}
