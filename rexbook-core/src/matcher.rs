use regex::{Captures, Regex, RegexBuilder};
use serde::Serialize;

const PREVIEW_LIMIT: usize = 200;

/// How a test input is divided into test cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Every line is its own test case
    Line,
    /// The whole input is one test case
    Block,
}

/// The outcome of running one example's pattern over its test input.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Evaluation {
    Matched {
        mode: Mode,
        cases: Vec<MatchResult>,
        summary: Summary,
    },
    CompileError {
        message: String,
    },
}

impl Evaluation {
    pub fn is_error(&self) -> bool {
        matches!(self, Evaluation::CompileError { .. })
    }

    pub fn cases(&self) -> &[MatchResult] {
        match self {
            Evaluation::Matched { cases, .. } => cases,
            Evaluation::CompileError { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    /// One-based position of the test case in the input
    pub line: usize,
    pub text: String,
    pub matched: bool,
    /// Every non-overlapping match, leftmost first
    pub matches: Vec<MatchDetail>,
    pub segments: Vec<Segment>,
}

impl MatchResult {
    pub fn first(&self) -> Option<&MatchDetail> {
        self.matches.first()
    }

    pub fn matched_text(&self) -> Option<&str> {
        self.first().map(|m| m.text.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchDetail {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub groups: Vec<Group>,
    pub named: Vec<NamedGroup>,
}

impl MatchDetail {
    pub fn named(&self, name: &str) -> Option<&str> {
        self.named
            .iter()
            .find(|g| g.name == name)
            .and_then(|g| g.value.as_deref())
    }
}

/// A positional group. `value` is `None` when the group took no part in the match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub index: usize,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedGroup {
    pub name: String,
    pub value: Option<String>,
}

/// A run of test case text, flagged when it lies inside a match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub text: String,
    pub highlight: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub preview: String,
}

pub fn evaluate(pattern: &str, test_input: &str) -> Evaluation {
    let regex = match RegexBuilder::new(pattern).multi_line(true).build() {
        Ok(regex) => regex,
        Err(e) => {
            return Evaluation::CompileError {
                message: e.to_string(),
            };
        }
    };

    let mode = if requests_multiline(pattern) {
        Mode::Block
    } else {
        Mode::Line
    };

    let cases: Vec<MatchResult> = split_cases(test_input, mode)
        .into_iter()
        .enumerate()
        .map(|(i, text)| match_case(&regex, i + 1, text))
        .collect();

    let summary = summarize(&cases);

    Evaluation::Matched {
        mode,
        cases,
        summary,
    }
}

/// Splits raw test input into test cases. Surrounding blank lines are dropped,
/// interior blank lines are kept as cases of their own.
pub fn split_cases(test_input: &str, mode: Mode) -> Vec<&str> {
    let trimmed = test_input.trim_matches(['\n', '\r']);
    if trimmed.is_empty() {
        return Vec::new();
    }

    match mode {
        Mode::Block => vec![trimmed],
        Mode::Line => trimmed
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect(),
    }
}

/// True when the pattern asks to match across lines: an inline flag group that
/// turns on `m` or `s`, or a `\n` escape outside a character class.
///
/// A `\n` inside a class such as `[^\n]` only keeps a match on one line, so
/// it does not count.
pub fn requests_multiline(pattern: &str) -> bool {
    let chars: Vec<char> = pattern.chars().collect();
    // nesting depth of `[...]`; classes nest in this dialect
    let mut class_depth = 0usize;
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                if class_depth == 0 && chars.get(i + 1) == Some(&'n') {
                    return true;
                }
                i += 2;
                continue;
            }
            '[' => {
                class_depth += 1;
                i += 1;
                // a `]` straight after `[` or `[^` is a literal member
                if chars.get(i) == Some(&'^') {
                    i += 1;
                }
                if chars.get(i) == Some(&']') {
                    i += 1;
                }
                continue;
            }
            ']' if class_depth > 0 => class_depth -= 1,
            '(' if class_depth == 0 && chars.get(i + 1) == Some(&'?') => {
                let mut j = i + 2;
                let mut enabled = true;
                let mut multiline = false;
                while let Some(&c) = chars.get(j) {
                    match c {
                        '-' => enabled = false,
                        'm' | 's' if enabled => multiline = true,
                        'i' | 'm' | 's' | 'x' | 'u' | 'R' | 'U' => {}
                        ')' | ':' => {
                            if multiline && j > i + 2 {
                                return true;
                            }
                            break;
                        }
                        _ => break,
                    }
                    j += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }

    false
}

fn match_case(regex: &Regex, line: usize, text: &str) -> MatchResult {
    let matches: Vec<MatchDetail> = regex
        .captures_iter(text)
        .map(|caps| describe(regex, &caps))
        .collect();

    MatchResult {
        line,
        text: text.to_string(),
        matched: !matches.is_empty(),
        segments: segments(text, &matches),
        matches,
    }
}

fn describe(regex: &Regex, caps: &Captures<'_>) -> MatchDetail {
    let whole = caps.get_match();
    let mut groups = Vec::new();
    let mut named = Vec::new();

    for (index, name) in regex.capture_names().enumerate().skip(1) {
        let value = caps.get(index).map(|m| m.as_str().to_string());
        match name {
            Some(name) => named.push(NamedGroup {
                name: name.to_string(),
                value,
            }),
            None => groups.push(Group { index, value }),
        }
    }

    MatchDetail {
        text: whole.as_str().to_string(),
        start: whole.start(),
        end: whole.end(),
        groups,
        named,
    }
}

fn segments(text: &str, matches: &[MatchDetail]) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut last = 0;

    for m in matches.iter().filter(|m| m.start < m.end) {
        if m.start > last {
            out.push(Segment {
                text: text[last..m.start].to_string(),
                highlight: false,
            });
        }
        out.push(Segment {
            text: m.text.clone(),
            highlight: true,
        });
        last = m.end;
    }

    if last < text.len() {
        out.push(Segment {
            text: text[last..].to_string(),
            highlight: false,
        });
    }

    out
}

fn summarize(cases: &[MatchResult]) -> Summary {
    let texts: Vec<String> = cases
        .iter()
        .flat_map(|case| case.matches.iter())
        .map(|m| format!("{:?}", m.text))
        .collect();

    let full = format!("[{}]", texts.join(", "));
    let preview = if full.chars().count() > PREVIEW_LIMIT {
        let cut: String = full.chars().take(PREVIEW_LIMIT).collect();
        format!("{}...", cut)
    } else {
        full
    };

    Summary {
        total: texts.len(),
        preview,
    }
}
