use rexbook_core::build_site;
use rexbook_core::config::SiteConfig;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

fn fixture(root: &Path) {
    let examples = [
        ("03_groups", "01_dates", r"(?<year>\d{4})-(?<month>\d{2})", "2024-05\nnot a date\n"),
        ("03_groups", "02_broken", r"(?<year>\d{4}", "2024\n"),
        ("01_basics", "01_literal", "cat", "cat\nconcatenate\ndog\n"),
        ("02_anchors", "01_whole_line", "^abc$", "abc\nxyz\n"),
        ("02_anchors", "02_block", r"(?m)^\w+$", "one\ntwo words\nthree\n"),
    ];
    for (topic, name, pattern, input) in examples {
        let dir = root.join(topic).join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("pattern.txt"), format!("{pattern}\n")).unwrap();
        fs::write(dir.join("test_input.txt"), input).unwrap();
        fs::write(dir.join("description.md"), format!("Example **{name}**.\n")).unwrap();
    }
    fs::write(
        root.join("01_basics/topic.json"),
        r#"{"title": "Basic Patterns", "description": "Literal matching"}"#,
    )
    .unwrap();
}

fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let name = e.path().strip_prefix(dir).unwrap().to_string_lossy().to_string();
            (name, fs::read(e.path()).unwrap())
        })
        .collect()
}

#[test]
fn regenerating_unchanged_input_is_byte_identical() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fixture(src.path());
    let theme = src.path().join("theme");

    build_site(&SiteConfig::default(), src.path(), out.path(), &theme).unwrap();
    let first = snapshot(out.path());
    build_site(&SiteConfig::default(), src.path(), out.path(), &theme).unwrap();
    let second = snapshot(out.path());

    assert_eq!(
        first.keys().collect::<Vec<_>>(),
        vec!["01_basics.html", "02_anchors.html", "03_groups.html", "index.html", "style.css"]
    );
    assert_eq!(first, second);
}

#[test]
fn index_lists_topics_in_directory_order() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fixture(src.path());

    let report = build_site(&SiteConfig::default(), src.path(), out.path(), &src.path().join("theme")).unwrap();
    assert_eq!(report.topics, 3);
    assert_eq!(report.examples, 5);
    assert_eq!(report.pages, 4);
    assert_eq!(report.failures.len(), 1);

    let index = fs::read_to_string(out.path().join("index.html")).unwrap();
    let cards: Vec<usize> = ["Basic Patterns", "02 Anchors", "03 Groups"]
        .iter()
        .map(|title| index.find(&format!(">{title}</a></h4>")).unwrap())
        .collect();
    assert!(cards.windows(2).all(|w| w[0] < w[1]));
    assert!(index.contains("<p>Literal matching</p>"));
}

#[test]
fn block_mode_and_markdown_descriptions_reach_the_page() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fixture(src.path());

    build_site(&SiteConfig::default(), src.path(), out.path(), &src.path().join("theme")).unwrap();
    let page = fs::read_to_string(out.path().join("02_anchors.html")).unwrap();

    let block = &page[page.find(r#"id="02_block""#).unwrap()..];
    assert!(block.contains("<strong>Line 1:</strong>"));
    assert!(!block.contains("<strong>Line 2:</strong>"));
    assert!(block.contains("<strong>All matches found:</strong> 2"));
    assert!(page.contains("<p>Example <strong>02_block</strong>.</p>"));

    let groups = fs::read_to_string(out.path().join("03_groups.html")).unwrap();
    assert_eq!(groups.matches("Regex Error:").count(), 1);
    assert!(groups.contains("year: \"2024\", month: \"05\""));
    assert!(groups.contains("<strong>Line 2:</strong> \"not a date\" - No match"));
}
