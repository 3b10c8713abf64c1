use regex::Regex;
use std::sync::LazyLock;

/// Upper bound on tags attached to a note, `plan` included.
pub const MAX_TAGS: usize = 6;

const BASE_TAG: &str = "plan";
const TITLE_TAG_LIMIT: usize = 3;

const STOP_WORDS: &[&str] = &[
    "the",
    "and",
    "for",
    "with",
    "this",
    "that",
    "from",
    "into",
    "plan",
    "implementation",
    "overview",
    "phase",
    "step",
    "steps",
];

// Config and prose fences say nothing about the plan's subject.
const IGNORED_LANGUAGES: &[&str] = &["json", "yaml", "yml", "text", "txt", "markdown", "md"];

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^#\s+(?:Implementation\s+Plan:|Plan:)?\s*(.+)$").expect("regex compile")
});

static FENCE_LANGUAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(\w+)").expect("regex compile"));

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("regex compile"));

/// Text of the first top-level heading with any `Plan:` or
/// `Implementation Plan:` prefix removed.
pub fn plan_title(markdown: &str) -> Option<&str> {
    HEADING
        .captures(markdown)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|title| !title.is_empty())
}

/// Derive note tags from a plan: `plan`, up to three title words, then the
/// languages of fenced code blocks in first-seen order. Capped at [`MAX_TAGS`].
pub fn extract_tags(markdown: &str) -> Vec<String> {
    let mut tags = vec![BASE_TAG.to_string()];

    if let Some(title) = plan_title(markdown) {
        let lowered = title.to_lowercase();
        let cleaned = NON_WORD.replace_all(&lowered, " ");
        let words = cleaned
            .split_whitespace()
            .filter(|word| word.chars().count() > 2 && !STOP_WORDS.contains(word))
            .take(TITLE_TAG_LIMIT);
        for word in words {
            push_unique(&mut tags, word);
        }
    }

    for caps in FENCE_LANGUAGE.captures_iter(markdown) {
        let language = caps[1].to_lowercase();
        if !IGNORED_LANGUAGES.contains(&language.as_str()) {
            push_unique(&mut tags, &language);
        }
    }

    tags.truncate(MAX_TAGS);
    tags
}

fn push_unique(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|existing| existing == tag) {
        tags.push(tag.to_string());
    }
}
