use super::tags::{extract_tags, plan_title};
use chrono::{DateTime, Datelike, NaiveDateTime, SecondsFormat, Timelike, Utc};

/// Link that groups every saved plan under one Obsidian hub note.
pub const BACKLINK: &str = "[[Plannotator Plans]]";

const DEFAULT_TITLE: &str = "Plan";
const MAX_TITLE_CHARS: usize = 50;
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// YAML frontmatter block, including the opening and closing `---` lines.
pub fn frontmatter(tags: &[String], created: DateTime<Utc>) -> String {
    let tag_list = tags
        .iter()
        .map(|tag| tag.to_lowercase())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "---\ncreated: {}\nsource: plannotator\ntags: [{tag_list}]\n---",
        created.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

/// Filesystem-safe note title taken from the plan's first heading.
pub fn note_title(markdown: &str) -> String {
    let Some(raw) = plan_title(markdown) else {
        return DEFAULT_TITLE.to_string();
    };

    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !is_invalid_filename_char(*c))
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(MAX_TITLE_CHARS).collect();
    let title = truncated.trim_end();

    if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title.to_string()
    }
}

/// `<Title> - <Mon> <D>, <YYYY> <H>-<MM><am|pm>.md`
pub fn note_filename(title: &str, at: &NaiveDateTime) -> String {
    let (is_pm, hour) = at.hour12();
    format!(
        "{title} - {} {}, {} {hour}-{:02}{}.md",
        MONTHS[at.month0() as usize],
        at.day(),
        at.year(),
        at.minute(),
        if is_pm { "pm" } else { "am" }
    )
}

/// Full note body: frontmatter, backlink, then the untouched plan.
pub fn note_content(markdown: &str, created: DateTime<Utc>) -> String {
    let tags = extract_tags(markdown);
    format!(
        "{}\n\n{BACKLINK}\n\n{markdown}",
        frontmatter(&tags, created)
    )
}

fn is_invalid_filename_char(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_control()
}
