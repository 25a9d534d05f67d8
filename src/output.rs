//! CLI output formatting.
//!
//! Output is information-centric: every record leads with its
//! positional index and title, with the slug and date as indented
//! context lines, so a listing reads as a content inventory rather than
//! a file dump.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! ```text
//! posts (2 records)
//! 001 ตัวอย่างบทความ
//!     Slug: sample-post
//!     Date: 2026-01-15
//! 002 Second Post
//!     Slug: second-post
//!     Date: 2026-01-10
//! ```

use crate::store::StorageInfo;

/// One row of a listing: the display fields shared by all record kinds.
pub struct ListRow {
    pub title: String,
    pub slug: String,
    pub date: String,
    /// Extra context line, e.g. a review's source platform.
    pub note: Option<String>,
}

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Format a collection listing.
pub fn format_list(kind: &str, rows: &[ListRow]) -> Vec<String> {
    let mut lines = vec![format!("{} ({} records)", kind, rows.len())];
    for (i, row) in rows.iter().enumerate() {
        let title = if row.title.is_empty() {
            format!("({})", row.slug)
        } else {
            row.title.clone()
        };
        lines.push(format!("{} {}", format_index(i + 1), title));
        lines.push(format!("    Slug: {}", row.slug));
        if !row.date.is_empty() {
            lines.push(format!("    Date: {}", row.date));
        }
        if let Some(note) = &row.note {
            lines.push(format!("    Note: {note}"));
        }
    }
    lines
}

/// Format the result of an `add` command.
pub fn format_write_outcome(kind: &str, slug: &str, existed: bool) -> Vec<String> {
    if existed {
        vec![
            format!("{kind}: '{slug}' already exists - kept the original record"),
            "    First write wins: delete and re-add to replace it".to_string(),
        ]
    } else {
        vec![format!("{kind}: created '{slug}'")]
    }
}

/// Format validation failures for one record.
pub fn format_violations(kind: &str, slug: &str, violations: &[String]) -> Vec<String> {
    let mut lines = vec![format!(
        "{kind} '{slug}': {} validation problem{}",
        violations.len(),
        if violations.len() == 1 { "" } else { "s" }
    )];
    for violation in violations {
        lines.push(format!("    - {violation}"));
    }
    lines
}

/// Format the summary of a `seo` run.
pub fn format_seo_summary(
    posts: usize,
    reviews: usize,
    videos: usize,
    artifacts: &[String],
) -> Vec<String> {
    let mut lines = vec![format!(
        "Indexed {posts} posts, {reviews} reviews, {videos} videos"
    )];
    for artifact in artifacts {
        lines.push(format!("    Wrote {artifact}"));
    }
    lines
}

/// Format one collection's storage diagnostics.
pub fn format_storage_info(info: &StorageInfo) -> Vec<String> {
    vec![
        info.kind.to_string(),
        format!("    File: {}", info.file.display()),
        format!("    Dir: {}", info.dir.display()),
        format!("    Source: {}", info.source.describe()),
    ]
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
