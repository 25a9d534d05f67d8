//! Canonical field shapes for everything that reaches a collection file.
//!
//! Admin input arrives as loose JSON field maps: values may be strings,
//! numbers, arrays, or absent entirely. This module is the single funnel
//! that turns those into the shapes the stores persist, so a record read
//! back from disk is byte-identical no matter how sloppy the original
//! submission was.
//!
//! ## Canonical forms
//!
//! - **Strings**: scalar-coerced, NUL-stripped, whitespace-trimmed.
//! - **String lists**: a JSON array (elements coerced and trimmed, empties
//!   dropped) or a comma-separated string. Anything else is an empty list.
//!   Order is preserved; duplicates are kept.
//! - **Slugs**: whitespace becomes hyphens, then characters outside
//!   ASCII alphanumerics, `-`, `_`, `/`, and the Thai block
//!   (U+0E00–U+0E7F) are dropped, then repeated hyphens collapse and
//!   edge hyphens/slashes are stripped. Slashes survive in the middle,
//!   so hierarchical slugs like `services/media-buying` work.
//! - **FAQ lists**: only entries with both a non-empty question and a
//!   non-empty answer survive. A string element is given one chance as
//!   embedded JSON if it looks like an object.
//! - **Chapter lists**: `{t, label}` pairs; `t` defaults to `"00:00"`,
//!   entries without a label are dropped.
//!
//! All of these are idempotent: re-normalizing an already-canonical value
//! is a no-op, which is what lets the stores re-apply normalization on
//! every read without drift.
//!
//! ## Time parsing
//!
//! [`duration_seconds`] hand-parses the ISO-8601 `PT#H#M#S` form. It is
//! both the validator's pattern check and the video sitemap's seconds
//! conversion, so the two can never disagree. [`timecode_seconds`] does
//! the same for `MM:SS` / `HH:MM:SS` chapter timecodes.

use serde_json::Value;
use url::Url;

use crate::types::{Chapter, Faq};

/// Coerce a loose JSON value to a trimmed string.
///
/// Scalars (string, number, bool) are rendered; NUL characters are
/// stripped; surrounding whitespace is trimmed. Arrays, objects, and
/// null all yield `""`.
pub fn clean_string(value: &Value) -> String {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return String::new(),
    };
    raw.replace('\0', "").trim().to_string()
}

/// Coerce a loose JSON value to an ordered list of non-empty strings.
///
/// Accepts either an actual array (each element scalar-coerced and
/// trimmed, empties dropped) or a comma-separated string. Any other
/// input yields an empty list.
pub fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(clean_string)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(|part| part.replace('\0', "").trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Normalize a raw slug into its canonical URL-safe form.
///
/// Steps, in order:
/// 1. Replace whitespace with hyphens
/// 2. Drop every character that is not ASCII alphanumeric, `-`, `_`,
///    `/`, or within the Thai block U+0E00–U+0E7F
/// 3. Collapse repeated hyphens
/// 4. Strip leading/trailing hyphens and slashes
///
/// Disallowed characters are dropped *before* the collapse and edge
/// trim. A dropped character must never leave a double or leading
/// hyphen behind: the output has to be a fixed point of this function,
/// because the store re-normalizes every record it reads and a slug
/// that shifted on re-read would break exact-match uniqueness and
/// delete.
///
/// ```text
/// "  Social Media  "          → "Social-Media"
/// "seo & sem"                 → "seo-sem"
/// "/services//ads/"           → "services//ads"  (inner slashes kept)
/// "รับทำ SEO"                  → "รับทำ-SEO"
/// "hello!!world"              → "helloworld"
/// ```
pub fn slug(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|&c| is_slug_char(c))
        .collect();

    let mut collapsed = String::with_capacity(kept.len());
    let mut prev_dash = false;
    for c in kept.chars() {
        if c == '-' {
            if !prev_dash {
                collapsed.push('-');
            }
            prev_dash = true;
        } else {
            collapsed.push(c);
            prev_dash = false;
        }
    }

    collapsed.trim_matches(|c| c == '-' || c == '/').to_string()
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/') || ('\u{0E00}'..='\u{0E7F}').contains(&c)
}

/// Normalize a loose FAQ value into well-formed question/answer pairs.
///
/// Objects need both a non-empty `q` and a non-empty `a` to survive.
/// String elements get one chance as embedded JSON (only attempted when
/// the trimmed string looks like an object); otherwise they are dropped,
/// as is everything else. Non-array input yields an empty list.
pub fn faq_list(value: &Value) -> Vec<Faq> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items.iter().filter_map(faq_entry).collect()
}

fn faq_entry(item: &Value) -> Option<Faq> {
    match item {
        Value::Object(map) => {
            let q = clean_string(map.get("q").unwrap_or(&Value::Null));
            let a = clean_string(map.get("a").unwrap_or(&Value::Null));
            (!q.is_empty() && !a.is_empty()).then_some(Faq { q, a })
        }
        Value::String(s) if s.trim_start().starts_with('{') => {
            let embedded: Value = serde_json::from_str(s).ok()?;
            match embedded {
                Value::Object(_) => faq_entry(&embedded),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Normalize a loose chapter value into `{t, label}` pairs.
///
/// The timecode defaults to `"00:00"` when absent; entries without a
/// label are dropped. Non-array input yields an empty list.
pub fn chapter_list(value: &Value) -> Vec<Chapter> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let map = item.as_object()?;
            let label = clean_string(map.get("label").unwrap_or(&Value::Null));
            if label.is_empty() {
                return None;
            }
            let mut t = clean_string(map.get("t").unwrap_or(&Value::Null));
            if t.is_empty() {
                t = "00:00".to_string();
            }
            Some(Chapter { t, label })
        })
        .collect()
}

/// Extract an 11-character YouTube video ID from a URL or bare ID.
///
/// Accepted inputs:
/// - A bare `[A-Za-z0-9_-]{11}` token, returned as is
/// - `youtube.com` URLs: the `v` query parameter when it matches the ID
///   pattern, otherwise the last path segment (covers `/embed/<id>`,
///   `/shorts/<id>`, `/live/<id>`)
/// - `youtu.be` URLs: the path minus its leading slash
///
/// Anything that doesn't produce a pattern-matching candidate, including
/// URLs that fail to parse, yields an empty string.
pub fn youtube_id(input: &str) -> String {
    let input = input.trim();
    if is_youtube_id(input) {
        return input.to_string();
    }

    let Ok(parsed) = Url::parse(input) else {
        return String::new();
    };
    let host = parsed.host_str().unwrap_or("");

    let candidate = if host == "youtu.be" {
        parsed.path().trim_start_matches('/').to_string()
    } else if host == "youtube.com" || host.ends_with(".youtube.com") {
        parsed
            .query_pairs()
            .find(|(key, value)| key == "v" && is_youtube_id(value))
            .map(|(_, value)| value.into_owned())
            .or_else(|| {
                parsed
                    .path_segments()
                    .and_then(|mut segments| segments.next_back())
                    .map(str::to_string)
            })
            .unwrap_or_default()
    } else {
        return String::new();
    };

    if is_youtube_id(&candidate) {
        candidate
    } else {
        String::new()
    }
}

fn is_youtube_id(s: &str) -> bool {
    s.len() == 11
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Parse an ISO-8601 duration of the `PT(\d+H)?(\d+M)?(\d+S)?` form
/// into whole seconds.
///
/// Components are optional but must appear in H, M, S order, each with
/// at least one digit. A bare `"PT"` is zero seconds. Returns `None`
/// for anything outside the pattern, which makes this double as the
/// validator's pattern check.
pub fn duration_seconds(duration: &str) -> Option<u64> {
    let rest = duration.strip_prefix("PT")?;

    let mut total: u64 = 0;
    let mut digits = String::new();
    let mut last_rank = 0u8;
    for c in rest.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let (rank, factor) = match c {
            'H' => (1, 3600),
            'M' => (2, 60),
            'S' => (3, 1),
            _ => return None,
        };
        // Units must be in order and appear at most once
        if rank <= last_rank || digits.is_empty() {
            return None;
        }
        last_rank = rank;
        total += digits.parse::<u64>().ok()? * factor;
        digits.clear();
    }

    // Trailing digits with no unit letter
    if !digits.is_empty() {
        return None;
    }
    Some(total)
}

/// Parse a `MM:SS` or `HH:MM:SS` chapter timecode into whole seconds.
pub fn timecode_seconds(timecode: &str) -> Option<u64> {
    let parts: Vec<&str> = timecode.split(':').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return None;
    }
    let mut total: u64 = 0;
    for part in &parts {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        total = total * 60 + part.parse::<u64>().ok()?;
    }
    Some(total)
}
