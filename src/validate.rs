//! Rule-based record validation.
//!
//! Each entity kind has a rule list producing human-readable violation
//! messages; an empty list means the record may be written. Rules are
//! evaluated independently, with no short-circuiting, so an admin fixing a
//! submission sees every problem at once instead of playing
//! whack-a-mole one error at a time.
//!
//! Messages name fields by their on-disk camelCase keys, since that is
//! what the admin typed into the draft.
//!
//! The write path treats any non-empty result as a wholesale rejection:
//! there is no partial acceptance, and the store is never called with a
//! record that failed validation. Videos carry the richest rule set
//! because they feed the video sitemap and structured data, where a
//! malformed duration or upload date breaks search indexing silently.

use chrono::{DateTime, NaiveDate};

use crate::normalize;
use crate::types::{Post, Review, Video};

/// Validate a blog post. Empty result = valid.
pub fn post(record: &Post) -> Vec<String> {
    let mut violations = Vec::new();
    if record.slug.is_empty() {
        violations.push("slug is required".to_string());
    }
    if record.title.is_empty() {
        violations.push("title is required".to_string());
    }
    if !valid_date(&record.date) {
        violations.push("date must be a valid YYYY-MM-DD date".to_string());
    }
    violations
}

/// Validate a review. Empty result = valid.
pub fn review(record: &Review) -> Vec<String> {
    let mut violations = Vec::new();
    if record.slug.is_empty() {
        violations.push("slug is required".to_string());
    }
    if record.title.is_empty() {
        violations.push("title is required".to_string());
    }
    if !valid_date(&record.date) {
        violations.push("date must be a valid YYYY-MM-DD date".to_string());
    }
    if record.category != "google" && record.category != "facebook" {
        violations.push("category must be \"google\" or \"facebook\"".to_string());
    }
    violations
}

/// Validate a video. Empty result = valid.
///
/// Rules, in message order:
/// 1. slug non-empty
/// 2. title non-empty
/// 3. date is a real `YYYY-MM-DD` calendar date
/// 4. youtube yields an extractable video ID
/// 5. duration, when present, is an ISO-8601 `PT#H#M#S` duration
/// 6. uploadDate, when present, is a `Z`-suffixed ISO-8601 instant
/// 7. transcriptHtml non-empty
/// 8. at least 3 well-formed FAQ entries
pub fn video(record: &Video) -> Vec<String> {
    let mut violations = Vec::new();
    if record.slug.is_empty() {
        violations.push("slug is required".to_string());
    }
    if record.title.is_empty() {
        violations.push("title is required".to_string());
    }
    if !valid_date(&record.date) {
        violations.push("date must be a valid YYYY-MM-DD date".to_string());
    }
    if record.youtube.is_empty() || normalize::youtube_id(&record.youtube).is_empty() {
        violations.push("youtube must be a YouTube URL or 11-character video id".to_string());
    }
    if !record.duration.is_empty() && normalize::duration_seconds(&record.duration).is_none() {
        violations.push("duration must be an ISO-8601 duration like PT4M13S".to_string());
    }
    if !record.upload_date.is_empty() && !valid_instant(&record.upload_date) {
        violations.push("uploadDate must be an ISO-8601 instant with a Z suffix".to_string());
    }
    if record.transcript_html.is_empty() {
        violations.push("transcriptHtml is required".to_string());
    }
    if record.faqs.len() < 3 {
        violations.push("at least 3 FAQ entries are required".to_string());
    }
    violations
}

/// Strict `YYYY-MM-DD`: shape first, then a real calendar date.
///
/// The shape check is separate because chrono accepts unpadded months
/// and days, and the collection files require the padded form.
fn valid_date(date: &str) -> bool {
    let bytes = date.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }
    let digits_ok = date
        .char_indices()
        .all(|(i, c)| matches!(i, 4 | 7) || c.is_ascii_digit());
    digits_ok && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

/// Strict ISO-8601 instant: must end in `Z` (no numeric offsets) and
/// parse to a valid point in time. Millisecond precision is optional.
fn valid_instant(instant: &str) -> bool {
    instant.ends_with('Z')
        && instant.contains('T')
        && DateTime::parse_from_rfc3339(instant).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Faq;

    fn valid_video() -> Video {
        Video {
            slug: "intro-to-ads".to_string(),
            title: "Intro to Ads".to_string(),
            date: "2026-03-01".to_string(),
            youtube: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            duration: "PT4M13S".to_string(),
            upload_date: "2026-03-01T09:00:00Z".to_string(),
            transcript_html: "<p>transcript</p>".to_string(),
            faqs: vec![
                Faq {
                    q: "Q1".to_string(),
                    a: "A1".to_string(),
                },
                Faq {
                    q: "Q2".to_string(),
                    a: "A2".to_string(),
                },
                Faq {
                    q: "Q3".to_string(),
                    a: "A3".to_string(),
                },
            ],
            ..Video::default()
        }
    }

    // =========================================================================
    // Video rules
    // =========================================================================

    #[test]
    fn valid_video_has_no_violations() {
        assert!(video(&valid_video()).is_empty());
    }

    #[test]
    fn all_violations_collected_at_once() {
        // Missing transcript AND only 2 FAQs: both must be reported
        let mut record = valid_video();
        record.transcript_html.clear();
        record.faqs.truncate(2);

        let violations = video(&record);
        assert_eq!(violations.len(), 2);
        assert!(violations[0].contains("transcriptHtml"));
        assert!(violations[1].contains("FAQ"));
    }

    #[test]
    fn empty_record_reports_every_required_rule() {
        let violations = video(&Video::default());
        assert_eq!(violations.len(), 6);
        assert!(violations[0].contains("slug"));
    }

    #[test]
    fn video_rejects_bad_date_shapes() {
        let mut record = valid_video();
        for bad in ["2026-3-01", "01-03-2026", "2026-02-30", "yesterday", ""] {
            record.date = bad.to_string();
            assert!(
                video(&record).iter().any(|v| v.contains("date")),
                "expected a date violation for {bad:?}"
            );
        }
    }

    #[test]
    fn video_rejects_unextractable_youtube() {
        let mut record = valid_video();
        record.youtube = "https://vimeo.com/12345".to_string();
        assert!(video(&record).iter().any(|v| v.contains("youtube")));
    }

    #[test]
    fn video_duration_is_optional_but_checked() {
        let mut record = valid_video();
        record.duration.clear();
        assert!(video(&record).is_empty());

        record.duration = "4 minutes".to_string();
        assert!(video(&record).iter().any(|v| v.contains("duration")));
    }

    #[test]
    fn video_upload_date_requires_z_suffix() {
        let mut record = valid_video();
        record.upload_date = "2026-03-01T09:00:00+07:00".to_string();
        assert!(video(&record).iter().any(|v| v.contains("uploadDate")));

        record.upload_date = "2026-03-01T09:00:00.123Z".to_string();
        assert!(video(&record).is_empty());
    }

    // =========================================================================
    // Post and review rules
    // =========================================================================

    #[test]
    fn post_requires_slug_title_date() {
        let violations = post(&Post::default());
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn valid_post_passes() {
        let record = Post {
            slug: "hello".to_string(),
            title: "Hello".to_string(),
            date: "2026-01-15".to_string(),
            ..Post::default()
        };
        assert!(post(&record).is_empty());
    }

    #[test]
    fn review_category_must_be_known_platform() {
        let mut record = Review {
            slug: "r".to_string(),
            title: "R".to_string(),
            date: "2026-01-15".to_string(),
            category: "google".to_string(),
            ..Review::default()
        };
        assert!(review(&record).is_empty());

        record.category = "facebook".to_string();
        assert!(review(&record).is_empty());

        record.category = "yelp".to_string();
        assert!(review(&record).iter().any(|v| v.contains("category")));
    }
}
