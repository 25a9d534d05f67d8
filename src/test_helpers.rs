//! Shared test utilities for the flatsite test suite.
//!
//! Provides temp-directory store setup and valid draft builders so
//! individual tests only spell out the fields they are exercising.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (_tmp, store) = temp_store::<Video>();
//! let mut draft = video_draft("my-slug");
//! draft.title = serde_json::json!("Override");
//! store.add_first_write(&draft).unwrap();
//! ```

use serde_json::json;
use tempfile::TempDir;

use crate::config::{CollectionPaths, PathSource};
use crate::store::JsonStore;
use crate::types::{PostDraft, Record, ReviewDraft, VideoDraft};

/// A store backed by a fresh temp directory. Keep the `TempDir` alive
/// for the duration of the test; dropping it deletes the files.
pub fn temp_store<R: Record>() -> (TempDir, JsonStore<R>) {
    let tmp = TempDir::new().unwrap();
    let store = JsonStore::at(CollectionPaths {
        file: tmp.path().join(format!("{}.json", R::KIND)),
        source: PathSource::Config,
    });
    (tmp, store)
}

/// A post draft that passes validation, with the given slug.
pub fn post_draft(slug: &str) -> PostDraft {
    serde_json::from_value(json!({
        "slug": slug,
        "title": "Ten SEO Tips",
        "date": "2026-01-15",
        "excerpt": "Quick wins for small sites.",
        "tags": ["seo", "tips"],
        "author": "Somchai",
        "contentHtml": "<p>Body</p>",
    }))
    .unwrap()
}

/// A review draft that passes validation, with the given slug.
pub fn review_draft(slug: &str) -> ReviewDraft {
    serde_json::from_value(json!({
        "slug": slug,
        "title": "Great agency",
        "date": "2026-02-01",
        "category": "google",
        "author": "Customer A",
    }))
    .unwrap()
}

/// A video draft that passes the full video rule set, with the given
/// slug.
pub fn video_draft(slug: &str) -> VideoDraft {
    serde_json::from_value(json!({
        "slug": slug,
        "title": "Intro to Ads",
        "date": "2026-03-01",
        "youtube": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "duration": "PT4M13S",
        "uploadDate": "2026-03-01T09:00:00Z",
        "transcriptHtml": "<p>transcript</p>",
        "faqs": [
            {"q": "Q1", "a": "A1"},
            {"q": "Q2", "a": "A2"},
            {"q": "Q3", "a": "A3"},
        ],
        "chapters": [{"t": "00:00", "label": "Start"}],
    }))
    .unwrap()
}
