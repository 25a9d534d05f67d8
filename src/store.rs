//! File-backed JSON collection store with first-write-wins semantics.
//!
//! One collection = one JSON file holding a pretty-printed array of
//! records. [`JsonStore`] is generic over [`Record`] and instantiated
//! once per entity kind; the kinds differ only in field set, sort order,
//! and listing visibility, all of which live on the record type.
//!
//! ## Write policy: first write wins
//!
//! A slug can be written once. A second write to an existing slug is a
//! successful no-op that returns the stored record untouched, not an
//! overwrite, not an error. There is no update operation at all:
//! correcting a record means delete and recreate, which deliberately
//! loses the original `createdAt`. Admin content is append-mostly and
//! an accidental resubmission must never clobber a published record.
//!
//! ## Read policy: self-healing
//!
//! A missing, unreadable, or non-array collection file is treated as an
//! empty collection and immediately rewritten as `[]`. Corruption never
//! surfaces to callers; only genuine write failures (disk full,
//! permissions) propagate. Every record returned from disk passes
//! through [`Record::normalize`], so canonical form is maintained even
//! for hand-edited files.
//!
//! ## Durability
//!
//! Every write serializes the whole collection to a `.tmp` sibling and
//! renames it into place, so a crash mid-write leaves the previous file
//! intact rather than a truncated one.
//!
//! ## Concurrency
//!
//! None. Each operation is an independent read-modify-write of the
//! whole file with no locking; two simultaneous writers can lose one
//! writer's insert. Accepted limitation for the single-admin usage this
//! store serves.

use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{CollectionPaths, PathSource, SiteConfig};
use crate::types::Record;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("slug is required")]
    MissingSlug,
    #[error("no {kind} record with slug '{slug}'")]
    NotFound { kind: &'static str, slug: String },
}

/// Outcome of a first-write upsert.
#[derive(Debug, Clone)]
pub enum WriteOutcome<R> {
    /// The slug was new; the stamped record was persisted.
    Created(R),
    /// The slug already existed; the stored record is returned
    /// unmodified and nothing was written.
    Existing(R),
}

impl<R> WriteOutcome<R> {
    pub fn existed(&self) -> bool {
        matches!(self, WriteOutcome::Existing(_))
    }

    pub fn record(&self) -> &R {
        match self {
            WriteOutcome::Created(r) | WriteOutcome::Existing(r) => r,
        }
    }
}

/// Diagnostic description of where a collection lives.
#[derive(Debug, Clone)]
pub struct StorageInfo {
    pub kind: &'static str,
    pub file: PathBuf,
    pub dir: PathBuf,
    pub source: PathSource,
}

/// A file-backed collection of one record kind.
pub struct JsonStore<R: Record> {
    file: PathBuf,
    source: PathSource,
    _record: PhantomData<R>,
}

impl<R: Record> JsonStore<R> {
    /// Open the collection at the path resolved by the site config.
    pub fn open(config: &SiteConfig) -> Self {
        Self::at(config.collection_paths(R::KIND))
    }

    /// Open the collection at an explicitly resolved location.
    pub fn at(paths: CollectionPaths) -> Self {
        Self {
            file: paths.file,
            source: paths.source,
            _record: PhantomData,
        }
    }

    /// All listed records, normalized and sorted.
    ///
    /// Records whose kind defines listing visibility (videos with
    /// `published == false` or `hidden == true`) are filtered out here
    /// and only here; [`JsonStore::get_by_slug`] still finds them.
    pub fn get_all(&self) -> Result<Vec<R>, StoreError> {
        let mut records = self.load()?;
        records.retain(Record::listed);
        R::sort(&mut records);
        Ok(records)
    }

    /// Every stored record, including unlisted ones, in listing order.
    /// Diagnostic read used by `flatsite check`.
    pub fn audit_all(&self) -> Result<Vec<R>, StoreError> {
        let mut records = self.load()?;
        R::sort(&mut records);
        Ok(records)
    }

    /// Look up one record by slug.
    ///
    /// The input is percent-decoded first (already-decoded or malformed
    /// input falls back to the raw string), then matched exactly, then
    /// case-insensitively. No visibility filter applies.
    pub fn get_by_slug(&self, raw: &str) -> Result<Option<R>, StoreError> {
        let decoded = match urlencoding::decode(raw) {
            Ok(cow) => cow.into_owned(),
            Err(_) => raw.to_string(),
        };

        let records = self.load()?;
        if let Some(found) = records.iter().find(|r| r.slug() == decoded) {
            return Ok(Some(found.clone()));
        }
        let lower = decoded.to_lowercase();
        Ok(records
            .into_iter()
            .find(|r| r.slug().to_lowercase() == lower))
    }

    /// Insert a record built from `draft` unless its slug already
    /// exists.
    ///
    /// On a fresh slug the record gets a random id and
    /// `createdAt`/`updatedAt` stamps, is appended, and the collection
    /// is persisted. On an existing slug nothing is written and the
    /// stored record comes back unmodified: the first write won.
    ///
    /// The only precondition enforced here is a non-empty slug; rule
    /// validation is the boundary's job before calling in.
    pub fn add_first_write(&self, draft: &R::Draft) -> Result<WriteOutcome<R>, StoreError> {
        let mut candidate = R::from_draft(draft);
        if candidate.slug().is_empty() {
            return Err(StoreError::MissingSlug);
        }

        let mut records = self.load()?;
        if let Some(existing) = records.iter().find(|r| r.slug() == candidate.slug()) {
            return Ok(WriteOutcome::Existing(existing.clone()));
        }

        candidate.stamp(
            Uuid::new_v4().to_string(),
            Utc::now().timestamp_millis(),
        );
        records.push(candidate.clone());
        self.persist(&records)?;
        Ok(WriteOutcome::Created(candidate))
    }

    /// Remove the record whose stored slug equals `slug` byte-for-byte.
    ///
    /// No normalization or decoding is applied to the input. Returns
    /// the removed record; fails with [`StoreError::NotFound`] when no
    /// record matches, leaving the file untouched.
    pub fn delete_by_slug(&self, slug: &str) -> Result<R, StoreError> {
        let mut records = self.load()?;
        let position = records
            .iter()
            .position(|r| r.slug() == slug)
            .ok_or_else(|| StoreError::NotFound {
                kind: R::KIND,
                slug: slug.to_string(),
            })?;
        let removed = records.remove(position);
        self.persist(&records)?;
        Ok(removed)
    }

    /// Where this collection lives and which config layer decided that.
    pub fn storage_info(&self) -> StorageInfo {
        StorageInfo {
            kind: R::KIND,
            dir: self
                .file
                .parent()
                .map(PathBuf::from)
                .unwrap_or_default(),
            file: self.file.clone(),
            source: self.source,
        }
    }

    /// Read and normalize the whole collection, healing anything
    /// unreadable into an empty one.
    fn load(&self) -> Result<Vec<R>, StoreError> {
        let text = match fs::read_to_string(&self.file) {
            Ok(text) => text,
            Err(_) => return self.heal(),
        };
        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(_) => return self.heal(),
        };
        let Value::Array(items) = value else {
            return self.heal();
        };

        // Per-record tolerance: one malformed entry doesn't take down
        // the collection
        let mut records: Vec<R> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();
        for record in &mut records {
            record.normalize();
        }
        Ok(records)
    }

    /// Reset the backing file to an empty collection.
    fn heal(&self) -> Result<Vec<R>, StoreError> {
        self.persist(&Vec::new())?;
        Ok(Vec::new())
    }

    /// Serialize the whole collection and swap it into place atomically.
    fn persist(&self, records: &[R]) -> Result<(), StoreError> {
        if let Some(parent) = self.file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.file.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.file)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{post_draft, review_draft, temp_store, video_draft};
    use crate::types::{Post, Review, Video};
    use serde_json::json;
    use std::fs;

    // =========================================================================
    // First-write-wins upsert
    // =========================================================================

    #[test]
    fn first_write_then_read_back() {
        let (_tmp, store) = temp_store::<Post>();
        let outcome = store.add_first_write(&post_draft("hello-world")).unwrap();
        assert!(!outcome.existed());

        let read = store.get_by_slug("hello-world").unwrap().unwrap();
        assert_eq!(read.slug, "hello-world");
        assert_eq!(read.title, outcome.record().title);
        assert!(!read.id.is_empty());
        assert!(read.created_at > 0);
        assert_eq!(read.created_at, read.updated_at);
    }

    #[test]
    fn second_write_same_slug_keeps_first_record() {
        let (_tmp, store) = temp_store::<Video>();

        let first = video_draft("a-b");
        store.add_first_write(&first).unwrap();

        let mut second = video_draft("a-b");
        second.title = json!("A Completely Different Title");
        let outcome = store.add_first_write(&second).unwrap();

        assert!(outcome.existed());
        let stored = store.get_by_slug("a-b").unwrap().unwrap();
        assert_eq!(stored.title, "Intro to Ads");
        assert_eq!(outcome.record().title, "Intro to Ads");
    }

    #[test]
    fn existing_outcome_preserves_original_timestamps() {
        let (_tmp, store) = temp_store::<Post>();
        let created = match store.add_first_write(&post_draft("keep")).unwrap() {
            WriteOutcome::Created(r) => r,
            WriteOutcome::Existing(_) => panic!("expected a fresh write"),
        };

        let again = store.add_first_write(&post_draft("keep")).unwrap();
        assert_eq!(again.record().created_at, created.created_at);
        assert_eq!(again.record().id, created.id);
    }

    #[test]
    fn empty_slug_is_rejected() {
        let (_tmp, store) = temp_store::<Post>();
        let result = store.add_first_write(&post_draft("   "));
        assert!(matches!(result, Err(StoreError::MissingSlug)));
    }

    #[test]
    fn slug_is_normalized_before_uniqueness_check() {
        let (_tmp, store) = temp_store::<Post>();
        store.add_first_write(&post_draft("My Post")).unwrap();
        // Normalizes to the same slug, so the first write wins
        let outcome = store.add_first_write(&post_draft("My  Post")).unwrap();
        assert!(outcome.existed());
    }

    // =========================================================================
    // get_by_slug
    // =========================================================================

    #[test]
    fn get_by_slug_decodes_percent_escapes() {
        let (_tmp, store) = temp_store::<Post>();
        store.add_first_write(&post_draft("รับทำ-seo")).unwrap();

        let encoded = urlencoding::encode("รับทำ-seo").into_owned();
        assert!(store.get_by_slug(&encoded).unwrap().is_some());
        // Already-decoded input also works
        assert!(store.get_by_slug("รับทำ-seo").unwrap().is_some());
    }

    #[test]
    fn get_by_slug_falls_back_to_case_insensitive() {
        let (_tmp, store) = temp_store::<Post>();
        store.add_first_write(&post_draft("Hello-World")).unwrap();
        let found = store.get_by_slug("hello-world").unwrap().unwrap();
        assert_eq!(found.slug, "Hello-World");
    }

    #[test]
    fn get_by_slug_prefers_exact_match() {
        let (_tmp, store) = temp_store::<Post>();
        store.add_first_write(&post_draft("Post")).unwrap();
        store.add_first_write(&post_draft("post")).unwrap();
        assert_eq!(store.get_by_slug("post").unwrap().unwrap().slug, "post");
        assert_eq!(store.get_by_slug("Post").unwrap().unwrap().slug, "Post");
    }

    #[test]
    fn get_by_slug_missing_returns_none() {
        let (_tmp, store) = temp_store::<Post>();
        assert!(store.get_by_slug("ghost").unwrap().is_none());
    }

    #[test]
    fn get_by_slug_finds_unlisted_videos() {
        let (_tmp, store) = temp_store::<Video>();
        let mut draft = video_draft("secret");
        draft.hidden = json!(true);
        store.add_first_write(&draft).unwrap();

        // Hidden from listings but reachable by direct lookup
        assert!(store.get_all().unwrap().is_empty());
        assert!(store.get_by_slug("secret").unwrap().is_some());
    }

    // =========================================================================
    // delete_by_slug
    // =========================================================================

    #[test]
    fn delete_removes_record() {
        let (_tmp, store) = temp_store::<Post>();
        store.add_first_write(&post_draft("doomed")).unwrap();
        let removed = store.delete_by_slug("doomed").unwrap();
        assert_eq!(removed.slug, "doomed");
        assert!(store.get_by_slug("doomed").unwrap().is_none());
    }

    #[test]
    fn delete_missing_slug_fails_and_leaves_collection_unchanged() {
        let (_tmp, store) = temp_store::<Post>();
        store.add_first_write(&post_draft("survivor")).unwrap();

        let result = store.delete_by_slug("ghost");
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
        assert_eq!(store.get_all().unwrap().len(), 1);
    }

    #[test]
    fn delete_matches_stored_slug_exactly() {
        let (_tmp, store) = temp_store::<Post>();
        store.add_first_write(&post_draft("Exact-Case")).unwrap();
        // Case-insensitive or unnormalized input must not match
        assert!(store.delete_by_slug("exact-case").is_err());
        assert!(store.delete_by_slug("Exact Case").is_err());
        assert!(store.delete_by_slug("Exact-Case").is_ok());
    }

    // =========================================================================
    // Self-healing reads
    // =========================================================================

    #[test]
    fn missing_file_heals_to_empty_collection() {
        let (tmp, store) = temp_store::<Post>();
        assert!(store.get_all().unwrap().is_empty());
        let written = fs::read_to_string(tmp.path().join("posts.json")).unwrap();
        assert_eq!(written, "[]");
    }

    #[test]
    fn corrupt_json_heals_to_empty_collection() {
        let (tmp, store) = temp_store::<Post>();
        fs::write(tmp.path().join("posts.json"), "{not json").unwrap();
        assert!(store.get_all().unwrap().is_empty());
        assert_eq!(
            fs::read_to_string(tmp.path().join("posts.json")).unwrap(),
            "[]"
        );
    }

    #[test]
    fn non_array_top_level_heals_to_empty_collection() {
        let (tmp, store) = temp_store::<Post>();
        fs::write(tmp.path().join("posts.json"), r#"{"posts": []}"#).unwrap();
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let (tmp, store) = temp_store::<Post>();
        fs::write(
            tmp.path().join("posts.json"),
            r#"[{"slug": "good", "title": "ok"}, "not an object", 42]"#,
        )
        .unwrap();
        let records = store.get_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].slug, "good");
    }

    #[test]
    fn records_renormalized_on_read() {
        let (tmp, store) = temp_store::<Post>();
        // Hand-edited file with uncanonical values
        fs::write(
            tmp.path().join("posts.json"),
            r#"[{"slug": "Padded Slug", "title": "  spaces  ", "tags": ["x", " "]}]"#,
        )
        .unwrap();
        let records = store.get_all().unwrap();
        assert_eq!(records[0].slug, "Padded-Slug");
        assert_eq!(records[0].title, "spaces");
        assert_eq!(records[0].tags, vec!["x"]);
    }

    // =========================================================================
    // Listing order and visibility
    // =========================================================================

    #[test]
    fn get_all_filters_unpublished_and_hidden_videos() {
        let (_tmp, store) = temp_store::<Video>();
        store.add_first_write(&video_draft("visible")).unwrap();

        let mut unpublished = video_draft("unpublished");
        unpublished.published = json!(false);
        store.add_first_write(&unpublished).unwrap();

        let mut hidden = video_draft("hidden");
        hidden.hidden = json!(true);
        store.add_first_write(&hidden).unwrap();

        let listed = store.get_all().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].slug, "visible");

        // The audit read still sees everything
        assert_eq!(store.audit_all().unwrap().len(), 3);
    }

    #[test]
    fn reviews_listed_newest_date_first() {
        let (_tmp, store) = temp_store::<Review>();
        let mut early = review_draft("early");
        early.date = json!("2026-01-01");
        let mut late = review_draft("late");
        late.date = json!("2026-02-01");
        store.add_first_write(&early).unwrap();
        store.add_first_write(&late).unwrap();

        let slugs: Vec<String> = store
            .get_all()
            .unwrap()
            .into_iter()
            .map(|r| r.slug)
            .collect();
        assert_eq!(slugs, vec!["late", "early"]);
    }

    // =========================================================================
    // Persistence format
    // =========================================================================

    #[test]
    fn collection_file_is_pretty_printed_array() {
        let (tmp, store) = temp_store::<Post>();
        store.add_first_write(&post_draft("pretty")).unwrap();
        let written = fs::read_to_string(tmp.path().join("posts.json")).unwrap();
        assert!(written.starts_with("[\n"));
        assert!(written.contains("  {"));
        assert!(written.contains("\"slug\": \"pretty\""));
    }

    #[test]
    fn no_tmp_file_left_behind_after_write() {
        let (tmp, store) = temp_store::<Post>();
        store.add_first_write(&post_draft("clean")).unwrap();
        assert!(!tmp.path().join("posts.tmp").exists());
        assert!(tmp.path().join("posts.json").exists());
    }

    #[test]
    fn storage_info_reports_resolved_paths() {
        let (tmp, store) = temp_store::<Post>();
        let info = store.storage_info();
        assert_eq!(info.kind, "posts");
        assert_eq!(info.dir, tmp.path());
        assert_eq!(info.file, tmp.path().join("posts.json"));
    }
}
