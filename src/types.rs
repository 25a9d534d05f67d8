//! Entity records persisted in the collection files.
//!
//! Three kinds exist (blog posts, customer reviews, videos), each
//! serialized with camelCase keys so the on-disk JSON matches what the
//! site's page layer reads. Every field carries a serde default: the
//! read path is tolerant, and partially-populated records from older
//! files deserialize cleanly instead of poisoning the whole collection.
//!
//! The [`Record`] trait is the seam the generic [`JsonStore`] is built
//! on: the three stores differ only in field set, sort order, and (for
//! videos) listing visibility, so those differences live here and the
//! store logic exists exactly once.
//!
//! ## Drafts
//!
//! Each record kind has a `*Draft` companion: the loose field map the
//! admin boundary hands over. Draft fields are raw [`serde_json::Value`]s
//! because submissions are untyped: tags may arrive as an array or a
//! comma-separated string, FAQs as objects or embedded JSON strings.
//! [`Record::from_draft`] funnels a draft through [`crate::normalize`]
//! into a canonical record with its identity fields still blank; the
//! store stamps `id`/`createdAt`/`updatedAt` at insert time.
//!
//! [`JsonStore`]: crate::store::JsonStore

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize;

/// One question/answer pair attached to a post or video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Faq {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub a: String,
}

/// One video chapter marker: a timecode and a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Chapter {
    #[serde(default)]
    pub t: String,
    #[serde(default)]
    pub label: String,
}

/// Behavior a record kind must provide for the generic collection store.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Loose input shape accepted from the admin boundary.
    type Draft: DeserializeOwned + Default;

    /// Collection name: also the default file stem (`<kind>.json`).
    const KIND: &'static str;

    /// The unique key within the collection.
    fn slug(&self) -> &str;

    /// Build a canonical record from a draft. Identity fields (`id`,
    /// `createdAt`, `updatedAt`) stay blank until [`Record::stamp`].
    fn from_draft(draft: &Self::Draft) -> Self;

    /// Assign the identity fields exactly once, at first write.
    fn stamp(&mut self, id: String, now_ms: i64);

    /// Re-apply canonical normalization. Idempotent; run on every record
    /// the read path returns.
    fn normalize(&mut self);

    /// Whether the record appears in `get_all` listings. Direct slug
    /// lookups ignore this.
    fn listed(&self) -> bool {
        true
    }

    /// Listing order for `get_all`.
    fn sort(records: &mut [Self]);

    /// Rule violations that must block a first write. Empty = valid.
    fn violations(&self) -> Vec<String>;
}

// ============================================================================
// Post
// ============================================================================

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Post {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub date: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub author: String,
    pub thumbnail: String,
    pub content_html: String,
    pub keywords: Vec<String>,
    pub faqs: Vec<Faq>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Loose admin submission for a blog post.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PostDraft {
    pub slug: Value,
    pub title: Value,
    pub date: Value,
    pub excerpt: Value,
    pub tags: Value,
    pub author: Value,
    pub thumbnail: Value,
    pub content_html: Value,
    pub keywords: Value,
    pub faqs: Value,
}

impl Record for Post {
    type Draft = PostDraft;
    const KIND: &'static str = "posts";

    fn slug(&self) -> &str {
        &self.slug
    }

    fn from_draft(draft: &PostDraft) -> Self {
        Post {
            id: String::new(),
            slug: normalize::slug(&normalize::clean_string(&draft.slug)),
            title: normalize::clean_string(&draft.title),
            date: normalize::clean_string(&draft.date),
            excerpt: normalize::clean_string(&draft.excerpt),
            tags: normalize::string_list(&draft.tags),
            author: normalize::clean_string(&draft.author),
            thumbnail: normalize::clean_string(&draft.thumbnail),
            content_html: normalize::clean_string(&draft.content_html),
            keywords: normalize::string_list(&draft.keywords),
            faqs: normalize::faq_list(&draft.faqs),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn stamp(&mut self, id: String, now_ms: i64) {
        self.id = id;
        self.created_at = now_ms;
        self.updated_at = now_ms;
    }

    fn normalize(&mut self) {
        self.slug = normalize::slug(&self.slug);
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.date);
        trim_in_place(&mut self.excerpt);
        trim_in_place(&mut self.author);
        trim_in_place(&mut self.thumbnail);
        trim_in_place(&mut self.content_html);
        retain_non_empty(&mut self.tags);
        retain_non_empty(&mut self.keywords);
        retain_well_formed_faqs(&mut self.faqs);
    }

    fn sort(records: &mut [Self]) {
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }

    fn violations(&self) -> Vec<String> {
        crate::validate::post(self)
    }
}

// ============================================================================
// Review
// ============================================================================

/// A customer review pulled from Google or Facebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Review {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub date: String,
    pub excerpt: String,
    /// Review source platform: `"google"` or `"facebook"`, lower-cased.
    pub category: String,
    pub author: String,
    pub thumbnail: String,
    pub content_html: String,
    pub keywords: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Loose admin submission for a review.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewDraft {
    pub slug: Value,
    pub title: Value,
    pub date: Value,
    pub excerpt: Value,
    pub category: Value,
    pub author: Value,
    pub thumbnail: Value,
    pub content_html: Value,
    pub keywords: Value,
}

impl Record for Review {
    type Draft = ReviewDraft;
    const KIND: &'static str = "reviews";

    fn slug(&self) -> &str {
        &self.slug
    }

    fn from_draft(draft: &ReviewDraft) -> Self {
        Review {
            id: String::new(),
            slug: normalize::slug(&normalize::clean_string(&draft.slug)),
            title: normalize::clean_string(&draft.title),
            date: normalize::clean_string(&draft.date),
            excerpt: normalize::clean_string(&draft.excerpt),
            category: normalize::clean_string(&draft.category).to_lowercase(),
            author: normalize::clean_string(&draft.author),
            thumbnail: normalize::clean_string(&draft.thumbnail),
            content_html: normalize::clean_string(&draft.content_html),
            keywords: normalize::string_list(&draft.keywords),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn stamp(&mut self, id: String, now_ms: i64) {
        self.id = id;
        self.created_at = now_ms;
        self.updated_at = now_ms;
    }

    fn normalize(&mut self) {
        self.slug = normalize::slug(&self.slug);
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.date);
        trim_in_place(&mut self.excerpt);
        self.category = self.category.trim().to_lowercase();
        trim_in_place(&mut self.author);
        trim_in_place(&mut self.thumbnail);
        trim_in_place(&mut self.content_html);
        retain_non_empty(&mut self.keywords);
    }

    fn sort(records: &mut [Self]) {
        // Newest review date first; ties broken by insertion time
        records.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
    }

    fn violations(&self) -> Vec<String> {
        crate::validate::review(self)
    }
}

// ============================================================================
// Video
// ============================================================================

/// A YouTube-hosted video with its page content and structured-data
/// extras (transcript, FAQs, chapters, highlights).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Video {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub date: String,
    pub excerpt: String,
    /// Original YouTube URL or bare 11-character ID, as submitted.
    pub youtube: String,
    pub tags: Vec<String>,
    pub author: String,
    /// ISO-8601 duration (`PT#H#M#S`), optional.
    pub duration: String,
    /// Derived from the YouTube ID at first write when absent; never
    /// recomputed afterwards.
    pub thumbnail: String,
    pub content_html: String,
    pub keywords: Vec<String>,
    pub transcript_html: String,
    pub faqs: Vec<Faq>,
    pub chapters: Vec<Chapter>,
    pub content_url: String,
    /// ISO-8601 instant with a `Z` suffix, optional.
    pub upload_date: String,
    pub highlights: Vec<String>,
    pub description: String,
    pub published: bool,
    pub hidden: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Default for Video {
    fn default() -> Self {
        Video {
            id: String::new(),
            slug: String::new(),
            title: String::new(),
            date: String::new(),
            excerpt: String::new(),
            youtube: String::new(),
            tags: Vec::new(),
            author: String::new(),
            duration: String::new(),
            thumbnail: String::new(),
            content_html: String::new(),
            keywords: Vec::new(),
            transcript_html: String::new(),
            faqs: Vec::new(),
            chapters: Vec::new(),
            content_url: String::new(),
            upload_date: String::new(),
            highlights: Vec::new(),
            description: String::new(),
            published: true,
            hidden: false,
            created_at: 0,
            updated_at: 0,
        }
    }
}

/// Loose admin submission for a video.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoDraft {
    pub slug: Value,
    pub title: Value,
    pub date: Value,
    pub excerpt: Value,
    pub youtube: Value,
    pub tags: Value,
    pub author: Value,
    pub duration: Value,
    pub thumbnail: Value,
    pub content_html: Value,
    pub keywords: Value,
    pub transcript_html: Value,
    pub faqs: Value,
    pub chapters: Value,
    pub content_url: Value,
    pub upload_date: Value,
    pub highlights: Value,
    pub description: Value,
    pub published: Value,
    pub hidden: Value,
}

impl Video {
    /// YouTube ID extracted from the `youtube` field; empty when the
    /// field holds neither a valid URL nor a bare ID.
    pub fn youtube_video_id(&self) -> String {
        normalize::youtube_id(&self.youtube)
    }
}

impl Record for Video {
    type Draft = VideoDraft;
    const KIND: &'static str = "videos";

    fn slug(&self) -> &str {
        &self.slug
    }

    fn from_draft(draft: &VideoDraft) -> Self {
        let youtube = normalize::clean_string(&draft.youtube);
        let mut thumbnail = normalize::clean_string(&draft.thumbnail);
        if thumbnail.is_empty() {
            let video_id = normalize::youtube_id(&youtube);
            if !video_id.is_empty() {
                thumbnail = format!("https://i.ytimg.com/vi/{video_id}/hqdefault.jpg");
            }
        }

        Video {
            id: String::new(),
            slug: normalize::slug(&normalize::clean_string(&draft.slug)),
            title: normalize::clean_string(&draft.title),
            date: normalize::clean_string(&draft.date),
            excerpt: normalize::clean_string(&draft.excerpt),
            youtube,
            tags: normalize::string_list(&draft.tags),
            author: normalize::clean_string(&draft.author),
            duration: normalize::clean_string(&draft.duration),
            thumbnail,
            content_html: normalize::clean_string(&draft.content_html),
            keywords: normalize::string_list(&draft.keywords),
            transcript_html: normalize::clean_string(&draft.transcript_html),
            faqs: normalize::faq_list(&draft.faqs),
            chapters: normalize::chapter_list(&draft.chapters),
            content_url: normalize::clean_string(&draft.content_url),
            upload_date: normalize::clean_string(&draft.upload_date),
            highlights: normalize::string_list(&draft.highlights),
            description: normalize::clean_string(&draft.description),
            published: draft.published.as_bool().unwrap_or(true),
            hidden: draft.hidden.as_bool().unwrap_or(false),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn stamp(&mut self, id: String, now_ms: i64) {
        self.id = id;
        self.created_at = now_ms;
        self.updated_at = now_ms;
    }

    fn normalize(&mut self) {
        self.slug = normalize::slug(&self.slug);
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.date);
        trim_in_place(&mut self.excerpt);
        trim_in_place(&mut self.youtube);
        trim_in_place(&mut self.author);
        trim_in_place(&mut self.duration);
        trim_in_place(&mut self.thumbnail);
        trim_in_place(&mut self.content_html);
        trim_in_place(&mut self.transcript_html);
        trim_in_place(&mut self.content_url);
        trim_in_place(&mut self.upload_date);
        trim_in_place(&mut self.description);
        retain_non_empty(&mut self.tags);
        retain_non_empty(&mut self.keywords);
        retain_non_empty(&mut self.highlights);
        retain_well_formed_faqs(&mut self.faqs);
        for chapter in &mut self.chapters {
            trim_in_place(&mut chapter.t);
            trim_in_place(&mut chapter.label);
            if chapter.t.is_empty() {
                chapter.t = "00:00".to_string();
            }
        }
        self.chapters.retain(|c| !c.label.is_empty());
    }

    fn listed(&self) -> bool {
        self.published && !self.hidden
    }

    fn sort(records: &mut [Self]) {
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }

    fn violations(&self) -> Vec<String> {
        crate::validate::video(self)
    }
}

// ============================================================================
// Shared normalization helpers
// ============================================================================

fn trim_in_place(s: &mut String) {
    *s = s.replace('\0', "").trim().to_string();
}

fn retain_non_empty(list: &mut Vec<String>) {
    for item in list.iter_mut() {
        trim_in_place(item);
    }
    list.retain(|item| !item.is_empty());
}

fn retain_well_formed_faqs(faqs: &mut Vec<Faq>) {
    for faq in faqs.iter_mut() {
        trim_in_place(&mut faq.q);
        trim_in_place(&mut faq.a);
    }
    faqs.retain(|faq| !faq.q.is_empty() && !faq.a.is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // =========================================================================
    // Draft → record conversion
    // =========================================================================

    #[test]
    fn post_from_draft_normalizes_fields() {
        let draft: PostDraft = serde_json::from_value(json!({
            "slug": "  My First Post ",
            "title": "  Hello  ",
            "date": "2026-01-15",
            "tags": "seo, ads",
            "faqs": [{"q": "Q1", "a": "A1"}, {"q": "", "a": "dropped"}],
        }))
        .unwrap();

        let post = Post::from_draft(&draft);
        assert_eq!(post.slug, "My-First-Post");
        assert_eq!(post.title, "Hello");
        assert_eq!(post.tags, vec!["seo", "ads"]);
        assert_eq!(post.faqs.len(), 1);
        assert!(post.id.is_empty());
        assert_eq!(post.created_at, 0);
    }

    #[test]
    fn review_from_draft_lowercases_category() {
        let draft: ReviewDraft = serde_json::from_value(json!({
            "slug": "great-service",
            "category": "Google",
        }))
        .unwrap();
        assert_eq!(Review::from_draft(&draft).category, "google");
    }

    #[test]
    fn video_from_draft_derives_thumbnail_from_youtube_id() {
        let draft: VideoDraft = serde_json::from_value(json!({
            "slug": "intro",
            "youtube": "https://youtu.be/dQw4w9WgXcQ",
        }))
        .unwrap();
        let video = Video::from_draft(&draft);
        assert_eq!(
            video.thumbnail,
            "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
        );
    }

    #[test]
    fn video_from_draft_keeps_explicit_thumbnail() {
        let draft: VideoDraft = serde_json::from_value(json!({
            "slug": "intro",
            "youtube": "https://youtu.be/dQw4w9WgXcQ",
            "thumbnail": "/uploads/custom.jpg",
        }))
        .unwrap();
        assert_eq!(Video::from_draft(&draft).thumbnail, "/uploads/custom.jpg");
    }

    #[test]
    fn video_from_draft_no_thumbnail_when_youtube_invalid() {
        let draft: VideoDraft = serde_json::from_value(json!({
            "slug": "intro",
            "youtube": "not a url",
        }))
        .unwrap();
        assert_eq!(Video::from_draft(&draft).thumbnail, "");
    }

    #[test]
    fn video_visibility_defaults() {
        let draft = VideoDraft::default();
        let video = Video::from_draft(&draft);
        assert!(video.published);
        assert!(!video.hidden);
        assert!(video.listed());
    }

    #[test]
    fn video_unpublished_or_hidden_is_unlisted() {
        let mut video = Video::default();
        video.published = false;
        assert!(!video.listed());

        let mut video = Video::default();
        video.hidden = true;
        assert!(!video.listed());
    }

    // =========================================================================
    // Record normalization is idempotent
    // =========================================================================

    #[test]
    fn normalize_twice_is_stable() {
        let mut video = Video {
            slug: "My Video".to_string(),
            title: " Padded ".to_string(),
            tags: vec!["a".to_string(), " ".to_string()],
            faqs: vec![Faq {
                q: "q".to_string(),
                a: String::new(),
            }],
            chapters: vec![Chapter {
                t: String::new(),
                label: "Intro".to_string(),
            }],
            ..Video::default()
        };
        video.normalize();
        let once = video.clone();
        video.normalize();
        assert_eq!(video, once);
        assert_eq!(video.slug, "My-Video");
        assert_eq!(video.tags, vec!["a"]);
        assert!(video.faqs.is_empty());
        assert_eq!(video.chapters[0].t, "00:00");
    }

    // =========================================================================
    // Serde shape
    // =========================================================================

    #[test]
    fn records_serialize_with_camel_case_keys() {
        let post = Post {
            slug: "s".to_string(),
            content_html: "<p>x</p>".to_string(),
            created_at: 5,
            ..Post::default()
        };
        let value = serde_json::to_value(&post).unwrap();
        assert!(value.get("contentHtml").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("content_html").is_none());
    }

    #[test]
    fn video_deserializes_with_missing_fields() {
        let video: Video = serde_json::from_value(json!({"slug": "bare"})).unwrap();
        assert!(video.published);
        assert!(!video.hidden);
        assert!(video.faqs.is_empty());
    }

    // =========================================================================
    // Sort orders
    // =========================================================================

    #[test]
    fn posts_sort_newest_created_first() {
        let mut posts = vec![
            Post {
                slug: "old".to_string(),
                created_at: 100,
                ..Post::default()
            },
            Post {
                slug: "new".to_string(),
                created_at: 200,
                ..Post::default()
            },
        ];
        Post::sort(&mut posts);
        assert_eq!(posts[0].slug, "new");
    }

    #[test]
    fn reviews_sort_by_date_then_created() {
        let mut reviews = vec![
            Review {
                slug: "a".to_string(),
                date: "2026-01-01".to_string(),
                created_at: 300,
                ..Review::default()
            },
            Review {
                slug: "b".to_string(),
                date: "2026-02-01".to_string(),
                created_at: 100,
                ..Review::default()
            },
            Review {
                slug: "c".to_string(),
                date: "2026-02-01".to_string(),
                created_at: 200,
                ..Review::default()
            },
        ];
        Review::sort(&mut reviews);
        let slugs: Vec<&str> = reviews.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["c", "b", "a"]);
    }
}
