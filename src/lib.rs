//! # flatsite
//!
//! A flat-file content store and SEO artifact generator for marketing
//! sites. Plain JSON files are the database: one pretty-printed array
//! per collection (blog posts, customer reviews, videos), editable by
//! hand, diffable in version control, and served to the page layer
//! without any query engine in between.
//!
//! # Architecture: Store → Artifacts
//!
//! ```text
//! draft (loose JSON)            data/                      dist/
//!   │ normalize + validate        ├── posts.json             ├── sitemap.xml
//!   ▼                             ├── reviews.json           ├── video-sitemap.xml
//! JsonStore ───────────────────►  └── videos.json   ──────►  └── jsonld/…
//!   first-write-wins upsert                          seo
//! ```
//!
//! Writes flow draft → normalizer → validator → store; reads flow
//! store → sitemap/JSON-LD renderers. The three stores are independent
//! of each other; the renderers read all three.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | Generic JSON collection store: first-write-wins upsert, slug lookup, delete, self-healing reads |
//! | [`types`] | `Post` / `Review` / `Video` records, their loose draft shapes, and the `Record` trait the store is generic over |
//! | [`normalize`] | Canonical field shapes: strings, lists, slugs, FAQs, chapters, YouTube IDs, durations |
//! | [`validate`] | Per-kind rule lists producing human-readable violation messages |
//! | [`token`] | HMAC-SHA-256 compact bearer tokens for the admin session |
//! | [`sitemap`] | sitemap.xml and video-sitemap.xml rendering |
//! | [`jsonld`] | schema.org graphs: BlogPosting, Review, VideoObject, FAQPage, Clip |
//! | [`config`] | `flatsite.toml` loading, env overrides, resolved collection paths |
//! | [`output`] | CLI output formatting: pure `format_*` functions |
//!
//! # Design Decisions
//!
//! ## First Write Wins
//!
//! A slug can be created exactly once. Writing to an existing slug is a
//! successful no-op returning the stored record, and there is no update
//! operation at all; correcting a record means delete and recreate.
//! Admin content here is append-mostly, and the failure mode this buys
//! off is the worst one a small agency site has: an accidental
//! double-submit or a stale browser tab silently overwriting a
//! published article. `createdAt`/`updatedAt` are therefore stamped
//! once and never change.
//!
//! ## Whole-File JSON Collections
//!
//! Every operation reads and rewrites the entire collection file. At
//! tens-to-hundreds of records this is microseconds of serde work, and
//! it keeps the files human-editable: an editor can fix a typo in
//! `posts.json` directly and the next read re-normalizes the record.
//! Writes go through a `.tmp` sibling and an atomic rename so a crash
//! never leaves a truncated collection. There is deliberately no
//! locking: the single-admin workflow has no concurrent writers worth
//! coordinating.
//!
//! ## Self-Healing Reads
//!
//! A missing, corrupt, or non-array collection file is silently reset
//! to `[]`. The site must keep rendering (with empty sections) even if
//! a deploy ships a mangled data file; refusing to start would turn a
//! content problem into an outage.
//!
//! ## Validation as Data, Not Errors
//!
//! Validators return an ordered `Vec<String>` of every violation rather
//! than failing on the first. The admin fixing a draft sees the whole
//! list at once. Only the write path treats a non-empty list as fatal.
//!
//! ## Thai-Aware Slugs
//!
//! Slug normalization keeps the Thai Unicode block alongside ASCII
//! alphanumerics, so URLs like `/blog/รับทำ-seo` work natively instead
//! of degrading to transliteration. Forward slashes are kept mid-slug
//! for hierarchical paths.

pub mod config;
pub mod jsonld;
pub mod normalize;
pub mod output;
pub mod sitemap;
pub mod store;
pub mod token;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
