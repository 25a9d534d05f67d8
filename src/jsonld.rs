//! schema.org JSON-LD graphs built from store records.
//!
//! Each builder is a pure function from one record to a serde_json
//! value holding an `@graph`. The page layer embeds these in a script
//! tag; the `seo` command also writes them to disk next to the sitemaps
//! so the static export can pick them up.
//!
//! Shapes follow Google's structured-data guidelines: `BlogPosting` for
//! posts, `Review` (with the agency as `itemReviewed`) for reviews, and
//! `VideoObject` for videos. Posts and videos with FAQs get a sibling
//! `FAQPage` node in the same graph; video chapters become `Clip`
//! entries with start offsets parsed from their timecodes.

use serde_json::{json, Value};

use crate::config::SiteConfig;
use crate::normalize;
use crate::types::{Faq, Post, Review, Video};

const SCHEMA_CONTEXT: &str = "https://schema.org";

/// `BlogPosting` graph for one post.
pub fn blog_posting(post: &Post, config: &SiteConfig) -> Value {
    let url = config.record_url(&config.routes.posts, &post.slug);

    let mut graph = vec![json!({
        "@type": "BlogPosting",
        "@id": url,
        "mainEntityOfPage": url,
        "headline": post.title,
        "description": post.excerpt,
        "image": post.thumbnail,
        "datePublished": post.date,
        "dateModified": post.date,
        "author": {"@type": "Person", "name": post.author},
        "publisher": {"@type": "Organization", "name": config.site_name},
        "keywords": post.keywords.join(", "),
    })];
    if let Some(faq) = faq_page(&post.faqs, &url) {
        graph.push(faq);
    }

    json!({"@context": SCHEMA_CONTEXT, "@graph": graph})
}

/// `Review` graph for one review, with the agency as the reviewed
/// organization.
pub fn review(record: &Review, config: &SiteConfig) -> Value {
    let url = config.record_url(&config.routes.reviews, &record.slug);

    json!({
        "@context": SCHEMA_CONTEXT,
        "@graph": [{
            "@type": "Review",
            "@id": url,
            "name": record.title,
            "reviewBody": record.excerpt,
            "datePublished": record.date,
            "author": {"@type": "Person", "name": record.author},
            "itemReviewed": {"@type": "Organization", "name": config.site_name},
            "publisher": {"@type": "Organization", "name": record.category},
        }]
    })
}

/// `VideoObject` graph for one video, with `Clip` chapters and an
/// optional `FAQPage` sibling.
pub fn video_object(video: &Video, config: &SiteConfig) -> Value {
    let url = config.record_url(&config.routes.videos, &video.slug);
    let video_id = video.youtube_video_id();

    let description = if video.description.is_empty() {
        &video.excerpt
    } else {
        &video.description
    };
    let mut node = json!({
        "@type": "VideoObject",
        "@id": url,
        "name": video.title,
        "description": description,
        "thumbnailUrl": video.thumbnail,
    });
    let object = node.as_object_mut().expect("literal is an object");
    set_non_empty(object, "uploadDate", &video.upload_date);
    set_non_empty(object, "duration", &video.duration);
    set_non_empty(object, "contentUrl", &video.content_url);
    if !video_id.is_empty() {
        object.insert(
            "embedUrl".to_string(),
            json!(format!("https://www.youtube.com/embed/{video_id}")),
        );
    }

    let clips: Vec<Value> = video
        .chapters
        .iter()
        .filter_map(|chapter| {
            let start = normalize::timecode_seconds(&chapter.t)?;
            Some(json!({
                "@type": "Clip",
                "name": chapter.label,
                "startOffset": start,
                "url": format!("{url}#t={start}"),
            }))
        })
        .collect();
    if !clips.is_empty() {
        object.insert("hasPart".to_string(), json!(clips));
    }

    let mut graph = vec![node];
    if let Some(faq) = faq_page(&video.faqs, &url) {
        graph.push(faq);
    }

    json!({"@context": SCHEMA_CONTEXT, "@graph": graph})
}

/// `FAQPage` node, or `None` when there are no FAQs.
fn faq_page(faqs: &[Faq], url: &str) -> Option<Value> {
    if faqs.is_empty() {
        return None;
    }
    let entries: Vec<Value> = faqs
        .iter()
        .map(|faq| {
            json!({
                "@type": "Question",
                "name": faq.q,
                "acceptedAnswer": {"@type": "Answer", "text": faq.a},
            })
        })
        .collect();
    Some(json!({
        "@type": "FAQPage",
        "@id": format!("{url}#faq"),
        "mainEntity": entries,
    }))
}

fn set_non_empty(object: &mut serde_json::Map<String, Value>, key: &str, value: &str) {
    if !value.is_empty() {
        object.insert(key.to_string(), json!(value));
    }
}
