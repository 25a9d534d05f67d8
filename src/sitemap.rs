//! Sitemap and video-sitemap XML rendering.
//!
//! Both renderers are pure functions from listed records to an XML
//! string; the CLI writes the results to disk. Feeding them from
//! `get_all()` means unpublished and hidden videos never leak into the
//! artifacts search engines crawl.
//!
//! The video sitemap follows Google's `sitemap-video/1.1` extension:
//! every entry carries the thumbnail, title, description, a player URL
//! built from the extracted YouTube ID, and (when the record has them)
//! a direct content URL, the duration in seconds, and the publication
//! date.
//!
//! XML is assembled by hand with a five-character escaper. The
//! namespaced elements (`video:video` etc.) rule out an HTML macro
//! system, and the documents are flat enough that a writer dependency
//! would be pure overhead.

use crate::config::SiteConfig;
use crate::normalize;
use crate::types::{Post, Review, Video};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const VIDEO_NS: &str = "http://www.google.com/schemas/sitemap-video/1.1";

/// Render `sitemap.xml`: the configured static paths plus one URL per
/// listed record across all three collections.
pub fn render_sitemap(
    posts: &[Post],
    reviews: &[Review],
    videos: &[Video],
    config: &SiteConfig,
) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
    xml.push('\n');

    for path in &config.sitemap.static_paths {
        push_url(&mut xml, &format!("{}{}", config.base_url, path), None);
    }
    for post in posts {
        push_url(
            &mut xml,
            &config.record_url(&config.routes.posts, &post.slug),
            lastmod(&post.date),
        );
    }
    for review in reviews {
        push_url(
            &mut xml,
            &config.record_url(&config.routes.reviews, &review.slug),
            lastmod(&review.date),
        );
    }
    for video in videos {
        push_url(
            &mut xml,
            &config.record_url(&config.routes.videos, &video.slug),
            lastmod(&video.date),
        );
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Render `video-sitemap.xml` with one `video:video` entry per listed
/// video.
pub fn render_video_sitemap(videos: &[Video], config: &SiteConfig) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<urlset xmlns="{SITEMAP_NS}" xmlns:video="{VIDEO_NS}">"#
    ));
    xml.push('\n');

    for video in videos {
        let loc = config.record_url(&config.routes.videos, &video.slug);
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", xml_escape(&loc)));
        xml.push_str("    <video:video>\n");
        push_video_tag(&mut xml, "thumbnail_loc", &video.thumbnail);
        push_video_tag(&mut xml, "title", &video.title);
        let description = if video.description.is_empty() {
            &video.excerpt
        } else {
            &video.description
        };
        push_video_tag(&mut xml, "description", description);

        let video_id = video.youtube_video_id();
        if !video_id.is_empty() {
            push_video_tag(
                &mut xml,
                "player_loc",
                &format!("https://www.youtube.com/embed/{video_id}"),
            );
        }
        push_video_tag(&mut xml, "content_loc", &video.content_url);
        if let Some(seconds) = normalize::duration_seconds(&video.duration) {
            push_video_tag(&mut xml, "duration", &seconds.to_string());
        }
        push_video_tag(&mut xml, "publication_date", &video.upload_date);
        xml.push_str("    </video:video>\n");
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

fn push_url(xml: &mut String, loc: &str, lastmod: Option<&str>) {
    xml.push_str("  <url>\n");
    xml.push_str(&format!("    <loc>{}</loc>\n", xml_escape(loc)));
    if let Some(date) = lastmod {
        xml.push_str(&format!("    <lastmod>{date}</lastmod>\n"));
    }
    xml.push_str("  </url>\n");
}

/// Skip empty values so optional fields simply don't render.
fn push_video_tag(xml: &mut String, tag: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    xml.push_str(&format!(
        "      <video:{tag}>{}</video:{tag}>\n",
        xml_escape(value)
    ));
}

fn lastmod(date: &str) -> Option<&str> {
    (!date.is_empty()).then_some(date)
}

fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
