//! Site configuration: `flatsite.toml` plus environment overrides.
//!
//! Configuration is resolved exactly once, at startup, and the resolved
//! paths are threaded into each store constructor. No store function
//! reads the environment: the env lookups below are the only ones in
//! the crate, which keeps the stores testable with an injected temp
//! directory and makes every deployment knob visible in one place.
//!
//! ## Config file
//!
//! `flatsite.toml` in the working directory (or `--config <path>`). All
//! options are optional; defaults shown below. Unknown keys are rejected
//! to catch typos early.
//!
//! ```toml
//! base_url = "https://www.example.co.th"  # Absolute site origin for SEO artifacts
//! site_name = "My Agency"                 # Organization name in structured data
//! data_dir = "data"                       # Directory holding the collection files
//!
//! [routes]                                # URL prefixes per collection
//! posts = "blog"
//! reviews = "review"
//! videos = "videos"
//!
//! [sitemap]
//! static_paths = ["/"]                    # Extra non-collection URLs to list
//! ```
//!
//! ## Environment overrides
//!
//! Collection file locations can be overridden per kind without touching
//! the config file, useful when the data volume is mounted somewhere
//! else in production:
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `FLATSITE_<KIND>_FILE` | Full path of one collection file |
//! | `FLATSITE_<KIND>_DIR` | Directory for one collection (file keeps its `<kind>.json` name) |
//! | `FLATSITE_DATA_DIR` | Directory for every collection without a more specific override |
//!
//! `<KIND>` is `POSTS`, `REVIEWS`, or `VIDEOS`. The most specific
//! variable wins. [`StorageInfo`](crate::store::StorageInfo) reports
//! which layer chose each path.
//!
//! The token secret is environment-only (`FLATSITE_TOKEN_SECRET`) and
//! never appears in the config file.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the HMAC secret for admin tokens.
pub const TOKEN_SECRET_VAR: &str = "FLATSITE_TOKEN_SECRET";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `flatsite.toml`.
///
/// All fields have defaults. User config files need only specify the
/// values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute site origin used to build every URL in the SEO
    /// artifacts. No trailing slash.
    pub base_url: String,
    /// Organization name used in structured data.
    pub site_name: String,
    /// Directory holding the collection files, relative to the working
    /// directory unless absolute.
    pub data_dir: String,
    /// URL path prefixes per collection.
    pub routes: RoutesConfig,
    /// Sitemap-specific settings.
    pub sitemap: SitemapConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.example.co.th".to_string(),
            site_name: "My Agency".to_string(),
            data_dir: "data".to_string(),
            routes: RoutesConfig::default(),
            sitemap: SitemapConfig::default(),
        }
    }
}

/// URL path prefixes per collection, without slashes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutesConfig {
    pub posts: String,
    pub reviews: String,
    pub videos: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            posts: "blog".to_string(),
            reviews: "review".to_string(),
            videos: "videos".to_string(),
        }
    }
}

/// Sitemap settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    /// Non-collection paths to include, each starting with `/`.
    pub static_paths: Vec<String>,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            static_paths: vec!["/".to_string()],
        }
    }
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "base_url must start with http:// or https://".into(),
            ));
        }
        if self.base_url.ends_with('/') {
            return Err(ConfigError::Validation(
                "base_url must not end with a slash".into(),
            ));
        }
        for prefix in [&self.routes.posts, &self.routes.reviews, &self.routes.videos] {
            if prefix.is_empty() || prefix.contains('/') {
                return Err(ConfigError::Validation(
                    "route prefixes must be non-empty and contain no slashes".into(),
                ));
            }
        }
        for path in &self.sitemap.static_paths {
            if !path.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "sitemap.static_paths entries must start with '/': {path}"
                )));
            }
        }
        Ok(())
    }

    /// The URL of one record's page, e.g. `https://…/blog/my-post`.
    pub fn record_url(&self, route_prefix: &str, slug: &str) -> String {
        format!("{}/{}/{}", self.base_url, route_prefix, slug)
    }

    /// Resolve the collection file for `kind`, applying the environment
    /// override chain. Called once at startup; the result is handed to
    /// the store constructor.
    pub fn collection_paths(&self, kind: &str) -> CollectionPaths {
        let upper = kind.to_uppercase();

        if let Some(file) = non_empty_env(&format!("FLATSITE_{upper}_FILE")) {
            return CollectionPaths {
                file: PathBuf::from(file),
                source: PathSource::EnvFile,
            };
        }
        if let Some(dir) = non_empty_env(&format!("FLATSITE_{upper}_DIR")) {
            return CollectionPaths {
                file: Path::new(&dir).join(format!("{kind}.json")),
                source: PathSource::EnvDir,
            };
        }
        if let Some(dir) = non_empty_env("FLATSITE_DATA_DIR") {
            return CollectionPaths {
                file: Path::new(&dir).join(format!("{kind}.json")),
                source: PathSource::EnvDataDir,
            };
        }
        CollectionPaths {
            file: Path::new(&self.data_dir).join(format!("{kind}.json")),
            source: PathSource::Config,
        }
    }
}

/// Resolved location of one collection file, plus which configuration
/// layer chose it.
#[derive(Debug, Clone)]
pub struct CollectionPaths {
    pub file: PathBuf,
    pub source: PathSource,
}

/// Which layer of the override chain picked a collection path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    /// `FLATSITE_<KIND>_FILE`
    EnvFile,
    /// `FLATSITE_<KIND>_DIR`
    EnvDir,
    /// `FLATSITE_DATA_DIR`
    EnvDataDir,
    /// `data_dir` from the config file (or its default)
    Config,
}

impl PathSource {
    pub fn describe(&self) -> &'static str {
        match self {
            PathSource::EnvFile => "env (file override)",
            PathSource::EnvDir => "env (dir override)",
            PathSource::EnvDataDir => "env (data dir)",
            PathSource::Config => "config",
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Load configuration from a TOML file, falling back to defaults when
/// the file doesn't exist.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = if path.exists() {
        toml::from_str(&fs::read_to_string(path)?)?
    } else {
        SiteConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// The admin token secret, from the environment only. `None` when unset
/// or blank; callers must refuse to sign or verify without it.
pub fn token_secret() -> Option<String> {
    non_empty_env(TOKEN_SECRET_VAR)
}

/// A fully documented stock config, printed by `flatsite gen-config`.
pub fn stock_config_toml() -> String {
    let defaults = SiteConfig::default();
    format!(
        r#"# flatsite configuration. All options are optional - defaults shown.

# Absolute site origin used for every URL in sitemap.xml,
# video-sitemap.xml, and the JSON-LD documents. No trailing slash.
base_url = "{base_url}"

# Organization name used in structured data (Review itemReviewed,
# BlogPosting publisher).
site_name = "{site_name}"

# Directory holding the collection files (posts.json, reviews.json,
# videos.json). Override per collection with FLATSITE_<KIND>_FILE or
# FLATSITE_<KIND>_DIR, or for all collections with FLATSITE_DATA_DIR.
data_dir = "{data_dir}"

# URL path prefixes per collection: a post with slug "my-post" lives at
# <base_url>/<routes.posts>/my-post.
[routes]
posts = "{posts}"
reviews = "{reviews}"
videos = "{videos}"

[sitemap]
# Non-collection paths to include in sitemap.xml.
static_paths = ["/"]
"#,
        base_url = defaults.base_url,
        site_name = defaults.site_name,
        data_dir = defaults.data_dir,
        posts = defaults.routes.posts,
        reviews = defaults.routes.reviews,
        videos = defaults.routes.videos,
    )
}
