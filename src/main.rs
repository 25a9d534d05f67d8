use clap::{Parser, Subcommand};
use flatsite::config::{self, SiteConfig};
use flatsite::output::{self, ListRow};
use flatsite::store::{JsonStore, StoreError};
use flatsite::types::{Post, Record, Review, Video};
use flatsite::{jsonld, sitemap, token};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "flatsite")]
#[command(about = "Flat-file content store and SEO artifact generator")]
#[command(long_about = "\
Flat-file content store and SEO artifact generator

Content lives in plain JSON files, one per collection, pretty-printed so
they diff cleanly in version control:

  data/
  ├── posts.json          # Blog posts
  ├── reviews.json        # Customer reviews (google / facebook)
  └── videos.json         # YouTube videos with transcripts and FAQs

Writes are first-write-wins: a slug can be created once, and later
submissions to the same slug are accepted as no-ops that keep the
original record. There is no update command - delete and re-add to
replace a record.

Records are validated before writing (videos carry the strictest rules:
real date, extractable YouTube id, ISO-8601 duration, transcript, at
least 3 FAQs) and all problems are reported at once.

The seo command reads the collections and produces the search-engine
artifacts: sitemap.xml, video-sitemap.xml, and one schema.org JSON-LD
document per record.

Run 'flatsite gen-config' for a documented flatsite.toml.")]
#[command(version)]
struct Cli {
    /// Site config file
    #[arg(long, default_value = "flatsite.toml", global = true)]
    config: PathBuf,

    /// Output directory for generated SEO artifacts
    #[arg(long, default_value = "dist", global = true)]
    out: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List a collection's records
    List { kind: Kind },
    /// Print one record as JSON (slug may be percent-encoded)
    Show { kind: Kind, slug: String },
    /// Validate a JSON draft file and insert it
    Add {
        kind: Kind,
        /// Draft file: a JSON object of record fields
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete a record by its exact stored slug
    Delete { kind: Kind, slug: String },
    /// Validate every stored record and report all violations
    Check,
    /// Generate sitemap.xml, video-sitemap.xml, and JSON-LD documents
    Seo,
    /// Issue or verify admin bearer tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Show where each collection is stored and why
    StorageInfo,
    /// Print a stock flatsite.toml with all options documented
    GenConfig,
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum Kind {
    Posts,
    Reviews,
    Videos,
}

#[derive(Subcommand)]
enum TokenAction {
    /// Sign a token binding a username to an expiry
    Sign {
        #[arg(long)]
        user: String,
        /// Token lifetime in seconds
        #[arg(long, default_value_t = 86_400)]
        ttl_secs: i64,
    },
    /// Verify a token and print its claims
    Verify { token: String },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = config::load_config(&cli.config)?;

    match cli.command {
        Command::List { kind } => match kind {
            Kind::Posts => list(&JsonStore::<Post>::open(&config), post_row),
            Kind::Reviews => list(&JsonStore::<Review>::open(&config), review_row),
            Kind::Videos => list(&JsonStore::<Video>::open(&config), video_row),
        },
        Command::Show { kind, slug } => match kind {
            Kind::Posts => show(&JsonStore::<Post>::open(&config), &slug),
            Kind::Reviews => show(&JsonStore::<Review>::open(&config), &slug),
            Kind::Videos => show(&JsonStore::<Video>::open(&config), &slug),
        },
        Command::Add { kind, file } => match kind {
            Kind::Posts => add(&JsonStore::<Post>::open(&config), &file),
            Kind::Reviews => add(&JsonStore::<Review>::open(&config), &file),
            Kind::Videos => add(&JsonStore::<Video>::open(&config), &file),
        },
        Command::Delete { kind, slug } => match kind {
            Kind::Posts => delete(&JsonStore::<Post>::open(&config), &slug),
            Kind::Reviews => delete(&JsonStore::<Review>::open(&config), &slug),
            Kind::Videos => delete(&JsonStore::<Video>::open(&config), &slug),
        },
        Command::Check => check(&config),
        Command::Seo => seo(&config, &cli.out),
        Command::Token { action } => run_token(action),
        Command::StorageInfo => storage_info(&config),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ============================================================================
// Collection commands (generic over the record kind)
// ============================================================================

fn list<R: Record>(
    store: &JsonStore<R>,
    row: fn(&R) -> ListRow,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let records = store.get_all()?;
    let rows: Vec<ListRow> = records.iter().map(row).collect();
    output::print_lines(&output::format_list(R::KIND, &rows));
    Ok(ExitCode::SUCCESS)
}

fn show<R: Record>(
    store: &JsonStore<R>,
    slug: &str,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match store.get_by_slug(slug)? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("No {} record with slug '{slug}'", R::KIND);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn add<R: Record>(
    store: &JsonStore<R>,
    draft_path: &Path,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let draft: R::Draft = serde_json::from_str(&fs::read_to_string(draft_path)?)?;

    // Reject wholesale on any rule violation; the store never sees an
    // invalid record
    let candidate = R::from_draft(&draft);
    let violations = candidate.violations();
    if !violations.is_empty() {
        output::print_lines(&output::format_violations(
            R::KIND,
            candidate.slug(),
            &violations,
        ));
        return Ok(ExitCode::FAILURE);
    }

    let outcome = store.add_first_write(&draft)?;
    output::print_lines(&output::format_write_outcome(
        R::KIND,
        outcome.record().slug(),
        outcome.existed(),
    ));
    Ok(ExitCode::SUCCESS)
}

fn delete<R: Record>(
    store: &JsonStore<R>,
    slug: &str,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match store.delete_by_slug(slug) {
        Ok(removed) => {
            println!("{}: deleted '{}'", R::KIND, removed.slug());
            Ok(ExitCode::SUCCESS)
        }
        Err(StoreError::NotFound { kind, slug }) => {
            eprintln!("No {kind} record with slug '{slug}'");
            Ok(ExitCode::FAILURE)
        }
        Err(other) => Err(other.into()),
    }
}

fn check(config: &SiteConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut problems = 0;
    problems += check_kind(&JsonStore::<Post>::open(config))?;
    problems += check_kind(&JsonStore::<Review>::open(config))?;
    problems += check_kind(&JsonStore::<Video>::open(config))?;

    if problems == 0 {
        println!("All records valid");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{problems} invalid record(s)");
        Ok(ExitCode::FAILURE)
    }
}

fn check_kind<R: Record>(store: &JsonStore<R>) -> Result<usize, Box<dyn std::error::Error>> {
    let mut problems = 0;
    for record in store.audit_all()? {
        let violations = record.violations();
        if !violations.is_empty() {
            output::print_lines(&output::format_violations(
                R::KIND,
                record.slug(),
                &violations,
            ));
            problems += 1;
        }
    }
    Ok(problems)
}

// ============================================================================
// SEO artifacts
// ============================================================================

fn seo(config: &SiteConfig, out_dir: &Path) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let posts = JsonStore::<Post>::open(config).get_all()?;
    let reviews = JsonStore::<Review>::open(config).get_all()?;
    let videos = JsonStore::<Video>::open(config).get_all()?;

    fs::create_dir_all(out_dir)?;
    let mut artifacts = Vec::new();

    let sitemap_path = out_dir.join("sitemap.xml");
    fs::write(
        &sitemap_path,
        sitemap::render_sitemap(&posts, &reviews, &videos, config),
    )?;
    artifacts.push(sitemap_path.display().to_string());

    let video_sitemap_path = out_dir.join("video-sitemap.xml");
    fs::write(
        &video_sitemap_path,
        sitemap::render_video_sitemap(&videos, config),
    )?;
    artifacts.push(video_sitemap_path.display().to_string());

    for post in &posts {
        write_jsonld(
            out_dir,
            Post::KIND,
            &post.slug,
            &jsonld::blog_posting(post, config),
        )?;
    }
    for review in &reviews {
        write_jsonld(
            out_dir,
            Review::KIND,
            &review.slug,
            &jsonld::review(review, config),
        )?;
    }
    for video in &videos {
        write_jsonld(
            out_dir,
            Video::KIND,
            &video.slug,
            &jsonld::video_object(video, config),
        )?;
    }
    artifacts.push(format!("{}/jsonld/", out_dir.display()));

    output::print_lines(&output::format_seo_summary(
        posts.len(),
        reviews.len(),
        videos.len(),
        &artifacts,
    ));
    Ok(ExitCode::SUCCESS)
}

/// Write one record's JSON-LD document. Hierarchical slugs (containing
/// `/`) become nested directories.
fn write_jsonld(
    out_dir: &Path,
    kind: &str,
    slug: &str,
    document: &serde_json::Value,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = out_dir
        .join("jsonld")
        .join(kind)
        .join(format!("{slug}.json"));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, serde_json::to_string_pretty(document)?)?;
    Ok(())
}

// ============================================================================
// Tokens
// ============================================================================

fn run_token(action: TokenAction) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let Some(secret) = config::token_secret() else {
        eprintln!(
            "Set {} to sign or verify admin tokens",
            config::TOKEN_SECRET_VAR
        );
        return Ok(ExitCode::FAILURE);
    };

    match action {
        TokenAction::Sign { user, ttl_secs } => {
            let now = chrono::Utc::now().timestamp();
            let claims = json!({"u": user, "iat": now, "exp": now + ttl_secs});
            println!("{}", token::sign(&claims, &secret));
            Ok(ExitCode::SUCCESS)
        }
        TokenAction::Verify { token: input } => match token::verify(&input, &secret) {
            Some(claims) => {
                println!("{}", serde_json::to_string_pretty(&claims)?);
                Ok(ExitCode::SUCCESS)
            }
            None => {
                eprintln!("Token is invalid or expired");
                Ok(ExitCode::FAILURE)
            }
        },
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

fn storage_info(config: &SiteConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    output::print_lines(&output::format_storage_info(
        &JsonStore::<Post>::open(config).storage_info(),
    ));
    output::print_lines(&output::format_storage_info(
        &JsonStore::<Review>::open(config).storage_info(),
    ));
    output::print_lines(&output::format_storage_info(
        &JsonStore::<Video>::open(config).storage_info(),
    ));
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Listing rows
// ============================================================================

fn post_row(post: &Post) -> ListRow {
    ListRow {
        title: post.title.clone(),
        slug: post.slug.clone(),
        date: post.date.clone(),
        note: None,
    }
}

fn review_row(review: &Review) -> ListRow {
    ListRow {
        title: review.title.clone(),
        slug: review.slug.clone(),
        date: review.date.clone(),
        note: Some(review.category.clone()).filter(|c| !c.is_empty()),
    }
}

fn video_row(video: &Video) -> ListRow {
    ListRow {
        title: video.title.clone(),
        slug: video.slug.clone(),
        date: video.date.clone(),
        note: None,
    }
}
