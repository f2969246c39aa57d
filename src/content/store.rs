//! Content store - turns the ledger or the posts directory into posts

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::ledger::LedgerEntry;
use super::post::{read_time, resolve_image};
use super::source::{self, ContentSource};
use super::{ContentError, FrontMatter, MarkdownRenderer, Post};
use crate::helpers::date::parse_date;
use crate::Site;

/// Body used when a ledger entry's markdown file is missing and it has no
/// description either
const PLACEHOLDER_BODY: &str = "No content available for this blog post yet.";

/// Loads posts from disk. Every call re-reads the files it needs.
#[derive(Debug, Clone)]
pub struct ContentStore {
    content_dir: PathBuf,
    ledger_path: PathBuf,
    posts_dir: PathBuf,
    asset_root: String,
    default_image: String,
    words_per_minute: u32,
}

impl ContentStore {
    /// Create a store for a site
    pub fn new(site: &Site) -> Self {
        Self {
            content_dir: site.content_dir.clone(),
            ledger_path: site.ledger_path.clone(),
            posts_dir: site.posts_dir.clone(),
            asset_root: site.config.asset_root.clone(),
            default_image: site.config.default_image.clone(),
            words_per_minute: site.config.words_per_minute,
        }
    }

    /// Resolve where records come from for this call
    pub fn source(&self) -> ContentSource {
        ContentSource::resolve(&self.ledger_path, &self.posts_dir)
    }

    /// All posts, newest first, without rendered content.
    ///
    /// Undated posts sort after dated ones and keep their relative order.
    pub fn list_posts(&self) -> Vec<Post> {
        let mut posts = match self.source() {
            ContentSource::Ledger(entries) => entries
                .iter()
                .map(|entry| {
                    let read_time = match self.ledger_body(entry) {
                        Ok(Some(body)) => read_time(&body, self.words_per_minute),
                        Ok(None) => 0,
                        Err(e) => {
                            tracing::warn!("Could not read markdown for {:?}: {}", entry.title(), e);
                            0
                        }
                    };
                    let mut post = self.ledger_post(entry);
                    post.read_time = read_time;
                    post
                })
                .collect(),
            ContentSource::DirectoryScan(files) => files
                .iter()
                .filter_map(|path| match self.file_post(path) {
                    Ok((post, _)) => Some(post),
                    Err(e) => {
                        tracing::warn!("Failed to load post {:?}: {}", path, e);
                        None
                    }
                })
                .collect(),
        };

        dedup_slugs(&mut posts);
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        posts
    }

    /// Slugs in source order, without reading any post bodies
    pub fn list_slugs(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let slugs: Vec<String> = match self.source() {
            ContentSource::Ledger(entries) => entries.iter().map(LedgerEntry::slug).collect(),
            ContentSource::DirectoryScan(files) => files
                .iter()
                .filter_map(|path| source::file_slug(path))
                .map(str::to_string)
                .collect(),
        };
        slugs
            .into_iter()
            .filter(|slug| seen.insert(slug.clone()))
            .collect()
    }

    /// A single post with its rendered HTML.
    ///
    /// The ledger is consulted first, then the posts directory.
    pub fn get_post(&self, slug: &str) -> Result<Post, ContentError> {
        let entries = source::read_ledger(&self.ledger_path);
        if let Some(entry) = entries.iter().find(|e| e.slug() == slug) {
            let body = match self.ledger_body(entry)? {
                Some(body) => body,
                None => {
                    tracing::debug!("Markdown missing for {:?}, using placeholder", slug);
                    placeholder_body(entry)
                }
            };
            let mut post = self.ledger_post(entry);
            self.attach_content(&mut post, &body);
            return Ok(post);
        }

        let path = source::scan_directory(&self.posts_dir)
            .into_iter()
            .find(|path| source::file_slug(path) == Some(slug))
            .ok_or_else(|| ContentError::NotFound(slug.to_string()))?;

        let (mut post, body) = self.file_post(&path)?;
        self.attach_content(&mut post, &body);
        Ok(post)
    }

    /// Like [`ContentStore::get_post`], but faults are logged and reported
    /// as `None` alongside not-found
    pub fn find_post(&self, slug: &str) -> Option<Post> {
        match self.get_post(slug) {
            Ok(post) => Some(post),
            Err(ContentError::NotFound(_)) => None,
            Err(e) => {
                tracing::error!("Error loading post {}: {}", slug, e);
                None
            }
        }
    }

    fn attach_content(&self, post: &mut Post, body: &str) {
        let renderer = MarkdownRenderer::new(&self.asset_root);
        post.read_time = read_time(body, self.words_per_minute);
        post.content = Some(renderer.render(body));
    }

    /// Listing record for a ledger entry
    fn ledger_post(&self, entry: &LedgerEntry) -> Post {
        let mut post = Post::new(entry.id(), entry.slug(), entry.title());
        post.description = entry.description.clone().unwrap_or_default();
        post.date = entry.date.as_deref().and_then(|d| {
            let parsed = parse_date(d);
            if parsed.is_none() {
                tracing::warn!("Unparsable date {:?} for {:?}", d, entry.title());
            }
            parsed
        });
        post.tags = entry.tags.clone();
        post.image_path = resolve_image(entry.image_path.as_deref(), &self.default_image);
        post
    }

    /// Markdown body behind a ledger entry, front-matter stripped.
    /// `Ok(None)` when the entry names no file or the file is missing.
    fn ledger_body(&self, entry: &LedgerEntry) -> Result<Option<String>, ContentError> {
        let Some(relative) = entry.markdown_path.as_deref().filter(|p| !p.is_empty()) else {
            return Ok(None);
        };
        let path = self.content_dir.join(relative.trim_start_matches('/'));
        match fs::read_to_string(&path) {
            Ok(raw) => {
                let (_, body) = FrontMatter::parse(&raw);
                Ok(Some(body.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ContentError::io(path, e)),
        }
    }

    /// Listing record and markdown body for a directory-scanned file
    fn file_post(&self, path: &Path) -> Result<(Post, String), ContentError> {
        let raw = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
        let (fm, body) = FrontMatter::parse(&raw);

        let slug = source::file_slug(path).unwrap_or_default().to_string();
        let title = fm.title.clone().unwrap_or_else(|| slug.clone());

        let mut post = Post::new(slug.clone(), slug, title);
        post.description = fm.description.clone().unwrap_or_default();
        post.date = fm.parse_date();
        post.read_time = read_time(body, self.words_per_minute);
        post.tags = fm.tags.clone();
        post.image_path = resolve_image(fm.image_path.as_deref(), &self.default_image);

        Ok((post, body.to_string()))
    }
}

fn placeholder_body(entry: &LedgerEntry) -> String {
    let description = entry
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(PLACEHOLDER_BODY);
    format!("# {}\n\n{}", entry.title(), description)
}

/// Keep the first record for each slug
fn dedup_slugs(posts: &mut Vec<Post>) {
    let mut seen = HashSet::new();
    posts.retain(|post| {
        let first = seen.insert(post.slug.clone());
        if !first {
            tracing::warn!("Duplicate slug {:?}, keeping the first record", post.slug);
        }
        first
    });
}
