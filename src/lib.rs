//! postdeck: markdown content store and template catalog
//!
//! Posts come from a metadata ledger (`blog/metadata.md`) or, when the
//! ledger is empty, from the frontmatter of markdown files in the posts
//! directory. The catalog filters, sorts and paginates the listing for the
//! template browser.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ContentError, ContentStore, Post};

/// A content site rooted at a directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory ledger and markdown paths are relative to
    pub content_dir: PathBuf,
    /// Metadata ledger file
    pub ledger_path: PathBuf,
    /// Directory scanned for markdown posts
    pub posts_dir: PathBuf,
}

impl Site {
    /// Open the site in a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let ledger_path = content_dir.join(&config.ledger_file);
        let posts_dir = content_dir.join(&config.posts_dir);

        Self {
            config,
            base_dir,
            content_dir,
            ledger_path,
            posts_dir,
        }
    }

    /// Content store over this site's files
    pub fn store(&self) -> ContentStore {
        ContentStore::new(self)
    }

    /// All posts, newest first, without content
    pub fn list_posts(&self) -> Vec<Post> {
        self.store().list_posts()
    }

    /// One post with rendered HTML
    pub fn get_post(&self, slug: &str) -> Result<Post, ContentError> {
        self.store().get_post(slug)
    }

    /// Every post slug
    pub fn list_slugs(&self) -> Vec<String> {
        self.store().list_slugs()
    }
}
