//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub url: String,
    pub root: String,

    // Content locations, relative to the base directory
    pub content_dir: String,
    pub ledger_file: String,
    pub posts_dir: String,

    // Site-rooted prefix that relative `./images/` references resolve under
    pub asset_root: String,
    pub default_image: String,

    // Reading speed used for read time estimates
    pub words_per_minute: u32,

    // Routes
    pub template_route: String,
    pub static_routes: Vec<String>,

    // Template browser
    #[serde(default)]
    pub catalog: CatalogConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Templates".to_string(),
            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "public".to_string(),
            ledger_file: "blog/metadata.md".to_string(),
            posts_dir: "blog/posts".to_string(),

            asset_root: "/blog/posts".to_string(),
            default_image: "/images/default-blog.jpg".to_string(),

            words_per_minute: 200,

            template_route: "template".to_string(),
            static_routes: vec![
                "/".to_string(),
                "/about".to_string(),
                "/contact".to_string(),
                "/template".to_string(),
            ],

            catalog: CatalogConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Template browser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub page_size: usize,
    pub load_more_delay_ms: u64,
    pub image_width: u32,
    pub image_height: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: crate::catalog::TEMPLATES_PER_PAGE,
            load_more_delay_ms: 500,
            image_width: 800,
            image_height: 600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "public");
        assert_eq!(config.ledger_file, "blog/metadata.md");
        assert_eq!(config.asset_root, "/blog/posts");
        assert_eq!(config.words_per_minute, 200);
        assert_eq!(config.catalog.page_size, 10);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Automation Templates
url: https://templates.example.org
words_per_minute: 250
catalog:
  page_size: 12
analytics_id: abc
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Automation Templates");
        assert_eq!(config.url, "https://templates.example.org");
        assert_eq!(config.words_per_minute, 250);
        assert_eq!(config.catalog.page_size, 12);
        // Unspecified nested keys keep their defaults
        assert_eq!(config.catalog.load_more_delay_ms, 500);
        assert_eq!(config.posts_dir, "blog/posts");
        assert!(config.extra.contains_key("analytics_id"));
    }
}
