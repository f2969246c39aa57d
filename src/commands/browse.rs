//! Browse the template catalog from the command line

use anyhow::Result;
use std::time::Duration;

use crate::catalog::{Browser, SortKey};
use crate::helpers::html::truncate;
use crate::Site;

/// Selections for one browse run
#[derive(Debug, Clone, Default)]
pub struct BrowseOptions {
    pub query: Option<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub sort: SortKey,
    /// Number of "load more" rounds after the first page
    pub more: usize,
}

/// Build a browser over the listing and apply the options to it
pub async fn browse(site: &Site, options: &BrowseOptions) -> Browser {
    let catalog = &site.config.catalog;
    let mut browser = Browser::new(
        site.list_posts(),
        catalog.page_size,
        Duration::from_millis(catalog.load_more_delay_ms),
    );

    if let Some(query) = &options.query {
        browser.set_search_query(query);
    }
    for category in &options.categories {
        browser.toggle_category(category);
    }
    for tag in &options.tags {
        browser.toggle_tag(tag);
    }
    browser.set_sort(options.sort);

    for _ in 0..options.more {
        if !browser.load_more() {
            break;
        }
        browser.settle().await;
    }

    browser
}

/// Print the visible templates and the available filters
pub async fn run(site: &Site, options: &BrowseOptions) -> Result<()> {
    let browser = browse(site, options).await;
    let view = browser.view();
    let cards = view.cards(&site.config.catalog, &site.config.default_image);

    println!(
        "Showing {} of {} templates (sorted by {})",
        cards.len(),
        view.total,
        options.sort
    );
    for card in &cards {
        println!(
            "  {} [{}] {} - {}",
            card.title,
            card.category.as_deref().unwrap_or("-"),
            card.date,
            card.slug
        );
        if !card.description.is_empty() {
            println!("      {}", truncate(&card.description, 72, None));
        }
    }
    if view.has_more {
        println!("  ... more available (use --more)");
    }

    let facets = browser.facets();
    println!();
    println!("Categories: {}", facets.categories.join(", "));
    println!("Tags: {}", facets.tags.join(", "));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;

    #[tokio::test]
    async fn test_browse_applies_options() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SiteConfig::default();
        config.catalog.load_more_delay_ms = 1;
        let site = Site::with_config(dir.path().to_path_buf(), config);
        fs::create_dir_all(&site.posts_dir).unwrap();
        for i in 0..25 {
            fs::write(
                site.posts_dir.join(format!("sales-{:02}.md", i)),
                format!("---\ntitle: Sales {:02}\ntags: [Sales, crm]\n---\n", i),
            )
            .unwrap();
        }
        fs::write(
            site.posts_dir.join("newsletter.md"),
            "---\ntitle: Newsletter\ntags: [Marketing, email]\n---\n",
        )
        .unwrap();

        let options = BrowseOptions {
            categories: vec!["Sales".to_string()],
            sort: SortKey::Alphabetical,
            more: 1,
            ..Default::default()
        };
        let browser = browse(&site, &options).await;
        let view = browser.view();
        assert_eq!(view.total, 25);
        assert_eq!(view.visible.len(), 20);
        assert!(view.has_more);
        assert_eq!(view.visible[0].title, "Sales 00");
    }
}
