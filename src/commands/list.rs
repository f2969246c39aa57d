//! List site content

use anyhow::Result;

use crate::catalog;
use crate::helpers::date::display_date;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let posts = site.list_posts();
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}] ({} min read)",
                    display_date(post.date.as_ref()),
                    post.title,
                    post.slug,
                    post.read_time
                );
            }
        }
        "slug" | "slugs" => {
            for slug in site.list_slugs() {
                println!("{}", slug);
            }
        }
        "tag" | "tags" => {
            let posts = site.list_posts();
            let facets = catalog::facets(&posts);
            println!("Tags ({}):", facets.tags.len());
            for tag in facets.tags {
                let count = posts
                    .iter()
                    .filter(|p| p.secondary_tags().contains(&tag))
                    .count();
                println!("  {} ({})", tag, count);
            }
        }
        "category" | "categories" => {
            let posts = site.list_posts();
            let facets = catalog::facets(&posts);
            let categories: Vec<_> = facets
                .categories
                .into_iter()
                .filter(|c| c != catalog::ALL_CATEGORIES)
                .collect();
            println!("Categories ({}):", categories.len());
            for category in categories {
                let count = posts
                    .iter()
                    .filter(|p| p.category() == Some(category.as_str()))
                    .count();
                println!("  {} ({})", category, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, slug, tag, category",
                content_type
            );
        }
    }

    Ok(())
}
