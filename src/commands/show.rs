//! Render a single post

use anyhow::{Context, Result};

use crate::content::ContentError;
use crate::helpers::date::display_date;
use crate::Site;

/// Print one post with its rendered HTML, or as JSON
pub fn run(site: &Site, slug: &str, json: bool) -> Result<()> {
    let post = match site.get_post(slug) {
        Ok(post) => post,
        Err(ContentError::NotFound(_)) => anyhow::bail!("Post not found: {}", slug),
        Err(e) => return Err(e).with_context(|| format!("Failed to load post {}", slug)),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&post)?);
        return Ok(());
    }

    println!("{}", post.title);
    println!(
        "{} - {} min read",
        display_date(post.date.as_ref()),
        post.read_time
    );
    if !post.tags.is_empty() {
        println!("Tags: {}", post.tags.join(", "));
    }
    println!("Image: {}", post.image_path);
    println!();
    println!("{}", post.content.unwrap_or_default());

    Ok(())
}
