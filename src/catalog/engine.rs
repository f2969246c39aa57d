//! Catalog evaluation: facets, filtering, sorting and the visible window

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::state::{CatalogState, SortKey};
use super::ALL_CATEGORIES;
use crate::config::CatalogConfig;
use crate::content::Post;
use crate::helpers::date::display_date;
use crate::helpers::image::optimize_image_size;

/// Filter options offered to the visitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facets {
    /// "All Categories" followed by every distinct category, sorted
    pub categories: Vec<String>,
    /// Every distinct non-category tag, sorted
    pub tags: Vec<String>,
}

/// Derive the category and tag lists from the full listing
pub fn facets(posts: &[Post]) -> Facets {
    let categories: BTreeSet<&str> = posts
        .iter()
        .filter_map(Post::category)
        .filter(|c| *c != ALL_CATEGORIES)
        .collect();
    let tags: BTreeSet<&str> = posts
        .iter()
        .flat_map(|p| p.secondary_tags())
        .map(String::as_str)
        .filter(|t| !t.is_empty())
        .collect();

    Facets {
        categories: std::iter::once(ALL_CATEGORIES)
            .chain(categories)
            .map(str::to_string)
            .collect(),
        tags: tags.into_iter().map(str::to_string).collect(),
    }
}

/// Whether a post passes the search, category and tag filters
pub fn matches(post: &Post, state: &CatalogState) -> bool {
    matches_search(post, &state.search_query)
        && matches_category(post, state)
        && matches_tags(post, state)
}

fn matches_search(post: &Post, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    post.title.to_lowercase().contains(&query) || post.description.to_lowercase().contains(&query)
}

fn matches_category(post: &Post, state: &CatalogState) -> bool {
    let selected = &state.selected_categories;
    selected.is_empty()
        || selected.contains(ALL_CATEGORIES)
        || post.category().is_some_and(|c| selected.contains(c))
}

fn matches_tags(post: &Post, state: &CatalogState) -> bool {
    state.selected_tags.is_empty()
        || post
            .secondary_tags()
            .iter()
            .any(|tag| state.selected_tags.contains(tag))
}

/// Stable sort in place
pub fn sort_posts(posts: &mut [&Post], sort: SortKey) {
    match sort {
        SortKey::MostPopular | SortKey::Newest => {
            posts.sort_by_key(|p| std::cmp::Reverse(timestamp_or_epoch(p)))
        }
        SortKey::Alphabetical => posts.sort_by(|a, b| compare_titles(&a.title, &b.title)),
    }
}

fn timestamp_or_epoch(post: &Post) -> i64 {
    post.date.map(|d| d.timestamp_millis()).unwrap_or(0)
}

/// Accent- and case-insensitive title order, falling back to the raw text
/// so distinct titles never compare equal
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    let key = |s: &str| unidecode::unidecode(s).to_lowercase();
    key(a).cmp(&key(b)).then_with(|| a.cmp(b))
}

/// Result of evaluating the catalog against a state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView<'a> {
    /// Posts in the visible window, in display order
    pub visible: Vec<&'a Post>,
    /// Number of posts passing the filters
    pub total: usize,
    pub has_more: bool,
    pub visible_count: usize,
}

impl<'a> CatalogView<'a> {
    /// Display cards for the visible posts
    pub fn cards(&self, config: &CatalogConfig, default_image: &str) -> Vec<CatalogCard> {
        self.visible
            .iter()
            .map(|post| CatalogCard::new(post, config, default_image))
            .collect()
    }
}

/// Filter, sort and cut the listing down to the visible window
pub fn evaluate<'a>(posts: &'a [Post], state: &CatalogState) -> CatalogView<'a> {
    let mut filtered: Vec<&Post> = posts.iter().filter(|p| matches(p, state)).collect();
    sort_posts(&mut filtered, state.sort);

    let total = filtered.len();
    filtered.truncate(state.visible_count);

    CatalogView {
        visible: filtered,
        total,
        has_more: state.visible_count < total,
        visible_count: state.visible_count,
    }
}

/// What a template card shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCard {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub date: String,
    pub read_time: u32,
    pub image: String,
}

impl CatalogCard {
    pub fn new(post: &Post, config: &CatalogConfig, default_image: &str) -> Self {
        let image = if post.image_path.is_empty() {
            default_image
        } else {
            &post.image_path
        };
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            description: post.description.clone(),
            category: post.category().map(str::to_string),
            tags: post.secondary_tags().to_vec(),
            date: display_date(post.date.as_ref()),
            read_time: post.read_time,
            image: optimize_image_size(image, config.image_width, config.image_height),
        }
    }
}
