//! Template catalog: search, category/tag filters, sorting and pagination
//!
//! Evaluation is a pure function of the listing and a [`CatalogState`];
//! [`Browser`] adds a session with the delayed "load more" behaviour.

mod browser;
mod engine;
mod state;

pub use browser::Browser;
pub use engine::{
    compare_titles, evaluate, facets, matches, sort_posts, CatalogCard, CatalogView, Facets,
};
pub use state::{CatalogState, SortKey};

/// Category entry that matches every template
pub const ALL_CATEGORIES: &str = "All Categories";

/// Templates shown initially and added per "load more"
pub const TEMPLATES_PER_PAGE: usize = 10;
