//! Filter, sort and pagination selections for the template browser

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{ALL_CATEGORIES, TEMPLATES_PER_PAGE};

/// Sort order of the template list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// There is no popularity signal, so this orders like `Newest`
    #[default]
    MostPopular,
    Newest,
    Alphabetical,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "most-popular" | "popular" => Ok(SortKey::MostPopular),
            "newest" => Ok(SortKey::Newest),
            "alphabetical" | "title" => Ok(SortKey::Alphabetical),
            other => Err(format!(
                "unknown sort order `{}` (expected most-popular, newest or alphabetical)",
                other
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortKey::MostPopular => "Most Popular",
            SortKey::Newest => "Newest",
            SortKey::Alphabetical => "Alphabetical",
        };
        f.write_str(label)
    }
}

/// Everything the browser lets a visitor choose.
///
/// Any change to the query, selections or sort order resets
/// `visible_count` to one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogState {
    pub search_query: String,
    pub selected_categories: IndexSet<String>,
    pub selected_tags: IndexSet<String>,
    pub sort: SortKey,
    pub visible_count: usize,
    pub page_size: usize,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new(TEMPLATES_PER_PAGE)
    }
}

impl CatalogState {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            search_query: String::new(),
            selected_categories: IndexSet::new(),
            selected_tags: IndexSet::new(),
            sort: SortKey::default(),
            visible_count: page_size,
            page_size,
        }
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.reset_pagination();
    }

    /// Toggle a category.
    ///
    /// The "All Categories" entry replaces every other selection when turned
    /// on. A concrete category always clears "All Categories" first.
    pub fn toggle_category(&mut self, category: &str) {
        if category == ALL_CATEGORIES {
            let was_selected = self.selected_categories.contains(ALL_CATEGORIES);
            self.selected_categories.clear();
            if !was_selected {
                self.selected_categories.insert(ALL_CATEGORIES.to_string());
            }
        } else {
            self.selected_categories.shift_remove(ALL_CATEGORIES);
            if !self.selected_categories.shift_remove(category) {
                self.selected_categories.insert(category.to_string());
            }
        }
        self.reset_pagination();
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.selected_tags.shift_remove(tag) {
            self.selected_tags.insert(tag.to_string());
        }
        self.reset_pagination();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.reset_pagination();
    }

    /// Clear the query and every selection; the sort order is kept
    pub fn reset_filters(&mut self) {
        self.search_query.clear();
        self.selected_categories.clear();
        self.selected_tags.clear();
        self.reset_pagination();
    }

    /// Grow the visible window by one page
    pub fn advance_page(&mut self) {
        self.visible_count += self.page_size;
    }

    fn reset_pagination(&mut self) {
        self.visible_count = self.page_size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(state: &CatalogState) -> Vec<&str> {
        state.selected_categories.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_all_categories_on_then_off_is_empty() {
        let mut state = CatalogState::default();
        state.toggle_category(ALL_CATEGORIES);
        assert_eq!(selected(&state), vec![ALL_CATEGORIES]);
        state.toggle_category(ALL_CATEGORIES);
        assert!(state.selected_categories.is_empty());
    }

    #[test]
    fn test_all_categories_replaces_concrete_selection() {
        let mut state = CatalogState::default();
        state.toggle_category("Sales");
        state.toggle_category("Finance");
        state.toggle_category(ALL_CATEGORIES);
        assert_eq!(selected(&state), vec![ALL_CATEGORIES]);
    }

    #[test]
    fn test_concrete_category_clears_sentinel() {
        let mut state = CatalogState::default();
        state.toggle_category(ALL_CATEGORIES);
        state.toggle_category("Sales");
        assert_eq!(selected(&state), vec!["Sales"]);
        state.toggle_category("Marketing");
        assert_eq!(selected(&state), vec!["Sales", "Marketing"]);
        state.toggle_category("Sales");
        assert_eq!(selected(&state), vec!["Marketing"]);
    }

    #[test]
    fn test_toggle_tag() {
        let mut state = CatalogState::default();
        state.toggle_tag("crm");
        state.toggle_tag("email");
        state.toggle_tag("crm");
        let tags: Vec<_> = state.selected_tags.iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["email"]);
        assert!(state.selected_categories.is_empty());
    }

    #[test]
    fn test_changes_reset_pagination() {
        let mut state = CatalogState::new(10);
        state.advance_page();
        state.advance_page();
        assert_eq!(state.visible_count, 30);
        state.set_search_query("crm");
        assert_eq!(state.visible_count, 10);

        state.advance_page();
        state.toggle_category("Sales");
        assert_eq!(state.visible_count, 10);

        state.advance_page();
        state.toggle_tag("crm");
        assert_eq!(state.visible_count, 10);

        state.advance_page();
        state.set_sort(SortKey::Alphabetical);
        assert_eq!(state.visible_count, 10);
    }

    #[test]
    fn test_reset_filters_keeps_sort() {
        let mut state = CatalogState::default();
        state.set_sort(SortKey::Alphabetical);
        state.set_search_query("lead");
        state.toggle_category("Sales");
        state.toggle_tag("crm");
        state.advance_page();

        state.reset_filters();
        assert_eq!(state.search_query, "");
        assert!(state.selected_categories.is_empty());
        assert!(state.selected_tags.is_empty());
        assert_eq!(state.sort, SortKey::Alphabetical);
        assert_eq!(state.visible_count, 10);
    }

    #[test]
    fn test_parse_sort_key() {
        assert_eq!("Most Popular".parse(), Ok(SortKey::MostPopular));
        assert_eq!("newest".parse(), Ok(SortKey::Newest));
        assert_eq!("ALPHABETICAL".parse(), Ok(SortKey::Alphabetical));
        assert!("random".parse::<SortKey>().is_err());
    }
}
