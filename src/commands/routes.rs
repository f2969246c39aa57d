//! Static path enumeration

use anyhow::Result;

use crate::helpers::url::{full_url_for, template_path, url_for};
use crate::Site;

/// Site paths relative to the configured root: the static routes followed
/// by one route per template slug
pub fn routes(site: &Site) -> Vec<String> {
    let template_routes = site
        .list_slugs()
        .into_iter()
        .map(|slug| template_path(&site.config, &slug));
    site.config
        .static_routes
        .iter()
        .cloned()
        .chain(template_routes)
        .collect()
}

/// Print every route, optionally as absolute URLs
pub fn run(site: &Site, full: bool) -> Result<()> {
    for route in routes(site) {
        if full {
            println!("{}", full_url_for(&site.config, &route));
        } else {
            println!("{}", url_for(&site.config, &route));
        }
    }
    Ok(())
}
