//! URL helper functions

use crate::config::SiteConfig;

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/template/foo") // -> "/site/template/foo"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Path of a single template page, relative to the site root
pub fn template_path(config: &SiteConfig, slug: &str) -> String {
    format!("/{}/{}", config.template_route.trim_matches('/'), slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com/".to_string();
        config.root = "/site/".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/about"), "/site/about");
        assert_eq!(url_for(&config, "/"), "/site/");
        assert_eq!(url_for(&SiteConfig::default(), "/"), "/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/contact"),
            "https://example.com/site/contact"
        );
    }

    #[test]
    fn test_template_path() {
        let mut config = SiteConfig::default();
        assert_eq!(template_path(&config, "lead-capture"), "/template/lead-capture");
        config.template_route = "/templates/".to_string();
        assert_eq!(template_path(&config, "a"), "/templates/a");
    }
}
