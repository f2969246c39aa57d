//! Configuration module

mod site;

pub use site::CatalogConfig;
pub use site::SiteConfig;
