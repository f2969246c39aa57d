//! Helper functions shared by the content store, the catalog and the CLI

pub mod date;
pub mod html;
pub mod image;
pub mod url;
