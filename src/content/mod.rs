//! Content module - ingests posts from the metadata ledger or markdown files

mod error;
mod frontmatter;
pub mod ledger;
mod markdown;
mod post;
pub mod source;
mod store;

pub use error::ContentError;
pub use frontmatter::FrontMatter;
pub use markdown::{HeadingSlugger, MarkdownRenderer};
pub use post::{read_time, resolve_image, word_count, Post};
pub use source::ContentSource;
pub use store::ContentStore;
