//! Content module - discovers, validates and renders posts

mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::FrontMatter;
pub use loader::{parse_post, ParsedPost, PostStore};
pub use markdown::MarkdownRenderer;
pub use post::{reading_time, Post, PostRecord, PostSummary, WORDS_PER_MINUTE};
