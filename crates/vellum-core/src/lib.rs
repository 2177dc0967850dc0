//! Vellum Core Library
//!
//! Core types, configuration, front-matter parsing, and field normalization
//! for the Vellum blog content layer.

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod normalize;
pub mod post;

pub use config::{CacheMode, Config, FeaturedPostsConfig};
pub use error::{CoreError, Result};
pub use frontmatter::{FrontMatter, Metadata};
pub use post::{Post, PostMetadata};
