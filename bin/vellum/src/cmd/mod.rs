//! CLI command implementations.

pub mod check;
pub mod query;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use serde::Serialize;
use vellum_core::{Config, Post};
use vellum_posts::Blog;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Human-readable lines.
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl Output {
    pub fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

/// Load configuration and open the blog it describes.
///
/// A missing config file is not an error; defaults apply.
pub fn open_blog(config_path: &Path) -> Result<Blog> {
    let config = Config::load_or_default(config_path)
        .wrap_err_with(|| format!("Failed to load {}", config_path.display()))?;
    tracing::debug!(posts_dir = %config.content.posts_dir.display(), "opening blog");
    Ok(Blog::new(config))
}

/// Serialize `value` as pretty JSON to stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).wrap_err("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// One line per post: date, slug, title. Featured posts get a star.
pub(crate) fn post_line(post: &Post) -> String {
    let star = if post.featured { "★ " } else { "" };
    format!("{:<20} {star}{}  {}", post.date, post.slug, post.title)
}

/// Print a post listing. JSON output drops the bodies.
pub(crate) fn print_posts(posts: &[Post], output: Output) -> Result<()> {
    match output {
        Output::Json => {
            let metadata: Vec<_> = posts.iter().map(Post::metadata).collect();
            print_json(&metadata)
        }
        Output::Text => {
            if posts.is_empty() {
                println!("No posts found");
            }
            for post in posts {
                println!("{}", post_line(post));
            }
            Ok(())
        }
    }
}
