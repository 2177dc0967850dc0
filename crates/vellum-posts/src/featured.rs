//! Featured post selection.

use std::collections::HashSet;

use vellum_core::{FeaturedPostsConfig, Post};

/// Picks featured posts from an ordered allow-list plus posts that mark
/// themselves `featured: true`.
#[derive(Debug, Clone)]
pub struct FeaturedSelector {
    allow_list: Vec<String>,
    max_featured_posts: usize,
}

impl FeaturedSelector {
    /// Create a selector from the featured configuration.
    pub fn new(config: &FeaturedPostsConfig) -> Self {
        Self {
            allow_list: config.posts.clone(),
            max_featured_posts: config.max_featured_posts,
        }
    }

    /// Whether `slug` is on the allow-list.
    pub fn is_featured(&self, slug: &str) -> bool {
        self.allow_list.iter().any(|s| s == slug)
    }

    /// Allow-listed slugs in display order, capped at `max_featured_posts`.
    pub fn featured_slugs(&self) -> &[String] {
        let end = self.allow_list.len().min(self.max_featured_posts);
        &self.allow_list[..end]
    }

    /// Featured posts: allow-list order first, then self-declared ones in
    /// collection order. No slug appears twice.
    pub fn select(&self, posts: &[Post]) -> Vec<Post> {
        let mut selected = Vec::new();
        let mut seen = HashSet::new();

        for slug in &self.allow_list {
            if seen.contains(slug.as_str()) {
                continue;
            }
            if let Some(post) = posts.iter().find(|p| &p.slug == slug) {
                seen.insert(post.slug.as_str());
                selected.push(post.with_featured(true));
            }
        }

        for post in posts {
            if post.featured && seen.insert(post.slug.as_str()) {
                selected.push(post.clone());
            }
        }

        selected
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use chrono::NaiveDate;
    use vellum_core::{Config, frontmatter::parse_frontmatter};

    use super::*;

    fn post(slug: &str, date: &str, featured: bool) -> Post {
        let source = format!(
            "---\ntitle: {slug}\ndate: \"{date}\"\ntags: []\nfeatured: {featured}\n---\nBody"
        );
        let fm = parse_frontmatter(&source, Path::new("t.md")).expect("parse");
        let today = NaiveDate::from_ymd_opt(2025, 10, 18).expect("date");
        Post::normalize(slug, fm, &Config::default(), today)
    }

    fn selector(slugs: &[&str], max: usize) -> FeaturedSelector {
        let mut config = FeaturedPostsConfig {
            max_featured_posts: max,
            ..Default::default()
        };
        config.posts = slugs.iter().map(|s| s.to_string()).collect();
        FeaturedSelector::new(&config)
    }

    #[test]
    fn test_allow_list_then_frontmatter() {
        let posts = vec![
            post("c", "2025-10-03", true),
            post("b", "2025-10-02", false),
            post("a", "2025-10-01", false),
        ];

        let featured = selector(&["a", "b"], 3).select(&posts);
        let slugs: Vec<_> = featured.iter().map(|p| p.slug.as_str()).collect();

        assert_eq!(slugs, vec!["a", "b", "c"]);
        assert!(featured.iter().all(|p| p.featured));
        // The source collection is untouched.
        assert!(!posts[2].featured);
    }

    #[test]
    fn test_missing_and_repeated_slugs() {
        let posts = vec![post("x", "2025-10-02", true), post("y", "2025-10-01", true)];

        let featured = selector(&["ghost", "y", "y", "x"], 3).select(&posts);
        let slugs: Vec<_> = featured.iter().map(|p| p.slug.as_str()).collect();

        assert_eq!(slugs, vec!["y", "x"]);
    }

    #[test]
    fn test_frontmatter_extras_keep_collection_order() {
        let posts = vec![
            post("new", "2025-10-05", true),
            post("listed", "2025-10-04", false),
            post("old", "2025-10-01", true),
        ];

        let featured = selector(&["listed"], 3).select(&posts);
        let slugs: Vec<_> = featured.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["listed", "new", "old"]);
    }

    #[test]
    fn test_is_featured_and_cap() {
        let selector = selector(&["one", "two", "three", "four"], 3);
        assert!(selector.is_featured("four"));
        assert!(!selector.is_featured("five"));
        assert_eq!(selector.featured_slugs(), ["one", "two", "three"]);
    }

    #[test]
    fn test_empty_allow_list() {
        let posts = vec![post("plain", "2025-10-01", false)];
        assert!(selector(&[], 3).select(&posts).is_empty());
    }
}
