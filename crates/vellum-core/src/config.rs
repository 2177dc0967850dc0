//! Blog configuration management.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for Vellum.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where posts live and which files count as posts.
    #[serde(default)]
    pub content: ContentConfig,

    /// Repository cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Featured post allow-list and display hints.
    #[serde(default)]
    pub featured: FeaturedPostsConfig,

    /// Listing limits.
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Default values applied when front-matter omits a field.
    #[serde(default)]
    pub defaults: PostDefaults,
}

/// Content directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Directory containing post files, relative to the working directory.
    #[serde(default = "default_posts_dir")]
    pub posts_dir: PathBuf,

    /// File name suffixes recognized as posts, in probe order.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

/// Runtime context that decides whether the post cache is used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    /// Snapshots are cached for `ttl_secs`.
    #[default]
    Development,
    /// Every read rebuilds from disk.
    Production,
}

/// Post cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Runtime mode.
    #[serde(default)]
    pub mode: CacheMode,

    /// Snapshot lifetime in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

/// Featured posts configuration.
///
/// Everything except `posts` is a presentation hint for consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturedPostsConfig {
    /// Featured post slugs in display order.
    #[serde(default)]
    pub posts: Vec<String>,

    /// Maximum number of featured posts to display.
    #[serde(default = "default_max_featured")]
    pub max_featured_posts: usize,

    /// Whether to show featured badges.
    #[serde(default = "default_true")]
    pub show_featured_badge: bool,

    /// Whether to display featured posts in a separate section.
    #[serde(default = "default_true")]
    pub separate_featured_section: bool,

    /// Title for the featured posts section.
    #[serde(default = "default_featured_title")]
    pub featured_section_title: String,
}

/// Pagination and listing limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Posts per archive page.
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: usize,

    /// Limit used when a latest-posts query gives none.
    #[serde(default = "default_latest_limit")]
    pub default_latest_limit: usize,

    /// Maximum posts shown on the homepage.
    #[serde(default = "default_homepage_max")]
    pub homepage_max_posts: usize,

    /// Window for "recent" posts, in days.
    #[serde(default = "default_recent_days")]
    pub recent_posts_days: i64,
}

/// Default post field values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDefaults {
    /// Title used when front-matter gives none.
    #[serde(default = "default_title")]
    pub title: String,

    /// Author used when front-matter gives none.
    #[serde(default = "default_author")]
    pub author: String,

    /// Reading speed for computed reading times.
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,

    /// Maximum length of generated excerpts, in characters.
    #[serde(default = "default_excerpt_length")]
    pub excerpt_length: usize,
}

// Default value functions
fn default_posts_dir() -> PathBuf {
    PathBuf::from("src/app/content/posts")
}

fn default_extensions() -> Vec<String> {
    vec![".mdx".to_string(), ".md".to_string()]
}

fn default_ttl_secs() -> u64 {
    5 * 60
}

fn default_max_featured() -> usize {
    3
}

fn default_true() -> bool {
    true
}

fn default_featured_title() -> String {
    "Featured Posts".to_string()
}

fn default_posts_per_page() -> usize {
    10
}

fn default_latest_limit() -> usize {
    10
}

fn default_homepage_max() -> usize {
    12
}

fn default_recent_days() -> i64 {
    30
}

fn default_title() -> String {
    "Untitled".to_string()
}

fn default_author() -> String {
    "Anonymous".to_string()
}

fn default_words_per_minute() -> u32 {
    crate::normalize::DEFAULT_WORDS_PER_MINUTE
}

fn default_excerpt_length() -> usize {
    crate::normalize::DEFAULT_EXCERPT_LENGTH
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            posts_dir: default_posts_dir(),
            extensions: default_extensions(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            mode: CacheMode::default(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl Default for FeaturedPostsConfig {
    fn default() -> Self {
        Self {
            posts: Vec::new(),
            max_featured_posts: default_max_featured(),
            show_featured_badge: true,
            separate_featured_section: true,
            featured_section_title: default_featured_title(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            posts_per_page: default_posts_per_page(),
            default_latest_limit: default_latest_limit(),
            homepage_max_posts: default_homepage_max(),
            recent_posts_days: default_recent_days(),
        }
    }
}

impl Default for PostDefaults {
    fn default() -> Self {
        Self {
            title: default_title(),
            author: default_author(),
            words_per_minute: default_words_per_minute(),
            excerpt_length: default_excerpt_length(),
        }
    }
}

impl CacheConfig {
    /// Snapshot lifetime as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl ContentConfig {
    /// Return the slug for a file name if it carries a supported extension.
    ///
    /// Extensions are tried in configured order, so `.mdx` wins over `.md`
    /// for `post.mdx`.
    pub fn slug_for<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        self.extensions.iter().find_map(|ext| {
            file_name
                .strip_suffix(ext.as_str())
                .filter(|stem| !stem.is_empty())
        })
    }
}

impl Config {
    /// Create a configuration rooted at a specific posts directory.
    pub fn with_posts_dir(posts_dir: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.content.posts_dir = posts_dir.into();
        config
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, layering `VELLUM__*`
    /// environment variables over the file.
    ///
    /// The file is optional here; sections it omits fall back to defaults.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("VELLUM").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_with_env(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            let config = Self::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.content.posts_dir.as_os_str().is_empty() {
            return Err(CoreError::config("content.posts_dir cannot be empty"));
        }

        if self.content.extensions.is_empty() {
            return Err(CoreError::config(
                "content.extensions must list at least one extension",
            ));
        }

        if let Some(ext) = self.content.extensions.iter().find(|e| !e.starts_with('.')) {
            return Err(CoreError::config(format!(
                "content.extensions entry {ext:?} must start with '.'"
            )));
        }

        if self.pagination.posts_per_page == 0 {
            return Err(CoreError::config(
                "pagination.posts_per_page must be greater than zero",
            ));
        }

        if self.featured.posts.len() > self.featured.max_featured_posts {
            tracing::warn!(
                listed = self.featured.posts.len(),
                max = self.featured.max_featured_posts,
                "featured allow-list is longer than max_featured_posts"
            );
        }

        Ok(())
    }

    /// Whether a slug is on the featured allow-list.
    pub fn is_featured(&self, slug: &str) -> bool {
        self.featured.posts.iter().any(|s| s == slug)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> String {
        r#"
[content]
posts_dir = "content/posts"
extensions = [".md"]

[cache]
mode = "production"
ttl_secs = 60

[featured]
posts = ["20251022-purity-of-heart", "20251019-god-hides"]
max_featured_posts = 2
featured_section_title = "Start Here"

[pagination]
posts_per_page = 5
homepage_max_posts = 8
recent_posts_days = 14

[defaults]
author = "The Editors"
words_per_minute = 250
"#
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("vellum.toml");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.content.posts_dir, PathBuf::from("content/posts"));
        assert_eq!(config.content.extensions, vec![".md"]);
        assert_eq!(config.cache.mode, CacheMode::Production);
        assert_eq!(config.cache.ttl(), Duration::from_secs(60));
        assert_eq!(
            config.featured.posts,
            vec!["20251022-purity-of-heart", "20251019-god-hides"]
        );
        assert_eq!(config.featured.max_featured_posts, 2);
        assert!(config.featured.show_featured_badge);
        assert_eq!(config.featured.featured_section_title, "Start Here");
        assert_eq!(config.pagination.posts_per_page, 5);
        assert_eq!(config.pagination.default_latest_limit, 10);
        assert_eq!(config.pagination.homepage_max_posts, 8);
        assert_eq!(config.pagination.recent_posts_days, 14);
        assert_eq!(config.defaults.title, "Untitled");
        assert_eq!(config.defaults.author, "The Editors");
        assert_eq!(config.defaults.words_per_minute, 250);
    }

    #[test]
    fn test_config_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("vellum.toml");
        std::fs::write(&config_path, "").expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(
            config.content.posts_dir,
            PathBuf::from("src/app/content/posts")
        );
        assert_eq!(config.content.extensions, vec![".mdx", ".md"]);
        assert_eq!(config.cache.mode, CacheMode::Development);
        assert_eq!(config.cache.ttl_secs, 300);
        assert!(config.featured.posts.is_empty());
        assert_eq!(config.featured.max_featured_posts, 3);
        assert_eq!(config.pagination.homepage_max_posts, 12);
        assert_eq!(config.pagination.recent_posts_days, 30);
        assert_eq!(config.defaults.author, "Anonymous");
        assert_eq!(config.defaults.excerpt_length, 160);
    }

    #[test]
    fn test_load_with_env_reads_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("vellum.toml");
        std::fs::write(&config_path, create_test_config()).expect("write");

        let config = Config::load_with_env(&config_path).expect("load config");
        assert_eq!(config.cache.mode, CacheMode::Production);
        assert_eq!(config.featured.posts.len(), 2);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let config =
            Config::load_or_default(Path::new("/nonexistent/vellum.toml")).expect("defaults");
        assert_eq!(config.pagination.posts_per_page, 10);
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/vellum.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_config_validation_bad_extension() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("vellum.toml");
        std::fs::write(&config_path, "[content]\nextensions = [\"md\"]\n").expect("write");

        let result = Config::load(&config_path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("must start with"));
    }

    #[test]
    fn test_config_validation_zero_page_size() {
        let mut config = Config::default();
        config.pagination.posts_per_page = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_slug_for() {
        let content = ContentConfig::default();
        assert_eq!(content.slug_for("hello.mdx"), Some("hello"));
        assert_eq!(content.slug_for("hello.md"), Some("hello"));
        assert_eq!(content.slug_for("notes.txt"), None);
        assert_eq!(content.slug_for(".md"), None);
    }

    #[test]
    fn test_is_featured() {
        let mut config = Config::default();
        config.featured.posts = vec!["god-hides".to_string()];
        assert!(config.is_featured("god-hides"));
        assert!(!config.is_featured("god"));
    }
}
