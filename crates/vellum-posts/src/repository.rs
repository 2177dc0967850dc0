//! Post collection and caching.
//!
//! Reads the posts directory into a date-sorted collection of [`Post`]
//! records. A file that cannot be read, parsed, or validated is skipped and
//! reported; it never aborts the listing.

use std::{
    cmp::Ordering,
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use chrono::{Local, NaiveDate};
use parking_lot::Mutex;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};
use vellum_core::{
    CacheMode, Config, CoreError, Post,
    frontmatter::parse_frontmatter,
    normalize::{invalid_field, validate_post_data},
};

/// Why a post file was left out of the collection.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Front-matter could not be parsed.
    #[error(transparent)]
    Frontmatter(#[from] CoreError),

    /// A required field is missing or has the wrong type.
    #[error("invalid post data: `{0}` is missing or has the wrong type")]
    Invalid(&'static str),

    /// Another file already produced this slug.
    #[error("duplicate slug: {0}")]
    DuplicateSlug(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// A file that did not make it into the collection.
#[derive(Debug)]
pub struct SkippedFile {
    /// Path of the skipped file.
    pub path: PathBuf,

    /// Reason it was skipped.
    pub error: RepositoryError,
}

/// Outcome of processing one post file.
#[derive(Debug)]
pub enum ParseOutcome {
    /// The file produced a post.
    Parsed(Post),
    /// The file was skipped.
    Skipped(SkippedFile),
}

/// Result of a full directory scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Posts sorted by date, newest first.
    pub posts: Vec<Post>,

    /// Files left out, in enumeration order.
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug)]
struct CachedPosts {
    posts: Arc<[Post]>,
    built_at: Instant,
}

/// File-system backed post repository with a time-limited snapshot cache.
#[derive(Debug)]
pub struct PostRepository {
    config: Config,
    cache: Mutex<Option<CachedPosts>>,
}

impl PostRepository {
    /// Create a repository over the configured posts directory.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cache: Mutex::new(None),
        }
    }

    /// The configuration this repository reads with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Directory the repository reads posts from.
    pub fn posts_dir(&self) -> &Path {
        &self.config.content.posts_dir
    }

    /// All posts, newest first.
    ///
    /// In development mode a snapshot younger than the configured TTL is
    /// returned as is. Otherwise the directory is scanned again.
    pub fn get_all_posts(&self) -> Arc<[Post]> {
        let caching = self.config.cache.mode == CacheMode::Development;

        if caching && let Some(posts) = self.cached_snapshot() {
            debug!(count = posts.len(), "serving posts from cache");
            return posts;
        }

        let posts: Arc<[Post]> = self.scan().posts.into();

        if caching {
            *self.cache.lock() = Some(CachedPosts {
                posts: Arc::clone(&posts),
                built_at: Instant::now(),
            });
        }

        posts
    }

    /// Find a post by slug.
    ///
    /// Falls back to probing `<slug><ext>` on disk, so a post added after the
    /// current snapshot is still found without a full rebuild.
    pub fn get_post_by_slug(&self, slug: &str) -> Option<Post> {
        let posts = self.get_all_posts();
        if let Some(post) = posts.iter().find(|p| p.slug == slug) {
            return Some(post.clone());
        }

        if slug.is_empty()
            || slug.starts_with('.')
            || slug.contains(['/', '\\'])
            || slug.contains("..")
        {
            return None;
        }

        let today = Local::now().date_naive();
        for ext in &self.config.content.extensions {
            let path = self.posts_dir().join(format!("{slug}{ext}"));
            if !path.is_file() {
                continue;
            }

            debug!(path = %path.display(), "probing post outside snapshot");
            return match self.parse_file(slug, &path, today) {
                Ok(post) => Some(post),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to parse post");
                    None
                }
            };
        }

        None
    }

    /// Drop the cached snapshot so the next read rebuilds.
    pub fn invalidate(&self) {
        *self.cache.lock() = None;
    }

    /// Read every post file and report what was kept and what was skipped.
    ///
    /// Never touches the cache.
    pub fn scan(&self) -> ScanReport {
        let dir = self.posts_dir();

        if !dir.is_dir() {
            warn!(dir = %dir.display(), "posts directory not found");
            return ScanReport::default();
        }

        let files = match self.find_post_files() {
            Ok(files) => files,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "failed to read posts directory");
                return ScanReport::default();
            }
        };
        info!(dir = %dir.display(), count = files.len(), "found post files");

        let today = Local::now().date_naive();
        let outcomes: Vec<_> = files
            .par_iter()
            .map(|(slug, path)| (path, self.process_file(slug, path, today)))
            .collect();

        let mut report = ScanReport::default();
        let mut seen = HashSet::new();

        for (path, outcome) in outcomes {
            let skipped = match outcome {
                ParseOutcome::Parsed(post) if seen.insert(post.slug.clone()) => {
                    report.posts.push(post);
                    continue;
                }
                ParseOutcome::Parsed(post) => SkippedFile {
                    path: path.clone(),
                    error: RepositoryError::DuplicateSlug(post.slug),
                },
                ParseOutcome::Skipped(skipped) => skipped,
            };

            warn!(path = %skipped.path.display(), error = %skipped.error, "skipping post file");
            report.skipped.push(skipped);
        }

        sort_by_date(&mut report.posts);

        info!(
            posts = report.posts.len(),
            skipped = report.skipped.len(),
            "post scan complete"
        );

        report
    }

    /// Process one file into a tagged outcome.
    pub fn process_file(&self, slug: &str, path: &Path, today: NaiveDate) -> ParseOutcome {
        match self.parse_file(slug, path, today) {
            Ok(post) => ParseOutcome::Parsed(post),
            Err(error) => ParseOutcome::Skipped(SkippedFile {
                path: path.to_path_buf(),
                error,
            }),
        }
    }

    fn cached_snapshot(&self) -> Option<Arc<[Post]>> {
        let cache = self.cache.lock();
        let cached = cache.as_ref()?;
        (cached.built_at.elapsed() < self.config.cache.ttl()).then(|| Arc::clone(&cached.posts))
    }

    /// Post files with their slugs, ordered by file name.
    fn find_post_files(&self) -> Result<Vec<(String, PathBuf)>> {
        let mut files = Vec::new();

        for entry in fs::read_dir(self.posts_dir())? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let slug = self.config.content.slug_for(name);
            if name.starts_with('.') {
                if slug.is_some() {
                    warn!(path = %path.display(), "skipping hidden post file");
                } else {
                    debug!(path = %path.display(), "skipping hidden file");
                }
                continue;
            }

            if let Some(slug) = slug {
                files.push((slug.to_string(), path.clone()));
            }
        }

        files.sort_by(|(_, a), (_, b)| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Parse a single post file into a Post.
    fn parse_file(&self, slug: &str, path: &Path, today: NaiveDate) -> Result<Post> {
        debug!(path = %path.display(), "parsing post");

        let content = fs::read_to_string(path)?;
        let front_matter = parse_frontmatter(&content, path)?;

        if !validate_post_data(&front_matter.data, slug) {
            let field = invalid_field(&front_matter.data, slug).unwrap_or("front-matter");
            return Err(RepositoryError::Invalid(field));
        }

        Ok(Post::normalize(slug, front_matter, &self.config, today))
    }
}

/// Sort posts newest first.
///
/// The sort is stable, so posts sharing a date keep their relative order.
/// Posts with an unparsable date go last.
pub fn sort_by_date(posts: &mut [Post]) {
    posts.sort_by(|a, b| match (a.published(), b.published()) {
        (Some(a_date), Some(b_date)) => b_date.cmp(&a_date),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
