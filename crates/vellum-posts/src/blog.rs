//! Blog facade.
//!
//! Binds the repository, the featured selector, and the query functions
//! together, supplying configured defaults and the current local time.

use std::{collections::BTreeMap, sync::Arc};

use chrono::{Local, NaiveDateTime};
use vellum_core::{Config, Post};

use crate::{
    featured::FeaturedSelector,
    query::{self, HomepagePosts, PostStats, TagCount},
    repository::{PostRepository, ScanReport},
};

/// Entry point for consumers of the post collection.
#[derive(Debug)]
pub struct Blog {
    repository: PostRepository,
    featured: FeaturedSelector,
}

impl Blog {
    /// Create a blog over the configured posts directory.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let featured = FeaturedSelector::new(&config.featured);
        Self {
            repository: PostRepository::new(config),
            featured,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        self.repository.config()
    }

    /// The underlying repository.
    pub fn repository(&self) -> &PostRepository {
        &self.repository
    }

    /// The featured selector.
    pub fn featured_selector(&self) -> &FeaturedSelector {
        &self.featured
    }

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    /// All posts, newest first.
    pub fn all_posts(&self) -> Arc<[Post]> {
        self.repository.get_all_posts()
    }

    /// A single post by slug.
    pub fn post_by_slug(&self, slug: &str) -> Option<Post> {
        self.repository.get_post_by_slug(slug)
    }

    /// Rescan the posts directory without touching the cache.
    pub fn scan(&self) -> ScanReport {
        self.repository.scan()
    }

    /// Whether `slug` is on the featured allow-list.
    pub fn is_featured(&self, slug: &str) -> bool {
        self.featured.is_featured(slug)
    }

    /// Featured posts in display order.
    pub fn featured_posts(&self) -> Vec<Post> {
        self.featured.select(&self.all_posts())
    }

    /// The newest posts. `None` uses the configured default limit.
    pub fn latest_posts(&self, limit: Option<usize>, exclude_featured: bool) -> Vec<Post> {
        let limit = limit.unwrap_or(self.config().pagination.default_latest_limit);
        query::latest_posts(&self.all_posts(), limit, exclude_featured)
    }

    /// Posts from the last `days` days. `None` uses configured defaults.
    pub fn recent_posts(&self, days: Option<i64>, limit: Option<usize>) -> Vec<Post> {
        let pagination = &self.config().pagination;
        query::recent_posts(
            &self.all_posts(),
            days.unwrap_or(pagination.recent_posts_days),
            limit.unwrap_or(pagination.default_latest_limit),
            Self::now(),
        )
    }

    /// Posts between two `YYYY-MM-DD` dates, inclusive.
    pub fn posts_by_date_range(&self, start: &str, end: &str, limit: Option<usize>) -> Vec<Post> {
        query::posts_by_date_range(&self.all_posts(), start, end, limit)
    }

    /// Posts from the current month.
    pub fn current_month_posts(&self, limit: Option<usize>) -> Vec<Post> {
        query::current_month_posts(&self.all_posts(), Self::now(), limit)
    }

    /// Posts from the current year.
    pub fn current_year_posts(&self, limit: Option<usize>) -> Vec<Post> {
        query::current_year_posts(&self.all_posts(), Self::now(), limit)
    }

    /// Posts from the last week.
    pub fn whats_new_posts(&self, limit: Option<usize>) -> Vec<Post> {
        query::whats_new_posts(
            &self.all_posts(),
            Self::now(),
            limit.unwrap_or(query::WHATS_NEW_LIMIT),
        )
    }

    /// Posts for an archive page.
    pub fn archive_posts(&self, year: Option<i32>, month: Option<u32>) -> Vec<Post> {
        query::archive_posts(&self.all_posts(), year, month)
    }

    /// Featured posts plus the latest others, up to `max_total`.
    pub fn homepage_posts(&self, max_total: Option<usize>) -> HomepagePosts {
        let posts = self.all_posts();
        let max_total = max_total.unwrap_or(self.config().pagination.homepage_max_posts);
        query::homepage_posts(self.featured.select(&posts), &posts, max_total)
    }

    /// Substring search over title, description, tags, and author.
    pub fn search_posts(&self, query: &str, limit: Option<usize>) -> Vec<Post> {
        query::search_posts(&self.all_posts(), query, limit)
    }

    /// Posts carrying `tag`.
    pub fn posts_by_tag(&self, tag: &str, limit: Option<usize>) -> Vec<Post> {
        query::posts_by_tag(&self.all_posts(), tag, limit)
    }

    /// Posts by `author`.
    pub fn posts_by_author(&self, author: &str, limit: Option<usize>) -> Vec<Post> {
        query::posts_by_author(&self.all_posts(), author, limit)
    }

    /// Distinct tags, sorted.
    pub fn all_tags(&self) -> Vec<String> {
        query::all_tags(&self.all_posts())
    }

    /// Tags with usage counts, most used first.
    pub fn tag_counts(&self) -> Vec<TagCount> {
        query::tag_counts(&self.all_posts())
    }

    /// Posts grouped by tag.
    pub fn posts_grouped_by_tag(&self) -> BTreeMap<String, Vec<Post>> {
        query::posts_grouped_by_tag(&self.all_posts())
    }

    /// Posts sharing tags with `current`.
    pub fn related_posts(&self, current: &Post, limit: Option<usize>) -> Vec<Post> {
        query::related_posts(
            &self.all_posts(),
            current,
            limit.unwrap_or(query::RELATED_LIMIT),
        )
    }

    /// Collection statistics.
    pub fn post_stats(&self) -> PostStats {
        let posts = self.all_posts();
        let featured = self.featured.select(&posts).len();
        query::post_stats(&posts, featured, Self::now())
    }

    /// One page of the full listing, 1-based, and the page count.
    pub fn page(&self, page: usize) -> (Vec<Post>, usize) {
        let posts = self.all_posts();
        let (items, total) = query::paginate(&posts, page, self.config().pagination.posts_per_page);
        (items.to_vec(), total)
    }
}
