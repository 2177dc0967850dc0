//! Read-only queries over a post collection.
//!
//! Every function takes the full collection, already sorted newest first, and
//! returns copies. Functions that depend on the current time take it as an
//! argument.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::Serialize;
use vellum_core::{
    Post,
    normalize::{current_month_boundaries, current_year_boundaries, date_boundaries, end_of_day},
};

/// Days covered by the "what's new" listing.
pub const WHATS_NEW_DAYS: i64 = 7;

/// Default size of the "what's new" listing.
pub const WHATS_NEW_LIMIT: usize = 5;

/// Default number of related posts.
pub const RELATED_LIMIT: usize = 3;

/// Posts for the homepage.
#[derive(Debug, Clone, Serialize)]
pub struct HomepagePosts {
    /// Featured posts.
    pub featured: Vec<Post>,
    /// Latest non-featured posts.
    pub latest: Vec<Post>,
    /// Total count of posts returned.
    pub total: usize,
}

/// Statistics about the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStats {
    pub total: usize,
    pub featured: usize,
    pub this_month: usize,
    pub this_year: usize,
    /// Rounded mean reading time in minutes, 0 for an empty collection.
    pub average_reading_time: u32,
}

/// A tag and how many posts carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Inclusive date range, both ends `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

impl DateRange {
    /// Range covering one month, or a whole year when `month` is `None`.
    pub fn for_period(year: i32, month: Option<u32>) -> Option<Self> {
        let (start, end) = date_boundaries(year, month)?;
        Some(Self {
            start_date: start.format("%Y-%m-%d").to_string(),
            end_date: end.format("%Y-%m-%d").to_string(),
        })
    }
}

fn take(posts: impl Iterator<Item = Post>, limit: Option<usize>) -> Vec<Post> {
    match limit {
        Some(n) => posts.take(n).collect(),
        None => posts.collect(),
    }
}

/// The newest `limit` posts, optionally leaving out featured ones.
pub fn latest_posts(posts: &[Post], limit: usize, exclude_featured: bool) -> Vec<Post> {
    posts
        .iter()
        .filter(|p| !(exclude_featured && p.featured))
        .take(limit)
        .cloned()
        .collect()
}

/// Posts published in the last `days` days, up to `now`.
///
/// A negative window counts as zero days. A window reaching past the earliest
/// representable date covers everything up to `now`.
pub fn recent_posts(posts: &[Post], days: i64, limit: usize, now: NaiveDateTime) -> Vec<Post> {
    let cutoff = TimeDelta::try_days(days.max(0))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(NaiveDateTime::MIN);
    let mut recent = posts_in_range(posts, cutoff, now);
    recent.truncate(limit);
    recent
}

/// Posts whose date falls within `[start, end]`.
pub fn posts_in_range(posts: &[Post], start: NaiveDateTime, end: NaiveDateTime) -> Vec<Post> {
    posts
        .iter()
        .filter(|p| p.published().is_some_and(|d| d >= start && d <= end))
        .cloned()
        .collect()
}

/// Posts between two `YYYY-MM-DD` dates, both inclusive.
///
/// `end` covers the whole day. Unparsable bounds match nothing.
pub fn posts_by_date_range(
    posts: &[Post],
    start: &str,
    end: &str,
    limit: Option<usize>,
) -> Vec<Post> {
    let parse = |s: &str| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok();
    let (Some(start), Some(end)) = (parse(start), parse(end)) else {
        tracing::warn!(start, end, "invalid date range");
        return Vec::new();
    };

    let matched = posts_in_range(posts, start.and_time(NaiveTime::MIN), end_of_day(end));
    take(matched.into_iter(), limit)
}

/// Posts from the calendar month containing `now`.
pub fn current_month_posts(posts: &[Post], now: NaiveDateTime, limit: Option<usize>) -> Vec<Post> {
    let Some((start, end)) = current_month_boundaries(now) else {
        return Vec::new();
    };
    take(posts_in_range(posts, start, end).into_iter(), limit)
}

/// Posts from the calendar year containing `now`.
pub fn current_year_posts(posts: &[Post], now: NaiveDateTime, limit: Option<usize>) -> Vec<Post> {
    let Some((start, end)) = current_year_boundaries(now) else {
        return Vec::new();
    };
    take(posts_in_range(posts, start, end).into_iter(), limit)
}

/// Posts from a given month, a given year, or all posts.
pub fn archive_posts(posts: &[Post], year: Option<i32>, month: Option<u32>) -> Vec<Post> {
    let Some(year) = year else {
        return posts.to_vec();
    };

    match date_boundaries(year, month) {
        Some((start, end)) => posts_in_range(posts, start, end),
        None => Vec::new(),
    }
}

/// Posts from the last week.
pub fn whats_new_posts(posts: &[Post], now: NaiveDateTime, limit: usize) -> Vec<Post> {
    recent_posts(posts, WHATS_NEW_DAYS, limit, now)
}

/// Featured posts first, then the latest non-featured posts filling the
/// remaining slots up to `max_total`.
///
/// `featured` is not cut down to `max_total`.
pub fn homepage_posts(featured: Vec<Post>, posts: &[Post], max_total: usize) -> HomepagePosts {
    let remaining = max_total.saturating_sub(featured.len());
    let latest = latest_posts(posts, remaining, true);
    let total = featured.len() + latest.len();

    HomepagePosts {
        featured,
        latest,
        total,
    }
}

/// Case-insensitive substring search over title, description, tags, and
/// author. A blank query matches nothing.
pub fn search_posts(posts: &[Post], query: &str, limit: Option<usize>) -> Vec<Post> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }

    let matches = posts
        .iter()
        .filter(|p| {
            p.title.to_lowercase().contains(&term)
                || p.description.to_lowercase().contains(&term)
                || p.tags.iter().any(|t| t.to_lowercase().contains(&term))
                || p.author.to_lowercase().contains(&term)
        })
        .cloned();

    take(matches, limit)
}

/// Posts carrying `tag`, ignoring case.
pub fn posts_by_tag(posts: &[Post], tag: &str, limit: Option<usize>) -> Vec<Post> {
    take(posts.iter().filter(|p| p.has_tag(tag)).cloned(), limit)
}

/// Posts written by `author`, ignoring case.
pub fn posts_by_author(posts: &[Post], author: &str, limit: Option<usize>) -> Vec<Post> {
    let author = author.to_lowercase();
    take(
        posts
            .iter()
            .filter(|p| p.author.to_lowercase() == author)
            .cloned(),
        limit,
    )
}

/// Distinct tags, sorted.
pub fn all_tags(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|p| p.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct tags with usage counts, most used first.
///
/// Tags with equal counts keep the order they were first seen in.
pub fn tag_counts(posts: &[Post]) -> Vec<TagCount> {
    let mut counts: Vec<TagCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for tag in posts.iter().flat_map(|p| p.tags.iter()) {
        match index.get(tag.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(tag.as_str(), counts.len());
                counts.push(TagCount {
                    tag: tag.clone(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Posts grouped under each of their tags. A post with N tags appears under
/// N keys, in collection order.
pub fn posts_grouped_by_tag(posts: &[Post]) -> BTreeMap<String, Vec<Post>> {
    let mut grouped: BTreeMap<String, Vec<Post>> = BTreeMap::new();

    for post in posts {
        for tag in &post.tags {
            grouped.entry(tag.clone()).or_default().push(post.clone());
        }
    }

    grouped
}

/// Other posts sharing tags with `current`, most shared tags first.
///
/// The sort is stable, so equally related posts stay newest first.
pub fn related_posts(posts: &[Post], current: &Post, limit: usize) -> Vec<Post> {
    let mut scored: Vec<(usize, &Post)> = posts
        .iter()
        .filter(|p| p.slug != current.slug)
        .map(|p| {
            let shared = p.tags.iter().filter(|t| current.tags.contains(t)).count();
            (shared, p)
        })
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, p)| p.clone()).collect()
}

/// Collection statistics. `featured_count` comes from the featured selector.
pub fn post_stats(posts: &[Post], featured_count: usize, now: NaiveDateTime) -> PostStats {
    let total_reading: u64 = posts.iter().map(|p| u64::from(p.reading_time)).sum();
    let average_reading_time = if posts.is_empty() {
        0
    } else {
        (total_reading as f64 / posts.len() as f64).round() as u32
    };

    PostStats {
        total: posts.len(),
        featured: featured_count,
        this_month: current_month_posts(posts, now, None).len(),
        this_year: current_year_posts(posts, now, None).len(),
        average_reading_time,
    }
}

/// One page of `items`, 1-based, and the total number of pages.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> (&[T], usize) {
    if per_page == 0 {
        return (&[], 0);
    }

    let total_pages = items.len().div_ceil(per_page);
    let start = page.saturating_sub(1).saturating_mul(per_page);

    if page == 0 || start >= items.len() {
        return (&[], total_pages);
    }

    let end = start.saturating_add(per_page).min(items.len());
    (&items[start..end], total_pages)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use vellum_core::{Config, frontmatter::parse_frontmatter};

    use super::*;
    use crate::repository::sort_by_date;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 18)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("now")
    }

    fn post(slug: &str, date: &str, tags: &[&str]) -> Post {
        post_with(slug, date, tags, "")
    }

    fn post_with(slug: &str, date: &str, tags: &[&str], extra: &str) -> Post {
        let tags = tags
            .iter()
            .map(|t| format!("\"{t}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let source = format!(
            "---\ntitle: \"{slug}\"\ndate: \"{date}\"\ntags: [{tags}]\n{extra}---\nBody of {slug}."
        );
        let fm = parse_frontmatter(&source, Path::new("t.md")).expect("parse");
        Post::normalize(slug, fm, &Config::default(), now().date())
    }

    fn slugs(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.slug.as_str()).collect()
    }

    fn collection() -> Vec<Post> {
        let mut posts = vec![
            post_with("purity", "2025-10-17", &["Faith", "Heart"], "featured: true\n"),
            post("spirit", "2025-10-15", &["Faith", "Spirit"]),
            post_with(
                "hides",
                "2025-10-02",
                &["Mystery", "Faith", "Heart"],
                "author: Grace\nreadingTime: 6\n",
            ),
            post("lent", "2025-03-01", &["Season"]),
            post("advent", "2024-12-01", &["Season", "Faith"]),
        ];
        sort_by_date(&mut posts);
        posts
    }

    #[test]
    fn test_latest_posts() {
        let posts = collection();
        assert_eq!(slugs(&latest_posts(&posts, 2, false)), vec!["purity", "spirit"]);
        assert_eq!(slugs(&latest_posts(&posts, 2, true)), vec!["spirit", "hides"]);
        assert!(latest_posts(&posts, 0, false).is_empty());
    }

    #[test]
    fn test_recent_posts() {
        let posts = collection();
        assert_eq!(
            slugs(&recent_posts(&posts, 7, 10, now())),
            vec!["purity", "spirit"]
        );
        assert_eq!(slugs(&recent_posts(&posts, 30, 1, now())), vec!["purity"]);
        assert_eq!(
            slugs(&whats_new_posts(&posts, now(), WHATS_NEW_LIMIT)),
            vec!["purity", "spirit"]
        );
    }

    #[test]
    fn test_recent_posts_window_bounds() {
        let posts = collection();

        let everything = recent_posts(&posts, 1_000_000_000, 10, now());
        assert_eq!(everything.len(), posts.len());
        assert_eq!(recent_posts(&posts, i64::MAX, 10, now()).len(), posts.len());

        // Negative windows are empty, like a zero-day window.
        assert!(recent_posts(&posts, -5, 10, now()).is_empty());
        assert!(recent_posts(&posts, i64::MIN, 10, now()).is_empty());
    }

    #[test]
    fn test_recent_posts_excludes_future() {
        let posts = vec![post("tomorrow", "2025-10-19", &[])];
        assert!(recent_posts(&posts, 30, 10, now()).is_empty());
    }

    #[test]
    fn test_date_range_end_of_day() {
        let posts = vec![
            post("late", "2025-10-31T23:00:00", &[]),
            post("next", "2025-11-01T00:00:00", &[]),
            post("first", "2025-10-01", &[]),
        ];

        let in_october = posts_by_date_range(&posts, "2025-10-01", "2025-10-31", None);
        assert_eq!(slugs(&in_october), vec!["late", "first"]);

        let limited = posts_by_date_range(&posts, "2025-10-01", "2025-10-31", Some(1));
        assert_eq!(slugs(&limited), vec!["late"]);

        assert!(posts_by_date_range(&posts, "October", "2025-10-31", None).is_empty());
    }

    #[test]
    fn test_current_month_and_year() {
        let posts = collection();
        assert_eq!(
            slugs(&current_month_posts(&posts, now(), None)),
            vec!["purity", "spirit", "hides"]
        );
        assert_eq!(current_year_posts(&posts, now(), None).len(), 4);
        assert_eq!(current_year_posts(&posts, now(), Some(2)).len(), 2);
    }

    #[test]
    fn test_archive_posts() {
        let posts = collection();
        assert_eq!(slugs(&archive_posts(&posts, Some(2025), Some(3))), vec!["lent"]);
        assert_eq!(slugs(&archive_posts(&posts, Some(2024), None)), vec!["advent"]);
        assert_eq!(archive_posts(&posts, None, None).len(), 5);
        assert!(archive_posts(&posts, Some(2025), Some(13)).is_empty());
    }

    #[test]
    fn test_homepage_posts() {
        let posts = collection();
        let featured = vec![posts[0].clone()];

        let home = homepage_posts(featured, &posts, 3);
        assert_eq!(slugs(&home.featured), vec!["purity"]);
        assert_eq!(slugs(&home.latest), vec!["spirit", "hides"]);
        assert_eq!(home.total, 3);

        let crowded = homepage_posts(posts.clone(), &posts, 2);
        assert_eq!(crowded.featured.len(), 5);
        assert!(crowded.latest.is_empty());
        assert_eq!(crowded.total, 5);
    }

    #[test]
    fn test_search_posts() {
        let posts = collection();
        assert!(search_posts(&posts, "", None).is_empty());
        assert!(search_posts(&posts, "   ", None).is_empty());
        assert_eq!(slugs(&search_posts(&posts, "SEASON", None)), vec!["lent", "advent"]);
        assert_eq!(slugs(&search_posts(&posts, "grace", None)), vec!["hides"]);
        assert_eq!(slugs(&search_posts(&posts, "body of sp", None)), vec!["spirit"]);
        assert_eq!(search_posts(&posts, "faith", Some(2)).len(), 2);
    }

    #[test]
    fn test_posts_by_tag_and_author() {
        let posts = collection();
        assert_eq!(
            slugs(&posts_by_tag(&posts, "heart", None)),
            vec!["purity", "hides"]
        );
        assert!(posts_by_tag(&posts, "hear", None).is_empty());
        assert_eq!(posts_by_tag(&posts, "Faith", Some(3)).len(), 3);

        assert_eq!(slugs(&posts_by_author(&posts, "GRACE", None)), vec!["hides"]);
        assert_eq!(posts_by_author(&posts, "anonymous", None).len(), 4);
        assert!(posts_by_author(&posts, "gra", None).is_empty());
    }

    #[test]
    fn test_tags() {
        let posts = collection();
        assert_eq!(
            all_tags(&posts),
            vec!["Faith", "Heart", "Mystery", "Season", "Spirit"]
        );

        let counts = tag_counts(&posts);
        assert_eq!(
            counts[0],
            TagCount {
                tag: "Faith".to_string(),
                count: 4
            }
        );
        let order: Vec<_> = counts.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(order, vec!["Faith", "Heart", "Season", "Spirit", "Mystery"]);
    }

    #[test]
    fn test_posts_grouped_by_tag() {
        let posts = collection();
        let grouped = posts_grouped_by_tag(&posts);
        assert_eq!(grouped.len(), 5);
        assert_eq!(slugs(&grouped["Faith"]), vec!["purity", "spirit", "hides", "advent"]);
        assert_eq!(slugs(&grouped["Heart"]), vec!["purity", "hides"]);
    }

    #[test]
    fn test_related_posts() {
        let posts = collection();
        let current = &posts[0];

        let related = related_posts(&posts, current, RELATED_LIMIT);
        assert_eq!(slugs(&related), vec!["hides", "spirit", "advent"]);
        assert!(related.iter().all(|p| p.slug != current.slug));

        let lone = post("lone", "2025-10-01", &["Unshared"]);
        assert!(related_posts(&posts, &lone, 3).is_empty());
        assert_eq!(related_posts(&posts, current, 1).len(), 1);
    }

    #[test]
    fn test_post_stats() {
        let posts = collection();
        let stats = post_stats(&posts, 1, now());
        assert_eq!(stats.total, 5);
        assert_eq!(stats.featured, 1);
        assert_eq!(stats.this_month, 3);
        assert_eq!(stats.this_year, 4);
        // (1 + 1 + 6 + 1 + 1) / 5 = 2
        assert_eq!(stats.average_reading_time, 2);

        let empty = post_stats(&[], 0, now());
        assert_eq!(empty.average_reading_time, 0);
        assert_eq!(empty.total, 0);
    }

    #[test]
    fn test_date_range_for_period() {
        let range = DateRange::for_period(2025, Some(2)).expect("range");
        assert_eq!(range.start_date, "2025-02-01");
        assert_eq!(range.end_date, "2025-02-28");
    }

    #[test]
    fn test_paginate() {
        let items = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

        let (page1, total) = paginate(&items, 1, 3);
        assert_eq!(page1, &[1, 2, 3]);
        assert_eq!(total, 4);

        let (page4, _) = paginate(&items, 4, 3);
        assert_eq!(page4, &[10]);

        let (page5, _) = paginate(&items, 5, 3);
        assert!(page5.is_empty());

        let (page0, _) = paginate(&items, 0, 3);
        assert!(page0.is_empty());

        let (huge, total) = paginate(&items, usize::MAX, 3);
        assert!(huge.is_empty());
        assert_eq!(total, 4);

        let (wide, _) = paginate(&items, 1, usize::MAX);
        assert_eq!(wide.len(), 10);
    }
}
