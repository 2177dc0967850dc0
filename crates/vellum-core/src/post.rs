//! The post record and its construction from parsed front-matter.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_yaml::Value;

use crate::{
    config::Config,
    frontmatter::{FrontMatter, Metadata},
    normalize::{calculate_reading_time, generate_excerpt, parse_post_date},
};

/// A blog post with all its metadata and content.
///
/// Posts are values: changing a field means building a new record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique identifier (file name without extension).
    pub slug: String,

    /// Post title.
    pub title: String,

    /// Short description or generated excerpt.
    pub description: String,

    /// Publication date as written, `YYYY-MM-DD` or a date-time.
    pub date: String,

    /// Author name.
    pub author: String,

    /// Tags for categorization, in front-matter order.
    pub tags: Vec<String>,

    /// Whether the post is featured.
    pub featured: bool,

    /// Estimated reading time in minutes.
    pub reading_time: u32,

    /// Raw markdown body.
    pub content: String,

    /// `date` parsed once for sorting and range checks.
    #[serde(skip)]
    published: Option<NaiveDateTime>,
}

/// Post fields without the body, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMetadata {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub author: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub reading_time: u32,
}

impl Post {
    /// Build a post from parsed front-matter, filling every absent field with
    /// its default.
    ///
    /// | Field | Default |
    /// |-------|---------|
    /// | `title` | `config.defaults.title` |
    /// | `description` | excerpt of the body |
    /// | `date` | `today` as `YYYY-MM-DD` |
    /// | `author` | `config.defaults.author` |
    /// | `tags` | empty |
    /// | `featured` | allow-list membership |
    /// | `reading_time` | computed from the body |
    pub fn normalize(
        slug: &str,
        front_matter: FrontMatter,
        config: &Config,
        today: NaiveDate,
    ) -> Self {
        let FrontMatter { data, body } = front_matter;
        let defaults = &config.defaults;

        let title = non_empty_str(&data, "title").unwrap_or_else(|| defaults.title.clone());
        let description = non_empty_str(&data, "description")
            .unwrap_or_else(|| generate_excerpt(&body, defaults.excerpt_length));
        let date = non_empty_str(&data, "date")
            .unwrap_or_else(|| today.format("%Y-%m-%d").to_string());
        let author = non_empty_str(&data, "author").unwrap_or_else(|| defaults.author.clone());
        let tags = string_list(&data, "tags");
        let featured = data.get("featured").is_some_and(is_truthy) || config.is_featured(slug);
        let reading_time = positive_int(&data, "readingTime")
            .unwrap_or_else(|| calculate_reading_time(&body, defaults.words_per_minute));

        Self {
            published: parse_post_date(&date),
            slug: slug.to_string(),
            title,
            description,
            date,
            author,
            tags,
            featured,
            reading_time,
            content: body,
        }
    }

    /// Publication time, when `date` parses.
    pub fn published(&self) -> Option<NaiveDateTime> {
        self.published
    }

    /// Copy of this post with `featured` set.
    #[must_use]
    pub fn with_featured(&self, featured: bool) -> Self {
        Self {
            featured,
            ..self.clone()
        }
    }

    /// Whether the post carries `tag`, ignoring case.
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }

    /// The post without its body.
    pub fn metadata(&self) -> PostMetadata {
        PostMetadata {
            slug: self.slug.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date.clone(),
            author: self.author.clone(),
            tags: self.tags.clone(),
            featured: self.featured,
            reading_time: self.reading_time,
        }
    }
}

fn non_empty_str(data: &Metadata, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn string_list(data: &Metadata, key: &str) -> Vec<String> {
    let Some(Value::Sequence(items)) = data.get(key) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        _ => true,
    }
}

fn positive_int(data: &Metadata, key: &str) -> Option<u32> {
    let minutes = match data.get(key)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f.ceil() as u64))?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };

    u32::try_from(minutes).ok().filter(|m| *m > 0)
}
