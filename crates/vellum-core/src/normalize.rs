//! Field normalization helpers.
//!
//! Derived values (reading time, excerpt, slug) and the checks that decide
//! whether a parsed file may enter the collection.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde_yaml::Value;

use crate::frontmatter::Metadata;

/// Average reading speed used when none is configured.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// Excerpt length used when none is configured.
pub const DEFAULT_EXCERPT_LENGTH: usize = 160;

/// Marker appended to excerpts cut at a word boundary.
const ELLIPSIS: &str = "...";

/// Sentence breaks are only used when they keep at least this share of the
/// excerpt.
const SENTENCE_BREAK_RATIO: f64 = 0.7;

/// Naive date-time layouts accepted in front-matter, tried in order.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

macro_rules! regex {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($re).expect("static regex is valid"));
    };
}

regex!(RE_HEADER, r"#{1,6}\s+");
regex!(RE_BOLD, r"\*\*(.+?)\*\*");
regex!(RE_ITALIC, r"\*(.+?)\*");
regex!(RE_LINK, r"\[(.+?)\]\(.+?\)");
regex!(RE_CODE_BLOCK, r"```[\s\S]*?```");
regex!(RE_INLINE_CODE, r"`(.+?)`");
regex!(RE_LIST_MARKER, r"(?m)^\s*[-*+]\s+");
regex!(RE_NUMBERED_MARKER, r"(?m)^\s*\d+\.\s+");
regex!(RE_SLUG_INVALID, r"[^a-z0-9-]");
regex!(RE_SLUG_HYPHENS, r"-+");

/// Estimate reading time in whole minutes, rounded up.
///
/// Empty or whitespace-only content reads in zero minutes. A rate of zero
/// falls back to [`DEFAULT_WORDS_PER_MINUTE`].
pub fn calculate_reading_time(content: &str, words_per_minute: u32) -> u32 {
    let rate = if words_per_minute == 0 {
        DEFAULT_WORDS_PER_MINUTE
    } else {
        words_per_minute
    };
    minutes_for_words(content.split_whitespace().count(), rate)
}

/// Whole minutes for `words` at `rate` words per minute. Counts past
/// `u32::MAX` saturate.
fn minutes_for_words(words: usize, rate: u32) -> u32 {
    u32::try_from(words).unwrap_or(u32::MAX).div_ceil(rate)
}

/// Strip markdown markup from `content` and shorten it to `max_length`
/// characters.
///
/// The substitutions run in a fixed order; later patterns see the output of
/// earlier ones.
pub fn generate_excerpt(content: &str, max_length: usize) -> String {
    let text = RE_HEADER.replace_all(content, "");
    let text = RE_BOLD.replace_all(&text, "$1");
    let text = RE_ITALIC.replace_all(&text, "$1");
    let text = RE_LINK.replace_all(&text, "$1");
    let text = RE_CODE_BLOCK.replace_all(&text, "");
    let text = RE_INLINE_CODE.replace_all(&text, "$1");
    let text = RE_LIST_MARKER.replace_all(&text, "");
    let text = RE_NUMBERED_MARKER.replace_all(&text, "");
    let plain = text.trim();

    if plain.chars().count() <= max_length {
        return plain.to_string();
    }

    let cut = plain
        .char_indices()
        .nth(max_length)
        .map(|(idx, _)| idx)
        .unwrap_or(plain.len());
    let truncated = &plain[..cut];

    if let Some(dot) = truncated.rfind('.') {
        let dot_chars = truncated[..dot].chars().count();
        if dot_chars as f64 > max_length as f64 * SENTENCE_BREAK_RATIO {
            return truncated[..=dot].to_string();
        }
    }

    match truncated.rfind(' ') {
        Some(space) if space > 0 => format!("{}{ELLIPSIS}", &truncated[..space]),
        _ => format!("{truncated}{ELLIPSIS}"),
    }
}

/// Check that parsed metadata may become a post.
///
/// `title` and `date` must be strings, `tags` must be a list, and the slug
/// derived from the file name must be non-empty.
pub fn validate_post_data(data: &Metadata, slug: &str) -> bool {
    let is_string = |key: &str| data.get(key).is_some_and(Value::is_string);

    !slug.is_empty()
        && is_string("title")
        && is_string("date")
        && data.get("tags").is_some_and(Value::is_sequence)
}

/// Name the first field that makes [`validate_post_data`] fail.
pub fn invalid_field(data: &Metadata, slug: &str) -> Option<&'static str> {
    if slug.is_empty() {
        return Some("slug");
    }
    ["title", "date"]
        .into_iter()
        .find(|key| !data.get(*key).is_some_and(Value::is_string))
        .or_else(|| {
            (!data.get("tags").is_some_and(Value::is_sequence)).then_some("tags")
        })
}

/// Make a slug URL-safe: lowercase, `[a-z0-9-]` only, single hyphens, no
/// leading or trailing hyphen.
pub fn sanitize_slug(slug: &str) -> String {
    let lowered = slug.to_lowercase();
    let replaced = RE_SLUG_INVALID.replace_all(&lowered, "-");
    let collapsed = RE_SLUG_HYPHENS.replace_all(&replaced, "-");
    collapsed.trim_matches('-').to_string()
}

/// Parse a front-matter date.
///
/// Accepts `YYYY-MM-DD`, naive date-times with `T` or a space separator, and
/// RFC 3339 with an offset (converted to UTC).
pub fn parse_post_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Format a date string for display, e.g. `October 22, 2025`.
///
/// Unparsable input is returned unchanged.
pub fn format_date(value: &str) -> String {
    parse_post_date(value)
        .map(|dt| dt.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| value.to_string())
}

/// The last millisecond of a calendar day.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    date.and_time(last)
}

/// First and last instant of a month, or of a whole year when `month` is
/// `None`.
///
/// Returns `None` for an out-of-range year or month.
pub fn date_boundaries(year: i32, month: Option<u32>) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let (start, last_day) = match month {
        Some(month) => {
            let start = NaiveDate::from_ymd_opt(year, month, 1)?;
            let next = if month == 12 {
                NaiveDate::from_ymd_opt(year + 1, 1, 1)?
            } else {
                NaiveDate::from_ymd_opt(year, month + 1, 1)?
            };
            (start, next.pred_opt()?)
        }
        None => (
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        ),
    };

    Some((start.and_time(NaiveTime::MIN), end_of_day(last_day)))
}

/// Month boundaries for the month containing `now`.
pub fn current_month_boundaries(now: NaiveDateTime) -> Option<(NaiveDateTime, NaiveDateTime)> {
    date_boundaries(now.year(), Some(now.month()))
}

/// Year boundaries for the year containing `now`.
pub fn current_year_boundaries(now: NaiveDateTime) -> Option<(NaiveDateTime, NaiveDateTime)> {
    date_boundaries(now.year(), None)
}
