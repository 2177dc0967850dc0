//! Query commands - read-only views over the post collection

use color_eyre::eyre::{Result, bail};
use vellum_core::normalize::format_date;
use vellum_posts::{Blog, query::DateRange};

use super::{Output, post_line, print_json, print_posts};

/// Print one page of all posts, newest first.
pub fn list(blog: &Blog, page: usize, output: Output) -> Result<()> {
    let (posts, pages) = blog.page(page);
    tracing::info!(page, pages, count = posts.len(), "listing posts");

    if page > pages.max(1) {
        bail!("Page {page} is out of range ({pages} page(s))");
    }

    print_posts(&posts, output)?;
    if output == Output::Text && pages > 1 {
        println!("\nPage {page} of {pages}");
    }
    Ok(())
}

/// Print a single post with its body.
pub fn show(blog: &Blog, slug: &str, output: Output) -> Result<()> {
    let Some(post) = blog.post_by_slug(slug) else {
        bail!("Post not found: {slug}");
    };

    match output {
        Output::Json => print_json(&post),
        Output::Text => {
            println!("{}", post.title);
            println!(
                "{} · {} · {} min read",
                format_date(&post.date),
                post.author,
                post.reading_time
            );
            if !post.tags.is_empty() {
                println!("Tags: {}", post.tags.join(", "));
            }
            if post.featured {
                println!("Featured");
            }
            println!("\n{}\n", post.description);
            println!("{}", post.content.trim());
            Ok(())
        }
    }
}

/// Print featured posts in display order.
pub fn featured(blog: &Blog, output: Output) -> Result<()> {
    let posts = blog.featured_posts();
    if output == Output::Text {
        println!("{}", blog.config().featured.featured_section_title);
    }
    print_posts(&posts, output)
}

/// Print the homepage selection.
pub fn home(blog: &Blog, max_total: Option<usize>, output: Output) -> Result<()> {
    let home = blog.homepage_posts(max_total);

    match output {
        Output::Json => print_json(&home),
        Output::Text => {
            let featured = &blog.config().featured;
            if featured.separate_featured_section {
                if !home.featured.is_empty() {
                    println!("{}", featured.featured_section_title);
                    for post in &home.featured {
                        println!("  {}", post_line(post));
                    }
                    println!();
                }
                println!("Latest");
                for post in &home.latest {
                    println!("  {}", post_line(post));
                }
            } else {
                for post in home.featured.iter().chain(&home.latest) {
                    println!("  {}", post_line(post));
                }
            }
            println!("\n{} post(s)", home.total);
            Ok(())
        }
    }
}

/// Print posts from the last `days` days.
pub fn recent(blog: &Blog, days: Option<i64>, limit: Option<usize>, output: Output) -> Result<()> {
    print_posts(&blog.recent_posts(days, limit), output)
}

/// Print posts from the last week.
pub fn whats_new(blog: &Blog, limit: Option<usize>, output: Output) -> Result<()> {
    print_posts(&blog.whats_new_posts(limit), output)
}

/// Print posts between two `YYYY-MM-DD` dates.
pub fn range(
    blog: &Blog,
    start: &str,
    end: &str,
    limit: Option<usize>,
    output: Output,
) -> Result<()> {
    print_posts(&blog.posts_by_date_range(start, end, limit), output)
}

/// Print the archive for a month, a year, or everything.
pub fn archive(blog: &Blog, year: Option<i32>, month: Option<u32>, output: Output) -> Result<()> {
    if month.is_some() && year.is_none() {
        bail!("--month requires --year");
    }
    if let Some(year) = year
        && DateRange::for_period(year, month).is_none()
    {
        bail!("Invalid archive period: {year}-{}", month.unwrap_or_default());
    }

    print_posts(&blog.archive_posts(year, month), output)
}

/// Print posts matching a free-text query.
pub fn search(blog: &Blog, query: &str, limit: Option<usize>, output: Output) -> Result<()> {
    print_posts(&blog.search_posts(query, limit), output)
}

/// Print posts carrying a tag.
pub fn tag(blog: &Blog, tag: &str, limit: Option<usize>, output: Output) -> Result<()> {
    print_posts(&blog.posts_by_tag(tag, limit), output)
}

/// Print every tag with its usage count.
pub fn tags(blog: &Blog, output: Output) -> Result<()> {
    let counts = blog.tag_counts();

    match output {
        Output::Json => print_json(&counts),
        Output::Text => {
            if counts.is_empty() {
                println!("No tags found");
            }
            for entry in &counts {
                println!("{:>4}  {}", entry.count, entry.tag);
            }
            Ok(())
        }
    }
}

/// Print posts by an author.
pub fn author(blog: &Blog, author: &str, limit: Option<usize>, output: Output) -> Result<()> {
    print_posts(&blog.posts_by_author(author, limit), output)
}

/// Print posts related to `slug` by shared tags.
pub fn related(blog: &Blog, slug: &str, limit: Option<usize>, output: Output) -> Result<()> {
    let Some(post) = blog.post_by_slug(slug) else {
        bail!("Post not found: {slug}");
    };
    print_posts(&blog.related_posts(&post, limit), output)
}

/// Print collection statistics.
pub fn stats(blog: &Blog, output: Output) -> Result<()> {
    let stats = blog.post_stats();

    match output {
        Output::Json => print_json(&stats),
        Output::Text => {
            println!("Posts:              {}", stats.total);
            println!("Featured:           {}", stats.featured);
            println!("This month:         {}", stats.this_month);
            println!("This year:          {}", stats.this_year);
            println!("Avg. reading time:  {} min", stats.average_reading_time);
            Ok(())
        }
    }
}
