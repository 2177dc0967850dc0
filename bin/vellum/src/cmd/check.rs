//! Check command - validate configuration and posts

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use vellum_core::Config;
use vellum_posts::{Blog, ScanReport};

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates the configuration and parses every post file once, reporting
/// files that would be left out of the collection.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and posts");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    if !config_path.exists() {
        result.add_warning(format!(
            "Configuration file {} not found, using defaults",
            config_path.display()
        ));
        println!("  ⚠ {} missing, using defaults", config_path.display());
    }

    // Same loader as the query commands, so VELLUM__* overrides apply here too.
    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            Some(c)
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
            None
        }
    };

    if let Some(config) = config {
        check_config_values(&config, &mut result);

        let posts_dir = config.content.posts_dir.clone();
        println!("\nChecking posts in {}...", posts_dir.display());
        if posts_dir.is_dir() {
            let blog = Blog::new(config);
            let report = blog.scan();
            check_posts(&blog, &report, &mut result);
        } else {
            result.add_error(format!(
                "Posts directory does not exist: {}",
                posts_dir.display()
            ));
            println!("  ✗ {} missing", posts_dir.display());
        }
    }

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Check configuration values that load fine but look wrong.
fn check_config_values(config: &Config, result: &mut ValidationResult) {
    let featured = &config.featured;
    if featured.posts.len() > featured.max_featured_posts {
        result.add_warning(format!(
            "featured.posts lists {} slugs but max_featured_posts is {}",
            featured.posts.len(),
            featured.max_featured_posts
        ));
    }

    if config.cache.ttl_secs == 0 {
        result.add_warning("cache.ttl_secs is 0, every read rescans the posts directory");
    }

    if config.defaults.words_per_minute == 0 {
        result.add_warning("defaults.words_per_minute is 0, the built-in rate is used instead");
    }
}

/// Report skipped files, dangling allow-list entries, and undated posts.
fn check_posts(blog: &Blog, report: &ScanReport, result: &mut ValidationResult) {
    let checked = report.posts.len() + report.skipped.len();

    for skipped in &report.skipped {
        result.add_error(format!("{}: {}", skipped.path.display(), skipped.error));
    }

    if report.skipped.is_empty() {
        println!("  ✓ All {checked} post files valid");
    } else {
        println!(
            "  ✗ {}/{checked} post files were skipped",
            report.skipped.len()
        );
    }

    if report.posts.is_empty() {
        result.add_warning("No posts found");
    }

    for post in report.posts.iter().filter(|p| p.published().is_none()) {
        result.add_warning(format!(
            "{}: date {:?} is not a recognized date, the post sorts last",
            post.slug, post.date
        ));
    }

    for slug in blog.featured_selector().featured_slugs() {
        if !report.posts.iter().any(|p| &p.slug == slug) {
            result.add_warning(format!("Featured post {slug:?} does not exist"));
        }
    }
}
