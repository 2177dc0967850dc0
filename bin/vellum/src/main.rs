//! Vellum CLI
//!
//! Query a directory of Markdown blog posts from the command line.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use vellum::cmd::{self, Output, query};

/// Command-line interface for Vellum.
#[derive(Parser)]
#[command(
    name = "vellum",
    version,
    about = "Query a directory of Markdown blog posts"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "vellum.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// List all posts, newest first
    List {
        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Show a single post
    Show {
        /// Post slug
        slug: String,
    },
    /// List featured posts
    Featured,
    /// Show the homepage selection (featured plus latest)
    Home {
        /// Maximum number of posts
        #[arg(short, long)]
        max: Option<usize>,
    },
    /// List posts from the last few days
    Recent {
        /// Look-back window in days
        #[arg(short, long)]
        days: Option<i64>,
        /// Maximum number of posts
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List posts from the last week
    WhatsNew {
        /// Maximum number of posts
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List posts between two dates (YYYY-MM-DD, inclusive)
    Range {
        /// Start date
        start: String,
        /// End date
        end: String,
        /// Maximum number of posts
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List posts for a year or month
    Archive {
        /// Year, e.g. 2025
        #[arg(short, long)]
        year: Option<i32>,
        /// Month 1-12 (requires --year)
        #[arg(short, long)]
        month: Option<u32>,
    },
    /// Search titles, descriptions, tags, and authors
    Search {
        /// Search text
        query: String,
        /// Maximum number of posts
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List posts with a tag
    Tag {
        /// Tag name (case-insensitive)
        tag: String,
        /// Maximum number of posts
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List all tags with post counts
    Tags,
    /// List posts by an author
    Author {
        /// Author name (case-insensitive)
        author: String,
        /// Maximum number of posts
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List posts sharing tags with a post
    Related {
        /// Post slug
        slug: String,
        /// Maximum number of posts
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show collection statistics
    Stats,
    /// Validate configuration and posts
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    vellum::init_tracing(cli.verbose);

    let output = Output::from_flag(cli.json);

    if let Commands::Check { strict } = cli.command {
        return cmd::check::run(&cli.config, strict);
    }

    let blog = cmd::open_blog(&cli.config)?;

    match cli.command {
        Commands::List { page } => query::list(&blog, page, output)?,
        Commands::Show { slug } => query::show(&blog, &slug, output)?,
        Commands::Featured => query::featured(&blog, output)?,
        Commands::Home { max } => query::home(&blog, max, output)?,
        Commands::Recent { days, limit } => query::recent(&blog, days, limit, output)?,
        Commands::WhatsNew { limit } => query::whats_new(&blog, limit, output)?,
        Commands::Range { start, end, limit } => {
            query::range(&blog, &start, &end, limit, output)?;
        }
        Commands::Archive { year, month } => query::archive(&blog, year, month, output)?,
        Commands::Search { query: text, limit } => query::search(&blog, &text, limit, output)?,
        Commands::Tag { tag, limit } => query::tag(&blog, &tag, limit, output)?,
        Commands::Tags => query::tags(&blog, output)?,
        Commands::Author { author, limit } => query::author(&blog, &author, limit, output)?,
        Commands::Related { slug, limit } => query::related(&blog, &slug, limit, output)?,
        Commands::Stats => query::stats(&blog, output)?,
        Commands::Check { .. } => unreachable!("handled before opening the blog"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_list_command_parsing() {
        let args = ["vellum", "list", "--page", "2"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, PathBuf::from("vellum.toml"));
        assert_eq!(cli.verbose, 0);
        assert!(!cli.json);

        match cli.command {
            Commands::List { page } => assert_eq!(page, 2),
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_cli_list_defaults_to_first_page() {
        let cli = Cli::parse_from(["vellum", "list"]);
        match cli.command {
            Commands::List { page } => assert_eq!(page, 1),
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_cli_json_flag_after_subcommand() {
        let cli = Cli::parse_from(["vellum", "stats", "--json"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Stats));
    }

    #[test]
    fn test_cli_range_command_parsing() {
        let args = ["vellum", "range", "2025-10-01", "2025-10-31", "-l", "5"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Range { start, end, limit } => {
                assert_eq!(start, "2025-10-01");
                assert_eq!(end, "2025-10-31");
                assert_eq!(limit, Some(5));
            }
            _ => panic!("Expected Range command"),
        }
    }

    #[test]
    fn test_cli_archive_command_parsing() {
        let cli = Cli::parse_from(["vellum", "archive", "--year", "2025", "--month", "10"]);
        match cli.command {
            Commands::Archive { year, month } => {
                assert_eq!(year, Some(2025));
                assert_eq!(month, Some(10));
            }
            _ => panic!("Expected Archive command"),
        }
    }

    #[test]
    fn test_cli_whats_new_is_kebab_case() {
        let cli = Cli::parse_from(["vellum", "whats-new"]);
        assert!(matches!(cli.command, Commands::WhatsNew { limit: None }));
    }

    #[test]
    fn test_cli_check_command_parsing() {
        let args = ["vellum", "-c", "site/vellum.toml", "check", "--strict"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, PathBuf::from("site/vellum.toml"));
        match cli.command {
            Commands::Check { strict } => assert!(strict),
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let cli = Cli::parse_from(["vellum", "-vvv", "tags"]);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_cli_show_requires_slug() {
        assert!(Cli::try_parse_from(["vellum", "show"]).is_err());
    }

    #[test]
    fn test_cli_verify() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
