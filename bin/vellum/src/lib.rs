//! Vellum CLI Library
//!
//! Command implementations for the `vellum` binary. The binary parses
//! arguments and dispatches here; everything that touches posts goes through
//! [`vellum_posts::Blog`].
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (query commands, check)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use vellum::cmd::{self, Output};
//!
//! let blog = cmd::open_blog(Path::new("vellum.toml")).unwrap();
//! cmd::query::list(&blog, 1, Output::Text).unwrap();
//! ```

pub mod cmd;

// Re-export core types for convenience
pub use vellum_core::{Config, Post};
pub use vellum_posts::{Blog, ScanReport};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
