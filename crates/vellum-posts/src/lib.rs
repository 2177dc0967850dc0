//! Vellum Posts Library
//!
//! Post repository, featured selection, and read-only queries for Vellum.
//!
//! # Modules
//!
//! - [`repository`] - Directory scanning and the snapshot cache
//! - [`featured`] - Featured post selection from the allow-list and front-matter
//! - [`query`] - Pure queries over a sorted post collection
//! - [`blog`] - Facade that wires the pieces to configuration and the clock

pub mod blog;
pub mod featured;
pub mod query;
pub mod repository;

pub use blog::Blog;
pub use featured::FeaturedSelector;
pub use query::{DateRange, HomepagePosts, PostStats, TagCount};
pub use repository::{ParseOutcome, PostRepository, RepositoryError, ScanReport, SkippedFile};
