//! Key word discovery for part catalogs.
//!
//! Counts how often each word appears in a catalog, ranks the most frequent
//! word, and weights counts with externally supplied IDF scores.
//!
//! # Modules
//!
//! - [`catalog`] - Catalog sources
//! - [`counts`] - Word counting, removal and ranking
//! - [`tfidf`] - TF-IDF scoring
//! - [`discovery`] - Configured end-to-end pipeline
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use part_discovery::{IdfScores, PartCatalog, calculate_word_counts, most_frequent_word, tf_idf_scores};
//!
//! let catalog = PartCatalog::from_text("hex bolt hex nut");
//! let counts = calculate_word_counts(&catalog);
//! assert_eq!(most_frequent_word(&counts), Some("hex"));
//!
//! let idf: IdfScores = [("hex", 0.5), ("bolt", 2.0), ("nut", 1.0)]
//!     .into_iter()
//!     .map(|(w, s)| (w.to_string(), s))
//!     .collect();
//! let scores = tf_idf_scores(&counts, &idf).expect("every word has a weight");
//! assert_eq!(scores["hex"], 1.0);
//! ```
#![deny(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod counts;
pub mod discovery;
pub mod error;
pub mod tfidf;

pub use catalog::{CatalogSource, PartCatalog};
pub use config::{Config, ConfigLoader, ConfigSources};
pub use counts::{
    TieBreak, WordCounts, calculate_word_counts, most_frequent_word, most_frequent_word_by,
    remove_word,
};
pub use discovery::{DiscoveryReport, PartDiscovery};
pub use error::{ConfigError, ConfigResult, DiscoveryError, DiscoveryResult};
pub use tfidf::{IdfScores, TfIdfScores, tf_idf_scores};
