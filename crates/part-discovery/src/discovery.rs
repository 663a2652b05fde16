//! Key word discovery over a catalog.
//!
//! [`PartDiscovery`] runs the counting, filtering, ranking and scoring steps
//! in order and collects the results into a [`DiscoveryReport`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogSource;
use crate::config::Config;
use crate::counts::{TieBreak, calculate_word_counts, most_frequent_word_by, remove_word};
use crate::error::DiscoveryResult;
use crate::tfidf::{IdfScores, TfIdfScores, tf_idf_scores};

/// Key word statistics for one catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiscoveryReport {
    /// Number of tokens in the catalog.
    pub total_words: usize,
    /// Distinct words left after stop words were removed.
    pub unique_words: usize,
    /// Stop words that occurred in the catalog and were removed.
    pub removed_words: Vec<String>,
    /// Highest-count word, if any words remain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_frequent_word: Option<String>,
    /// TF-IDF score per remaining word, ordered by word.
    pub tf_idf_scores: TfIdfScores,
}

/// Configured discovery pipeline.
#[derive(Debug, Clone, Default)]
pub struct PartDiscovery {
    tie_break: TieBreak,
    stop_words: Vec<String>,
}

impl PartDiscovery {
    /// Create a pipeline with first-seen tie-breaking and no stop words.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            tie_break: config.tie_break,
            stop_words: config.stop_words.clone(),
        }
    }

    /// Set the tie-break policy for the most frequent word.
    pub const fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Add words to drop before ranking and scoring.
    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words.extend(words.into_iter().map(Into::into));
        self
    }

    /// Count, filter, rank and score the words of `catalog`.
    ///
    /// Stop words need no IDF weight. Any other counted word without one
    /// fails the whole run.
    #[tracing::instrument(skip_all, fields(words = catalog.catalog_words().len(), tie_break = %self.tie_break))]
    pub fn discover<C: CatalogSource + ?Sized>(
        &self,
        catalog: &C,
        idf: &IdfScores,
    ) -> DiscoveryResult<DiscoveryReport> {
        let mut counts = calculate_word_counts(catalog);
        let total_words = counts.total();

        let mut removed_words = Vec::new();
        for word in &self.stop_words {
            if counts.contains(word) && !removed_words.contains(word) {
                removed_words.push(word.clone());
            }
            remove_word(word, &mut counts);
        }

        let most_frequent_word = most_frequent_word_by(&counts, self.tie_break).map(str::to_string);
        let tf_idf_scores = tf_idf_scores(&counts, idf)?;

        tracing::debug!(
            total_words,
            unique_words = counts.len(),
            removed = removed_words.len(),
            most_frequent = ?most_frequent_word,
            "discovery complete"
        );

        Ok(DiscoveryReport {
            total_words,
            unique_words: counts.len(),
            removed_words,
            most_frequent_word,
            tf_idf_scores,
        })
    }
}
