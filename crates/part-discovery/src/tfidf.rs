//! TF-IDF scoring.
//!
//! A word's TF-IDF score is its count in the catalog multiplied by an
//! externally computed inverse-document-frequency weight.

use std::collections::{BTreeMap, HashMap};

use crate::counts::WordCounts;
use crate::error::{DiscoveryError, DiscoveryResult};

/// IDF weight per word.
pub type IdfScores = HashMap<String, f64>;

/// TF-IDF score per word, ordered by word.
pub type TfIdfScores = BTreeMap<String, f64>;

/// Score every counted word as `count * idf`.
///
/// Every word in `counts` must have an entry in `idf`. The first word without
/// one (in first-seen order) is reported as
/// [`DiscoveryError::MissingIdfScore`].
#[tracing::instrument(skip_all, fields(words = counts.len(), idf = idf.len()))]
pub fn tf_idf_scores(counts: &WordCounts, idf: &IdfScores) -> DiscoveryResult<TfIdfScores> {
    let scores = counts
        .iter()
        .map(|(word, count)| {
            idf.get(word)
                .map(|weight| (word.to_string(), count as f64 * weight))
                .ok_or_else(|| DiscoveryError::MissingIdfScore {
                    word: word.to_string(),
                })
        })
        .collect::<DiscoveryResult<TfIdfScores>>()?;
    tracing::debug!(scored = scores.len(), "computed tf-idf scores");
    Ok(scores)
}
