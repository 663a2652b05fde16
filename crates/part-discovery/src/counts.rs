//! Word frequency counting.
//!
//! [`WordCounts`] maps each distinct token to the number of times it occurs.
//! Every entry also remembers when its word was first inserted, which gives
//! iteration a stable order and lets [`most_frequent_word`] resolve ties the
//! same way on every run.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogSource;

/// How [`most_frequent_word_by`] picks a winner among words with equal counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// The word inserted first wins (default).
    #[default]
    FirstSeen,
    /// The lexicographically smallest word wins.
    Lexicographic,
}

impl TieBreak {
    /// Returns the policy name as used in config files.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstSeen => "first-seen",
            Self::Lexicographic => "lexicographic",
        }
    }
}

impl std::fmt::Display for TieBreak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    count: usize,
    seq: u64,
}

/// Occurrence counts per word.
///
/// Keys are case-sensitive exact tokens. Counts are always at least 1; a word
/// with no occurrences has no entry. Equality compares word/count pairs only,
/// not insertion order.
#[derive(Debug, Clone, Default)]
pub struct WordCounts {
    entries: HashMap<String, Entry>,
    next_seq: u64,
}

impl WordCounts {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `word`.
    pub fn increment(&mut self, word: &str) {
        if let Some(entry) = self.entries.get_mut(word) {
            entry.count += 1;
        } else {
            self.insert_new(word.to_string(), 1);
        }
    }

    /// Set the count for `word`.
    ///
    /// An existing word keeps its original position. A count of zero removes
    /// the word.
    pub fn insert(&mut self, word: impl Into<String>, count: usize) {
        let word = word.into();
        if count == 0 {
            self.entries.remove(&word);
            return;
        }
        if let Some(entry) = self.entries.get_mut(&word) {
            entry.count = count;
        } else {
            self.insert_new(word, count);
        }
    }

    fn insert_new(&mut self, word: String, count: usize) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(word, Entry { count, seq });
    }

    /// Remove `word`, returning its count if it was present.
    pub fn remove(&mut self, word: &str) -> Option<usize> {
        self.entries.remove(word).map(|entry| entry.count)
    }

    /// The count for `word`, if present.
    pub fn get(&self, word: &str) -> Option<usize> {
        self.entries.get(word).map(|entry| entry.count)
    }

    /// Whether `word` has an entry.
    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no words.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.values().map(|entry| entry.count).sum()
    }

    /// Word/count pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        let mut ordered: Vec<_> = self.entries.iter().collect();
        ordered.sort_unstable_by_key(|(_, entry)| entry.seq);
        ordered
            .into_iter()
            .map(|(word, entry)| (word.as_str(), entry.count))
    }
}

impl PartialEq for WordCounts {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(word, entry)| other.get(word) == Some(entry.count))
    }
}

impl Eq for WordCounts {}

impl<S: Into<String>> FromIterator<(S, usize)> for WordCounts {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        let mut counts = Self::new();
        counts.extend(iter);
        counts
    }
}

impl<S: Into<String>> Extend<(S, usize)> for WordCounts {
    fn extend<I: IntoIterator<Item = (S, usize)>>(&mut self, iter: I) {
        for (word, count) in iter {
            self.insert(word, count);
        }
    }
}

impl Serialize for WordCounts {
    fn serialize<Ser: serde::Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Count how often each word appears in a catalog.
#[tracing::instrument(skip_all, fields(words = catalog.catalog_words().len()))]
pub fn calculate_word_counts<C: CatalogSource + ?Sized>(catalog: &C) -> WordCounts {
    let mut counts = WordCounts::new();
    for word in catalog.catalog_words() {
        counts.increment(word);
    }
    tracing::debug!(unique = counts.len(), "counted catalog words");
    counts
}

/// Remove `word` from `counts`. Absent words are ignored.
pub fn remove_word(word: &str, counts: &mut WordCounts) {
    if counts.remove(word).is_some() {
        tracing::trace!(word, "removed word");
    }
}

/// Find the word with the highest count, breaking ties by first-seen order.
///
/// Returns `None` for an empty map.
pub fn most_frequent_word(counts: &WordCounts) -> Option<&str> {
    most_frequent_word_by(counts, TieBreak::FirstSeen)
}

/// Find the word with the highest count using the given tie-break policy.
pub fn most_frequent_word_by(counts: &WordCounts, tie_break: TieBreak) -> Option<&str> {
    let mut best: Option<(&str, &Entry)> = None;
    for (word, entry) in &counts.entries {
        let wins = match best {
            None => true,
            Some((best_word, best_entry)) => {
                entry.count > best_entry.count
                    || (entry.count == best_entry.count
                        && match tie_break {
                            TieBreak::FirstSeen => entry.seq < best_entry.seq,
                            TieBreak::Lexicographic => word.as_str() < best_word,
                        })
            }
        };
        if wins {
            best = Some((word.as_str(), entry));
        }
    }
    best.map(|(word, _)| word)
}
