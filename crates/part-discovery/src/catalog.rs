//! Catalog sources.
//!
//! A catalog is an ordered sequence of word tokens. How a catalog is parsed or
//! stored is the provider's business; the statistics in this crate only need
//! the tokens, which they read through [`CatalogSource`].

/// Anything that can hand out the ordered word tokens of a catalog.
pub trait CatalogSource {
    /// The catalog's words, in catalog order.
    fn catalog_words(&self) -> &[String];
}

impl CatalogSource for [String] {
    fn catalog_words(&self) -> &[String] {
        self
    }
}

impl CatalogSource for Vec<String> {
    fn catalog_words(&self) -> &[String] {
        self
    }
}

/// An in-memory part catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartCatalog {
    words: Vec<String>,
}

impl PartCatalog {
    /// Create a catalog from already-tokenized words.
    pub const fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    /// Create a catalog from any iterator of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        words.into_iter().collect()
    }

    /// Tokenize text on whitespace.
    ///
    /// Tokens are kept verbatim: no case folding, no punctuation stripping.
    pub fn from_text(text: &str) -> Self {
        text.split_whitespace().collect()
    }

    /// The catalog's words.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of tokens in the catalog.
    pub const fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the catalog has no tokens.
    pub const fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl CatalogSource for PartCatalog {
    fn catalog_words(&self) -> &[String] {
        &self.words
    }
}

impl<S: Into<String>> FromIterator<S> for PartCatalog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}
