use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use super::SparseVector;

/// Common English words dropped before counting terms
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "even",
    "every", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
    "hers", "herself", "him", "himself", "his", "how", "however", "if", "in", "into", "is", "it",
    "its", "itself", "just", "may", "me", "might", "more", "most", "must", "my", "myself", "no",
    "nor", "not", "now", "of", "off", "on", "once", "one", "only", "or", "other", "our", "ours",
    "ourselves", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they",
    "this", "those", "through", "to", "too", "under", "until", "up", "upon", "very", "was", "we",
    "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with",
    "within", "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VectorizerError {
    #[error("Cannot fit on an empty corpus")]
    EmptyCorpus,
    #[error("Corpus produced an empty vocabulary")]
    EmptyVocabulary,
    #[error("Term '{term}' maps to index {index} but the vectorizer has {dimension} dimensions")]
    IndexOutOfRange {
        term: String,
        index: usize,
        dimension: usize,
    },
}

/// TF-IDF text vectorizer
///
/// Converts feature text into L2-normalised TF-IDF vectors:
///
/// ```text
/// tfidf(t, d) = tf(t, d) × idf(t)
/// idf(t)      = ln((1 + n) / (1 + df(t))) + 1
/// ```
///
/// A fitted vectorizer serialises to JSON so a pre-fitted artifact can be
/// supplied at startup instead of refitting on the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    lowercase: bool,
    stop_words: bool,
    max_features: Option<usize>,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TfidfVectorizer {
    /// Creates an unfitted vectorizer with lowercasing on and no stop words
    pub fn new() -> Self {
        Self {
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            lowercase: true,
            stop_words: false,
            max_features: None,
        }
    }

    /// Drop common English words before counting
    pub fn with_english_stop_words(mut self, enable: bool) -> Self {
        self.stop_words = enable;
        self
    }

    /// Keep only the `max_features` most frequent terms
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    /// Output dimensionality (vocabulary size)
    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    pub fn is_fitted(&self) -> bool {
        !self.idf.is_empty()
    }

    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }

    /// Checks that every vocabulary index has an idf weight
    ///
    /// Fitted vectorizers always pass; deserialized artifacts may not.
    pub fn validate(&self) -> Result<(), VectorizerError> {
        let dimension = self.dimension();
        match self.vocabulary.iter().find(|(_, &index)| index >= dimension) {
            Some((term, &index)) => Err(VectorizerError::IndexOutOfRange {
                term: term.clone(),
                index,
                dimension,
            }),
            None => Ok(()),
        }
    }

    /// Learns the vocabulary and inverse document frequencies from `corpus`
    pub fn fit<S: AsRef<str>>(&mut self, corpus: &[S]) -> Result<(), VectorizerError> {
        if corpus.is_empty() {
            return Err(VectorizerError::EmptyCorpus);
        }

        let mut term_freq: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in corpus {
            let tokens = self.tokenize(doc.as_ref());
            let mut seen: HashSet<&str> = HashSet::new();
            for token in &tokens {
                *term_freq.entry(token.clone()).or_insert(0) += 1;
                if seen.insert(token.as_str()) {
                    *doc_freq.entry(token.clone()).or_insert(0) += 1;
                }
            }
        }

        if term_freq.is_empty() {
            return Err(VectorizerError::EmptyVocabulary);
        }

        let mut ranked: Vec<(String, usize)> = term_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        if let Some(max_features) = self.max_features {
            ranked.truncate(max_features);
        }

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        let n_docs = corpus.len() as f64;
        self.idf = terms
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        self.vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect();

        tracing::debug!(
            documents = corpus.len(),
            vocabulary_size = self.vocabulary.len(),
            "Fitted TF-IDF vectorizer"
        );

        Ok(())
    }

    /// Transforms one text into a unit-length TF-IDF vector
    ///
    /// Terms outside the vocabulary are ignored, so a text sharing nothing with
    /// the corpus maps to the zero vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let dim = self.dimension();
        let pairs = self
            .tokenize(text)
            .into_iter()
            .filter_map(|token| self.vocabulary.get(&token).copied())
            .map(|idx| (idx, self.idf[idx]));
        SparseVector::from_pairs(dim, pairs).normalized()
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|token| token.chars().count() >= 2)
            .map(|token| {
                if self.lowercase {
                    token.to_lowercase()
                } else {
                    token.to_string()
                }
            })
            .filter(|token| !(self.stop_words && ENGLISH_STOP_WORDS.contains(&token.as_str())))
            .collect()
    }
}
