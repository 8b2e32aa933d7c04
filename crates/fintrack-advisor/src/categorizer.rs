//! Naive-Bayes transaction categorizer.
//!
//! A multinomial naive-Bayes classifier over TF-IDF weighted tokens,
//! trained once at startup on a small seed corpus of labelled
//! transaction descriptions. Prediction returns the best-scoring label;
//! resolving that label against a user's own categories happens in the
//! service layer.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Labelled training descriptions.
const SEED_CORPUS: [(&str, &str); 9] = [
    ("Starbucks coffee", "Food & Drink"),
    ("Monthly rent payment", "Housing"),
    ("Grocery shopping at Whole Foods", "Groceries"),
    ("Uber ride to airport", "Transport"),
    ("Netflix subscription", "Entertainment"),
    ("Dinner with friends at restaurant", "Food & Drink"),
    ("Gasoline for car", "Transport"),
    ("Electricity bill", "Utilities"),
    ("New shirt from store", "Shopping"),
];

/// Additive smoothing constant.
const ALPHA: f64 = 1.0;

/// Trained classifier state.
#[derive(Debug, Clone)]
pub struct Categorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    /// Log feature probabilities, indexed `[class][term]`.
    feature_log_prob: Vec<Vec<f64>>,
}

impl Categorizer {
    /// Trains the classifier on the built-in seed corpus.
    #[must_use]
    pub fn with_seed_corpus() -> Self {
        Self::train(&SEED_CORPUS)
    }

    /// Trains the classifier on labelled `(description, category)` pairs.
    ///
    /// Classes are ordered alphabetically so ties in score resolve
    /// deterministically.
    #[must_use]
    pub fn train(examples: &[(&str, &str)]) -> Self {
        let docs: Vec<Vec<String>> = examples.iter().map(|(text, _)| tokenize(text)).collect();

        // Alphabetical vocabulary and class order.
        let vocabulary: HashMap<String, usize> = docs
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .enumerate()
            .map(|(i, term)| (term, i))
            .collect();
        let classes: Vec<String> = examples
            .iter()
            .map(|(_, label)| (*label).to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let class_index: BTreeMap<&str, usize> = classes
            .iter()
            .enumerate()
            .map(|(i, label)| (label.as_str(), i))
            .collect();

        let n_terms = vocabulary.len();
        let n_docs = docs.len() as f64;

        // Smoothed inverse document frequency.
        let mut df = vec![0usize; n_terms];
        for doc in &docs {
            for &index in doc
                .iter()
                .filter_map(|t| vocabulary.get(t))
                .collect::<BTreeSet<_>>()
            {
                df[index] += 1;
            }
        }
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n_docs) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        // Accumulate L2-normalized TF-IDF vectors per class.
        let mut feature_count = vec![vec![0.0f64; n_terms]; classes.len()];
        let mut class_count = vec![0usize; classes.len()];
        for (doc, (_, label)) in docs.iter().zip(examples) {
            let class = class_index[label];
            class_count[class] += 1;
            for (term, weight) in tfidf_vector(doc, &vocabulary, &idf) {
                feature_count[class][term] += weight;
            }
        }

        let class_log_prior: Vec<f64> = class_count
            .iter()
            .map(|&count| (count as f64 / n_docs).ln())
            .collect();
        let feature_log_prob: Vec<Vec<f64>> = feature_count
            .iter()
            .map(|counts| {
                let total: f64 = counts.iter().sum();
                counts
                    .iter()
                    .map(|&count| ((count + ALPHA) / (total + ALPHA * n_terms as f64)).ln())
                    .collect()
            })
            .collect();

        debug!(
            "Trained categorizer: {} classes, {} terms",
            classes.len(),
            n_terms
        );

        Self {
            vocabulary,
            idf,
            classes,
            class_log_prior,
            feature_log_prob,
        }
    }

    /// Predicts a category label for a transaction description.
    ///
    /// Unknown tokens are ignored; a description with no known tokens
    /// falls back to the most frequent training class.
    #[must_use]
    pub fn predict(&self, description: &str) -> &str {
        let tokens = tokenize(description);
        let features = tfidf_vector(&tokens, &self.vocabulary, &self.idf);

        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (class, prior) in self.class_log_prior.iter().enumerate() {
            let score = prior
                + features
                    .iter()
                    .map(|&(term, weight)| weight * self.feature_log_prob[class][term])
                    .sum::<f64>();
            if score > best_score {
                best_score = score;
                best = class;
            }
        }

        &self.classes[best]
    }

    /// Returns the labels the classifier can predict.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.classes
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::with_seed_corpus()
    }
}

/// Lowercases and splits on non-alphanumeric characters, keeping tokens
/// of two or more characters.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .map(ToString::to_string)
        .collect()
}

/// Builds a sparse L2-normalized TF-IDF vector over the vocabulary.
fn tfidf_vector(
    tokens: &[String],
    vocabulary: &HashMap<String, usize>,
    idf: &[f64],
) -> Vec<(usize, f64)> {
    let mut counts: HashMap<usize, f64> = HashMap::new();
    for token in tokens {
        if let Some(&index) = vocabulary.get(token) {
            *counts.entry(index).or_insert(0.0) += 1.0;
        }
    }

    let mut entries: Vec<(usize, f64)> = counts
        .into_iter()
        .map(|(index, count)| (index, count * idf[index]))
        .collect();

    let norm = entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for entry in &mut entries {
            entry.1 /= norm;
        }
    }

    entries.sort_unstable_by_key(|&(index, _)| index);
    entries
}
