//! FAQ question classifier.
//!
//! Questions are featurized into lower-cased word unigrams and character
//! trigrams, weighted by TF-IDF, and folded into one centroid per distinct
//! answer. A query is labelled with the answer whose centroid is most similar
//! (cosine) to it.

use std::collections::HashMap;

/// Fewer examples than this leave the classifier untrained.
pub const MIN_TRAINING_EXAMPLES: usize = 2;

#[derive(Debug, Clone)]
pub struct Example {
    pub question: String,
    pub answer: String,
}

type SparseVec = HashMap<usize, f64>;

/// Immutable trained model. Rebuilt from scratch, never updated in place.
#[derive(Debug)]
pub struct Snapshot {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    answers: Vec<String>,
    centroids: Vec<SparseVec>,
    min_score: f64,
}

/// Returns `None` (untrained) when the corpus is too small to classify.
pub fn train(corpus: &[Example], min_score: f64) -> Option<Snapshot> {
    if corpus.len() < MIN_TRAINING_EXAMPLES {
        return None;
    }

    let documents: Vec<HashMap<String, f64>> =
        corpus.iter().map(|e| term_counts(&e.question)).collect();

    let mut vocabulary = HashMap::new();
    let mut document_frequency: Vec<f64> = Vec::new();
    for doc in &documents {
        for term in doc.keys() {
            let next = vocabulary.len();
            let idx = *vocabulary.entry(term.clone()).or_insert(next);
            if idx == document_frequency.len() {
                document_frequency.push(0.0);
            }
            document_frequency[idx] += 1.0;
        }
    }

    let n = documents.len() as f64;
    let idf: Vec<f64> = document_frequency
        .iter()
        .map(|df| ((1.0 + n) / (1.0 + df)).ln() + 1.0)
        .collect();

    let mut answers: Vec<String> = Vec::new();
    let mut centroids: Vec<SparseVec> = Vec::new();
    for (example, doc) in corpus.iter().zip(&documents) {
        let vector = weigh(doc, &vocabulary, &idf);
        let label = match answers.iter().position(|a| *a == example.answer) {
            Some(label) => label,
            None => {
                answers.push(example.answer.clone());
                centroids.push(SparseVec::new());
                answers.len() - 1
            }
        };
        for (idx, weight) in vector {
            *centroids[label].entry(idx).or_insert(0.0) += weight;
        }
    }
    centroids.iter_mut().for_each(normalize);

    Some(Snapshot {
        vocabulary,
        idf,
        answers,
        centroids,
        min_score,
    })
}

impl Snapshot {
    /// Best matching answer, or `None` when nothing in the query is known to
    /// the model or the best similarity does not exceed the threshold.
    pub fn predict(&self, query: &str) -> Option<&str> {
        let query = weigh(&term_counts(query), &self.vocabulary, &self.idf);
        if query.is_empty() {
            return None;
        }

        let mut best: Option<(usize, f64)> = None;
        for (label, centroid) in self.centroids.iter().enumerate() {
            let score: f64 = query
                .iter()
                .filter_map(|(idx, w)| centroid.get(idx).map(|c| c * w))
                .sum();
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((label, score));
            }
        }

        match best {
            Some((label, score)) if score > self.min_score => Some(&self.answers[label]),
            _ => None,
        }
    }

    pub fn labels(&self) -> usize {
        self.answers.len()
    }
}

fn term_counts(text: &str) -> HashMap<String, f64> {
    let mut counts = HashMap::new();
    let lowered = text.to_lowercase();
    for word in lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        *counts.entry(format!("w:{word}")).or_insert(0.0) += 1.0;

        let padded: Vec<char> = format!("#{word}#").chars().collect();
        for gram in padded.windows(3) {
            let gram: String = gram.iter().collect();
            *counts.entry(format!("c:{gram}")).or_insert(0.0) += 1.0;
        }
    }
    counts
}

/// TF-IDF vector over known terms, L2-normalized. Unknown terms are dropped.
fn weigh(counts: &HashMap<String, f64>, vocabulary: &HashMap<String, usize>, idf: &[f64]) -> SparseVec {
    let mut vector: SparseVec = counts
        .iter()
        .filter_map(|(term, tf)| vocabulary.get(term).map(|&idx| (idx, tf * idf[idx])))
        .collect();
    normalize(&mut vector);
    vector
}

fn normalize(vector: &mut SparseVec) {
    let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        vector.values_mut().for_each(|w| *w /= norm);
    }
}
