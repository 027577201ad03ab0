//! The embedding store seam and cosine distance.

use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;

use crate::errors::{EmbeddingError, EmbeddingResult};

/// Norms below this are treated as the zero vector.
const MIN_NORM: f64 = 1e-10;

/// A source of word vectors.
///
/// Implementations only need [`dimension`](EmbeddingStore::dimension) and
/// [`lookup`](EmbeddingStore::lookup); phrase embedding and distance have
/// default implementations. Lookups are synchronous. A store backed by a
/// remote service owns its own retry policy.
pub trait EmbeddingStore {
    /// Width of every vector returned by [`lookup`](EmbeddingStore::lookup).
    fn dimension(&self) -> usize;

    /// Vector for a single token, or [`EmbeddingError::Missing`].
    fn lookup(&self, token: &str) -> EmbeddingResult<Cow<'_, [f32]>>;

    /// Cosine distance, `None` when undefined for the pair.
    fn distance(&self, a: &[f32], b: &[f32]) -> Option<f64> {
        cosine_distance(a, b)
    }

    /// Sum of the token vectors of `text`.
    ///
    /// Text is split on Unicode word boundaries. Unknown tokens contribute
    /// zero unless `strict` is set, in which case the first unknown token is
    /// returned as [`EmbeddingError::Missing`].
    fn embed_phrase(&self, text: &str, strict: bool) -> EmbeddingResult<Vec<f32>> {
        let mut sum = vec![0.0_f32; self.dimension()];
        for token in text.unicode_words() {
            match self.lookup(token) {
                Ok(vector) => {
                    if vector.len() != sum.len() {
                        return Err(EmbeddingError::DimensionMismatch {
                            expected: sum.len(),
                            found: vector.len(),
                        });
                    }
                    for (acc, value) in sum.iter_mut().zip(vector.iter()) {
                        *acc += value;
                    }
                }
                Err(EmbeddingError::Missing { .. }) if !strict => {}
                Err(err) => return Err(err),
            }
        }
        Ok(sum)
    }
}

impl<S: EmbeddingStore + ?Sized> EmbeddingStore for &S {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn lookup(&self, token: &str) -> EmbeddingResult<Cow<'_, [f32]>> {
        (**self).lookup(token)
    }

    fn distance(&self, a: &[f32], b: &[f32]) -> Option<f64> {
        (**self).distance(a, b)
    }
}

/// Cosine distance `1 - cos(a, b)`.
///
/// Returns `None` when the lengths differ, either vector has (near) zero
/// norm, or the result is not finite.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let norm_a = norm_a.sqrt();
    let norm_b = norm_b.sqrt();
    if norm_a < MIN_NORM || norm_b < MIN_NORM {
        return None;
    }

    let distance = 1.0 - dot / (norm_a * norm_b);
    if distance.is_finite() {
        Some(distance)
    } else {
        None
    }
}
