//! Bridging resolution for unresolved definite descriptions.
//!
//! A definite common noun without an antecedent ("the door") often refers to
//! something inferable from an earlier mention ("a house"). Each such
//! markable is compared with every earlier markable in embedding space; it is
//! linked to the nearest one when that distance is an outlier among all of
//! its distances:
//!
//! ```text
//! d_min <= mean(d) - k · stdev(d)      k = 2 (conservative), 1 (liberal)
//! ```
//!
//! The standard deviation is the population deviation, so a single distance
//! has deviation 0. Markables that cannot be decided (missing embeddings,
//! too few valid distances) are skipped and the document carries on.

use layered_embedding::{EmbeddingError, EmbeddingStore};
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::errors::CenteringResult;
use crate::markable::{Definiteness, Form, Markable, MarkableId};

/// How far below the mean distance a link must be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgingMode {
    /// Two standard deviations below the mean
    #[default]
    Conservative,
    /// One standard deviation below the mean
    Liberal,
}

impl BridgingMode {
    /// The `k` in `mean - k · stdev`.
    pub fn deviations(self) -> f64 {
        match self {
            Self::Conservative => 2.0,
            Self::Liberal => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgingConfig {
    pub mode: BridgingMode,
    /// Unknown tokens abort a markable's attempt instead of counting as zero
    pub strict: bool,
    /// Fewest valid distances needed to decide
    pub min_samples: usize,
}

impl Default for BridgingConfig {
    fn default() -> Self {
        Self {
            mode: BridgingMode::Conservative,
            strict: false,
            min_samples: 2,
        }
    }
}

/// A link added by the resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BridgeLink {
    pub anchor: MarkableId,
    pub antecedent: MarkableId,
    pub distance: f64,
    pub threshold: f64,
}

/// Why a bridging candidate was left unresolved.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// A token of the markable has no vector (strict mode)
    MissingEmbedding { token: String },
    /// Fewer valid distances than `min_samples`
    InsufficientSamples { valid: usize },
    /// The embedding store failed for another reason
    Store { message: String },
    /// The nearest markable was not close enough
    AboveThreshold { distance: f64, threshold: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedMarkable {
    pub id: MarkableId,
    pub reason: SkipReason,
}

/// Outcome of a bridging pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BridgingReport {
    pub links: Vec<BridgeLink>,
    pub skipped: Vec<SkippedMarkable>,
}

impl BridgingReport {
    pub fn linked(&self, id: MarkableId) -> Option<&BridgeLink> {
        self.links.iter().find(|link| link.anchor == id)
    }

    pub fn skip_reason(&self, id: MarkableId) -> Option<&SkipReason> {
        self.skipped.iter().find(|s| s.id == id).map(|s| &s.reason)
    }
}

/// Mean and population standard deviation.
fn mean_and_deviation(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Links unresolved definite descriptions to earlier markables.
#[derive(Debug, Clone, Copy, Default)]
pub struct BridgingResolver {
    config: BridgingConfig,
}

impl BridgingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BridgingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BridgingConfig {
        &self.config
    }

    /// Unresolved, definite, common-noun markables.
    pub fn is_candidate(markable: &Markable) -> bool {
        markable.antecedent.is_absent()
            && markable.form == Form::Common
            && markable.definiteness == Definiteness::Definite
    }

    /// Run one bridging pass over `doc`, in ascending id order.
    ///
    /// Only earlier markables are ever compared, so a decision never depends
    /// on a markable that has not been visited yet.
    pub fn resolve<S: EmbeddingStore + ?Sized>(
        &self,
        doc: &mut Document,
        store: &S,
    ) -> CenteringResult<BridgingReport> {
        let embeddings: Vec<Result<Vec<f32>, EmbeddingError>> = doc
            .markables()
            .iter()
            .map(|m| store.embed_phrase(&m.text, self.config.strict))
            .collect();

        let mut report = BridgingReport::default();
        for index in 0..doc.len() {
            let id = MarkableId(index);
            if !Self::is_candidate(&doc[id]) {
                continue;
            }

            match self.decide(id, &embeddings, store) {
                Ok(link) => {
                    log::debug!(
                        "bridging {} -> {} (distance {:.4} <= {:.4})",
                        link.anchor,
                        link.antecedent,
                        link.distance,
                        link.threshold
                    );
                    doc.link_bridge(link.anchor, link.antecedent)?;
                    report.links.push(link);
                }
                Err(reason) => {
                    match &reason {
                        SkipReason::MissingEmbedding { token } => {
                            log::warn!("bridging {}: no embedding for '{}'", id, token)
                        }
                        SkipReason::Store { message } => {
                            log::warn!("bridging {}: {}", id, message)
                        }
                        other => log::debug!("bridging {} skipped: {:?}", id, other),
                    }
                    report.skipped.push(SkippedMarkable { id, reason });
                }
            }
        }

        Ok(report)
    }

    fn decide<S: EmbeddingStore + ?Sized>(
        &self,
        id: MarkableId,
        embeddings: &[Result<Vec<f32>, EmbeddingError>],
        store: &S,
    ) -> Result<BridgeLink, SkipReason> {
        let target = match &embeddings[id.index()] {
            Ok(vector) => vector,
            Err(EmbeddingError::Missing { token }) => {
                return Err(SkipReason::MissingEmbedding {
                    token: token.clone(),
                })
            }
            Err(other) => {
                return Err(SkipReason::Store {
                    message: other.to_string(),
                })
            }
        };

        // A prior markable whose own embedding failed is an invalid comparison.
        let distances: Vec<(MarkableId, f64)> = embeddings[..id.index()]
            .iter()
            .enumerate()
            .filter_map(|(j, prior)| {
                let prior = prior.as_ref().ok()?;
                store.distance(target, prior).map(|d| (MarkableId(j), d))
            })
            .collect();

        if distances.is_empty() || distances.len() < self.config.min_samples {
            return Err(SkipReason::InsufficientSamples {
                valid: distances.len(),
            });
        }

        let (nearest, distance) = distances.iter().fold(distances[0], |best, &current| {
            if current.1 < best.1 {
                current
            } else {
                best
            }
        });

        let values: Vec<f64> = distances.iter().map(|(_, d)| *d).collect();
        let (mean, deviation) = mean_and_deviation(&values);
        let threshold = mean - self.config.mode.deviations() * deviation;

        if distance <= threshold {
            Ok(BridgeLink {
                anchor: id,
                antecedent: nearest,
                distance,
                threshold,
            })
        } else {
            Err(SkipReason::AboveThreshold {
                distance,
                threshold,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markable::{Antecedent, CorefType, MarkableInput};
    use layered_embedding::VectorTable;

    fn table(words: &[(&str, [f32; 2])]) -> VectorTable {
        let mut table = VectorTable::new(2);
        for (word, vector) in words {
            table.insert(*word, vector.to_vec()).unwrap();
        }
        table
    }

    fn definite(text: &str, sentence: usize) -> MarkableInput {
        MarkableInput::new(text, sentence)
            .with_form(Form::Common)
            .with_definiteness(Definiteness::Definite)
    }

    /// "house" points the same way as "door"; everything else is orthogonal.
    fn house_document() -> (Document, VectorTable) {
        let doc = Document::from_inputs(
            vec![
                MarkableInput::new("a house", 0),
                MarkableInput::new("a car", 0),
                MarkableInput::new("a tree", 0),
                MarkableInput::new("a dog", 0),
                MarkableInput::new("a cat", 0),
                MarkableInput::new("a bird", 0),
                MarkableInput::new("a lamp", 0),
                definite("the door", 1),
            ],
            2,
        )
        .unwrap();
        let vectors = table(&[
            ("house", [2.0, 0.0]),
            ("door", [1.0, 0.0]),
            ("car", [0.0, 1.0]),
            ("tree", [0.0, 1.0]),
            ("dog", [0.0, 1.0]),
            ("cat", [0.0, 1.0]),
            ("bird", [0.0, 1.0]),
            ("lamp", [0.0, 1.0]),
        ]);
        (doc, vectors)
    }

    /// Distances [~0.015, 1, 2, 1]: only a liberal threshold admits "house".
    fn borderline_document() -> (Document, VectorTable) {
        let doc = Document::from_inputs(
            vec![
                MarkableInput::new("a house", 0),
                MarkableInput::new("a car", 0),
                MarkableInput::new("a banana", 0),
                MarkableInput::new("a tree", 0),
                definite("the door", 1),
            ],
            2,
        )
        .unwrap();
        let angle = 10.0_f32.to_radians();
        let vectors = table(&[
            ("house", [angle.cos(), angle.sin()]),
            ("door", [1.0, 0.0]),
            ("car", [0.0, 1.0]),
            ("banana", [-1.0, 0.0]),
            ("tree", [0.0, -1.0]),
        ]);
        (doc, vectors)
    }

    #[test]
    fn test_outlier_is_linked_conservatively() {
        let (mut doc, vectors) = house_document();
        let report = BridgingResolver::new().resolve(&mut doc, &vectors).unwrap();

        let door = MarkableId(7);
        let link = report.linked(door).unwrap();
        assert_eq!(link.antecedent, MarkableId(0));
        assert!(link.distance.abs() < 1e-9);
        assert!(link.threshold > 0.0);
        assert_eq!(doc[door].antecedent, Antecedent::Linked(MarkableId(0)));
        assert_eq!(doc[door].coref_type, CorefType::Bridge);
    }

    #[test]
    fn test_only_definite_common_nouns_are_candidates() {
        let (mut doc, vectors) = house_document();
        let report = BridgingResolver::new().resolve(&mut doc, &vectors).unwrap();
        assert_eq!(report.links.len(), 1);
        assert!(report.skipped.is_empty());
        assert!(doc[MarkableId(3)].antecedent.is_absent());
    }

    #[test]
    fn test_borderline_needs_liberal_mode() {
        let (mut doc, vectors) = borderline_document();
        let conservative = BridgingResolver::new().resolve(&mut doc, &vectors).unwrap();
        assert!(conservative.links.is_empty());
        assert!(matches!(
            conservative.skip_reason(MarkableId(4)),
            Some(SkipReason::AboveThreshold { .. })
        ));

        let (mut doc, vectors) = borderline_document();
        let liberal = BridgingResolver::with_config(BridgingConfig {
            mode: BridgingMode::Liberal,
            ..Default::default()
        })
        .resolve(&mut doc, &vectors)
        .unwrap();
        assert_eq!(liberal.linked(MarkableId(4)).map(|l| l.antecedent), Some(MarkableId(0)));
    }

    #[test]
    fn test_liberal_links_superset_of_conservative() {
        for build in [house_document, borderline_document] {
            let (mut conservative_doc, vectors) = build();
            let conservative = BridgingResolver::new()
                .resolve(&mut conservative_doc, &vectors)
                .unwrap();

            let (mut liberal_doc, vectors) = build();
            let liberal = BridgingResolver::with_config(BridgingConfig {
                mode: BridgingMode::Liberal,
                ..Default::default()
            })
            .resolve(&mut liberal_doc, &vectors)
            .unwrap();

            for link in &conservative.links {
                let liberal_link = liberal.linked(link.anchor).unwrap();
                assert_eq!(liberal_link.antecedent, link.antecedent);
                assert!(liberal_link.threshold >= link.threshold);
            }
        }
    }

    #[test]
    fn test_first_markable_has_no_samples() {
        let mut doc = Document::from_inputs(vec![definite("the door", 0)], 1).unwrap();
        let vectors = table(&[("door", [1.0, 0.0])]);
        let report = BridgingResolver::new().resolve(&mut doc, &vectors).unwrap();
        assert_eq!(
            report.skip_reason(MarkableId(0)),
            Some(&SkipReason::InsufficientSamples { valid: 0 })
        );
    }

    #[test]
    fn test_single_sample_fails_closed_by_default() {
        let inputs = vec![MarkableInput::new("a house", 0), definite("the door", 1)];
        let vectors = table(&[("house", [1.0, 0.2]), ("door", [1.0, 0.0])]);

        let mut doc = Document::from_inputs(inputs.clone(), 2).unwrap();
        let report = BridgingResolver::new().resolve(&mut doc, &vectors).unwrap();
        assert_eq!(
            report.skip_reason(MarkableId(1)),
            Some(&SkipReason::InsufficientSamples { valid: 1 })
        );
        assert!(doc[MarkableId(1)].antecedent.is_absent());

        // With one sample allowed, stdev is 0 and the threshold equals the
        // only distance, so the link is made.
        let mut doc = Document::from_inputs(inputs, 2).unwrap();
        let report = BridgingResolver::with_config(BridgingConfig {
            min_samples: 1,
            ..Default::default()
        })
        .resolve(&mut doc, &vectors)
        .unwrap();
        let link = report.linked(MarkableId(1)).unwrap();
        assert_eq!(link.distance, link.threshold);
    }

    #[test]
    fn test_zero_vectors_are_invalid_comparisons() {
        let mut doc = Document::from_inputs(
            vec![
                MarkableInput::new("something", 0),
                MarkableInput::new("anything", 0),
                definite("the door", 1),
            ],
            2,
        )
        .unwrap();
        let vectors = table(&[("door", [1.0, 0.0])]);
        let report = BridgingResolver::new().resolve(&mut doc, &vectors).unwrap();
        assert_eq!(
            report.skip_reason(MarkableId(2)),
            Some(&SkipReason::InsufficientSamples { valid: 0 })
        );
    }

    #[test]
    fn test_strict_mode_skips_unknown_tokens() {
        let (mut doc, vectors) = house_document();
        let report = BridgingResolver::with_config(BridgingConfig {
            strict: true,
            ..Default::default()
        })
        .resolve(&mut doc, &vectors)
        .unwrap();

        assert_eq!(
            report.skip_reason(MarkableId(7)),
            Some(&SkipReason::MissingEmbedding {
                token: "the".to_string()
            })
        );
        assert!(doc[MarkableId(7)].antecedent.is_absent());
    }

    #[test]
    fn test_population_deviation() {
        let (mean, deviation) = mean_and_deviation(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(mean, 5.0);
        assert_eq!(deviation, 2.0);

        let (mean, deviation) = mean_and_deviation(&[0.3]);
        assert_eq!(mean, 0.3);
        assert_eq!(deviation, 0.0);
    }
}
