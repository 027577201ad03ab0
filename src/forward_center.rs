//! Forward-looking centers (Cf): the salience ranking of each sentence.
//!
//! ```text
//! He printed drapery fabrics on long tables.
//! ╰subj      ╰─dobj────────╯    ╰─other────╯
//! Cf = [He (4), drapery fabrics (3), long tables (1)]   Cp = He
//! ```
//!
//! Ranking is delegated to a [`SalienceModel`]. The default
//! [`GrammaticalHierarchy`] scores by grammatical function; a
//! [`LinearSalienceModel`] applies externally trained feature weights.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::errors::{CenteringError, CenteringResult};
use crate::markable::{Form, GrammaticalFunction, InfoStatus, Markable, MarkableId};

/// The sentence a markable is ranked within.
#[derive(Debug, Clone)]
pub struct SentenceContext<'a> {
    pub sentence: usize,
    /// All markables of the sentence, in reading order
    pub markables: Vec<&'a Markable>,
}

/// Scores how likely a markable is to be the center of the discourse.
///
/// Higher is more salient. Scores only need to be comparable within one
/// sentence.
pub trait SalienceModel {
    fn salience(&self, markable: &Markable, context: &SentenceContext<'_>) -> f64;
}

/// Subject (4) > direct object (3) > indirect object (2) > other (1).
#[derive(Debug, Clone, Copy, Default)]
pub struct GrammaticalHierarchy;

impl SalienceModel for GrammaticalHierarchy {
    fn salience(&self, markable: &Markable, _context: &SentenceContext<'_>) -> f64 {
        f64::from(markable.function.salience())
    }
}

/// Logistic model over coded markable features.
///
/// The weights are trained outside this crate, on corpora coded for
/// grammatical function, entity type, form and information status. The
/// score is `sigmoid(bias + Σ weights)`, read as the probability that the
/// markable becomes the next backward center. Features without a weight
/// contribute 0.
///
/// ```
/// use layered_centering::LinearSalienceModel;
///
/// let model = LinearSalienceModel::from_ron_str(r#"(
///     bias: -1.0,
///     function: { subject: 2.0, direct_object: 1.0 },
///     form: { pronoun: 0.5 },
///     entity_type: { "person": 0.3 },
/// )"#).unwrap();
/// assert_eq!(model.function.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearSalienceModel {
    pub bias: f64,
    pub function: BTreeMap<GrammaticalFunction, f64>,
    pub form: BTreeMap<Form, f64>,
    pub info_status: BTreeMap<InfoStatus, f64>,
    pub entity_type: BTreeMap<String, f64>,
}

impl LinearSalienceModel {
    /// Parse trained weights from RON.
    pub fn from_ron_str(text: &str) -> CenteringResult<Self> {
        ron::from_str(text).map_err(|e| CenteringError::InvalidConfig {
            message: format!("salience weights: {}", e),
        })
    }

    /// The linear term before the logistic link.
    pub fn logit(&self, markable: &Markable) -> f64 {
        self.bias
            + self.function.get(&markable.function).copied().unwrap_or(0.0)
            + self.form.get(&markable.form).copied().unwrap_or(0.0)
            + self.info_status.get(&markable.info_status).copied().unwrap_or(0.0)
            + self
                .entity_type
                .get(&markable.entity_type)
                .copied()
                .unwrap_or(0.0)
    }
}

impl SalienceModel for LinearSalienceModel {
    fn salience(&self, markable: &Markable, _context: &SentenceContext<'_>) -> f64 {
        1.0 / (1.0 + (-self.logit(markable)).exp())
    }
}

/// A markable with its salience score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedMarkable {
    pub id: MarkableId,
    pub salience: f64,
}

/// The ranked Cf list of one sentence, most salient first.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardCenters {
    pub sentence: usize,
    pub ranked: Vec<RankedMarkable>,
}

impl ForwardCenters {
    /// The preferred center (Cp), if the sentence has markables.
    pub fn preferred(&self) -> Option<MarkableId> {
        self.ranked.first().map(|r| r.id)
    }

    /// Position of `id` in the ranking.
    pub fn rank_of(&self, id: MarkableId) -> Option<usize> {
        self.ranked.iter().position(|r| r.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = MarkableId> + '_ {
        self.ranked.iter().map(|r| r.id)
    }
}

/// Ranks the markables of every sentence with a [`SalienceModel`].
///
/// Sorting is by descending salience with ties going to the earlier
/// markable. Sentences only read static markable attributes, so each one is
/// ranked independently.
#[derive(Clone)]
pub struct ForwardCenterRanker {
    model: Arc<dyn SalienceModel + Send + Sync>,
}

impl fmt::Debug for ForwardCenterRanker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardCenterRanker").finish_non_exhaustive()
    }
}

impl Default for ForwardCenterRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl ForwardCenterRanker {
    /// Ranker using the grammatical function hierarchy.
    pub fn new() -> Self {
        Self::with_model(GrammaticalHierarchy)
    }

    pub fn with_model<M: SalienceModel + Send + Sync + 'static>(model: M) -> Self {
        Self {
            model: Arc::new(model),
        }
    }

    /// Rank every sentence of the document.
    pub fn rank(&self, doc: &Document) -> Vec<ForwardCenters> {
        (0..doc.sentence_count())
            .map(|sentence| self.rank_sentence(doc, sentence))
            .collect()
    }

    /// Rank one sentence. An empty sentence gives an empty list.
    pub fn rank_sentence(&self, doc: &Document, sentence: usize) -> ForwardCenters {
        let context = SentenceContext {
            sentence,
            markables: doc.sentence(sentence).iter().map(|&id| &doc[id]).collect(),
        };

        let mut ranked: Vec<RankedMarkable> = context
            .markables
            .iter()
            .map(|markable| RankedMarkable {
                id: markable.id,
                salience: self.model.salience(markable, &context),
            })
            .collect();
        ranked.sort_by(|a, b| b.salience.total_cmp(&a.salience).then(a.id.cmp(&b.id)));

        ForwardCenters { sentence, ranked }
    }
}
