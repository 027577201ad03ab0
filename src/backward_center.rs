//! Backward-looking center (Cb) selection.
//!
//! The Cb of a sentence is realized by the markables whose antecedent lies in
//! the immediately preceding sentence. When several qualify, pronouns win;
//! if more than one candidate survives, the result stays [`Ambiguous`] and a
//! [`TiePolicy`] decides which one the classifier compares.
//!
//! ```text
//! s1: My father was a small-businessman.
//! s2: He worked really hard.        Cb(s2) = Unique(He) → "my father"
//! ```
//!
//! [`Ambiguous`]: BackwardCenter::Ambiguous

use serde::{Deserialize, Serialize};

use crate::document::{Canonical, Document};
use crate::forward_center::ForwardCenters;
use crate::markable::{Antecedent, Form, MarkableId};

/// The backward-looking center of one sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackwardCenter {
    /// Exactly one markable realizes the Cb
    Unique(MarkableId),
    /// Several markables qualify; ordered by id
    Ambiguous(Vec<MarkableId>),
    /// The sentence has markables but none links to the previous sentence
    NoAntecedent,
    /// The sentence has no markables
    NoMarkables,
}

/// How to pick one markable out of an [`Ambiguous`](BackwardCenter::Ambiguous) Cb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiePolicy {
    /// The candidate with the smallest id (earliest in the sentence)
    #[default]
    FirstById,
    /// The candidate ranked highest in the sentence's own Cf list
    HighestRanked,
}

impl BackwardCenter {
    /// Candidate markables, empty for the sentinels.
    pub fn candidates(&self) -> &[MarkableId] {
        match self {
            Self::Unique(id) => std::slice::from_ref(id),
            Self::Ambiguous(ids) => ids,
            Self::NoAntecedent | Self::NoMarkables => &[],
        }
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::NoAntecedent | Self::NoMarkables)
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous(_))
    }

    /// Pick a single markable under `policy`.
    ///
    /// `forward` is the Cf list of the same sentence; it is only consulted by
    /// [`TiePolicy::HighestRanked`].
    pub fn resolve(&self, policy: TiePolicy, forward: &ForwardCenters) -> Option<MarkableId> {
        match self {
            Self::Unique(id) => Some(*id),
            Self::Ambiguous(ids) => match policy {
                TiePolicy::FirstById => ids.iter().min().copied(),
                TiePolicy::HighestRanked => forward
                    .ids()
                    .find(|id| ids.contains(id))
                    .or_else(|| ids.iter().min().copied()),
            },
            Self::NoAntecedent | Self::NoMarkables => None,
        }
    }

    /// Canonical identity of the center under `policy`.
    pub fn canonical(&self, doc: &Document, policy: TiePolicy, forward: &ForwardCenters) -> Canonical {
        match self {
            Self::NoMarkables => Canonical::NoMarkables,
            Self::NoAntecedent => Canonical::NoAntecedent,
            _ => self
                .resolve(policy, forward)
                .map(|id| doc.canonical_of(id))
                .unwrap_or(Canonical::NoAntecedent),
        }
    }
}

/// Selects the Cb of every sentence.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackwardCenterSelector;

impl BackwardCenterSelector {
    pub fn new() -> Self {
        Self
    }

    /// One [`BackwardCenter`] per sentence, sentence 0 included.
    ///
    /// Sentence 0 has no predecessor, so it is `NoAntecedent` unless empty.
    pub fn select(&self, doc: &Document) -> Vec<BackwardCenter> {
        (0..doc.sentence_count())
            .map(|sentence| self.select_sentence(doc, sentence))
            .collect()
    }

    pub fn select_sentence(&self, doc: &Document, sentence: usize) -> BackwardCenter {
        let ids = doc.sentence(sentence);
        if ids.is_empty() {
            return BackwardCenter::NoMarkables;
        }

        let candidates: Vec<MarkableId> = match sentence.checked_sub(1) {
            Some(previous) => ids
                .iter()
                .copied()
                .filter(|&id| match doc[id].antecedent {
                    Antecedent::Linked(target) => doc[target].sentence == previous,
                    Antecedent::Absent => false,
                })
                .collect(),
            None => Vec::new(),
        };

        let pronouns: Vec<MarkableId> = candidates
            .iter()
            .copied()
            .filter(|&id| doc[id].form == Form::Pronoun)
            .collect();
        let mut chosen = if pronouns.is_empty() { candidates } else { pronouns };

        match chosen.len() {
            0 => BackwardCenter::NoAntecedent,
            1 => BackwardCenter::Unique(chosen[0]),
            _ => {
                chosen.sort();
                BackwardCenter::Ambiguous(chosen)
            }
        }
    }
}
