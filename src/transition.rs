//! Centering transitions between adjacent sentences.
//!
//! Each edge `(i-1, i)` compares the backward center of both sentences and
//! the preferred center of the current one:
//!
//! | Cb(i) = Cb(i-1) or Cb(i-1) missing | Cb(i) = Cp(i) | type         |
//! |------------------------------------|---------------|--------------|
//! | yes                                | yes           | CONTINUE     |
//! | yes                                | no            | RETAIN       |
//! | no                                 | yes           | SMOOTH_SHIFT |
//! | no                                 | no            | ROUGH_SHIFT  |
//!
//! The cost is CHEAP when Cb(i) was the preferred center of the previous
//! sentence (Strube & Hahn), EXPENSIVE otherwise.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::backward_center::{BackwardCenter, TiePolicy};
use crate::document::{Canonical, Document};
use crate::errors::{CenteringError, CenteringResult};
use crate::forward_center::ForwardCenters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionType {
    Continue,
    Retain,
    SmoothShift,
    RoughShift,
}

impl TransitionType {
    /// Contribution to the type score: 3, 2, 1, 0.
    pub fn weight(self) -> f64 {
        match self {
            Self::Continue => 3.0,
            Self::Retain => 2.0,
            Self::SmoothShift => 1.0,
            Self::RoughShift => 0.0,
        }
    }

    pub const MAX_WEIGHT: f64 = 3.0;
}

impl fmt::Display for TransitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Continue => "CONTINUE",
            Self::Retain => "RETAIN",
            Self::SmoothShift => "SMOOTH_SHIFT",
            Self::RoughShift => "ROUGH_SHIFT",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCost {
    Cheap,
    Expensive,
}

impl TransitionCost {
    /// Contribution to the cost score: 1 or 0.
    pub fn weight(self) -> f64 {
        match self {
            Self::Cheap => 1.0,
            Self::Expensive => 0.0,
        }
    }

    pub const MAX_WEIGHT: f64 = 1.0;
}

impl fmt::Display for TransitionCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Cheap => "CHEAP",
            Self::Expensive => "EXPENSIVE",
        })
    }
}

/// What to do with an edge that touches a sentence without markables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySentencePolicy {
    /// Emit nothing; the transition count shrinks
    #[default]
    Skip,
    /// Emit a `(RETAIN, EXPENSIVE)` placeholder
    NeutralPlaceholder,
}

/// The classified edge between sentences `from` and `to = from + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
    pub kind: TransitionType,
    pub cost: TransitionCost,
    /// Stands in for an edge touching an empty sentence
    pub placeholder: bool,
}

/// Classify one edge from canonical centers.
pub fn classify_edge(
    cb_prev: &Canonical,
    cb_cur: &Canonical,
    cp_prev: &Canonical,
    cp_cur: &Canonical,
) -> (TransitionType, TransitionCost) {
    let kind = if cb_prev.is_sentinel() || cb_cur == cb_prev {
        if cb_cur == cp_cur {
            TransitionType::Continue
        } else {
            TransitionType::Retain
        }
    } else if cb_cur == cp_cur {
        TransitionType::SmoothShift
    } else {
        TransitionType::RoughShift
    };

    let cost = if cb_cur == cp_prev {
        TransitionCost::Cheap
    } else {
        TransitionCost::Expensive
    };

    (kind, cost)
}

/// Turns per-sentence Cf and Cb lists into the document's transition trace.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionClassifier {
    tie_policy: TiePolicy,
    empty_sentences: EmptySentencePolicy,
}

impl TransitionClassifier {
    pub fn new(tie_policy: TiePolicy, empty_sentences: EmptySentencePolicy) -> Self {
        Self {
            tie_policy,
            empty_sentences,
        }
    }

    /// Classify every adjacent sentence pair.
    ///
    /// `forward` and `backward` must both hold one entry per sentence.
    pub fn classify(
        &self,
        doc: &Document,
        forward: &[ForwardCenters],
        backward: &[BackwardCenter],
    ) -> CenteringResult<Vec<Transition>> {
        if forward.len() != backward.len() {
            return Err(CenteringError::SentenceAlignmentMismatch {
                forward: forward.len(),
                backward: backward.len(),
            });
        }

        let preferred = |centers: &ForwardCenters| match centers.preferred() {
            Some(id) => doc.canonical_of(id),
            None => Canonical::NoMarkables,
        };

        let mut transitions = Vec::with_capacity(forward.len().saturating_sub(1));
        for to in 1..forward.len() {
            let from = to - 1;

            if forward[from].is_empty() || forward[to].is_empty() {
                if self.empty_sentences == EmptySentencePolicy::NeutralPlaceholder {
                    transitions.push(Transition {
                        from,
                        to,
                        kind: TransitionType::Retain,
                        cost: TransitionCost::Expensive,
                        placeholder: true,
                    });
                }
                continue;
            }

            let cb_prev = backward[from].canonical(doc, self.tie_policy, &forward[from]);
            let cb_cur = backward[to].canonical(doc, self.tie_policy, &forward[to]);
            let cp_prev = preferred(&forward[from]);
            let cp_cur = preferred(&forward[to]);

            let (kind, cost) = classify_edge(&cb_prev, &cb_cur, &cp_prev, &cp_cur);
            log::trace!("s{} -> s{}: {} {}", from, to, kind, cost);
            transitions.push(Transition {
                from,
                to,
                kind,
                cost,
                placeholder: false,
            });
        }

        Ok(transitions)
    }
}
