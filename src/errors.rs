//! Error types for the centering pipeline.
//!
//! Only document-level failures live here. Per-markable bridging problems
//! (missing embeddings, too few samples) are absorbed by the resolver and
//! reported in its [`BridgingReport`](crate::BridgingReport).

use thiserror::Error;

use crate::markable::MarkableId;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum CenteringError {
    /// A markable handed over by the resolver is incomplete or inconsistent.
    #[error("malformed markable {id}{}: {reason}", in_sentence(.sentence))]
    MalformedMarkable {
        id: MarkableId,
        sentence: Option<usize>,
        reason: String,
    },

    /// Forward and backward center lists disagree on the sentence count.
    #[error(
        "forward centers cover {forward} sentences but backward centers cover {backward}"
    )]
    SentenceAlignmentMismatch { forward: usize, backward: usize },

    /// A bridging link would break the antecedent invariants.
    #[error("cannot link {id} to {antecedent}: {reason}")]
    InvalidBridge {
        id: MarkableId,
        antecedent: MarkableId,
        reason: String,
    },

    /// Configuration could not be parsed or is out of range.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

fn in_sentence(sentence: &Option<usize>) -> String {
    match sentence {
        Some(index) => format!(" in sentence {}", index),
        None => String::new(),
    }
}

/// Result type for pipeline operations.
pub type CenteringResult<T> = Result<T, CenteringError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_markable_message() {
        let err = CenteringError::MalformedMarkable {
            id: MarkableId(3),
            sentence: Some(1),
            reason: "missing form".into(),
        };
        assert_eq!(err.to_string(), "malformed markable m3 in sentence 1: missing form");

        let err = CenteringError::MalformedMarkable {
            id: MarkableId(0),
            sentence: None,
            reason: "missing sentence index".into(),
        };
        assert_eq!(err.to_string(), "malformed markable m0: missing sentence index");
    }
}
