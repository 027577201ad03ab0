#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Local discourse coherence scoring with Centering Theory.
//!
//! Takes the markables an upstream parser and coreference resolver produced
//! for one document and scores how smoothly its topic moves from sentence
//! to sentence.
//!
//! ## Stages
//!
//! - [`BridgingResolver`] - Links definite descriptions to earlier markables by embedding distance
//! - [`ForwardCenterRanker`] - Orders each sentence's markables (Cf) with a [`SalienceModel`]
//! - [`BackwardCenterSelector`] - Picks the markable (Cb) continuing the previous sentence
//! - [`TransitionClassifier`] - CONTINUE, RETAIN, SMOOTH_SHIFT or ROUGH_SHIFT, plus CHEAP/EXPENSIVE
//! - [`CoherenceScorer`] - Weighted mean of the transition trace
//!
//! [`Pipeline`] runs them in order and returns a [`CoherenceReport`].
//!
//! ## Example
//!
//! ```
//! use layered_centering::{Form, GrammaticalFunction, MarkableId, MarkableInput, Pipeline};
//! use layered_embedding::VectorTable;
//!
//! let inputs = vec![
//!     MarkableInput::new("I", 0)
//!         .with_form(Form::Pronoun)
//!         .with_function(GrammaticalFunction::Subject),
//!     MarkableInput::new("my father", 1)
//!         .with_form(Form::Common)
//!         .with_function(GrammaticalFunction::Subject),
//!     MarkableInput::new("He", 2)
//!         .with_form(Form::Pronoun)
//!         .with_function(GrammaticalFunction::Subject)
//!         .with_antecedent(MarkableId(1)),
//! ];
//!
//! let report = Pipeline::conservative().run(inputs, 3, &VectorTable::new(2)).unwrap();
//! assert_eq!(report.transitions.len(), 2);
//! println!("{}", report);
//! ```

mod backward_center;
mod bridging;
mod config;
mod document;
mod errors;
mod forward_center;
mod markable;
mod report;
mod scoring;
mod transition;

// Pipeline presets for running the stages in dependency order
pub mod pipeline;

pub use backward_center::{BackwardCenter, BackwardCenterSelector, TiePolicy};
pub use bridging::{
    BridgeLink, BridgingConfig, BridgingMode, BridgingReport, BridgingResolver, SkipReason,
    SkippedMarkable,
};
pub use config::CenteringConfig;
pub use document::{Canonical, Document};
pub use errors::{CenteringError, CenteringResult};
pub use forward_center::{
    ForwardCenterRanker, ForwardCenters, GrammaticalHierarchy, LinearSalienceModel,
    RankedMarkable, SalienceModel, SentenceContext,
};
pub use markable::{
    Antecedent, CorefType, Definiteness, Form, GrammaticalFunction, InfoStatus, Markable,
    MarkableId, MarkableInput,
};
pub use pipeline::{run_pipeline, Pipeline};
pub use report::CoherenceReport;
pub use scoring::{CoherenceScorer, ScoringWeights};
pub use transition::{
    classify_edge, EmptySentencePolicy, Transition, TransitionClassifier, TransitionCost,
    TransitionType,
};

// Embedding store collaborator
pub use layered_embedding::{EmbeddingError, EmbeddingStore, VectorTable};
