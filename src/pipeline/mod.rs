//! Pipeline presets for running the centering stages in order.
//!
//! The stages depend strictly on each other:
//! 1. Bridging - links definite descriptions (mutates the document)
//! 2. CF ranking - orders each sentence's markables by salience
//! 3. CB selection - needs the antecedent links, bridging included
//! 4. Transition classification - needs both CF and CB lists
//! 5. Scoring - needs the transition trace

use layered_embedding::EmbeddingStore;

use crate::backward_center::BackwardCenterSelector;
use crate::bridging::BridgingResolver;
use crate::config::CenteringConfig;
use crate::document::Document;
use crate::errors::CenteringResult;
use crate::forward_center::{ForwardCenterRanker, SalienceModel};
use crate::markable::MarkableInput;
use crate::report::CoherenceReport;
use crate::scoring::CoherenceScorer;
use crate::transition::TransitionClassifier;

/// Pipeline preset for scoring a document's local coherence.
///
/// - `conservative()` - bridging threshold at mean minus two deviations
/// - `liberal()` - bridging threshold at mean minus one deviation
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: CenteringConfig,
    ranker: ForwardCenterRanker,
}

impl Pipeline {
    pub fn conservative() -> Self {
        Self::default().with_config(CenteringConfig::conservative())
    }

    pub fn liberal() -> Self {
        Self::default().with_config(CenteringConfig::liberal())
    }

    pub fn with_config(mut self, config: CenteringConfig) -> Self {
        self.config = config;
        self
    }

    /// Rank forward centers with `model` instead of the grammatical hierarchy.
    pub fn with_salience_model<M>(mut self, model: M) -> Self
    where
        M: SalienceModel + Send + Sync + 'static,
    {
        self.ranker = ForwardCenterRanker::with_model(model);
        self
    }

    pub fn config(&self) -> &CenteringConfig {
        &self.config
    }

    /// Run every stage over one document.
    ///
    /// Per-markable bridging failures are recorded in the report; malformed
    /// input and stage contract violations abort the run.
    pub fn run<S: EmbeddingStore + ?Sized>(
        &self,
        inputs: Vec<MarkableInput>,
        sentence_count: usize,
        store: &S,
    ) -> CenteringResult<CoherenceReport> {
        self.config.validate()?;

        let mut document = Document::from_inputs(inputs, sentence_count)?;
        let bridging =
            BridgingResolver::with_config(self.config.bridging).resolve(&mut document, store)?;

        let forward = self.ranker.rank(&document);
        let backward = BackwardCenterSelector::new().select(&document);
        let classifier =
            TransitionClassifier::new(self.config.tie_policy, self.config.empty_sentences);
        let transitions = classifier.classify(&document, &forward, &backward)?;
        let score = CoherenceScorer::new(self.config.scoring).score(&transitions);

        log::info!(
            "centering: {} markables, {} sentences, {} bridges, {} transitions, score {:.4}",
            document.len(),
            document.sentence_count(),
            bridging.links.len(),
            transitions.len(),
            score
        );

        Ok(CoherenceReport {
            document,
            bridging,
            forward,
            backward,
            transitions,
            score,
        })
    }
}

/// Run the default pipeline with `config`.
///
/// ```
/// use layered_centering::{
///     run_pipeline, CenteringConfig, Form, GrammaticalFunction, MarkableInput, TransitionType,
/// };
/// use layered_embedding::VectorTable;
///
/// let inputs = vec![
///     MarkableInput::new("John", 0)
///         .with_form(Form::Proper)
///         .with_function(GrammaticalFunction::Subject),
///     MarkableInput::new("Mary", 1)
///         .with_form(Form::Proper)
///         .with_function(GrammaticalFunction::Subject),
/// ];
///
/// let report = run_pipeline(inputs, 2, &VectorTable::new(4), CenteringConfig::default()).unwrap();
/// assert_eq!(report.transitions[0].kind, TransitionType::Retain);
/// assert!((report.score - 4.0 / 9.0).abs() < 1e-12);
/// ```
pub fn run_pipeline<S: EmbeddingStore + ?Sized>(
    inputs: Vec<MarkableInput>,
    sentence_count: usize,
    store: &S,
    config: CenteringConfig,
) -> CenteringResult<CoherenceReport> {
    Pipeline::default().with_config(config).run(inputs, sentence_count, store)
}
