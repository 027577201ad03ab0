//! The markable arena for one document.
//!
//! Markables live in a `Vec` indexed by [`MarkableId`], and antecedents are
//! stored as indices that always point backwards. Following a chain of
//! antecedents therefore strictly decreases the index and always reaches a
//! root markable, which gives every markable a canonical text.

use std::ops::Index;

use crate::errors::{CenteringError, CenteringResult};
use crate::markable::{Antecedent, CorefType, Markable, MarkableId, MarkableInput};

/// Canonical identity of a discourse center.
///
/// `Text` holds the lowercased text of the root of an antecedent chain. The
/// two sentinels stand for "no center" and never compare equal to anything,
/// themselves included, so a missing center is never mistaken for the same
/// center twice.
#[derive(Debug, Clone)]
pub enum Canonical {
    Text(String),
    /// The sentence has markables but none links to the previous sentence
    NoAntecedent,
    /// The sentence has no markables at all
    NoMarkables,
}

impl Canonical {
    /// Returns true for `NoAntecedent` and `NoMarkables`.
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Self::Text(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl PartialEq for Canonical {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

/// A validated document: markables in reading order, grouped by sentence.
#[derive(Debug, Clone)]
pub struct Document {
    markables: Vec<Markable>,
    sentences: Vec<Vec<MarkableId>>,
}

impl Document {
    /// Validate resolver output and build the arena.
    ///
    /// Ids are assigned from input order. Fails with
    /// [`CenteringError::MalformedMarkable`] when an attribute is missing,
    /// a sentence index is out of range or goes backwards, an antecedent does
    /// not precede its markable, or the coreference type contradicts the
    /// antecedent.
    pub fn from_inputs(inputs: Vec<MarkableInput>, sentence_count: usize) -> CenteringResult<Self> {
        let mut markables = Vec::with_capacity(inputs.len());
        let mut sentences = vec![Vec::new(); sentence_count];
        let mut last_sentence = 0;

        for (index, input) in inputs.into_iter().enumerate() {
            let id = MarkableId(index);
            let sentence = input.sentence;
            let malformed = |reason: String| CenteringError::MalformedMarkable {
                id,
                sentence,
                reason,
            };
            let missing = |attribute: &str| malformed(format!("missing {}", attribute));

            let sentence = sentence.ok_or_else(|| missing("sentence index"))?;
            let text = input.text.ok_or_else(|| missing("text"))?;
            let form = input.form.ok_or_else(|| missing("form"))?;
            let entity_type = input.entity_type.ok_or_else(|| missing("entity type"))?;
            let function = input.function.ok_or_else(|| missing("grammatical function"))?;
            let definiteness = input.definiteness.ok_or_else(|| missing("definiteness"))?;
            let info_status = input.info_status.ok_or_else(|| missing("info status"))?;

            if sentence >= sentence_count {
                return Err(malformed(format!(
                    "sentence index out of range for {} sentences",
                    sentence_count
                )));
            }
            if sentence < last_sentence {
                return Err(malformed(format!(
                    "sentence index goes back from {} in reading order",
                    last_sentence
                )));
            }
            last_sentence = sentence;

            let (antecedent, coref_type) = match (input.antecedent, input.coref_type) {
                (Some(target), _) if target >= id => {
                    return Err(malformed(format!(
                        "antecedent {} does not precede the markable",
                        target
                    )));
                }
                (Some(_), Some(CorefType::None)) => {
                    return Err(malformed("antecedent given with coref type none".into()));
                }
                (None, Some(CorefType::Identity)) | (None, Some(CorefType::Bridge)) => {
                    return Err(malformed("coreference type given without antecedent".into()));
                }
                (Some(target), coref) => {
                    (Antecedent::Linked(target), coref.unwrap_or(CorefType::Identity))
                }
                (None, _) => (Antecedent::Absent, CorefType::None),
            };

            sentences[sentence].push(id);
            markables.push(Markable {
                id,
                text,
                sentence,
                form,
                entity_type,
                function,
                definiteness,
                info_status,
                antecedent,
                coref_type,
            });
        }

        Ok(Self {
            markables,
            sentences,
        })
    }

    /// Number of markables.
    pub fn len(&self) -> usize {
        self.markables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markables.is_empty()
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    pub fn get(&self, id: MarkableId) -> Option<&Markable> {
        self.markables.get(id.index())
    }

    /// All markables in reading order.
    pub fn markables(&self) -> &[Markable] {
        &self.markables
    }

    /// Ids of the markables in one sentence, in reading order.
    ///
    /// Out-of-range indices yield an empty slice.
    pub fn sentence(&self, index: usize) -> &[MarkableId] {
        self.sentences.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over `(sentence index, markable ids)`.
    pub fn sentences(&self) -> impl Iterator<Item = (usize, &[MarkableId])> {
        self.sentences
            .iter()
            .enumerate()
            .map(|(index, ids)| (index, ids.as_slice()))
    }

    /// Follow the antecedent chain of `id` to the markable without one.
    pub fn root_of(&self, id: MarkableId) -> MarkableId {
        let mut current = id;
        // Antecedent indices strictly decrease, so at most `len` steps.
        for _ in 0..=self.markables.len() {
            match self.get(current).map(|m| m.antecedent) {
                Some(Antecedent::Linked(previous)) if previous < current => current = previous,
                _ => break,
            }
        }
        current
    }

    /// Lowercased text of the chain root of `id`.
    pub fn canonical_of(&self, id: MarkableId) -> Canonical {
        match self.get(self.root_of(id)) {
            Some(root) => Canonical::Text(root.text.to_lowercase()),
            None => Canonical::NoAntecedent,
        }
    }

    /// Attach a bridging antecedent. The only mutation the arena allows.
    pub(crate) fn link_bridge(&mut self, id: MarkableId, antecedent: MarkableId) -> CenteringResult<()> {
        let invalid = |reason: &str| CenteringError::InvalidBridge {
            id,
            antecedent,
            reason: reason.to_string(),
        };

        if antecedent >= id {
            return Err(invalid("antecedent does not precede the markable"));
        }
        let markable = self
            .markables
            .get_mut(id.index())
            .ok_or_else(|| invalid("markable is not in the document"))?;
        if !markable.antecedent.is_absent() {
            return Err(invalid("markable already has an antecedent"));
        }

        markable.antecedent = Antecedent::Linked(antecedent);
        markable.coref_type = CorefType::Bridge;
        Ok(())
    }
}

impl Index<MarkableId> for Document {
    type Output = Markable;

    fn index(&self, id: MarkableId) -> &Markable {
        &self.markables[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markable::{Definiteness, Form, GrammaticalFunction};

    fn father_document() -> Document {
        Document::from_inputs(
            vec![
                MarkableInput::new("I", 0).with_form(Form::Pronoun),
                MarkableInput::new("My father", 1)
                    .with_form(Form::Common)
                    .with_definiteness(Definiteness::Definite),
                MarkableInput::new("He", 2)
                    .with_form(Form::Pronoun)
                    .with_antecedent(MarkableId(1)),
                MarkableInput::new("he", 3)
                    .with_form(Form::Pronoun)
                    .with_antecedent(MarkableId(2)),
            ],
            4,
        )
        .unwrap()
    }

    #[test]
    fn test_sentences_group_ids() {
        let doc = Document::from_inputs(
            vec![
                MarkableInput::new("a", 0),
                MarkableInput::new("b", 0),
                MarkableInput::new("c", 2),
            ],
            3,
        )
        .unwrap();

        assert_eq!(doc.sentence_count(), 3);
        assert_eq!(doc.sentence(0), &[MarkableId(0), MarkableId(1)]);
        assert!(doc.sentence(1).is_empty());
        assert_eq!(doc.sentence(2), &[MarkableId(2)]);
        assert!(doc.sentence(7).is_empty());
    }

    #[test]
    fn test_canonical_follows_chain_to_root() {
        let doc = father_document();
        assert_eq!(doc.root_of(MarkableId(3)), MarkableId(1));
        assert_eq!(doc.canonical_of(MarkableId(3)), Canonical::Text("my father".into()));
        assert_eq!(doc.canonical_of(MarkableId(0)), Canonical::Text("i".into()));
    }

    #[test]
    fn test_canonical_is_idempotent() {
        let doc = father_document();
        for markable in doc.markables() {
            let root = doc.root_of(markable.id);
            assert_eq!(doc.root_of(root), root);
            assert!(doc[root].antecedent.is_absent());
            assert_eq!(doc.canonical_of(root), doc.canonical_of(markable.id));
        }
    }

    #[test]
    fn test_sentinels_never_match() {
        let text = Canonical::Text("he".into());
        assert_ne!(Canonical::NoMarkables, Canonical::NoAntecedent);
        assert_ne!(Canonical::NoMarkables, Canonical::NoMarkables);
        assert_ne!(Canonical::NoAntecedent, Canonical::NoAntecedent);
        assert_ne!(Canonical::NoAntecedent, text);
        assert_ne!(Canonical::NoMarkables, text);
        assert!(Canonical::NoMarkables.is_sentinel());
        assert!(!text.is_sentinel());
    }

    #[test]
    fn test_missing_attribute_is_malformed() {
        let mut input = MarkableInput::new("it", 0);
        input.function = None;
        let err = Document::from_inputs(vec![input], 1).unwrap_err();
        assert!(matches!(
            err,
            CenteringError::MalformedMarkable { id: MarkableId(0), sentence: Some(0), ref reason }
                if reason == "missing grammatical function"
        ));
    }

    #[test]
    fn test_forward_antecedent_is_malformed() {
        let inputs = vec![
            MarkableInput::new("it", 0).with_antecedent(MarkableId(1)),
            MarkableInput::new("the box", 0),
        ];
        let err = Document::from_inputs(inputs, 1).unwrap_err();
        assert!(matches!(err, CenteringError::MalformedMarkable { id: MarkableId(0), .. }));
    }

    #[test]
    fn test_sentence_out_of_range_is_malformed() {
        let err = Document::from_inputs(vec![MarkableInput::new("it", 2)], 2).unwrap_err();
        assert!(matches!(err, CenteringError::MalformedMarkable { sentence: Some(2), .. }));
    }

    #[test]
    fn test_sentence_order_is_checked() {
        let inputs = vec![MarkableInput::new("b", 1), MarkableInput::new("a", 0)];
        let err = Document::from_inputs(inputs, 2).unwrap_err();
        assert!(matches!(err, CenteringError::MalformedMarkable { id: MarkableId(1), .. }));
    }

    #[test]
    fn test_coref_type_without_antecedent_is_malformed() {
        let mut input = MarkableInput::new("it", 0);
        input.coref_type = Some(CorefType::Identity);
        assert!(Document::from_inputs(vec![input], 1).is_err());
    }

    #[test]
    fn test_link_bridge_only_once() {
        let mut doc = Document::from_inputs(
            vec![
                MarkableInput::new("a house", 0),
                MarkableInput::new("the door", 1)
                    .with_form(Form::Common)
                    .with_function(GrammaticalFunction::Subject),
            ],
            2,
        )
        .unwrap();

        doc.link_bridge(MarkableId(1), MarkableId(0)).unwrap();
        assert_eq!(doc[MarkableId(1)].antecedent, Antecedent::Linked(MarkableId(0)));
        assert_eq!(doc[MarkableId(1)].coref_type, CorefType::Bridge);

        let err = doc.link_bridge(MarkableId(1), MarkableId(0)).unwrap_err();
        assert!(matches!(err, CenteringError::InvalidBridge { .. }));
    }

    #[test]
    fn test_link_bridge_rejects_later_target() {
        let mut doc = Document::from_inputs(
            vec![MarkableInput::new("a", 0), MarkableInput::new("b", 0)],
            1,
        )
        .unwrap();
        assert!(doc.link_bridge(MarkableId(0), MarkableId(1)).is_err());
        assert!(doc[MarkableId(0)].antecedent.is_absent());
    }
}
