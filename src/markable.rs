//! Markables: referring expressions handed over by the coreference resolver.
//!
//! A markable is one noun phrase or pronoun inside one sentence. Markables are
//! identified by their position in reading order ([`MarkableId`]), and an
//! antecedent link always points at a strictly earlier markable.
//!
//! ```text
//! I have a different experience. My father was a small-businessman. He worked hard.
//! ╰m0                            ╰──m1───╯                           ╰m2
//!                                    ▲────────── antecedent ──────────╯
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a markable in document reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkableId(pub usize);

impl MarkableId {
    /// Index into the document's markable arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for MarkableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Surface form of a markable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Form {
    Pronoun,
    Common,
    Proper,
    Other,
}

/// Grammatical function of a markable in its clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammaticalFunction {
    #[serde(alias = "nsubj", alias = "subj")]
    Subject,
    #[serde(alias = "dobj", alias = "obj")]
    DirectObject,
    #[serde(alias = "iobj")]
    IndirectObject,
    Other,
}

impl GrammaticalFunction {
    /// Salience on the subject > direct object > indirect object > other scale.
    pub fn salience(self) -> u8 {
        match self {
            Self::Subject => 4,
            Self::DirectObject => 3,
            Self::IndirectObject => 2,
            Self::Other => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Definiteness {
    #[serde(alias = "def")]
    Definite,
    #[serde(alias = "indef")]
    Indefinite,
    Unknown,
}

/// Information status: whether the referent was already in the discourse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoStatus {
    #[serde(alias = "giv")]
    Given,
    New,
}

/// How a markable got its antecedent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorefType {
    None,
    /// Identity coreference from the external resolver.
    Identity,
    /// Link added by the bridging resolver.
    Bridge,
}

/// Antecedent link. `Absent` is the "no antecedent" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Antecedent {
    Absent,
    Linked(MarkableId),
}

impl Antecedent {
    pub fn id(self) -> Option<MarkableId> {
        match self {
            Self::Absent => None,
            Self::Linked(id) => Some(id),
        }
    }

    pub fn is_absent(self) -> bool {
        self == Self::Absent
    }
}

/// A validated markable stored in a [`Document`](crate::Document).
///
/// Only `antecedent` and `coref_type` ever change, and only through the
/// bridging resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct Markable {
    pub id: MarkableId,
    /// Surface text as it appears in the sentence
    pub text: String,
    /// 0-based index of the containing sentence
    pub sentence: usize,
    pub form: Form,
    /// Semantic class from the resolver (person, organization, ...)
    pub entity_type: String,
    pub function: GrammaticalFunction,
    pub definiteness: Definiteness,
    pub info_status: InfoStatus,
    pub antecedent: Antecedent,
    pub coref_type: CorefType,
}

/// A markable as produced by the external resolver, before validation.
///
/// Every attribute is optional so that incomplete records can be reported
/// instead of being unrepresentable. Ids are not part of the record: they
/// are assigned from the position in the input sequence.
///
/// ```
/// use layered_centering::{Form, GrammaticalFunction, MarkableId, MarkableInput};
///
/// let he = MarkableInput::new("He", 2)
///     .with_form(Form::Pronoun)
///     .with_function(GrammaticalFunction::Subject)
///     .with_antecedent(MarkableId(1));
/// assert_eq!(he.antecedent, Some(MarkableId(1)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkableInput {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub sentence: Option<usize>,
    #[serde(default)]
    pub form: Option<Form>,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub function: Option<GrammaticalFunction>,
    #[serde(default)]
    pub definiteness: Option<Definiteness>,
    #[serde(default)]
    pub info_status: Option<InfoStatus>,
    /// Identity antecedent, if the resolver found one
    #[serde(default)]
    pub antecedent: Option<MarkableId>,
    /// Defaults to `identity` when an antecedent is given, `none` otherwise
    #[serde(default)]
    pub coref_type: Option<CorefType>,
}

impl MarkableInput {
    /// A complete record with neutral attributes: form `other`, function
    /// `other`, definiteness `unknown`, status `new`, entity type `abstract`.
    pub fn new(text: impl Into<String>, sentence: usize) -> Self {
        Self {
            text: Some(text.into()),
            sentence: Some(sentence),
            form: Some(Form::Other),
            entity_type: Some("abstract".to_string()),
            function: Some(GrammaticalFunction::Other),
            definiteness: Some(Definiteness::Unknown),
            info_status: Some(InfoStatus::New),
            antecedent: None,
            coref_type: None,
        }
    }

    pub fn with_form(mut self, form: Form) -> Self {
        self.form = Some(form);
        self
    }

    pub fn with_function(mut self, function: GrammaticalFunction) -> Self {
        self.function = Some(function);
        self
    }

    pub fn with_definiteness(mut self, definiteness: Definiteness) -> Self {
        self.definiteness = Some(definiteness);
        self
    }

    pub fn with_info_status(mut self, info_status: InfoStatus) -> Self {
        self.info_status = Some(info_status);
        self
    }

    pub fn with_entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }

    /// Link to an earlier markable with identity coreference.
    pub fn with_antecedent(mut self, antecedent: MarkableId) -> Self {
        self.antecedent = Some(antecedent);
        self.coref_type = Some(CorefType::Identity);
        self.info_status = Some(InfoStatus::Given);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salience_hierarchy() {
        assert!(GrammaticalFunction::Subject.salience() > GrammaticalFunction::DirectObject.salience());
        assert!(
            GrammaticalFunction::DirectObject.salience()
                > GrammaticalFunction::IndirectObject.salience()
        );
        assert!(GrammaticalFunction::IndirectObject.salience() > GrammaticalFunction::Other.salience());
    }

    #[test]
    fn test_input_from_resolver_codes() {
        let text = r#"[
            (text: Some("My father"), sentence: Some(1), form: Some(common), entity_type: Some("person"),
             function: Some(nsubj), definiteness: Some(def), info_status: Some(new)),
            (text: Some("He"), sentence: Some(2), form: Some(pronoun), entity_type: Some("person"),
             function: Some(subject), definiteness: Some(definite), info_status: Some(giv),
             antecedent: Some(0)),
        ]"#;
        let inputs: Vec<MarkableInput> = ron::from_str(text).unwrap();

        assert_eq!(inputs[0].function, Some(GrammaticalFunction::Subject));
        assert_eq!(inputs[0].definiteness, Some(Definiteness::Definite));
        assert_eq!(inputs[0].antecedent, None);
        assert_eq!(inputs[1].info_status, Some(InfoStatus::Given));
        assert_eq!(inputs[1].antecedent, Some(MarkableId(0)));
        assert_eq!(inputs[1].coref_type, None);
    }

    #[test]
    fn test_missing_fields_deserialize_as_none() {
        let input: MarkableInput = ron::from_str(r#"(text: Some("it"))"#).unwrap();
        assert_eq!(input.sentence, None);
        assert_eq!(input.form, None);
    }

    #[test]
    fn test_with_antecedent_marks_identity() {
        let input = MarkableInput::new("it", 1).with_antecedent(MarkableId(0));
        assert_eq!(input.coref_type, Some(CorefType::Identity));
        assert_eq!(input.info_status, Some(InfoStatus::Given));
    }
}
