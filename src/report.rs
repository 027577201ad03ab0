//! The coherence report and its trace rendering.
//!
//! ```text
//! s0  cb (none)  cf [I]
//! s1  cb (none)  cf [my father]
//! s2  cb He      cf [He]
//! s0 -> s1  RETAIN        EXPENSIVE
//! s1 -> s2  CONTINUE      CHEAP
//! score 0.7222
//! ```

use std::fmt;

use unicode_width::UnicodeWidthStr;

use crate::backward_center::BackwardCenter;
use crate::bridging::BridgingReport;
use crate::document::Document;
use crate::forward_center::ForwardCenters;
use crate::transition::Transition;

/// Everything a pipeline run produced for one document.
#[derive(Debug, Clone)]
pub struct CoherenceReport {
    /// The document after bridging
    pub document: Document,
    pub bridging: BridgingReport,
    pub forward: Vec<ForwardCenters>,
    pub backward: Vec<BackwardCenter>,
    pub transitions: Vec<Transition>,
    pub score: f64,
}

impl CoherenceReport {
    /// Number of non-placeholder transitions.
    pub fn scored_transitions(&self) -> usize {
        self.transitions.iter().filter(|t| !t.placeholder).count()
    }

    /// Sentences whose backward center is a tie.
    pub fn ambiguous_sentences(&self) -> Vec<usize> {
        self.backward
            .iter()
            .enumerate()
            .filter(|(_, cb)| cb.is_ambiguous())
            .map(|(sentence, _)| sentence)
            .collect()
    }

    fn render_center(&self, center: &BackwardCenter) -> String {
        match center {
            BackwardCenter::NoAntecedent => "(none)".to_string(),
            BackwardCenter::NoMarkables => "(empty)".to_string(),
            _ => center
                .candidates()
                .iter()
                .map(|&id| self.document[id].text.as_str())
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }
}

impl fmt::Display for CoherenceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let centers: Vec<String> = self.backward.iter().map(|cb| self.render_center(cb)).collect();
        let width = centers.iter().map(|c| c.width()).max().unwrap_or(0);

        for (sentence, center) in centers.iter().enumerate() {
            let cf = self
                .forward
                .get(sentence)
                .map(|centers| {
                    centers
                        .ids()
                        .map(|id| self.document[id].text.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            let padding = " ".repeat(width - center.width());
            writeln!(f, "s{}  cb {}{}  cf [{}]", sentence, center, padding, cf)?;
        }

        for transition in &self.transitions {
            write!(
                f,
                "s{} -> s{}  {:<12}  {}",
                transition.from, transition.to, transition.kind, transition.cost
            )?;
            if transition.placeholder {
                write!(f, "  (placeholder)")?;
            }
            writeln!(f)?;
        }

        write!(f, "score {:.4}", self.score)
    }
}
