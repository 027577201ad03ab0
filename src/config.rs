//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::backward_center::TiePolicy;
use crate::bridging::{BridgingConfig, BridgingMode};
use crate::errors::{CenteringError, CenteringResult};
use crate::scoring::ScoringWeights;
use crate::transition::EmptySentencePolicy;

/// Settings for one pipeline run.
///
/// Every field has a default, so a RON file only needs the values it
/// changes:
///
/// ```
/// use layered_centering::{BridgingMode, CenteringConfig};
///
/// let config = CenteringConfig::from_ron_str("(bridging: (mode: liberal))").unwrap();
/// assert_eq!(config.bridging.mode, BridgingMode::Liberal);
/// assert_eq!(config.scoring.type_weight, 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CenteringConfig {
    pub bridging: BridgingConfig,
    /// Type:cost ratio of the coherence score
    pub scoring: ScoringWeights,
    pub tie_policy: TiePolicy,
    pub empty_sentences: EmptySentencePolicy,
}

impl CenteringConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with conservative bridging.
    pub fn conservative() -> Self {
        Self::default()
    }

    /// Defaults with liberal bridging.
    pub fn liberal() -> Self {
        Self {
            bridging: BridgingConfig {
                mode: BridgingMode::Liberal,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Parse and validate a RON configuration.
    pub fn from_ron_str(text: &str) -> CenteringResult<Self> {
        let config: Self = ron::from_str(text).map_err(|e| CenteringError::InvalidConfig {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> CenteringResult<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new()).map_err(|e| {
            CenteringError::InvalidConfig {
                message: e.to_string(),
            }
        })
    }

    pub fn validate(&self) -> CenteringResult<()> {
        self.scoring.validate()
    }
}
