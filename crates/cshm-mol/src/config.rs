//! Analysis configuration

use cshm_algos::OptimizerConfig;
use serde::{Deserialize, Serialize};

use crate::builder::PianoStoolOptions;
use crate::error::AnalysisResult;
use crate::pattern::PatternParams;
use crate::rings::RingDetectionParams;

/// Every tunable of a coordination analysis run.
///
/// Missing fields take their defaults, so a JSON override only needs the
/// values it changes:
///
/// ```
/// use cshm_mol::AnalysisConfig;
///
/// let config = AnalysisConfig::from_json(r#"{ "optimizer": { "mode": "intensive", "seed": 42 } }"#).unwrap();
/// assert_eq!(config.optimizer.seed, Some(42));
/// assert_eq!(config.rings.bond_threshold, 1.8);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub rings: RingDetectionParams,
    pub patterns: PatternParams,
    pub piano_stool: PianoStoolOptions,
    pub optimizer: OptimizerConfig,
    /// Evaluate candidate geometries on the rayon thread pool
    pub parallel: bool,
}

impl AnalysisConfig {
    pub fn from_json(json: &str) -> AnalysisResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> AnalysisResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use cshm_algos::SearchMode;

    #[test]
    fn test_partial_override() {
        let config = AnalysisConfig::from_json(r#"{ "rings": { "bond_threshold": 1.6 }, "parallel": true }"#).unwrap();
        assert_eq!(config.rings.bond_threshold, 1.6);
        assert_eq!(config.rings.max_ring_size, 8);
        assert!(config.parallel);
        assert_eq!(config.optimizer.mode, SearchMode::Default);
        assert_eq!(config.patterns, PatternParams::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = AnalysisConfig::default();
        config.piano_stool.compare_full_set = true;
        config.optimizer = OptimizerConfig::new(SearchMode::Intensive).with_seed(9);
        let back = AnalysisConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_invalid_json() {
        let err = AnalysisConfig::from_json("{ \"parallel\": 3 }").unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }
}
