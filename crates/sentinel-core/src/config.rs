//! Shared configuration, loaded from an optional TOML file.
//!
//! Every field has a default, so an empty file (or none) is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::report::RiskTier;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelConfig {
    pub scoring: ScoringPolicy,
    pub retrieval: RetrievalLimits,
    pub classifier: ClassifierSettings,
    pub provider: ProviderSettings,
}

impl SentinelConfig {
    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&raw)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.scoring.validate()?;
        Ok(config)
    }
}

/// Verdict weights and risk-tier thresholds.
///
/// These are hand-tuned policy values, not properties of the law.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub valid_weight: u32,
    pub risky_weight: u32,
    pub invalid_weight: u32,
    /// Score strictly below this is High.
    pub high_below: u8,
    /// Score strictly below this is Medium.
    pub medium_below: u8,
    /// More RISKY verdicts than this is Medium.
    pub medium_risky_above: usize,
    /// Tier reported when there are no clauses at all.
    pub empty_tier: RiskTier,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            valid_weight: 100,
            risky_weight: 50,
            invalid_weight: 0,
            high_below: 50,
            medium_below: 75,
            medium_risky_above: 2,
            empty_tier: RiskTier::Low,
        }
    }
}

impl ScoringPolicy {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, w) in [
            ("valid_weight", self.valid_weight),
            ("risky_weight", self.risky_weight),
            ("invalid_weight", self.invalid_weight),
        ] {
            if w > 100 {
                return Err(ConfigError::Invalid(format!("{name} must be <= 100, got {w}")));
            }
        }
        if self.risky_weight > self.valid_weight || self.invalid_weight > self.risky_weight {
            return Err(ConfigError::Invalid(
                "weights must satisfy valid >= risky >= invalid".into(),
            ));
        }
        if self.high_below > self.medium_below {
            return Err(ConfigError::Invalid(
                "high_below must not exceed medium_below".into(),
            ));
        }
        Ok(())
    }
}

/// Per-corpus result counts and output block sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalLimits {
    pub statute_top_k: usize,
    pub reference_top_k: usize,
    pub contract_top_k: usize,
    /// Max characters per retrieved item in a context block.
    pub block_chars: usize,
    /// Max characters of clause text in the risky-clause summary.
    pub risky_excerpt_chars: usize,
    /// Max characters of clause text in the heuristic risk relabeling.
    pub heuristic_excerpt_chars: usize,
}

impl Default for RetrievalLimits {
    fn default() -> Self {
        Self {
            statute_top_k: 3,
            reference_top_k: 2,
            contract_top_k: 3,
            block_chars: 500,
            risky_excerpt_chars: 200,
            heuristic_excerpt_chars: 150,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    /// Verdict display copies longer than this are cut with an ellipsis.
    pub display_cap: usize,
    /// Extracted documents shorter than this are rejected.
    pub min_document_chars: usize,
    pub min_clause_chars: usize,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            display_cap: 200,
            min_document_chars: 50,
            min_clause_chars: crate::split::DEFAULT_MIN_CLAUSE_CHARS,
        }
    }
}

/// Remote embedding / completion provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub base_url: String,
    pub embedding_model: String,
    pub completion_model: String,
    pub timeout_secs: u64,
    /// Dimension of provider and hash-fallback vectors.
    pub dimension: usize,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            embedding_model: "models/embedding-001".into(),
            completion_model: "gemini-flash-latest".into(),
            timeout_secs: 20,
            dimension: 768,
        }
    }
}
