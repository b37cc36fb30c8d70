//! Scoring configuration.
//!
//! Replaces the source's dynamically-attribute-accessed nested dictionary
//! with an explicit, validated structure: unknown keys are rejected at
//! load time rather than silently ignored.

use serde::Deserialize;
use thiserror::Error;

use crate::topology::TopologyThresholds;

/// Errors produced while loading or validating a [`ScoringConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The configuration file could not be parsed, or referenced an
    /// unrecognized option.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A recognized field held a value outside its valid range.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// All tunable parameters of the scoring pipeline. Every field has a
/// default matching the reference implementation's defaults; unknown keys
/// in a loaded file are a hard error.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ScoringConfig {
    /// Propagation restart probability. Reserved for a future PRINCE-style
    /// pre-processor; unused by the scoring path itself.
    pub alpha: f64,
    /// Number of degree-preserving randomizations per proximity query.
    pub n_randomizations: usize,
    /// Number of equal-count degree bands in the degree-bin table.
    pub degree_bins: usize,
    /// Quantile used to derive a drug's up/down sets from a raw
    /// differential-expression vector.
    pub top_pct: f64,
    /// Topology classifier distance threshold for "close to the disease".
    pub close_threshold: f64,
    /// Topology classifier complementary/intermediate score divisor.
    pub k: f64,
    /// Topology classifier redundant score divisor.
    pub l: f64,
    /// Base seed all per-task RNG streams are derived from.
    pub random_seed: u64,
    /// Worker-pool size; `None` defers to the available core count.
    pub parallelism: Option<usize>,
    /// Caps the number of drug pairs enumerated per disease, for testing.
    pub max_pairs: Option<usize>,
    /// Relative weights applied to (T, P, C) before summation. Defaults to
    /// unweighted 1:1:1, matching the source.
    pub component_weights: (f64, f64, f64),
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            n_randomizations: 1000,
            degree_bins: 20,
            top_pct: 0.05,
            close_threshold: 3.0,
            k: 10.0,
            l: 5.0,
            random_seed: 42,
            parallelism: None,
            max_pairs: None,
            component_weights: (1.0, 1.0, 1.0),
        }
    }
}

impl ScoringConfig {
    /// Parses a configuration from TOML text, then validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or an unknown
    /// field, and [`ConfigError::InvalidValue`] if a recognized field holds
    /// an out-of-range value.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration from a TOML file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, and the same
    /// errors as [`ScoringConfig::from_toml_str`] otherwise.
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Validates field ranges not expressible in the type system alone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first field found
    /// outside its valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_randomizations == 0 {
            return Err(ConfigError::InvalidValue {
                field: "n_randomizations",
                reason: "must be at least 1".to_owned(),
            });
        }
        if self.degree_bins == 0 {
            return Err(ConfigError::InvalidValue {
                field: "degree_bins",
                reason: "must be at least 1".to_owned(),
            });
        }
        if !(0.0..=1.0).contains(&self.top_pct) {
            return Err(ConfigError::InvalidValue {
                field: "top_pct",
                reason: "must lie in [0, 1]".to_owned(),
            });
        }
        Ok(())
    }

    /// Returns the topology classifier thresholds implied by this
    /// configuration.
    #[must_use]
    pub const fn topology_thresholds(&self) -> TopologyThresholds {
        TopologyThresholds {
            close_threshold: self.close_threshold,
            k: self.k,
            l: self.l,
        }
    }
}
