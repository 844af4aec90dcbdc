//! Configuration system for SignWeight.
//!
//! Load weight configuration from TOML or YAML files to control sign
//! classes, bounds, hierarchy rules and termination without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use signweight_config::{BoundMode, WeightConfig};
//! use signweight_core::{SignClass, SignId};
//! use std::time::Duration;
//!
//! let config = WeightConfig::from_toml_str(r#"
//!     bound_mode = "free"
//!
//!     [classes.authority]
//!     members = [125, 126]
//!     bounds = [3.0, 8.0]
//!
//!     [[hierarchy]]
//!     dominant = "authority"
//!     dominated = "commodity"
//!     margin = 0.5
//!
//!     [termination]
//!     seconds_spent_limit = 30
//! "#).unwrap();
//!
//! assert_eq!(config.bound_mode, BoundMode::Free);
//! assert!(config.classes.authority.members.contains(&SignId(126)));
//! assert_eq!(config.hierarchy[0].dominated, SignClass::Commodity);
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use signweight_config::WeightConfig;
//!
//! let config = WeightConfig::load("weights.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use signweight_core::{Bounds, SignClass, SignId, SignWeightError};
use thiserror::Error;

/// Default hierarchy margin.
pub const DEFAULT_MARGIN: f64 = 0.5;

/// Default validation tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// Bounds applied to every sign in fixed mode.
pub const DEFAULT_FIXED_BOUNDS: Bounds = Bounds::new(0.1, 10.0);

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for SignWeightError {
    fn from(err: ConfigError) -> Self {
        SignWeightError::Config(err.to_string())
    }
}

/// Default bounds of a class, used when the configured ones are missing or invalid.
pub fn default_bounds(class: SignClass) -> Bounds {
    match class {
        SignClass::Authority => Bounds::new(3.0, 8.0),
        SignClass::Commodity => Bounds::new(1.5, 4.0),
        SignClass::Numeral => Bounds::new(0.5, 2.0),
        SignClass::Standard => Bounds::new(1.0, 6.0),
    }
}

/// Main weight configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct WeightConfig {
    /// Per-class bounds ("free") or one bound pair for every sign ("fixed").
    pub bound_mode: BoundMode,

    /// Bounds used for every sign in fixed mode.
    pub fixed_bounds: Bounds,

    /// Numerical tolerance used by the solution validator.
    pub tolerance: f64,

    /// Class membership rules and bounds.
    pub classes: ClassConfig,

    /// Dominance rules between classes.
    pub hierarchy: Vec<HierarchyRule>,

    /// Frequency efficiency rule.
    pub efficiency: EfficiencyConfig,

    /// Class pairs whose mean weight difference is reported.
    pub premiums: Vec<PremiumPair>,

    /// Termination configuration.
    pub termination: Option<TerminationConfig>,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            bound_mode: BoundMode::default(),
            fixed_bounds: DEFAULT_FIXED_BOUNDS,
            tolerance: DEFAULT_TOLERANCE,
            classes: ClassConfig::default(),
            hierarchy: vec![HierarchyRule::new(SignClass::Authority, SignClass::Commodity)],
            efficiency: EfficiencyConfig::default(),
            premiums: vec![PremiumPair::new(SignClass::Authority, SignClass::Commodity)],
            termination: None,
        }
    }
}

impl WeightConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, YAML for `.yaml`/`.yml`, TOML otherwise.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Checks settings that have no sensible fallback.
    ///
    /// Class bounds and hierarchy margins are not checked here; the
    /// classifier and constraint builder fall back to defaults for those.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.bound_mode == BoundMode::Fixed && !self.fixed_bounds.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "fixed_bounds {} are not a valid non-negative range",
                self.fixed_bounds
            )));
        }
        if self.efficiency.enabled && self.efficiency.top_n < 2 {
            return Err(ConfigError::Invalid(
                "efficiency.top_n must be at least 2".to_string(),
            ));
        }
        Ok(())
    }

    /// Sets the bound mode.
    pub fn with_bound_mode(mut self, mode: BoundMode) -> Self {
        self.bound_mode = mode;
        self
    }

    /// Sets the termination time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the explicit members and bounds of the authority class.
    pub fn with_authority(
        mut self,
        members: impl IntoIterator<Item = u32>,
        bounds: Bounds,
    ) -> Self {
        self.classes.authority = MemberClass::new(members, bounds);
        self
    }

    /// Sets the explicit members and bounds of the commodity class.
    pub fn with_commodity(
        mut self,
        members: impl IntoIterator<Item = u32>,
        bounds: Bounds,
    ) -> Self {
        self.classes.commodity = MemberClass::new(members, bounds);
        self
    }

    /// Replaces all hierarchy rules.
    pub fn with_hierarchy(mut self, rules: Vec<HierarchyRule>) -> Self {
        self.hierarchy = rules;
        self
    }

    /// Sets the validator tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Returns the termination time limit, if configured.
    ///
    /// Convenience method that delegates to `termination.time_limit()`.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }
}

/// How weight variable bounds are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundMode {
    /// Each class has its own range, letting classes differentiate.
    #[default]
    Free,

    /// Every sign shares `fixed_bounds`.
    Fixed,
}

/// Class membership rules.
///
/// The default sign lists are a starting point, not a claim about what
/// the signs mean.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ClassConfig {
    pub authority: MemberClass,
    pub commodity: MemberClass,
    pub numeral: NumeralRule,
    pub standard: StandardClass,
}

impl Default for ClassConfig {
    fn default() -> Self {
        Self {
            authority: MemberClass::new(
                [1, 2, 125, 350, 717],
                default_bounds(SignClass::Authority),
            ),
            commodity: MemberClass::new(
                [410, 740, 390, 99, 267, 156, 368, 235],
                default_bounds(SignClass::Commodity),
            ),
            numeral: NumeralRule::default(),
            standard: StandardClass::default(),
        }
    }
}

impl ClassConfig {
    /// Configured bounds of a class, which may be absent or invalid.
    pub fn configured_bounds(&self, class: SignClass) -> Option<Bounds> {
        match class {
            SignClass::Authority => self.authority.bounds,
            SignClass::Commodity => self.commodity.bounds,
            SignClass::Numeral => self.numeral.bounds,
            SignClass::Standard => self.standard.bounds,
        }
    }
}

/// A class defined by an explicit list of sign ids.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct MemberClass {
    pub members: BTreeSet<SignId>,
    pub bounds: Option<Bounds>,
}

impl MemberClass {
    pub fn new(members: impl IntoIterator<Item = u32>, bounds: Bounds) -> Self {
        Self {
            members: members.into_iter().map(SignId).collect(),
            bounds: Some(bounds),
        }
    }
}

/// Heuristic for numeral-like signs not explicitly classified.
///
/// A sign qualifies when its id lies inside `id_range` (if set) and it
/// occurs at least `min_frequency` times.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct NumeralRule {
    /// Inclusive id range of numeral candidates.
    pub id_range: Option<(SignId, SignId)>,
    /// Minimum corpus frequency for a candidate to count as numeral.
    pub min_frequency: u64,
    pub bounds: Option<Bounds>,
}

impl Default for NumeralRule {
    fn default() -> Self {
        Self {
            id_range: Some((SignId(1), SignId(49))),
            min_frequency: 1,
            bounds: Some(default_bounds(SignClass::Numeral)),
        }
    }
}

impl NumeralRule {
    pub fn matches(&self, id: SignId, frequency: u64) -> bool {
        let in_range = self
            .id_range
            .map_or(true, |(lo, hi)| lo <= id && id <= hi);
        in_range && frequency >= self.min_frequency
    }
}

/// Fallback class for everything else.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct StandardClass {
    pub bounds: Option<Bounds>,
}

impl Default for StandardClass {
    fn default() -> Self {
        Self {
            bounds: Some(default_bounds(SignClass::Standard)),
        }
    }
}

/// Signs of `dominant` must outweigh signs of `dominated` by `margin`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HierarchyRule {
    pub dominant: SignClass,
    pub dominated: SignClass,

    #[serde(default = "default_margin")]
    pub margin: f64,

    /// Only the `n` most frequent dominated signs take part. `None` means all.
    ///
    /// Bounds the pair count at `|dominant| * n`; pairs beyond the cap are
    /// not constrained at all.
    #[serde(default)]
    pub dominated_cap: Option<usize>,

    /// Leave modifier signs out of both sides of the rule.
    #[serde(default = "default_true")]
    pub exclude_modifiers: bool,
}

impl HierarchyRule {
    pub fn new(dominant: SignClass, dominated: SignClass) -> Self {
        Self {
            dominant,
            dominated,
            margin: DEFAULT_MARGIN,
            dominated_cap: None,
            exclude_modifiers: true,
        }
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_dominated_cap(mut self, cap: usize) -> Self {
        self.dominated_cap = Some(cap);
        self
    }
}

fn default_margin() -> f64 {
    DEFAULT_MARGIN
}

fn default_true() -> bool {
    true
}

/// Frequent signs should not weigh more than rarer ones (plus `slack`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EfficiencyConfig {
    pub enabled: bool,
    /// Number of most frequent signs considered; split in two halves.
    pub top_n: usize,
    pub slack: f64,
}

impl Default for EfficiencyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            top_n: 20,
            slack: 1.0,
        }
    }
}

/// Mean weight of `over` minus mean weight of `under`, reported as a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PremiumPair {
    pub over: SignClass,
    pub under: SignClass,
}

impl PremiumPair {
    pub fn new(over: SignClass, under: SignClass) -> Self {
        Self { over, under }
    }

    /// Report key, e.g. `authority_over_commodity`.
    pub fn name(&self) -> String {
        format!("{}_over_{}", self.over, self.under)
    }
}

/// Termination configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum milliseconds to spend solving, added to the seconds.
    pub millis_spent_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let limit = Duration::from_secs(self.seconds_spent_limit.unwrap_or(0))
            .saturating_add(Duration::from_millis(self.millis_spent_limit.unwrap_or(0)));
        if limit.is_zero() {
            None
        } else {
            Some(limit)
        }
    }
}

#[cfg(test)]
mod tests;
