//! Decision Tree Configuration
//!
//! Construction time settings of the [`crate::DecisionTree`] estimator and
//! their validation.
use crate::criterion::CriterionKind;
use crate::errors::TreeError;
use crate::grower::GrowPolicy;
use crate::splitter::SplitterKind;
use crate::utils::{validate_float_parameter, validate_min_parameter};
use serde::{Deserialize, Serialize};

/// Number of features visited per split search.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Default)]
pub enum MaxFeatures {
    /// Every feature.
    #[default]
    All,
    /// Square root of the feature count.
    Sqrt,
    /// Base two logarithm of the feature count.
    Log2,
    /// A fixed count, clamped to the feature count.
    Count(usize),
    /// A fraction in `(0, 1]` of the feature count.
    Fraction(f64),
}

impl MaxFeatures {
    /// Resolve against `n_features`, never below one.
    pub fn resolve(&self, n_features: usize) -> Result<usize, TreeError> {
        let n = n_features as f64;
        let resolved = match *self {
            MaxFeatures::All => n_features,
            MaxFeatures::Sqrt => n.sqrt() as usize,
            MaxFeatures::Log2 => {
                if n_features == 0 {
                    0
                } else {
                    n.log2() as usize
                }
            }
            MaxFeatures::Count(count) => {
                validate_min_parameter(count, 1, "max_features")?;
                count
            }
            MaxFeatures::Fraction(fraction) => {
                if fraction.is_nan() || fraction <= 0.0 || fraction > 1.0 {
                    return Err(TreeError::InvalidParameter(
                        "max_features".to_string(),
                        "fraction within (0, 1]".to_string(),
                        fraction.to_string(),
                    ));
                }
                (fraction * n) as usize
            }
        };
        Ok(resolved.max(1))
    }
}

fn default_min_samples_split() -> usize {
    2
}
fn default_min_samples_leaf() -> usize {
    1
}

/// Configuration for the `DecisionTree`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct DecisionTreeConfig {
    /// Impurity measure.
    #[serde(default)]
    pub criterion: CriterionKind,
    /// Split search strategy.
    #[serde(default)]
    pub splitter: SplitterKind,
    /// Expansion order. When unset, best-first is used iff `max_leaf_nodes` is set.
    #[serde(default)]
    pub grow_policy: Option<GrowPolicy>,
    /// Features visited per split search.
    #[serde(default)]
    pub max_features: MaxFeatures,
    /// Nodes with fewer samples are not split.
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,
    /// Minimum number of samples in each leaf.
    #[serde(default = "default_min_samples_leaf")]
    pub min_samples_leaf: usize,
    /// Minimum share of the total sample weight in each leaf.
    #[serde(default)]
    pub min_weight_fraction_leaf: f64,
    /// Depth limit of depth-first growth, unbounded when unset.
    #[serde(default)]
    pub max_depth: Option<usize>,
    /// Leaf limit of best-first growth, unbounded when unset.
    #[serde(default)]
    pub max_leaf_nodes: Option<usize>,
    /// Seed for random number generation.
    #[serde(default)]
    pub random_state: u64,
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        DecisionTreeConfig {
            criterion: CriterionKind::Gini,
            splitter: SplitterKind::Best,
            grow_policy: None,
            max_features: MaxFeatures::All,
            min_samples_split: 2,
            min_samples_leaf: 1,
            min_weight_fraction_leaf: 0.0,
            max_depth: None,
            max_leaf_nodes: None,
            random_state: 0,
        }
    }
}

impl DecisionTreeConfig {
    pub fn validate(&self) -> Result<(), TreeError> {
        validate_min_parameter(self.min_samples_split, 2, "min_samples_split")?;
        validate_min_parameter(self.min_samples_leaf, 1, "min_samples_leaf")?;
        validate_float_parameter(self.min_weight_fraction_leaf, 0.0, 0.5, "min_weight_fraction_leaf")?;
        if let Some(max_depth) = self.max_depth {
            validate_min_parameter(max_depth, 1, "max_depth")?;
        }
        if let Some(max_leaf_nodes) = self.max_leaf_nodes {
            validate_min_parameter(max_leaf_nodes, 2, "max_leaf_nodes")?;
        }
        // Resolving against one feature catches invalid counts and fractions.
        self.max_features.resolve(1)?;
        Ok(())
    }

    /// The expansion order actually used.
    pub fn effective_grow_policy(&self) -> GrowPolicy {
        match (self.grow_policy, self.max_leaf_nodes) {
            (Some(policy), _) => policy,
            (None, Some(_)) => GrowPolicy::BestFirst,
            (None, None) => GrowPolicy::DepthFirst,
        }
    }

    /// `min_samples_split`, raised so that a split node can hold two leaves.
    pub fn effective_min_samples_split(&self) -> usize {
        self.min_samples_split.max(self.min_samples_leaf.saturating_mul(2))
    }
}
