//! Resolver configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default squared-length threshold below which a translation counts as zero
pub const IDENTITY_POSITION_EPSILON_SQ: f64 = 1e-12;

/// Default tolerance on `|1 - w|` below which a rotation counts as identity
pub const IDENTITY_ROTATION_EPSILON: f64 = 1e-6;

/// Root frame preferred when the current one disappears
pub const DEFAULT_ROOT_FRAME: &str = "map";

/// How the tree builder finds the outgoing edges of a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStrategy {
    /// Index edges by parent once per snapshot, O(V + E)
    #[default]
    Indexed,
    /// Rescan every edge for every visited frame, O(V × E)
    Rescan,
}

impl fmt::Display for BuildStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStrategy::Indexed => f.write_str("indexed"),
            BuildStrategy::Rescan => f.write_str("rescan"),
        }
    }
}

impl FromStr for BuildStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "indexed" => Ok(BuildStrategy::Indexed),
            "rescan" => Ok(BuildStrategy::Rescan),
            other => Err(Error::InvalidData(format!("unknown build strategy: {}", other))),
        }
    }
}

/// Configuration shared by the tree builder and the frame transform utility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Squared translation length under which a transform is treated as identity
    pub identity_position_epsilon_sq: f64,
    /// Tolerance on the quaternion scalar part for the identity test
    pub identity_rotation_epsilon: f64,
    /// Edge lookup strategy for tree builds
    pub strategy: BuildStrategy,
    /// Preferred root frame when choosing a default
    pub default_root: String,
    /// Length of the drawn frame axes
    pub axis_scale: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            identity_position_epsilon_sq: IDENTITY_POSITION_EPSILON_SQ,
            identity_rotation_epsilon: IDENTITY_ROTATION_EPSILON,
            strategy: BuildStrategy::Indexed,
            default_root: DEFAULT_ROOT_FRAME.to_string(),
            axis_scale: 1.0,
        }
    }
}

impl ResolverConfig {
    pub fn with_strategy(mut self, strategy: BuildStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_identity_tolerances(
        mut self,
        position_epsilon_sq: f64,
        rotation_epsilon: f64,
    ) -> Self {
        self.identity_position_epsilon_sq = position_epsilon_sq;
        self.identity_rotation_epsilon = rotation_epsilon;
        self
    }

    pub fn with_default_root<S: Into<String>>(mut self, root: S) -> Self {
        self.default_root = root.into();
        self
    }

    pub fn with_axis_scale(mut self, scale: f64) -> Self {
        self.axis_scale = scale;
        self
    }

    /// Reject tolerances that would make the identity test meaningless
    pub fn validate(&self) -> Result<()> {
        if !(self.identity_position_epsilon_sq >= 0.0) {
            return Err(Error::InvalidData(format!(
                "identity_position_epsilon_sq must be non-negative, got {}",
                self.identity_position_epsilon_sq
            )));
        }
        if !(self.identity_rotation_epsilon >= 0.0) {
            return Err(Error::InvalidData(format!(
                "identity_rotation_epsilon must be non-negative, got {}",
                self.identity_rotation_epsilon
            )));
        }
        Ok(())
    }
}
