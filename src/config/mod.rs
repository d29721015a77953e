//! Tree configuration
//!
//! A tree is configured once, at construction time, with a
//! [`TreeConfig`]. The configuration can be built in code or loaded from
//! JSON; both paths go through the same ratio validation.

mod error;

pub use error::{ConfigError, ConfigResult};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::abtree::{AbTreeError, AbTreeResult};

/// Default alpha numerator
pub const DEFAULT_TOP: u32 = 2;

/// Default alpha denominator
pub const DEFAULT_BOTTOM: u32 = 3;

/// Balance threshold alpha = top / bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRatio {
    pub top: u32,
    pub bottom: u32,
}

impl BalanceRatio {
    pub fn new(top: u32, bottom: u32) -> Self {
        Self { top, bottom }
    }

    /// Check that 1/2 < top/bottom < 1 holds strictly
    pub fn validate(&self) -> AbTreeResult<()> {
        let top = u64::from(self.top);
        let bottom = u64::from(self.bottom);

        if bottom == 0 || top * 2 <= bottom || top >= bottom {
            debug!(top = self.top, bottom = self.bottom, "rejected balance ratio");
            return Err(AbTreeError::InvalidRatio {
                top: self.top,
                bottom: self.bottom,
            });
        }

        Ok(())
    }
}

impl Default for BalanceRatio {
    fn default() -> Self {
        Self::new(DEFAULT_TOP, DEFAULT_BOTTOM)
    }
}

/// Construction-time tree configuration
///
/// When `self_balancing` is false the ratio is carried but never consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub self_balancing: bool,
    pub ratio: BalanceRatio,
}

impl TreeConfig {
    /// Create a validated configuration
    pub fn new(self_balancing: bool, ratio: BalanceRatio) -> AbTreeResult<Self> {
        let config = Self {
            self_balancing,
            ratio,
        };
        config.validate()?;
        Ok(config)
    }

    /// A plain binary search tree that never rebalances
    pub fn unbalanced() -> Self {
        Self::default()
    }

    /// A self-balancing tree with alpha = 2/3
    pub fn balanced() -> Self {
        Self {
            self_balancing: true,
            ratio: BalanceRatio::default(),
        }
    }

    /// Validate the ratio (only relevant in self-balancing mode)
    pub fn validate(&self) -> AbTreeResult<()> {
        if self.self_balancing {
            self.ratio.validate()?;
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON text
    ///
    /// Missing fields fall back to their defaults, so `{}` yields an
    /// unbalanced tree and `{"self_balancing": true}` a 2/3 tree.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: TreeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
