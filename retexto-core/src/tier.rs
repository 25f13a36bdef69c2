//! Size tiers and fragmenter configuration

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Default configuration constants, in estimator units
pub mod defaults {
    /// Inputs below this size are never split
    pub const MIN_SPLIT_SIZE: usize = 1_500;

    /// Upper bound of the small-document tier
    pub const SMALL_DOCUMENT: usize = 6_000;

    /// Upper bound of the medium-document tier
    pub const MEDIUM_DOCUMENT: usize = 20_000;

    /// Shared context carried between consecutive fragments
    pub const OVERLAP: usize = 50;
}

/// Selects a fragment size for documents whose total size falls in
/// `[threshold_low, threshold_high)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeTier {
    /// Inclusive lower bound of the document size
    pub threshold_low: usize,
    /// Exclusive upper bound; `None` means unbounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_high: Option<usize>,
    /// Target size of each fragment
    pub fragment_size: usize,
}

impl SizeTier {
    /// Tier covering `[low, high)`
    pub fn new(threshold_low: usize, threshold_high: usize, fragment_size: usize) -> Self {
        Self {
            threshold_low,
            threshold_high: Some(threshold_high),
            fragment_size,
        }
    }

    /// Tier covering every size from `threshold_low` upward
    pub fn unbounded(threshold_low: usize, fragment_size: usize) -> Self {
        Self {
            threshold_low,
            threshold_high: None,
            fragment_size,
        }
    }

    /// Whether a document of size `total` belongs to this tier
    pub fn contains(&self, total: usize) -> bool {
        total >= self.threshold_low && self.threshold_high.map_or(true, |high| total < high)
    }
}

/// Tier table plus overlap, validated up front
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmenterConfig {
    /// Shared context between consecutive fragments, in estimator units
    #[serde(default = "default_overlap")]
    pub overlap: usize,
    /// Ordered, contiguous tiers
    #[serde(default = "default_tiers")]
    pub tiers: Vec<SizeTier>,
}

fn default_overlap() -> usize {
    defaults::OVERLAP
}

fn default_tiers() -> Vec<SizeTier> {
    vec![
        SizeTier::new(defaults::MIN_SPLIT_SIZE, defaults::SMALL_DOCUMENT, 1_000),
        SizeTier::new(defaults::SMALL_DOCUMENT, defaults::MEDIUM_DOCUMENT, 2_000),
        SizeTier::unbounded(defaults::MEDIUM_DOCUMENT, 3_000),
    ]
}

impl Default for FragmenterConfig {
    fn default() -> Self {
        Self {
            overlap: default_overlap(),
            tiers: default_tiers(),
        }
    }
}

impl FragmenterConfig {
    /// Configuration from explicit tiers and overlap
    pub fn new(tiers: Vec<SizeTier>, overlap: usize) -> Result<Self> {
        let config = Self { overlap, tiers };
        config.validate()?;
        Ok(config)
    }

    /// One tier splitting every document of at least `min_size` units
    pub fn uniform(min_size: usize, fragment_size: usize, overlap: usize) -> Result<Self> {
        Self::new(vec![SizeTier::unbounded(min_size, fragment_size)], overlap)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| CoreError::config(format!("failed to parse fragmenter config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that could not make progress or that leave
    /// document sizes without a tier
    pub fn validate(&self) -> Result<()> {
        let Some(last) = self.tiers.last() else {
            return Err(CoreError::config("tier list must not be empty"));
        };

        for (i, tier) in self.tiers.iter().enumerate() {
            if tier.fragment_size == 0 {
                return Err(CoreError::config(format!(
                    "tier {i}: fragment_size must be greater than 0"
                )));
            }

            if tier.fragment_size <= self.overlap {
                return Err(CoreError::config(format!(
                    "tier {i}: fragment_size ({}) must exceed overlap ({})",
                    tier.fragment_size, self.overlap
                )));
            }

            if let Some(high) = tier.threshold_high {
                if high <= tier.threshold_low {
                    return Err(CoreError::config(format!(
                        "tier {i}: threshold_high ({high}) must exceed threshold_low ({})",
                        tier.threshold_low
                    )));
                }
            }
        }

        for (i, pair) in self.tiers.windows(2).enumerate() {
            let (current, next) = (&pair[0], &pair[1]);
            match current.threshold_high {
                None => {
                    return Err(CoreError::config(format!(
                        "tier {i} is unbounded but is followed by another tier"
                    )))
                }
                Some(high) if high != next.threshold_low => {
                    return Err(CoreError::config(format!(
                        "tiers {i} and {} must be contiguous: {high} != {}",
                        i + 1,
                        next.threshold_low
                    )));
                }
                Some(_) => {}
            }
        }

        tracing::debug!(
            tiers = self.tiers.len(),
            overlap = self.overlap,
            open_ended = last.threshold_high.is_none(),
            "fragmenter configuration validated"
        );

        Ok(())
    }

    /// Lowest document size that gets split
    pub fn min_split_size(&self) -> usize {
        self.tiers.first().map_or(usize::MAX, |tier| tier.threshold_low)
    }

    /// Tier for a document of size `total`.
    ///
    /// `None` below the lowest threshold (no splitting). Sizes beyond the
    /// last bounded tier resolve to the last tier.
    pub fn resolve(&self, total: usize) -> Option<&SizeTier> {
        if total < self.min_split_size() {
            return None;
        }

        self.tiers
            .iter()
            .find(|tier| tier.contains(total))
            .or_else(|| self.tiers.last())
    }
}
