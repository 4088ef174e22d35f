//! Pricing metadata and token-cost estimation.
//!
//! Generation models are priced per *branch* (a quality/latency tier of a
//! model). Each branch bills in fixed-size units - a number of characters or
//! a number of seconds - at a flat token cost per unit. Partial units always
//! round up to a full billable unit; that ceiling is a strict numeric
//! contract with the service, not an approximation.
//!
//! # Usage
//!
//! ```rust
//! use chorus_composer::config::pricing::{ModelBranch, RateBasis, estimate_tokens};
//!
//! let branch = ModelBranch::new("standard", 250, 10);
//! // 251 characters spill into a second unit.
//! assert_eq!(estimate_tokens(251, &branch), 20);
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// Pricing Types
// =============================================================================

/// What a branch's unit size counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateBasis {
    /// Units of input characters (the common case for text synthesis).
    #[default]
    Chars,
    /// Units of audio seconds (duration-billed branches).
    Seconds,
}

impl RateBasis {
    /// Returns the basis as the lowercase string the directory uses.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RateBasis::Chars => "chars",
            RateBasis::Seconds => "seconds",
        }
    }
}

/// A priced variant of a generation model.
///
/// Immutable once loaded from the model directory. `unit_size` is always
/// nonzero; the directory loader rejects malformed entries before they can
/// reach an estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelBranch {
    /// Opaque branch identifier.
    pub id: String,

    /// Human-readable branch name, defaults to the id when the directory
    /// omits it.
    #[serde(default)]
    pub display_name: String,

    /// Billable unit size (characters or seconds, per `rate_basis`).
    pub unit_size: u32,

    /// Token cost per billable unit.
    pub token_per_unit: u32,

    /// Maximum accepted input length in characters, if the branch has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<u32>,

    /// Whether `unit_size` counts characters or seconds.
    #[serde(default)]
    pub rate_basis: RateBasis,
}

impl ModelBranch {
    /// Creates a character-billed branch with no input limit.
    pub fn new(id: impl Into<String>, unit_size: u32, token_per_unit: u32) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            unit_size,
            token_per_unit,
            max_chars: None,
            rate_basis: RateBasis::Chars,
        }
    }

    /// Sets the maximum accepted character count.
    pub fn with_max_chars(mut self, max_chars: u32) -> Self {
        self.max_chars = Some(max_chars);
        self
    }

    /// Sets the rate basis.
    pub fn with_rate_basis(mut self, basis: RateBasis) -> Self {
        self.rate_basis = basis;
        self
    }

    /// Validates a directory entry. `unit_size == 0` would make every
    /// estimate divide by zero and is treated as a malformed entry.
    pub fn validate(&self) -> Result<(), String> {
        if self.unit_size == 0 {
            return Err(format!("branch '{}' has zero unit size", self.id));
        }
        Ok(())
    }
}

// =============================================================================
// Cost Estimation
// =============================================================================

/// Estimates the token cost of generating `quantity` units of input against
/// a branch.
///
/// `quantity` is a character count for [`RateBasis::Chars`] branches and a
/// whole-second duration for [`RateBasis::Seconds`] branches. Partial units
/// round up: `ceil(quantity / unit_size) * token_per_unit`.
///
/// # Arguments
/// * `quantity` - Characters or seconds, per the branch's rate basis
/// * `branch` - The priced branch
///
/// # Returns
/// * Estimated token cost; zero quantity costs zero tokens
pub fn estimate_tokens(quantity: u64, branch: &ModelBranch) -> u64 {
    debug_assert!(branch.unit_size > 0, "branch validated at load");
    if branch.unit_size == 0 {
        return 0;
    }
    quantity.div_ceil(u64::from(branch.unit_size)) * u64::from(branch.token_per_unit)
}
