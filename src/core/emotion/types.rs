//! Core emotion types for the expression model.
//!
//! The service understands eight named emotions, each with an independent
//! 0-100 intensity. The operator picks one of three mutually exclusive
//! expression modes:
//!
//! - **Auto**: the service infers expression from the text.
//! - **Normal**: flat delivery; no emotion values are sent.
//! - **Custom**: the uniform intensity map configured here is applied to
//!   every line at submission time, overriding any per-turn emotion data
//!   that AI-assisted drafting may have produced.
//!
//! No normalization or sum constraint is enforced across intensities;
//! several emotions may be nonzero at once. The ≤60 single-value guidance is
//! advisory UI copy only and is exposed as a constant, never validated.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Emotion Enum
// =============================================================================

/// The named emotions the generation service accepts.
///
/// # Example
///
/// ```rust
/// use chorus_composer::core::emotion::Emotion;
///
/// assert_eq!(Emotion::Happy.as_str(), "happy");
/// assert_eq!(Emotion::parse("SAD"), Some(Emotion::Sad));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    /// Happy, joyful, positive
    Happy,
    /// Sad, melancholic, sorrowful
    Sad,
    /// Angry, frustrated, annoyed
    Angry,
    /// Fearful, scared, anxious
    Fearful,
    /// Surprised, shocked, astonished
    Surprised,
    /// Disgusted, repulsed
    Disgusted,
    /// Calm, peaceful, relaxed
    Calm,
    /// Excited, enthusiastic, energetic
    Excited,
}

impl Emotion {
    /// Returns all eight emotions in display order.
    #[inline]
    pub const fn all() -> &'static [Emotion] {
        &[
            Emotion::Happy,
            Emotion::Sad,
            Emotion::Angry,
            Emotion::Fearful,
            Emotion::Surprised,
            Emotion::Disgusted,
            Emotion::Calm,
            Emotion::Excited,
        ]
    }

    /// Returns the emotion as the lowercase string the wire format uses.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Fearful => "fearful",
            Emotion::Surprised => "surprised",
            Emotion::Disgusted => "disgusted",
            Emotion::Calm => "calm",
            Emotion::Excited => "excited",
        }
    }

    /// Parses an emotion from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "happy" => Some(Emotion::Happy),
            "sad" => Some(Emotion::Sad),
            "angry" => Some(Emotion::Angry),
            "fearful" => Some(Emotion::Fearful),
            "surprised" => Some(Emotion::Surprised),
            "disgusted" => Some(Emotion::Disgusted),
            "calm" => Some(Emotion::Calm),
            "excited" => Some(Emotion::Excited),
            _ => None,
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Expression Mode
// =============================================================================

/// The three mutually exclusive expression modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpressionMode {
    /// The service infers expression from the text.
    #[default]
    Auto,
    /// Flat delivery; no emotion values applied.
    Normal,
    /// The uniform intensity map overrides everything at assembly time.
    Custom,
}

impl ExpressionMode {
    /// Returns the mode as the lowercase string the wire format uses.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ExpressionMode::Auto => "auto",
            ExpressionMode::Normal => "normal",
            ExpressionMode::Custom => "custom",
        }
    }
}

// =============================================================================
// Emotion Settings
// =============================================================================

/// Maximum intensity per emotion.
pub const MAX_INTENSITY: u8 = 100;

/// Advisory single-value ceiling for natural-sounding output. Surfaced to UI
/// layers as guidance copy; never enforced here.
pub const RECOMMENDED_MAX_INTENSITY: u8 = 60;

/// A map of emotion intensities (0-100 each).
pub type EmotionValues = BTreeMap<Emotion, u8>;

/// The active expression configuration of a composition session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionSettings {
    /// The selected mode.
    pub mode: ExpressionMode,

    /// Per-emotion intensities, consulted only in [`ExpressionMode::Custom`].
    /// Zero-valued entries are dropped on write.
    pub values: EmotionValues,
}

impl EmotionSettings {
    /// Creates settings in the default `Auto` mode with no values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects an expression mode. Values are retained across mode switches
    /// so toggling away from `Custom` and back does not lose operator input.
    pub fn set_mode(&mut self, mode: ExpressionMode) {
        self.mode = mode;
    }

    /// Sets one emotion's intensity, clamped to [`MAX_INTENSITY`]. A zero
    /// intensity removes the entry.
    pub fn set_value(&mut self, emotion: Emotion, intensity: u8) {
        let intensity = intensity.min(MAX_INTENSITY);
        if intensity == 0 {
            self.values.remove(&emotion);
        } else {
            self.values.insert(emotion, intensity);
        }
    }

    /// Clears all configured intensities.
    pub fn clear_values(&mut self) {
        self.values.clear();
    }

    /// Returns true when any configured intensity is nonzero. This is the
    /// step-3 completion predicate for `Custom` mode.
    pub fn is_expressive(&self) -> bool {
        self.values.values().any(|v| *v > 0)
    }

    /// Resolves the emotion map to attach to one assembled line.
    ///
    /// In `Custom` mode the uniform `values` map wins unconditionally; any
    /// per-turn map (e.g. from AI-assisted drafting) is ignored. In `Auto`
    /// and `Normal` mode the per-turn map is passed through, or an empty map
    /// when the turn carries none.
    pub fn resolve_line_emotions(&self, per_turn: Option<&EmotionValues>) -> EmotionValues {
        match self.mode {
            ExpressionMode::Custom => self.values.clone(),
            ExpressionMode::Auto | ExpressionMode::Normal => {
                per_turn.cloned().unwrap_or_default()
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
