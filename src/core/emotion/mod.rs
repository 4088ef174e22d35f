//! Expression model for composed speech.
//!
//! Holds the active expression mode (auto / normal / custom) and, in custom
//! mode, a uniform 0-100 intensity per named emotion. The resolution rule
//! that decides which emotion map each assembled line carries lives here;
//! the payload assembler calls it and nothing else re-implements it.

pub mod types;

pub use types::{
    Emotion, EmotionSettings, EmotionValues, ExpressionMode, MAX_INTENSITY,
    RECOMMENDED_MAX_INTENSITY,
};
