//! The composition state machine.
//!
//! A session is driven through five gated steps: basic info, voice
//! assignment, expression, script, review. `session::ComposerSession` owns
//! the state; the submodules hold the individual components (speaker
//! roster and reorder, dialogue list, step gate).

use serde::{Deserialize, Serialize};

pub mod dialogue;
pub mod session;
pub mod speakers;
pub mod steps;

pub use dialogue::{DialogueList, DialogueTurn};
pub use session::{ComposerSession, ModelSelection, RemovedSpeaker};
pub use speakers::{MAX_SPEAKERS, PendingReorder, SpeakerRoster, SpeakerSlot};
pub use steps::{Step, StepGate};

/// Which request shape the session composes.
///
/// Dispatch on this happens once at the top of each mode-dependent
/// component (step predicates, assembler), never via scattered flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositionMode {
    /// Single speaker, one block of text.
    Basic,
    /// Up to four speakers with an ordered dialogue script.
    Enhanced,
}

impl CompositionMode {
    /// Returns the mode as a lowercase string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            CompositionMode::Basic => "basic",
            CompositionMode::Enhanced => "enhanced",
        }
    }
}
