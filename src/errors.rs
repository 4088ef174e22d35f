//! Error taxonomy for the composition core.
//!
//! Three families of failures flow through this crate:
//!
//! - **Transport/service errors** from the directory and generation
//!   endpoints (`Http`, `Service`, `Catalog`). Catalog failures are soft:
//!   the session degrades to an empty catalog rather than propagating them.
//! - **State-machine errors** from misuse of the composition surface
//!   (`SlotOutOfRange`, `ReorderPending`, `SubmitNotReady`, ...). These are
//!   programming or sequencing errors, not validation shortfalls.
//! - **Configuration errors** raised while building a `ServiceConfig`.
//!
//! Validation shortfalls (empty title, character-limit overflow, unresolved
//! speaker slot) are deliberately *not* errors: they surface as incomplete
//! step predicates via `ComposerSession::is_step_complete` and block
//! `advance()` silently.

use thiserror::Error;
use uuid::Uuid;

use crate::core::composer::steps::Step;

/// Result alias used throughout the composition core.
pub type ComposerResult<T> = Result<T, ComposerError>;

/// Errors produced by the composition core.
#[derive(Debug, Error)]
pub enum ComposerError {
    /// A directory fetch or parse failed. The session soft-fails these into
    /// empty catalogs; the variant survives for callers that load catalogs
    /// directly.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// The generation service answered with a non-success status.
    #[error("service error (status {status}): {message}")]
    Service { status: u16, message: String },

    /// Transport-level failure talking to the service.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A speaker slot outside `[1, speaker_count]` was referenced.
    #[error("speaker slot {slot} out of range (speaker count {speaker_count})")]
    SlotOutOfRange { slot: u8, speaker_count: u8 },

    /// `add_speaker` was called at the four-speaker cap.
    #[error("speaker limit reached ({0} speakers)")]
    SpeakerLimitReached(u8),

    /// A dialogue operation referenced a turn id that is not in the list.
    #[error("unknown dialogue turn: {0}")]
    UnknownTurn(Uuid),

    /// A model selection named a branch the catalog does not carry.
    #[error("unknown model branch: {model_id}/{branch_id}")]
    UnknownModelBranch { model_id: String, branch_id: String },

    /// A proposed slot permutation is not a bijection over the current
    /// slots. Treated as a programming error and never truncated.
    #[error("invalid slot permutation: {0}")]
    InvalidPermutation(String),

    /// Dialogue authoring attempted while a slot reorder is pending.
    #[error("a speaker reorder is pending; apply or cancel it first")]
    ReorderPending,

    /// `submit` was called before the gate reached the review step with a
    /// complete script.
    #[error("cannot submit from step {0:?}: composition incomplete")]
    SubmitNotReady(Step),

    /// Payload assembly found the composition state internally inconsistent.
    #[error("payload assembly failed: {0}")]
    AssemblyIncomplete(String),

    /// Invalid service configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ComposerError {
    /// Returns true for errors a caller can fix by retrying the same call
    /// later (transport and service-side failures).
    pub fn is_retryable(&self) -> bool {
        match self {
            ComposerError::Http(_) => true,
            ComposerError::Service { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
