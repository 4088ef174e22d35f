//! Payload assembly and submission to the generation endpoint.
//!
//! `messages` defines the wire shapes, `assembler` is the pure
//! state-to-payload transformation, `client` performs the fire-and-forget
//! HTTP submission, and `progress` drives the cosmetic in-flight indicator.

pub mod assembler;
pub mod client;
pub mod messages;
pub mod progress;

pub use assembler::{AssemblyInput, assemble};
pub use client::{GenerationBackend, HttpGenerationClient};
pub use messages::{
    BasicGenerationRequest, DEFAULT_PRIORITY, EnhancedGenerationRequest, GenerationRequest,
    ScriptLine, ServiceErrorBody, SpeakerScript, SubmissionAck,
};
pub use progress::{ProgressHandle, spawn_simulated_progress};
