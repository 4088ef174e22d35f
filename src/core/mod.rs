pub mod catalog;
pub mod composer;
pub mod emotion;
pub mod generation;

// Re-export commonly used types for convenience
pub use catalog::{
    GenerationModel, HttpModelDirectory, HttpVoiceDirectory, ModelCatalog, ModelDirectory,
    VoiceDirectory, VoiceInventory, VoiceModelCatalog, VoiceModelRef,
};

pub use composer::{
    ComposerSession, CompositionMode, DialogueList, DialogueTurn, MAX_SPEAKERS, ModelSelection,
    PendingReorder, RemovedSpeaker, SpeakerRoster, SpeakerSlot, Step, StepGate,
};

pub use emotion::{
    Emotion, EmotionSettings, EmotionValues, ExpressionMode, MAX_INTENSITY,
    RECOMMENDED_MAX_INTENSITY,
};

pub use generation::{
    GenerationBackend, GenerationRequest, HttpGenerationClient, ProgressHandle, SubmissionAck,
    spawn_simulated_progress,
};
