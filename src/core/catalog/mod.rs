//! Read-only catalogs loaded once per session from the service directories.
//!
//! Both catalogs are injected into the composition session as explicit
//! repositories (never ambient singletons) so tests can supply fixtures.
//! Directory failures soft-fail to empty catalogs at the session layer.

pub mod models;
pub mod voices;

pub use models::{GenerationModel, HttpModelDirectory, ModelCatalog, ModelDirectory};
pub use voices::{
    HttpVoiceDirectory, VoiceDirectory, VoiceEntry, VoiceInventory, VoiceModelCatalog,
    VoiceModelRef,
};
