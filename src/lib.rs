//! Client-side composition core for the Chorus speech generation service.
//!
//! A guided, five-step composer that assembles structured generation
//! requests for single-speaker ("basic") and multi-speaker ("enhanced")
//! synthesis: step gating over derived completion predicates, a speaker
//! roster with a two-phase drag-reorder commit, an ordered dialogue script,
//! a three-mode expression model, unit-ceiling cost estimates, and the
//! mode-dependent payload assembly.
//!
//! The crate owns no UI and no persistence: catalogs are injected as
//! read-only repositories, all composition state is ephemeral per session,
//! and submission is fire-and-forget against the service endpoint.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chorus_composer::config::ServiceConfig;
//! use chorus_composer::core::catalog::{HttpModelDirectory, HttpVoiceDirectory};
//! use chorus_composer::core::composer::{ComposerSession, CompositionMode, SpeakerSlot};
//! use chorus_composer::core::generation::HttpGenerationClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServiceConfig::from_env()?;
//! let voices = HttpVoiceDirectory::new(config.clone())?;
//! let models = HttpModelDirectory::new(config.clone())?;
//! let backend = HttpGenerationClient::new(config.clone())?;
//!
//! let mut session = ComposerSession::new(config, CompositionMode::Basic);
//! session.load_catalogs(&voices, &models).await;
//!
//! session.set_title("Morning briefing");
//! session.advance();
//! session.assign_voice(SpeakerSlot::new(1), "v-ava")?;
//! session.advance();
//! session.advance(); // auto expression mode
//! session.set_text("Good morning, here is today's summary.");
//! session.advance();
//!
//! let ack = session.submit(&backend).await?;
//! println!("queued as {}", ack.request_id);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod errors;
pub mod utils;

// Re-export commonly used items for convenience
pub use config::ServiceConfig;
pub use core::*;
pub use errors::{ComposerError, ComposerResult};
