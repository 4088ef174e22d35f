//! Voice model catalog and the voice directory client.
//!
//! The voice directory returns two partitioned lists - built-in voices and
//! voices the operator created - which are merged into one read-only
//! [`VoiceModelCatalog`] for the session. Entries are immutable once loaded;
//! everything else in the crate references them by id only.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ServiceConfig;
use crate::errors::{ComposerError, ComposerResult};

// =============================================================================
// Wire Types
// =============================================================================

/// One entry as the voice directory reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceEntry {
    /// Opaque voice model identifier.
    pub id: String,

    /// Display label.
    pub label: String,

    /// URL of a short preview clip, when the directory has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

/// The directory response: two partitioned lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceInventory {
    /// Voices shipped with the service.
    #[serde(default)]
    pub built_in: Vec<VoiceEntry>,

    /// Voices created by the current operator.
    #[serde(default)]
    pub user_created: Vec<VoiceEntry>,
}

// =============================================================================
// Catalog Types
// =============================================================================

/// An immutable reference to one available voice model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceModelRef {
    /// Opaque identifier, the only thing other components store.
    pub id: String,

    /// Display name.
    pub display_name: String,

    /// Whether the operator created this voice (vs. built-in).
    pub is_user_created: bool,

    /// Preview clip URL, if any.
    pub preview_audio_url: Option<String>,
}

/// Read-only list of the voice models available to this session.
#[derive(Debug, Clone, Default)]
pub struct VoiceModelCatalog {
    voices: Vec<VoiceModelRef>,
}

impl VoiceModelCatalog {
    /// An empty catalog - the soft-fail fallback when the directory is
    /// unreachable.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the catalog from a directory response, built-in voices first.
    pub fn from_inventory(inventory: VoiceInventory) -> Self {
        let mut voices = Vec::with_capacity(
            inventory.built_in.len() + inventory.user_created.len(),
        );
        voices.extend(inventory.built_in.into_iter().map(|e| VoiceModelRef {
            id: e.id,
            display_name: e.label,
            is_user_created: false,
            preview_audio_url: e.preview_url,
        }));
        voices.extend(inventory.user_created.into_iter().map(|e| VoiceModelRef {
            id: e.id,
            display_name: e.label,
            is_user_created: true,
            preview_audio_url: e.preview_url,
        }));
        Self { voices }
    }

    /// Looks a voice up by id.
    pub fn get(&self, id: &str) -> Option<&VoiceModelRef> {
        self.voices.iter().find(|v| v.id == id)
    }

    /// Returns true when the id names a known voice.
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// All voices, built-in first.
    pub fn all(&self) -> &[VoiceModelRef] {
        &self.voices
    }

    /// The built-in partition.
    pub fn built_in(&self) -> impl Iterator<Item = &VoiceModelRef> {
        self.voices.iter().filter(|v| !v.is_user_created)
    }

    /// The operator-created partition.
    pub fn user_created(&self) -> impl Iterator<Item = &VoiceModelRef> {
        self.voices.iter().filter(|v| v.is_user_created)
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

// =============================================================================
// Directory Client
// =============================================================================

/// Source of the voice model inventory.
///
/// Injected into the session so tests can supply fixtures instead of a live
/// service.
#[async_trait]
pub trait VoiceDirectory: Send + Sync {
    /// Fetches the full voice inventory. Called once per session.
    async fn fetch_voices(&self) -> ComposerResult<VoiceInventory>;
}

/// HTTP implementation of [`VoiceDirectory`] against the Chorus service.
pub struct HttpVoiceDirectory {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl HttpVoiceDirectory {
    /// Creates a directory client from the service configuration.
    pub fn new(config: ServiceConfig) -> ComposerResult<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl VoiceDirectory for HttpVoiceDirectory {
    async fn fetch_voices(&self) -> ComposerResult<VoiceInventory> {
        let url = self.config.voices_url();
        debug!(%url, "fetching voice inventory");

        let mut request = self.client.get(&url);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "voice directory returned an error");
            return Err(ComposerError::Catalog(format!(
                "voice directory returned {status}: {body}"
            )));
        }

        let inventory: VoiceInventory = response
            .json()
            .await
            .map_err(|e| ComposerError::Catalog(format!("malformed voice inventory: {e}")))?;

        debug!(
            built_in = inventory.built_in.len(),
            user_created = inventory.user_created.len(),
            "voice inventory loaded"
        );
        Ok(inventory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, label: &str) -> VoiceEntry {
        VoiceEntry {
            id: id.to_string(),
            label: label.to_string(),
            preview_url: None,
        }
    }

    #[test]
    fn test_catalog_merges_partitions_in_order() {
        let inventory = VoiceInventory {
            built_in: vec![entry("v-std", "Standard")],
            user_created: vec![entry("v-mine", "My Voice")],
        };
        let catalog = VoiceModelCatalog::from_inventory(inventory);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.all()[0].id, "v-std");
        assert!(!catalog.all()[0].is_user_created);
        assert!(catalog.all()[1].is_user_created);
        assert_eq!(catalog.built_in().count(), 1);
        assert_eq!(catalog.user_created().count(), 1);
    }

    #[test]
    fn test_catalog_lookup() {
        let inventory = VoiceInventory {
            built_in: vec![entry("v-1", "One")],
            user_created: vec![],
        };
        let catalog = VoiceModelCatalog::from_inventory(inventory);
        assert!(catalog.contains("v-1"));
        assert_eq!(catalog.get("v-1").unwrap().display_name, "One");
        assert!(catalog.get("v-2").is_none());
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = VoiceModelCatalog::empty();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn test_inventory_deserialization() {
        let json = r#"{
            "builtIn": [
                {"id": "v-a", "label": "Ava", "previewUrl": "https://cdn.example/a.mp3"}
            ],
            "userCreated": [
                {"id": "v-b", "label": "Ben"}
            ]
        }"#;
        let inventory: VoiceInventory = serde_json::from_str(json).unwrap();
        assert_eq!(inventory.built_in.len(), 1);
        assert_eq!(
            inventory.built_in[0].preview_url.as_deref(),
            Some("https://cdn.example/a.mp3")
        );
        assert!(inventory.user_created[0].preview_url.is_none());
    }

    #[test]
    fn test_inventory_deserialization_tolerates_missing_partitions() {
        let inventory: VoiceInventory = serde_json::from_str("{}").unwrap();
        assert!(inventory.built_in.is_empty());
        assert!(inventory.user_created.is_empty());
    }
}
