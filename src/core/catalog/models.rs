//! Generation model catalog and the model directory client.
//!
//! The model directory reports one or more generation models, each carrying
//! one or more priced branches (see [`crate::config::pricing`]). The session
//! keeps the result as a read-only [`ModelCatalog`]; when exactly one branch
//! exists across the whole catalog it is auto-selected and step 1 omits the
//! model choice entirely.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::pricing::ModelBranch;
use crate::config::ServiceConfig;
use crate::errors::{ComposerError, ComposerResult};

// =============================================================================
// Catalog Types
// =============================================================================

/// One generation model as the directory reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationModel {
    /// Opaque model identifier.
    pub id: String,

    /// Display label, defaults to empty when the directory omits it.
    #[serde(default)]
    pub label: String,

    /// Priced branches of this model.
    pub branches: Vec<ModelBranch>,
}

/// Read-only list of the generation models available to this session.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    models: Vec<GenerationModel>,
}

impl ModelCatalog {
    /// An empty catalog - the soft-fail fallback when the directory is
    /// unreachable.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the catalog, rejecting malformed directory entries.
    ///
    /// A branch with a zero unit size would poison every cost estimate, so
    /// the whole load fails (and the session soft-fails to an empty
    /// catalog) rather than silently skipping the entry.
    pub fn from_models(models: Vec<GenerationModel>) -> ComposerResult<Self> {
        for model in &models {
            for branch in &model.branches {
                branch
                    .validate()
                    .map_err(|msg| ComposerError::Catalog(format!("model '{}': {msg}", model.id)))?;
            }
        }
        Ok(Self { models })
    }

    /// All models in directory order.
    pub fn all(&self) -> &[GenerationModel] {
        &self.models
    }

    /// Total number of branches across every model.
    pub fn total_branch_count(&self) -> usize {
        self.models.iter().map(|m| m.branches.len()).sum()
    }

    /// When exactly one branch exists in the whole catalog, returns it
    /// together with its model id. This is the auto-select source.
    pub fn single_branch(&self) -> Option<(&str, &ModelBranch)> {
        if self.total_branch_count() != 1 {
            return None;
        }
        self.models
            .iter()
            .find(|m| !m.branches.is_empty())
            .map(|m| (m.id.as_str(), &m.branches[0]))
    }

    /// Whether the operator must pick a model explicitly: only when more
    /// than one branch is on offer. An empty (degraded) catalog requires no
    /// selection.
    pub fn requires_selection(&self) -> bool {
        self.total_branch_count() > 1
    }

    /// Looks a branch up by model and branch id.
    pub fn find_branch(&self, model_id: &str, branch_id: &str) -> Option<&ModelBranch> {
        self.models
            .iter()
            .find(|m| m.id == model_id)?
            .branches
            .iter()
            .find(|b| b.id == branch_id)
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

// =============================================================================
// Directory Client
// =============================================================================

/// Source of the generation model listing.
///
/// Injected into the session so tests can supply fixtures instead of a live
/// service.
#[async_trait]
pub trait ModelDirectory: Send + Sync {
    /// Fetches the model listing. Called once per session.
    async fn fetch_models(&self) -> ComposerResult<Vec<GenerationModel>>;
}

/// HTTP implementation of [`ModelDirectory`] against the Chorus service.
pub struct HttpModelDirectory {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl HttpModelDirectory {
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
impl ModelDirectory for HttpModelDirectory {
    async fn fetch_models(&self) -> ComposerResult<Vec<GenerationModel>> {
        let url = self.config.models_url();
        debug!(%url, "fetching model directory");

        let mut request = self.client.get(&url);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "model directory returned an error");
            return Err(ComposerError::Catalog(format!(
                "model directory returned {status}: {body}"
            )));
        }

        let models: Vec<GenerationModel> = response
            .json()
            .await
            .map_err(|e| ComposerError::Catalog(format!("malformed model listing: {e}")))?;

        debug!(models = models.len(), "model directory loaded");
        Ok(models)
    }
}
