//! Shared application state
//!
//! The inference service is loaded lazily: start-up tries once, and until a
//! load succeeds every request that needs the model tries again. The first
//! successful load is memoized and shared read-only from then on.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use career_core::{CareerConfig, CareerError, InferenceService, RoleCatalog, TrainedArtifacts};
use tokio::sync::OnceCell;

pub struct AppState {
    config: CareerConfig,
    artifacts_dir: PathBuf,
    catalog: RoleCatalog,
    service: OnceCell<Arc<InferenceService>>,
}

impl AppState {
    /// State for `config`, reading artifacts from `artifacts_dir` (or
    /// `[artifacts] dir` when `None`). Fails only on a bad role catalog.
    pub fn new(config: CareerConfig, artifacts_dir: Option<PathBuf>) -> career_core::Result<Self> {
        let catalog = RoleCatalog::load(config.inference.roles_path())?;
        let artifacts_dir = artifacts_dir.unwrap_or_else(|| config.artifacts.dir.clone());
        Ok(Self {
            config,
            artifacts_dir,
            catalog,
            service: OnceCell::new(),
        })
    }

    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    pub fn is_loaded(&self) -> bool {
        self.service.initialized()
    }

    /// The shared service, loading the bundle if no load has succeeded yet.
    pub async fn service(&self) -> Result<Arc<InferenceService>, CareerError> {
        self.service
            .get_or_try_init(|| self.load())
            .await
            .cloned()
    }

    async fn load(&self) -> Result<Arc<InferenceService>, CareerError> {
        let dir = self.artifacts_dir.clone();
        let catalog = self.catalog.clone();
        let policy = self.config.inference.category_policy();

        let service = tokio::task::spawn_blocking(move || {
            TrainedArtifacts::load(&dir)
                .map(|artifacts| InferenceService::from_artifacts(artifacts, catalog).with_policy(policy))
        })
        .await
        .map_err(|e| CareerError::Io(format!("artifact loader task failed: {e}")))?;

        match service {
            Ok(service) => {
                tracing::info!(
                    dir = %self.artifacts_dir.display(),
                    features = service.n_features(),
                    classes = service.classes().len(),
                    "inference service ready"
                );
                Ok(Arc::new(service))
            }
            Err(err) => {
                tracing::warn!(dir = %self.artifacts_dir.display(), error = %err, "model assets unavailable");
                Err(err)
            }
        }
    }
}
