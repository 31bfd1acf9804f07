use std::sync::Arc;

use tracing::{info, warn};

use models::{image_for_analysis_type, Laboratory, LaboratoryPayload};

use crate::errors::ServiceError;
use crate::laboratory::repository::LaboratoryRepository;

/// Application service owning the laboratory business rules: identity
/// assignment, duplicate-id rejection on create, image derivation from the
/// analysis type, merge-on-update, and not-found detection. Payloads are
/// assumed to have passed field validation at the transport boundary.
pub struct LaboratoryService<R: LaboratoryRepository> {
    repo: Arc<R>,
}

impl<R: LaboratoryRepository> LaboratoryService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Laboratory>, ServiceError> {
        info!("listing all laboratories");
        self.repo.find_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Laboratory, ServiceError> {
        info!(id, "looking up laboratory");
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("laboratory not found with id: {id}")))
    }

    /// Type lookup. A missing or blank argument falls back to `list` without
    /// touching the type query; an empty result set means the type is not
    /// present and is reported as not found.
    pub async fn find_by_type(
        &self,
        analysis_type: Option<&str>,
    ) -> Result<Vec<Laboratory>, ServiceError> {
        let Some(ty) = analysis_type.filter(|t| !t.trim().is_empty()) else {
            return self.list().await;
        };

        info!(analysis_type = %ty, "searching laboratories by analysis type");
        let results = self.repo.find_by_analysis_type(ty).await?;
        if results.is_empty() {
            warn!(analysis_type = %ty, "no laboratories found for analysis type");
            return Err(ServiceError::not_found(format!(
                "no laboratories found with analysis type: {ty}"
            )));
        }
        Ok(results)
    }

    /// Create a laboratory. The store is the sole id authority: a supplied id
    /// is only consulted for the duplicate check and then cleared.
    pub async fn create(&self, payload: LaboratoryPayload) -> Result<Laboratory, ServiceError> {
        info!(name = %payload.name, "creating laboratory");

        if let Some(id) = payload.id {
            if self.repo.exists_by_id(id).await? {
                return Err(ServiceError::conflict(
                    "a laboratory with the specified id already exists",
                ));
            }
        }

        let image = image_for_analysis_type(payload.analysis_type.as_deref()).to_string();
        let laboratory = Laboratory {
            id: None,
            name: payload.name,
            capacity: payload.capacity,
            status: payload.status,
            analysis_type: payload.analysis_type,
            description: payload.description,
            location: payload.location,
            image,
        };

        let stored = self.repo.save(laboratory).await?;
        info!(id = ?stored.id, "laboratory created");
        Ok(stored)
    }

    /// Full-field replacement except `id`; the image is re-derived from the
    /// payload's analysis type, never taken from the payload itself.
    pub async fn update(
        &self,
        id: i64,
        payload: LaboratoryPayload,
    ) -> Result<Laboratory, ServiceError> {
        info!(id, "updating laboratory");

        let mut existing = self.repo.find_by_id(id).await?.ok_or_else(|| {
            ServiceError::not_found(format!("cannot update: laboratory not found with id: {id}"))
        })?;

        existing.image = image_for_analysis_type(payload.analysis_type.as_deref()).to_string();
        existing.name = payload.name;
        existing.capacity = payload.capacity;
        existing.status = payload.status;
        existing.analysis_type = payload.analysis_type;
        existing.description = payload.description;
        existing.location = payload.location;

        self.repo.save(existing).await
    }

    /// Existence is re-checked right before removal; deleting an absent id
    /// fails with not-found rather than silently succeeding.
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        info!(id, "deleting laboratory");

        let laboratory = self.repo.find_by_id(id).await?.ok_or_else(|| {
            ServiceError::not_found(format!("cannot delete: laboratory not found with id: {id}"))
        })?;

        self.repo.delete(&laboratory).await?;
        info!(id, "laboratory deleted");
        Ok(())
    }
}
