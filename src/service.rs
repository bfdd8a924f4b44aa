use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;

use crate::{
    config::SoftDeleteMode,
    error::{ServiceError, WriteOutcome},
    repository::{Record, RepositoryState},
};

/// Resource
///
/// Ties a table row to its wire DTO, its collection name under `/api/` and its input
/// rules. One impl per entity lives in `resources.rs`.
pub trait Resource: Record {
    /// Collection name, e.g. `Role` for `/api/Role`.
    const NAME: &'static str;

    type Dto: Serialize
        + DeserializeOwned
        + ToSchema
        + From<Self>
        + Into<Self>
        + Clone
        + Send
        + Sync
        + 'static;

    /// The primary key carried by the DTO (`RolId`, `Id`, ...).
    fn dto_id(dto: &Self::Dto) -> i32;

    /// Required-field check run on create and update.
    fn validate(dto: &Self::Dto) -> Result<(), ServiceError>;
}

/// Rejects a blank (empty or whitespace-only) required text field.
pub fn require_text(resource: &'static str, field: &'static str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(
            field,
            format!("{field} is required for {resource}"),
        ));
    }
    Ok(())
}

/// Rejects an id or foreign key that is zero or negative.
pub fn require_positive(resource: &'static str, field: &'static str, value: i32) -> Result<(), ServiceError> {
    if value <= 0 {
        return Err(ServiceError::validation(
            field,
            format!("{field} of {resource} must be greater than zero"),
        ));
    }
    Ok(())
}

/// CrudService
///
/// Business layer for one resource: input checks, existence checks and row/DTO mapping
/// around a `Repository`. Every repository fault is logged and wrapped into
/// `ServiceError::ExternalService`.
pub struct CrudService<R: Resource> {
    repo: RepositoryState<R>,
    soft_delete: SoftDeleteMode,
}

impl<R: Resource> Clone for CrudService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            soft_delete: self.soft_delete,
        }
    }
}

impl<R: Resource> CrudService<R> {
    pub fn new(repo: RepositoryState<R>, soft_delete: SoftDeleteMode) -> Self {
        Self { repo, soft_delete }
    }

    pub fn soft_delete_mode(&self) -> SoftDeleteMode {
        self.soft_delete
    }

    pub async fn list_all(&self) -> Result<Vec<R::Dto>, ServiceError> {
        let rows = self.repo.list().await.map_err(|e| {
            error!(resource = R::NAME, error = %e, "failed to list");
            ServiceError::external(format!("Error retrieving the {} list", R::NAME), e)
        })?;
        Ok(rows.into_iter().map(<R::Dto as From<R>>::from).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<R::Dto, ServiceError> {
        self.check_id(id)?;
        let row = self.require(id).await?;
        Ok(<R::Dto as From<R>>::from(row))
    }

    pub async fn create(&self, dto: R::Dto) -> Result<R::Dto, ServiceError> {
        R::validate(&dto).inspect_err(|e| {
            warn!(resource = R::NAME, error = %e, "rejected create");
        })?;

        let created = self.repo.create(dto.into()).await.map_err(|e| {
            error!(resource = R::NAME, error = %e, "failed to create");
            ServiceError::external(format!("Error creating {}", R::NAME), e)
        })?;

        info!(resource = R::NAME, id = created.id(), "created");
        Ok(<R::Dto as From<R>>::from(created))
    }

    /// update
    ///
    /// Full overwrite of the writable fields. `Ok(false)` only when the row disappears
    /// between the existence check and the write.
    ///
    /// Resources whose soft delete is a no-op keep their stored `is_deleted` flag; the
    /// incoming value is ignored.
    pub async fn update(&self, dto: R::Dto) -> Result<bool, ServiceError> {
        let id = R::dto_id(&dto);
        self.check_id(id)?;
        R::validate(&dto).inspect_err(|e| {
            warn!(resource = R::NAME, id, error = %e, "rejected update");
        })?;
        let existing = self.require(id).await?;

        let mut row: R = dto.into();
        if self.soft_delete == SoftDeleteMode::NoOp {
            row.set_deleted(existing.is_deleted());
        }

        let outcome = self.repo.update(row).await.map_err(|e| {
            error!(resource = R::NAME, id, error = %e, "failed to update");
            ServiceError::external(format!("Error updating {} with id {id}", R::NAME), e)
        })?;
        Ok(outcome.applied())
    }

    pub async fn soft_delete(&self, id: i32) -> Result<bool, ServiceError> {
        self.check_id(id)?;
        self.require(id).await?;

        if self.soft_delete == SoftDeleteMode::NoOp {
            debug!(resource = R::NAME, id, "soft delete is a no-op for this resource");
            return Ok(true);
        }

        let outcome = self.repo.soft_delete(id).await.map_err(|e| {
            error!(resource = R::NAME, id, error = %e, "failed to soft delete");
            ServiceError::external(format!("Error soft deleting {} with id {id}", R::NAME), e)
        })?;
        Ok(outcome.applied())
    }

    /// delete
    ///
    /// An absent row is `Ok(false)`, not an error; the handler turns it into a 404.
    pub async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        if self.find(id).await?.is_none() {
            info!(resource = R::NAME, id, "nothing to delete");
            return Ok(false);
        }

        let outcome = self.repo.delete(id).await.map_err(|e| {
            error!(resource = R::NAME, id, error = %e, "failed to delete");
            ServiceError::external(format!("Error deleting {} with id {id}", R::NAME), e)
        })?;
        Ok(outcome == WriteOutcome::Applied)
    }

    fn check_id(&self, id: i32) -> Result<(), ServiceError> {
        require_positive(R::NAME, "id", id).inspect_err(|_| {
            warn!(resource = R::NAME, id, "invalid id");
        })
    }

    async fn find(&self, id: i32) -> Result<Option<R>, ServiceError> {
        self.repo.get_by_id(id).await.map_err(|e| {
            error!(resource = R::NAME, id, error = %e, "failed to load");
            ServiceError::external(format!("Error retrieving {} with id {id}", R::NAME), e)
        })
    }

    async fn require(&self, id: i32) -> Result<R, ServiceError> {
        self.find(id).await?.ok_or_else(|| {
            info!(resource = R::NAME, id, "not found");
            ServiceError::not_found(R::NAME, id)
        })
    }
}
