use crate::{
    error::ServiceError,
    models::MessageResponse,
    service::{CrudService, Resource},
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::warn;

// --- Extraction Helpers ---

/// path_id
///
/// Unwraps the `{id}` path segment. A non-integer id becomes a 400 with the usual
/// `{"message": ...}` body instead of Axum's plain-text rejection.
fn path_id<R: Resource>(path: Result<Path<i32>, PathRejection>) -> Result<i32, ServiceError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            warn!(resource = R::NAME, error = %rejection.body_text(), "invalid path id");
            Err(ServiceError::validation(
                "id",
                format!("The {} id must be an integer", R::NAME),
            ))
        }
    }
}

/// body
///
/// Unwraps the JSON body. A missing, `null` or malformed body is a validation failure.
fn body<R: Resource>(payload: Result<Json<R::Dto>, JsonRejection>) -> Result<R::Dto, ServiceError> {
    match payload {
        Ok(Json(dto)) => Ok(dto),
        Err(rejection) => {
            warn!(resource = R::NAME, error = %rejection.body_text(), "invalid request body");
            Err(ServiceError::validation(
                "body",
                format!("A valid {} object is required", R::NAME),
            ))
        }
    }
}

fn message(text: String) -> Json<MessageResponse> {
    Json(MessageResponse { message: text })
}

// --- Handlers ---

/// health
///
/// Liveness probe for load balancers and container orchestration.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "ok"
}

/// list
///
/// `GET /api/{Resource}`. Every row, soft-deleted ones included.
pub async fn list<R: Resource>(
    State(service): State<CrudService<R>>,
) -> Result<Json<Vec<R::Dto>>, ServiceError> {
    let items = service.list_all().await?;
    Ok(Json(items))
}

/// get_by_id
///
/// `GET /api/{Resource}/{id}`. 400 for id <= 0, 404 when absent.
pub async fn get_by_id<R: Resource>(
    State(service): State<CrudService<R>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<R::Dto>, ServiceError> {
    let id = path_id::<R>(path)?;
    let item = service.get_by_id(id).await?;
    Ok(Json(item))
}

/// create
///
/// `POST /api/{Resource}`. Responds 201 with the stored item and a `Location` header
/// pointing at its GET-by-id URL.
pub async fn create<R: Resource>(
    State(service): State<CrudService<R>>,
    payload: Result<Json<R::Dto>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let dto = body::<R>(payload)?;
    let created = service.create(dto).await?;
    let location = format!("/api/{}/{}", R::NAME, R::dto_id(&created));

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)).into_response())
}

/// update
///
/// `PUT /api/{Resource}`. The id travels in the body. Responds with the row as stored,
/// which differs from the submitted DTO only in a preserved `IsDeleted` flag.
pub async fn update<R: Resource>(
    State(service): State<CrudService<R>>,
    payload: Result<Json<R::Dto>, JsonRejection>,
) -> Result<Json<R::Dto>, ServiceError> {
    let dto = body::<R>(payload)?;
    let id = R::dto_id(&dto);
    if id <= 0 {
        warn!(resource = R::NAME, id, "update without a valid id");
        return Err(ServiceError::validation(
            "id",
            format!("The {} id must be greater than zero", R::NAME),
        ));
    }

    if service.update(dto).await? {
        let stored = service.get_by_id(id).await?;
        Ok(Json(stored))
    } else {
        Err(ServiceError::not_found(R::NAME, id))
    }
}

/// soft_delete
///
/// `PATCH /api/{Resource}/{id}`. Responds with the service's boolean result.
pub async fn soft_delete<R: Resource>(
    State(service): State<CrudService<R>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<bool>, ServiceError> {
    let id = path_id::<R>(path)?;
    let done = service.soft_delete(id).await?;
    Ok(Json(done))
}

/// delete
///
/// `DELETE /api/{Resource}/{id}`. A row that is not there is a 404 message, not a failure.
pub async fn delete<R: Resource>(
    State(service): State<CrudService<R>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Response, ServiceError> {
    let id = path_id::<R>(path)?;

    if service.delete(id).await? {
        Ok(message(format!("{} {id} deleted", R::NAME)).into_response())
    } else {
        Ok((
            StatusCode::NOT_FOUND,
            message(format!("{} {id} not found or already deleted", R::NAME)),
        )
            .into_response())
    }
}
