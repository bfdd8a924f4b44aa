use crate::{
    AppState, handlers,
    models::{Form, Module, ModuleForm, Permission, RolFormPermission, RolUser, Role, User},
    service::{CrudService, Resource},
};
use axum::{
    Router,
    extract::FromRef,
    routing::get,
};

/// resource_routes
///
/// The six CRUD endpoints of one resource:
///
/// - `GET    /api/{Name}`       list
/// - `POST   /api/{Name}`       create (201 + Location)
/// - `PUT    /api/{Name}`       update, id in the body
/// - `GET    /api/{Name}/{id}`  read one
/// - `PATCH  /api/{Name}/{id}`  soft delete
/// - `DELETE /api/{Name}/{id}`  hard delete
///
/// The resource's service is pulled out of `AppState` through `FromRef`.
pub fn resource_routes<R: Resource>() -> Router<AppState>
where
    CrudService<R>: FromRef<AppState>,
{
    let collection = format!("/api/{}", R::NAME);
    let item = format!("{collection}/{{id}}");

    Router::new()
        .route(
            &collection,
            get(handlers::list::<R>)
                .post(handlers::create::<R>)
                .put(handlers::update::<R>),
        )
        .route(
            &item,
            get(handlers::get_by_id::<R>)
                .patch(handlers::soft_delete::<R>)
                .delete(handlers::delete::<R>),
        )
}

/// api_routes
///
/// Mounts every resource collection.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(resource_routes::<Role>())
        .merge(resource_routes::<User>())
        .merge(resource_routes::<Permission>())
        .merge(resource_routes::<Form>())
        .merge(resource_routes::<Module>())
        .merge(resource_routes::<RolUser>())
        .merge(resource_routes::<RolFormPermission>())
        .merge(resource_routes::<ModuleForm>())
}
