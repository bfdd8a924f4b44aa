use axum::{Router, extract::FromRef, http::HeaderName};
use sqlx::PgPool;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod resources;
pub mod service;

pub mod routes;
use routes::{api, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::{RepoError, ServiceError, WriteOutcome};
pub use repository::{PostgresRepository, Repository, RepositoryState, memory::InMemoryRepository};
pub use service::{CrudService, Resource};

use config::SoftDeleteSettings;
use models::{Form, Module, ModuleForm, Permission, RolFormPermission, RolUser, Role, User};

/// ApiDoc
///
/// OpenAPI document served at `/api-docs/openapi.json`. The CRUD handlers are generic
/// over the resource, so the document lists the wire schemas of every DTO.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::health),
    components(
        schemas(
            models::RoleDto, models::UserDto, models::PermissionDto, models::FormDto,
            models::ModuleDto, models::RolUserDto, models::RolFormPermissionDto,
            models::ModuleFormDto, models::MessageResponse,
        )
    ),
    tags(
        (name = "rentas-admin", description = "Municipal tax administration: users, roles, permissions, forms and modules")
    )
)]
struct ApiDoc;

/// Services
///
/// One business service per resource. Cloning is cheap: each holds an `Arc` to its
/// repository.
#[derive(Clone)]
pub struct Services {
    pub roles: CrudService<Role>,
    pub users: CrudService<User>,
    pub permissions: CrudService<Permission>,
    pub forms: CrudService<Form>,
    pub modules: CrudService<Module>,
    pub rol_users: CrudService<RolUser>,
    pub rol_form_permissions: CrudService<RolFormPermission>,
    pub module_forms: CrudService<ModuleForm>,
}

fn service<R: Resource>(repo: RepositoryState<R>, settings: &SoftDeleteSettings) -> CrudService<R> {
    CrudService::new(repo, settings.mode_for(R::NAME))
}

fn postgres_service<R: Resource>(pool: &PgPool, settings: &SoftDeleteSettings) -> CrudService<R> {
    service(Arc::new(PostgresRepository::<R>::new(pool.clone())), settings)
}

fn memory_service<R: Resource>(settings: &SoftDeleteSettings) -> CrudService<R> {
    service(Arc::new(InMemoryRepository::<R>::new()), settings)
}

impl Services {
    /// Every resource backed by its Postgres table, sharing one pool.
    pub fn postgres(pool: PgPool, settings: &SoftDeleteSettings) -> Self {
        Self {
            roles: postgres_service(&pool, settings),
            users: postgres_service(&pool, settings),
            permissions: postgres_service(&pool, settings),
            forms: postgres_service(&pool, settings),
            modules: postgres_service(&pool, settings),
            rol_users: postgres_service(&pool, settings),
            rol_form_permissions: postgres_service(&pool, settings),
            module_forms: postgres_service(&pool, settings),
        }
    }

    /// Every resource backed by an empty in-process store.
    pub fn in_memory(settings: &SoftDeleteSettings) -> Self {
        Self {
            roles: memory_service(settings),
            users: memory_service(settings),
            permissions: memory_service(settings),
            forms: memory_service(settings),
            modules: memory_service(settings),
            rol_users: memory_service(settings),
            rol_form_permissions: memory_service(settings),
            module_forms: memory_service(settings),
        }
    }
}

/// AppState
///
/// The single shared container handed to the router: every resource service plus the
/// loaded configuration.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub config: AppConfig,
}

impl AppState {
    /// In-memory state built from `config`; used by tests and `STORAGE=memory`.
    pub fn in_memory(config: AppConfig) -> Self {
        Self {
            services: Services::in_memory(&config.soft_delete),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

// Lets each generic handler pull exactly its own resource service out of AppState.
macro_rules! service_from_ref {
    ($($field:ident => $record:ty),* $(,)?) => {
        $(
            impl FromRef<AppState> for CrudService<$record> {
                fn from_ref(app_state: &AppState) -> CrudService<$record> {
                    app_state.services.$field.clone()
                }
            }
        )*
    };
}

service_from_ref! {
    roles => Role,
    users => User,
    permissions => Permission,
    forms => Form,
    modules => Module,
    rol_users => RolUser,
    rol_form_permissions => RolFormPermission,
    module_forms => ModuleForm,
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing table, applies the observability and CORS layers and
/// registers the application state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(api::api_routes())
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                // Generates a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // Echoes x-request-id back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request span: method, URI and the `x-request-id` assigned above, so
/// every log line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
