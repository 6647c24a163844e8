use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod models;
pub mod storage;
pub mod store;

// Module for routing segregation (Public, Admin).
pub mod routes;
use auth::AdminUser; // The resolved admin identity.
use routes::{admin, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use mailer::{MailerState, NoopMailer, SmtpMailer};
pub use storage::{LocalStorageService, MockStorageService, StorageState};
pub use store::{Documents, MemoryStore, PgDocumentStore, StoreState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the application
/// from the `#[utoipa::path]` and `#[derive(utoipa::ToSchema)]` annotations.
/// The resulting JSON is served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    // List all handler functions here for documentation generation.
    paths(
        handlers::root, handlers::admin_login, handlers::verify_admin,
        handlers::get_projects, handlers::get_project, handlers::create_project,
        handlers::update_project, handlers::delete_project,
        handlers::get_albums, handlers::get_album, handlers::create_album,
        handlers::update_album, handlers::delete_album,
        handlers::get_media, handlers::create_media, handlers::delete_media,
        handlers::get_reviews, handlers::get_review, handlers::create_review,
        handlers::update_review, handlers::delete_review,
        handlers::get_contact_messages, handlers::create_contact_message,
        handlers::mark_message_read, handlers::delete_contact_message,
        handlers::get_profile, handlers::update_profile, handlers::upload_file
    ),
    // List all models (schemas) used in the request/response bodies.
    components(
        schemas(
            models::Project, models::ProjectCreate, models::Album, models::AlbumCreate,
            models::MediaImage, models::MediaImageCreate, models::Review, models::ReviewCreate,
            models::ContactMessage, models::ContactMessageCreate, models::Profile,
            models::AdminLogin, models::TokenResponse, models::VerifyResponse,
            models::SuccessResponse, models::UploadResponse,
        )
    ),
    tags(
        (name = "portfolio-api", description = "Personal Portfolio CMS API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Implements the **Unified State Pattern**: the single, thread-safe container
/// holding all application services and configuration, shared across requests.
#[derive(Clone)]
pub struct AppState {
    /// Document store facade: all collection reads/writes go through here.
    pub documents: Documents,
    /// Storage Layer: persists uploaded files.
    pub storage: StorageState,
    /// Mailer: best-effort contact notifications.
    pub mailer: MailerState,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These implementations allow handlers and extractors to selectively pull
// components from the shared AppState.

impl FromRef<AppState> for Documents {
    fn from_ref(app_state: &AppState) -> Documents {
        app_state.documents.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for MailerState {
    fn from_ref(app_state: &AppState) -> MailerState {
        app_state.mailer.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Enforces authentication for the admin routes.
///
/// *Mechanism*: It attempts to extract `AdminUser` from the request. Since
/// `AdminUser` implements `FromRequestParts`, a missing, expired, or invalid
/// token rejects the request with 401 before the handler runs. Handlers also
/// take `AdminUser` as an argument themselves, so the gate holds even if a
/// route were wired outside this layer.
async fn auth_middleware(_admin: AdminUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global and
/// scoped middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. API Router Assembly
    // Public and admin routers are merged: same paths carry the public GETs
    // and the gated mutations, with the auth layer scoped to the admin tier.
    let api_router = Router::new()
        .merge(public::public_routes())
        .merge(
            admin::admin_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        // Uploaded files are served straight off the upload directory.
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir));

    // 3. Base Router Assembly
    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // GET /health
        // Unauthenticated endpoint for monitoring and load balancer checks.
        .route("/health", get(|| async { "ok" }))
        // The whole application surface lives under the /api prefix.
        // Axum's `nest` maps "/api" to the inner "/" route but does not match
        // "/api/", so the documented root path is wired explicitly as well.
        .route("/api/", get(handlers::root))
        .nest("/api", api_router)
        // Apply the Unified State to all routes.
        .with_state(state);

    // 4. Observability and Correlation Layers (Applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 4a. Request ID Generation: a unique UUID for every request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 4b. Request Tracing: wraps the request/response lifecycle in
                // a span carrying the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 4c. Request ID Propagation: return x-request-id to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 5. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Helper used by `TraceLayer` to customize span creation: extracts the
/// `x-request-id` header (if present) and includes it in the structured
/// logging metadata alongside the HTTP method and URI, so every log line of a
/// single request is correlated by a unique ID.
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
