pub mod config;
pub mod error;
pub mod features;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    http::{HeaderValue, Method},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use features::{admin, health, leaderboard, users};
use middleware::auth::{ADMIN_TOKEN_HEADER, AdminTokens};

pub use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::handlers::service_info,
        health::handlers::health_check,
        leaderboard::handlers::get_leaderboard,
        users::handlers::get_user,
        admin::handlers::verify_token,
        admin::handlers::create_user,
        admin::handlers::update_user,
        admin::handlers::delete_user,
        admin::handlers::sync_user,
        admin::handlers::reset_user_baseline,
        admin::handlers::sync_all,
        admin::handlers::sync_all_async,
        admin::handlers::reset_all_baselines,
    ),
    components(
        schemas(
            storage::dto::leaderboard::LeaderboardEntry,
            storage::dto::leaderboard::LeaderboardView,
            storage::dto::user::UserResponse,
            storage::dto::user::CreateUserRequest,
            storage::dto::user::UpdateUserRequest,
            storage::dto::score::ScoreBreakdown,
            storage::dto::score::TierPoints,
            storage::dto::sync::SyncReport,
            storage::dto::common::MessageResponse,
            storage::models::TierCounts,
            health::handlers::ServiceInfo,
            health::handlers::HealthResponse,
        )
    ),
    tags(
        (name = "leaderboard", description = "Public leaderboard"),
        (name = "users", description = "Public user details"),
        (name = "admin", description = "Enrollment, sync and baseline resets"),
        (name = "health", description = "Service status"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{
            ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme,
        };

        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Admin-Token"))),
            );
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("Admin token")
                        .build(),
                ),
            );
        }
    }
}

/// CORS for the given origins; `*` allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(allowed)
}

pub fn app(state: AppState, admin_tokens: AdminTokens, cors: CorsLayer) -> Router {
    tracing::debug!(
        "Admin routes accept {} token(s) via {} or bearer auth",
        admin_tokens.len(),
        ADMIN_TOKEN_HEADER
    );

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(health::routes())
        .nest("/api/leaderboard", leaderboard::routes())
        .nest("/api/users", users::routes())
        .nest("/api/admin", admin::routes(admin_tokens))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
