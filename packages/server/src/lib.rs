pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod mailer;
pub mod models;
pub mod resolve;
pub mod routes;
pub mod seed;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gridpool Prediction League API",
        version = "1.0.0",
        description = "API for the Gridpool race prediction league"
    ),
    paths(
        handlers::auth::login,
        handlers::auth::me,
        handlers::form::form_context,
        handlers::submission::create_submission,
        handlers::submission::list_submissions,
        handlers::race::create_race,
        handlers::race::list_races,
        handlers::race::list_active_races,
        handlers::race::update_race,
        handlers::question::list_questions,
        handlers::question::create_question,
        handlers::question::update_question,
        handlers::question::delete_question,
        handlers::result::get_result,
        handlers::result::upsert_result,
        handlers::settings::get_settings,
        handlers::settings::update_settings,
        handlers::stats::race_stats,
        handlers::stats::export_scoreboard,
        handlers::stats::export_submissions,
        handlers::leaderboard::leaderboard,
    ),
    tags(
        (name = "Auth", description = "Admin login and token checks"),
        (name = "Form", description = "Public form context"),
        (name = "Submissions", description = "Prediction intake and listing"),
        (name = "Races", description = "Race CRUD (no delete)"),
        (name = "Questions", description = "Per-race extra questions"),
        (name = "Results", description = "Official results"),
        (name = "Settings", description = "Form description overrides"),
        (name = "Stats", description = "Scoreboards, distributions and CSV export"),
        (name = "Leaderboard", description = "Cross-race standings"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);
    let api = ApiDoc::openapi();

    axum::Router::new()
        .nest("/api", routes::api_routes())
        .layer(cors)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api))
}

fn cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(cfg.max_age));

    if cfg.allow_origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = cfg
            .allow_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
