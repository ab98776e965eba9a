use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/form", get(handlers::form::form_context))
        .route("/submissions", post(handlers::submission::create_submission))
        .route("/leaderboard", get(handlers::leaderboard::leaderboard))
        .nest("/admin", admin_routes())
        .nest("/races", race_routes())
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
        .route(
            "/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
}

fn race_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::race::list_races).post(handlers::race::create_race),
        )
        .route("/active", get(handlers::race::list_active_races))
        .route("/{id}", patch(handlers::race::update_race))
        .route(
            "/{id}/questions",
            get(handlers::question::list_questions).post(handlers::question::create_question),
        )
        .route(
            "/{id}/questions/{question_id}",
            patch(handlers::question::update_question)
                .delete(handlers::question::delete_question),
        )
        .route(
            "/{id}/result",
            get(handlers::result::get_result).put(handlers::result::upsert_result),
        )
        .route(
            "/{id}/submissions",
            get(handlers::submission::list_submissions),
        )
        .route(
            "/{id}/submissions/export",
            get(handlers::stats::export_submissions),
        )
        .route("/{id}/stats", get(handlers::stats::race_stats))
        .route("/{id}/stats/export", get(handlers::stats::export_scoreboard))
}
