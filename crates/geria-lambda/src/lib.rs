//! geria-lambda
//!
//! HTTP surface for evaluation answers and score history. The same
//! [`router`] runs under the AWS Lambda runtime or as a local server.

pub mod config;
pub mod error;
mod middleware;
mod routes;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, patch};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/evaluation-answers",
            get(routes::evaluation_answers::list_evaluation_answers)
                .post(routes::evaluation_answers::create_evaluation_answer),
        )
        .route(
            "/evaluation-answers/{id}",
            get(routes::evaluation_answers::get_evaluation_answer)
                .delete(routes::evaluation_answers::delete_evaluation_answer),
        )
        .route(
            "/evaluation-answers/{id}/add-form",
            patch(routes::evaluation_answers::add_form),
        )
        .route(
            "/evaluation-answers/{id}/pause",
            patch(routes::evaluation_answers::pause),
        )
        .route(
            "/evaluation-answers/{id}/complete",
            patch(routes::evaluation_answers::complete),
        )
        .route(
            "/subjects/{subject_id}/evaluation-answers",
            get(routes::evaluation_answers::list_subject_evaluation_answers),
        )
        .route(
            "/subjects/{subject_id}/history",
            get(routes::history::score_history),
        )
        .route(
            "/subjects/{subject_id}/history/forms/{form_id}",
            get(routes::history::score_history_by_form_type),
        )
        .route(
            "/forms/{form_id}/compare/{subject_id}",
            get(routes::history::compare_with_peers),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum_mw::from_fn(middleware::audit::audit_log))
                .layer(cors),
        )
        .with_state(state)
}
