// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{exam, option, question, survey},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (surveys, questions, options, exams).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let survey_routes = Router::new()
        .route("/", get(survey::list_surveys).post(survey::create_survey))
        .route("/trash", get(survey::list_trash))
        .route(
            "/{id}",
            get(survey::get_survey)
                .put(survey::update_survey)
                .delete(survey::delete_survey),
        )
        .route("/{id}/star", put(survey::set_star))
        .route("/{id}/publish", post(survey::publish_survey))
        .route("/{id}/stop", post(survey::stop_survey))
        .route("/{id}/validation", get(survey::validate_survey))
        .route("/{id}/copy", post(survey::copy_survey))
        .route("/{id}/trash", post(survey::trash_survey))
        .route("/{id}/restore", post(survey::restore_survey))
        .route("/{id}/ranking", get(survey::get_ranking))
        .route("/{id}/questions", post(question::create_question));

    let question_routes = Router::new()
        .route(
            "/{id}",
            get(question::get_question)
                .put(question::update_question)
                .delete(question::delete_question),
        )
        .route("/{id}/order", put(question::move_question))
        .route("/{id}/options", post(question::create_option));

    let option_routes = Router::new()
        .route(
            "/{id}",
            put(option::update_option).delete(option::delete_option),
        )
        .route("/{id}/order", put(option::move_option));

    let exam_routes = Router::new()
        .route("/submit", post(exam::submit_exam))
        .route("/scores/{id}", get(exam::get_score));

    Router::new()
        .nest("/api/surveys", survey_routes)
        .nest("/api/questions", question_routes)
        .nest("/api/options", option_routes)
        .nest("/api/exams", exam_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
