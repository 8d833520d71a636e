// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::Method,
    middleware,
    routing::{delete, get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, exam, notification},
    state::AppState,
    utils::auth::{admin_middleware, auth_middleware},
};

/// Uploaded question papers may be large scans; raise the body limit for
/// the admin router only.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, exams, notifications, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:5173".parse().unwrap(),
        "http://127.0.0.1:5173".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        // Protected profile route
        .merge(
            Router::new().route("/me", get(auth::me)).layer(
                middleware::from_fn_with_state(state.clone(), auth_middleware),
            ),
        );

    let exam_routes = Router::new()
        .route("/", get(exam::published_exams))
        .route("/{id}/questions", get(exam::exam_questions))
        .route("/submit", post(exam::submit_exam))
        .route("/results/mine", get(exam::my_results))
        .route("/results/{id}", get(exam::get_result))
        .route("/results/{id}/review", get(exam::result_review))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let notification_routes = Router::new()
        .route("/", get(notification::list))
        .route("/{id}/read", patch(notification::mark_read))
        .route("/read-all", patch(notification::mark_all_read))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/upload-questions", post(admin::upload_questions))
        .route("/extract-pdf", post(admin::extract_pdf))
        .route("/generate-exam", post(admin::generate_exam))
        .route("/stats", get(admin::stats))
        .route("/exams", get(admin::list_exams))
        .route("/students", get(admin::list_students))
        .route("/exams/{id}/toggle-publish", patch(admin::toggle_publish))
        .route("/exams/{id}", delete(admin::delete_exam))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/exams", exam_routes)
        .nest("/api/notifications", notification_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
