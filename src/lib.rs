pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod schemas;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use database::EntityStore;
use handlers::AppState;

/// Build the full router over any store implementation. The store handle is
/// injected as shared state, so tests can run the service in-process against
/// the in-memory store while the binary wires up PostgreSQL.
pub fn app<S: EntityStore + 'static>(store: Arc<S>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health::<S>))
        .merge(student_routes())
        .merge(course_routes())
        .merge(enrollment_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

fn student_routes<S: EntityStore + 'static>() -> Router<AppState<S>> {
    use handlers::{enrollments, students};

    Router::new()
        .route("/students/", get(students::list::<S>).post(students::create::<S>))
        .route(
            "/students/:id",
            get(students::read::<S>).put(students::update::<S>).delete(students::delete::<S>),
        )
        .route("/students/:id/enrollments", get(enrollments::by_student::<S>))
}

fn course_routes<S: EntityStore + 'static>() -> Router<AppState<S>> {
    use handlers::{courses, enrollments};

    Router::new()
        .route("/courses/", get(courses::list::<S>).post(courses::create::<S>))
        .route(
            "/courses/:id",
            get(courses::read::<S>).put(courses::update::<S>).delete(courses::delete::<S>),
        )
        .route("/courses/:id/enrollments", get(enrollments::by_course::<S>))
}

fn enrollment_routes<S: EntityStore + 'static>() -> Router<AppState<S>> {
    use handlers::enrollments;

    Router::new()
        .route("/enrollments/", get(enrollments::list::<S>).post(enrollments::create::<S>))
        .route(
            "/enrollments/:id",
            get(enrollments::read::<S>)
                .put(enrollments::update::<S>)
                .delete(enrollments::delete::<S>),
        )
}
