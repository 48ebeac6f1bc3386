use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::routes::{departments, events, organizers, registrations, sponsors, students};
use crate::supabase::Supabase;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub supabase: Supabase,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/student/register", post(students::register_profile))
        .route("/api/student/profile", get(students::profile))
        .route("/api/departments", get(departments::list_departments))
        .route("/api/sponsors", get(sponsors::list_sponsors))
        .route("/api/events", get(events::list_events))
        .route("/api/events/search", get(events::search_events))
        .route("/api/events/{event_id}", put(events::update_event))
        .route("/api/organizer/event", post(events::create_event))
        .route("/api/organizer/login", post(organizers::login))
        .route("/api/organizer/{organizer_id}", get(organizers::dashboard))
        .route("/api/register_event", post(registrations::register_event))
        .route(
            "/api/cancel_registration/{registration_id}",
            delete(registrations::cancel_registration),
        )
        .route(
            "/api/registrations/{student_id}",
            get(registrations::registrations_for_student),
        )
        .with_state(state)
        // The frontend is a browser SPA on another origin.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
