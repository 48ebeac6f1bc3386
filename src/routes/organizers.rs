use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::session;
use crate::entities::{event, organizer, prelude::*};
use crate::router::AppState;
use crate::routes::events::stitch_events;
use crate::routes::sponsors::sponsor_list;
use crate::util::render;

#[derive(Serialize)]
pub struct OrganizerRecord {
    pub organizer_id: i32,
    pub email: String,
    pub department_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dept_name: Option<String>,
}

impl OrganizerRecord {
    fn from_model(organizer: organizer::Model, dept_name: Option<String>) -> Self {
        Self {
            organizer_id: organizer.organizer_id,
            email: organizer.email,
            department_id: organizer.department_id,
            dept_name,
        }
    }
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> impl IntoResponse {
    let (email, password) = match (body.email, body.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Email and password required"})),
            )
                .into_response();
        }
    };

    let organizer = match Organizer::find()
        .filter(organizer::Column::Email.eq(&email))
        .one(&state.db)
        .await
    {
        Ok(Some(organizer)) => organizer,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid credentials"})),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to query organizer"})),
            )
                .into_response();
        }
    };

    if !session::verify_password(&password, &organizer.password_hash) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid credentials"})),
        )
            .into_response();
    }

    let session = match session::issue_session(&state.db, organizer.organizer_id).await {
        Ok(session) => session,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to create session"})),
            )
                .into_response();
        }
    };

    Json(json!({
        "message": "Login successful",
        "organizer": OrganizerRecord::from_model(organizer, None),
        "token": session.token,
        "expires_at": render::datetime_iso(session.expires_at),
    }))
    .into_response()
}

/// Organizer record, every event in the organizer's department, and the full
/// sponsor list in one payload.
pub async fn dashboard(
    State(state): State<AppState>,
    Path(organizer_id): Path<i32>,
) -> impl IntoResponse {
    let organizer = match Organizer::find_by_id(organizer_id).one(&state.db).await {
        Ok(Some(organizer)) => organizer,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "Organizer not found"})),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to query organizer"})),
            )
                .into_response();
        }
    };

    let dept_name = match Department::find_by_id(organizer.department_id)
        .one(&state.db)
        .await
    {
        Ok(department) => department.map(|d| d.dept_name),
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to query department"})),
            )
                .into_response();
        }
    };

    let events = match Event::find()
        .filter(event::Column::DepartmentId.eq(organizer.department_id))
        .order_by_asc(event::Column::Date)
        .all(&state.db)
        .await
    {
        Ok(rows) => rows,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to query events"})),
            )
                .into_response();
        }
    };
    let events = match stitch_events(&state.db, events).await {
        Ok(records) => records,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to query events"})),
            )
                .into_response();
        }
    };

    let sponsors = match sponsor_list(&state.db).await {
        Ok(sponsors) => sponsors,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to query sponsors"})),
            )
                .into_response();
        }
    };

    Json(json!({
        "organizer": OrganizerRecord::from_model(organizer, dept_name),
        "events": events,
        "sponsors": sponsors,
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{NaiveDate, NaiveDateTime};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use tower::util::ServiceExt;

    use crate::auth::session::hash_password;
    use crate::entities::organizer;
    use crate::router::{create_router, AppState};
    use crate::supabase::Supabase;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn app(db: sea_orm::DatabaseConnection) -> axum::Router {
        create_router(AppState {
            db,
            supabase: Supabase::new("http://localhost:0".to_string(), "anon".to_string()),
        })
    }

    fn sample_organizer() -> organizer::Model {
        organizer::Model {
            organizer_id: 1,
            email: "org@example.edu".to_string(),
            password_hash: hash_password("letmein"),
            department_id: 2,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let request = Request::builder()
            .method("POST")
            .uri("/api/organizer/login")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"email": "org@example.edu"}"#))
            .unwrap();
        let response = app(db).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_organizer()]])
            .into_connection();

        let request = Request::builder()
            .method("POST")
            .uri("/api/organizer/login")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"email": "org@example.edu", "password": "guess"}"#,
            ))
            .unwrap();
        let response = app(db).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn dashboard_for_unknown_organizer_is_404_with_no_further_queries() {
        // Only the organizer lookup is queued: any follow-up query would fail
        // the test with a 500 instead of a 404.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<organizer::Model>::new()])
            .into_connection();

        let request = Request::builder()
            .uri("/api/organizer/99")
            .body(Body::empty())
            .unwrap();
        let response = app(db).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Organizer not found");
    }
}
