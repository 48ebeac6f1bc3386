use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

use crate::auth::session::{self, SessionError};
use crate::entities::{department, event, prelude::*, sponsor};
use crate::router::AppState;
use crate::util::render;

/// Event row as every endpoint returns it: times as `HH:MM:SS`, dates as
/// ISO-8601 strings, fees as plain numbers, joined names included.
#[derive(Serialize)]
pub struct EventRecord {
    pub event_id: i32,
    pub event_name: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub department_id: i32,
    pub sponsor_id: Option<i32>,
    pub max_participants: i32,
    pub registration_fee: f64,
    pub event_type: String,
    pub department_name: Option<String>,
    pub sponsor_name: Option<String>,
}

impl EventRecord {
    fn from_model(
        event: event::Model,
        departments: &HashMap<i32, String>,
        sponsors: &HashMap<i32, String>,
    ) -> Self {
        Self {
            event_id: event.event_id,
            event_name: event.event_name,
            description: event.description,
            date: render::date_iso(event.date),
            time: render::time_hms(event.time),
            venue: event.venue,
            department_id: event.department_id,
            sponsor_id: event.sponsor_id,
            max_participants: event.max_participants,
            registration_fee: render::fee_f64(event.registration_fee),
            event_type: event.event_type,
            department_name: departments.get(&event.department_id).cloned(),
            sponsor_name: event.sponsor_id.and_then(|id| sponsors.get(&id).cloned()),
        }
    }
}

/// Resolve department and sponsor names for a batch of events in two bulk
/// lookups, then fold them into the response rows.
pub async fn stitch_events(
    db: &DatabaseConnection,
    events: Vec<event::Model>,
) -> Result<Vec<EventRecord>, DbErr> {
    let department_ids: Vec<i32> = events.iter().map(|e| e.department_id).collect();
    let departments: HashMap<i32, String> = Department::find()
        .filter(department::Column::DepartmentId.is_in(department_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|d| (d.department_id, d.dept_name))
        .collect();

    let sponsor_ids: Vec<i32> = events.iter().filter_map(|e| e.sponsor_id).collect();
    let sponsors: HashMap<i32, String> = Sponsor::find()
        .filter(sponsor::Column::SponsorId.is_in(sponsor_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.sponsor_id, s.name))
        .collect();

    Ok(events
        .into_iter()
        .map(|e| EventRecord::from_model(e, &departments, &sponsors))
        .collect())
}

pub async fn list_events(State(state): State<AppState>) -> impl IntoResponse {
    let events = match Event::find()
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

    match stitch_events(&state.db, events).await {
        Ok(records) => Json(records).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Failed to query events"})),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn search_events(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    // An empty term matches every event.
    let term = query.q.unwrap_or_default();

    let events = match Event::find()
        .filter(event::Column::EventName.contains(&term))
        .order_by_asc(event::Column::Date)
        .all(&state.db)
        .await
    {
        Ok(rows) => rows,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to search events"})),
            )
                .into_response();
        }
    };

    match stitch_events(&state.db, events).await {
        Ok(records) => Json(records).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Failed to search events"})),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct EventBody {
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    #[serde(deserialize_with = "event_time")]
    pub time: NaiveTime,
    pub venue: String,
    pub department_id: i32,
    pub sponsor_id: Option<i32>,
    pub max_participants: i32,
    pub fee: Decimal,
    #[serde(rename = "type")]
    pub event_type: String,
}

// Browser time inputs send "HH:MM"; everything else sends "HH:MM:SS".
fn event_time<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveTime::parse_from_str(&raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
        .map_err(serde::de::Error::custom)
}

pub async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<EventBody>,
) -> impl IntoResponse {
    match session::verify_session(&state.db, &headers).await {
        Ok(_) => {}
        Err(SessionError::Db(_)) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to verify session"})),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Unauthorized"})),
            )
                .into_response();
        }
    }

    let event = event::ActiveModel {
        event_name: Set(body.name),
        description: Set(body.description),
        date: Set(body.date),
        time: Set(body.time),
        venue: Set(body.venue),
        department_id: Set(body.department_id),
        sponsor_id: Set(body.sponsor_id),
        max_participants: Set(body.max_participants),
        registration_fee: Set(body.fee),
        event_type: Set(body.event_type),
        ..Default::default()
    };

    match event.insert(&state.db).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(json!({"message": "Event created successfully!"})),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Failed to create event"})),
        )
            .into_response(),
    }
}

/// Full replace: every mutable field is taken from the body, so the payload
/// carries the same required fields as create. An unknown id updates nothing
/// and still reports success.
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<i32>,
    headers: HeaderMap,
    Json(body): Json<EventBody>,
) -> impl IntoResponse {
    match session::verify_session(&state.db, &headers).await {
        Ok(_) => {}
        Err(SessionError::Db(_)) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to verify session"})),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Unauthorized"})),
            )
                .into_response();
        }
    }

    let existing = match Event::find_by_id(event_id).one(&state.db).await {
        Ok(found) => found,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to query event"})),
            )
                .into_response();
        }
    };

    if let Some(existing) = existing {
        let mut event: event::ActiveModel = existing.into();
        event.event_name = Set(body.name);
        event.description = Set(body.description);
        event.date = Set(body.date);
        event.time = Set(body.time);
        event.venue = Set(body.venue);
        event.department_id = Set(body.department_id);
        event.sponsor_id = Set(body.sponsor_id);
        event.max_participants = Set(body.max_participants);
        event.registration_fee = Set(body.fee);
        event.event_type = Set(body.event_type);
        event.updated_at = Set(Utc::now().naive_utc());

        if event.update(&state.db).await.is_err() {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to update event"})),
            )
                .into_response();
        }
    }

    Json(json!({"message": "Event updated successfully!"})).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use tower::util::ServiceExt;

    use super::EventBody;
    use crate::entities::{department, event, organizer_session, sponsor};
    use crate::router::{create_router, AppState};
    use crate::supabase::Supabase;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn sample_event(event_id: i32, name: &str) -> event::Model {
        event::Model {
            event_id,
            event_name: name.to_string(),
            description: "An event".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 9, 12).unwrap(),
            time: NaiveTime::from_hms_opt(2, 5, 9).unwrap(),
            venue: "Main hall".to_string(),
            department_id: 1,
            sponsor_id: Some(7),
            max_participants: 100,
            registration_fee: Decimal::new(4999, 2),
            event_type: "Workshop".to_string(),
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    fn app(db: sea_orm::DatabaseConnection) -> axum::Router {
        create_router(AppState {
            db,
            supabase: Supabase::new("http://localhost:0".to_string(), "anon".to_string()),
        })
    }

    #[tokio::test]
    async fn listed_events_are_normalized() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_event(1, "Hackathon")]])
            .append_query_results([vec![department::Model {
                department_id: 1,
                dept_name: "Computer Science".to_string(),
                created_at: timestamp(),
                updated_at: timestamp(),
            }]])
            .append_query_results([vec![sponsor::Model {
                sponsor_id: 7,
                name: "Acme".to_string(),
                created_at: timestamp(),
                updated_at: timestamp(),
            }]])
            .into_connection();

        let request = Request::builder()
            .uri("/api/events")
            .body(Body::empty())
            .unwrap();
        let response = app(db).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json[0]["time"], "02:05:09");
        assert_eq!(json[0]["date"], "2025-09-12");
        assert_eq!(json[0]["registration_fee"], 49.99);
        assert_eq!(json[0]["department_name"], "Computer Science");
        assert_eq!(json[0]["sponsor_name"], "Acme");
    }

    #[tokio::test]
    async fn search_with_no_match_returns_empty_list() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<event::Model>::new()])
            .append_query_results([Vec::<department::Model>::new()])
            .append_query_results([Vec::<sponsor::Model>::new()])
            .into_connection();

        let request = Request::builder()
            .uri("/api/events/search?q=nomatch")
            .body(Body::empty())
            .unwrap();
        let response = app(db).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn create_event_without_session_is_unauthorized() {
        // No query results are queued: the handler must bail before the db.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let request = Request::builder()
            .method("POST")
            .uri("/api/organizer/event")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({
                    "name": "Hackathon",
                    "description": "Overnight",
                    "date": "2025-09-12",
                    "time": "18:30",
                    "venue": "Main hall",
                    "department_id": 1,
                    "max_participants": 100,
                    "fee": 49.99,
                    "type": "Workshop"
                })
                .to_string(),
            ))
            .unwrap();
        let response = app(db).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn update_of_unknown_event_still_reports_success() {
        let session = organizer_session::Model {
            id: 1,
            organizer_id: 1,
            token: "valid-token".to_string(),
            expires_at: NaiveDate::from_ymd_opt(2099, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            created_at: timestamp(),
            updated_at: timestamp(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![session]])
            .append_query_results([Vec::<event::Model>::new()])
            .into_connection();

        let request = Request::builder()
            .method("PUT")
            .uri("/api/events/42")
            .header("authorization", "Bearer valid-token")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({
                    "name": "Hackathon",
                    "description": "Overnight",
                    "date": "2025-09-12",
                    "time": "18:30:00",
                    "venue": "Main hall",
                    "department_id": 1,
                    "max_participants": 100,
                    "fee": 49.99,
                    "type": "Workshop"
                })
                .to_string(),
            ))
            .unwrap();
        let response = app(db).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn event_body_accepts_both_time_formats() {
        let full: EventBody = serde_json::from_value(serde_json::json!({
            "name": "A", "description": "B", "date": "2025-09-12", "time": "18:30:15",
            "venue": "C", "department_id": 1, "max_participants": 10,
            "fee": 5.0, "type": "Seminar"
        }))
        .unwrap();
        assert_eq!(full.time, NaiveTime::from_hms_opt(18, 30, 15).unwrap());

        let short: EventBody = serde_json::from_value(serde_json::json!({
            "name": "A", "description": "B", "date": "2025-09-12", "time": "18:30",
            "venue": "C", "department_id": 1, "max_participants": 10,
            "fee": 5.0, "type": "Seminar"
        }))
        .unwrap();
        assert_eq!(short.time, NaiveTime::from_hms_opt(18, 30, 0).unwrap());
    }
}
