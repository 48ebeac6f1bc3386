use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::entities::{event, prelude::*, registration, student};
use crate::router::AppState;
use crate::util::render;

#[derive(Serialize)]
pub struct RegistrationRecord {
    pub registration_id: i32,
    pub event_id: i32,
    pub student_id: i32,
    pub registration_date: String,
    pub payment_status: String,
    pub event_name: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub event_type: String,
    pub max_participants: i32,
    pub registration_fee: f64,
}

impl RegistrationRecord {
    fn from_models(registration: registration::Model, event: &event::Model) -> Self {
        Self {
            registration_id: registration.registration_id,
            event_id: registration.event_id,
            student_id: registration.student_id,
            registration_date: render::datetime_iso(registration.registration_date),
            payment_status: registration.payment_status,
            event_name: event.event_name.clone(),
            description: event.description.clone(),
            date: render::date_iso(event.date),
            time: render::time_hms(event.time),
            venue: event.venue.clone(),
            event_type: event.event_type.clone(),
            max_participants: event.max_participants,
            registration_fee: render::fee_f64(event.registration_fee),
        }
    }
}

pub async fn registrations_for_student(
    State(state): State<AppState>,
    Path(student_id): Path<i32>,
) -> impl IntoResponse {
    let registrations = match Registration::find()
        .filter(registration::Column::StudentId.eq(student_id))
        .order_by_desc(registration::Column::RegistrationDate)
        .all(&state.db)
        .await
    {
        Ok(rows) => rows,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to query registrations"})),
            )
                .into_response();
        }
    };

    let event_ids: Vec<i32> = registrations.iter().map(|r| r.event_id).collect();
    let events: HashMap<i32, event::Model> = match Event::find()
        .filter(event::Column::EventId.is_in(event_ids))
        .all(&state.db)
        .await
    {
        Ok(rows) => rows.into_iter().map(|e| (e.event_id, e)).collect(),
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to query registrations"})),
            )
                .into_response();
        }
    };

    let records: Vec<RegistrationRecord> = registrations
        .into_iter()
        .filter_map(|r| {
            events
                .get(&r.event_id)
                .map(|e| RegistrationRecord::from_models(r, e))
        })
        .collect();

    Json(records).into_response()
}

#[derive(Deserialize)]
pub struct RegisterBody {
    pub event_id: i32,
}

pub async fn register_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RegisterBody>,
) -> impl IntoResponse {
    let user = match state.supabase.verify_request(&headers).await {
        Some(user) => user,
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Unauthorized"})),
            )
                .into_response();
        }
    };

    let student = match Student::find()
        .filter(student::Column::SupabaseId.eq(&user.id))
        .one(&state.db)
        .await
    {
        Ok(Some(student)) => student,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "Student not found"})),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to query student"})),
            )
                .into_response();
        }
    };

    let event = match Event::find_by_id(body.event_id).one(&state.db).await {
        Ok(Some(event)) => event,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "Event not found"})),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to query event"})),
            )
                .into_response();
        }
    };

    let existing = Registration::find()
        .filter(registration::Column::EventId.eq(event.event_id))
        .filter(registration::Column::StudentId.eq(student.student_id))
        .one(&state.db)
        .await;
    match existing {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({"error": "Already registered for this event"})),
            )
                .into_response();
        }
        Ok(None) => {}
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to query registrations"})),
            )
                .into_response();
        }
    }

    let taken = match Registration::find()
        .filter(registration::Column::EventId.eq(event.event_id))
        .count(&state.db)
        .await
    {
        Ok(count) => count,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to query registrations"})),
            )
                .into_response();
        }
    };
    if taken >= event.max_participants as u64 {
        return (
            StatusCode::CONFLICT,
            Json(json!({"error": "Event is full"})),
        )
            .into_response();
    }

    let registration = registration::ActiveModel {
        event_id: Set(event.event_id),
        student_id: Set(student.student_id),
        registration_date: Set(Utc::now().naive_utc()),
        payment_status: Set("Pending".to_string()),
        ..Default::default()
    };

    match registration.insert(&state.db).await {
        Ok(_) => Json(json!({"message": "Registered successfully!"})).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Failed to create registration"})),
        )
            .into_response(),
    }
}

/// The delete is scoped to the caller's own student row. Ids that do not
/// exist, or belong to someone else, delete nothing and still report success.
pub async fn cancel_registration(
    State(state): State<AppState>,
    Path(registration_id): Path<i32>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let user = match state.supabase.verify_request(&headers).await {
        Some(user) => user,
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Unauthorized"})),
            )
                .into_response();
        }
    };

    let student = match Student::find()
        .filter(student::Column::SupabaseId.eq(&user.id))
        .one(&state.db)
        .await
    {
        Ok(Some(student)) => student,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "Student not found"})),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to query student"})),
            )
                .into_response();
        }
    };

    let deleted = Registration::delete_many()
        .filter(registration::Column::RegistrationId.eq(registration_id))
        .filter(registration::Column::StudentId.eq(student.student_id))
        .exec(&state.db)
        .await;

    match deleted {
        Ok(_) => Json(json!({"message": "Registration canceled"})).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Failed to delete registration"})),
        )
            .into_response(),
    }
}
