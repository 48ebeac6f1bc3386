use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::entities::{prelude::*, student};
use crate::router::AppState;

#[derive(Deserialize)]
pub struct ProfileBody {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub year: Option<i32>,
    #[serde(default)]
    pub department_id: Option<Value>,
}

/// The frontend sends `department_id` as a number, a numeric string, an empty
/// string, the literal string "null", or not at all. Everything that means
/// "unset" maps to None; anything else must be an integer.
fn parse_department_id(value: Option<&Value>) -> Result<Option<i32>, ()> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() || s == "null" => Ok(None),
        Some(Value::String(s)) => s.trim().parse::<i32>().map(Some).map_err(|_| ()),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Some)
            .ok_or(()),
        Some(_) => Err(()),
    }
}

/// Insert-or-update keyed by the Supabase identity. Email and identity id are
/// written once on insert and preserved on update.
pub async fn register_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ProfileBody>,
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

    let department_id = match parse_department_id(body.department_id.as_ref()) {
        Ok(id) => id,
        Err(()) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "department_id must be an integer"})),
            )
                .into_response();
        }
    };

    let existing = match Student::find()
        .filter(student::Column::SupabaseId.eq(&user.id))
        .one(&state.db)
        .await
    {
        Ok(found) => found,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to query student"})),
            )
                .into_response();
        }
    };

    let saved = match existing {
        Some(existing) => {
            let mut student = existing.into_active_model();
            student.first_name = Set(body.first_name);
            student.last_name = Set(body.last_name);
            student.phone = Set(body.phone);
            student.year = Set(body.year);
            student.department_id = Set(department_id);
            student.updated_at = Set(Utc::now().naive_utc());
            student.update(&state.db).await
        }
        None => {
            let student = student::ActiveModel {
                supabase_id: Set(user.id),
                first_name: Set(body.first_name),
                last_name: Set(body.last_name),
                email: Set(user.email.unwrap_or_default()),
                phone: Set(body.phone),
                year: Set(body.year),
                department_id: Set(department_id),
                ..Default::default()
            };
            student.insert(&state.db).await
        }
    };

    match saved {
        Ok(_) => Json(json!({"message": "Profile created"})).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Failed to save profile"})),
        )
            .into_response(),
    }
}

#[derive(Serialize)]
pub struct ProfileRecord {
    pub student_id: i32,
    pub supabase_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub year: Option<i32>,
    pub department_id: Option<i32>,
    pub dept_name: Option<String>,
}

pub async fn profile(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
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
        // No profile yet reads as JSON null, not as an error.
        Ok(None) => return Json(Value::Null).into_response(),
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to query student"})),
            )
                .into_response();
        }
    };

    let dept_name = match student.department_id {
        Some(department_id) => match Department::find_by_id(department_id).one(&state.db).await {
            Ok(department) => department.map(|d| d.dept_name),
            Err(_) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Failed to query department"})),
                )
                    .into_response();
            }
        },
        None => None,
    };

    Json(ProfileRecord {
        student_id: student.student_id,
        supabase_id: student.supabase_id,
        first_name: student.first_name,
        last_name: student.last_name,
        email: student.email,
        phone: student.phone,
        year: student.year,
        department_id: student.department_id,
        dept_name,
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use super::parse_department_id;
    use crate::router::{create_router, AppState};
    use crate::supabase::Supabase;

    #[test]
    fn unset_department_spellings_normalize_to_none() {
        assert_eq!(parse_department_id(None), Ok(None));
        assert_eq!(parse_department_id(Some(&Value::Null)), Ok(None));
        assert_eq!(parse_department_id(Some(&json!(""))), Ok(None));
        assert_eq!(parse_department_id(Some(&json!("null"))), Ok(None));
    }

    #[test]
    fn department_id_parses_integers_and_rejects_garbage() {
        assert_eq!(parse_department_id(Some(&json!("3"))), Ok(Some(3)));
        assert_eq!(parse_department_id(Some(&json!(3))), Ok(Some(3)));
        assert_eq!(parse_department_id(Some(&json!("abc"))), Err(()));
        assert_eq!(parse_department_id(Some(&json!(1.5))), Err(()));
    }

    #[tokio::test]
    async fn profile_without_token_is_unauthorized() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = create_router(AppState {
            db,
            supabase: Supabase::new("http://localhost:0".to_string(), "anon".to_string()),
        });

        let request = Request::builder()
            .uri("/api/student/profile")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
