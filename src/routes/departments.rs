use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use sea_orm::EntityTrait;
use serde::Serialize;
use serde_json::json;

use crate::entities::prelude::*;
use crate::router::AppState;

#[derive(Serialize)]
pub struct DepartmentRecord {
    pub department_id: i32,
    pub dept_name: String,
}

pub async fn list_departments(State(state): State<AppState>) -> impl IntoResponse {
    let departments = match Department::find().all(&state.db).await {
        Ok(rows) => rows,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to query departments"})),
            )
                .into_response();
        }
    };

    let departments: Vec<DepartmentRecord> = departments
        .into_iter()
        .map(|d| DepartmentRecord {
            department_id: d.department_id,
            dept_name: d.dept_name,
        })
        .collect();

    Json(departments).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{NaiveDate, NaiveDateTime};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use tower::util::ServiceExt;

    use crate::entities::department;
    use crate::router::{create_router, AppState};
    use crate::supabase::Supabase;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn lists_departments() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                department::Model {
                    department_id: 1,
                    dept_name: "Computer Science".to_string(),
                    created_at: timestamp(),
                    updated_at: timestamp(),
                },
                department::Model {
                    department_id: 2,
                    dept_name: "Mechanical".to_string(),
                    created_at: timestamp(),
                    updated_at: timestamp(),
                },
            ]])
            .into_connection();
        let app = create_router(AppState {
            db,
            supabase: Supabase::new("http://localhost:0".to_string(), "anon".to_string()),
        });

        let request = Request::builder()
            .uri("/api/departments")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json[0]["department_id"], 1);
        assert_eq!(json[1]["dept_name"], "Mechanical");
    }
}
