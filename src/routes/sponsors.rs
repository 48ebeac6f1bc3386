use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};
use serde::Serialize;
use serde_json::json;

use crate::entities::{prelude::*, sponsor};
use crate::router::AppState;

#[derive(Serialize)]
pub struct SponsorRecord {
    pub sponsor_id: i32,
    pub name: String,
}

pub async fn sponsor_list(db: &DatabaseConnection) -> Result<Vec<SponsorRecord>, DbErr> {
    let sponsors = Sponsor::find()
        .order_by_asc(sponsor::Column::Name)
        .all(db)
        .await?;

    Ok(sponsors
        .into_iter()
        .map(|s| SponsorRecord {
            sponsor_id: s.sponsor_id,
            name: s.name,
        })
        .collect())
}

pub async fn list_sponsors(State(state): State<AppState>) -> impl IntoResponse {
    match sponsor_list(&state.db).await {
        Ok(sponsors) => Json(sponsors).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Failed to query sponsors"})),
        )
            .into_response(),
    }
}
