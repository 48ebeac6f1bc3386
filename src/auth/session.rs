use axum::http::HeaderMap;
use chrono::{TimeDelta, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::auth::bearer_token;
use crate::entities::{organizer_session, prelude::*};

const SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Db(#[from] DbErr),

    #[error("Session token missing or unknown")]
    Unknown,

    #[error("Session token expired")]
    Expired,
}

pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    hash_password(password) == password_hash
}

/// Mint a bearer token for a freshly authenticated organizer.
pub async fn issue_session(
    db: &DatabaseConnection,
    organizer_id: i32,
) -> Result<organizer_session::Model, DbErr> {
    let session = organizer_session::ActiveModel {
        organizer_id: Set(organizer_id),
        token: Set(Uuid::new_v4().to_string()),
        expires_at: Set(Utc::now().naive_utc() + TimeDelta::hours(SESSION_TTL_HOURS)),
        ..Default::default()
    };
    session.insert(db).await
}

/// Resolve the Authorization header to an unexpired organizer session.
pub async fn verify_session(
    db: &DatabaseConnection,
    headers: &HeaderMap,
) -> Result<organizer_session::Model, SessionError> {
    let token = match bearer_token(headers) {
        Some(token) => token,
        None => return Err(SessionError::Unknown),
    };

    let session = OrganizerSession::find()
        .filter(organizer_session::Column::Token.eq(token))
        .one(db)
        .await?
        .ok_or(SessionError::Unknown)?;

    if session.expires_at < Utc::now().naive_utc() {
        return Err(SessionError::Expired);
    }

    Ok(session)
}
