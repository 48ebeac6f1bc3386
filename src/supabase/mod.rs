use axum::http::HeaderMap;
use serde::Deserialize;
use tracing::debug;

use crate::auth::bearer_token;

const USER_PATH: &str = "/auth/v1/user";

/// Identity record Supabase returns for a valid access token.
#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseUser {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Supabase {
    base_url: String,
    anon_key: String,
}

impl Supabase {
    pub fn new(base_url: String, anon_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        }
    }

    /// Ask Supabase which user an access token belongs to.
    pub async fn current_user(&self, token: &str) -> Result<Option<SupabaseUser>, reqwest::Error> {
        let response = reqwest::Client::new()
            .get(format!("{}{USER_PATH}", self.base_url))
            .bearer_auth(token)
            .header("apikey", &self.anon_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let user = response.json::<SupabaseUser>().await?;
        Ok(Some(user))
    }

    /// Resolve the request's Authorization header to a verified identity.
    /// Anything short of a confirmed user (missing or malformed header,
    /// rejected token, provider unreachable) comes back as `None`.
    pub async fn verify_request(&self, headers: &HeaderMap) -> Option<SupabaseUser> {
        let token = bearer_token(headers)?;

        match self.current_user(token).await {
            Ok(user) => user,
            Err(err) => {
                debug!("Identity check failed: {err}");
                None
            }
        }
    }
}
