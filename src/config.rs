use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv()?;
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL is not set in .env file");
        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "debug".into());
        let supabase_url = env::var("SUPABASE_URL").expect("SUPABASE_URL should be provided");
        let supabase_anon_key =
            env::var("SUPABASE_ANON_KEY").expect("SUPABASE_ANON_KEY should be provided");

        Ok(Self {
            database_url,
            rust_log,
            supabase_url,
            supabase_anon_key,
        })
    }
}
