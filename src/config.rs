use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub auth_tokens_file: Option<String>,
    pub seed_file: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let auth_tokens_file = env::var("AUTH_TOKENS_FILE").ok();
        let seed_file = env::var("SEED_FILE").ok();
        Ok(Self {
            host,
            port,
            auth_tokens_file,
            seed_file,
        })
    }
}
