use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection string, e.g. "sqlite:./linkmint.db"
    pub database_url: String,

    /// Deployment region selector, e.g. "us-east-1". Informational for the
    /// SQLite backend; kept so region-scoped store backends can consume it.
    pub region: String,

    /// Name of the table holding link entries.
    pub table_name: String,

    /// Host to bind the HTTP server to, e.g. "0.0.0.0"
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables (populated by dotenvy
    /// before this is called). Read once at process start, never re-validated
    /// per request.
    pub fn from_env() -> Result<Self> {
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse::<u16>()
            .context("PORT must be a valid port number (1–65535)")?;

        let table_name = std::env::var("TABLE_NAME").unwrap_or_else(|_| "links".into());
        if table_name.trim().is_empty() {
            anyhow::bail!("TABLE_NAME must not be empty");
        }

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./linkmint.db".into()),
            region: std::env::var("REGION").unwrap_or_else(|_| "us-east-1".into()),
            table_name,
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
        })
    }
}
