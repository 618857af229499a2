use anyhow::Context;
use std::str::FromStr;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_DB_PATH: &str = "./SQLite.db";

#[derive(Debug)]
pub struct Config {
    db_path: String,
    server_port: u16,
}

impl Config {
    /// Reads `PORT` and `DB_PATH`, loading a `.env` file first if one exists.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = load_var(&lookup, "DB_PATH", DEFAULT_DB_PATH.to_string())?;
        let server_port = load_var(&lookup, "PORT", DEFAULT_SERVER_PORT)?;
        Ok(Self {
            db_path,
            server_port,
        })
    }

    #[must_use]
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    #[must_use]
    pub const fn server_port(&self) -> u16 {
        self.server_port
    }
}

// Unset and empty values both fall back to the default.
fn load_var<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(val) if !val.is_empty() => val
            .parse::<T>()
            .with_context(|| format!("Failed to parse environment variable {key}")),
        _ => Ok(default),
    }
}
