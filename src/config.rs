use std::env;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub admin: AdminCredentials,
}

/// Static credential pair that unlocks the bulk user listing.
/// `password_hash` is an Argon2 PHC string (see `src/bin/hashpass.rs`).
#[derive(Clone, Debug)]
pub struct AdminCredentials {
    pub username: String,
    pub password_hash: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(5);

        let admin = AdminCredentials {
            username: env::var("ADMIN_USERNAME").context("ADMIN_USERNAME must be set")?,
            password_hash: env::var("ADMIN_PASSWORD_HASH")
                .context("ADMIN_PASSWORD_HASH must be set")?,
        };

        Ok(Self {
            database_url,
            bind_addr,
            db_max_connections,
            admin,
        })
    }
}
