//! Environment-driven configuration (prefix `ADVERT_`, `.env` supported).

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// ADVERT_BIND_ADDR
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// ADVERT_DATABASE_URL
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".into()
}

fn default_database_url() -> String {
    "sqlite:advert_board.db".into()
}

pub fn load() -> anyhow::Result<Config> {
    let cfg = ::config::Config::builder()
        .add_source(::config::Environment::with_prefix("ADVERT"))
        .build()?
        .try_deserialize()?;
    Ok(cfg)
}
