//! Layered service settings.
//!
//! Sources, later ones win: built-in defaults, an optional `trivia.{toml,yaml,json}` file (or the
//! file named by `TRIVIA_CONFIG`), then `TRIVIA__SECTION__KEY` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_aux::field_attributes::{deserialize_bool_from_anything, deserialize_number_from_string};

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct DatabaseSettings {
    pub path: String,
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub create_if_missing: bool,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_connections: u32,
}

impl Settings {
    pub fn load() -> Result<Settings, ConfigError> {
        dotenv::dotenv().ok();
        let file = dotenv::var("TRIVIA_CONFIG").unwrap_or_else(|_| "trivia".to_owned());
        Self::build(Some(&file), Environment::with_prefix("TRIVIA").separator("__"))
    }

    fn build(file: Option<&str>, env: Environment) -> Result<Settings, ConfigError> {
        let mut builder = Config::builder()
            .set_default("application.host", "0.0.0.0")?
            .set_default("application.port", 8080)?
            .set_default("database.path", "trivia.db")?
            .set_default("database.create_if_missing", true)?
            .set_default("database.max_connections", 5)?;
        if let Some(name) = file {
            builder = builder.add_source(File::with_name(name).required(false));
        }
        builder.add_source(env).build()?.try_deserialize()
    }
}
