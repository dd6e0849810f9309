use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
#[error("Invalid {key} value {value:?}: {reason}")]
pub struct ConfigError {
	key: &'static str,
	value: String,
	reason: String,
}

#[derive(Debug, Clone)]
pub struct Config {
	pub port: u16,
	pub database_url: String,
	pub max_connections: u32,
}

impl Config {
	pub fn load() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		Ok(Self {
			port: try_load(&lookup, "PORT", "3001")?,
			database_url: try_load(&lookup, "DATABASE_URL", "sqlite://restaurants.db")?,
			max_connections: try_load(&lookup, "DATABASE_MAX_CONNECTIONS", "5")?,
		})
	}
}

fn try_load<T: FromStr>(
	lookup: &impl Fn(&str) -> Option<String>,
	key: &'static str,
	default: &str,
) -> Result<T, ConfigError>
where
	T::Err: Display,
{
	let value = lookup(key).unwrap_or_else(|| {
		info!("{key} not set, using default: {default}");
		default.to_string()
	});

	value.parse().map_err(|e: T::Err| ConfigError {
		key,
		reason: e.to_string(),
		value,
	})
}
