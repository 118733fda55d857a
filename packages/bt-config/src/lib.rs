mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Catalog, Config, Redis, Retention, Schedule, Scoring, Service, Storage};

use std::{env, fs, path::Path, str::FromStr};

pub const MAX_CHUNK_SIZE: u32 = 100;

pub fn load(path: &Path) -> Result<Config> {
	load_with_env(path, |key| env::var(key).ok())
}

/// Loads the file at `path`, then applies `BT_*` overrides resolved through `lookup`.
pub fn load_with_env<F>(path: &Path, lookup: F) -> Result<Config>
where
	F: Fn(&str) -> Option<String>,
{
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	apply_env(&mut cfg, lookup)?;
	normalize(&mut cfg);
	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}

	let redis_url = cfg.storage.redis.url.as_str();

	if !["redis://", "rediss://", "unix://"].iter().any(|scheme| redis_url.starts_with(scheme)) {
		return Err(Error::Validation {
			message: "storage.redis.url must use the redis://, rediss://, or unix:// scheme."
				.to_string(),
		});
	}
	if cfg.catalog.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "catalog.api_base must be non-empty.".to_string(),
		});
	}
	if cfg.catalog.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "catalog.api_key must be non-empty (set it in the file or BT_CATALOG_API_KEY)."
				.to_string(),
		});
	}
	if cfg.catalog.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "catalog.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.catalog.chunk_size == 0 || cfg.catalog.chunk_size > MAX_CHUNK_SIZE {
		return Err(Error::Validation {
			message: format!("catalog.chunk_size must be in the range 1-{MAX_CHUNK_SIZE}."),
		});
	}
	if cfg.catalog.calls_per_minute == 0 {
		return Err(Error::Validation {
			message: "catalog.calls_per_minute must be greater than zero.".to_string(),
		});
	}

	for (key, value) in &cfg.catalog.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("catalog.default_headers.{key} must be a string."),
			});
		}
	}

	for (label, value) in [
		("scoring.user_weight", cfg.scoring.user_weight),
		("scoring.gold_bonus", cfg.scoring.gold_bonus),
		("scoring.age_pivot_days", cfg.scoring.age_pivot_days),
	] {
		if !value.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
	}

	if cfg.scoring.user_weight < 0.0 {
		return Err(Error::Validation {
			message: "scoring.user_weight must be zero or greater.".to_string(),
		});
	}
	if cfg.scoring.gold_bonus < 0.0 {
		return Err(Error::Validation {
			message: "scoring.gold_bonus must be zero or greater.".to_string(),
		});
	}
	if cfg.scoring.age_pivot_days <= 0.0 {
		return Err(Error::Validation {
			message: "scoring.age_pivot_days must be greater than zero.".to_string(),
		});
	}
	if cfg.retention.listing_limit == 0 {
		return Err(Error::Validation {
			message: "retention.listing_limit must be greater than zero.".to_string(),
		});
	}

	for (label, secs) in [
		("schedule.discovery_secs", cfg.schedule.discovery_secs),
		("schedule.enrichment_secs", cfg.schedule.enrichment_secs),
		("schedule.retention_secs", cfg.schedule.retention_secs),
		("schedule.scrub_secs", cfg.schedule.scrub_secs),
	] {
		if secs == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	Ok(())
}

fn apply_env<F>(cfg: &mut Config, lookup: F) -> Result<()>
where
	F: Fn(&str) -> Option<String>,
{
	if let Some(value) = lookup("BT_USER_WEIGHT") {
		cfg.scoring.user_weight = parse_env("BT_USER_WEIGHT", &value)?;
	}
	if let Some(value) = lookup("BT_GOLD_BONUS") {
		cfg.scoring.gold_bonus = parse_env("BT_GOLD_BONUS", &value)?;
	}
	if let Some(value) = lookup("BT_AGE_PIVOT") {
		cfg.scoring.age_pivot_days = parse_env("BT_AGE_PIVOT", &value)?;
	}
	if let Some(value) = lookup("BT_SCRUB_LIMIT") {
		cfg.retention.scrub_preserve = parse_env("BT_SCRUB_LIMIT", &value)?;
	}
	if let Some(value) = lookup("BT_LISTING_LIMIT") {
		cfg.retention.listing_limit = parse_env("BT_LISTING_LIMIT", &value)?;
	}
	if let Some(value) = lookup("BT_CHUNK_SIZE") {
		cfg.catalog.chunk_size = parse_env("BT_CHUNK_SIZE", &value)?;
	}
	if let Some(value) = lookup("BT_CATALOG_API_KEY") {
		cfg.catalog.api_key = value;
	}
	if let Some(value) = lookup("BT_REDIS_URL") {
		cfg.storage.redis.url = value;
	}

	Ok(())
}

fn parse_env<T>(key: &str, raw: &str) -> Result<T>
where
	T: FromStr,
{
	raw.trim().parse().map_err(|_| Error::Validation {
		message: format!("Environment override {key}={raw:?} is not a valid number."),
	})
}

fn normalize(cfg: &mut Config) {
	cfg.catalog.api_key = cfg.catalog.api_key.trim().to_string();
	cfg.catalog.api_base = cfg.catalog.api_base.trim().to_string();
}
