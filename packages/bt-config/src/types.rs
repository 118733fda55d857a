use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub catalog: Catalog,
	#[serde(default)]
	pub scoring: Scoring,
	#[serde(default)]
	pub retention: Retention,
	#[serde(default)]
	pub schedule: Schedule,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub redis: Redis,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Redis {
	pub url: String,
	/// Prepended to every key, e.g. "bt:" turns `ranking` into `bt:ranking`.
	#[serde(default)]
	pub key_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
	pub api_base: String,
	#[serde(default)]
	pub api_key: String,
	pub timeout_ms: u64,
	#[serde(default = "default_chunk_size")]
	pub chunk_size: u32,
	#[serde(default = "default_calls_per_minute")]
	pub calls_per_minute: u32,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// Tunables of the treasure score.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Scoring {
	/// Multiplier applied to the user count.
	pub user_weight: f64,
	/// Added to the user count when a material tag mentions gold.
	pub gold_bonus: f64,
	/// Age in days at which the recency factor bottoms out.
	pub age_pivot_days: f64,
}
impl Default for Scoring {
	fn default() -> Self {
		Self { user_weight: 100.0, gold_bonus: 50.0, age_pivot_days: 1_000.0 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Retention {
	/// Number of ranked items whose data is kept.
	pub listing_limit: u32,
	/// Number of interest sets left alone by a scrub pass.
	pub scrub_preserve: u32,
}
impl Default for Retention {
	fn default() -> Self {
		Self { listing_limit: 500, scrub_preserve: 5_000 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Schedule {
	pub discovery_secs: u64,
	pub enrichment_secs: u64,
	pub retention_secs: u64,
	pub scrub_secs: u64,
}
impl Default for Schedule {
	fn default() -> Self {
		Self { discovery_secs: 300, enrichment_secs: 900, retention_secs: 900, scrub_secs: 3_600 }
	}
}

fn default_chunk_size() -> u32 {
	50
}

fn default_calls_per_minute() -> u32 {
	4
}
