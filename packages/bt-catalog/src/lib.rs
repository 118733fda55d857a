pub mod collections;
pub mod items;
pub mod rate_limit;

mod error;

pub use error::{Error, Result};
pub use rate_limit::RateLimiter;

use std::time::Duration;

use reqwest::{
	Client, StatusCode,
	header::{HeaderMap, HeaderName},
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value};

const MAX_LOGGED_BODY_CHARS: usize = 1_024;
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATE_LIMIT_LIMIT: &str = "x-ratelimit-limit";

/// `{"results": [...]}`, the envelope every catalog endpoint answers with.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
	results: Vec<T>,
}

/// Remaining call budget reported by the catalog. Observability only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RateLimitTelemetry {
	pub remaining: Option<u64>,
	pub limit: Option<u64>,
}
impl RateLimitTelemetry {
	pub fn from_headers(headers: &HeaderMap) -> Self {
		let read = |name: &str| {
			headers.get(name).and_then(|value| value.to_str().ok()).and_then(|raw| raw.trim().parse().ok())
		};

		Self { remaining: read(RATE_LIMIT_REMAINING), limit: read(RATE_LIMIT_LIMIT) }
	}

	/// True when at most a tenth of the budget is left.
	pub fn is_low(&self) -> bool {
		match (self.remaining, self.limit) {
			(Some(remaining), Some(limit)) => remaining.saturating_mul(10) <= limit,
			_ => false,
		}
	}

	fn emit(&self, endpoint: &str) {
		if self.is_low() {
			tracing::warn!(
				endpoint,
				remaining = self.remaining,
				limit = self.limit,
				"Catalog rate limit is running low."
			);
		} else {
			tracing::debug!(
				endpoint,
				remaining = self.remaining,
				limit = self.limit,
				"Catalog rate limit telemetry."
			);
		}
	}
}

pub struct CatalogClient {
	http: Client,
	/// Without a trailing slash; paths are joined with one.
	api_base: String,
	api_key: String,
	chunk_size: usize,
	limiter: RateLimiter,
}
impl CatalogClient {
	pub fn new(cfg: &bt_config::Catalog) -> Result<Self> {
		if cfg.chunk_size == 0 {
			return Err(Error::InvalidConfig {
				message: "Catalog chunk_size must be greater than zero.".to_string(),
			});
		}

		let http = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(default_headers(&cfg.default_headers)?)
			.build()?;

		Ok(Self {
			http,
			api_base: cfg.api_base.trim_end_matches('/').to_string(),
			api_key: cfg.api_key.clone(),
			chunk_size: cfg.chunk_size as usize,
			limiter: RateLimiter::per_minute(cfg.calls_per_minute),
		})
	}

	pub fn chunk_size(&self) -> usize {
		self.chunk_size
	}

	async fn get_results<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<T>>
	where
		T: DeserializeOwned,
	{
		self.limiter.acquire().await;

		let url = format!("{}/{}", self.api_base, path);
		let res = self
			.http
			.get(url)
			.query(&[("api_key", self.api_key.as_str())])
			.query(query)
			.send()
			.await?;
		let status = res.status();

		RateLimitTelemetry::from_headers(res.headers()).emit(path);

		let body = res.text().await?;

		parse_results(status, body)
	}
}

pub fn default_headers(default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

fn parse_results<T>(status: StatusCode, body: String) -> Result<Vec<T>>
where
	T: DeserializeOwned,
{
	if !status.is_success() {
		return Err(upstream(status, body, "non-success status".to_string()));
	}

	match serde_json::from_str::<Envelope<T>>(&body) {
		Ok(envelope) => Ok(envelope.results),
		Err(err) => Err(upstream(status, body, format!("malformed response body: {err}"))),
	}
}

fn upstream(status: StatusCode, body: String, message: String) -> Error {
	tracing::warn!(
		status = status.as_u16(),
		body = %excerpt(&body),
		message = %message,
		"Catalog returned an unusable response."
	);

	Error::Upstream { status: status.as_u16(), body, message }
}

fn excerpt(body: &str) -> String {
	if body.chars().count() <= MAX_LOGGED_BODY_CHARS {
		return body.to_string();
	}

	let mut out: String = body.chars().take(MAX_LOGGED_BODY_CHARS).collect();

	out.push_str("...");

	out
}
