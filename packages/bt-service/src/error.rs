pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Upstream error (status {status}): {message}")]
	Upstream { status: u16, body: String, message: String },
	#[error("Catalog error: {message}")]
	Catalog { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	/// Stored data vanished, usually because an eviction ran concurrently. Callers skip it.
	#[error("Not found locally: {message}")]
	NotFoundLocally { message: String },
	#[error("Serialization error: {message}")]
	Serialization { message: String },
}
impl From<bt_catalog::Error> for Error {
	fn from(err: bt_catalog::Error) -> Self {
		match err {
			bt_catalog::Error::Upstream { status, body, message } =>
				Self::Upstream { status, body, message },
			bt_catalog::Error::InvalidRequest { message } => Self::InvalidRequest { message },
			other => Self::Catalog { message: other.to_string() },
		}
	}
}

impl From<bt_storage::Error> for Error {
	fn from(err: bt_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::Serialization { message: err.to_string() }
	}
}
