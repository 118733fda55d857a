mod error;

pub use error::{Error, Result};

use std::{env, thread, time::Duration};

use redis::{Client, aio::MultiplexedConnection, cmd};
use tokio::{runtime::Builder, time};
use uuid::Uuid;

const SCAN_COUNT: u64 = 1_000;

/// A throwaway key namespace on a shared Redis instance.
///
/// Every key a test writes lives under [`TestKeyspace::prefix`]; the namespace is deleted on
/// [`TestKeyspace::cleanup`] or, failing that, on drop.
pub struct TestKeyspace {
	url: String,
	prefix: String,
	cleaned: bool,
}
impl TestKeyspace {
	pub async fn new(url: &str) -> Result<Self> {
		let prefix = format!("bt_test_{}:", Uuid::new_v4().simple());
		let mut conn = connect(url).await?;
		let pong: String = cmd("PING")
			.query_async(&mut conn)
			.await
			.map_err(|err| Error::Message(format!("Failed to reach Redis at {url}: {err}.")))?;

		if pong != "PONG" {
			return Err(Error::Message(format!("Unexpected PING reply from Redis: {pong}.")));
		}

		Ok(Self { url: url.to_string(), prefix, cleaned: false })
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	pub fn redis_config(&self) -> bt_config::Redis {
		bt_config::Redis { url: self.url.clone(), key_prefix: self.prefix.clone() }
	}

	pub async fn cleanup(mut self) -> Result<()> {
		cleanup_prefix(&self.url, &self.prefix).await?;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestKeyspace {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let url = self.url.clone();
		let prefix = self.prefix.clone();
		let cleanup_thread = thread::spawn(move || {
			let runtime = match Builder::new_current_thread().enable_all().build() {
				Ok(runtime) => runtime,
				Err(err) => {
					eprintln!("Test keyspace cleanup failed: {err}.");

					return;
				},
			};

			if let Err(err) = runtime.block_on(cleanup_prefix(&url, &prefix)) {
				eprintln!("Test keyspace cleanup failed: {err}.");
			}
		});
		let _ = cleanup_thread.join();
	}
}

pub fn env_redis_url() -> Option<String> {
	env::var("BT_REDIS_URL").ok()
}

async fn connect(url: &str) -> Result<MultiplexedConnection> {
	let client = Client::open(url)?;
	let conn = time::timeout(Duration::from_secs(10), client.get_multiplexed_async_connection())
		.await
		.map_err(|_| Error::Message("Timed out connecting to Redis.".to_string()))??;

	Ok(conn)
}

async fn cleanup_prefix(url: &str, prefix: &str) -> Result<()> {
	let mut conn = connect(url).await?;
	let pattern = format!("{prefix}*");
	let mut cursor: u64 = 0;

	loop {
		let (next, keys): (u64, Vec<String>) = cmd("SCAN")
			.arg(cursor)
			.arg("MATCH")
			.arg(&pattern)
			.arg("COUNT")
			.arg(SCAN_COUNT)
			.query_async(&mut conn)
			.await?;

		if !keys.is_empty() {
			let () = cmd("DEL").arg(&keys).query_async(&mut conn).await?;
		}
		if next == 0 {
			break;
		}

		cursor = next;
	}

	Ok(())
}
