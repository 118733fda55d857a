use std::collections::BTreeSet;

use redis::{Client, Script, aio::ConnectionManager, cmd, pipe};

use crate::{
	BoxFuture, Result, Store,
	keys::Keys,
	models::{RankedEntry, StoredItem},
};

const SCAN_COUNT: u64 = 1_000;
const PURGE_BATCH: usize = 500;
// KEYS: ranking, then data and users per item. ARGV: min_users, then the item ids.
const PURGE_BELOW_SCRIPT: &str = r#"
local min_users = tonumber(ARGV[1])
local purged = {}
for i = 2, #ARGV do
	local data = KEYS[2 * i - 2]
	local users = KEYS[2 * i - 1]
	if redis.call('SCARD', users) < min_users then
		redis.call('DEL', data, users)
		redis.call('ZREM', KEYS[1], ARGV[i])
		table.insert(purged, ARGV[i])
	end
end
return purged
"#;

pub struct RedisStore {
	connection: ConnectionManager,
	keys: Keys,
}
impl RedisStore {
	pub async fn connect(cfg: &bt_config::Redis) -> Result<Self> {
		let client = Client::open(cfg.url.as_str())?;
		let connection = ConnectionManager::new(client).await?;

		Ok(Self { connection, keys: Keys::new(cfg.key_prefix.clone()) })
	}

	pub fn keys(&self) -> &Keys {
		&self.keys
	}
}
impl Store for RedisStore {
	fn merge_interest<'a>(
		&'a self,
		batch: &'a [(String, Vec<String>)],
	) -> BoxFuture<'a, Result<Vec<u64>>> {
		Box::pin(async move {
			if batch.is_empty() {
				return Ok(Vec::new());
			}

			let mut conn = self.connection.clone();
			let mut pipeline = pipe();

			for (item_id, users) in batch {
				let key = self.keys.users(item_id);

				if !users.is_empty() {
					pipeline.cmd("SADD").arg(&key).arg(users).ignore();
				}

				pipeline.cmd("SCARD").arg(&key);
			}

			let counts: Vec<u64> = pipeline.query_async(&mut conn).await?;

			Ok(counts)
		})
	}

	fn interest_counts<'a>(&'a self, item_ids: &'a [String]) -> BoxFuture<'a, Result<Vec<u64>>> {
		Box::pin(async move {
			if item_ids.is_empty() {
				return Ok(Vec::new());
			}

			let mut conn = self.connection.clone();
			let mut pipeline = pipe();

			for item_id in item_ids {
				pipeline.cmd("SCARD").arg(self.keys.users(item_id));
			}

			let counts: Vec<u64> = pipeline.query_async(&mut conn).await?;

			Ok(counts)
		})
	}

	fn interest_members<'a>(
		&'a self,
		item_id: &'a str,
	) -> BoxFuture<'a, Result<BTreeSet<String>>> {
		Box::pin(async move {
			let mut conn = self.connection.clone();
			let members: BTreeSet<String> =
				cmd("SMEMBERS").arg(self.keys.users(item_id)).query_async(&mut conn).await?;

			Ok(members)
		})
	}

	fn interest_ids<'a>(&'a self) -> BoxFuture<'a, Result<Vec<String>>> {
		Box::pin(async move {
			let mut conn = self.connection.clone();
			let pattern = self.keys.users_pattern();
			let mut ids = BTreeSet::new();
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

				// SCAN may repeat keys across iterations.
				ids.extend(
					keys.iter().filter_map(|key| self.keys.item_id_from_users(key)).map(str::to_string),
				);

				if next == 0 {
					break;
				}

				cursor = next;
			}

			Ok(ids.into_iter().collect())
		})
	}

	fn upsert_items<'a>(&'a self, items: &'a [StoredItem]) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			if items.is_empty() {
				return Ok(());
			}

			let mut conn = self.connection.clone();
			let ranking = self.keys.ranking();
			let mut pipeline = pipe();

			for item in items {
				pipeline.cmd("SET").arg(self.keys.data(&item.item_id)).arg(&item.detail).ignore();
				pipeline.cmd("ZADD").arg(&ranking).arg(item.score).arg(&item.item_id).ignore();
			}

			let () = pipeline.query_async(&mut conn).await?;

			Ok(())
		})
	}

	fn detail<'a>(&'a self, item_id: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
		Box::pin(async move {
			let mut conn = self.connection.clone();
			let detail: Option<String> =
				cmd("GET").arg(self.keys.data(item_id)).query_async(&mut conn).await?;

			Ok(detail)
		})
	}

	fn score<'a>(&'a self, item_id: &'a str) -> BoxFuture<'a, Result<Option<f64>>> {
		Box::pin(async move {
			let mut conn = self.connection.clone();
			let score: Option<f64> = cmd("ZSCORE")
				.arg(self.keys.ranking())
				.arg(item_id)
				.query_async(&mut conn)
				.await?;

			Ok(score)
		})
	}

	fn ranking_len<'a>(&'a self) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move {
			let mut conn = self.connection.clone();
			let len: u64 = cmd("ZCARD").arg(self.keys.ranking()).query_async(&mut conn).await?;

			Ok(len)
		})
	}

	fn ranking_range<'a>(
		&'a self,
		start: u64,
		stop: Option<u64>,
	) -> BoxFuture<'a, Result<Vec<RankedEntry>>> {
		Box::pin(async move {
			// ZREVRANGE treats its stop index as inclusive.
			let last: i64 = match stop {
				Some(stop) if stop <= start => return Ok(Vec::new()),
				Some(stop) => i64::try_from(stop - 1).unwrap_or(i64::MAX),
				None => -1,
			};
			let mut conn = self.connection.clone();
			let entries: Vec<(String, f64)> = cmd("ZREVRANGE")
				.arg(self.keys.ranking())
				.arg(start)
				.arg(last)
				.arg("WITHSCORES")
				.query_async(&mut conn)
				.await?;

			Ok(entries.into_iter().map(|(item_id, score)| RankedEntry { item_id, score }).collect())
		})
	}

	fn purge<'a>(&'a self, item_ids: &'a [String]) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let mut conn = self.connection.clone();
			let ranking = self.keys.ranking();

			for batch in item_ids.chunks(PURGE_BATCH) {
				let mut pipeline = pipe();

				pipeline.atomic();

				for item_id in batch {
					pipeline
						.cmd("DEL")
						.arg(self.keys.data(item_id))
						.arg(self.keys.users(item_id))
						.ignore();
					pipeline.cmd("ZREM").arg(&ranking).arg(item_id).ignore();
				}

				let () = pipeline.query_async(&mut conn).await?;

				tracing::debug!(count = batch.len(), "Purged item batch.");
			}

			Ok(())
		})
	}

	fn purge_below<'a>(
		&'a self,
		item_ids: &'a [String],
		min_users: u64,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		Box::pin(async move {
			let mut conn = self.connection.clone();
			let script = Script::new(PURGE_BELOW_SCRIPT);
			let mut purged = Vec::new();

			for batch in item_ids.chunks(PURGE_BATCH) {
				let mut invocation = script.prepare_invoke();

				invocation.key(self.keys.ranking()).arg(min_users);

				for item_id in batch {
					invocation.key(self.keys.data(item_id)).key(self.keys.users(item_id)).arg(item_id);
				}

				let removed: Vec<String> = invocation.invoke_async(&mut conn).await?;

				tracing::debug!(
					checked = batch.len(),
					purged = removed.len(),
					"Conditionally purged item batch."
				);

				purged.extend(removed);
			}

			Ok(purged)
		})
	}
}
