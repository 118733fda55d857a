use serde::Serialize;

use crate::{Result, TreasureService};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RetentionReport {
	pub capacity: u64,
	/// Ranking size before trimming.
	pub before: u64,
	pub purged: usize,
}

impl TreasureService {
	/// Purges every item ranked at or below position `capacity` (0-indexed, best first).
	pub async fn retain(&self, capacity: u64) -> Result<RetentionReport> {
		let before = self.store.ranking_len().await?;

		if before <= capacity {
			tracing::debug!(before, capacity, "Ranking within capacity; nothing to retain.");

			return Ok(RetentionReport { capacity, before, purged: 0 });
		}

		let doomed: Vec<String> = self
			.store
			.ranking_range(capacity, None)
			.await?
			.into_iter()
			.map(|entry| entry.item_id)
			.collect();

		self.store.purge(&doomed).await?;

		tracing::info!(before, capacity, purged = doomed.len(), "Retention trimmed the ranking.");

		Ok(RetentionReport { capacity, before, purged: doomed.len() })
	}
}
