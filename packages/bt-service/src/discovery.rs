use serde::Serialize;

use crate::{EnrichmentReport, Result, TreasureService};
use bt_domain::interest;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DiscoveryReport {
	pub collections: usize,
	pub items_seen: usize,
	/// Items whose merged interest reached the promotion threshold, sorted.
	pub candidates: Vec<String>,
	/// Present when the candidates were handed to enrichment.
	pub enrichment: Option<EnrichmentReport>,
}

impl TreasureService {
	/// Merges the interest seen in recent collections into the store and selects candidates.
	///
	/// Interest is merged before candidacy is decided, so re-running over the same collections
	/// loses no user and promotes the same items.
	pub async fn discover(&self) -> Result<DiscoveryReport> {
		let collections = self.catalog.fetch_collections().await?;
		let batch: Vec<(String, Vec<String>)> = interest::unique_users(&collections)
			.into_iter()
			.map(|(item_id, users)| (item_id, users.into_iter().collect()))
			.collect();
		let counts = self.store.merge_interest(&batch).await?;
		let candidates: Vec<String> = batch
			.iter()
			.zip(counts)
			.filter(|(_, count)| interest::is_candidate(*count))
			.map(|((item_id, _), _)| item_id.clone())
			.collect();

		tracing::info!(
			collections = collections.len(),
			items_seen = batch.len(),
			candidates = candidates.len(),
			"Discovery merged collection interest."
		);

		Ok(DiscoveryReport {
			collections: collections.len(),
			items_seen: batch.len(),
			candidates,
			enrichment: None,
		})
	}

	/// Discovery followed by enrichment of the selected candidates.
	pub async fn run_discovery(&self) -> Result<DiscoveryReport> {
		let mut report = self.discover().await?;

		if !report.candidates.is_empty() {
			report.enrichment = Some(self.fetch_and_score(&report.candidates).await?);
		}

		Ok(report)
	}
}
