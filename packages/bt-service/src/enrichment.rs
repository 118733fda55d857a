use std::collections::HashSet;

use serde::Serialize;
use time::OffsetDateTime;

use crate::{Error, Result, TreasureService};
use bt_domain::{ItemDetail, scoring};
use bt_storage::models::StoredItem;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EnrichmentReport {
	/// Distinct ids asked for.
	pub requested: usize,
	/// Detail records the catalog returned.
	pub fetched: usize,
	pub scored: usize,
	/// Ineligible items removed.
	pub purged: usize,
	pub failed_chunks: usize,
}

#[derive(Debug, Default)]
struct ChunkOutcome {
	fetched: usize,
	scored: usize,
	purged: usize,
}

impl TreasureService {
	pub async fn fetch_and_score(&self, item_ids: &[String]) -> Result<EnrichmentReport> {
		self.fetch_and_score_at(item_ids, OffsetDateTime::now_utc()).await
	}

	/// Fetches details for `item_ids` chunk by chunk, purges what is no longer eligible and
	/// scores the rest as of `now`.
	///
	/// A failing chunk is logged and skipped. The call only fails when every chunk failed.
	pub async fn fetch_and_score_at(
		&self,
		item_ids: &[String],
		now: OffsetDateTime,
	) -> Result<EnrichmentReport> {
		let mut seen = HashSet::new();
		let item_ids: Vec<String> =
			item_ids.iter().filter(|item_id| seen.insert(item_id.as_str())).cloned().collect();
		let mut report = EnrichmentReport { requested: item_ids.len(), ..Default::default() };
		let mut last_err = None;

		for chunk in item_ids.chunks(self.chunk_size()) {
			match self.enrich_chunk(chunk, now).await {
				Ok(outcome) => {
					report.fetched += outcome.fetched;
					report.scored += outcome.scored;
					report.purged += outcome.purged;
				},
				Err(err) => {
					tracing::error!(error = %err, chunk_len = chunk.len(), "Enrichment chunk failed.");

					report.failed_chunks += 1;
					last_err = Some(err);
				},
			}
		}

		let chunks = item_ids.len().div_ceil(self.chunk_size());

		if let Some(err) = last_err
			&& report.failed_chunks == chunks
		{
			return Err(err);
		}

		tracing::info!(
			requested = report.requested,
			fetched = report.fetched,
			scored = report.scored,
			purged = report.purged,
			failed_chunks = report.failed_chunks,
			"Enrichment finished."
		);

		Ok(report)
	}

	/// Re-enriches the `capacity` best ranked items.
	pub async fn run_enrichment_sweep(&self, capacity: u64) -> Result<EnrichmentReport> {
		let item_ids: Vec<String> = self
			.store
			.ranking_range(0, Some(capacity))
			.await?
			.into_iter()
			.map(|entry| entry.item_id)
			.collect();

		self.fetch_and_score(&item_ids).await
	}

	async fn enrich_chunk(&self, chunk: &[String], now: OffsetDateTime) -> Result<ChunkOutcome> {
		let details = self.catalog.fetch_item_details(chunk).await?;
		let requested: HashSet<&str> = chunk.iter().map(String::as_str).collect();
		let (eligible, ineligible): (Vec<ItemDetail>, Vec<ItemDetail>) = details
			.into_iter()
			.filter(|detail| {
				let wanted = requested.contains(detail.item_id.as_str());

				if !wanted {
					tracing::debug!(item_id = %detail.item_id, "Ignoring unrequested item detail.");
				}

				wanted
			})
			.partition(ItemDetail::is_eligible);
		let fetched = eligible.len() + ineligible.len();
		let doomed: Vec<String> = ineligible.into_iter().map(|detail| detail.item_id).collect();

		if !doomed.is_empty() {
			self.store.purge(&doomed).await?;

			tracing::debug!(count = doomed.len(), "Purged ineligible items.");
		}

		let eligible_ids: Vec<String> =
			eligible.iter().map(|detail| detail.item_id.clone()).collect();
		let counts = self.store.interest_counts(&eligible_ids).await?;

		if counts.len() != eligible.len() {
			return Err(Error::Storage {
				message: format!(
					"Expected {} interest counts but the store returned {}.",
					eligible.len(),
					counts.len()
				),
			});
		}

		let mut items = Vec::with_capacity(eligible.len());

		for (mut detail, users) in eligible.into_iter().zip(counts) {
			detail.users = Some(users);

			let score = scoring::score(&detail, users, &self.cfg.scoring, now);

			items.push(StoredItem {
				item_id: detail.item_id.clone(),
				detail: serde_json::to_string(&detail)?,
				score,
			});
		}

		self.store.upsert_items(&items).await?;

		Ok(ChunkOutcome { fetched, scored: items.len(), purged: doomed.len() })
	}
}
