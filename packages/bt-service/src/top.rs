use std::collections::BTreeSet;

use serde::Serialize;

use crate::{Error, Result, TreasureService};
use bt_domain::ItemDetail;

/// A ranked item as shown to readers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Treasure {
	pub item_id: String,
	pub score: f64,
	pub detail: ItemDetail,
	pub users: BTreeSet<String>,
}

impl TreasureService {
	/// The `limit` best ranked items with their stored detail and interested users.
	///
	/// Read only. Entries whose detail vanished or no longer decodes are skipped.
	pub async fn top(&self, limit: u64) -> Result<Vec<Treasure>> {
		let entries = self.store.ranking_range(0, Some(limit)).await?;
		let mut treasures = Vec::with_capacity(entries.len());

		for entry in entries {
			let detail = match self.load_detail(&entry.item_id).await {
				Ok(detail) => detail,
				Err(Error::NotFoundLocally { message }) => {
					tracing::debug!(item_id = %entry.item_id, %message, "Skipping evicted item.");

					continue;
				},
				Err(Error::Serialization { message }) => {
					tracing::warn!(item_id = %entry.item_id, %message, "Skipping undecodable item.");

					continue;
				},
				Err(err) => return Err(err),
			};
			let users = self.store.interest_members(&entry.item_id).await?;

			treasures.push(Treasure { item_id: entry.item_id, score: entry.score, detail, users });
		}

		Ok(treasures)
	}

	pub(crate) async fn load_detail(&self, item_id: &str) -> Result<ItemDetail> {
		let raw = self.store.detail(item_id).await?.ok_or_else(|| Error::NotFoundLocally {
			message: format!("No stored detail for item {item_id}."),
		})?;

		Ok(serde_json::from_str(&raw)?)
	}
}
