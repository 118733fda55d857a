use std::{
	cmp::Ordering,
	collections::{BTreeMap, BTreeSet, HashMap},
	future,
	sync::{Mutex, MutexGuard},
};

use crate::{
	BoxFuture, Result, Store,
	models::{RankedEntry, StoredItem},
};

#[derive(Debug, Default)]
struct State {
	ranking: HashMap<String, f64>,
	details: HashMap<String, String>,
	users: BTreeMap<String, BTreeSet<String>>,
}

/// Process-local store with the same semantics as the Redis backend.
///
/// Ranking ties are broken by descending item id, which is how Redis orders equal scores in a
/// reverse range.
#[derive(Debug, Default)]
pub struct MemoryStore {
	state: Mutex<State>,
}
impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	fn lock(&self) -> MutexGuard<'_, State> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn sorted_ranking(state: &State) -> Vec<RankedEntry> {
		let mut entries: Vec<RankedEntry> = state
			.ranking
			.iter()
			.map(|(item_id, score)| RankedEntry { item_id: item_id.clone(), score: *score })
			.collect();

		entries.sort_by(|left, right| {
			right
				.score
				.partial_cmp(&left.score)
				.unwrap_or(Ordering::Equal)
				.then_with(|| right.item_id.cmp(&left.item_id))
		});

		entries
	}
}
impl Store for MemoryStore {
	fn merge_interest<'a>(
		&'a self,
		batch: &'a [(String, Vec<String>)],
	) -> BoxFuture<'a, Result<Vec<u64>>> {
		let mut state = self.lock();
		let mut counts = Vec::with_capacity(batch.len());

		for (item_id, users) in batch {
			// Redis drops empty sets, so an empty merge must not create one.
			if users.is_empty() {
				counts.push(state.users.get(item_id).map(|set| set.len() as u64).unwrap_or(0));

				continue;
			}

			let set = state.users.entry(item_id.clone()).or_default();

			set.extend(users.iter().cloned());
			counts.push(set.len() as u64);
		}

		Box::pin(future::ready(Ok(counts)))
	}

	fn interest_counts<'a>(&'a self, item_ids: &'a [String]) -> BoxFuture<'a, Result<Vec<u64>>> {
		let state = self.lock();
		let counts = item_ids
			.iter()
			.map(|item_id| state.users.get(item_id).map(|set| set.len() as u64).unwrap_or(0))
			.collect();

		Box::pin(future::ready(Ok(counts)))
	}

	fn interest_members<'a>(
		&'a self,
		item_id: &'a str,
	) -> BoxFuture<'a, Result<BTreeSet<String>>> {
		let members = self.lock().users.get(item_id).cloned().unwrap_or_default();

		Box::pin(future::ready(Ok(members)))
	}

	fn interest_ids<'a>(&'a self) -> BoxFuture<'a, Result<Vec<String>>> {
		let ids = self.lock().users.keys().cloned().collect();

		Box::pin(future::ready(Ok(ids)))
	}

	fn upsert_items<'a>(&'a self, items: &'a [StoredItem]) -> BoxFuture<'a, Result<()>> {
		let mut state = self.lock();

		for item in items {
			state.details.insert(item.item_id.clone(), item.detail.clone());
			state.ranking.insert(item.item_id.clone(), item.score);
		}

		Box::pin(future::ready(Ok(())))
	}

	fn detail<'a>(&'a self, item_id: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
		let detail = self.lock().details.get(item_id).cloned();

		Box::pin(future::ready(Ok(detail)))
	}

	fn score<'a>(&'a self, item_id: &'a str) -> BoxFuture<'a, Result<Option<f64>>> {
		let score = self.lock().ranking.get(item_id).copied();

		Box::pin(future::ready(Ok(score)))
	}

	fn ranking_len<'a>(&'a self) -> BoxFuture<'a, Result<u64>> {
		let len = self.lock().ranking.len() as u64;

		Box::pin(future::ready(Ok(len)))
	}

	fn ranking_range<'a>(
		&'a self,
		start: u64,
		stop: Option<u64>,
	) -> BoxFuture<'a, Result<Vec<RankedEntry>>> {
		let entries = Self::sorted_ranking(&self.lock());
		let start = (start as usize).min(entries.len());
		let stop = stop.map(|stop| (stop as usize).min(entries.len())).unwrap_or(entries.len());
		let page = if start < stop { entries[start..stop].to_vec() } else { Vec::new() };

		Box::pin(future::ready(Ok(page)))
	}

	fn purge<'a>(&'a self, item_ids: &'a [String]) -> BoxFuture<'a, Result<()>> {
		let mut state = self.lock();

		for item_id in item_ids {
			state.details.remove(item_id);
			state.users.remove(item_id);
			state.ranking.remove(item_id);
		}

		Box::pin(future::ready(Ok(())))
	}

	fn purge_below<'a>(
		&'a self,
		item_ids: &'a [String],
		min_users: u64,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		let mut state = self.lock();
		let mut purged = Vec::new();

		for item_id in item_ids {
			let users = state.users.get(item_id).map(|set| set.len() as u64).unwrap_or(0);

			if users >= min_users {
				continue;
			}

			state.details.remove(item_id);
			state.users.remove(item_id);
			state.ranking.remove(item_id);
			purged.push(item_id.clone());
		}

		Box::pin(future::ready(Ok(purged)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn orders_ties_by_descending_id() {
		let store = MemoryStore::new();
		let items: Vec<StoredItem> = [("a", 1.0), ("b", 1.0), ("c", 2.0)]
			.into_iter()
			.map(|(item_id, score)| StoredItem {
				item_id: item_id.to_string(),
				detail: "{}".to_string(),
				score,
			})
			.collect();

		store.upsert_items(&items).await.expect("upsert failed");

		let ids: Vec<String> = store
			.ranking_range(0, None)
			.await
			.expect("range failed")
			.into_iter()
			.map(|entry| entry.item_id)
			.collect();

		assert_eq!(ids, vec!["c", "b", "a"]);
	}
}
