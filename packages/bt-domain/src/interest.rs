use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

/// Distinct users an item needs before it is worth an enrichment call.
pub const PROMOTION_THRESHOLD: u64 = 2;

/// A user's curated list of item references ("treasury"), consumed transiently by discovery.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Collection {
	#[serde(deserialize_with = "crate::id::deserialize")]
	pub user_id: String,
	pub items: Vec<ItemReference>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ItemReference {
	pub data: ItemReferenceData,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ItemReferenceData {
	#[serde(deserialize_with = "crate::id::deserialize")]
	pub item_id: String,
}

/// Maps every referenced item to the distinct users that referenced it in `collections`.
pub fn unique_users(collections: &[Collection]) -> BTreeMap<String, BTreeSet<String>> {
	let mut items: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

	for collection in collections {
		for reference in &collection.items {
			items
				.entry(reference.data.item_id.clone())
				.or_default()
				.insert(collection.user_id.clone());
		}
	}

	items
}

pub fn is_candidate(distinct_users: u64) -> bool {
	distinct_users >= PROMOTION_THRESHOLD
}

#[cfg(test)]
mod tests {
	use super::*;

	fn collection(user_id: &str, item_ids: &[&str]) -> Collection {
		Collection {
			user_id: user_id.to_string(),
			items: item_ids
				.iter()
				.map(|item_id| ItemReference {
					data: ItemReferenceData { item_id: item_id.to_string() },
				})
				.collect(),
		}
	}

	#[test]
	fn deduplicates_users_per_item() {
		let collections = vec![
			collection("1", &["1"]),
			collection("1", &["1", "2"]),
			collection("2", &["2"]),
		];
		let users = unique_users(&collections);

		assert_eq!(users["1"], BTreeSet::from(["1".to_string()]));
		assert_eq!(users["2"], BTreeSet::from(["1".to_string(), "2".to_string()]));
	}

	#[test]
	fn empty_batch_yields_empty_map() {
		assert!(unique_users(&[]).is_empty());
	}

	#[test]
	fn candidacy_starts_at_two_users() {
		assert!(!is_candidate(0));
		assert!(!is_candidate(1));
		assert!(is_candidate(2));
		assert!(is_candidate(40));
	}
}
