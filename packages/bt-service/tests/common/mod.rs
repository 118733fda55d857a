#![allow(dead_code)]

use std::{
	collections::{HashMap, HashSet},
	sync::{Arc, Mutex},
};

use serde_json::Map;
use time::{OffsetDateTime, macros::datetime};

use bt_config::{Catalog as CatalogConfig, Config, Redis, Retention, Schedule, Scoring, Service, Storage};
use bt_domain::{Collection, ItemDetail, ItemReference, ItemReferenceData};
use bt_service::{BoxFuture, Catalog, TreasureService};
use bt_storage::memory::MemoryStore;

pub const NOW: OffsetDateTime = datetime!(2024-03-01 12:00 UTC);

#[derive(Default)]
pub struct FakeCatalog {
	pub collections: Mutex<Vec<Collection>>,
	pub details: Mutex<HashMap<String, ItemDetail>>,
	/// A detail request containing any of these ids fails with a 500.
	pub failing: Mutex<HashSet<String>>,
	pub collections_fail: Mutex<bool>,
	/// Appended to every successful detail response, requested or not.
	pub unrequested: Mutex<Vec<ItemDetail>>,
	pub calls: Mutex<Vec<Vec<String>>>,
}
impl FakeCatalog {
	pub fn set_collections(&self, collections: Vec<Collection>) {
		*self.collections.lock().unwrap() = collections;
	}

	pub fn put_detail(&self, detail: ItemDetail) {
		self.details.lock().unwrap().insert(detail.item_id.clone(), detail);
	}

	pub fn fail_on(&self, item_id: &str) {
		self.failing.lock().unwrap().insert(item_id.to_string());
	}

	pub fn calls(&self) -> Vec<Vec<String>> {
		self.calls.lock().unwrap().clone()
	}
}
impl Catalog for FakeCatalog {
	fn fetch_collections<'a>(&'a self) -> BoxFuture<'a, bt_catalog::Result<Vec<Collection>>> {
		let result = if *self.collections_fail.lock().unwrap() {
			Err(bt_catalog::Error::Upstream {
				status: 502,
				body: "<html>bad gateway</html>".to_string(),
				message: "malformed response body".to_string(),
			})
		} else {
			Ok(self.collections.lock().unwrap().clone())
		};

		Box::pin(async move { result })
	}

	fn fetch_item_details<'a>(
		&'a self,
		item_ids: &'a [String],
	) -> BoxFuture<'a, bt_catalog::Result<Vec<ItemDetail>>> {
		self.calls.lock().unwrap().push(item_ids.to_vec());

		let failing = self.failing.lock().unwrap();
		let result = if item_ids.iter().any(|item_id| failing.contains(item_id)) {
			Err(bt_catalog::Error::Upstream {
				status: 500,
				body: "boom".to_string(),
				message: "non-success status".to_string(),
			})
		} else {
			let details = self.details.lock().unwrap();
			let mut found: Vec<ItemDetail> =
				item_ids.iter().filter_map(|item_id| details.get(item_id).cloned()).collect();

			found.extend(self.unrequested.lock().unwrap().iter().cloned());

			Ok(found)
		};

		Box::pin(async move { result })
	}
}

pub fn config(chunk_size: u32) -> Config {
	Config {
		service: Service { log_level: "info".to_string() },
		storage: Storage {
			redis: Redis { url: "redis://localhost".to_string(), key_prefix: String::new() },
		},
		catalog: CatalogConfig {
			api_base: "http://catalog.test/".to_string(),
			api_key: "key".to_string(),
			timeout_ms: 1_000,
			chunk_size,
			calls_per_minute: 60,
			default_headers: Map::new(),
		},
		scoring: Scoring { user_weight: 100.0, gold_bonus: 50.0, age_pivot_days: 1_000.0 },
		retention: Retention { listing_limit: 500, scrub_preserve: 5_000 },
		schedule: Schedule::default(),
	}
}

pub struct Harness {
	pub service: TreasureService,
	pub store: Arc<MemoryStore>,
	pub catalog: Arc<FakeCatalog>,
}

pub fn harness(chunk_size: u32) -> Harness {
	let store = Arc::new(MemoryStore::new());
	let catalog = Arc::new(FakeCatalog::default());
	let service = TreasureService::new(config(chunk_size), store.clone(), catalog.clone());

	Harness { service, store, catalog }
}

pub fn collection(user_id: &str, item_ids: &[&str]) -> Collection {
	Collection {
		user_id: user_id.to_string(),
		items: item_ids
			.iter()
			.map(|item_id| ItemReference { data: ItemReferenceData { item_id: item_id.to_string() } })
			.collect(),
	}
}

pub fn detail(item_id: &str, quantity: u64, views: u64, age_days: f64) -> ItemDetail {
	ItemDetail {
		item_id: item_id.to_string(),
		state: "active".to_string(),
		quantity,
		views,
		materials: Vec::new(),
		creation_tsz: NOW.unix_timestamp() as f64 - age_days * 86_400.0,
		title: Some(format!("Item {item_id}")),
		price: Some("10.00".to_string()),
		currency_code: Some("USD".to_string()),
		url: None,
		shop: None,
		images: Vec::new(),
		users: None,
	}
}

pub fn ids(raw: &[&str]) -> Vec<String> {
	raw.iter().map(|id| id.to_string()).collect()
}
