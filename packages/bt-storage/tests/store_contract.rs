use std::collections::BTreeSet;

use bt_storage::{
	Store,
	memory::MemoryStore,
	models::{RankedEntry, StoredItem},
	redis_store::RedisStore,
};

fn stored(item_id: &str, score: f64) -> StoredItem {
	StoredItem {
		item_id: item_id.to_string(),
		detail: format!(r#"{{"item_id":"{item_id}"}}"#),
		score,
	}
}

fn users(ids: &[&str]) -> Vec<String> {
	ids.iter().map(|id| id.to_string()).collect()
}

async fn merge_unions_and_reports_cardinality(store: &dyn Store) {
	let first = store
		.merge_interest(&[("1".to_string(), users(&["a"])), ("2".to_string(), users(&["a", "b"]))])
		.await
		.expect("Failed to merge interest.");

	assert_eq!(first, vec![1, 2]);

	let second = store
		.merge_interest(&[("1".to_string(), users(&["a", "c"])), ("3".to_string(), Vec::new())])
		.await
		.expect("Failed to merge interest.");

	assert_eq!(second, vec![2, 0]);
	assert_eq!(
		store.interest_members("1").await.expect("Failed to read members."),
		BTreeSet::from(["a".to_string(), "c".to_string()])
	);
	assert_eq!(
		store
			.interest_counts(&["1".to_string(), "2".to_string(), "missing".to_string()])
			.await
			.expect("Failed to count interest."),
		vec![2, 2, 0]
	);

	let mut ids = store.interest_ids().await.expect("Failed to list interest sets.");

	ids.sort();

	assert_eq!(ids, vec!["1", "2"]);
}

async fn ranking_orders_best_first_and_overwrites(store: &dyn Store) {
	store
		.upsert_items(&[stored("low", 1.0), stored("mid", 5.0), stored("high", 9.0)])
		.await
		.expect("Failed to upsert items.");
	store.upsert_items(&[stored("low", 7.0)]).await.expect("Failed to upsert items.");

	assert_eq!(store.ranking_len().await.expect("Failed to count ranking."), 3);
	assert_eq!(store.score("low").await.expect("Failed to read score."), Some(7.0));
	assert_eq!(
		store.ranking_range(0, None).await.expect("Failed to read ranking."),
		vec![
			RankedEntry { item_id: "high".to_string(), score: 9.0 },
			RankedEntry { item_id: "low".to_string(), score: 7.0 },
			RankedEntry { item_id: "mid".to_string(), score: 5.0 },
		]
	);

	let tail = store.ranking_range(1, Some(2)).await.expect("Failed to read ranking.");

	assert_eq!(tail.len(), 1);
	assert_eq!(tail[0].item_id, "low");
	assert!(store.ranking_range(2, Some(2)).await.expect("Failed to read ranking.").is_empty());
	assert!(store.ranking_range(10, None).await.expect("Failed to read ranking.").is_empty());
	assert_eq!(
		store.detail("high").await.expect("Failed to read detail."),
		Some(r#"{"item_id":"high"}"#.to_string())
	);
}

async fn purge_removes_every_trace(store: &dyn Store) {
	store.merge_interest(&[("p".to_string(), users(&["a", "b"]))]).await.expect("merge failed");
	store.upsert_items(&[stored("p", 3.0), stored("keep", 1.0)]).await.expect("upsert failed");
	store.purge(&["p".to_string(), "never-stored".to_string()]).await.expect("purge failed");

	assert_eq!(store.detail("p").await.expect("detail failed"), None);
	assert_eq!(store.score("p").await.expect("score failed"), None);
	assert!(store.interest_members("p").await.expect("members failed").is_empty());
	assert_eq!(store.score("keep").await.expect("score failed"), Some(1.0));
}

async fn purge_below_spares_promoted_sets(store: &dyn Store) {
	store
		.merge_interest(&[
			("lonely".to_string(), users(&["a"])),
			("shared".to_string(), users(&["a", "b"])),
		])
		.await
		.expect("merge failed");
	store.upsert_items(&[stored("lonely", 1.0), stored("shared", 2.0)]).await.expect("upsert failed");

	let purged = store
		.purge_below(&["shared".to_string(), "lonely".to_string(), "never-stored".to_string()], 2)
		.await
		.expect("conditional purge failed");

	assert_eq!(purged, vec!["lonely", "never-stored"]);
	assert_eq!(store.detail("lonely").await.expect("detail failed"), None);
	assert_eq!(store.score("lonely").await.expect("score failed"), None);
	assert_eq!(store.interest_counts(&["shared".to_string()]).await.expect("count failed"), vec![2]);
	assert_eq!(store.score("shared").await.expect("score failed"), Some(2.0));
}

#[tokio::test]
async fn memory_store_merges_interest() {
	merge_unions_and_reports_cardinality(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_store_ranks_items() {
	ranking_orders_best_first_and_overwrites(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_store_purges_items() {
	purge_removes_every_trace(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_store_purges_only_unpromoted_items() {
	purge_below_spares_promoted_sets(&MemoryStore::new()).await;
}

#[tokio::test]
#[ignore = "Requires external Redis. Set BT_REDIS_URL to run."]
async fn redis_store_satisfies_store_contract() {
	let Some(url) = bt_testkit::env_redis_url() else {
		eprintln!("Skipping redis_store_satisfies_store_contract; set BT_REDIS_URL to run this test.");

		return;
	};

	for scenario in 0..4 {
		let keyspace =
			bt_testkit::TestKeyspace::new(&url).await.expect("Failed to create test keyspace.");
		let store =
			RedisStore::connect(&keyspace.redis_config()).await.expect("Failed to connect to Redis.");

		match scenario {
			0 => merge_unions_and_reports_cardinality(&store).await,
			1 => ranking_orders_best_first_and_overwrites(&store).await,
			2 => purge_removes_every_trace(&store).await,
			_ => purge_below_spares_promoted_sets(&store).await,
		}

		keyspace.cleanup().await.expect("Failed to clean up test keyspace.");
	}
}
