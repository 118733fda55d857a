use std::collections::BTreeSet;

use time::macros::datetime;

use bt_domain::{Collection, ItemDetail, interest, scoring};

#[test]
fn two_users_on_one_item_make_a_candidate() {
	let collections: Vec<Collection> = serde_json::from_value(serde_json::json!([
		{ "user_id": "a", "items": [{ "data": { "item_id": "42" } }] },
		{ "user_id": "b", "items": [{ "data": { "item_id": 42 } }, { "data": { "item_id": "7" } }] }
	]))
	.expect("Failed to parse collections.");
	let users = interest::unique_users(&collections);

	assert_eq!(users["42"], BTreeSet::from(["a".to_string(), "b".to_string()]));
	assert!(interest::is_candidate(users["42"].len() as u64));
	assert!(!interest::is_candidate(users["7"].len() as u64));
}

#[test]
fn collection_without_items_field_is_rejected() {
	let parsed = serde_json::from_value::<Vec<Collection>>(serde_json::json!([{ "user_id": "a" }]));

	assert!(parsed.is_err());
}

#[test]
fn stored_blob_round_trips_user_count() {
	let now = datetime!(2020-06-01 00:00 UTC);
	let mut detail: ItemDetail = serde_json::from_value(serde_json::json!({
		"item_id": "42",
		"state": "active",
		"quantity": 1,
		"views": 9000,
		"materials": [],
		"creation_tsz": (now.unix_timestamp() - 1_000 * 86_400) as f64
	}))
	.expect("Failed to parse detail.");
	let cfg = bt_config::Scoring { user_weight: 100.0, gold_bonus: 50.0, age_pivot_days: 1_000.0 };

	detail.users = Some(2);

	let blob = serde_json::to_string(&detail).expect("Failed to encode detail.");
	let restored: ItemDetail = serde_json::from_str(&blob).expect("Failed to decode detail.");

	assert_eq!(restored.users, Some(2));
	assert!(!blob.contains("Shop"));
	assert_eq!(scoring::score(&restored, 2, &cfg, now), 0.0);
}
