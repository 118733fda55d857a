pub mod keys;
pub mod memory;
pub mod models;
pub mod redis_store;

mod error;

pub use error::Error;

use std::{collections::BTreeSet, future::Future, pin::Pin};

use models::{RankedEntry, StoredItem};

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Shared state of the treasure pipeline: interest sets, detail blobs and the ranking.
///
/// Batch operations are issued as one round trip. Each item inside a batch is updated
/// independently; only `purge` is atomic per item.
pub trait Store
where
	Self: Send + Sync,
{
	/// Unions each user list into the item's interest set and returns the post-merge
	/// cardinalities, in input order.
	fn merge_interest<'a>(
		&'a self,
		batch: &'a [(String, Vec<String>)],
	) -> BoxFuture<'a, Result<Vec<u64>>>;

	/// Interest set cardinalities in input order; a missing set counts as zero.
	fn interest_counts<'a>(&'a self, item_ids: &'a [String]) -> BoxFuture<'a, Result<Vec<u64>>>;

	fn interest_members<'a>(&'a self, item_id: &'a str)
	-> BoxFuture<'a, Result<BTreeSet<String>>>;

	/// Ids of every item that currently has an interest set.
	fn interest_ids<'a>(&'a self) -> BoxFuture<'a, Result<Vec<String>>>;

	/// Writes each item's detail blob and overwrites its ranking score.
	fn upsert_items<'a>(&'a self, items: &'a [StoredItem]) -> BoxFuture<'a, Result<()>>;

	fn detail<'a>(&'a self, item_id: &'a str) -> BoxFuture<'a, Result<Option<String>>>;

	fn score<'a>(&'a self, item_id: &'a str) -> BoxFuture<'a, Result<Option<f64>>>;

	fn ranking_len<'a>(&'a self) -> BoxFuture<'a, Result<u64>>;

	/// Ranking entries best-first, from `start` up to but excluding `stop`; `None` reads to
	/// the end.
	fn ranking_range<'a>(
		&'a self,
		start: u64,
		stop: Option<u64>,
	) -> BoxFuture<'a, Result<Vec<RankedEntry>>>;

	/// Removes detail blob, interest set and ranking entry of every id.
	fn purge<'a>(&'a self, item_ids: &'a [String]) -> BoxFuture<'a, Result<()>>;

	/// Purges each item whose interest set has fewer than `min_users` members and returns the
	/// purged ids in input order.
	///
	/// The check and the purge are one atomic step per item, so a set that gains members
	/// concurrently is never removed.
	fn purge_below<'a>(
		&'a self,
		item_ids: &'a [String],
		min_users: u64,
	) -> BoxFuture<'a, Result<Vec<String>>>;
}
