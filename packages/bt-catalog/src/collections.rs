use bt_domain::Collection;

use crate::{CatalogClient, Result};

const COLLECTIONS_PATH: &str = "collections";
const COLLECTION_FIELDS: &str = "user_id,items";

impl CatalogClient {
	/// Most recently created collections, newest first.
	pub async fn fetch_collections(&self) -> Result<Vec<Collection>> {
		let collections: Vec<Collection> = self
			.get_results(COLLECTIONS_PATH, &[("sort", "created"), ("fields", COLLECTION_FIELDS)])
			.await?;

		tracing::debug!(count = collections.len(), "Fetched recent collections.");

		Ok(collections)
	}
}
