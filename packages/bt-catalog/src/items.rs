use bt_domain::ItemDetail;

use crate::{CatalogClient, Error, Result};

/// Fields the eligibility check, the score and the stored blob read.
pub const ITEM_FIELDS: &str =
	"item_id,state,quantity,views,materials,creation_tsz,title,price,currency_code,url";
pub const ITEM_INCLUDES: &str = "Shop,Images";

impl CatalogClient {
	/// Detail records for at most `chunk_size` ids. Ids unknown upstream are simply absent from
	/// the result.
	pub async fn fetch_item_details(&self, item_ids: &[String]) -> Result<Vec<ItemDetail>> {
		if item_ids.is_empty() {
			return Ok(Vec::new());
		}
		if item_ids.len() > self.chunk_size() {
			return Err(Error::InvalidRequest {
				message: format!(
					"Requested {} items but the catalog chunk size is {}.",
					item_ids.len(),
					self.chunk_size()
				),
			});
		}

		let path = format!("items/{}", item_ids.join(","));
		let details: Vec<ItemDetail> = self
			.get_results(&path, &[("fields", ITEM_FIELDS), ("includes", ITEM_INCLUDES)])
			.await?;

		tracing::debug!(requested = item_ids.len(), found = details.len(), "Fetched item details.");

		Ok(details)
	}
}
