pub mod discovery;
pub mod enrichment;
pub mod retention;
pub mod scrub;
pub mod top;

mod error;

pub use bt_storage::BoxFuture;
pub use discovery::DiscoveryReport;
pub use enrichment::EnrichmentReport;
pub use error::{Error, Result};
pub use retention::RetentionReport;
pub use scrub::ScrubReport;
pub use top::Treasure;

use std::sync::Arc;

use bt_catalog::CatalogClient;
use bt_config::Config;
use bt_domain::{Collection, ItemDetail};
use bt_storage::Store;

/// Read access to the external catalog.
pub trait Catalog
where
	Self: Send + Sync,
{
	fn fetch_collections<'a>(&'a self) -> BoxFuture<'a, bt_catalog::Result<Vec<Collection>>>;

	fn fetch_item_details<'a>(
		&'a self,
		item_ids: &'a [String],
	) -> BoxFuture<'a, bt_catalog::Result<Vec<ItemDetail>>>;
}

impl Catalog for CatalogClient {
	fn fetch_collections<'a>(&'a self) -> BoxFuture<'a, bt_catalog::Result<Vec<Collection>>> {
		Box::pin(CatalogClient::fetch_collections(self))
	}

	fn fetch_item_details<'a>(
		&'a self,
		item_ids: &'a [String],
	) -> BoxFuture<'a, bt_catalog::Result<Vec<ItemDetail>>> {
		Box::pin(CatalogClient::fetch_item_details(self, item_ids))
	}
}

/// The treasure pipeline. Holds no pipeline state of its own; every operation re-reads the
/// store.
pub struct TreasureService {
	pub cfg: Config,
	pub store: Arc<dyn Store>,
	pub catalog: Arc<dyn Catalog>,
}
impl TreasureService {
	pub fn new(cfg: Config, store: Arc<dyn Store>, catalog: Arc<dyn Catalog>) -> Self {
		Self { cfg, store, catalog }
	}

	pub(crate) fn chunk_size(&self) -> usize {
		(self.cfg.catalog.chunk_size as usize).max(1)
	}
}
