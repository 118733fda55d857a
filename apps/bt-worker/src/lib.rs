pub mod worker;

pub use worker::Job;

use std::{path::PathBuf, sync::Arc};

use clap::Parser;

use bt_catalog::CatalogClient;
use bt_service::TreasureService;
use bt_storage::redis_store::RedisStore;

#[derive(Debug, Parser)]
#[command(
	version = bt_cli::VERSION,
	rename_all = "kebab",
	styles = bt_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Run a single job, print its report and exit instead of scheduling.
	#[arg(long, value_enum, value_name = "JOB")]
	pub once: Option<Job>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = bt_config::load(&args.config)?;

	bt_cli::init_tracing(&config.service.log_level);

	let store = RedisStore::connect(&config.storage.redis).await?;
	let catalog = CatalogClient::new(&config.catalog)?;

	tracing::info!(prefix = store.keys().prefix(), "Connected to the interest store.");

	let service = Arc::new(TreasureService::new(config, Arc::new(store), Arc::new(catalog)));

	match args.once {
		Some(job) => {
			let report = job.run(&service).await?;

			println!("{}", serde_json::to_string_pretty(&report)?);

			Ok(())
		},
		None => worker::run_scheduler(service).await,
	}
}
