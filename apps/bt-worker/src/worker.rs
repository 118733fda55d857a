use std::{sync::Arc, time::Duration};

use clap::ValueEnum;
use serde_json::Value;
use tokio::{
	sync::watch,
	task::JoinHandle,
	time::{self, MissedTickBehavior},
};

use bt_config::Config;
use bt_service::TreasureService;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Job {
	Discovery,
	Enrichment,
	Retention,
	Scrub,
}
impl Job {
	pub const ALL: [Self; 4] = [Self::Discovery, Self::Enrichment, Self::Retention, Self::Scrub];

	pub fn name(self) -> &'static str {
		match self {
			Self::Discovery => "discovery",
			Self::Enrichment => "enrichment",
			Self::Retention => "retention",
			Self::Scrub => "scrub",
		}
	}

	pub fn period(self, cfg: &Config) -> Duration {
		let secs = match self {
			Self::Discovery => cfg.schedule.discovery_secs,
			Self::Enrichment => cfg.schedule.enrichment_secs,
			Self::Retention => cfg.schedule.retention_secs,
			Self::Scrub => cfg.schedule.scrub_secs,
		};

		Duration::from_secs(secs.max(1))
	}

	/// Runs the job once to completion and returns its report.
	pub async fn run(self, service: &TreasureService) -> bt_service::Result<Value> {
		let listing_limit = u64::from(service.cfg.retention.listing_limit);
		let report = match self {
			Self::Discovery => serde_json::to_value(service.run_discovery().await?)?,
			Self::Enrichment =>
				serde_json::to_value(service.run_enrichment_sweep(listing_limit).await?)?,
			Self::Retention => serde_json::to_value(service.retain(listing_limit).await?)?,
			Self::Scrub => serde_json::to_value(
				service.scrub(u64::from(service.cfg.retention.scrub_preserve)).await?,
			)?,
		};

		Ok(report)
	}
}

/// Runs every job on its own interval until Ctrl-C.
///
/// Jobs already running when the signal arrives finish before the loops exit.
pub async fn run_scheduler(service: Arc<TreasureService>) -> color_eyre::Result<()> {
	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let handles: Vec<JoinHandle<()>> = Job::ALL
		.into_iter()
		.map(|job| tokio::spawn(run_loop(job, service.clone(), shutdown_rx.clone())))
		.collect();

	tracing::info!(jobs = handles.len(), "Scheduler started.");

	tokio::signal::ctrl_c().await?;

	tracing::info!("Shutdown requested. Waiting for running jobs.");

	shutdown_tx.send_replace(true);

	for handle in handles {
		handle.await?;
	}

	tracing::info!("Scheduler stopped.");

	Ok(())
}

async fn run_loop(job: Job, service: Arc<TreasureService>, mut shutdown: watch::Receiver<bool>) {
	let mut interval = time::interval(job.period(&service.cfg));

	interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

	loop {
		tokio::select! {
			_ = interval.tick() => {},
			_ = shutdown.changed() => break,
		}

		run_tick(job, &service).await;

		if *shutdown.borrow() {
			break;
		}
	}

	tracing::debug!(job = job.name(), "Job loop stopped.");
}

/// A failed job is logged and left for the next tick.
async fn run_tick(job: Job, service: &TreasureService) -> bool {
	match job.run(service).await {
		Ok(report) => {
			tracing::info!(job = job.name(), %report, "Job finished.");

			true
		},
		Err(err) => {
			tracing::error!(job = job.name(), error = %err, "Job failed.");

			false
		},
	}
}
