use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;

use crate::{Result, TreasureService};
use bt_domain::{interest, scrub};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScrubReport {
	/// Interest sets present when the pass started.
	pub tracked: usize,
	pub sampled: usize,
	pub purged: usize,
}

impl TreasureService {
	pub async fn scrub(&self, preserve: u64) -> Result<ScrubReport> {
		let mut rng = StdRng::from_os_rng();

		self.scrub_with_rng(preserve, &mut rng).await
	}

	/// Samples half of the interest sets in excess of `preserve` and purges the sampled items
	/// that never gained a second user. The user count is re-checked atomically at purge time.
	pub async fn scrub_with_rng<R>(&self, preserve: u64, rng: &mut R) -> Result<ScrubReport>
	where
		R: Rng + Send + ?Sized,
	{
		let tracked = self.store.interest_ids().await?;
		let preserve = usize::try_from(preserve).unwrap_or(usize::MAX);
		let sampled = scrub::sample_for_scrub(&tracked, preserve, rng);

		if sampled.is_empty() {
			tracing::debug!(tracked = tracked.len(), preserve, "Nothing to scrub.");

			return Ok(ScrubReport { tracked: tracked.len(), sampled: 0, purged: 0 });
		}

		let doomed = self.store.purge_below(&sampled, interest::PROMOTION_THRESHOLD).await?;

		tracing::info!(
			tracked = tracked.len(),
			sampled = sampled.len(),
			purged = doomed.len(),
			"Scrub purged low-interest items."
		);

		Ok(ScrubReport { tracked: tracked.len(), sampled: sampled.len(), purged: doomed.len() })
	}
}
