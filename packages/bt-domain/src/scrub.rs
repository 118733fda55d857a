use rand::{Rng, seq::index};

/// How many tracked interest sets a scrub pass inspects: half of the excess over `preserve`.
pub fn scrub_quota(tracked: usize, preserve: usize) -> usize {
	tracked.saturating_sub(preserve) / 2
}

/// Draws `scrub_quota(ids.len(), preserve)` ids without replacement.
///
/// Ids are ordered before sampling, so a seeded `rng` picks the same ids whatever order the
/// store listed them in.
pub fn sample_for_scrub<R>(ids: &[String], preserve: usize, rng: &mut R) -> Vec<String>
where
	R: Rng + ?Sized,
{
	let amount = scrub_quota(ids.len(), preserve);

	if amount == 0 {
		return Vec::new();
	}

	let mut ordered: Vec<&String> = ids.iter().collect();

	ordered.sort_unstable();

	index::sample(rng, ordered.len(), amount).into_iter().map(|idx| ordered[idx].clone()).collect()
}
