use time::OffsetDateTime;

use crate::ItemDetail;

const SECONDS_PER_DAY: f64 = 86_400.0;

pub fn age_in_days(creation_tsz: f64, now: OffsetDateTime) -> f64 {
	let now_secs = now.unix_timestamp_nanos() as f64 / 1_000_000_000.0;

	(now_secs - creation_tsz) / SECONDS_PER_DAY
}

/// Recency factor `|1 - age / pivot|`.
///
/// The factor is V-shaped: it is 1 for a brand-new item, 0 at the pivot, and grows again past
/// it, so very old items are rewarded as much as very new ones.
pub fn age_factor(age_days: f64, age_pivot_days: f64) -> f64 {
	(1.0 - age_days / age_pivot_days).abs()
}

/// Scores an item from its distinct-user count, materials, age, views and stock.
///
/// `(users + gold_bonus) * user_weight * |1 - age / pivot| / (views * quantity + 1)`
pub fn score(
	item: &ItemDetail,
	users: u64,
	cfg: &bt_config::Scoring,
	now: OffsetDateTime,
) -> f64 {
	let bonus = if item.has_gold() { cfg.gold_bonus } else { 0.0 };
	let popularity = (users as f64 + bonus) * cfg.user_weight;
	let recency = age_factor(age_in_days(item.creation_tsz, now), cfg.age_pivot_days);
	let rarity = item.views as f64 * item.quantity as f64 + 1.0;
	let score = popularity * recency / rarity;

	if score.is_finite() && score > 0.0 { score } else { 0.0 }
}
