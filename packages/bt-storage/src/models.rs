#[derive(Clone, Debug, PartialEq)]
pub struct RankedEntry {
	pub item_id: String,
	pub score: f64,
}

/// A scored item ready to be written: the serialized detail blob plus its ranking score.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredItem {
	pub item_id: String,
	pub detail: String,
	pub score: f64,
}
