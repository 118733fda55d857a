use serde::{Deserialize, Serialize};

/// Detail record of a catalog item, as fetched for enrichment and stored as the item blob.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ItemDetail {
	#[serde(deserialize_with = "crate::id::deserialize")]
	pub item_id: String,
	pub state: String,
	pub quantity: u64,
	pub views: u64,
	pub materials: Vec<String>,
	/// Unix seconds.
	pub creation_tsz: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub price: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub currency_code: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	#[serde(rename = "Shop", default, skip_serializing_if = "Option::is_none")]
	pub shop: Option<ItemShop>,
	#[serde(rename = "Images", default, skip_serializing_if = "Vec::is_empty")]
	pub images: Vec<ItemImage>,
	/// Distinct-user count at the time the record was last enriched.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub users: Option<u64>,
}
impl ItemDetail {
	pub fn is_eligible(&self) -> bool {
		self.state == "active" && self.quantity > 0 && self.views > 0
	}

	pub fn has_gold(&self) -> bool {
		self.materials.iter().any(|material| material.to_lowercase().contains("gold"))
	}
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ItemShop {
	pub shop_name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ItemImage {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url_170x135: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url_fullxfull: Option<String>,
}
