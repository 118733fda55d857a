//! Catalog identifiers arrive either as JSON strings or as JSON integers; both are kept as their
//! decimal string form so they compare the same way everywhere.

use std::fmt;

use serde::{
	Deserializer,
	de::{self, Visitor},
};

pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	deserializer.deserialize_any(IdVisitor)
}

struct IdVisitor;
impl<'de> Visitor<'de> for IdVisitor {
	type Value = String;

	fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		formatter.write_str("a string or integer identifier")
	}

	fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
	where
		E: de::Error,
	{
		let trimmed = value.trim();

		if trimmed.is_empty() {
			return Err(E::invalid_value(de::Unexpected::Str(value), &self));
		}

		Ok(trimmed.to_string())
	}

	fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
	where
		E: de::Error,
	{
		Ok(value.to_string())
	}

	fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
	where
		E: de::Error,
	{
		Ok(value.to_string())
	}
}
