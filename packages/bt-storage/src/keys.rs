//! Key layout: `ranking` (sorted set), `item.{id}.data` (string), `item.{id}.users` (set),
//! each optionally behind a deployment prefix.

const RANKING: &str = "ranking";
const ITEM_PREFIX: &str = "item.";
const DATA_SUFFIX: &str = ".data";
const USERS_SUFFIX: &str = ".users";

#[derive(Clone, Debug, Default)]
pub struct Keys {
	prefix: String,
}
impl Keys {
	pub fn new(prefix: impl Into<String>) -> Self {
		Self { prefix: prefix.into() }
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	pub fn ranking(&self) -> String {
		format!("{}{RANKING}", self.prefix)
	}

	pub fn data(&self, item_id: &str) -> String {
		format!("{}{ITEM_PREFIX}{item_id}{DATA_SUFFIX}", self.prefix)
	}

	pub fn users(&self, item_id: &str) -> String {
		format!("{}{ITEM_PREFIX}{item_id}{USERS_SUFFIX}", self.prefix)
	}

	/// Glob matching every interest set key under this prefix.
	pub fn users_pattern(&self) -> String {
		format!("{}{ITEM_PREFIX}*{USERS_SUFFIX}", escape_glob(&self.prefix))
	}

	/// Recovers the item id from an interest set key.
	pub fn item_id_from_users<'a>(&self, key: &'a str) -> Option<&'a str> {
		key.strip_prefix(self.prefix.as_str())?
			.strip_prefix(ITEM_PREFIX)?
			.strip_suffix(USERS_SUFFIX)
			.filter(|item_id| !item_id.is_empty())
	}
}

fn escape_glob(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());

	for ch in raw.chars() {
		if matches!(ch, '*' | '?' | '[' | ']' | '\\') {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}
