/// One node in a decoded record.
///
/// Bytes are stored raw; how they render (hex, summarized) is the
/// renderer's choice, not the decoder's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
	U64(u64),
	Bool(bool),
	Text(String),
	Bytes(Vec<u8>),
	List(Vec<Value>),
	Nested(Record),
}

/// An order-preserving key/value tree describing one decoded message.
///
/// Records are produced fresh per decode and hold no references into the
/// session state.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Record {
	fields: Vec<(&'static str, Value)>,
}

impl Record {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set(&mut self, key: &'static str, value: impl Into<Value>) {
		self.fields.push((key, value.into()));
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.fields
			.iter()
			.find_map(|(k, v)| (*k == key).then_some(v))
	}

	pub fn fields(&self) -> &[(&'static str, Value)] {
		&self.fields
	}
}

impl From<u64> for Value {
	fn from(v: u64) -> Self {
		Self::U64(v)
	}
}

impl From<u8> for Value {
	fn from(v: u8) -> Self {
		Self::U64(v as u64)
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Self::Bool(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Self::Text(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Self::Text(v)
	}
}

impl From<Vec<u8>> for Value {
	fn from(v: Vec<u8>) -> Self {
		Self::Bytes(v)
	}
}

impl From<Vec<Value>> for Value {
	fn from(v: Vec<Value>) -> Self {
		Self::List(v)
	}
}

impl From<Record> for Value {
	fn from(v: Record) -> Self {
		Self::Nested(v)
	}
}
