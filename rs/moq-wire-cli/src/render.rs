use moq_wire::{Record, Value};

/// Payloads at or above this size render as a byte count, not hex.
const HEX_LIMIT: usize = 100;

fn bytes_text(data: &[u8]) -> String {
	if data.len() >= HEX_LIMIT {
		format!("<{} bytes>", data.len())
	} else {
		hex::encode(data)
	}
}

fn scalar_text(value: &Value) -> Option<String> {
	match value {
		Value::U64(v) => Some(v.to_string()),
		Value::Bool(v) => Some(v.to_string()),
		Value::Text(v) => Some(v.clone()),
		Value::Bytes(v) => Some(bytes_text(v)),
		Value::List(_) | Value::Nested(_) => None,
	}
}

/// Indented text rendering, two spaces per level.
pub fn pretty(record: &Record) -> String {
	let mut out = String::new();
	write_record(record, 0, &mut out);
	out
}

fn write_record(record: &Record, indent: usize, out: &mut String) {
	let pad = "  ".repeat(indent);

	for (key, value) in record.fields() {
		match scalar_text(value) {
			Some(text) => out.push_str(&format!("{pad}{key}: {text}\n")),
			None => match value {
				Value::List(items) if items.is_empty() => {
					out.push_str(&format!("{pad}{key}: []\n"));
				}
				Value::List(items) => {
					out.push_str(&format!("{pad}{key}:\n"));
					for item in items {
						match scalar_text(item) {
							Some(text) => out.push_str(&format!("{pad}  - {text}\n")),
							None => {
								out.push_str(&format!("{pad}  -\n"));
								match item {
									Value::Nested(rec) => write_record(rec, indent + 2, out),
									Value::List(_) => {}
									_ => unreachable!(),
								}
							}
						}
					}
				}
				Value::Nested(rec) => {
					out.push_str(&format!("{pad}{key}:\n"));
					write_record(rec, indent + 1, out);
				}
				_ => unreachable!(),
			},
		}
	}
}

/// JSON rendering with the same hex and summarization rules.
pub fn to_json(record: &Record) -> serde_json::Value {
	record_json(record)
}

fn record_json(record: &Record) -> serde_json::Value {
	let mut map = serde_json::Map::new();
	for (key, value) in record.fields() {
		map.insert(key.to_string(), value_json(value));
	}
	serde_json::Value::Object(map)
}

fn value_json(value: &Value) -> serde_json::Value {
	match value {
		Value::U64(v) => serde_json::Value::from(*v),
		Value::Bool(v) => serde_json::Value::from(*v),
		Value::Text(v) => serde_json::Value::from(v.clone()),
		Value::Bytes(v) => serde_json::Value::from(bytes_text(v)),
		Value::List(items) => serde_json::Value::Array(items.iter().map(value_json).collect()),
		Value::Nested(rec) => record_json(rec),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_bytes_summarized_at_limit() {
		assert_eq!(bytes_text(&[0xab; 2]), "abab");
		assert_eq!(bytes_text(&[0x00; 99]).len(), 198);
		assert_eq!(bytes_text(&[0x00; 100]), "<100 bytes>");
	}

	#[test]
	fn test_pretty_nesting() {
		let mut inner = Record::new();
		inner.set("group", 5u64);

		let mut rec = Record::new();
		rec.set("message", "SUBSCRIBE");
		rec.set("start_location", inner);
		rec.set("parameters", Vec::<Value>::new());

		let text = pretty(&rec);
		assert_eq!(
			text,
			"message: SUBSCRIBE\nstart_location:\n  group: 5\nparameters: []\n"
		);
	}

	#[test]
	fn test_json_shape() {
		let mut rec = Record::new();
		rec.set("message", "GOAWAY");
		rec.set("payload", vec![0xca, 0xfe]);

		let json = to_json(&rec);
		assert_eq!(json["message"], "GOAWAY");
		assert_eq!(json["payload"], "cafe");
	}
}
