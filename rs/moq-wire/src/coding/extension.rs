use bytes::Buf;

use crate::{
	coding::{Parameter, ParameterValue},
	Error, Value,
};

/// Per-object extension headers: repeated type/value entries filling a
/// length-bounded buffer. The caller has already consumed the length.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Extensions {
	pub entries: Vec<Parameter>,
}

impl Extensions {
	pub const PRIOR_GROUP_ID_GAP: u64 = 0x40;

	pub fn decode(data: &[u8]) -> Result<Self, Error> {
		let mut r = data;

		let mut entries = Vec::new();
		while r.has_remaining() {
			entries.push(Parameter::decode(&mut r)?);
		}

		Ok(Self { entries })
	}

	pub fn prior_group_id_gap(&self) -> Option<u64> {
		self.entries.iter().find_map(|p| match p {
			Parameter {
				kind: Self::PRIOR_GROUP_ID_GAP,
				value: ParameterValue::VarInt(v),
			} => Some(*v),
			_ => None,
		})
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	fn kind_name(kind: u64) -> Option<&'static str> {
		match kind {
			Self::PRIOR_GROUP_ID_GAP => Some("PRIOR_GROUP_ID_GAP"),
			_ => None,
		}
	}

	pub fn record(&self) -> Value {
		let items = self
			.entries
			.iter()
			.map(|p| {
				let mut rec = crate::Record::new();
				match Self::kind_name(p.kind) {
					Some(name) => rec.set("type", name),
					None => rec.set("type", p.kind),
				}
				match &p.value {
					ParameterValue::VarInt(v) => rec.set("value", *v),
					ParameterValue::Bytes(v) => rec.set("value", v.clone()),
				}
				Value::Nested(rec)
			})
			.collect();

		Value::List(items)
	}
}
