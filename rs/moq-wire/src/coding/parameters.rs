use bytes::Buf;

use crate::{
	coding::{AuthToken, Decode, DecodeError, TokenCache},
	Error, Record, Value, Violation,
};

/// Parameter lists are count-prefixed; the cap keeps hostile input bounded.
const MAX_PARAMS: u64 = 64;

/// Largest legal length for an odd-type (length-prefixed) parameter value.
const MAX_VALUE_SIZE: usize = 65535;

/// Even type codes carry a varint, odd type codes carry opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterValue {
	VarInt(u64),
	Bytes(Vec<u8>),
}

/// One key/value entry, preserved verbatim even when the type is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
	pub kind: u64,
	pub value: ParameterValue,
}

impl Parameter {
	/// The parity dispatch shared by setup parameters, version parameters
	/// and extension headers.
	pub fn decode<B: Buf>(r: &mut B) -> Result<Self, Error> {
		let kind = u64::decode(r)?;

		let value = if kind % 2 == 0 {
			ParameterValue::VarInt(u64::decode(r)?)
		} else {
			let size = u64::decode(r)? as usize;
			if size > MAX_VALUE_SIZE {
				return Err(Violation::ParameterTooLarge(size).into());
			}
			if r.remaining() < size {
				return Err(DecodeError::Short.into());
			}

			ParameterValue::Bytes(r.copy_to_bytes(size).to_vec())
		};

		Ok(Self { kind, value })
	}

	fn record(&self, name: Option<&'static str>) -> Record {
		let mut rec = Record::new();
		match name {
			Some(name) => rec.set("type", name),
			None => rec.set("type", self.kind),
		}
		match &self.value {
			ParameterValue::VarInt(v) => rec.set("value", *v),
			ParameterValue::Bytes(v) => rec.set("value", v.clone()),
		}
		rec
	}
}

/// Parameters negotiated in CLIENT_SETUP and SERVER_SETUP.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct SetupParameters {
	pub entries: Vec<Parameter>,
}

impl SetupParameters {
	pub const PATH: u64 = 0x01;
	pub const MAX_REQUEST_ID: u64 = 0x02;
	pub const MAX_AUTH_TOKEN_CACHE_SIZE: u64 = 0x04;

	pub fn decode<B: Buf>(r: &mut B) -> Result<Self, Error> {
		let count = u64::decode(r)?;
		if count > MAX_PARAMS {
			return Err(DecodeError::TooMany.into());
		}

		let mut entries = Vec::new();
		for _ in 0..count {
			entries.push(Parameter::decode(r)?);
		}

		Ok(Self { entries })
	}

	fn varint(&self, kind: u64) -> Option<u64> {
		self.entries.iter().find_map(|p| match p {
			Parameter {
				kind: k,
				value: ParameterValue::VarInt(v),
			} if *k == kind => Some(*v),
			_ => None,
		})
	}

	pub fn path(&self) -> Option<&[u8]> {
		self.entries.iter().find_map(|p| match p {
			Parameter {
				kind: Self::PATH,
				value: ParameterValue::Bytes(v),
			} => Some(v.as_slice()),
			_ => None,
		})
	}

	pub fn max_request_id(&self) -> Option<u64> {
		self.varint(Self::MAX_REQUEST_ID)
	}

	pub fn max_auth_token_cache_size(&self) -> Option<u64> {
		self.varint(Self::MAX_AUTH_TOKEN_CACHE_SIZE)
	}

	fn kind_name(kind: u64) -> Option<&'static str> {
		match kind {
			Self::PATH => Some("PATH"),
			Self::MAX_REQUEST_ID => Some("MAX_REQUEST_ID"),
			Self::MAX_AUTH_TOKEN_CACHE_SIZE => Some("MAX_AUTH_TOKEN_CACHE_SIZE"),
			_ => None,
		}
	}

	pub fn record(&self) -> Value {
		let items = self
			.entries
			.iter()
			.map(|p| Value::Nested(p.record(Self::kind_name(p.kind))))
			.collect();
		Value::List(items)
	}
}

/// Parameters carried by the post-setup control messages.
///
/// AUTHORIZATION_TOKEN entries are routed through the token subparser as
/// they are read; everything else is kept in wire order.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct VersionParameters {
	pub entries: Vec<Parameter>,
	pub tokens: Vec<AuthToken>,
}

impl VersionParameters {
	pub const AUTHORIZATION_TOKEN: u64 = 0x01;
	pub const DELIVERY_TIMEOUT: u64 = 0x02;
	pub const MAX_CACHE_DURATION: u64 = 0x04;

	pub fn decode<B: Buf>(r: &mut B, cache: &mut TokenCache) -> Result<Self, Error> {
		let count = u64::decode(r)?;
		if count > MAX_PARAMS {
			return Err(DecodeError::TooMany.into());
		}

		let mut entries = Vec::new();
		let mut tokens = Vec::new();

		for _ in 0..count {
			let param = Parameter::decode(r)?;

			if param.kind == Self::AUTHORIZATION_TOKEN {
				if let ParameterValue::Bytes(data) = &param.value {
					tokens.push(AuthToken::decode(data, cache)?);
					continue;
				}
			}

			entries.push(param);
		}

		Ok(Self { entries, tokens })
	}

	fn varint(&self, kind: u64) -> Option<u64> {
		self.entries.iter().find_map(|p| match p {
			Parameter {
				kind: k,
				value: ParameterValue::VarInt(v),
			} if *k == kind => Some(*v),
			_ => None,
		})
	}

	pub fn delivery_timeout(&self) -> Option<u64> {
		self.varint(Self::DELIVERY_TIMEOUT)
	}

	pub fn max_cache_duration(&self) -> Option<u64> {
		self.varint(Self::MAX_CACHE_DURATION)
	}

	fn kind_name(kind: u64) -> Option<&'static str> {
		match kind {
			Self::DELIVERY_TIMEOUT => Some("DELIVERY_TIMEOUT"),
			Self::MAX_CACHE_DURATION => Some("MAX_CACHE_DURATION"),
			_ => None,
		}
	}

	pub fn record(&self) -> Value {
		let mut items: Vec<Value> = self
			.entries
			.iter()
			.map(|p| Value::Nested(p.record(Self::kind_name(p.kind))))
			.collect();

		for token in &self.tokens {
			items.push(Value::Nested(token.record()));
		}

		Value::List(items)
	}
}

impl AuthToken {
	pub fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.set("type", "AUTHORIZATION_TOKEN");

		match self {
			Self::Delete { alias } => {
				rec.set("op", "DELETE");
				rec.set("alias", *alias);
			}
			Self::Register {
				alias,
				token_type,
				value,
			} => {
				rec.set("op", "REGISTER");
				rec.set("alias", *alias);
				rec.set("token_type", *token_type);
				rec.set("value", value.clone());
			}
			Self::UseAlias { alias } => {
				rec.set("op", "USE_ALIAS");
				rec.set("alias", *alias);
			}
			Self::UseValue { token_type, value } => {
				rec.set("op", "USE_VALUE");
				rec.set("token_type", *token_type);
				rec.set("value", value.clone());
			}
		}

		rec
	}
}
