use std::collections::HashMap;

use bytes::Buf;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
	coding::{Decode, DecodeError},
	Error, Violation,
};

/// Budget charged per live cache entry on top of the token value itself.
/// This is the currency agreed with peers, not the wire size of the entry.
const ENTRY_OVERHEAD: u64 = 8;

/// Alias operations carried at the front of an AUTHORIZATION_TOKEN value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u64)]
pub enum AliasType {
	Delete = 0x00,
	Register = 0x01,
	UseAlias = 0x02,
	UseValue = 0x03,
}

/// A decoded AUTHORIZATION_TOKEN parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthToken {
	Delete { alias: u64 },
	Register { alias: u64, token_type: u64, value: Vec<u8> },
	UseAlias { alias: u64 },
	UseValue { token_type: u64, value: Vec<u8> },
}

impl AuthToken {
	/// Decode one token operation and apply it to the cache.
	///
	/// REGISTER commits as soon as its own grammar completes; a failure later
	/// in the surrounding message does not roll it back.
	pub fn decode(data: &[u8], cache: &mut TokenCache) -> Result<Self, Error> {
		let mut r = data;

		let alias_type = u64::decode(&mut r)?;
		let alias_type = AliasType::try_from(alias_type).map_err(|_| Violation::UnknownAliasType(alias_type))?;

		let token = match alias_type {
			AliasType::Delete => {
				let alias = u64::decode(&mut r)?;
				if r.has_remaining() {
					return Err(DecodeError::ExpectedEnd.into());
				}

				cache.delete(alias);
				Self::Delete { alias }
			}
			AliasType::Register => {
				let alias = u64::decode(&mut r)?;
				let token_type = u64::decode(&mut r)?;
				let value = r.copy_to_bytes(r.remaining()).to_vec();

				cache.register(alias, value.clone())?;
				Self::Register {
					alias,
					token_type,
					value,
				}
			}
			AliasType::UseAlias => {
				let alias = u64::decode(&mut r)?;
				if r.has_remaining() {
					return Err(DecodeError::ExpectedEnd.into());
				}

				cache.use_alias(alias)?;
				Self::UseAlias { alias }
			}
			AliasType::UseValue => {
				let token_type = u64::decode(&mut r)?;
				let value = r.copy_to_bytes(r.remaining()).to_vec();
				Self::UseValue { token_type, value }
			}
		};

		Ok(token)
	}
}

/// The per-session alias cache, bounded by the negotiated
/// MAX_AUTH_TOKEN_CACHE_SIZE.
#[derive(Default, Debug, Clone)]
pub struct TokenCache {
	max_size: u64,
	current_size: u64,
	entries: HashMap<u64, Vec<u8>>,
}

impl TokenCache {
	pub fn new(max_size: u64) -> Self {
		Self {
			max_size,
			..Default::default()
		}
	}

	pub fn set_max_size(&mut self, max_size: u64) {
		self.max_size = max_size;
	}

	pub fn max_size(&self) -> u64 {
		self.max_size
	}

	pub fn current_size(&self) -> u64 {
		self.current_size
	}

	/// Remove an alias. Absent aliases are ignored.
	pub fn delete(&mut self, alias: u64) {
		if let Some(old) = self.entries.remove(&alias) {
			self.current_size -= ENTRY_OVERHEAD + old.len() as u64;
		}
	}

	pub fn register(&mut self, alias: u64, value: Vec<u8>) -> Result<(), Violation> {
		if self.entries.contains_key(&alias) {
			return Err(Violation::DuplicateAuthTokenAlias(alias));
		}

		let needed = self.current_size + ENTRY_OVERHEAD + value.len() as u64;
		if needed > self.max_size {
			return Err(Violation::AuthTokenCacheOverflow {
				needed,
				max: self.max_size,
			});
		}

		self.current_size = needed;
		self.entries.insert(alias, value);
		Ok(())
	}

	pub fn use_alias(&self, alias: u64) -> Result<(), Violation> {
		if !self.entries.contains_key(&alias) {
			return Err(Violation::UnknownAuthTokenAlias(alias));
		}

		Ok(())
	}
}
