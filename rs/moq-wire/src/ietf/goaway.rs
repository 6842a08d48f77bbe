use bytes::Buf;

use crate::{
	coding::{Decode, DecodeError},
	Error, Record, Violation,
};

/// Longest URI accepted in a GOAWAY.
pub const MAX_URI_SIZE: usize = 8192;

/// GOAWAY message (0x10).
/// Asks the peer to migrate to a new URI, or to the current one when empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoAway {
	pub uri: Option<String>,
}

impl GoAway {
	pub const ID: u64 = 0x10;

	pub fn decode<B: Buf>(r: &mut B) -> Result<Self, Error> {
		let size = u64::decode(r)? as usize;
		if size > MAX_URI_SIZE {
			return Err(Violation::GoAwayUriTooLong(size).into());
		}
		if r.remaining() < size {
			return Err(DecodeError::Short.into());
		}

		let uri = if size == 0 {
			None
		} else {
			let data = r.copy_to_bytes(size).to_vec();
			Some(String::from_utf8(data).map_err(|_| DecodeError::NonUtf8)?)
		};

		Ok(Self { uri })
	}

	pub fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.set("message", "GOAWAY");
		if let Some(uri) = &self.uri {
			rec.set("uri", uri.clone());
		}
		rec
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_goaway_empty_uri() {
		let mut buf: &[u8] = &[0x00];
		let msg = GoAway::decode(&mut buf).unwrap();
		assert_eq!(msg.uri, None);
	}

	#[test]
	fn test_goaway_uri() {
		#[rustfmt::skip]
		let mut buf: &[u8] = &[
			0x10, // 16 bytes
			0x68, 0x74, 0x74, 0x70, 0x73, 0x3a, 0x2f, 0x2f, // "https://"
			0x61, 0x2e, 0x62, 0x2f, 0x6d, 0x6f, 0x71, 0x74, // "a.b/moqt"
		];
		let msg = GoAway::decode(&mut buf).unwrap();
		assert_eq!(msg.uri.as_deref(), Some("https://a.b/moqt"));
	}

	#[test]
	fn test_goaway_uri_too_long() {
		use crate::coding::Encode;

		let mut encoded = Vec::new();
		8193u64.encode(&mut encoded).unwrap();
		encoded.extend(std::iter::repeat(0x61).take(8193));

		let mut buf: &[u8] = &encoded;
		assert_eq!(
			GoAway::decode(&mut buf),
			Err(Violation::GoAwayUriTooLong(8193).into())
		);
	}

	#[test]
	fn test_goaway_truncated() {
		let mut buf: &[u8] = &[0x05, 0x61, 0x62];
		assert_eq!(GoAway::decode(&mut buf), Err(DecodeError::Short.into()));
	}
}
