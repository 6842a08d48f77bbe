use bytes::Buf;

use crate::{coding::Decode, Error, Record};

/// MAX_REQUEST_ID message (0x15).
/// Raises the ceiling on the peer's request ids; never lowers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxRequestId {
	pub request_id: u64,
}

impl MaxRequestId {
	pub const ID: u64 = 0x15;

	pub fn decode<B: Buf>(r: &mut B) -> Result<Self, Error> {
		let request_id = u64::decode(r)?;
		Ok(Self { request_id })
	}

	pub fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.set("message", "MAX_REQUEST_ID");
		rec.set("request_id", self.request_id);
		rec
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_max_request_id() {
		let mut buf: &[u8] = &[0x40, 0x80];
		let msg = MaxRequestId::decode(&mut buf).unwrap();
		assert_eq!(msg.request_id, 128);
	}
}
