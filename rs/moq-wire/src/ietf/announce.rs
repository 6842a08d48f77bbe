use bytes::Buf;

use crate::{
	coding::{Decode, TokenCache, TrackNamespace, VersionParameters},
	Error, Record, Value,
};

/// ANNOUNCE message (0x06).
/// Declares that tracks exist under a namespace.
#[derive(Debug, Clone)]
pub struct Announce {
	pub request_id: u64,
	pub namespace: TrackNamespace,
	pub parameters: VersionParameters,
}

impl Announce {
	pub const ID: u64 = 0x06;

	pub fn decode<B: Buf>(r: &mut B, cache: &mut TokenCache) -> Result<Self, Error> {
		let request_id = u64::decode(r)?;
		let namespace = TrackNamespace::decode(r)?;
		let parameters = VersionParameters::decode(r, cache)?;

		Ok(Self {
			request_id,
			namespace,
			parameters,
		})
	}

	pub fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.set("message", "ANNOUNCE");
		rec.set("request_id", self.request_id);
		rec.set(
			"track_namespace",
			self.namespace
				.elements()
				.iter()
				.map(|field| Value::Bytes(field.clone()))
				.collect::<Vec<_>>(),
		);
		rec.set("parameters", self.parameters.record());
		rec
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_announce() {
		#[rustfmt::skip]
		let payload = [
			0x02, // request_id
			0x02, // namespace: two elements
			0x04, 0x6c, 0x69, 0x76, 0x65, // "live"
			0x02, 0x74, 0x76, // "tv"
			0x00, // no parameters
		];

		let mut cache = TokenCache::default();
		let mut buf: &[u8] = &payload;
		let msg = Announce::decode(&mut buf, &mut cache).unwrap();

		assert_eq!(msg.request_id, 2);
		assert_eq!(
			msg.namespace.elements(),
			&[b"live".to_vec(), b"tv".to_vec()]
		);
		assert!(buf.is_empty());
	}
}
