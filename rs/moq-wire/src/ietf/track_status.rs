use bytes::Buf;

use crate::{
	coding::{Decode, FullTrackName, TokenCache, VersionParameters},
	Error, Record, Value,
};

/// TRACK_STATUS_REQUEST message (0x0d).
#[derive(Debug, Clone)]
pub struct TrackStatusRequest {
	pub request_id: u64,
	pub track: FullTrackName,
	pub parameters: VersionParameters,
}

impl TrackStatusRequest {
	pub const ID: u64 = 0x0d;

	pub fn decode<B: Buf>(r: &mut B, cache: &mut TokenCache) -> Result<Self, Error> {
		let request_id = u64::decode(r)?;
		let track = FullTrackName::decode(r)?;
		let parameters = VersionParameters::decode(r, cache)?;

		Ok(Self {
			request_id,
			track,
			parameters,
		})
	}

	pub fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.set("message", "TRACK_STATUS_REQUEST");
		rec.set("request_id", self.request_id);
		rec.set(
			"track_namespace",
			self.track
				.namespace
				.elements()
				.iter()
				.map(|field| Value::Bytes(field.clone()))
				.collect::<Vec<_>>(),
		);
		rec.set("track_name", self.track.name.clone());
		rec.set("parameters", self.parameters.record());
		rec
	}
}
