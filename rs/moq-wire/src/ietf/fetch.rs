use bytes::Buf;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
	coding::{Decode, FullTrackName, TokenCache, VersionParameters},
	ietf::{GroupOrder, Location},
	Error, Record, Value, Violation,
};

/// The wire codes for fetch flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u64)]
pub enum FetchType {
	Standalone = 0x01,
	RelativeJoining = 0x02,
	AbsoluteJoining = 0x03,
}

impl FetchType {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Standalone => "STANDALONE",
			Self::RelativeJoining => "RELATIVE_JOINING",
			Self::AbsoluteJoining => "ABSOLUTE_JOINING",
		}
	}
}

/// What a fetch targets: an explicit range, or a position relative to an
/// existing subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchSpec {
	Standalone {
		track: FullTrackName,
		start: Location,
		end: Location,
	},
	Joining {
		kind: FetchType,
		joining_subscribe_id: u64,
		joining_start: u64,
	},
}

/// FETCH message (0x16).
/// Requests a bounded range of past objects.
#[derive(Debug, Clone)]
pub struct Fetch {
	pub request_id: u64,
	pub subscriber_priority: u8,
	pub group_order: GroupOrder,
	pub spec: FetchSpec,
	pub parameters: VersionParameters,
}

impl Fetch {
	pub const ID: u64 = 0x16;

	pub fn decode<B: Buf>(r: &mut B, cache: &mut TokenCache) -> Result<Self, Error> {
		let request_id = u64::decode(r)?;
		let subscriber_priority = u8::decode(r)?;
		let group_order = GroupOrder::decode(r)?;

		let kind = u64::decode(r)?;
		let kind = FetchType::try_from(kind).map_err(|_| Violation::InvalidFetchType(kind))?;

		let spec = match kind {
			FetchType::Standalone => {
				let track = FullTrackName::decode(r)?;
				let start = Location::decode(r)?;
				let end = Location::decode(r)?;
				if end < start {
					return Err(Violation::FetchEndBeforeStart.into());
				}

				FetchSpec::Standalone { track, start, end }
			}
			FetchType::RelativeJoining | FetchType::AbsoluteJoining => {
				let joining_subscribe_id = u64::decode(r)?;
				let joining_start = u64::decode(r)?;

				FetchSpec::Joining {
					kind,
					joining_subscribe_id,
					joining_start,
				}
			}
		};

		let parameters = VersionParameters::decode(r, cache)?;

		Ok(Self {
			request_id,
			subscriber_priority,
			group_order,
			spec,
			parameters,
		})
	}

	pub fn kind(&self) -> FetchType {
		match &self.spec {
			FetchSpec::Standalone { .. } => FetchType::Standalone,
			FetchSpec::Joining { kind, .. } => *kind,
		}
	}

	pub fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.set("message", "FETCH");
		rec.set("request_id", self.request_id);
		rec.set("subscriber_priority", self.subscriber_priority);
		rec.set("group_order", self.group_order.name());
		rec.set("fetch_type", self.kind().name());

		match &self.spec {
			FetchSpec::Standalone { track, start, end } => {
				rec.set(
					"track_namespace",
					track
						.namespace
						.elements()
						.iter()
						.map(|field| Value::Bytes(field.clone()))
						.collect::<Vec<_>>(),
				);
				rec.set("track_name", track.name.clone());
				rec.set("start_location", start.record());
				rec.set("end_location", end.record());
			}
			FetchSpec::Joining {
				joining_subscribe_id,
				joining_start,
				..
			} => {
				rec.set("joining_subscribe_id", *joining_subscribe_id);
				rec.set("joining_start", *joining_start);
			}
		}

		rec.set("parameters", self.parameters.record());
		rec
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn decode_fetch(bytes: &[u8]) -> Result<Fetch, Error> {
		let mut cache = TokenCache::default();
		let mut buf = bytes;
		Fetch::decode(&mut buf, &mut cache)
	}

	#[rustfmt::skip]
	fn standalone_payload(end_group: u8, end_object: u8) -> Vec<u8> {
		vec![
			0x04, // request_id
			0x7f, // subscriber_priority
			0x00, // group_order original
			0x01, // fetch_type standalone
			0x01, // namespace: one element
			0x04, 0x6c, 0x69, 0x76, 0x65, // "live"
			0x03, 0x63, 0x61, 0x6d, // name "cam"
			0x02, // start group
			0x05, // start object
			end_group,
			end_object,
			0x00, // no parameters
		]
	}

	#[test]
	fn test_standalone_fetch() {
		let msg = decode_fetch(&standalone_payload(0x04, 0x00)).unwrap();

		assert_eq!(msg.request_id, 4);
		assert_eq!(msg.kind(), FetchType::Standalone);

		match &msg.spec {
			FetchSpec::Standalone { track, start, end } => {
				assert_eq!(track.name, b"cam");
				assert_eq!(*start, Location { group: 2, object: 5 });
				assert_eq!(*end, Location { group: 4, object: 0 });
			}
			other => panic!("expected standalone spec, got {other:?}"),
		}
	}

	#[test]
	fn test_standalone_fetch_inverted_range() {
		// (1, 0) precedes the start (2, 5).
		assert_eq!(
			decode_fetch(&standalone_payload(0x01, 0x00)).unwrap_err(),
			Violation::FetchEndBeforeStart.into()
		);

		// Same group, earlier object.
		assert_eq!(
			decode_fetch(&standalone_payload(0x02, 0x04)).unwrap_err(),
			Violation::FetchEndBeforeStart.into()
		);
	}

	#[test]
	fn test_standalone_fetch_equal_range() {
		// end == start is a legal single-object range.
		let msg = decode_fetch(&standalone_payload(0x02, 0x05)).unwrap();
		assert_eq!(msg.kind(), FetchType::Standalone);
	}

	#[test]
	fn test_joining_fetch() {
		#[rustfmt::skip]
		let payload = [
			0x06, // request_id
			0x00, // subscriber_priority
			0x01, // group_order ascending
			0x02, // fetch_type relative joining
			0x02, // joining subscribe id
			0x03, // joining start
			0x00, // no parameters
		];

		let msg = decode_fetch(&payload).unwrap();
		assert_eq!(msg.kind(), FetchType::RelativeJoining);
		assert_eq!(
			msg.spec,
			FetchSpec::Joining {
				kind: FetchType::RelativeJoining,
				joining_subscribe_id: 2,
				joining_start: 3,
			}
		);
	}

	#[test]
	fn test_invalid_fetch_type() {
		#[rustfmt::skip]
		let payload = [
			0x06, // request_id
			0x00, // subscriber_priority
			0x01, // group_order
			0x04, // invalid fetch_type
		];

		assert_eq!(
			decode_fetch(&payload).unwrap_err(),
			Violation::InvalidFetchType(4).into()
		);
	}
}
