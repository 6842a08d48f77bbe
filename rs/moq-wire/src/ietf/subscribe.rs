use bytes::Buf;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
	coding::{Decode, FullTrackName, TokenCache, VersionParameters},
	ietf::Location,
	Error, Record, Value, Violation,
};

/// Delivery order of groups within a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum GroupOrder {
	/// Defer to the publisher's order. Not legal in SUBSCRIBE_OK.
	Original = 0x00,
	Ascending = 0x01,
	Descending = 0x02,
}

impl GroupOrder {
	pub fn decode<B: Buf>(r: &mut B) -> Result<Self, Error> {
		let order = u8::decode(r)?;
		Ok(Self::try_from(order).map_err(|_| Violation::InvalidGroupOrder(order))?)
	}

	pub fn name(&self) -> &'static str {
		match self {
			Self::Original => "ORIGINAL",
			Self::Ascending => "ASCENDING",
			Self::Descending => "DESCENDING",
		}
	}
}

/// The wire codes for subscription filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u64)]
pub enum FilterType {
	LatestGroup = 0x01,
	LatestObject = 0x02,
	AbsoluteStart = 0x03,
	AbsoluteRange = 0x04,
}

impl FilterType {
	pub fn name(&self) -> &'static str {
		match self {
			Self::LatestGroup => "LATEST_GROUP",
			Self::LatestObject => "LATEST_OBJECT",
			Self::AbsoluteStart => "ABSOLUTE_START",
			Self::AbsoluteRange => "ABSOLUTE_RANGE",
		}
	}
}

/// A filter plus the locations it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
	LatestGroup,
	LatestObject,
	AbsoluteStart { start: Location },
	AbsoluteRange { start: Location, end_group: u64 },
}

impl Filter {
	pub fn decode<B: Buf>(r: &mut B) -> Result<Self, Error> {
		let kind = u64::decode(r)?;
		let kind = FilterType::try_from(kind).map_err(|_| Violation::InvalidFilterType(kind))?;

		Ok(match kind {
			FilterType::LatestGroup => Self::LatestGroup,
			FilterType::LatestObject => Self::LatestObject,
			FilterType::AbsoluteStart => Self::AbsoluteStart {
				start: Location::decode(r)?,
			},
			FilterType::AbsoluteRange => {
				let start = Location::decode(r)?;
				let end_group = u64::decode(r)?;
				if end_group < start.group {
					return Err(Violation::EndGroupBeforeStart {
						start: start.group,
						end: end_group,
					}
					.into());
				}

				Self::AbsoluteRange { start, end_group }
			}
		})
	}

	pub fn kind(&self) -> FilterType {
		match self {
			Self::LatestGroup => FilterType::LatestGroup,
			Self::LatestObject => FilterType::LatestObject,
			Self::AbsoluteStart { .. } => FilterType::AbsoluteStart,
			Self::AbsoluteRange { .. } => FilterType::AbsoluteRange,
		}
	}
}

// Forward is a single byte that must be 0 or 1.
fn decode_forward<B: Buf>(r: &mut B) -> Result<bool, Error> {
	let forward = u8::decode(r)?;
	match forward {
		0 => Ok(false),
		1 => Ok(true),
		_ => Err(Violation::InvalidForward(forward).into()),
	}
}

/// SUBSCRIBE message (0x03).
/// Requests objects for a track, aliased for the data plane.
#[derive(Debug, Clone)]
pub struct Subscribe {
	pub request_id: u64,
	pub track_alias: u64,
	pub track: FullTrackName,
	pub subscriber_priority: u8,
	pub group_order: GroupOrder,
	pub forward: bool,
	pub filter: Filter,
	pub parameters: VersionParameters,
}

impl Subscribe {
	pub const ID: u64 = 0x03;

	pub fn decode<B: Buf>(r: &mut B, cache: &mut TokenCache) -> Result<Self, Error> {
		let request_id = u64::decode(r)?;
		let track_alias = u64::decode(r)?;
		let track = FullTrackName::decode(r)?;
		let subscriber_priority = u8::decode(r)?;
		let group_order = GroupOrder::decode(r)?;
		let forward = decode_forward(r)?;
		let filter = Filter::decode(r)?;
		let parameters = VersionParameters::decode(r, cache)?;

		Ok(Self {
			request_id,
			track_alias,
			track,
			subscriber_priority,
			group_order,
			forward,
			filter,
			parameters,
		})
	}

	pub fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.set("message", "SUBSCRIBE");
		rec.set("request_id", self.request_id);
		rec.set("track_alias", self.track_alias);
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
		rec.set("subscriber_priority", self.subscriber_priority);
		rec.set("group_order", self.group_order.name());
		rec.set("forward", self.forward);
		rec.set("filter_type", self.filter.kind().name());

		match &self.filter {
			Filter::AbsoluteStart { start } => {
				rec.set("start_location", start.record());
			}
			Filter::AbsoluteRange { start, end_group } => {
				rec.set("start_location", start.record());
				rec.set("end_group", *end_group);
			}
			_ => {}
		}

		rec.set("parameters", self.parameters.record());
		rec
	}
}

/// SUBSCRIBE_OK message (0x04).
#[derive(Debug, Clone)]
pub struct SubscribeOk {
	pub request_id: u64,
	pub expires_ms: u64,
	pub group_order: GroupOrder,
	pub largest: Option<Location>,
	pub parameters: VersionParameters,
}

impl SubscribeOk {
	pub const ID: u64 = 0x04;

	pub fn decode<B: Buf>(r: &mut B, cache: &mut TokenCache) -> Result<Self, Error> {
		let request_id = u64::decode(r)?;
		let expires_ms = u64::decode(r)?;

		// Original (0) is only meaningful on requests.
		let group_order = GroupOrder::decode(r)?;
		if group_order == GroupOrder::Original {
			return Err(Violation::InvalidGroupOrder(group_order.into()).into());
		}

		let content_exists = u8::decode(r)?;
		let largest = match content_exists {
			0 => None,
			1 => Some(Location::decode(r)?),
			_ => return Err(Violation::InvalidContentExists(content_exists).into()),
		};

		let parameters = VersionParameters::decode(r, cache)?;

		Ok(Self {
			request_id,
			expires_ms,
			group_order,
			largest,
			parameters,
		})
	}

	pub fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.set("message", "SUBSCRIBE_OK");
		rec.set("request_id", self.request_id);
		rec.set("expires_ms", self.expires_ms);
		rec.set("group_order", self.group_order.name());
		rec.set("content_exists", self.largest.is_some());
		if let Some(largest) = &self.largest {
			rec.set("largest_location", largest.record());
		}
		rec.set("parameters", self.parameters.record());
		rec
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn decode_subscribe(bytes: &[u8]) -> Result<Subscribe, Error> {
		let mut cache = TokenCache::default();
		let mut buf = bytes;
		Subscribe::decode(&mut buf, &mut cache)
	}

	#[rustfmt::skip]
	fn absolute_range_payload(end_group: u8) -> Vec<u8> {
		vec![
			0x02, // request_id
			0x0a, // track_alias
			0x01, // namespace: one element
			0x04, 0x6c, 0x69, 0x76, 0x65, // "live"
			0x03, 0x63, 0x61, 0x6d, // name "cam"
			0x80, // subscriber_priority
			0x01, // group_order ascending
			0x01, // forward
			0x04, // filter: absolute range
			0x05, // start group
			0x00, // start object
			end_group,
			0x00, // no parameters
		]
	}

	#[test]
	fn test_subscribe_absolute_range() {
		let msg = decode_subscribe(&absolute_range_payload(0x07)).unwrap();

		assert_eq!(msg.request_id, 2);
		assert_eq!(msg.track_alias, 10);
		assert_eq!(msg.track.namespace.elements(), &[b"live".to_vec()]);
		assert_eq!(msg.track.name, b"cam");
		assert_eq!(msg.subscriber_priority, 128);
		assert_eq!(msg.group_order, GroupOrder::Ascending);
		assert!(msg.forward);
		assert_eq!(
			msg.filter,
			Filter::AbsoluteRange {
				start: Location { group: 5, object: 0 },
				end_group: 7,
			}
		);

		let rec = msg.record();
		assert_eq!(rec.get("group_order"), Some(&Value::Text("ASCENDING".into())));
		assert_eq!(rec.get("filter_type"), Some(&Value::Text("ABSOLUTE_RANGE".into())));
	}

	#[test]
	fn test_subscribe_inverted_range() {
		// end group 4 precedes start group 5
		let err = decode_subscribe(&absolute_range_payload(0x04)).unwrap_err();
		assert_eq!(
			err,
			Violation::EndGroupBeforeStart { start: 5, end: 4 }.into()
		);
	}

	#[test]
	fn test_subscribe_invalid_group_order() {
		let mut payload = absolute_range_payload(0x07);
		payload[13] = 0x03;
		assert_eq!(
			decode_subscribe(&payload).unwrap_err(),
			Violation::InvalidGroupOrder(3).into()
		);
	}

	#[test]
	fn test_subscribe_invalid_forward() {
		let mut payload = absolute_range_payload(0x07);
		payload[14] = 0x02;
		assert_eq!(
			decode_subscribe(&payload).unwrap_err(),
			Violation::InvalidForward(2).into()
		);
	}

	#[test]
	fn test_subscribe_invalid_filter() {
		let mut payload = absolute_range_payload(0x07);
		payload[15] = 0x05;
		assert_eq!(
			decode_subscribe(&payload).unwrap_err(),
			Violation::InvalidFilterType(5).into()
		);
	}

	#[test]
	fn test_subscribe_ok_group_order_zero() {
		#[rustfmt::skip]
		let payload = [
			0x02, // request_id
			0x00, // expires
			0x00, // group_order: invalid here
			0x00, // content_exists
			0x00, // no parameters
		];

		let mut cache = TokenCache::default();
		let mut buf: &[u8] = &payload;
		assert_eq!(
			SubscribeOk::decode(&mut buf, &mut cache).unwrap_err(),
			Violation::InvalidGroupOrder(0).into()
		);
	}

	#[test]
	fn test_subscribe_ok_with_largest() {
		#[rustfmt::skip]
		let payload = [
			0x02, // request_id
			0x40, 0xfa, // expires 250ms
			0x02, // group_order descending
			0x01, // content_exists
			0x09, // largest group
			0x14, // largest object
			0x00, // no parameters
		];

		let mut cache = TokenCache::default();
		let mut buf: &[u8] = &payload;
		let msg = SubscribeOk::decode(&mut buf, &mut cache).unwrap();

		assert_eq!(msg.expires_ms, 250);
		assert_eq!(msg.largest, Some(Location { group: 9, object: 20 }));
	}
}
