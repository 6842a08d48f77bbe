use bytes::Buf;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
	coding::{Decode, DecodeError, Extensions},
	data::{ObjectPayload, ObjectStatus},
	Error, Record, Violation,
};

/// Datagram types: object vs. status, with or without extension headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u64)]
pub enum DatagramType {
	ObjectNoExt = 0x00,
	ObjectWithExt = 0x01,
	StatusNoExt = 0x02,
	StatusWithExt = 0x03,
}

impl DatagramType {
	pub fn has_extensions(&self) -> bool {
		matches!(self, Self::ObjectWithExt | Self::StatusWithExt)
	}

	pub fn is_status(&self) -> bool {
		matches!(self, Self::StatusNoExt | Self::StatusWithExt)
	}

	pub fn name(&self) -> &'static str {
		match self {
			Self::ObjectNoExt => "OBJECT_DATAGRAM",
			Self::ObjectWithExt => "OBJECT_DATAGRAM_WITH_EXT",
			Self::StatusNoExt => "OBJECT_DATAGRAM_STATUS",
			Self::StatusWithExt => "OBJECT_DATAGRAM_STATUS_WITH_EXT",
		}
	}
}

/// One datagram: a single object or an object status.
#[derive(Debug, Clone)]
pub struct Datagram {
	pub kind: DatagramType,
	pub track_alias: u64,
	pub group_id: u64,
	pub object_id: u64,
	pub publisher_priority: u8,
	pub extensions: Option<Extensions>,
	pub payload: ObjectPayload,
}

impl Datagram {
	pub fn decode<B: Buf>(r: &mut B) -> Result<Self, Error> {
		let kind = u64::decode(r)?;
		let kind = DatagramType::try_from(kind).map_err(|_| Violation::UnknownDatagramType(kind))?;

		let track_alias = u64::decode(r)?;
		let group_id = u64::decode(r)?;
		let object_id = u64::decode(r)?;
		let publisher_priority = u8::decode(r)?;

		let extensions = if kind.has_extensions() {
			// The WithExt types promise at least one extension header.
			let size = u64::decode(r)? as usize;
			if size == 0 {
				return Err(Violation::EmptyDatagramExtensions.into());
			}
			if r.remaining() < size {
				return Err(DecodeError::Short.into());
			}
			let data = r.copy_to_bytes(size);
			Some(Extensions::decode(&data)?)
		} else {
			None
		};

		let payload = if kind.is_status() {
			let status = ObjectStatus::decode(r)?;
			if r.has_remaining() {
				return Err(DecodeError::ExpectedEnd.into());
			}
			ObjectPayload::Status(status)
		} else {
			ObjectPayload::Payload(r.copy_to_bytes(r.remaining()).to_vec())
		};

		Ok(Self {
			kind,
			track_alias,
			group_id,
			object_id,
			publisher_priority,
			extensions,
			payload,
		})
	}

	pub fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.set("message", self.kind.name());
		rec.set("track_alias", self.track_alias);
		rec.set("group_id", self.group_id);
		rec.set("object_id", self.object_id);
		rec.set("publisher_priority", self.publisher_priority);
		if let Some(extensions) = &self.extensions {
			rec.set("extensions", extensions.record());
		}
		self.payload.fill_record(&mut rec);
		rec
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn decode(bytes: &[u8]) -> Result<Datagram, Error> {
		let mut buf = bytes;
		Datagram::decode(&mut buf)
	}

	#[test]
	fn test_object_datagram() {
		#[rustfmt::skip]
		let bytes = [
			0x00, // type: object, no extensions
			0x01, // track_alias
			0x02, // group_id
			0x03, // object_id
			0x80, // publisher_priority
			0x61, 0x62, 0x63, // payload, unframed
		];
		let datagram = decode(&bytes).unwrap();

		assert_eq!(datagram.kind, DatagramType::ObjectNoExt);
		assert_eq!(datagram.track_alias, 1);
		assert_eq!(datagram.payload, ObjectPayload::Payload(b"abc".to_vec()));
	}

	#[test]
	fn test_object_datagram_with_extensions() {
		#[rustfmt::skip]
		let bytes = [
			0x01, // type: object with extensions
			0x01, 0x02, 0x03, 0x80,
			0x03, 0x40, 0x40, 0x02, // extensions: PRIOR_GROUP_ID_GAP = 2
			0x61, // payload
		];
		let datagram = decode(&bytes).unwrap();

		let extensions = datagram.extensions.unwrap();
		assert_eq!(extensions.prior_group_id_gap(), Some(2));
	}

	#[test]
	fn test_empty_extensions_rejected() {
		#[rustfmt::skip]
		let bytes = [
			0x01, // type: object with extensions
			0x01, 0x02, 0x03, 0x80,
			0x00, // zero-length extensions
		];
		assert_eq!(
			decode(&bytes).unwrap_err(),
			Violation::EmptyDatagramExtensions.into()
		);
	}

	#[test]
	fn test_status_datagram() {
		#[rustfmt::skip]
		let bytes = [
			0x02, // type: status, no extensions
			0x01, 0x02, 0x03, 0x80,
			0x03, // END_OF_GROUP
		];
		let datagram = decode(&bytes).unwrap();
		assert_eq!(
			datagram.payload,
			ObjectPayload::Status(ObjectStatus::EndOfGroup)
		);
	}

	#[test]
	fn test_status_datagram_trailing_bytes() {
		#[rustfmt::skip]
		let bytes = [
			0x02,
			0x01, 0x02, 0x03, 0x80,
			0x03,
			0xff, // trailing garbage
		];
		assert_eq!(decode(&bytes).unwrap_err(), DecodeError::ExpectedEnd.into());
	}

	#[test]
	fn test_unknown_datagram_type() {
		let bytes = [0x04, 0x01];
		assert_eq!(
			decode(&bytes).unwrap_err(),
			Violation::UnknownDatagramType(4).into()
		);
	}

	#[test]
	fn test_invalid_status() {
		#[rustfmt::skip]
		let bytes = [
			0x02,
			0x01, 0x02, 0x03, 0x80,
			0x02, // 0x02 is not a defined status
		];
		assert_eq!(
			decode(&bytes).unwrap_err(),
			Violation::InvalidObjectStatus(2).into()
		);
	}
}
