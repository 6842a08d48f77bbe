use bytes::Buf;

use crate::{
	coding::{Decode, DecodeError, Extensions},
	data::{objects_record, ObjectPayload, ObjectStatus},
	Error, Record,
};

/// A FETCH_HEADER stream (type 0x05), carrying the objects of one fetch.
#[derive(Debug, Clone)]
pub struct FetchStream {
	pub request_id: u64,
	pub objects: Vec<FetchObject>,
}

/// One object within a fetch stream. Unlike subgroup objects, every object
/// is fully located and always carries an extension-header length.
#[derive(Debug, Clone)]
pub struct FetchObject {
	pub group_id: u64,
	pub subgroup_id: u64,
	pub object_id: u64,
	pub publisher_priority: u8,
	pub extensions: Extensions,
	pub payload: ObjectPayload,
}

impl FetchObject {
	fn decode<B: Buf>(r: &mut B) -> Result<Self, Error> {
		let group_id = u64::decode(r)?;
		let subgroup_id = u64::decode(r)?;
		let object_id = u64::decode(r)?;
		let publisher_priority = u8::decode(r)?;

		let size = u64::decode(r)? as usize;
		if r.remaining() < size {
			return Err(DecodeError::Short.into());
		}
		let data = r.copy_to_bytes(size);
		let extensions = Extensions::decode(&data)?;

		let size = u64::decode(r)? as usize;
		let payload = if size == 0 {
			ObjectPayload::Status(ObjectStatus::decode(r)?)
		} else {
			if r.remaining() < size {
				return Err(DecodeError::Short.into());
			}
			ObjectPayload::Payload(r.copy_to_bytes(size).to_vec())
		};

		Ok(Self {
			group_id,
			subgroup_id,
			object_id,
			publisher_priority,
			extensions,
			payload,
		})
	}

	fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.set("group_id", self.group_id);
		rec.set("subgroup_id", self.subgroup_id);
		rec.set("object_id", self.object_id);
		rec.set("publisher_priority", self.publisher_priority);
		if !self.extensions.is_empty() {
			rec.set("extensions", self.extensions.record());
		}
		self.payload.fill_record(&mut rec);
		rec
	}
}

impl FetchStream {
	pub const ID: u64 = 0x05;

	pub fn decode<B: Buf>(r: &mut B) -> Result<Self, Error> {
		let request_id = u64::decode(r)?;

		let mut objects = Vec::new();
		while r.has_remaining() {
			match FetchObject::decode(r) {
				Ok(object) => objects.push(object),
				// Truncation after a complete object is the end of the stream.
				Err(Error::Validation(DecodeError::Short)) if !objects.is_empty() => break,
				Err(err) => return Err(err),
			}
		}

		// A fetch stream carries at least one object.
		if objects.is_empty() {
			return Err(DecodeError::Short.into());
		}

		Ok(Self { request_id, objects })
	}

	pub fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.set("message", "FETCH_HEADER");
		rec.set("request_id", self.request_id);
		rec.set(
			"objects",
			objects_record(self.objects.iter().map(|object| object.record())),
		);
		rec
	}
}
