use bytes::Buf;

use crate::{
	coding::{Decode, DecodeError, Extensions},
	data::{objects_record, ObjectPayload, ObjectStatus},
	Error, Record, Violation,
};

/// A SUBGROUP_HEADER stream (types 0x08..=0x0D).
///
/// The type selects two properties: whether a subgroup id is carried
/// explicitly (0x0C/0x0D), defaults to zero (0x08/0x09) or is taken from
/// the first object (0x0A/0x0B); and whether each object carries extension
/// headers (odd types).
#[derive(Debug, Clone)]
pub struct SubgroupStream {
	pub kind: u64,
	pub track_alias: u64,
	pub group_id: u64,
	pub subgroup_id: u64,
	pub publisher_priority: u8,
	pub objects: Vec<SubgroupObject>,
}

/// One object within a subgroup stream.
#[derive(Debug, Clone)]
pub struct SubgroupObject {
	pub object_id: u64,
	pub extensions: Option<Extensions>,
	pub payload: ObjectPayload,
}

impl SubgroupObject {
	fn decode<B: Buf>(r: &mut B, has_extensions: bool) -> Result<Self, Error> {
		let object_id = u64::decode(r)?;

		let extensions = if has_extensions {
			let size = u64::decode(r)? as usize;
			if r.remaining() < size {
				return Err(DecodeError::Short.into());
			}
			let data = r.copy_to_bytes(size);
			Some(Extensions::decode(&data)?)
		} else {
			None
		};

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
			object_id,
			extensions,
			payload,
		})
	}

	fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.set("object_id", self.object_id);
		if let Some(extensions) = &self.extensions {
			rec.set("extensions", extensions.record());
		}
		self.payload.fill_record(&mut rec);
		rec
	}
}

impl SubgroupStream {
	pub const ID_MIN: u64 = 0x08;
	pub const ID_MAX: u64 = 0x0d;

	pub fn decode<B: Buf>(kind: u64, r: &mut B) -> Result<Self, Error> {
		debug_assert!((Self::ID_MIN..=Self::ID_MAX).contains(&kind));

		let has_extensions = kind & 0x01 != 0;
		let explicit_subgroup_id = kind >= 0x0c;
		let subgroup_from_first_object = (0x0a..=0x0b).contains(&kind);

		let track_alias = u64::decode(r)?;
		let group_id = u64::decode(r)?;
		let mut subgroup_id = match explicit_subgroup_id {
			true => u64::decode(r)?,
			false => 0,
		};
		let publisher_priority = u8::decode(r)?;

		let mut objects: Vec<SubgroupObject> = Vec::new();
		while r.has_remaining() {
			match SubgroupObject::decode(r, has_extensions) {
				Ok(object) => {
					if let Some(prev) = objects.last() {
						if object.object_id <= prev.object_id {
							return Err(Violation::ObjectsOutOfOrder {
								prev: prev.object_id,
								next: object.object_id,
							}
							.into());
						}
					}
					objects.push(object);
				}
				// Truncation after a complete object is the end of the stream.
				Err(Error::Validation(DecodeError::Short)) if !objects.is_empty() => break,
				Err(err) => return Err(err),
			}
		}

		// A subgroup stream carries at least one object.
		if objects.is_empty() {
			return Err(DecodeError::Short.into());
		}

		if subgroup_from_first_object {
			subgroup_id = objects[0].object_id;
		}

		Ok(Self {
			kind,
			track_alias,
			group_id,
			subgroup_id,
			publisher_priority,
			objects,
		})
	}

	pub fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.set("message", "SUBGROUP_HEADER");
		rec.set("stream_type", self.kind);
		rec.set("track_alias", self.track_alias);
		rec.set("group_id", self.group_id);
		rec.set("subgroup_id", self.subgroup_id);
		rec.set("publisher_priority", self.publisher_priority);
		rec.set(
			"objects",
			objects_record(self.objects.iter().map(|object| object.record())),
		);
		rec
	}
}
