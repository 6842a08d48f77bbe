use bytes::Buf;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
	coding::Decode,
	data::{FetchStream, SubgroupStream},
	Error, Record, Value, Violation,
};

/// Explicit status for an object with no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u64)]
pub enum ObjectStatus {
	Normal = 0x00,
	DoesNotExist = 0x01,
	EndOfGroup = 0x03,
	EndOfTrack = 0x04,
}

impl ObjectStatus {
	pub fn decode<B: Buf>(r: &mut B) -> Result<Self, Error> {
		let status = u64::decode(r)?;
		Ok(Self::try_from(status).map_err(|_| Violation::InvalidObjectStatus(status))?)
	}

	pub fn name(&self) -> &'static str {
		match self {
			Self::Normal => "NORMAL",
			Self::DoesNotExist => "DOES_NOT_EXIST",
			Self::EndOfGroup => "END_OF_GROUP",
			Self::EndOfTrack => "END_OF_TRACK",
		}
	}
}

/// An object carries either payload bytes or an explicit status; a zero
/// payload length on the wire means the status follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectPayload {
	Payload(Vec<u8>),
	Status(ObjectStatus),
}

impl ObjectPayload {
	pub fn status(&self) -> ObjectStatus {
		match self {
			Self::Payload(_) => ObjectStatus::Normal,
			Self::Status(status) => *status,
		}
	}

	pub(crate) fn fill_record(&self, rec: &mut Record) {
		rec.set("status", self.status().name());
		if let Self::Payload(payload) = self {
			rec.set("payload", payload.clone());
		}
	}
}

/// One unidirectional data stream, dispatched on its leading type varint.
#[derive(Debug, Clone)]
pub enum DataStream {
	Subgroup(SubgroupStream),
	Fetch(FetchStream),
}

impl DataStream {
	pub fn decode<B: Buf>(r: &mut B) -> Result<Self, Error> {
		let kind = u64::decode(r)?;

		match kind {
			FetchStream::ID => Ok(Self::Fetch(FetchStream::decode(r)?)),
			SubgroupStream::ID_MIN..=SubgroupStream::ID_MAX => {
				Ok(Self::Subgroup(SubgroupStream::decode(kind, r)?))
			}
			_ => Err(Violation::UnknownStreamType(kind).into()),
		}
	}

	pub fn record(&self) -> Record {
		match self {
			Self::Subgroup(stream) => stream.record(),
			Self::Fetch(stream) => stream.record(),
		}
	}
}

pub(crate) fn objects_record<I>(objects: I) -> Value
where
	I: IntoIterator<Item = Record>,
{
	Value::List(objects.into_iter().map(Value::Nested).collect())
}
