use bytes::Buf;

use crate::{
	coding::{Decode, DecodeError},
	Record,
};

/// A (group, object) position within a track.
///
/// The derived order is lexicographic: groups compare first, objects break
/// ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Location {
	pub group: u64,
	pub object: u64,
}

impl Decode for Location {
	fn decode<B: Buf>(r: &mut B) -> Result<Self, DecodeError> {
		let group = u64::decode(r)?;
		let object = u64::decode(r)?;
		Ok(Self { group, object })
	}
}

impl Location {
	pub fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.set("group", self.group);
		rec.set("object", self.object);
		rec
	}
}
