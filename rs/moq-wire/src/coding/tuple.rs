use bytes::Buf;

use crate::{
	coding::{Decode, DecodeError},
	Error, Violation,
};

/// Longest combined namespace + name accepted for a full track name.
pub const MAX_FULL_NAME_SIZE: usize = 4096;

/// Most elements allowed in a namespace tuple.
pub const MAX_NAMESPACE_ELEMENTS: usize = 32;

/// Reads a varint count followed by that many length-prefixed byte fields.
/// Empty fields are legal; bounds on the count are the caller's.
pub fn decode_tuple<B: Buf>(r: &mut B) -> Result<Vec<Vec<u8>>, DecodeError> {
	let count = u64::decode(r)?;

	let mut fields = Vec::new();
	for _ in 0..count {
		fields.push(Vec::<u8>::decode(r)?);
	}

	Ok(fields)
}

/// An ordered tuple of byte fields naming a track's namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackNamespace(Vec<Vec<u8>>);

impl TrackNamespace {
	pub fn decode<B: Buf>(r: &mut B) -> Result<Self, Error> {
		let fields = decode_tuple(r)?;
		if fields.is_empty() || fields.len() > MAX_NAMESPACE_ELEMENTS {
			return Err(Violation::NamespaceElementCount(fields.len()).into());
		}

		Ok(Self(fields))
	}

	pub fn elements(&self) -> &[Vec<u8>] {
		&self.0
	}

	/// Combined size of all elements, the quantity bounded by
	/// [`MAX_FULL_NAME_SIZE`].
	pub fn size(&self) -> usize {
		self.0.iter().map(|field| field.len()).sum()
	}
}

/// A namespace plus track name, as carried by SUBSCRIBE, FETCH and
/// TRACK_STATUS_REQUEST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullTrackName {
	pub namespace: TrackNamespace,
	pub name: Vec<u8>,
}

impl FullTrackName {
	pub fn decode<B: Buf>(r: &mut B) -> Result<Self, Error> {
		let namespace = TrackNamespace::decode(r)?;
		let name = Vec::<u8>::decode(r)?;

		let size = namespace.size() + name.len();
		if size > MAX_FULL_NAME_SIZE {
			return Err(Violation::FullTrackNameTooLong(size).into());
		}

		Ok(Self { namespace, name })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_tuple_basic() {
		#[rustfmt::skip]
		let mut buf: &[u8] = &[
			0x02, // count
			0x04, 0x6c, 0x69, 0x76, 0x65, // "live"
			0x00, // empty field
		];

		let fields = decode_tuple(&mut buf).unwrap();
		assert_eq!(fields, vec![b"live".to_vec(), Vec::new()]);
		assert!(buf.is_empty());
	}

	#[test]
	fn test_tuple_truncated_field() {
		let mut buf: &[u8] = &[0x01, 0x04, 0x6c, 0x69];
		assert_eq!(decode_tuple(&mut buf), Err(DecodeError::Short));
	}

	#[test]
	fn test_namespace_element_bounds() {
		let mut buf: &[u8] = &[0x00];
		assert_eq!(
			TrackNamespace::decode(&mut buf),
			Err(Violation::NamespaceElementCount(0).into())
		);

		// 33 empty elements.
		let mut encoded = vec![0x21];
		encoded.extend(std::iter::repeat(0x00).take(33));
		let mut buf: &[u8] = &encoded;
		assert_eq!(
			TrackNamespace::decode(&mut buf),
			Err(Violation::NamespaceElementCount(33).into())
		);
	}

	#[test]
	fn test_full_track_name_size_cap() {
		use crate::coding::Encode;

		// One 4093-byte namespace element plus a 4-byte name is one over.
		let mut encoded = vec![0x01];
		4093u64.encode(&mut encoded).unwrap();
		encoded.extend(std::iter::repeat(0x61).take(4093));
		encoded.push(0x04);
		encoded.extend_from_slice(b"name");

		let mut buf: &[u8] = &encoded;
		assert_eq!(
			FullTrackName::decode(&mut buf),
			Err(Violation::FullTrackNameTooLong(4097).into())
		);
	}
}
