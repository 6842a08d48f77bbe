use std::fmt;

use bytes::Buf;

use crate::coding::{Decode, DecodeError};

/// A protocol version offered or negotiated during setup.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version(pub u64);

impl Version {
	pub const DRAFT_11: Version = Version(0xff00000b);
	pub const DRAFT_12: Version = Version(0xff00000c);
	pub const DRAFT_13: Version = Version(0xff00000d);
	pub const DRAFT_14: Version = Version(0xff00000e);
}

impl fmt::Debug for Version {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:#010x}", self.0)
	}
}

impl Decode for Version {
	fn decode<B: Buf>(r: &mut B) -> Result<Self, DecodeError> {
		Ok(Self(u64::decode(r)?))
	}
}

/// The version list offered in CLIENT_SETUP, in preference order.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Versions(pub Vec<Version>);

impl Decode for Versions {
	fn decode<B: Buf>(r: &mut B) -> Result<Self, DecodeError> {
		let count = u64::decode(r)?;

		let mut versions = Vec::new();
		for _ in 0..count {
			versions.push(Version::decode(r)?);
		}

		Ok(Self(versions))
	}
}

impl Versions {
	pub fn contains(&self, version: Version) -> bool {
		self.0.contains(&version)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_versions_decode() {
		#[rustfmt::skip]
		let mut buf: &[u8] = &[
			0x02, // count
			0xc0, 0x00, 0x00, 0x00, 0xff, 0x00, 0x00, 0x0e, // draft-14
			0xc0, 0x00, 0x00, 0x00, 0xff, 0x00, 0x00, 0x0d, // draft-13
		];

		let versions = Versions::decode(&mut buf).unwrap();
		assert_eq!(versions.0, vec![Version::DRAFT_14, Version::DRAFT_13]);
		assert!(versions.contains(Version::DRAFT_14));
		assert!(!versions.contains(Version::DRAFT_11));
	}

	#[test]
	fn test_versions_truncated() {
		let mut buf: &[u8] = &[0x02, 0x01];
		assert_eq!(Versions::decode(&mut buf), Err(DecodeError::Short));
	}
}
