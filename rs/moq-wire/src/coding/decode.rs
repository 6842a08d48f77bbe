use bytes::Buf;

/// A buffer was malformed against the wire grammar.
///
/// Semantic rules (closed enums, ranges, budgets) are a
/// [`crate::Violation`] instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
	#[error("unexpected end of buffer")]
	Short,

	#[error("expected end of buffer")]
	ExpectedEnd,

	#[error("invalid utf-8 string")]
	NonUtf8,

	#[error("too many entries")]
	TooMany,
}

pub trait Decode: Sized {
	fn decode<B: Buf>(r: &mut B) -> Result<Self, DecodeError>;
}

impl Decode for u8 {
	fn decode<B: Buf>(r: &mut B) -> Result<Self, DecodeError> {
		if !r.has_remaining() {
			return Err(DecodeError::Short);
		}

		Ok(r.get_u8())
	}
}

// Control message framing uses a raw 16-bit big-endian length, not a varint.
impl Decode for u16 {
	fn decode<B: Buf>(r: &mut B) -> Result<Self, DecodeError> {
		if r.remaining() < 2 {
			return Err(DecodeError::Short);
		}

		Ok(r.get_u16())
	}
}

/// QUIC variable-length integer (RFC 9000 Section 16).
///
/// The two most significant bits of the first byte select a 1, 2, 4 or 8
/// byte encoding; the remaining bits, big-endian, are the value.
impl Decode for u64 {
	fn decode<B: Buf>(r: &mut B) -> Result<Self, DecodeError> {
		let first = u8::decode(r)?;

		let rest = match first >> 6 {
			0b00 => 0,
			0b01 => 1,
			0b10 => 3,
			0b11 => 7,
			_ => unreachable!(),
		};

		if r.remaining() < rest {
			return Err(DecodeError::Short);
		}

		let mut value = (first & 0b0011_1111) as u64;
		for _ in 0..rest {
			value = (value << 8) | r.get_u8() as u64;
		}

		Ok(value)
	}
}

// A varint length prefix followed by that many bytes.
impl Decode for Vec<u8> {
	fn decode<B: Buf>(r: &mut B) -> Result<Self, DecodeError> {
		let size = u64::decode(r)? as usize;
		if r.remaining() < size {
			return Err(DecodeError::Short);
		}

		Ok(r.copy_to_bytes(size).to_vec())
	}
}

impl Decode for String {
	fn decode<B: Buf>(r: &mut B) -> Result<Self, DecodeError> {
		let data = Vec::<u8>::decode(r)?;
		String::from_utf8(data).map_err(|_| DecodeError::NonUtf8)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::coding::Encode;

	#[test]
	fn test_varint_single_byte() {
		let mut buf: &[u8] = &[0x00];
		assert_eq!(u64::decode(&mut buf).unwrap(), 0);
		assert!(buf.is_empty());

		let mut buf: &[u8] = &[0x3f];
		assert_eq!(u64::decode(&mut buf).unwrap(), 63);
	}

	#[test]
	fn test_varint_wider_encodings_of_zero() {
		let mut buf: &[u8] = &[0x40, 0x00];
		assert_eq!(u64::decode(&mut buf).unwrap(), 0);
		assert!(buf.is_empty());

		let mut buf: &[u8] = &[0x80, 0x00, 0x00, 0x00];
		assert_eq!(u64::decode(&mut buf).unwrap(), 0);
		assert!(buf.is_empty());
	}

	#[test]
	fn test_varint_max() {
		let mut buf: &[u8] = &[0xc0, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
		assert_eq!(u64::decode(&mut buf).unwrap(), (1u64 << 62) - 1);
		assert!(buf.is_empty());
	}

	#[test]
	fn test_varint_truncated() {
		let mut buf: &[u8] = &[0x40];
		assert_eq!(u64::decode(&mut buf), Err(DecodeError::Short));

		let mut buf: &[u8] = &[0xc0, 0x01, 0x02];
		assert_eq!(u64::decode(&mut buf), Err(DecodeError::Short));

		let mut buf: &[u8] = &[];
		assert_eq!(u64::decode(&mut buf), Err(DecodeError::Short));
	}

	#[test]
	fn test_varint_round_trip() {
		for value in [
			0u64,
			1,
			63,
			64,
			16383,
			16384,
			(1 << 30) - 1,
			1 << 30,
			(1 << 62) - 1,
		] {
			let mut buf = Vec::new();
			value.encode(&mut buf).unwrap();

			let expected = match value {
				v if v < (1 << 6) => 1,
				v if v < (1 << 14) => 2,
				v if v < (1 << 30) => 4,
				_ => 8,
			};
			assert_eq!(buf.len(), expected, "value {value}");

			let mut read: &[u8] = &buf;
			assert_eq!(u64::decode(&mut read).unwrap(), value);
			assert!(read.is_empty());
		}
	}

	#[test]
	fn test_bytes_length_prefixed() {
		let mut buf: &[u8] = &[0x03, 0x61, 0x62, 0x63];
		assert_eq!(Vec::<u8>::decode(&mut buf).unwrap(), b"abc");

		// Length runs past the buffer.
		let mut buf: &[u8] = &[0x04, 0x61, 0x62, 0x63];
		assert_eq!(Vec::<u8>::decode(&mut buf), Err(DecodeError::Short));
	}

	#[test]
	fn test_string_utf8() {
		let mut buf: &[u8] = &[0x02, 0xff, 0xfe];
		assert_eq!(String::decode(&mut buf), Err(DecodeError::NonUtf8));
	}
}
