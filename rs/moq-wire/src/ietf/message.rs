use bytes::Buf;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
	coding::{Decode, DecodeError, TokenCache},
	ietf::{Announce, ClientSetup, Fetch, GoAway, MaxRequestId, ServerSetup, Subscribe, SubscribeOk, TrackStatusRequest},
	Error, Record, Violation,
};

/// Every control message type in the v1 registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u64)]
pub enum ControlType {
	SubscribeUpdate = 0x02,
	Subscribe = 0x03,
	SubscribeOk = 0x04,
	SubscribeError = 0x05,
	Announce = 0x06,
	AnnounceOk = 0x07,
	AnnounceError = 0x08,
	Unannounce = 0x09,
	Unsubscribe = 0x0a,
	SubscribeDone = 0x0b,
	AnnounceCancel = 0x0c,
	TrackStatusRequest = 0x0d,
	TrackStatus = 0x0e,
	GoAway = 0x10,
	SubscribeAnnounces = 0x11,
	SubscribeAnnouncesOk = 0x12,
	SubscribeAnnouncesError = 0x13,
	UnsubscribeAnnounces = 0x14,
	MaxRequestId = 0x15,
	Fetch = 0x16,
	FetchCancel = 0x17,
	FetchOk = 0x18,
	FetchError = 0x19,
	RequestsBlocked = 0x1a,
	ClientSetup = 0x20,
	ServerSetup = 0x21,
}

impl ControlType {
	pub fn name(&self) -> &'static str {
		match self {
			Self::SubscribeUpdate => "SUBSCRIBE_UPDATE",
			Self::Subscribe => "SUBSCRIBE",
			Self::SubscribeOk => "SUBSCRIBE_OK",
			Self::SubscribeError => "SUBSCRIBE_ERROR",
			Self::Announce => "ANNOUNCE",
			Self::AnnounceOk => "ANNOUNCE_OK",
			Self::AnnounceError => "ANNOUNCE_ERROR",
			Self::Unannounce => "UNANNOUNCE",
			Self::Unsubscribe => "UNSUBSCRIBE",
			Self::SubscribeDone => "SUBSCRIBE_DONE",
			Self::AnnounceCancel => "ANNOUNCE_CANCEL",
			Self::TrackStatusRequest => "TRACK_STATUS_REQUEST",
			Self::TrackStatus => "TRACK_STATUS",
			Self::GoAway => "GOAWAY",
			Self::SubscribeAnnounces => "SUBSCRIBE_ANNOUNCES",
			Self::SubscribeAnnouncesOk => "SUBSCRIBE_ANNOUNCES_OK",
			Self::SubscribeAnnouncesError => "SUBSCRIBE_ANNOUNCES_ERROR",
			Self::UnsubscribeAnnounces => "UNSUBSCRIBE_ANNOUNCES",
			Self::MaxRequestId => "MAX_REQUEST_ID",
			Self::Fetch => "FETCH",
			Self::FetchCancel => "FETCH_CANCEL",
			Self::FetchOk => "FETCH_OK",
			Self::FetchError => "FETCH_ERROR",
			Self::RequestsBlocked => "REQUESTS_BLOCKED",
			Self::ClientSetup => "CLIENT_SETUP",
			Self::ServerSetup => "SERVER_SETUP",
		}
	}
}

/// A recognized control message whose payload grammar is not yet decoded.
/// The payload is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque {
	pub kind: ControlType,
	pub payload: Vec<u8>,
}

impl Opaque {
	pub fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.set("message", self.kind.name());
		rec.set("payload", self.payload.clone());
		rec
	}
}

/// One decoded control message, dispatched by type.
#[derive(Debug, Clone)]
pub enum ControlMessage {
	ClientSetup(ClientSetup),
	ServerSetup(ServerSetup),
	Subscribe(Subscribe),
	SubscribeOk(SubscribeOk),
	Fetch(Fetch),
	Announce(Announce),
	GoAway(GoAway),
	MaxRequestId(MaxRequestId),
	TrackStatusRequest(TrackStatusRequest),
	Opaque(Opaque),
}

impl ControlMessage {
	/// Decode one framed control message: type (varint), length (16-bit
	/// big-endian), then exactly that many payload bytes. Bytes past the
	/// frame are left unread.
	pub fn decode<B: Buf>(r: &mut B, cache: &mut TokenCache) -> Result<Self, Error> {
		let kind = u64::decode(r)?;
		let kind = ControlType::try_from(kind).map_err(|_| Violation::UnknownControlType(kind))?;

		let size = u16::decode(r)? as usize;
		if r.remaining() < size {
			return Err(DecodeError::Short.into());
		}
		let mut payload = r.copy_to_bytes(size);

		let msg = match kind {
			ControlType::ClientSetup => Self::ClientSetup(ClientSetup::decode(&mut payload)?),
			ControlType::ServerSetup => Self::ServerSetup(ServerSetup::decode(&mut payload)?),
			ControlType::Subscribe => Self::Subscribe(Subscribe::decode(&mut payload, cache)?),
			ControlType::SubscribeOk => Self::SubscribeOk(SubscribeOk::decode(&mut payload, cache)?),
			ControlType::Fetch => Self::Fetch(Fetch::decode(&mut payload, cache)?),
			ControlType::Announce => Self::Announce(Announce::decode(&mut payload, cache)?),
			ControlType::GoAway => Self::GoAway(GoAway::decode(&mut payload)?),
			ControlType::MaxRequestId => Self::MaxRequestId(MaxRequestId::decode(&mut payload)?),
			ControlType::TrackStatusRequest => {
				Self::TrackStatusRequest(TrackStatusRequest::decode(&mut payload, cache)?)
			}
			other => Self::Opaque(Opaque {
				kind: other,
				payload: payload.copy_to_bytes(payload.remaining()).to_vec(),
			}),
		};

		// The length must bracket the payload exactly.
		if payload.has_remaining() {
			return Err(DecodeError::ExpectedEnd.into());
		}

		Ok(msg)
	}

	pub fn kind(&self) -> ControlType {
		match self {
			Self::ClientSetup(_) => ControlType::ClientSetup,
			Self::ServerSetup(_) => ControlType::ServerSetup,
			Self::Subscribe(_) => ControlType::Subscribe,
			Self::SubscribeOk(_) => ControlType::SubscribeOk,
			Self::Fetch(_) => ControlType::Fetch,
			Self::Announce(_) => ControlType::Announce,
			Self::GoAway(_) => ControlType::GoAway,
			Self::MaxRequestId(_) => ControlType::MaxRequestId,
			Self::TrackStatusRequest(_) => ControlType::TrackStatusRequest,
			Self::Opaque(msg) => msg.kind,
		}
	}

	pub fn record(&self) -> Record {
		match self {
			Self::ClientSetup(msg) => msg.record(),
			Self::ServerSetup(msg) => msg.record(),
			Self::Subscribe(msg) => msg.record(),
			Self::SubscribeOk(msg) => msg.record(),
			Self::Fetch(msg) => msg.record(),
			Self::Announce(msg) => msg.record(),
			Self::GoAway(msg) => msg.record(),
			Self::MaxRequestId(msg) => msg.record(),
			Self::TrackStatusRequest(msg) => msg.record(),
			Self::Opaque(msg) => msg.record(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn frame(kind: u64, payload: &[u8]) -> Vec<u8> {
		use crate::coding::Encode;

		let mut buf = Vec::new();
		kind.encode(&mut buf).unwrap();
		(payload.len() as u16).encode(&mut buf).unwrap();
		buf.extend_from_slice(payload);
		buf
	}

	fn decode(bytes: &[u8]) -> Result<ControlMessage, Error> {
		let mut cache = TokenCache::default();
		let mut buf = bytes;
		ControlMessage::decode(&mut buf, &mut cache)
	}

	#[test]
	fn test_unknown_type() {
		let bytes = frame(0x30, &[]);
		assert_eq!(
			decode(&bytes).unwrap_err(),
			Violation::UnknownControlType(0x30).into()
		);
	}

	#[test]
	fn test_opaque_payload_preserved() {
		let bytes = frame(0x0a, &[0x02]); // UNSUBSCRIBE
		let msg = decode(&bytes).unwrap();

		assert_eq!(msg.kind(), ControlType::Unsubscribe);
		match msg {
			ControlMessage::Opaque(opaque) => assert_eq!(opaque.payload, vec![0x02]),
			other => panic!("expected opaque message, got {other:?}"),
		}
	}

	#[test]
	fn test_length_must_bracket_payload() {
		// GOAWAY with an empty uri is one byte; declare two.
		let mut bytes = frame(0x10, &[0x00]);
		bytes[2] = 0x02;
		bytes.push(0x00);

		assert_eq!(decode(&bytes).unwrap_err(), DecodeError::ExpectedEnd.into());
	}

	#[test]
	fn test_truncated_frame() {
		let bytes = frame(0x10, &[0x00]);
		assert_eq!(
			decode(&bytes[..bytes.len() - 1]).unwrap_err(),
			DecodeError::Short.into()
		);
	}

	#[test]
	fn test_trailing_bytes_ignored() {
		let mut bytes = frame(0x10, &[0x00]);
		bytes.extend_from_slice(&[0xde, 0xad]);

		let msg = decode(&bytes).unwrap();
		assert_eq!(msg.kind(), ControlType::GoAway);
	}
}
