use num_enum::IntoPrimitive;

use crate::coding::{DecodeError, Version};

/// Session termination codes from the MoQT v1 registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[repr(u64)]
pub enum TerminationCode {
	NoError = 0x00,
	InternalError = 0x01,
	Unauthorized = 0x02,
	ProtocolViolation = 0x03,
	InvalidRequestId = 0x04,
	DuplicateTrackAlias = 0x05,
	KeyValueFormattingError = 0x06,
	TooManyRequests = 0x07,
	InvalidPath = 0x08,
	MalformedPath = 0x09,
	GoawayTimeout = 0x0a,
	ControlMessageTimeout = 0x0b,
	DataStreamTimeout = 0x0c,
	AuthTokenCacheOverflow = 0x0d,
	DuplicateAuthTokenAlias = 0x0e,
	VersionNegotiationFailed = 0x0f,
	MalformedAuthToken = 0x10,
	UnknownAuthTokenAlias = 0x11,
	ExpiredAuthToken = 0x12,
	InvalidAuthority = 0x13,
	MalformedAuthority = 0x14,
}

/// A well-framed message violated a semantic rule.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
	#[error("unknown control message type {0:#x}")]
	UnknownControlType(u64),

	#[error("unknown stream type {0:#x}")]
	UnknownStreamType(u64),

	#[error("unknown datagram type {0:#x}")]
	UnknownDatagramType(u64),

	#[error("invalid group order {0}")]
	InvalidGroupOrder(u8),

	#[error("invalid forward value {0}")]
	InvalidForward(u8),

	#[error("invalid filter type {0}")]
	InvalidFilterType(u64),

	#[error("invalid content exists value {0}")]
	InvalidContentExists(u8),

	#[error("invalid fetch type {0}")]
	InvalidFetchType(u64),

	#[error("invalid object status {0:#x}")]
	InvalidObjectStatus(u64),

	#[error("end group must be >= start group ({end} < {start})")]
	EndGroupBeforeStart { start: u64, end: u64 },

	#[error("fetch end location must be >= start location")]
	FetchEndBeforeStart,

	#[error("namespace must have 1 to 32 elements, got {0}")]
	NamespaceElementCount(usize),

	#[error("full track name is {0} bytes, exceeding 4096")]
	FullTrackNameTooLong(usize),

	#[error("goaway uri is {0} bytes, exceeding 8192")]
	GoAwayUriTooLong(usize),

	#[error("parameter value is {0} bytes, exceeding 65535")]
	ParameterTooLarge(usize),

	#[error("subgroup object ids must be strictly ascending ({next} after {prev})")]
	ObjectsOutOfOrder { prev: u64, next: u64 },

	#[error("datagram extension headers must not be empty")]
	EmptyDatagramExtensions,

	#[error("request id {id} exceeds the granted maximum {max}")]
	RequestIdTooLarge { id: u64, max: u64 },

	#[error("max request id must not decrease ({next} after {prev})")]
	MaxRequestIdDecreased { prev: u64, next: u64 },

	#[error("duplicate track alias {0}")]
	DuplicateTrackAlias(u64),

	#[error("unknown auth token alias {0}")]
	UnknownAuthTokenAlias(u64),

	#[error("duplicate auth token alias {0}")]
	DuplicateAuthTokenAlias(u64),

	#[error("auth token cache overflow ({needed} > {max})")]
	AuthTokenCacheOverflow { needed: u64, max: u64 },

	#[error("unknown auth token alias type {0}")]
	UnknownAliasType(u64),

	#[error("selected version {0:?} was not offered")]
	VersionNegotiationFailed(Version),
}

impl Violation {
	pub fn code(&self) -> TerminationCode {
		match self {
			Self::ParameterTooLarge(_) => TerminationCode::KeyValueFormattingError,
			Self::RequestIdTooLarge { .. } => TerminationCode::InvalidRequestId,
			Self::DuplicateTrackAlias(_) => TerminationCode::DuplicateTrackAlias,
			Self::UnknownAuthTokenAlias(_) => TerminationCode::UnknownAuthTokenAlias,
			Self::DuplicateAuthTokenAlias(_) => TerminationCode::DuplicateAuthTokenAlias,
			Self::AuthTokenCacheOverflow { .. } => TerminationCode::AuthTokenCacheOverflow,
			Self::UnknownAliasType(_) => TerminationCode::MalformedAuthToken,
			Self::VersionNegotiationFailed(_) => TerminationCode::VersionNegotiationFailed,
			_ => TerminationCode::ProtocolViolation,
		}
	}
}

/// Any decode failure: malformed bytes or a semantic rule violation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
	#[error("validation error: {0}")]
	Validation(#[from] DecodeError),

	#[error("protocol violation: {0}")]
	Protocol(#[from] Violation),
}

impl Error {
	/// The code a host should terminate the session with.
	pub fn to_code(&self) -> u64 {
		match self {
			Self::Validation(_) => TerminationCode::ProtocolViolation.into(),
			Self::Protocol(violation) => violation.code().into(),
		}
	}

	pub fn kind(&self) -> &'static str {
		match self {
			Self::Validation(_) => "validation error",
			Self::Protocol(_) => "protocol violation",
		}
	}
}
