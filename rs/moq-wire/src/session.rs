use std::collections::HashMap;

use crate::{
	coding::{FullTrackName, TokenCache, Version},
	data::{DataStream, Datagram},
	ietf::{ControlMessage, FetchSpec, FilterType},
	Error, Record, Violation,
};

/// Which peer originates a request id. Clients use even ids, servers odd,
/// so the id itself names its originator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	Client,
	Server,
}

impl Direction {
	pub fn of_request_id(id: u64) -> Self {
		match id % 2 {
			0 => Self::Client,
			_ => Self::Server,
		}
	}

	fn index(self) -> usize {
		match self {
			Self::Client => 0,
			Self::Server => 1,
		}
	}
}

/// A live subscription created by SUBSCRIBE.
#[derive(Debug, Clone)]
pub struct Subscription {
	pub request_id: u64,
	pub track_alias: u64,
	pub track: FullTrackName,
	pub filter: FilterType,
}

/// A live fetch created by FETCH.
#[derive(Debug, Clone)]
pub struct ActiveFetch {
	pub request_id: u64,
	pub spec: FetchSpec,
}

/// Per-session decoder state: negotiated limits, live requests and the
/// auth-token cache. One message decodes at a time against it; the order of
/// calls defines the order of state updates.
#[derive(Default, Debug)]
pub struct Session {
	version: Option<Version>,
	offered: Option<Vec<Version>>,

	// Ceiling on request ids per originating direction; None is unlimited.
	max_request_id: [Option<u64>; 2],

	subscriptions: HashMap<u64, Subscription>,
	fetches: HashMap<u64, ActiveFetch>,
	track_aliases: HashMap<u64, FullTrackName>,
	tokens: TokenCache,
}

impl Session {
	pub fn new() -> Self {
		Self::default()
	}

	/// Decode and validate one framed control message, updating session
	/// state on success. Bytes past the frame are ignored.
	pub fn validate_control(&mut self, data: &[u8]) -> Result<Record, Error> {
		let mut r = data;
		let msg = ControlMessage::decode(&mut r, &mut self.tokens)?;
		self.apply(&msg)?;

		Ok(msg.record())
	}

	/// Decode and validate an entire unidirectional data stream buffer.
	pub fn validate_stream(&mut self, data: &[u8]) -> Result<Record, Error> {
		let mut r = data;
		let stream = DataStream::decode(&mut r)?;

		Ok(stream.record())
	}

	/// Decode and validate a single datagram payload.
	pub fn validate_datagram(&mut self, data: &[u8]) -> Result<Record, Error> {
		let mut r = data;
		let datagram = Datagram::decode(&mut r)?;

		Ok(datagram.record())
	}

	pub fn version(&self) -> Option<Version> {
		self.version
	}

	pub fn subscription(&self, request_id: u64) -> Option<&Subscription> {
		self.subscriptions.get(&request_id)
	}

	pub fn fetch(&self, request_id: u64) -> Option<&ActiveFetch> {
		self.fetches.get(&request_id)
	}

	/// The full track name a data-plane alias refers to, if any live
	/// subscription established one.
	pub fn track_alias(&self, alias: u64) -> Option<&FullTrackName> {
		self.track_aliases.get(&alias)
	}

	pub fn token_cache(&self) -> &TokenCache {
		&self.tokens
	}

	// Cross-message invariants and state transitions. Grammar has already
	// succeeded by the time we get here; auth tokens committed during the
	// parse, everything else commits below.
	fn apply(&mut self, msg: &ControlMessage) -> Result<(), Error> {
		match msg {
			ControlMessage::ClientSetup(msg) => {
				self.offered = Some(msg.versions.0.clone());

				// The client's ceiling governs server-originated requests.
				if let Some(max) = msg.parameters.max_request_id() {
					self.max_request_id[Direction::Server.index()] = Some(max);
				}
				if let Some(size) = msg.parameters.max_auth_token_cache_size() {
					self.tokens.set_max_size(size);
				}

				tracing::debug!(versions = ?msg.versions.0, "client setup");
			}
			ControlMessage::ServerSetup(msg) => {
				if let Some(offered) = &self.offered {
					if !offered.contains(&msg.version) {
						return Err(Violation::VersionNegotiationFailed(msg.version).into());
					}
				}
				self.version = Some(msg.version);

				if let Some(max) = msg.parameters.max_request_id() {
					self.max_request_id[Direction::Client.index()] = Some(max);
				}
				if let Some(size) = msg.parameters.max_auth_token_cache_size() {
					self.tokens.set_max_size(size);
				}

				tracing::debug!(version = ?msg.version, "server setup");
			}
			ControlMessage::Subscribe(msg) => {
				self.check_request_id(msg.request_id)?;

				// No two live subscriptions may share a track alias.
				if self
					.subscriptions
					.values()
					.any(|sub| sub.track_alias == msg.track_alias)
				{
					return Err(Violation::DuplicateTrackAlias(msg.track_alias).into());
				}

				self.track_aliases.insert(msg.track_alias, msg.track.clone());
				self.subscriptions.insert(
					msg.request_id,
					Subscription {
						request_id: msg.request_id,
						track_alias: msg.track_alias,
						track: msg.track.clone(),
						filter: msg.filter.kind(),
					},
				);

				tracing::debug!(id = msg.request_id, alias = msg.track_alias, "subscribe");
			}
			ControlMessage::SubscribeOk(msg) => {
				self.check_request_id(msg.request_id)?;
			}
			ControlMessage::Fetch(msg) => {
				self.check_request_id(msg.request_id)?;

				self.fetches.insert(
					msg.request_id,
					ActiveFetch {
						request_id: msg.request_id,
						spec: msg.spec.clone(),
					},
				);

				tracing::debug!(id = msg.request_id, "fetch");
			}
			ControlMessage::Announce(msg) => {
				self.check_request_id(msg.request_id)?;
			}
			ControlMessage::TrackStatusRequest(msg) => {
				self.check_request_id(msg.request_id)?;
			}
			ControlMessage::GoAway(_) => {}
			ControlMessage::MaxRequestId(msg) => {
				// The value lives in the granted peer's id space, so its
				// parity names the slot it raises.
				let direction = Direction::of_request_id(msg.request_id);
				let slot = &mut self.max_request_id[direction.index()];

				if let Some(prev) = *slot {
					if msg.request_id < prev {
						return Err(Violation::MaxRequestIdDecreased {
							prev,
							next: msg.request_id,
						}
						.into());
					}
				}
				*slot = Some(msg.request_id);

				tracing::debug!(max = msg.request_id, ?direction, "max request id");
			}
			ControlMessage::Opaque(msg) => {
				tracing::warn!(kind = msg.kind.name(), "control message preserved opaque");
			}
		}

		Ok(())
	}

	fn check_request_id(&self, id: u64) -> Result<(), Violation> {
		let direction = Direction::of_request_id(id);
		if let Some(max) = self.max_request_id[direction.index()] {
			if id > max {
				return Err(Violation::RequestIdTooLarge { id, max });
			}
		}

		Ok(())
	}
}
