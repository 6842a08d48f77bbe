use bytes::Buf;

use crate::{
	coding::{Decode, SetupParameters, Version, Versions},
	Error, Record,
};

/// CLIENT_SETUP message (0x20). The first message on a control stream,
/// offering the versions the client speaks.
#[derive(Debug, Clone)]
pub struct ClientSetup {
	pub versions: Versions,
	pub parameters: SetupParameters,
}

impl ClientSetup {
	pub const ID: u64 = 0x20;

	pub fn decode<B: Buf>(r: &mut B) -> Result<Self, Error> {
		let versions = Versions::decode(r)?;
		let parameters = SetupParameters::decode(r)?;

		Ok(Self { versions, parameters })
	}

	pub fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.set("message", "CLIENT_SETUP");
		rec.set(
			"versions",
			self.versions
				.0
				.iter()
				.map(|v| crate::Value::Text(format!("{v:?}")))
				.collect::<Vec<_>>(),
		);
		rec.set("parameters", self.parameters.record());
		rec
	}
}

/// SERVER_SETUP message (0x21), selecting one of the offered versions.
#[derive(Debug, Clone)]
pub struct ServerSetup {
	pub version: Version,
	pub parameters: SetupParameters,
}

impl ServerSetup {
	pub const ID: u64 = 0x21;

	pub fn decode<B: Buf>(r: &mut B) -> Result<Self, Error> {
		let version = Version::decode(r)?;
		let parameters = SetupParameters::decode(r)?;

		Ok(Self { version, parameters })
	}

	pub fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.set("message", "SERVER_SETUP");
		rec.set("version", format!("{:?}", self.version));
		rec.set("parameters", self.parameters.record());
		rec
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_client_setup() {
		#[rustfmt::skip]
		let mut buf: &[u8] = &[
			0x01, // one version
			0xc0, 0x00, 0x00, 0x00, 0xff, 0x00, 0x00, 0x0e, // draft-14
			0x01, // one parameter
			0x02, 0x40, 0x64, // MAX_REQUEST_ID 100
		];
		let setup = ClientSetup::decode(&mut buf).unwrap();

		assert_eq!(setup.versions.0, vec![Version::DRAFT_14]);
		assert_eq!(setup.parameters.max_request_id(), Some(100));
		assert!(buf.is_empty());
	}

	#[test]
	fn test_server_setup() {
		#[rustfmt::skip]
		let mut buf: &[u8] = &[
			0xc0, 0x00, 0x00, 0x00, 0xff, 0x00, 0x00, 0x0e, // draft-14
			0x00, // no parameters
		];
		let setup = ServerSetup::decode(&mut buf).unwrap();
		assert_eq!(setup.version, Version::DRAFT_14);
	}
}
