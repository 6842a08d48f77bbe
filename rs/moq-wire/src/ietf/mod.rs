//! Control stream message grammars.

mod announce;
mod fetch;
mod goaway;
mod location;
mod message;
mod request;
mod setup;
mod subscribe;
mod track_status;

pub use announce::*;
pub use fetch::*;
pub use goaway::*;
pub use location::*;
pub use message::*;
pub use request::*;
pub use setup::*;
pub use subscribe::*;
pub use track_status::*;
