//! Unidirectional data stream and datagram grammars.

mod datagram;
mod fetch;
mod stream;
mod subgroup;

pub use datagram::*;
pub use fetch::*;
pub use stream::*;
pub use subgroup::*;
