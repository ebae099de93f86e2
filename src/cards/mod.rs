//! Card entities and face identities.
//!
//! - `Card`: one slot on the board with face-up and matched flags
//! - `FaceId`: the opaque identity two cards share
//! - `IdentityPool`: where the board generator gets faces from

mod card;
mod faces;

pub use card::{Card, CardId};
pub use faces::{CardSet, FaceId, IdentityPool};
