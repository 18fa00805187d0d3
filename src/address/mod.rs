//! Short string tokens addressing a sector plus an index.

pub mod codec;

pub use codec::{decode, encode, try_decode, try_encode, Address, AddressError, AddressFormat, DELIMITER};
