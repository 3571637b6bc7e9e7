//! Recipient address validation.
//!
//! `alloy`'s own `Address` parser also accepts strings without the `0x`
//! prefix, so the strict shape check runs before handing anything to it.

use alloy::primitives::Address;
use std::str::FromStr;
use thiserror::Error;

/// Length of a `0x`-prefixed, hex-encoded 20-byte address.
pub const ADDRESS_LEN: usize = 42;

/// Reasons an address string is refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("address required")]
    Missing,

    #[error("invalid address format")]
    InvalidFormat,
}

/// Returns true iff `candidate` matches `^0x[a-fA-F0-9]{40}$`.
pub fn is_valid_address(candidate: &str) -> bool {
    let bytes = candidate.as_bytes();
    bytes.len() == ADDRESS_LEN
        && bytes.starts_with(b"0x")
        && bytes[2..].iter().all(u8::is_ascii_hexdigit)
}

/// Validate `candidate` and convert it into an [`Address`].
///
/// An empty string is reported as [`AddressError::Missing`], anything else
/// that fails the shape check as [`AddressError::InvalidFormat`].
pub fn parse_address(candidate: &str) -> Result<Address, AddressError> {
    if candidate.is_empty() {
        return Err(AddressError::Missing);
    }
    if !is_valid_address(candidate) {
        return Err(AddressError::InvalidFormat);
    }
    Address::from_str(candidate).map_err(|_| AddressError::InvalidFormat)
}
