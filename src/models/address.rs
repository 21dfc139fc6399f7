// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Email address input validation.

use std::sync::LazyLock;

use regex::Regex;

/// Loose shape check: something@something.tld, no whitespace, single `@` per side.
static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"));

/// Why an address was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressError {
    Empty,
    Invalid,
}

impl AddressError {
    /// Text shown under the input field.
    pub fn message(self) -> &'static str {
        match self {
            Self::Empty => "Please enter your email address.",
            Self::Invalid => "Please enter a valid email address.",
        }
    }
}

/// Trim and validate a user-entered address, returning the trimmed form.
///
/// Any domain is accepted as long as it contains a dot; the remote API decides
/// whether the inbox actually exists.
pub fn validate_address(input: &str) -> Result<&str, AddressError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AddressError::Empty);
    }
    if !ADDRESS_RE.is_match(trimmed) {
        return Err(AddressError::Invalid);
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_trims_plain_addresses() {
        assert_eq!(
            validate_address("  user@devilott.store "),
            Ok("user@devilott.store")
        );
        assert_eq!(validate_address("a+b@x.co.uk"), Ok("a+b@x.co.uk"));
    }

    #[test]
    fn blank_input_is_empty_error() {
        assert_eq!(validate_address("   "), Err(AddressError::Empty));
        assert_eq!(
            AddressError::Empty.message(),
            "Please enter your email address."
        );
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["user", "user@", "@host.com", "user@host", "us er@host.com", "a@b@c.com"] {
            assert_eq!(validate_address(bad), Err(AddressError::Invalid), "{bad}");
        }
    }
}
