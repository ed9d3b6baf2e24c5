// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking reference code generation and validation.
//!
//! Codes are the client-facing handle for a booking: short, unambiguous,
//! and immutable once assigned. The format is `RU-` followed by six
//! characters from an alphabet with no `0`/`O` or `1`/`I` confusion pairs.

use rand::RngExt;
use thiserror::Error;

/// Characters usable in the random part of a code.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of the random part of a code.
const CODE_LENGTH: usize = 6;

/// Prefix every booking code carries.
pub const CODE_PREFIX: &str = "RU-";

/// Booking code format errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingCodeError {
    /// The code does not start with the expected prefix.
    #[error("Booking code must start with '{CODE_PREFIX}'")]
    MissingPrefix,

    /// The random part has the wrong length.
    #[error("Booking code must have exactly {CODE_LENGTH} characters after the prefix")]
    WrongLength,

    /// The random part contains a character outside the code alphabet.
    #[error("Booking code contains the invalid character '{found}'")]
    InvalidCharacter { found: char },
}

/// Generates a fresh booking code.
///
/// Uniqueness is not guaranteed here; the store enforces it on insert and
/// the caller retries on a collision.
#[must_use]
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    let mut code: String = String::with_capacity(CODE_PREFIX.len() + CODE_LENGTH);
    code.push_str(CODE_PREFIX);
    for _ in 0..CODE_LENGTH {
        let index: usize = rng.random_range(0..CODE_ALPHABET.len());
        code.push(char::from(CODE_ALPHABET[index]));
    }
    code
}

/// Validates an externally supplied booking code.
///
/// # Errors
///
/// Returns a `BookingCodeError` if the code does not match the format.
pub fn validate_code(code: &str) -> Result<(), BookingCodeError> {
    let Some(rest) = code.strip_prefix(CODE_PREFIX) else {
        return Err(BookingCodeError::MissingPrefix);
    };
    if rest.chars().count() != CODE_LENGTH {
        return Err(BookingCodeError::WrongLength);
    }
    for ch in rest.chars() {
        if !CODE_ALPHABET.contains(&u8::try_from(ch).unwrap_or(0)) {
            return Err(BookingCodeError::InvalidCharacter { found: ch });
        }
    }
    Ok(())
}
