//! Correlation token generation.
//!
//! Tokens are short human-readable strings that tie the events of one call
//! together in log output. They are not suitable for security purposes.

use rand::Rng;

/// Alphanumeric character table (62 characters).
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Token length used when none is configured.
pub const DEFAULT_TOKEN_LENGTH: usize = 8;

/// Generates a random token of `length` characters using the thread RNG.
#[must_use]
pub fn generate_random_token(length: usize) -> String {
    generate_token_with(&mut rand::rng(), length)
}

/// Generates a token of `length` characters drawn from `rng`.
///
/// Every character is an independent uniform draw from [`ALPHABET`]. With a
/// seeded RNG the output is deterministic.
#[must_use]
pub fn generate_token_with<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect()
}
