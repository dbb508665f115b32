use argon2::password_hash::rand_core::{OsRng, RngCore};
use data_encoding::BASE32_NOPAD;
use sha2::{Digest, Sha256};

/// Random bytes drawn per token (160 bits).
pub const TOKEN_BYTES: usize = 20;

/// New session token: 20 bytes from the OS CSPRNG, lowercase base-32 without
/// padding. Alphabet is `a-z2-7`, so `0`, `1`, `8` and `9` never appear.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);

    BASE32_NOPAD.encode(&bytes).to_ascii_lowercase()
}

/// Storage key of the session held by `token`: lowercase hex SHA-256 over
/// the token's UTF-8 bytes.
pub fn session_id(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Leading characters of a session id, safe to put in logs.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
