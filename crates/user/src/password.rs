use std::sync::LazyLock;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Argon2id with OWASP parameters: 64 MiB, 3 passes, 4 lanes.
fn argon2() -> paddock_shared::Result<Argon2<'static>> {
    let params = Params::new(65536, 3, 4, None)
        .map_err(|e| paddock_shared::Error::Server(e.to_string()))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

pub fn hash(password: &str) -> paddock_shared::Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Ok(argon2()?
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Constant-work check of `password` against a PHC string. An unparseable
/// hash never matches.
pub fn verify(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .ok()
        .as_ref()
        .map(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), hash)
                .is_ok()
        })
        .unwrap_or(false)
}

static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hash("paddock-unknown-account").unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to build dummy password hash");
        String::new()
    })
});

/// Burns one verification against a fixed hash so a login for an unknown
/// email costs the same as one with a wrong password.
pub fn verify_dummy(password: &str) {
    let _ = verify(password, &DUMMY_HASH);
}
