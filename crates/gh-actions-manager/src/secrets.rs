//! Secret value sealing
//!
//! GitHub only accepts secret values encrypted as a libsodium sealed box for
//! the repository public key; the result is sent base64-encoded.

use crate::error::{ManagerError, Result};
use base64::prelude::{Engine as _, BASE64_STANDARD};
use crypto_box::aead::OsRng;
use crypto_box::{PublicKey, KEY_SIZE};
use regex::Regex;
use std::sync::OnceLock;

/// Letters, digits and underscores, not starting with a digit
fn secret_name_regex() -> &'static Regex {
    static SECRET_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    SECRET_NAME_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap())
}

/// Why GitHub would refuse `name` as a secret name, `None` when it is valid
pub fn secret_name_problem(name: &str) -> Option<&'static str> {
    if !secret_name_regex().is_match(name) {
        return Some(
            "Secret names may only contain letters, digits and underscores and must not start with a digit",
        );
    }
    if name.to_ascii_uppercase().starts_with("GITHUB_") {
        return Some("Secret names must not start with GITHUB_");
    }
    None
}

/// Seal `value` for the base64-encoded repository public key
pub fn seal_secret(value: &str, public_key: &str) -> Result<String> {
    let key_bytes = BASE64_STANDARD
        .decode(public_key.trim())
        .map_err(|e| ManagerError::Encryption(format!("public key is not base64: {}", e)))?;

    let key_bytes: [u8; KEY_SIZE] = key_bytes.as_slice().try_into().map_err(|_| {
        ManagerError::Encryption(format!(
            "public key must be {} bytes, got {}",
            KEY_SIZE,
            key_bytes.len()
        ))
    })?;

    let sealed = PublicKey::from(key_bytes)
        .seal(&mut OsRng, value.as_bytes())
        .map_err(|e| ManagerError::Encryption(e.to_string()))?;

    Ok(BASE64_STANDARD.encode(sealed))
}
