//! Media upload signing
//!
//! The browser uploads course material directly to the media service; the
//! backend only hands out a signature over the upload params so the secret
//! never reaches the client.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Sign upload params (HMAC-SHA256, hex)
///
/// Params are serialized in lexical key order (`folder` before `timestamp`)
/// to match what the media service recomputes on its side.
pub fn sign_upload_params(
    api_secret: &str,
    folder: &str,
    timestamp_secs: i64,
) -> Result<String, &'static str> {
    let to_sign = format!("folder={folder}&timestamp={timestamp_secs}");
    let mut mac =
        Hmac::<Sha256>::new_from_slice(api_secret.as_bytes()).map_err(|_| "HMAC key error")?;
    mac.update(to_sign.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_is_deterministic() {
        let a = sign_upload_params("secret", "univ-media/edu_1", 1_700_000_000).unwrap();
        let b = sign_upload_params("secret", "univ-media/edu_1", 1_700_000_000).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64); // SHA-256 hex
    }

    #[test]
    fn test_signature_varies_with_inputs() {
        let base = sign_upload_params("secret", "univ-media/edu_1", 1_700_000_000).unwrap();
        assert_ne!(
            base,
            sign_upload_params("secret", "univ-media/edu_2", 1_700_000_000).unwrap()
        );
        assert_ne!(
            base,
            sign_upload_params("secret", "univ-media/edu_1", 1_700_000_001).unwrap()
        );
        assert_ne!(
            base,
            sign_upload_params("other", "univ-media/edu_1", 1_700_000_000).unwrap()
        );
    }
}
