//! Razorpay integration via REST API (no SDK dependency)
//!
//! Signature verification for webhook events and client payment
//! confirmations, plus the subscription-creation call used at checkout.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::state::RazorpayConfig;

/// Days a newly created subscription runs in trial before the first charge
pub const TRIAL_DAYS: i64 = 14;

/// Map a plan key to the configured gateway plan id
pub fn resolve_plan<'a>(cfg: &'a RazorpayConfig, plan_key: &str) -> Option<&'a str> {
    match plan_key {
        "basic" => Some(&cfg.plan_basic),
        "pro" => Some(&cfg.plan_pro),
        _ => None,
    }
}

/// Map a gateway plan id back to its plan key (webhook direction)
pub fn plan_key_for(cfg: &RazorpayConfig, plan_id: &str) -> Option<&'static str> {
    if plan_id == cfg.plan_basic {
        Some("basic")
    } else if plan_id == cfg.plan_pro {
        Some("pro")
    } else {
        None
    }
}

/// Verify a webhook signature (HMAC-SHA256 over the raw request body)
///
/// The payload must be the untouched body bytes as received; re-serializing
/// a parsed body changes the byte layout and invalidates the signature.
/// Mismatch is a normal `Err`, never a panic.
pub fn verify_webhook_signature(
    payload: &[u8],
    signature: &str,
    secret: &str,
) -> Result<(), &'static str> {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| "HMAC key error")?;
    mac.update(payload);

    // Decode hex signature and use constant-time comparison via hmac::verify_slice
    let sig_bytes = hex::decode(signature.trim()).map_err(|_| "Invalid signature hex")?;
    mac.verify_slice(&sig_bytes)
        .map_err(|_| "Webhook signature mismatch")
}

/// Verify a client-submitted payment confirmation
/// (HMAC-SHA256 over `"{payment_id}|{subscription_id}"`, keyed with the API key secret)
pub fn verify_payment_signature(
    payment_id: &str,
    subscription_id: &str,
    signature: &str,
    key_secret: &str,
) -> Result<(), &'static str> {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(key_secret.as_bytes()).map_err(|_| "HMAC key error")?;
    mac.update(payment_id.as_bytes());
    mac.update(b"|");
    mac.update(subscription_id.as_bytes());

    let sig_bytes = hex::decode(signature.trim()).map_err(|_| "Invalid signature hex")?;
    mac.verify_slice(&sig_bytes)
        .map_err(|_| "Payment signature mismatch")
}

/// Create a Razorpay subscription for an educator
///
/// The educator id travels in `notes` so webhook events can be attributed
/// without a database lookup. Returns the gateway subscription id.
pub async fn create_subscription(
    cfg: &RazorpayConfig,
    plan_id: &str,
    quantity: i32,
    start_at_secs: i64,
    educator_id: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let client = reqwest::Client::new();
    let resp: serde_json::Value = client
        .post("https://api.razorpay.com/v1/subscriptions")
        .basic_auth(&cfg.key_id, Some(&cfg.key_secret))
        .json(&serde_json::json!({
            "plan_id": plan_id,
            "quantity": quantity,
            "total_count": 12,
            "customer_notify": 1,
            "start_at": start_at_secs,
            "notes": { "educator_id": educator_id },
        }))
        .send()
        .await?
        .json()
        .await?;

    resp["id"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| format!("Razorpay create_subscription failed: {resp}").into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hmac_hex(secret: &str, message: &[u8]) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(message);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_webhook_signature_accepts_own_hmac() {
        let payload = br#"{"event":"subscription.activated","payload":{}}"#;
        let secret = "whsec_test";
        let sig = hmac_hex(secret, payload);
        assert!(verify_webhook_signature(payload, &sig, secret).is_ok());
    }

    #[test]
    fn test_webhook_signature_rejects_flipped_payload_byte() {
        let payload = b"{\"event\":\"subscription.activated\"}".to_vec();
        let secret = "whsec_test";
        let sig = hmac_hex(secret, &payload);

        let mut tampered = payload.clone();
        tampered[10] ^= 0x01;
        assert!(verify_webhook_signature(&tampered, &sig, secret).is_err());
    }

    #[test]
    fn test_webhook_signature_rejects_flipped_signature_byte() {
        let payload = b"payload bytes";
        let secret = "whsec_test";
        let sig = hmac_hex(secret, payload);

        // flip one hex nibble
        let mut chars: Vec<char> = sig.chars().collect();
        chars[0] = if chars[0] == '0' { '1' } else { '0' };
        let tampered: String = chars.into_iter().collect();
        assert!(verify_webhook_signature(payload, &tampered, secret).is_err());
    }

    #[test]
    fn test_webhook_signature_rejects_wrong_secret() {
        let payload = b"payload bytes";
        let sig = hmac_hex("whsec_a", payload);
        assert!(verify_webhook_signature(payload, &sig, "whsec_b").is_err());
    }

    #[test]
    fn test_webhook_signature_rejects_non_hex() {
        assert!(verify_webhook_signature(b"x", "not hex!", "secret").is_err());
    }

    #[test]
    fn test_payment_signature_accepts_pipe_joined_ids() {
        let secret = "key_secret";
        let sig = hmac_hex(secret, b"pay_123|sub_456");
        assert!(verify_payment_signature("pay_123", "sub_456", &sig, secret).is_ok());
    }

    #[test]
    fn test_payment_signature_rejects_swapped_ids() {
        let secret = "key_secret";
        let sig = hmac_hex(secret, b"pay_123|sub_456");
        assert!(verify_payment_signature("sub_456", "pay_123", &sig, secret).is_err());
    }

    #[test]
    fn test_payment_signature_rejects_other_payment_id() {
        let secret = "key_secret";
        let sig = hmac_hex(secret, b"pay_123|sub_456");
        assert!(verify_payment_signature("pay_999", "sub_456", &sig, secret).is_err());
    }

    fn test_cfg() -> RazorpayConfig {
        RazorpayConfig {
            key_id: "rzp_test".into(),
            key_secret: "secret".into(),
            webhook_secret: "whsec".into(),
            plan_basic: "plan_basic_monthly".into(),
            plan_pro: "plan_pro_monthly".into(),
        }
    }

    #[test]
    fn test_plan_catalog_roundtrip() {
        let cfg = test_cfg();
        assert_eq!(resolve_plan(&cfg, "basic"), Some("plan_basic_monthly"));
        assert_eq!(resolve_plan(&cfg, "pro"), Some("plan_pro_monthly"));
        assert_eq!(resolve_plan(&cfg, "enterprise"), None);

        assert_eq!(plan_key_for(&cfg, "plan_basic_monthly"), Some("basic"));
        assert_eq!(plan_key_for(&cfg, "plan_pro_monthly"), Some("pro"));
        assert_eq!(plan_key_for(&cfg, "plan_unknown"), None);
    }
}
