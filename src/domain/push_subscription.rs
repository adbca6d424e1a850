use url::{Host, Url};

/// A browser push subscription: the push-service endpoint plus the keys used to
/// encrypt payloads for it.
///
/// Only constructible through validation, so holding one means the endpoint is
/// an https URL, `p256dh` is an uncompressed P-256 point and `auth` is a 16 byte
/// secret.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PushSubscription {
    endpoint: String,
    keys: SubscriptionKeys,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubscriptionKeys {
    p256dh: String,
    auth: String,
}

#[derive(serde::Deserialize)]
struct StoredSubscription {
    endpoint: String,
    keys: SubscriptionKeys,
}

const P256DH_LENGTH: usize = 65;
const AUTH_SECRET_LENGTH: usize = 16;

impl PushSubscription {
    pub fn new(endpoint: String, p256dh: String, auth: String) -> Result<Self, String> {
        let endpoint = parse_endpoint(&endpoint)?;

        let p256dh_bytes = decode_key(&p256dh, "p256dh")?;
        if p256dh_bytes.len() != P256DH_LENGTH || p256dh_bytes[0] != 0x04 {
            return Err("The p256dh key is not an uncompressed P-256 public key.".into());
        }
        let auth_bytes = decode_key(&auth, "auth")?;
        if auth_bytes.len() != AUTH_SECRET_LENGTH {
            return Err(format!(
                "The auth secret must be {} bytes long.",
                AUTH_SECRET_LENGTH
            ));
        }

        Ok(Self {
            endpoint,
            keys: SubscriptionKeys { p256dh, auth },
        })
    }

    /// Parse the JSON stored in `users.push_subscription`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let stored: StoredSubscription = serde_json::from_str(raw)
            .map_err(|e| format!("Subscription is not valid JSON: {}", e))?;
        Self::new(stored.endpoint, stored.keys.p256dh, stored.keys.auth)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn p256dh(&self) -> &str {
        &self.keys.p256dh
    }

    pub fn auth(&self) -> &str {
        &self.keys.auth
    }
}

fn parse_endpoint(raw: &str) -> Result<String, String> {
    let raw = raw.trim();
    // `Url` treats "https:///x" as host "x"; the authority must be present as written.
    let authority = raw
        .strip_prefix("https://")
        .ok_or_else(|| format!("{} is not an https push endpoint.", raw))?;
    if authority.is_empty() || authority.starts_with('/') {
        return Err(format!("{} has no host.", raw));
    }
    let url = Url::parse(raw).map_err(|e| format!("{} is not a valid URL: {}", raw, e))?;
    match url.host() {
        Some(Host::Domain(domain)) if is_dns_name(domain) => {}
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => {}
        _ => return Err(format!("{} does not name a valid host.", raw)),
    }
    Ok(url.to_string())
}

fn is_dns_name(domain: &str) -> bool {
    domain.split('.').all(|label| {
        !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

fn decode_key(value: &str, name: &str) -> Result<Vec<u8>, String> {
    let trimmed = value.trim().trim_end_matches('=');
    if trimmed.is_empty() {
        return Err(format!("The {} key is missing.", name));
    }
    base64::decode_config(trimmed, base64::URL_SAFE_NO_PAD)
        .map_err(|e| format!("The {} key is not url-safe base64: {}", name, e))
}
