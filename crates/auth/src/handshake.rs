use super::*;
use hmac::Mac;

/// The user object Telegram embeds in a signed handshake.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct TgUser {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

/// Validates the `initData` HMAC chain.
///
/// The data-check string joins all non-hash pairs, key-sorted, as
/// `key=value` lines; the signing key is `HMAC_SHA256("WebAppData",
/// bot_token)`. Acceptance additionally requires a well-formed `user`
/// field. Deterministic: the verdict is a function of the inputs alone.
pub(crate) fn validate(init_data: &str, bot_token: &[u8]) -> Result<TgUser, AuthError> {
    let pairs: Vec<(String, String)> = form_urlencoded::parse(init_data.as_bytes())
        .into_owned()
        .collect();
    let hash = pairs
        .iter()
        .find(|(key, _)| key == "hash")
        .map(|(_, value)| value.clone())
        .ok_or(AuthError::Malformed)?;
    let mut rest: Vec<&(String, String)> = pairs.iter().filter(|(key, _)| key != "hash").collect();
    rest.sort_by(|a, b| a.0.cmp(&b.0));
    let check_string = rest
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("\n");
    let secret = Crypto::mac(b"WebAppData", bot_token);
    let given = hex::decode(&hash).map_err(|_| AuthError::Signature)?;
    let mut mac = HmacSha256::new_from_slice(&secret).expect("hmac takes any key length");
    mac.update(check_string.as_bytes());
    mac.verify_slice(&given).map_err(|_| AuthError::Signature)?;
    let user = rest
        .iter()
        .find(|(key, _)| key == "user")
        .map(|(_, value)| value.as_str())
        .ok_or(AuthError::MissingUser)?;
    serde_json::from_str(user).map_err(|_| AuthError::MissingUser)
}
