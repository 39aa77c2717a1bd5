use super::*;
use base64::Engine;
use hmac::Mac;

pub(crate) type HmacSha256 = hmac::Hmac<sha2::Sha256>;
pub(crate) const B64: base64::engine::GeneralPurpose = base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Keyed crypto for the two secrets the server holds: the bot token that
/// anchors handshake validation, and the app secret that signs sessions.
pub struct Crypto {
    bot_token: Vec<u8>,
    app_secret: Vec<u8>,
}

impl Crypto {
    pub fn new(bot_token: &str, app_secret: &str) -> Self {
        Self {
            bot_token: bot_token.as_bytes().to_vec(),
            app_secret: app_secret.as_bytes().to_vec(),
        }
    }
    pub fn from_env() -> Self {
        Self::new(
            &std::env::var("BOT_TOKEN").expect("BOT_TOKEN must be set"),
            &std::env::var("APP_SECRET").expect("APP_SECRET must be set"),
        )
    }

    /// Session token: `base64url(payload) . hex(HMAC_SHA256(secret, base64url))`.
    pub fn encode(&self, claims: &SessionClaims) -> String {
        let payload = B64.encode(serde_json::to_vec(claims).expect("serialize claims"));
        let mac = Self::mac(&self.app_secret, payload.as_bytes());
        format!("{}.{}", payload, hex::encode(mac))
    }

    /// Verifies the MAC in constant time, then the expiry.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let (payload, signature) = token.split_once('.').ok_or(AuthError::Malformed)?;
        let given = hex::decode(signature).map_err(|_| AuthError::Signature)?;
        let mut mac =
            HmacSha256::new_from_slice(&self.app_secret).expect("hmac takes any key length");
        mac.update(payload.as_bytes());
        mac.verify_slice(&given).map_err(|_| AuthError::Signature)?;
        let bytes = B64.decode(payload).map_err(|_| AuthError::Malformed)?;
        let claims: SessionClaims =
            serde_json::from_slice(&bytes).map_err(|_| AuthError::Malformed)?;
        if claims.expired() {
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }

    /// Validates a Telegram `initData` blob against the bot token and
    /// extracts the embedded user.
    pub fn validate_handshake(&self, init_data: &str) -> Result<TgUser, AuthError> {
        handshake::validate(init_data, &self.bot_token)
    }

    pub(crate) fn mac(key: &[u8], data: &[u8]) -> [u8; 32] {
        let mut mac = HmacSha256::new_from_slice(key).expect("hmac takes any key length");
        mac.update(data);
        mac.finalize().into_bytes().into()
    }
}
