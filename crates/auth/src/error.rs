/// Failures at the handshake or session boundary.
/// Surfaced as 401 over HTTP and as close 1008 / typed frames over WS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Structurally broken input: bad token shape, bad base64, bad pairs.
    Malformed,
    /// The MAC does not verify.
    Signature,
    /// The session token is past its expiry.
    Expired,
    /// The handshake verified but carries no well-formed `user` field.
    MissingUser,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed credentials"),
            Self::Signature => write!(f, "signature mismatch"),
            Self::Expired => write!(f, "session expired"),
            Self::MissingUser => write!(f, "no user in handshake"),
        }
    }
}

impl std::error::Error for AuthError {}
