//! Authentication and identity for the durachok backend.
//!
//! Identity arrives pre-signed: the web app hands over a Telegram
//! `initData` blob whose HMAC chain is keyed by the bot token. Validating
//! it yields a [`TgUser`]; the server then mints its own short-lived HMAC
//! session token carried on every connection and WebSocket JOIN.
//!
//! ## Types
//!
//! - [`Member`] — a registered player in the user directory
//! - [`TgUser`] — the user object embedded in a valid handshake
//! - [`SessionClaims`] — session token payload with expiry
//! - [`Crypto`] — handshake validation plus token mint/verify
//! - [`AuthError`] — typed failures at the handshake boundary
mod claims;
mod crypto;
mod dto;
mod error;
mod handshake;
mod member;

pub use claims::*;
pub use crypto::*;
pub use dto::*;
pub use error::*;
pub use handshake::*;
pub use member::*;

#[cfg(feature = "database")]
mod repository;
#[cfg(feature = "database")]
pub use repository::*;

#[cfg(feature = "server")]
mod handlers;
#[cfg(feature = "server")]
mod middleware;
#[cfg(feature = "server")]
pub use handlers::*;
#[cfg(feature = "server")]
pub use middleware::*;
