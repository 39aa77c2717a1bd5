use drk_core::ID;
use drk_rules::Player;

/// Display-name lookup for players joining a lobby over WebSocket.
/// The server wires this to the user directory; tests stub it.
#[async_trait::async_trait]
pub trait NameDirectory: Send + Sync {
    async fn display_name(&self, player: ID<Player>) -> Option<String>;
}

/// Resolver that knows nobody; joiners fall back to a generic name.
pub struct Anonymous;

#[async_trait::async_trait]
impl NameDirectory for Anonymous {
    async fn display_name(&self, _player: ID<Player>) -> Option<String> {
        None
    }
}
