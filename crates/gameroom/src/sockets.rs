use super::*;
use drk_core::ID;
use drk_rules::Player;
use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedSender;

/// Connection identifier, unique per WebSocket bridge for the process
/// lifetime. Lets the room drop in-flight frames from a replaced socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnId(u64);

impl ConnId {
    pub fn next() -> Self {
        static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed))
    }
}

impl std::fmt::Display for ConnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// What the room pushes at a bridge: a text frame, or an instruction to
/// close the socket with a reason.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Frame(String),
    Close { reason: &'static str },
}

/// The room's socket table: registered connections and which player each
/// joined as. Owned by the actor; a socket belongs to exactly one room.
#[derive(Default)]
pub struct Sockets {
    conns: HashMap<ConnId, UnboundedSender<Outbound>>,
    players: HashMap<ID<Player>, ConnId>,
}

impl Sockets {
    pub fn register(&mut self, conn: ConnId, tx: UnboundedSender<Outbound>) {
        self.conns.insert(conn, tx);
    }

    /// Removes a connection; returns the player it was joined as, if any.
    pub fn unregister(&mut self, conn: ConnId) -> Option<ID<Player>> {
        self.conns.remove(&conn);
        let player = self
            .players
            .iter()
            .find(|(_, c)| **c == conn)
            .map(|(p, _)| *p);
        if let Some(player) = player {
            self.players.remove(&player);
        }
        player
    }

    /// Binds a connection to a player. Any previous socket for that player
    /// is closed with reason "replaced" and unbound; its channel stays
    /// registered until the bridge drops, so in-flight frames from it get a
    /// NOT_JOINED error instead of vanishing.
    pub fn bind(&mut self, player: ID<Player>, conn: ConnId) {
        if let Some(holder) = self.player_of(conn) {
            if holder != player {
                self.players.remove(&holder);
            }
        }
        if let Some(previous) = self.players.insert(player, conn) {
            if previous != conn {
                log::info!("[sockets] replacing {} for player {}", previous, player);
                self.close(previous, "replaced");
            }
        }
    }

    pub fn player_of(&self, conn: ConnId) -> Option<ID<Player>> {
        self.players
            .iter()
            .find(|(_, c)| **c == conn)
            .map(|(p, _)| *p)
    }

    pub fn is_registered(&self, conn: ConnId) -> bool {
        self.conns.contains_key(&conn)
    }

    pub fn is_empty(&self) -> bool {
        self.conns.is_empty()
    }

    /// Joined (player, connection) pairs, the broadcast audience.
    pub fn joined(&self) -> impl Iterator<Item = (ID<Player>, ConnId)> + '_ {
        self.players.iter().map(|(p, c)| (*p, *c))
    }

    pub fn send(&self, conn: ConnId, message: &ServerMessage) {
        self.push(conn, Outbound::Frame(message.to_json()));
    }

    pub fn close(&self, conn: ConnId, reason: &'static str) {
        self.push(conn, Outbound::Close { reason });
    }

    fn push(&self, conn: ConnId, out: Outbound) {
        match self.conns.get(&conn).map(|tx| tx.send(out)) {
            Some(Ok(())) => {}
            Some(Err(e)) => log::warn!("[sockets] send to {} failed: {:?}", conn, e),
            None => log::debug!("[sockets] send to {}: no such connection", conn),
        }
    }
}
