use super::*;
use drk_core::ID;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;

/// Commands a room actor accepts, in arrival order, one at a time.
#[derive(Debug)]
pub enum RoomCmd {
    /// A bridge attached a fresh socket (not yet joined as anyone).
    Connect {
        conn: ConnId,
        tx: UnboundedSender<Outbound>,
    },
    /// One inbound text frame from a socket.
    Frame { conn: ConnId, text: String },
    /// The socket went away.
    Disconnect { conn: ConnId },
}

/// Channel endpoint for a live room. Held by the registry and cloned into
/// every bridge; the actor on the other end owns all room state.
#[derive(Clone)]
pub struct RoomHandle {
    pub id: ID<Room>,
    tx: UnboundedSender<RoomCmd>,
}

impl RoomHandle {
    pub(crate) fn new(id: ID<Room>, tx: UnboundedSender<RoomCmd>) -> Self {
        Self { id, tx }
    }
    /// Enqueues a command; false when the actor is gone (evicted or
    /// poisoned-and-halted), which callers treat as room-not-found.
    pub fn send(&self, cmd: RoomCmd) -> bool {
        self.tx.send(cmd).is_ok()
    }
    /// True once the actor task has stopped (idle eviction); the registry
    /// rehydrates from the snapshot on the next attach.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Spawns the actor task for a room record and returns its handle.
pub fn spawn(
    record: RoomRecord,
    store: std::sync::Arc<dyn drk_database::SnapshotStore>,
    crypto: std::sync::Arc<drk_auth::Crypto>,
    names: std::sync::Arc<dyn NameDirectory>,
) -> RoomHandle {
    let id = record.meta.room_id;
    let (tx, rx) = unbounded_channel();
    let actor = RoomActor::new(record, store, crypto, names, rx);
    tokio::spawn(actor.run());
    RoomHandle::new(id, tx)
}
