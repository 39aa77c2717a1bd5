use super::*;
use drk_auth::Crypto;
use drk_auth::Directory;
use drk_auth::Member;
use drk_core::ID;
use drk_database::SnapshotStore;
use drk_gameroom::ConnId;
use drk_gameroom::NameDirectory;
use drk_gameroom::Outbound;
use drk_gameroom::Room;
use drk_gameroom::RoomCmd;
use drk_gameroom::RoomHandle;
use drk_gameroom::RoomRecord;
use drk_gameroom::spawn;
use drk_matchmaker::Enqueue;
use drk_matchmaker::Matchmaker;
use drk_rules::Player;
use drk_rules::RoomConfig;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::RwLock;
use tokio::sync::mpsc::unbounded_channel;
use tokio_postgres::Client;

/// Display-name lookup against the user directory.
struct Names(Arc<Client>);

#[async_trait::async_trait]
impl NameDirectory for Names {
    async fn display_name(&self, player: ID<Player>) -> Option<String> {
        match self.0.get_member(player.cast::<Member>()).await {
            Ok(member) => member.map(|m| m.display_name().to_string()),
            Err(e) => {
                log::warn!("[hall] name lookup failed: {}", e);
                None
            }
        }
    }
}

/// What an enqueue resolved to for the calling player.
pub enum MatchOutcome {
    Queued,
    Matched { room: ID<Room> },
}

/// Manages live room actors and the matchmaker.
///
/// Rooms are spawned on creation and rehydrated from their snapshot after
/// idle eviction; the handle map only caches what is currently alive. The
/// matchmaker mutex is held across room commissioning so its queue and
/// binding state can never interleave.
pub struct Hall {
    db: Arc<Client>,
    store: Arc<dyn SnapshotStore>,
    crypto: Arc<Crypto>,
    names: Arc<dyn NameDirectory>,
    rooms: RwLock<HashMap<ID<Room>, RoomHandle>>,
    matchmaker: Mutex<Matchmaker>,
}

impl Hall {
    pub fn new(db: Arc<Client>, crypto: Arc<Crypto>) -> Self {
        Self {
            store: Arc::new(db.clone()),
            names: Arc::new(Names(db.clone())),
            db,
            crypto,
            rooms: RwLock::new(HashMap::new()),
            matchmaker: Mutex::new(Matchmaker::new()),
        }
    }

    /// Creates a lobby for an explicit host. The snapshot is written before
    /// the actor spawns so the room survives an immediate eviction.
    pub async fn create_room(
        &self,
        host: ID<Player>,
        config: RoomConfig,
    ) -> anyhow::Result<ID<Room>> {
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        self.commission(config, vec![host]).await
    }

    /// Queues a player; when the queue fills, commissions the room for the
    /// whole group under the matchmaker lock.
    pub async fn enqueue(
        &self,
        player: ID<Player>,
        config: RoomConfig,
    ) -> anyhow::Result<MatchOutcome> {
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        let mut matchmaker = self.matchmaker.lock().await;
        match matchmaker.enqueue(player, config) {
            Enqueue::Matched { room } => Ok(MatchOutcome::Matched { room }),
            Enqueue::Queued { position } => {
                log::debug!("[hall] player {} queued at {}", player, position);
                Ok(MatchOutcome::Queued)
            }
            Enqueue::Grouped { players } => {
                match self.commission(config, players.clone()).await {
                    Ok(room) => {
                        matchmaker.bound(&players, room);
                        match players.contains(&player) {
                            true => Ok(MatchOutcome::Matched { room }),
                            false => Ok(MatchOutcome::Queued),
                        }
                    }
                    Err(e) => {
                        matchmaker.requeue(config, players);
                        Err(anyhow::anyhow!("match failed: {}", e))
                    }
                }
            }
        }
    }

    /// Builds, persists, and spawns a room seeded with the given players.
    async fn commission(
        &self,
        config: RoomConfig,
        players: Vec<ID<Player>>,
    ) -> anyhow::Result<ID<Room>> {
        let id = ID::default();
        if self.rooms.read().await.contains_key(&id) {
            anyhow::bail!("room already exists");
        }
        let mut seats = Vec::with_capacity(players.len());
        for player in players {
            let name = self
                .names
                .display_name(player)
                .await
                .unwrap_or_else(|| "player".to_string());
            seats.push((player, name));
        }
        let record = RoomRecord::lobby(id, config, seats);
        let value = serde_json::to_value(&record).expect("serialize room record");
        self.store
            .save(&RoomRecord::key(id), &value)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        let handle = spawn(
            record,
            self.store.clone(),
            self.crypto.clone(),
            self.names.clone(),
        );
        self.rooms.write().await.insert(id, handle);
        log::info!("[hall] commissioned room {}", id);
        Ok(id)
    }

    /// Resolves a live handle, rehydrating an evicted room from its
    /// snapshot. Unknown rooms are an error.
    pub async fn room(&self, id: ID<Room>) -> anyhow::Result<RoomHandle> {
        if let Some(handle) = self.rooms.read().await.get(&id) {
            if !handle.is_closed() {
                return Ok(handle.clone());
            }
        }
        let value = self
            .store
            .load(&RoomRecord::key(id))
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?
            .ok_or_else(|| anyhow::anyhow!("room not found"))?;
        let record: RoomRecord =
            serde_json::from_value(value).map_err(|e| anyhow::anyhow!("corrupt snapshot: {}", e))?;
        log::info!("[hall] rehydrating room {}", id);
        let handle = spawn(
            record,
            self.store.clone(),
            self.crypto.clone(),
            self.names.clone(),
        );
        self.rooms.write().await.insert(id, handle.clone());
        Ok(handle)
    }

    /// Spawns the WebSocket bridge between one socket and the room actor:
    /// outbound channel to socket, socket frames to actor commands.
    pub async fn bridge(
        &self,
        id: ID<Room>,
        mut session: actix_ws::Session,
        mut stream: actix_ws::MessageStream,
    ) -> anyhow::Result<()> {
        use futures::StreamExt;
        let handle = self.room(id).await?;
        let conn = ConnId::next();
        let (tx, mut rx) = unbounded_channel::<Outbound>();
        if !handle.send(RoomCmd::Connect { conn, tx }) {
            anyhow::bail!("room not found");
        }
        log::debug!("[bridge {}] {} connected", id, conn);
        actix_web::rt::spawn(async move {
            'sesh: loop {
                tokio::select! {
                    biased;
                    out = rx.recv() => match out {
                        Some(Outbound::Frame(json)) => {
                            if session.text(json).await.is_err() { break 'sesh }
                        }
                        Some(Outbound::Close { reason }) => {
                            let _ = session.close(Some(close_reason(reason))).await;
                            let _ = handle.send(RoomCmd::Disconnect { conn });
                            log::debug!("[bridge {}] {} closed: {}", id, conn, reason);
                            return;
                        }
                        None => break 'sesh,
                    },
                    msg = stream.next() => match msg {
                        Some(Ok(actix_ws::Message::Text(text))) => {
                            if !handle.send(RoomCmd::Frame { conn, text: text.to_string() }) { break 'sesh }
                        }
                        Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                        Some(Err(_)) => break 'sesh,
                        None => break 'sesh,
                        _ => continue 'sesh,
                    },
                }
            }
            let _ = handle.send(RoomCmd::Disconnect { conn });
            let _ = session.close(None).await;
            log::debug!("[bridge {}] {} disconnected", id, conn);
        });
        Ok(())
    }

    pub fn db(&self) -> Arc<Client> {
        self.db.clone()
    }
}

/// Close reasons the room can order: policy violations carry 1008, the
/// reconnect replacement is a normal close.
fn close_reason(reason: &'static str) -> actix_ws::CloseReason {
    let code = match reason {
        "session expired" => actix_ws::CloseCode::Policy,
        _ => actix_ws::CloseCode::Normal,
    };
    actix_ws::CloseReason {
        code,
        description: Some(reason.to_string()),
    }
}
