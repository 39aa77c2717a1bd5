use super::*;
use drk_auth::AuthError;
use drk_auth::Crypto;
use drk_core::ID;
use drk_core::IDLE_EVICTION;
use drk_core::PERSIST_DEADLINE;
use drk_database::SnapshotStore;
use drk_rules::GameState;
use drk_rules::Outcome;
use drk_rules::Player;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Single-threaded owner of one room.
///
/// Commands arrive over one channel and are handled to completion in
/// arrival order; the only awaits inside a handler are the snapshot write
/// and the directory lookup on JOIN. Socket writes are channel pushes to
/// the bridges, so a slow client never blocks the room.
pub struct RoomActor {
    record: RoomRecord,
    sockets: Sockets,
    store: Arc<dyn SnapshotStore>,
    crypto: Arc<Crypto>,
    names: Arc<dyn NameDirectory>,
    rx: UnboundedReceiver<RoomCmd>,
    poisoned: bool,
}

impl RoomActor {
    pub(crate) fn new(
        record: RoomRecord,
        store: Arc<dyn SnapshotStore>,
        crypto: Arc<Crypto>,
        names: Arc<dyn NameDirectory>,
        rx: UnboundedReceiver<RoomCmd>,
    ) -> Self {
        Self {
            record,
            sockets: Sockets::default(),
            store,
            crypto,
            names,
            rx,
            poisoned: false,
        }
    }

    pub(crate) async fn run(mut self) {
        let id = self.record.meta.room_id;
        log::info!("[room {}] actor started ({:?})", id, self.record.phase);
        loop {
            let cmd = if self.sockets.is_empty() {
                match tokio::time::timeout(IDLE_EVICTION, self.rx.recv()).await {
                    Ok(cmd) => cmd,
                    Err(_) => {
                        log::info!("[room {}] idle, evicting from memory", id);
                        break;
                    }
                }
            } else {
                self.rx.recv().await
            };
            match cmd {
                Some(cmd) => self.handle(cmd).await,
                None => break,
            }
        }
        log::debug!("[room {}] actor stopped", id);
    }

    async fn handle(&mut self, cmd: RoomCmd) {
        match cmd {
            RoomCmd::Connect { conn, tx } => {
                log::debug!("[room {}] {} connected", self.record.meta.room_id, conn);
                self.sockets.register(conn, tx);
            }
            RoomCmd::Disconnect { conn } => self.detach(conn).await,
            RoomCmd::Frame { conn, text } => self.frame(conn, text).await,
        }
    }

    async fn frame(&mut self, conn: ConnId, text: String) {
        if !self.sockets.is_registered(conn) {
            return;
        }
        if self.poisoned {
            self.sockets.send(
                conn,
                &ServerMessage::error_with(ErrorCode::GameNotPlaying, "room is poisoned"),
            );
            return;
        }
        let msg = match Protocol::decode(&text) {
            Ok(msg) => msg,
            Err(code) => return self.sockets.send(conn, &ServerMessage::error(code)),
        };
        match msg {
            ClientMessage::Join { ref session_token } => self.join(conn, session_token).await,
            ClientMessage::Ready { ready } => self.ready(conn, ready).await,
            ClientMessage::Start => self.start(conn).await,
            ref game_frame => self.submit(conn, game_frame).await,
        }
    }

    /// JOIN: validate the session, attach the socket under the player id,
    /// replacing any previous socket for that player.
    async fn join(&mut self, conn: ConnId, token: &str) {
        let claims = match self.crypto.decode(token) {
            Ok(claims) => claims,
            Err(AuthError::Expired) => {
                self.sockets
                    .send(conn, &ServerMessage::error(ErrorCode::SessionExpired));
                self.sockets.close(conn, "session expired");
                return;
            }
            Err(_) => {
                return self
                    .sockets
                    .send(conn, &ServerMessage::error(ErrorCode::BadSession));
            }
        };
        let player: ID<Player> = claims.member().cast();
        match self.record.phase {
            RoomPhase::Lobby if self.record.member(player).is_none() => {
                if self.record.is_full() {
                    return self
                        .sockets
                        .send(conn, &ServerMessage::error(ErrorCode::RoomFull));
                }
                let display_name = self
                    .names
                    .display_name(player)
                    .await
                    .unwrap_or_else(|| "player".to_string());
                let snapshot = self.record.clone();
                self.record.lobby_players.push(LobbyPlayer {
                    id: player,
                    display_name,
                    connected: true,
                    ready: false,
                });
                if !self.commit(snapshot, conn).await {
                    return;
                }
                self.sockets.bind(player, conn);
                self.broadcast();
            }
            RoomPhase::Lobby => {
                self.sockets.bind(player, conn);
                self.mark_connected(player, conn, true).await;
            }
            RoomPhase::Playing | RoomPhase::Finished => {
                let seated = self
                    .record
                    .game
                    .as_ref()
                    .map(|game| game.is_seated(player))
                    .unwrap_or(false);
                if !seated {
                    return self
                        .sockets
                        .send(conn, &ServerMessage::error(ErrorCode::NotInGame));
                }
                self.sockets.bind(player, conn);
                self.mark_connected(player, conn, true).await;
            }
        }
    }

    /// Flips the roster connectivity flag, persisting and broadcasting only
    /// on an actual change; a same-state rejoin just gets a fresh view.
    async fn mark_connected(&mut self, player: ID<Player>, conn: ConnId, connected: bool) {
        let changed = self
            .record
            .member(player)
            .map(|m| m.connected != connected)
            .unwrap_or(false);
        if changed {
            let snapshot = self.record.clone();
            self.record
                .member_mut(player)
                .expect("member checked")
                .connected = connected;
            if !self.commit(snapshot, conn).await {
                return;
            }
            self.broadcast();
        } else {
            let view = PlayerView::tailor(&self.record, player);
            self.sockets.send(conn, &ServerMessage::state(view));
        }
    }

    async fn ready(&mut self, conn: ConnId, ready: bool) {
        let player = match self.sockets.player_of(conn) {
            Some(player) => player,
            None => {
                return self
                    .sockets
                    .send(conn, &ServerMessage::error(ErrorCode::NotJoined));
            }
        };
        if self.record.phase != RoomPhase::Lobby {
            return self.sockets.send(
                conn,
                &ServerMessage::error_with(ErrorCode::RoomNotReady, "game already started"),
            );
        }
        let member = match self.record.member(player) {
            Some(member) => member,
            None => {
                return self
                    .sockets
                    .send(conn, &ServerMessage::error(ErrorCode::NotInRoom));
            }
        };
        if member.ready == ready {
            let view = PlayerView::tailor(&self.record, player);
            return self.sockets.send(conn, &ServerMessage::state(view));
        }
        let snapshot = self.record.clone();
        self.record.member_mut(player).expect("member checked").ready = ready;
        if !self.commit(snapshot, conn).await {
            return;
        }
        self.broadcast();
    }

    async fn start(&mut self, conn: ConnId) {
        let player = match self.sockets.player_of(conn) {
            Some(player) => player,
            None => {
                return self
                    .sockets
                    .send(conn, &ServerMessage::error(ErrorCode::NotJoined));
            }
        };
        if self.record.phase != RoomPhase::Lobby {
            return self.sockets.send(
                conn,
                &ServerMessage::error_with(ErrorCode::RoomNotReady, "game already started"),
            );
        }
        if player != self.record.meta.host_id {
            return self.sockets.send(
                conn,
                &ServerMessage::error_with(ErrorCode::RoomNotReady, "only the host starts"),
            );
        }
        let count = self.record.lobby_players.len();
        let limit = self.record.meta.config.max_players as usize;
        if count < 2 || count > limit || !self.record.all_ready() {
            return self.sockets.send(
                conn,
                &ServerMessage::error_with(ErrorCode::RoomNotReady, "players not ready"),
            );
        }
        let snapshot = self.record.clone();
        let config = self.record.meta.config;
        let ref mut rng = StdRng::from_os_rng();
        self.record.game = Some(GameState::deal(
            config.mode,
            config.deck_size,
            self.record.seating(),
            rng,
        ));
        self.record.phase = RoomPhase::Playing;
        if !self.commit(snapshot, conn).await {
            return;
        }
        log::info!(
            "[room {}] game started with {} players",
            self.record.meta.room_id,
            count
        );
        self.broadcast();
        self.announce("game started");
    }

    /// A gameplay frame: convert, delegate to the rules engine, persist,
    /// broadcast. Illegal events answer only the sender and change nothing.
    async fn submit(&mut self, conn: ConnId, msg: &ClientMessage) {
        let player = match self.sockets.player_of(conn) {
            Some(player) => player,
            None => {
                return self
                    .sockets
                    .send(conn, &ServerMessage::error(ErrorCode::NotJoined));
            }
        };
        let action = match Protocol::action(msg).expect("gameplay frame") {
            Ok(action) => action,
            Err(code) => return self.sockets.send(conn, &ServerMessage::error(code)),
        };
        match self.record.phase {
            RoomPhase::Lobby => {
                return self
                    .sockets
                    .send(conn, &ServerMessage::error(ErrorCode::GameNotPlaying));
            }
            RoomPhase::Finished => {
                return self
                    .sockets
                    .send(conn, &ServerMessage::error(ErrorCode::GameFinished));
            }
            RoomPhase::Playing => {}
        }
        let snapshot = self.record.clone();
        let game = self.record.game.as_mut().expect("playing room has a game");
        let outcome = match game.apply(player, action) {
            Ok(outcome) => outcome,
            Err(rule) => {
                return self
                    .sockets
                    .send(conn, &ServerMessage::error(ErrorCode::from(rule)));
            }
        };
        if let Err(violation) = game.check_invariants() {
            log::error!(
                "[room {}] invariant violation after {}: {}",
                self.record.meta.room_id,
                action,
                violation
            );
            self.record = snapshot;
            self.poisoned = true;
            return;
        }
        if game.phase() == drk_rules::GamePhase::Finished {
            self.record.phase = RoomPhase::Finished;
        }
        if !self.commit(snapshot, conn).await {
            return;
        }
        self.broadcast();
        match outcome {
            Outcome::Continued => {}
            Outcome::RoundClosed => self.announce("round closed"),
            Outcome::GameOver => {
                log::info!("[room {}] game over", self.record.meta.room_id);
                self.announce("game over");
            }
        }
    }

    async fn detach(&mut self, conn: ConnId) {
        log::debug!("[room {}] {} disconnected", self.record.meta.room_id, conn);
        if let Some(player) = self.sockets.unregister(conn) {
            let connected = self
                .record
                .member(player)
                .map(|m| m.connected)
                .unwrap_or(false);
            if connected {
                let snapshot = self.record.clone();
                self.record
                    .member_mut(player)
                    .expect("member checked")
                    .connected = false;
                // the origin socket is gone; a persist failure only logs
                if self.commit(snapshot, conn).await {
                    self.broadcast();
                }
            }
        }
    }

    /// Persists the record under the hard deadline. On failure the record
    /// rolls back to the pre-event snapshot and the originator hears
    /// PERSIST_FAILED; nothing is broadcast.
    async fn commit(&mut self, snapshot: RoomRecord, origin: ConnId) -> bool {
        let key = RoomRecord::key(self.record.meta.room_id);
        let value = serde_json::to_value(&self.record).expect("serialize room record");
        match tokio::time::timeout(PERSIST_DEADLINE, self.store.save(&key, &value)).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                log::error!("[room {}] persist failed: {}", key, e);
                self.record = snapshot;
                self.sockets.send(
                    origin,
                    &ServerMessage::error_with(ErrorCode::PersistFailed, e.to_string()),
                );
                false
            }
            Err(_) => {
                log::error!("[room {}] persist deadline exceeded", key);
                self.record = snapshot;
                self.sockets.send(
                    origin,
                    &ServerMessage::error_with(ErrorCode::PersistFailed, "deadline exceeded"),
                );
                false
            }
        }
    }

    /// One STATE frame per joined socket, each tailored to its player.
    fn broadcast(&self) {
        for (player, conn) in self.sockets.joined() {
            let view = PlayerView::tailor(&self.record, player);
            self.sockets.send(conn, &ServerMessage::state(view));
        }
    }

    fn announce(&self, message: &str) {
        for (_, conn) in self.sockets.joined() {
            self.sockets.send(conn, &ServerMessage::info(message));
        }
    }
}
