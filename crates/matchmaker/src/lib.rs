//! Matchmaking for durak rooms.
//!
//! One logical instance owns per-configuration FIFO queues and short-lived
//! player → room bindings. The state machine here is synchronous; the Hall
//! serializes access behind a mutex held across room commissioning, so no
//! two enqueues ever interleave.
//!
//! Grouping is mechanical: once a queue holds `max_players` compatible
//! players, the head of the queue becomes a room. Commissioning the room is
//! the caller's job; on failure the group goes back to the queue head in
//! its original order.
use drk_core::ID;
use drk_core::MATCH_TTL;
use drk_gameroom::Room;
use drk_rules::Player;
use drk_rules::RoomConfig;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::time::Instant;

/// What an enqueue call resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enqueue {
    /// Waiting; position is the caller's index in the FIFO.
    Queued { position: usize },
    /// A prior grouping already placed the caller in a room.
    Matched { room: ID<Room> },
    /// The queue filled: the caller must commission a room for this group
    /// and then report back via [`Matchmaker::bound`] or
    /// [`Matchmaker::requeue`].
    Grouped { players: Vec<ID<Player>> },
}

struct Binding {
    room: ID<Room>,
    expires: Instant,
}

/// Per-config FIFO queues plus TTL'd match bindings.
#[derive(Default)]
pub struct Matchmaker {
    queues: HashMap<RoomConfig, VecDeque<ID<Player>>>,
    bindings: HashMap<ID<Player>, Binding>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent while waiting: re-enqueueing the same `(player, config)`
    /// returns the current position, or the match completed in the
    /// meantime.
    pub fn enqueue(&mut self, player: ID<Player>, config: RoomConfig) -> Enqueue {
        self.expire(Instant::now());
        if let Some(binding) = self.bindings.get(&player) {
            return Enqueue::Matched {
                room: binding.room,
            };
        }
        let queue = self.queues.entry(config).or_default();
        if !queue.contains(&player) {
            queue.push_back(player);
        }
        if queue.len() >= config.max_players as usize {
            let players: Vec<ID<Player>> =
                queue.drain(..config.max_players as usize).collect();
            log::info!("[matchmaker] grouped {} players", players.len());
            Enqueue::Grouped { players }
        } else {
            Enqueue::Queued {
                position: queue
                    .iter()
                    .position(|p| *p == player)
                    .expect("caller was just queued"),
            }
        }
    }

    /// Records bindings for a commissioned group. Each player re-enqueueing
    /// within the TTL is steered to the same room.
    pub fn bound(&mut self, players: &[ID<Player>], room: ID<Room>) {
        let expires = Instant::now() + MATCH_TTL;
        for player in players {
            self.bindings.insert(*player, Binding { room, expires });
        }
    }

    /// Returns a group whose room failed to commission to the head of its
    /// queue, preserving relative order.
    pub fn requeue(&mut self, config: RoomConfig, players: Vec<ID<Player>>) {
        log::warn!("[matchmaker] requeueing {} players", players.len());
        let queue = self.queues.entry(config).or_default();
        for player in players.into_iter().rev() {
            queue.push_front(player);
        }
    }

    fn expire(&mut self, now: Instant) {
        self.bindings.retain(|_, binding| binding.expires > now);
    }
}
