//! Persistence plumbing for the durachok backend.
//!
//! Two stores share one PostgreSQL connection: the relational user
//! directory, and a key/value table of room snapshots written atomically by
//! the room actors. Each row is only ever written by its owning actor; the
//! database is the source of truth across restarts only.
//!
//! ## Connectivity
//!
//! - [`db()`] — Establishes a database connection from `DB_URL`
//!
//! ## Serialization
//!
//! - [`Schema`] — Table metadata and DDL generation
//! - [`ensure`] — Create-if-not-exists migration for one table
//! - [`SnapshotStore`] — Atomic whole-value snapshot persistence
mod schema;
mod snapshots;

pub use schema::*;
pub use snapshots::*;

use std::sync::Arc;
use tokio_postgres::Client;

/// Establishes a database connection.
///
/// Connects to PostgreSQL using the `DB_URL` environment variable and
/// returns an `Arc<Client>` suitable for sharing across async tasks.
///
/// # Panics
///
/// Panics if `DB_URL` is not set or if the connection fails.
pub async fn db() -> Arc<Client> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let ref url = std::env::var("DB_URL").expect("DB_URL must be set");
    let (client, connection) = tokio_postgres::connect(url, tls)
        .await
        .expect("database connection failed");
    tokio::spawn(connection);
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await
        .expect("set client_min_messages");
    Arc::new(client)
}

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

/// Table for registered players from the Telegram handshake.
#[rustfmt::skip]
pub const USERS:          &str = "users";
/// Key/value table of per-room snapshots.
#[rustfmt::skip]
pub const ROOM_SNAPSHOTS: &str = "room_snapshots";
