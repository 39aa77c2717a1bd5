use super::*;

/// A failed snapshot operation. The room actor maps this onto
/// `PERSIST_FAILED` and rolls back its in-memory state.
#[derive(Debug, Clone)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "snapshot store: {}", self.0)
    }
}

impl std::error::Error for StoreError {}

impl From<PgErr> for StoreError {
    fn from(e: PgErr) -> Self {
        Self(e.to_string())
    }
}

/// Atomic whole-value persistence for room state.
///
/// One key per room (`room/{roomId}`), replaced wholesale on every
/// mutation. Implementations must make `save` atomic: a reader never
/// observes a torn snapshot.
#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn save(&self, key: &str, state: &serde_json::Value) -> Result<(), StoreError>;
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;
    async fn purge(&self, key: &str) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl SnapshotStore for Arc<Client> {
    async fn save(&self, key: &str, state: &serde_json::Value) -> Result<(), StoreError> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                ROOM_SNAPSHOTS,
                " (key, state) VALUES ($1, $2)
                 ON CONFLICT (key) DO UPDATE SET state = EXCLUDED.state, updated_at = now()"
            ),
            &[&key, state],
        )
        .await
        .map(|_| ())
        .map_err(StoreError::from)
    }
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        self.query_opt(
            const_format::concatcp!("SELECT state FROM ", ROOM_SNAPSHOTS, " WHERE key = $1"),
            &[&key],
        )
        .await
        .map(|opt| opt.map(|row| row.get::<_, serde_json::Value>(0)))
        .map_err(StoreError::from)
    }
    async fn purge(&self, key: &str) -> Result<(), StoreError> {
        self.execute(
            const_format::concatcp!("DELETE FROM ", ROOM_SNAPSHOTS, " WHERE key = $1"),
            &[&key],
        )
        .await
        .map(|_| ())
        .map_err(StoreError::from)
    }
}

/// Process-local store for tests and single-node development runs.
/// Writes can be made to fail on demand to exercise rollback paths.
#[derive(Default)]
pub struct MemStore {
    rows: std::sync::Mutex<std::collections::HashMap<String, serde_json::Value>>,
    broken: std::sync::atomic::AtomicBool,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
    /// Makes every subsequent `save` fail until restored.
    pub fn set_broken(&self, broken: bool) {
        self.broken
            .store(broken, std::sync::atomic::Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl SnapshotStore for MemStore {
    async fn save(&self, key: &str, state: &serde_json::Value) -> Result<(), StoreError> {
        if self.broken.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StoreError("write refused".to_string()));
        }
        self.rows
            .lock()
            .expect("snapshot map lock")
            .insert(key.to_string(), state.clone());
        Ok(())
    }
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self
            .rows
            .lock()
            .expect("snapshot map lock")
            .get(key)
            .cloned())
    }
    async fn purge(&self, key: &str) -> Result<(), StoreError> {
        self.rows.lock().expect("snapshot map lock").remove(key);
        Ok(())
    }
}
