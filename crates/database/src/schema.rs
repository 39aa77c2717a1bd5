use super::*;

/// Schema metadata for PostgreSQL tables.
///
/// Provides compile-time SQL for table creation and indexing; all methods
/// return `&'static str` so statements assemble via
/// [`const_format::concatcp!`]. The trait contains no I/O — execution goes
/// through [`ensure`].
pub trait Schema {
    /// Returns the table name in the database.
    fn name() -> &'static str;
    /// Returns `CREATE TABLE IF NOT EXISTS` DDL statement.
    fn creates() -> &'static str;
    /// Returns `CREATE INDEX IF NOT EXISTS` statements for all indices.
    fn indices() -> &'static str;
}

/// Creates the table and its indices if missing. Run once at server start
/// for every persisted entity.
pub async fn ensure<T>(client: &Client) -> Result<(), PgErr>
where
    T: Schema,
{
    log::info!("ensuring table ({})", T::name());
    client.batch_execute(T::creates()).await?;
    match T::indices() {
        "" => Ok(()),
        indices => client.batch_execute(indices).await,
    }
}

/// Row shape of the snapshot table; carries its DDL.
pub struct SnapshotRow;

impl Schema for SnapshotRow {
    fn name() -> &'static str {
        ROOM_SNAPSHOTS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            ROOM_SNAPSHOTS,
            " (
                key         TEXT PRIMARY KEY,
                state       JSONB NOT NULL,
                updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
            );"
        )
    }
    fn indices() -> &'static str {
        ""
    }
}
