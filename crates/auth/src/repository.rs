use super::*;
use drk_core::ID;
use drk_core::Unique;
use drk_database::*;
use std::sync::Arc;
use tokio_postgres::Client;

impl Schema for Member {
    fn name() -> &'static str {
        USERS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            USERS,
            " (
                id            UUID PRIMARY KEY,
                external_id   BIGINT UNIQUE NOT NULL,
                first_name    TEXT NOT NULL,
                username      TEXT,
                language_code TEXT,
                created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_users_external ON ",
            USERS,
            " (external_id);"
        )
    }
}

/// User directory operations.
#[allow(async_fn_in_trait)]
pub trait Directory {
    /// Inserts or refreshes the row for a handshake user, returning the
    /// stored member (existing id on conflict).
    async fn upsert_member(&self, user: &TgUser) -> Result<Member, PgErr>;
    async fn get_member(&self, id: ID<Member>) -> Result<Option<Member>, PgErr>;
}

impl Directory for Arc<Client> {
    async fn upsert_member(&self, user: &TgUser) -> Result<Member, PgErr> {
        self.query_one(
            const_format::concatcp!(
                "INSERT INTO ",
                USERS,
                " (id, external_id, first_name, username, language_code)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (external_id) DO UPDATE SET
                     first_name = EXCLUDED.first_name,
                     username = EXCLUDED.username,
                     language_code = EXCLUDED.language_code,
                     updated_at = now()
                 RETURNING id, external_id, first_name, username, language_code"
            ),
            &[
                &ID::<Member>::default().uuid(),
                &user.id,
                &user.first_name,
                &user.username,
                &user.language_code,
            ],
        )
        .await
        .map(|row| {
            Member::new(
                ID::from(row.get::<_, uuid::Uuid>(0)),
                row.get(1),
                row.get(2),
                row.get(3),
                row.get(4),
            )
        })
    }
    async fn get_member(&self, id: ID<Member>) -> Result<Option<Member>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT id, external_id, first_name, username, language_code FROM ",
                USERS,
                " WHERE id = $1"
            ),
            &[&id.uuid()],
        )
        .await
        .map(|opt| {
            opt.map(|row| {
                Member::new(
                    ID::from(row.get::<_, uuid::Uuid>(0)),
                    row.get(1),
                    row.get(2),
                    row.get(3),
                    row.get(4),
                )
            })
        })
    }
}
