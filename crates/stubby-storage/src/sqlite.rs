use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use stubby_core::store::Result;
use stubby_core::{
    LinkId, LinkRecord, LinkStore, NewLink, ReadLinkStore, ShortCode, StorageError,
};
use tracing::debug;

const SCHEMA: &str = include_str!("../ddl/sqlite/short_links.sql");

const DEFAULT_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite implementation of the link store contract.
///
/// Timestamps are stored as integer Unix microseconds. Ids come from an
/// `AUTOINCREMENT` primary key, so they are never reused after a delete and
/// `ORDER BY id DESC` yields the most recent record.
#[derive(Debug, Clone)]
pub struct SqliteLinkStore {
    pool: SqlitePool,
}

impl SqliteLinkStore {
    /// Creates a store from an existing SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for `database_url`, creating the database file if
    /// needed, and applies the schema.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(map_sqlx_error)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .acquire_timeout(DEFAULT_ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Opens a private in-memory database on a single long-lived connection
    /// and applies the schema.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(map_sqlx_error)?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Creates the `short_links` table and its indexes if missing.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!("sqlite schema applied");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fetch_one_where<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Result<Option<LinkRecord>> {
        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_record).transpose()
    }
}

fn to_micros(timestamp: Timestamp) -> i64 {
    timestamp.as_microsecond()
}

fn from_micros(column: &str, micros: i64) -> Result<Timestamp> {
    Timestamp::from_microsecond(micros).map_err(|e| {
        StorageError::InvalidData(format!("invalid {column} timestamp '{micros}': {e}"))
    })
}

fn row_to_record(row: &SqliteRow) -> Result<LinkRecord> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
    let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
    let valid_until: Option<i64> = row.try_get("valid_until").map_err(map_sqlx_error)?;

    Ok(LinkRecord {
        id,
        original_url,
        short_code: ShortCode::new_unchecked(short_code),
        created_at: from_micros("created_at", created_at)?,
        valid_until: valid_until
            .map(|micros| from_micros("valid_until", micros))
            .transpose()?,
    })
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Configuration(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadLinkStore for SqliteLinkStore {
    async fn get_link_by_id(&self, id: LinkId) -> Result<Option<LinkRecord>> {
        self.fetch_one_where(
            sqlx::query(
                r#"
                SELECT id, original_url, short_code, created_at, valid_until
                FROM short_links
                WHERE id = ?
                "#,
            )
            .bind(id),
        )
        .await
    }

    async fn find_latest_by_code(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        self.fetch_one_where(
            sqlx::query(
                r#"
                SELECT id, original_url, short_code, created_at, valid_until
                FROM short_links
                WHERE short_code = ?
                ORDER BY id DESC
                LIMIT 1
                "#,
            )
            .bind(code.as_str()),
        )
        .await
    }

    async fn find_latest_by_original_url(&self, url: &str) -> Result<Option<LinkRecord>> {
        self.fetch_one_where(
            sqlx::query(
                r#"
                SELECT id, original_url, short_code, created_at, valid_until
                FROM short_links
                WHERE original_url = ?
                ORDER BY id DESC
                LIMIT 1
                "#,
            )
            .bind(url),
        )
        .await
    }

    async fn find_latest_valid_by_code(
        &self,
        code: &ShortCode,
        now: Timestamp,
    ) -> Result<Option<LinkRecord>> {
        self.fetch_one_where(
            sqlx::query(
                r#"
                SELECT id, original_url, short_code, created_at, valid_until
                FROM short_links
                WHERE short_code = ?
                  AND (valid_until IS NULL OR valid_until >= ?)
                ORDER BY id DESC
                LIMIT 1
                "#,
            )
            .bind(code.as_str())
            .bind(to_micros(now)),
        )
        .await
    }

    async fn list_links(&self) -> Result<Vec<LinkRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, original_url, short_code, created_at, valid_until
            FROM short_links
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(row_to_record).collect()
    }
}

#[async_trait]
impl LinkStore for SqliteLinkStore {
    async fn insert_link(&self, link: NewLink) -> Result<LinkId> {
        let result = sqlx::query(
            r#"
            INSERT INTO short_links (original_url, short_code, created_at, valid_until)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(link.original_url)
        .bind(link.short_code.as_str())
        .bind(to_micros(link.created_at))
        .bind(link.valid_until.map(to_micros))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.last_insert_rowid())
    }

    async fn update_link(&self, record: &LinkRecord) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE short_links
            SET original_url = ?, short_code = ?, created_at = ?, valid_until = ?
            WHERE id = ?
            "#,
        )
        .bind(&record.original_url)
        .bind(record.short_code.as_str())
        .bind(to_micros(record.created_at))
        .bind(record.valid_until.map(to_micros))
        .bind(record.id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_link(&self, id: LinkId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM short_links WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
