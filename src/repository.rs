use crate::error::{RepoError, WriteOutcome};
use async_trait::async_trait;
use sqlx::{
    PgPool, Postgres,
    postgres::{PgArguments, PgRow},
    query::QueryAs,
};
use std::{marker::PhantomData, sync::Arc};

/// A `query_as` against Postgres that still accepts binds.
pub type PgQueryAs<'q, R> = QueryAs<'q, Postgres, R, PgArguments>;

/// Record
///
/// Declarative description of one table: its name, its writable columns and how a row
/// binds them. `PostgresRepository` derives every statement from this, so a table needs
/// no hand-written SQL.
///
/// Every table is expected to have an integer identity `id` column and a boolean
/// `is_deleted` column in addition to `COLUMNS`.
pub trait Record: for<'r> sqlx::FromRow<'r, PgRow> + Clone + Send + Sync + Unpin + 'static {
    const TABLE: &'static str;
    /// Writable columns, in the order `bind_columns` binds them.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> i32;
    fn set_id(&mut self, id: i32);
    fn is_deleted(&self) -> bool;
    fn set_deleted(&mut self, deleted: bool);
    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self>;
}

/// Repository Trait
///
/// The data-access contract shared by every table. Reads return `Option`/`Vec`;
/// writes report whether a row matched through `WriteOutcome`. Any storage fault is an
/// `Err`, never folded into a "not found" answer.
///
/// **Send + Sync + async_trait** are required so the trait object
/// (`Arc<dyn Repository<R>>`) can be shared across Axum's task boundaries.
#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Full-table read. Soft-deleted rows are included.
    async fn list(&self) -> Result<Vec<R>, RepoError>;
    async fn get_by_id(&self, id: i32) -> Result<Option<R>, RepoError>;
    /// Inserts the row and returns it with the generated id. The incoming id is ignored.
    async fn create(&self, record: R) -> Result<R, RepoError>;
    /// Overwrites every writable column of the row with `record.id()`.
    async fn update(&self, record: R) -> Result<WriteOutcome, RepoError>;
    async fn soft_delete(&self, id: i32) -> Result<WriteOutcome, RepoError>;
    async fn delete(&self, id: i32) -> Result<WriteOutcome, RepoError>;
}

/// RepositoryState
///
/// The shared handle a service holds for one table.
pub type RepositoryState<R> = Arc<dyn Repository<R>>;

/// Statements
///
/// Parameterized SQL generated once per table from its `Record` description.
#[derive(Debug, Clone)]
struct Statements {
    select_all: String,
    select_one: String,
    insert: String,
    update: String,
    soft_delete: String,
    delete: String,
}

impl Statements {
    fn for_record<R: Record>() -> Self {
        let table = R::TABLE;
        let columns = R::COLUMNS.join(", ");
        let projection = format!("id, {columns}");
        let placeholders = (1..=R::COLUMNS.len())
            .map(|n| format!("${n}"))
            .collect::<Vec<_>>()
            .join(", ");
        // $1 is the id; column binds start at $2.
        let assignments = R::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = ${}", i + 2))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            select_all: format!("SELECT {projection} FROM {table} ORDER BY id"),
            select_one: format!("SELECT {projection} FROM {table} WHERE id = $1"),
            insert: format!(
                "INSERT INTO {table} ({columns}) VALUES ({placeholders}) RETURNING {projection}"
            ),
            update: format!(
                "UPDATE {table} SET {assignments} WHERE id = $1 RETURNING {projection}"
            ),
            soft_delete: format!("UPDATE {table} SET is_deleted = TRUE WHERE id = $1"),
            delete: format!("DELETE FROM {table} WHERE id = $1"),
        }
    }
}

/// PostgresRepository
///
/// The concrete implementation of `Repository`, backed by PostgreSQL. One instance per
/// table; all instances share the same pool.
pub struct PostgresRepository<R> {
    pool: PgPool,
    sql: Statements,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> PostgresRepository<R> {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            sql: Statements::for_record::<R>(),
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Record> Repository<R> for PostgresRepository<R> {
    async fn list(&self) -> Result<Vec<R>, RepoError> {
        sqlx::query_as::<_, R>(&self.sql.select_all)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(table = R::TABLE, "list error: {:?}", e);
                RepoError::from(e)
            })
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<R>, RepoError> {
        sqlx::query_as::<_, R>(&self.sql.select_one)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(table = R::TABLE, id, "get_by_id error: {:?}", e);
                RepoError::from(e)
            })
    }

    async fn create(&self, record: R) -> Result<R, RepoError> {
        let query = record.bind_columns(sqlx::query_as::<_, R>(&self.sql.insert));
        query.fetch_one(&self.pool).await.map_err(|e| {
            tracing::error!(table = R::TABLE, "create error: {:?}", e);
            RepoError::from(e)
        })
    }

    /// update
    ///
    /// `RETURNING` tells a matched row apart from a missing one without a second query.
    async fn update(&self, record: R) -> Result<WriteOutcome, RepoError> {
        let id = record.id();
        let query = record.bind_columns(sqlx::query_as::<_, R>(&self.sql.update).bind(id));
        match query.fetch_optional(&self.pool).await {
            Ok(Some(_)) => Ok(WriteOutcome::Applied),
            Ok(None) => Ok(WriteOutcome::NotFound),
            Err(e) => {
                tracing::error!(table = R::TABLE, id, "update error: {:?}", e);
                Err(e.into())
            }
        }
    }

    async fn soft_delete(&self, id: i32) -> Result<WriteOutcome, RepoError> {
        let result = sqlx::query(&self.sql.soft_delete)
            .bind(id)
            .execute(&self.pool)
            .await;
        match result {
            Ok(res) if res.rows_affected() > 0 => Ok(WriteOutcome::Applied),
            Ok(_) => Ok(WriteOutcome::NotFound),
            Err(e) => {
                tracing::error!(table = R::TABLE, id, "soft delete error: {:?}", e);
                Err(e.into())
            }
        }
    }

    async fn delete(&self, id: i32) -> Result<WriteOutcome, RepoError> {
        let result = sqlx::query(&self.sql.delete)
            .bind(id)
            .execute(&self.pool)
            .await;
        match result {
            Ok(res) if res.rows_affected() > 0 => Ok(WriteOutcome::Applied),
            Ok(_) => Ok(WriteOutcome::NotFound),
            Err(e) => {
                tracing::error!(table = R::TABLE, id, "delete error: {:?}", e);
                Err(e.into())
            }
        }
    }
}

/// In-process repository with the same semantics as `PostgresRepository`.
/// Used by the test suite and by `STORAGE=memory` local runs.
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::{Mutex, MutexGuard};

    pub struct InMemoryRepository<R> {
        rows: Mutex<BTreeMap<i32, R>>,
        // Identity counter: ids are never reused, even after a hard delete.
        next_id: AtomicI32,
    }

    impl<R> Default for InMemoryRepository<R> {
        fn default() -> Self {
            Self {
                rows: Mutex::new(BTreeMap::new()),
                next_id: AtomicI32::new(1),
            }
        }
    }

    impl<R: Record> InMemoryRepository<R> {
        pub fn new() -> Self {
            Self::default()
        }

        /// An empty store whose next generated id is `next_id`.
        pub fn starting_at(next_id: i32) -> Self {
            Self {
                rows: Mutex::new(BTreeMap::new()),
                next_id: AtomicI32::new(next_id),
            }
        }

        fn rows(&self) -> Result<MutexGuard<'_, BTreeMap<i32, R>>, RepoError> {
            self.rows.lock().map_err(|_| {
                tracing::error!(table = R::TABLE, "in-memory store lock poisoned");
                RepoError::Unavailable
            })
        }
    }

    #[async_trait]
    impl<R: Record> Repository<R> for InMemoryRepository<R> {
        async fn list(&self) -> Result<Vec<R>, RepoError> {
            Ok(self.rows()?.values().cloned().collect())
        }

        async fn get_by_id(&self, id: i32) -> Result<Option<R>, RepoError> {
            Ok(self.rows()?.get(&id).cloned())
        }

        async fn create(&self, mut record: R) -> Result<R, RepoError> {
            let mut rows = self.rows()?;
            let id = self
                .next_id
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |id| id.checked_add(1))
                .map_err(|_| {
                    tracing::error!(table = R::TABLE, "identity sequence exhausted");
                    RepoError::IdsExhausted(R::TABLE)
                })?;
            record.set_id(id);
            rows.insert(id, record.clone());
            Ok(record)
        }

        async fn update(&self, record: R) -> Result<WriteOutcome, RepoError> {
            match self.rows()?.get_mut(&record.id()) {
                Some(slot) => {
                    *slot = record;
                    Ok(WriteOutcome::Applied)
                }
                None => Ok(WriteOutcome::NotFound),
            }
        }

        async fn soft_delete(&self, id: i32) -> Result<WriteOutcome, RepoError> {
            match self.rows()?.get_mut(&id) {
                Some(row) => {
                    row.set_deleted(true);
                    Ok(WriteOutcome::Applied)
                }
                None => Ok(WriteOutcome::NotFound),
            }
        }

        async fn delete(&self, id: i32) -> Result<WriteOutcome, RepoError> {
            match self.rows()?.remove(&id) {
                Some(_) => Ok(WriteOutcome::Applied),
                None => Ok(WriteOutcome::NotFound),
            }
        }
    }
}
