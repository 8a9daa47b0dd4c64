//! Purge routine - deletes all job-board data in foreign-key-safe order.
//!
//! The whole routine runs inside one transaction with referential-integrity
//! checks suspended. Each table is deleted inside its own savepoint: a table
//! that fails (usually because it has not been migrated yet) is rolled back to
//! its savepoint, logged and skipped, and the purge carries on. The checks are
//! restored before commit on every path, including when a delete fails.
//!
//! This destroys all tenant data. Callers are expected to ask for
//! confirmation first.

use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, DatabaseTransaction, Statement,
    TransactionTrait,
    sea_query::{Alias, Query},
};
use serde::Serialize;
use tracing::{info, warn};

/// Every table of the platform schema, most dependent first.
pub const DEFAULT_PURGE_ORDER: &[&str] = &[
    "sessions",
    "refresh_tokens",
    "job_views",
    "saved_jobs",
    "applications",
    "jobs",
    "organization_members",
    "organizations",
    "users",
    "category_translations",
    "categories",
    "locations",
    "tenants",
];

/// [`DEFAULT_PURGE_ORDER`] as owned strings.
#[must_use]
pub fn default_table_order() -> Vec<String> {
    DEFAULT_PURGE_ORDER.iter().map(ToString::to_string).collect()
}

/// A table that was emptied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurgedTable {
    /// Table name
    pub table: String,
    /// Rows removed from it
    pub rows_deleted: u64,
}

/// A table whose delete failed and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedTable {
    /// Table name
    pub table: String,
    /// Database error that made the delete fail
    pub reason: String,
}

/// Per-table outcome of a purge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    /// Tables emptied, in purge order
    pub purged: Vec<PurgedTable>,
    /// Tables whose delete failed, in purge order
    pub skipped: Vec<SkippedTable>,
}

impl PurgeReport {
    /// `true` when no table was skipped.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// The entry for `table` if it was emptied.
    #[must_use]
    pub fn purged_table(&self, table: &str) -> Option<&PurgedTable> {
        self.purged.iter().find(|p| p.table == table)
    }

    /// The entry for `table` if it was skipped.
    #[must_use]
    pub fn skipped_table(&self, table: &str) -> Option<&SkippedTable> {
        self.skipped.iter().find(|s| s.table == table)
    }

    /// Total rows deleted across all tables.
    #[must_use]
    pub fn rows_deleted(&self) -> u64 {
        self.purged.iter().map(|p| p.rows_deleted).sum()
    }
}

/// Statements that switch referential-integrity enforcement off and back on.
const fn integrity_statements(backend: DatabaseBackend) -> (&'static str, &'static str) {
    match backend {
        DatabaseBackend::Sqlite => (
            "PRAGMA defer_foreign_keys = ON",
            "PRAGMA defer_foreign_keys = OFF",
        ),
        DatabaseBackend::Postgres => (
            "SET LOCAL session_replication_role = 'replica'",
            "SET LOCAL session_replication_role = 'origin'",
        ),
        DatabaseBackend::MySql => ("SET FOREIGN_KEY_CHECKS = 0", "SET FOREIGN_KEY_CHECKS = 1"),
    }
}

/// Integrity checks suspended on a transaction. Must be handed back to
/// [`SuspendedChecks::restore`].
#[must_use = "suspended integrity checks must be restored"]
struct SuspendedChecks {
    restore_sql: &'static str,
}

impl SuspendedChecks {
    async fn suspend(txn: &DatabaseTransaction) -> Result<Self> {
        let backend = txn.get_database_backend();
        let (suspend_sql, restore_sql) = integrity_statements(backend);
        txn.execute(Statement::from_string(backend, suspend_sql))
            .await?;
        Ok(Self { restore_sql })
    }

    async fn restore(self, txn: &DatabaseTransaction) -> Result<()> {
        let backend = txn.get_database_backend();
        txn.execute(Statement::from_string(backend, self.restore_sql))
            .await?;
        Ok(())
    }
}

/// Deletes every row of `tables`, in the given order.
pub async fn purge_tables(db: &DatabaseConnection, tables: &[String]) -> Result<PurgeReport> {
    info!("Purging {} tables", tables.len());

    let txn = db.begin().await?;
    let checks = SuspendedChecks::suspend(&txn).await?;

    let deleted = delete_tables(&txn, tables).await;
    let restored = checks.restore(&txn).await;

    let report = deleted?;
    restored?;
    txn.commit().await?;

    info!(
        "Purge finished: {} tables emptied ({} rows), {} skipped",
        report.purged.len(),
        report.rows_deleted(),
        report.skipped.len()
    );
    Ok(report)
}

/// Purges the tables in [`DEFAULT_PURGE_ORDER`].
pub async fn purge(db: &DatabaseConnection) -> Result<PurgeReport> {
    purge_tables(db, &default_table_order()).await
}

async fn delete_tables(txn: &DatabaseTransaction, tables: &[String]) -> Result<PurgeReport> {
    let backend = txn.get_database_backend();
    let mut report = PurgeReport::default();

    for table in tables {
        let statement = Query::delete()
            .from_table(Alias::new(table.as_str()))
            .to_owned();

        let savepoint = txn.begin().await?;
        match savepoint.execute(backend.build(&statement)).await {
            Ok(result) => {
                savepoint.commit().await?;
                info!("Purged {table} ({} rows)", result.rows_affected());
                report.purged.push(PurgedTable {
                    table: table.clone(),
                    rows_deleted: result.rows_affected(),
                });
            }
            Err(err) => {
                savepoint.rollback().await?;
                warn!("Could not purge {table}, skipping: {err}");
                report.skipped.push(SkippedTable {
                    table: table.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(report)
}
