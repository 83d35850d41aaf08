//! Asynchronous audit trail.
//!
//! [`AuditSink::log`] never waits on the database: entries are pushed onto a
//! bounded queue drained by a single writer task. A full queue drops the
//! entry and bumps the `dropped` counter; a failed insert bumps `failed`.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::db::Store;
use crate::domain::UserId;
use crate::domain::clock::{Clock, format_timestamp};

pub mod actions {
    pub const CREATE_DOCUMENT: &str = "CREATE_DOCUMENT";
    pub const UPDATE_DOCUMENT: &str = "UPDATE_DOCUMENT";
    pub const DELETE_DOCUMENT: &str = "DELETE_DOCUMENT";
    pub const CREATE_USER: &str = "CREATE_USER";
    pub const DEACTIVATE_USER: &str = "DEACTIVATE_USER";
    pub const ACTIVATE_USER: &str = "ACTIVATE_USER";
    pub const SETTINGS_UPDATED: &str = "SETTINGS_UPDATED";
    pub const BACKUP_CREATED: &str = "BACKUP_CREATED";
    pub const RESTORE_FROM_FILE: &str = "RESTORE_FROM_FILE";
    pub const LOGIN: &str = "LOGIN";
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for AuditError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub id: i64,
    pub user_id: i32,
    /// `None` for system actions or accounts that no longer exist.
    pub user_name: Option<String>,
    pub action: String,
    pub detail: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct AuditStats {
    pub written: u64,
    pub dropped: u64,
    pub failed: u64,
}

#[derive(Default)]
struct Counters {
    written: AtomicU64,
    dropped: AtomicU64,
    failed: AtomicU64,
}

struct PendingEntry {
    user_id: i32,
    action: &'static str,
    detail: String,
    timestamp: String,
}

enum Command {
    Record(PendingEntry),
    Flush(oneshot::Sender<()>),
}

#[derive(Clone)]
pub struct AuditSink {
    store: Store,
    clock: Arc<dyn Clock>,
    tx: mpsc::Sender<Command>,
    counters: Arc<Counters>,
}

impl AuditSink {
    /// Starts the writer task. Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(store: Store, clock: Arc<dyn Clock>, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let counters = Arc::new(Counters::default());

        tokio::spawn(run_writer(store.clone(), rx, Arc::clone(&counters)));

        Self {
            store,
            clock,
            tx,
            counters,
        }
    }

    /// Records an action. Never blocks and never fails from the caller's view.
    pub fn log(&self, user_id: UserId, action: &'static str, detail: impl Into<String>) {
        let entry = PendingEntry {
            user_id: user_id.value(),
            action,
            detail: detail.into(),
            timestamp: format_timestamp(self.clock.now()),
        };

        if let Err(e) = self.tx.try_send(Command::Record(entry)) {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            metrics::counter!("audit_entries_dropped_total").increment(1);
            let reason = match e {
                mpsc::error::TrySendError::Full(_) => "queue full",
                mpsc::error::TrySendError::Closed(_) => "writer stopped",
            };
            warn!(action, reason, "Audit entry dropped");
        }
    }

    /// Waits until every entry queued before this call has been handled.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(ack_tx)).await.is_ok() {
            let _ = ack_rx.await;
        }
    }

    #[must_use]
    pub fn stats(&self) -> AuditStats {
        AuditStats {
            written: self.counters.written.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }

    /// All entries with the actor's name, newest first.
    pub async fn find_all(&self) -> Result<Vec<AuditEntry>, AuditError> {
        let rows = self.store.audit_repo().list_all().await?;

        let mut user_ids: Vec<i32> = rows.iter().map(|row| row.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let names: HashMap<i32, String> = self
            .store
            .get_users_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user.full_name))
            .collect();

        Ok(rows
            .into_iter()
            .map(|row| AuditEntry {
                user_name: names.get(&row.user_id).cloned(),
                id: row.id,
                user_id: row.user_id,
                action: row.action,
                detail: row.detail,
                timestamp: row.timestamp,
            })
            .collect())
    }
}

async fn run_writer(store: Store, mut rx: mpsc::Receiver<Command>, counters: Arc<Counters>) {
    let repo = store.audit_repo();

    while let Some(command) = rx.recv().await {
        match command {
            Command::Record(entry) => {
                match repo
                    .add(entry.user_id, entry.action, &entry.detail, &entry.timestamp)
                    .await
                {
                    Ok(()) => {
                        counters.written.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => {
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                        metrics::counter!("audit_entries_failed_total").increment(1);
                        warn!(error = %e, action = entry.action, "Failed to persist audit entry");
                    }
                }
            }
            Command::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }

    debug!("Audit writer stopped");
}
