use crate::error::Result;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tokio::sync::Mutex;
use triage_protocol::AuditRecord;

/// Append-only audit trail with an optional JSON-lines file sink.
///
/// All appends go through one async mutex, so records land in the file in
/// the order they were accepted and lines are never interleaved. Records are
/// always retained in memory as well, which is what tests and in-process
/// inspection read.
pub struct AuditLog {
    inner: Mutex<AuditInner>,
}

struct AuditInner {
    records: Vec<AuditRecord>,
    sink: Option<File>,
}

impl AuditLog {
    /// Memory-only trail. Used when no audit path is configured.
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(AuditInner {
                records: Vec::new(),
                sink: None,
            }),
        }
    }

    /// Opens (or creates) the sink file in append mode, so restarts extend
    /// the existing trail instead of truncating it.
    pub fn with_sink(path: &Path) -> Result<Self> {
        let sink = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            inner: Mutex::new(AuditInner {
                records: Vec::new(),
                sink: Some(sink),
            }),
        })
    }

    /// Appends one record, writing it to the sink first so a failed write
    /// never leaves the file behind the in-memory trail.
    pub async fn append(&self, record: AuditRecord) -> Result<()> {
        let line = serde_json::to_string(&record)?;
        let mut inner = self.inner.lock().await;
        if let Some(sink) = inner.sink.as_mut() {
            writeln!(sink, "{line}")?;
            sink.flush()?;
        }
        inner.records.push(record);
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Snapshot of the in-memory trail, in append order.
    pub async fn records(&self) -> Vec<AuditRecord> {
        self.inner.lock().await.records.clone()
    }
}
