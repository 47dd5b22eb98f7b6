//! Karaoke creation jobs
//!
//! A job is one asynchronous request to the external karaoke processor.
//! The service tracks jobs only in memory, from a successful submission
//! until the owning surface dismisses them; they are never persisted and
//! never resumed across a restart. Status moves strictly forward through
//! pending → processing → {completed | failed}.

pub mod client;
pub mod poller;
pub mod reconcile;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Job status as reported by the karaoke service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Completed and failed are terminal: no further transitions occur.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// One job snapshot, exactly the karaoke service's wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub job_id: String,
    pub status: JobStatus,
    /// 0-100, meaningful while processing
    #[serde(default)]
    pub progress: i64,
    #[serde(default)]
    pub message: String,
    /// Present only when status is completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_url: Option<String>,
    /// Present only when status is failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Job state as reported to API consumers: the latest snapshot plus the
/// library reconciliation outcome.
#[derive(Debug, Clone, Serialize)]
pub struct JobView {
    #[serde(flatten)]
    pub snapshot: JobSnapshot,
    /// True once the completed result has been inserted into the library
    pub added_to_library: bool,
    /// Set when the completed result could not be added to the library;
    /// the generated video still exists on the service side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_error: Option<String>,
}

#[derive(Debug)]
struct JobEntry {
    snapshot: JobSnapshot,
    /// Title supplied at submission, used for the library entry
    title: Option<String>,
    /// Artist supplied at submission, used for the library entry
    artist: Option<String>,
    /// One-shot guard: reconciliation runs at most once per job
    reconciled: bool,
    added_to_library: bool,
    library_error: Option<String>,
    cancel: CancellationToken,
}

/// In-memory registry of active jobs, shared between the HTTP surface and
/// the poll tasks. Each entry is owned by the surface that created it;
/// dismissing the surface cancels its poll task and drops the entry.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    inner: Arc<RwLock<HashMap<String, JobEntry>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a freshly submitted job. Returns the cancellation
    /// token its poll task must observe.
    pub async fn track(
        &self,
        snapshot: JobSnapshot,
        title: Option<String>,
        artist: Option<String>,
    ) -> CancellationToken {
        let cancel = CancellationToken::new();
        let entry = JobEntry {
            snapshot: snapshot.clone(),
            title,
            artist,
            reconciled: false,
            added_to_library: false,
            library_error: None,
            cancel: cancel.clone(),
        };
        self.inner.write().await.insert(snapshot.job_id, entry);
        cancel
    }

    /// Apply a freshly polled snapshot.
    ///
    /// Returns false when the job is no longer tracked (its surface was
    /// dismissed); the caller must discard the snapshot and stop. A
    /// snapshot that would move a terminal job back to a non-terminal
    /// status is ignored: the state machine only runs forward.
    pub async fn apply(&self, job_id: &str, snapshot: JobSnapshot) -> bool {
        let mut jobs = self.inner.write().await;
        let Some(entry) = jobs.get_mut(job_id) else {
            return false;
        };

        if entry.snapshot.status.is_terminal() && !snapshot.status.is_terminal() {
            tracing::warn!(
                job_id = %job_id,
                status = ?snapshot.status,
                "Ignoring status regression out of terminal state"
            );
            return true;
        }

        entry.snapshot = snapshot;
        true
    }

    /// Claim the one reconciliation slot for a completed job.
    ///
    /// Returns the submitted title/artist on the first call and None on
    /// every later one (or when the job is no longer tracked), so a
    /// duplicate terminal observation can never double-insert.
    pub async fn begin_reconcile(&self, job_id: &str) -> Option<(Option<String>, Option<String>)> {
        let mut jobs = self.inner.write().await;
        let entry = jobs.get_mut(job_id)?;
        if entry.reconciled {
            return None;
        }
        entry.reconciled = true;
        Some((entry.title.clone(), entry.artist.clone()))
    }

    /// Record that the completed result was inserted into the library.
    pub async fn record_added(&self, job_id: &str) {
        if let Some(entry) = self.inner.write().await.get_mut(job_id) {
            entry.added_to_library = true;
        }
    }

    /// Record that the library insert failed. The job itself still
    /// completed; only the library add is in error.
    pub async fn record_library_error(&self, job_id: &str, message: String) {
        if let Some(entry) = self.inner.write().await.get_mut(job_id) {
            entry.library_error = Some(message);
        }
    }

    /// Current view of a tracked job.
    pub async fn view(&self, job_id: &str) -> Option<JobView> {
        self.inner.read().await.get(job_id).map(|entry| JobView {
            snapshot: entry.snapshot.clone(),
            added_to_library: entry.added_to_library,
            library_error: entry.library_error.clone(),
        })
    }

    /// Dismiss a job's surface: stop its polling deterministically and
    /// forget the job. Returns false for unknown jobs.
    pub async fn dismiss(&self, job_id: &str) -> bool {
        match self.inner.write().await.remove(job_id) {
            Some(entry) => {
                entry.cancel.cancel();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(job_id: &str, status: JobStatus) -> JobSnapshot {
        JobSnapshot {
            job_id: job_id.to_string(),
            status,
            progress: 0,
            message: String::new(),
            result_url: None,
            error: None,
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_snapshot_wire_shape() {
        let parsed: JobSnapshot = serde_json::from_str(
            r#"{"job_id":"j1","status":"processing","progress":50,"message":"Removing vocals..."}"#,
        )
        .unwrap();
        assert_eq!(parsed.status, JobStatus::Processing);
        assert_eq!(parsed.progress, 50);
        assert!(parsed.result_url.is_none());

        let parsed: JobSnapshot = serde_json::from_str(
            r#"{"job_id":"j1","status":"completed","progress":100,"message":"done","result_url":"https://youtu.be/abc12345678"}"#,
        )
        .unwrap();
        assert!(parsed.status.is_terminal());
        assert_eq!(parsed.result_url.as_deref(), Some("https://youtu.be/abc12345678"));
    }

    #[tokio::test]
    async fn test_apply_discards_untracked_jobs() {
        let registry = JobRegistry::new();
        assert!(!registry.apply("ghost", snapshot("ghost", JobStatus::Pending)).await);
    }

    #[tokio::test]
    async fn test_apply_ignores_terminal_regression() {
        let registry = JobRegistry::new();
        registry
            .track(snapshot("j1", JobStatus::Pending), None, None)
            .await;

        assert!(registry.apply("j1", snapshot("j1", JobStatus::Completed)).await);
        assert!(registry.apply("j1", snapshot("j1", JobStatus::Processing)).await);

        let view = registry.view("j1").await.unwrap();
        assert_eq!(view.snapshot.status, JobStatus::Completed);
    }

    #[tokio::test]
    async fn test_begin_reconcile_is_one_shot() {
        let registry = JobRegistry::new();
        registry
            .track(
                snapshot("j1", JobStatus::Completed),
                Some("Title".to_string()),
                None,
            )
            .await;

        let first = registry.begin_reconcile("j1").await;
        assert_eq!(first, Some((Some("Title".to_string()), None)));

        // A second terminal observation gets nothing to do
        assert_eq!(registry.begin_reconcile("j1").await, None);
        assert_eq!(registry.begin_reconcile("unknown").await, None);
    }

    #[tokio::test]
    async fn test_dismiss_cancels_and_forgets() {
        let registry = JobRegistry::new();
        let cancel = registry
            .track(snapshot("j1", JobStatus::Pending), None, None)
            .await;

        assert!(!cancel.is_cancelled());
        assert!(registry.dismiss("j1").await);
        assert!(cancel.is_cancelled());
        assert!(registry.view("j1").await.is_none());
        assert!(!registry.dismiss("j1").await);
    }
}
