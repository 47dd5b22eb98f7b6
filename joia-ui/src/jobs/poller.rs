//! Job status polling
//!
//! One poll task per submitted job, spawned only after a successful
//! submission. The task ticks on a fixed interval, fetches the current
//! snapshot, and stops on the first terminal status or when the owning
//! surface cancels it. A transport failure during a poll is not a job
//! failure: it is logged and retried on the next tick. Job failure is a
//! value the service returns (status = failed), and is final.

use super::client::KaraokeClient;
use super::{reconcile, JobRegistry, JobStatus};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Fixed delay between status polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Spawn the poll task for a tracked job.
///
/// `cancel` is the token returned by [`JobRegistry::track`]; cancelling it
/// stops the schedule without aborting an in-flight poll, whose result is
/// then discarded because the registry no longer knows the job.
pub fn spawn_poll_task(
    db: SqlitePool,
    client: Arc<KaraokeClient>,
    registry: JobRegistry,
    job_id: String,
    cancel: CancellationToken,
    poll_interval: Duration,
) {
    tokio::spawn(poll_until_terminal(
        db,
        client,
        registry,
        job_id,
        cancel,
        poll_interval,
    ));
}

async fn poll_until_terminal(
    db: SqlitePool,
    client: Arc<KaraokeClient>,
    registry: JobRegistry,
    job_id: String,
    cancel: CancellationToken,
    poll_interval: Duration,
) {
    // First tick one full interval after submission; the submit response
    // already provided the initial snapshot.
    let mut tick = interval_at(Instant::now() + poll_interval, poll_interval);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(job_id = %job_id, "Job polling cancelled");
                return;
            }
            _ = tick.tick() => {}
        }

        let snapshot = match client.poll(&job_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "Job status poll failed, retrying on next tick");
                continue;
            }
        };

        if !registry.apply(&job_id, snapshot.clone()).await {
            debug!(job_id = %job_id, "Job no longer tracked, discarding poll result");
            return;
        }

        match snapshot.status {
            JobStatus::Completed => {
                match snapshot.result_url {
                    Some(result_url) => {
                        run_reconciliation(&db, &registry, &job_id, &result_url).await;
                    }
                    None => {
                        warn!(job_id = %job_id, "Job completed without a result URL, nothing to add");
                    }
                }
                return;
            }
            JobStatus::Failed => {
                info!(
                    job_id = %job_id,
                    error = snapshot.error.as_deref().unwrap_or("unknown"),
                    "Karaoke job failed"
                );
                return;
            }
            JobStatus::Pending | JobStatus::Processing => {}
        }
    }
}

/// Insert the completed result into the library, at most once per job.
async fn run_reconciliation(db: &SqlitePool, registry: &JobRegistry, job_id: &str, result_url: &str) {
    let Some((title, artist)) = registry.begin_reconcile(job_id).await else {
        debug!(job_id = %job_id, "Reconciliation already handled, skipping");
        return;
    };

    match reconcile::add_completed_song(db, result_url, title.as_deref(), artist.as_deref()).await {
        Ok(guid) => {
            info!(
                job_id = %job_id,
                song_guid = %guid,
                result_url = %result_url,
                "Completed karaoke job added to library"
            );
            registry.record_added(job_id).await;
        }
        Err(e) => {
            error!(job_id = %job_id, error = %e, "Completed karaoke job could not be added to library");
            registry
                .record_library_error(job_id, format!("Failed to add to library: {}", e))
                .await;
        }
    }
}
